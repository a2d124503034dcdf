pub mod contact_queries;
pub mod event_queries;
pub mod stats_queries;
