pub mod contact_ops;
pub mod event_ops;
pub mod link_ops;
pub mod import_ops;
pub mod export_ops;
