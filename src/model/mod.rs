pub mod ids;
pub mod payload;
pub mod contact;
pub mod event;
pub mod linkage;

// Re-exports for convenience
pub use ids::Id;
pub use payload::{ContactPayload, Labeled, PostalAddress};
pub use contact::{Contact, InterestSet, Position, PredefinedInterest};
pub use event::Event;
