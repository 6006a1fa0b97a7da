pub mod notifications;
pub mod publisher;

pub use notifications::BroadcastStatusNotifier;
pub use publisher::{EventPublisher, ReviewEvent};
