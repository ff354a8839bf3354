//! Pure domain types: topics, channels, payloads, frames and the delivery
//! queue. No I/O.

pub mod frame;
pub mod notification;
pub mod queue;
pub mod topic;

pub use frame::{ControlMessage, InboundFrame};
pub use notification::{BlockInfo, CosignatureInfo, Notification, TransactionInfo, TransactionStatus};
pub use queue::{DeliveryQueue, PushOutcome};
pub use topic::{Channel, Topic};
