/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public order lifecycle engine surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod board;
pub mod config;
pub mod draft;
pub mod error;
pub mod filling;
pub mod form;
pub mod lifecycle;
pub mod notice;
pub mod queue;
pub mod sauce;
pub mod types;

pub use board::{BoardSnapshot, Clock, OrderBoard};
pub use config::{EngineConfig, MenuConfig, QueueConfig};
pub use draft::{DraftCart, DraftMode, OrderTarget};
pub use error::{EngineError, Result};
pub use filling::{FillingCounts, FillingSelector};
pub use form::{ComposeForm, FormSnapshot};
pub use lifecycle::{AbortReason, RemovalGate, RemovalHandle, RemovalRequest, TickOutcome};
pub use notice::{Notice, NoticeBoard};
pub use queue::{CommitReceipt, OrderQueue, group_by_queue_number};
pub use sauce::{SauceSelection, SauceSummary};

// Re-export all types
pub use types::*;
