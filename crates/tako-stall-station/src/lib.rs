/*
[INPUT]:  Public API exports for tako-stall-station crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod event;
pub mod station;
pub mod telemetry;

// Re-export main types for convenience
pub use config::StationConfig;
pub use event::{CommandHandler, StationCommand, StationEvent};
pub use station::{Station, StationHandle};
pub use telemetry::init_tracing;
