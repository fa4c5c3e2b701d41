//! Shared utilities: telemetry setup and process-environment flags.

mod environment;
mod telemetry;

pub use environment::FeedEnvironment;
pub use telemetry::{init_telemetry, init_telemetry_json};
