//! Application services layer.
//!
//! Services that sit between the device observer and the media orchestrator.

pub mod pause_worker;

pub use pause_worker::{PauseRequester, PauseWorker};
