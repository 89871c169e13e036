//! Vidprompt Export Engine
//!
//! The scene-timeline export pipeline:
//! - **Capture session:** drives the source surface scene by scene and
//!   records the composed stream into one output container
//! - **Scene player:** previews a single scene on the shared surface
//! - **Export sinks:** subtitle and structured sidecar documents plus the
//!   download-delivery boundary

pub mod player;
pub mod session;
pub mod sinks;

pub use player::*;
pub use session::*;
pub use sinks::*;
