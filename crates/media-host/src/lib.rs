//! VidPrompt Media Host Contracts
//!
//! Trait seams for the media machinery the export engine drives: a playback
//! surface bound to the source video, an off-screen capture surface, a
//! display-refresh ticker, an audio routing graph, and a container recorder.
//! The engine never touches a concrete media stack directly; a host
//! implementation (browser runtime, native player, or the deterministic
//! simulator in [`sim`]) provides these resources through the
//! [`MediaHost`] factory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  MediaHost                       │
//! │  ┌──────────┐ ┌──────────┐ ┌─────────────────┐  │
//! │  │ Capture  │ │ Audio    │ │ Container       │  │
//! │  │ Surface  │ │ Graph    │ │ Recorder        │  │
//! │  └─────┬────┘ └─────┬────┘ └────────┬────────┘  │
//! │        │            │               │            │
//! │        ▼            ▼               ▼            │
//! │  frames @ fps   audio track   output container   │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod capture;
pub mod host;
pub mod recorder;
pub mod sim;
pub mod surface;

pub use capture::*;
pub use host::*;
pub use recorder::*;
pub use surface::*;
