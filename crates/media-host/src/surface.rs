//! The playback surface contract.
//!
//! A playback surface is the handle to the media element showing the full
//! source video. It is shared between the preview player and the export
//! pipeline, so all methods take `&self`; implementations are expected to
//! use interior mutability, mirroring a shared media-element handle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vidprompt_common::error::VidpromptResult;

/// Intrinsic properties of the loaded source media.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Native width in pixels.
    pub width: u32,

    /// Native height in pixels.
    pub height: u32,

    /// Total duration in seconds.
    pub duration_secs: f64,
}

/// The pixel content presented by a surface at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,

    /// Source position this frame corresponds to, in seconds.
    pub timestamp_secs: f64,
}

/// A playback surface bound to the source video.
#[async_trait]
pub trait MediaSurface: Send + Sync {
    /// Resolve the source's metadata, suspending until it has loaded.
    /// No timeout is enforced; a source that never loads suspends forever.
    async fn wait_for_metadata(&self) -> VidpromptResult<MediaMetadata>;

    /// Metadata if already loaded, without suspending.
    fn metadata(&self) -> Option<MediaMetadata>;

    /// Seek to the given position and wait for the seek to complete.
    async fn seek(&self, position_secs: f64) -> VidpromptResult<()>;

    /// Begin playback. Settles once playback has actually started; the
    /// surface may refuse (autoplay policy, decode failure).
    async fn play(&self) -> VidpromptResult<()>;

    /// Halt playback immediately.
    fn pause(&self);

    /// Current playback position in seconds.
    fn position_secs(&self) -> f64;

    /// Whether playback is currently halted.
    fn is_paused(&self) -> bool;

    /// Current mute state.
    fn muted(&self) -> bool;

    /// Set the mute state.
    fn set_muted(&self, muted: bool);

    /// The frame currently presented by the surface.
    fn current_frame(&self) -> VideoFrame;
}
