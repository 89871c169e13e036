//! The media host factory.

use vidprompt_common::error::VidpromptResult;

use crate::capture::{CaptureSurface, FrameTicker};
use crate::recorder::{AudioGraph, ContainerRecorder, RecorderConfig};

/// Factory for the media resources one export session owns.
///
/// Every resource handed out is exclusively owned by the requesting
/// session for its lifetime; hosts must tolerate repeated
/// allocate/release cycles across export attempts.
pub trait MediaHost: Send + Sync {
    /// Allocate an off-screen capture surface with the given dimensions.
    fn create_capture_surface(
        &self,
        width: u32,
        height: u32,
    ) -> VidpromptResult<Box<dyn CaptureSurface>>;

    /// Create a display-refresh ticker pacing the capture loop at `fps`.
    fn create_ticker(&self, fps: u32) -> Box<dyn FrameTicker>;

    /// Allocate an audio-processing graph.
    fn create_audio_graph(&self) -> VidpromptResult<Box<dyn AudioGraph>>;

    /// Attach a container recorder to the composed stream.
    fn create_recorder(&self, config: RecorderConfig) -> VidpromptResult<Box<dyn ContainerRecorder>>;
}
