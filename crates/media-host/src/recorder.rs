//! Audio routing and container recording contracts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vidprompt_common::error::VidpromptResult;

use crate::surface::MediaSurface;

/// An audio-processing graph that routes the source's audio output into
/// the composed capture stream.
pub trait AudioGraph: Send + Sync {
    /// Route the surface's audio output into this graph.
    ///
    /// Failure (unsupported environment, no audio track) is non-fatal for
    /// the caller: export degrades to a silent output stream.
    fn route_from(&mut self, surface: &dyn MediaSurface) -> VidpromptResult<()>;

    /// Whether a routed audio track is available for the output stream.
    fn has_audio(&self) -> bool;

    /// Disconnect and close the graph. Idempotent; the session calls this
    /// on every exit path.
    fn teardown(&mut self);
}

/// Parameters for attaching a recorder to the composed stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Frame rate of the composed stream.
    pub fps: u32,

    /// Stream dimensions (the capture surface's native size).
    pub width: u32,
    pub height: u32,

    /// Whether a routed audio track is merged into the stream.
    pub with_audio: bool,

    /// Container MIME type, e.g. `video/webm`.
    pub mime: String,
}

/// The flushed output of a finished recording.
#[derive(Debug, Clone)]
pub struct RecordedMedia {
    /// Container MIME type.
    pub mime: String,

    /// Number of audio tracks in the container (0 when routing failed).
    pub audio_tracks: u32,

    /// The container blob.
    pub bytes: Vec<u8>,
}

/// A container recorder attached to the composed stream.
///
/// Started before any scene processing begins and stopped after the last
/// scene, so one recording brackets the entire multi-scene run.
#[async_trait]
pub trait ContainerRecorder: Send + Sync {
    /// Start accumulating output chunks.
    fn start(&mut self) -> VidpromptResult<()>;

    /// Stop recording and flush all accumulated chunks into a single
    /// container blob.
    async fn stop(&mut self) -> VidpromptResult<RecordedMedia>;

    /// A pending asynchronous recorder error, if one has fired since the
    /// last call. A recorder error is fatal to the export.
    fn take_error(&mut self) -> Option<String>;

    /// Whether the recorder is currently accumulating.
    fn is_recording(&self) -> bool;
}
