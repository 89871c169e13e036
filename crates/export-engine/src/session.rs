//! The capture session state machine.
//!
//! One session drives the shared playback surface through the frozen scene
//! snapshot, drawing frames onto an off-screen capture surface while a
//! container recorder accumulates the composed stream. Recorder start/stop
//! bracket the entire multi-scene run, so the output is one continuous
//! container whose content is the concatenation of the captured ranges in
//! scene order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vidprompt_common::config::ExportSettings;
use vidprompt_common::error::{VidpromptError, VidpromptResult};
use vidprompt_media_host::{
    AudioGraph, CaptureSurface, ContainerRecorder, FrameTicker, MediaHost, MediaMetadata,
    MediaSurface, RecordedMedia, RecorderConfig,
};
use vidprompt_scene_model::Scene;

use crate::sinks::{video_artifact, DownloadSink};

/// Progress callback invoked on every stage transition.
pub type ProgressCallback = Arc<dyn Fn(ExportProgress) + Send + Sync>;

/// Progress report for one export session.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current stage.
    pub stage: ExportStage,

    /// Overall progress [0, 100], advancing once per scene.
    pub percent: u32,

    /// Scenes processed so far (skipped scenes count).
    pub scenes_completed: usize,

    /// Total scenes in the frozen snapshot.
    pub total_scenes: usize,

    /// Replace-style status message; `None` clears the previous one.
    pub message: Option<String>,
}

/// Stages of the capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    Initializing,
    Seeking,
    Capturing,
    SceneDone,
    Finalizing,
    Complete,
    Failed,
}

/// Host resources exclusively owned by one session, released on every
/// exit path.
struct SessionResources {
    capture: Box<dyn CaptureSurface>,
    ticker: Box<dyn FrameTicker>,
    audio: Option<Box<dyn AudioGraph>>,
    recorder: Box<dyn ContainerRecorder>,
}

struct Reporter {
    callback: Option<ProgressCallback>,
    total: usize,
    completed: AtomicUsize,
}

impl Reporter {
    fn emit(&self, stage: ExportStage, percent: u32, message: Option<String>) {
        if let Some(callback) = &self.callback {
            callback(ExportProgress {
                stage,
                percent,
                scenes_completed: self.completed.load(Ordering::SeqCst),
                total_scenes: self.total,
                message,
            });
        }
    }

    fn scene_done(&self, done: usize) {
        self.completed.store(done, Ordering::SeqCst);
        self.emit(ExportStage::SceneDone, self.percent(), None);
    }

    /// Progress after the scenes completed so far, rounded.
    fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        let done = self.completed.load(Ordering::SeqCst);
        ((done as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Runs export sessions over a media host.
///
/// At most one session is active at a time; a second call while one is
/// running is rejected and leaves the running session untouched.
pub struct VideoExporter {
    host: Arc<dyn MediaHost>,
    settings: ExportSettings,
    active: AtomicBool,
}

impl VideoExporter {
    pub fn new(host: Arc<dyn MediaHost>, settings: ExportSettings) -> Self {
        Self {
            host,
            settings,
            active: AtomicBool::new(false),
        }
    }

    /// Whether a session is currently running.
    pub fn is_exporting(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Run one export session over the frozen snapshot.
    ///
    /// On success the recorded container is handed to `sink` (when given)
    /// and returned; the completion message auto-clears after the
    /// configured delay. Any unrecoverable error transitions to `Failed`
    /// and discards the partial recording.
    pub async fn export(
        &self,
        snapshot: &[Scene],
        surface: &dyn MediaSurface,
        sink: Option<&dyn DownloadSink>,
        progress: Option<ProgressCallback>,
    ) -> VidpromptResult<RecordedMedia> {
        if self.active.swap(true, Ordering::SeqCst) {
            tracing::warn!("Export requested while another session is running");
            return Err(VidpromptError::ExportBusy);
        }

        let reporter = Reporter {
            callback: progress,
            total: snapshot.len(),
            completed: AtomicUsize::new(0),
        };

        let result = self.run(snapshot, surface, &reporter).await;
        self.active.store(false, Ordering::SeqCst);

        match result {
            Ok(media) => {
                if let Some(sink) = sink {
                    if let Err(err) = sink.deliver(video_artifact(&media, &self.settings)) {
                        tracing::error!(error = %err, "Artifact delivery failed");
                        reporter.emit(
                            ExportStage::Failed,
                            reporter.percent(),
                            Some("An error occurred during export.".to_string()),
                        );
                        return Err(err);
                    }
                }
                reporter.emit(
                    ExportStage::Complete,
                    100,
                    Some("Export complete! Download has started.".to_string()),
                );
                self.spawn_message_clear(&reporter);
                tracing::info!(
                    scenes = snapshot.len(),
                    bytes = media.bytes.len(),
                    audio_tracks = media.audio_tracks,
                    "Export session complete"
                );
                Ok(media)
            }
            Err(err) => {
                tracing::error!(error = %err, "Export session failed");
                reporter.emit(
                    ExportStage::Failed,
                    reporter.percent(),
                    Some("An error occurred during export.".to_string()),
                );
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        snapshot: &[Scene],
        surface: &dyn MediaSurface,
        reporter: &Reporter,
    ) -> VidpromptResult<RecordedMedia> {
        tracing::info!(scenes = snapshot.len(), "Starting export session");
        reporter.emit(
            ExportStage::Initializing,
            0,
            Some("Initializing export... This may take a few moments.".to_string()),
        );

        // No timeout: a source that never loads suspends the session.
        let metadata = surface.wait_for_metadata().await?;
        let mut resources = self.allocate(&metadata, surface)?;

        let was_muted = surface.muted();
        // The routed audio graph is the sole audio path during capture.
        surface.set_muted(true);

        let outcome = self.drive(snapshot, surface, &mut resources, reporter).await;

        if let Some(audio) = resources.audio.as_mut() {
            audio.teardown();
        }
        surface.set_muted(was_muted);

        outcome
    }

    /// Acquire the session's resource bundle, all-or-rollback.
    fn allocate(
        &self,
        metadata: &MediaMetadata,
        surface: &dyn MediaSurface,
    ) -> VidpromptResult<SessionResources> {
        let capture = self
            .host
            .create_capture_surface(metadata.width, metadata.height)?;
        let ticker = self.host.create_ticker(self.settings.fps);

        let mut audio = match self.host.create_audio_graph() {
            Ok(graph) => Some(graph),
            Err(err) => {
                tracing::warn!(error = %err, "Could not create audio graph; export will be silent");
                None
            }
        };
        let mut with_audio = false;
        if let Some(graph) = audio.as_mut() {
            match graph.route_from(surface) {
                Ok(()) => with_audio = graph.has_audio(),
                Err(err) => {
                    tracing::warn!(error = %err, "Could not process audio; export will be silent");
                }
            }
        }

        let recorder = match self.host.create_recorder(RecorderConfig {
            fps: self.settings.fps,
            width: metadata.width,
            height: metadata.height,
            with_audio,
            mime: self.settings.container_mime.clone(),
        }) {
            Ok(recorder) => recorder,
            Err(err) => {
                if let Some(graph) = audio.as_mut() {
                    graph.teardown();
                }
                return Err(err);
            }
        };

        Ok(SessionResources {
            capture,
            ticker,
            audio,
            recorder,
        })
    }

    async fn drive(
        &self,
        snapshot: &[Scene],
        surface: &dyn MediaSurface,
        resources: &mut SessionResources,
        reporter: &Reporter,
    ) -> VidpromptResult<RecordedMedia> {
        resources.recorder.start()?;

        let total = snapshot.len();
        for (index, scene) in snapshot.iter().enumerate() {
            let start = scene.start_secs();
            let end = scene.end_secs();

            if start >= end {
                // A malformed scene must not stall overall progress.
                tracing::warn!(
                    scene = index + 1,
                    start,
                    end,
                    "Skipping scene with start >= end"
                );
            } else {
                reporter.emit(
                    ExportStage::Seeking,
                    reporter.percent(),
                    Some(format!("Processing scene {} of {}...", index + 1, total)),
                );
                self.capture_scene(surface, resources, reporter, start, end)
                    .await?;
            }

            if let Some(message) = resources.recorder.take_error() {
                return Err(VidpromptError::capture(format!(
                    "Recorder error: {message}"
                )));
            }

            reporter.scene_done(index + 1);
        }

        reporter.emit(ExportStage::Finalizing, reporter.percent(), None);
        resources.recorder.stop().await
    }

    /// Capture one scene's frame range. Playback refusal ends the scene
    /// without failing the session; only recorder errors are fatal.
    async fn capture_scene(
        &self,
        surface: &dyn MediaSurface,
        resources: &SessionResources,
        reporter: &Reporter,
        start: f64,
        end: f64,
    ) -> VidpromptResult<()> {
        surface.seek(start).await?;

        if let Err(err) = surface.play().await {
            tracing::warn!(error = %err, start, "Playback refused; scene capture skipped");
            surface.pause();
            return Ok(());
        }

        reporter.emit(ExportStage::Capturing, reporter.percent(), None);

        let capture_loop = async {
            loop {
                resources.ticker.tick().await;
                if surface.position_secs() >= end || surface.is_paused() {
                    break;
                }
                resources.capture.draw(&surface.current_frame());
            }
        };

        let outcome = match self.settings.scene_timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs_f64(secs), capture_loop)
                .await
                .map_err(|_| {
                    VidpromptError::capture(format!("Scene capture exceeded {secs}s timeout"))
                }),
            None => {
                capture_loop.await;
                Ok(())
            }
        };

        surface.pause();
        outcome
    }

    /// Clear the completion message after the configured delay.
    fn spawn_message_clear(&self, reporter: &Reporter) {
        if let Some(callback) = reporter.callback.clone() {
            let delay = Duration::from_secs(self.settings.message_clear_secs);
            let total = reporter.total;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                callback(ExportProgress {
                    stage: ExportStage::Complete,
                    percent: 100,
                    scenes_completed: total,
                    total_scenes: total,
                    message: None,
                });
            });
        }
    }
}
