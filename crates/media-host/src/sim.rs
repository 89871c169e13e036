//! Deterministic in-memory media host.
//!
//! Stands in for a real browser/native media stack so the export engine
//! can be exercised end to end without a display or codec. Playback
//! position advances only on ticker ticks, so tests driven by a paused
//! tokio clock are fully deterministic.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use vidprompt_common::error::{VidpromptError, VidpromptResult};

use crate::capture::{CaptureSurface, FrameTicker};
use crate::host::MediaHost;
use crate::recorder::{AudioGraph, ContainerRecorder, RecordedMedia, RecorderConfig};
use crate::surface::{MediaMetadata, MediaSurface, VideoFrame};

#[derive(Debug)]
struct SurfaceState {
    metadata: MediaMetadata,
    metadata_loaded: bool,
    position: f64,
    playing: bool,
    muted: bool,
    play_refusals: u32,
    stall_at: Option<f64>,
    seeks: Vec<f64>,
}

/// A scripted playback surface.
#[derive(Debug)]
pub struct SimSurface {
    state: Mutex<SurfaceState>,
    metadata_ready: Notify,
}

impl SimSurface {
    /// A surface whose metadata is already loaded.
    pub fn new(width: u32, height: u32, duration_secs: f64) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SurfaceState {
                metadata: MediaMetadata {
                    width,
                    height,
                    duration_secs,
                },
                metadata_loaded: true,
                position: 0.0,
                playing: false,
                muted: false,
                play_refusals: 0,
                stall_at: None,
                seeks: Vec::new(),
            }),
            metadata_ready: Notify::new(),
        })
    }

    /// A surface whose metadata only becomes available once
    /// [`SimSurface::load_metadata`] is called.
    pub fn with_deferred_metadata(width: u32, height: u32, duration_secs: f64) -> Arc<Self> {
        let surface = Self::new(width, height, duration_secs);
        surface.lock().metadata_loaded = false;
        surface
    }

    /// Mark metadata as loaded and wake pending waiters.
    pub fn load_metadata(&self) {
        self.lock().metadata_loaded = true;
        self.metadata_ready.notify_waiters();
    }

    /// Refuse the next `n` play requests.
    pub fn refuse_next_plays(&self, n: u32) {
        self.lock().play_refusals = n;
    }

    /// Freeze playback advancement once position reaches `position_secs`,
    /// emulating a stalled network stream.
    pub fn stall_at(&self, position_secs: f64) {
        self.lock().stall_at = Some(position_secs);
    }

    /// Positions of all seeks issued so far.
    pub fn seek_history(&self) -> Vec<f64> {
        self.lock().seeks.clone()
    }

    /// Advance the playhead by `step_secs` of playback time. Only moves
    /// while playing and not stalled; stops at the end of the media.
    fn advance(&self, step_secs: f64) {
        let mut state = self.lock();
        if !state.playing {
            return;
        }
        if let Some(stall) = state.stall_at {
            if state.position >= stall {
                return;
            }
        }
        state.position = (state.position + step_secs).min(state.metadata.duration_secs);
        if state.position >= state.metadata.duration_secs {
            state.playing = false;
        }
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().expect("sim surface lock poisoned")
    }
}

#[async_trait]
impl MediaSurface for SimSurface {
    async fn wait_for_metadata(&self) -> VidpromptResult<MediaMetadata> {
        loop {
            let notified = self.metadata_ready.notified();
            {
                let state = self.lock();
                if state.metadata_loaded {
                    return Ok(state.metadata);
                }
            }
            notified.await;
        }
    }

    fn metadata(&self) -> Option<MediaMetadata> {
        let state = self.lock();
        state.metadata_loaded.then_some(state.metadata)
    }

    async fn seek(&self, position_secs: f64) -> VidpromptResult<()> {
        let mut state = self.lock();
        let clamped = position_secs.clamp(0.0, state.metadata.duration_secs);
        state.position = clamped;
        state.seeks.push(clamped);
        Ok(())
    }

    async fn play(&self) -> VidpromptResult<()> {
        let mut state = self.lock();
        if state.play_refusals > 0 {
            state.play_refusals -= 1;
            return Err(VidpromptError::media("playback request refused"));
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&self) {
        self.lock().playing = false;
    }

    fn position_secs(&self) -> f64 {
        self.lock().position
    }

    fn is_paused(&self) -> bool {
        !self.lock().playing
    }

    fn muted(&self) -> bool {
        self.lock().muted
    }

    fn set_muted(&self, muted: bool) {
        self.lock().muted = muted;
    }

    fn current_frame(&self) -> VideoFrame {
        let state = self.lock();
        VideoFrame {
            width: state.metadata.width,
            height: state.metadata.height,
            timestamp_secs: state.position,
        }
    }
}

/// Shared observation points for assertions on a finished run.
#[derive(Debug, Default)]
pub struct SimRecords {
    pub frames_drawn: AtomicU64,
    pub audio_routed: AtomicBool,
    pub audio_torn_down: AtomicBool,
    pub recorder_started: AtomicBool,
    pub recorder_stopped: AtomicBool,
}

/// Ticker that advances its surface by one frame interval per tick.
pub struct SimTicker {
    surface: Arc<SimSurface>,
    interval: Duration,
}

#[async_trait]
impl FrameTicker for SimTicker {
    async fn tick(&self) {
        tokio::time::sleep(self.interval).await;
        self.surface.advance(self.interval.as_secs_f64());
    }
}

struct SimCaptureSurface {
    width: u32,
    height: u32,
    frames: AtomicU64,
    records: Arc<SimRecords>,
}

impl CaptureSurface for SimCaptureSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw(&self, _frame: &VideoFrame) {
        self.frames.fetch_add(1, Ordering::Relaxed);
        self.records.frames_drawn.fetch_add(1, Ordering::Relaxed);
    }

    fn frames_drawn(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

struct SimAudioGraph {
    available: bool,
    routed: bool,
    records: Arc<SimRecords>,
}

impl AudioGraph for SimAudioGraph {
    fn route_from(&mut self, _surface: &dyn MediaSurface) -> VidpromptResult<()> {
        if !self.available {
            return Err(VidpromptError::media(
                "audio routing unsupported in this host",
            ));
        }
        self.routed = true;
        self.records.audio_routed.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn has_audio(&self) -> bool {
        self.routed
    }

    fn teardown(&mut self) {
        self.routed = false;
        self.records.audio_torn_down.store(true, Ordering::Relaxed);
    }
}

struct SimRecorder {
    config: RecorderConfig,
    recording: bool,
    pending_error: Arc<Mutex<Option<String>>>,
    records: Arc<SimRecords>,
}

#[async_trait]
impl ContainerRecorder for SimRecorder {
    fn start(&mut self) -> VidpromptResult<()> {
        tracing::debug!(fps = self.config.fps, mime = %self.config.mime, "Sim recorder started");
        self.recording = true;
        self.records.recorder_started.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn stop(&mut self) -> VidpromptResult<RecordedMedia> {
        self.recording = false;
        self.records.recorder_stopped.store(true, Ordering::Relaxed);
        let frames = self.records.frames_drawn.load(Ordering::Relaxed);
        Ok(RecordedMedia {
            mime: self.config.mime.clone(),
            audio_tracks: if self.config.with_audio { 1 } else { 0 },
            // Encodes the frame count so tests can inspect "file" content.
            bytes: frames.to_le_bytes().to_vec(),
        })
    }

    fn take_error(&mut self) -> Option<String> {
        self.pending_error
            .lock()
            .expect("sim recorder lock poisoned")
            .take()
    }

    fn is_recording(&self) -> bool {
        self.recording
    }
}

/// Deterministic host over one [`SimSurface`].
pub struct SimMediaHost {
    surface: Arc<SimSurface>,
    audio_available: AtomicBool,
    recorder_error: Arc<Mutex<Option<String>>>,
    records: Arc<SimRecords>,
}

impl SimMediaHost {
    pub fn new(surface: Arc<SimSurface>) -> Self {
        Self {
            surface,
            audio_available: AtomicBool::new(true),
            recorder_error: Arc::new(Mutex::new(None)),
            records: Arc::new(SimRecords::default()),
        }
    }

    /// Make future audio graphs fail to route (unsupported environment).
    pub fn set_audio_available(&self, available: bool) {
        self.audio_available.store(available, Ordering::Relaxed);
    }

    /// Arrange for the active recorder to report an asynchronous error.
    pub fn inject_recorder_error(&self, message: impl Into<String>) {
        *self
            .recorder_error
            .lock()
            .expect("sim recorder lock poisoned") = Some(message.into());
    }

    pub fn records(&self) -> Arc<SimRecords> {
        self.records.clone()
    }
}

impl MediaHost for SimMediaHost {
    fn create_capture_surface(
        &self,
        width: u32,
        height: u32,
    ) -> VidpromptResult<Box<dyn CaptureSurface>> {
        Ok(Box::new(SimCaptureSurface {
            width,
            height,
            frames: AtomicU64::new(0),
            records: self.records.clone(),
        }))
    }

    fn create_ticker(&self, fps: u32) -> Box<dyn FrameTicker> {
        Box::new(SimTicker {
            surface: self.surface.clone(),
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
        })
    }

    fn create_audio_graph(&self) -> VidpromptResult<Box<dyn AudioGraph>> {
        Ok(Box::new(SimAudioGraph {
            available: self.audio_available.load(Ordering::Relaxed),
            routed: false,
            records: self.records.clone(),
        }))
    }

    fn create_recorder(
        &self,
        config: RecorderConfig,
    ) -> VidpromptResult<Box<dyn ContainerRecorder>> {
        Ok(Box::new(SimRecorder {
            config,
            recording: false,
            pending_error: self.recorder_error.clone(),
            records: self.records.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticker_advances_surface_only_while_playing() {
        let surface = SimSurface::new(640, 360, 10.0);
        let host = SimMediaHost::new(surface.clone());
        let ticker = host.create_ticker(30);

        ticker.tick().await;
        assert_eq!(surface.position_secs(), 0.0);

        surface.play().await.unwrap();
        for _ in 0..30 {
            ticker.tick().await;
        }
        assert!((surface.position_secs() - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn deferred_metadata_blocks_until_loaded() {
        let surface = SimSurface::with_deferred_metadata(640, 360, 10.0);
        assert!(surface.metadata().is_none());

        let waiter = {
            let surface = surface.clone();
            tokio::spawn(async move { surface.wait_for_metadata().await })
        };
        tokio::task::yield_now().await;
        surface.load_metadata();

        let metadata = waiter.await.unwrap().unwrap();
        assert_eq!(metadata.width, 640);
        assert!((metadata.duration_secs - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn recorder_reports_audio_tracks_and_frame_count() {
        let surface = SimSurface::new(640, 360, 10.0);
        let host = SimMediaHost::new(surface);
        let capture = host.create_capture_surface(640, 360).unwrap();
        let mut recorder = host
            .create_recorder(RecorderConfig {
                fps: 30,
                width: 640,
                height: 360,
                with_audio: true,
                mime: "video/webm".to_string(),
            })
            .unwrap();

        recorder.start().unwrap();
        capture.draw(&VideoFrame {
            width: 640,
            height: 360,
            timestamp_secs: 0.5,
        });
        let media = recorder.stop().await.unwrap();

        assert_eq!(media.audio_tracks, 1);
        assert_eq!(media.bytes, 1u64.to_le_bytes().to_vec());
    }
}
