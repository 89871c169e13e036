//! Single-scene preview playback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use vidprompt_common::error::VidpromptResult;
use vidprompt_media_host::{FrameTicker, MediaSurface};
use vidprompt_scene_model::Scene;

/// Previews individual scenes on the shared playback surface.
///
/// Each preview spawns an observer task that pauses the surface the first
/// time its position reaches the scene's end. Starting a new preview
/// supersedes the previous observer, so a stale observer never pauses
/// playback it no longer owns.
pub struct ScenePlayer {
    surface: Arc<dyn MediaSurface>,
    ticker: Arc<dyn FrameTicker>,
    generation: Arc<AtomicU64>,
}

impl ScenePlayer {
    pub fn new(surface: Arc<dyn MediaSurface>, ticker: Arc<dyn FrameTicker>) -> Self {
        Self {
            surface,
            ticker,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Seek to the scene's start, begin playback, and watch for its end.
    ///
    /// A scene whose end is at or before its start pauses on the first
    /// tick: a no-op preview, not an error. The returned handle resolves
    /// when the observer exits.
    pub async fn play(&self, scene: &Scene) -> VidpromptResult<JoinHandle<()>> {
        let start = scene.start_secs();
        let end = scene.end_secs();

        self.surface.seek(start).await?;
        self.surface.play().await?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(start, end, "Previewing scene");

        let surface = self.surface.clone();
        let ticker = self.ticker.clone();
        let generations = self.generation.clone();
        Ok(tokio::spawn(async move {
            loop {
                ticker.tick().await;
                if generations.load(Ordering::SeqCst) != generation {
                    return;
                }
                if surface.position_secs() >= end {
                    surface.pause();
                    return;
                }
                if surface.is_paused() {
                    return;
                }
            }
        }))
    }

    /// Halt the current preview and retire its observer.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.surface.pause();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidprompt_media_host::sim::{SimMediaHost, SimSurface};
    use vidprompt_media_host::MediaHost;
    use vidprompt_scene_model::{SceneDraft, SceneList};

    fn scene(start: &str, end: &str) -> Scene {
        SceneList::seeded([SceneDraft {
            start_time: start.to_string(),
            end_time: end.to_string(),
            narration: "preview".to_string(),
        }])
        .snapshot()
        .remove(0)
    }

    fn player(surface: Arc<SimSurface>) -> ScenePlayer {
        let host = SimMediaHost::new(surface.clone());
        ScenePlayer::new(surface, Arc::from(host.create_ticker(30)))
    }

    #[tokio::test(start_paused = true)]
    async fn preview_pauses_at_scene_end() {
        let surface = SimSurface::new(640, 360, 30.0);
        let player = player(surface.clone());

        let observer = player.play(&scene("00:00:01", "00:00:03")).await.unwrap();
        observer.await.unwrap();

        assert!(surface.is_paused());
        let position = surface.position_secs();
        assert!(position >= 3.0 && position < 3.1, "position was {position}");
    }

    #[tokio::test(start_paused = true)]
    async fn inverted_scene_is_a_noop_preview() {
        let surface = SimSurface::new(640, 360, 30.0);
        let player = player(surface.clone());

        let observer = player.play(&scene("00:00:05", "00:00:02")).await.unwrap();
        observer.await.unwrap();

        assert!(surface.is_paused());
        assert!(surface.position_secs() < 5.1);
    }

    #[tokio::test(start_paused = true)]
    async fn new_preview_supersedes_old_observer() {
        let surface = SimSurface::new(640, 360, 30.0);
        let player = player(surface.clone());

        let stale = player.play(&scene("00:00:00", "00:00:20")).await.unwrap();
        let fresh = player.play(&scene("00:00:01", "00:00:02")).await.unwrap();

        stale.await.unwrap();
        fresh.await.unwrap();

        assert!(surface.is_paused());
        let position = surface.position_secs();
        assert!(position >= 2.0 && position < 2.2, "position was {position}");
    }
}
