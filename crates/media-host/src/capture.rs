//! Capture surface and frame tick contracts.

use async_trait::async_trait;

use crate::surface::VideoFrame;

/// An off-screen surface frames are drawn onto during capture.
///
/// Sized exactly to the source's native pixel dimensions; the composed
/// output stream is sourced from this surface's pixel content.
pub trait CaptureSurface: Send + Sync {
    /// Surface dimensions as `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Draw one source frame at native resolution.
    fn draw(&self, frame: &VideoFrame);

    /// Number of frames drawn so far.
    fn frames_drawn(&self) -> u64;
}

/// Display-refresh tick source driving the capture loop.
#[async_trait]
pub trait FrameTicker: Send + Sync {
    /// Suspend until the next display-refresh tick.
    async fn tick(&self);
}
