use {
    crate::desktop::{Rect, ScreenCapture, WindowSystem},
    anyhow::{ensure, Context as _},
    derive_more::Deref,
    image::{DynamicImage, RgbImage, RgbaImage},
    tracing::debug,
};

/// Captured contents of the target window.
///
/// A capture is only a snapshot: the window may change at any time after it
/// was taken.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct CapturedRegion(RgbImage);

impl CapturedRegion {
    pub fn new(image: RgbImage) -> Self {
        Self(image)
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self(DynamicImage::ImageRgba8(image).into_rgb8())
    }
}

/// Captures the target window through the window system and the screen.
pub struct ScreenProbe<'a, D> {
    desktop: &'a D,
}

impl<'a, D: WindowSystem + ScreenCapture> ScreenProbe<'a, D> {
    pub fn new(desktop: &'a D) -> Self {
        Self { desktop }
    }

    pub fn window_rect(&self, window: &D::Window) -> anyhow::Result<Rect> {
        self.desktop
            .window_rect(window)
            .with_context(|| format!("failed to get rectangle of window {:?}", window))
    }

    /// Captures the current on-screen contents of `window`.
    pub fn capture(&self, window: &D::Window) -> anyhow::Result<CapturedRegion> {
        let rect = self.window_rect(window)?;
        ensure!(!rect.is_empty(), "window rectangle is empty: {:?}", rect);
        let image = self
            .desktop
            .capture(rect)
            .with_context(|| format!("failed to capture {:?}", rect))?;
        debug!("captured {}x{} at {:?}", image.width(), image.height(), rect);
        Ok(CapturedRegion::from_rgba(image))
    }
}
