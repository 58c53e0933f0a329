#[cfg(all(unix, not(target_os = "macos")))]
mod linux;

#[cfg(all(unix, not(target_os = "macos")))]
use crate::linux as imp;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
use crate::windows as imp;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
use crate::macos as imp;

mod window;

pub use {
    crate::window::Window,
    enigo::{Button, Key},
};

use {
    anyhow::{anyhow, ensure, Context as _},
    enigo::{Coordinate, Direction, Enigo, Keyboard, Mouse},
    image::{imageops, RgbaImage},
    std::sync::{Arc, Mutex, MutexGuard},
    tracing::trace,
};

struct ContextData {
    imp: imp::Context,
    enigo: Mutex<Enigo>,
}

/// Connection to the window system and the input devices.
#[derive(Clone)]
pub struct Context(Arc<ContextData>);

impl Context {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self(Arc::new(ContextData {
            imp: imp::Context::new()?,
            enigo: Mutex::new(Enigo::new(&enigo::Settings::default())?),
        })))
    }

    pub fn all_windows(&self) -> anyhow::Result<Vec<Window>> {
        let windows = xcap::Window::all()?
            .into_iter()
            .filter_map(|inner| match Window::new(self.clone(), inner) {
                Ok(window) => Some(window),
                Err(err) => {
                    // The window may have been destroyed while enumerating.
                    trace!("skipping window: {:?}", err);
                    None
                }
            })
            .collect();
        Ok(windows)
    }

    /// Finds a top level window by its class name.
    ///
    /// On macOS, where windows have no class, the application name is used instead.
    pub fn find_window_by_class(&self, class_name: &str) -> anyhow::Result<Option<Window>> {
        let window = self.0.imp.find_window_by_class(self, class_name)?;
        trace!("window with class {:?}: {:?}", class_name, window);
        Ok(window)
    }

    fn enigo(&self) -> anyhow::Result<MutexGuard<'_, Enigo>> {
        self.0
            .enigo
            .lock()
            .map_err(|_| anyhow!("input device lock is poisoned"))
    }

    /// Returns the key producing `ch` on the current keyboard layout and
    /// whether shift must be held.
    pub fn key_for_char(&self, ch: char) -> Option<(Key, bool)> {
        self.0.imp.key_for_char(ch)
    }

    pub fn key_down(&self, key: Key) -> anyhow::Result<()> {
        self.enigo()?.key(key, Direction::Press)?;
        Ok(())
    }

    pub fn key_up(&self, key: Key) -> anyhow::Result<()> {
        self.enigo()?.key(key, Direction::Release)?;
        Ok(())
    }

    pub fn mouse_down(&self, button: Button) -> anyhow::Result<()> {
        self.enigo()?.button(button, Direction::Press)?;
        Ok(())
    }

    pub fn mouse_up(&self, button: Button) -> anyhow::Result<()> {
        self.enigo()?.button(button, Direction::Release)?;
        Ok(())
    }

    pub fn mouse_move_global(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.enigo()?.move_mouse(x, y, Coordinate::Abs)?;
        Ok(())
    }

    /// Captures a screen area given in absolute coordinates.
    ///
    /// The area is captured from the monitor containing its top left corner
    /// and cut at the monitor's edges.
    pub fn capture_region(
        &self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RgbaImage> {
        let monitor = xcap::Monitor::from_point(x, y)
            .with_context(|| format!("no monitor at ({}, {})", x, y))?;
        let image = monitor.capture_image()?;
        let left = x.saturating_sub(monitor.x()?).max(0) as u32;
        let top = y.saturating_sub(monitor.y()?).max(0) as u32;
        let width = width.min(image.width().saturating_sub(left));
        let height = height.min(image.height().saturating_sub(top));
        ensure!(
            width > 0 && height > 0,
            "region at ({}, {}) is outside of the monitor",
            x,
            y
        );
        Ok(imageops::crop_imm(&image, left, top, width, height).to_image())
    }
}
