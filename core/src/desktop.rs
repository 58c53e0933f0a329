//! Interfaces of the window system, the screen and the input devices.

use {
    crate::matcher::MatchPosition,
    image::RgbaImage,
    std::{fmt::Debug, thread, time::Duration},
};

/// Window rectangle in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// A minimized or destroyed window usually reports an empty rectangle.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Whether a position relative to the top left corner lies inside the rectangle.
    pub fn contains_relative(&self, position: MatchPosition) -> bool {
        i64::from(position.x) < i64::from(self.width())
            && i64::from(position.y) < i64::from(self.height())
    }

    /// Translates a position relative to the top left corner to screen coordinates.
    pub fn to_absolute(&self, position: MatchPosition) -> (i32, i32) {
        (
            self.left.saturating_add_unsigned(position.x),
            self.top.saturating_add_unsigned(position.y),
        )
    }
}

/// A key that can be pressed by an [InputDevice].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Return,
    Shift,
    /// Key producing the character on the current layout.
    Char(char),
    /// Platform specific key code (a virtual key code on Windows).
    Code(u32),
}

/// Result of a keymap lookup: the key to press and whether shift must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub key: Key,
    pub shift: bool,
}

impl KeyStroke {
    pub fn new(key: Key, shift: bool) -> Self {
        Self { key, shift }
    }
}

pub trait WindowSystem {
    /// Opaque handle of a top level window.
    type Window: Debug;

    /// Finds a top level window by its class name.
    ///
    /// Returns `Ok(None)` if there is no such window.
    fn find_window(&self, class_name: &str) -> anyhow::Result<Option<Self::Window>>;

    /// Returns the current rectangle of the window.
    ///
    /// Fails if the window no longer exists.
    fn window_rect(&self, window: &Self::Window) -> anyhow::Result<Rect>;

    /// Restores the window if it's minimized and brings it to the foreground.
    fn bring_to_front(&self, window: &Self::Window) -> anyhow::Result<()>;
}

pub trait ScreenCapture {
    /// Captures the screen contents inside `rect`.
    fn capture(&self, rect: Rect) -> anyhow::Result<RgbaImage>;
}

pub trait InputDevice {
    /// Looks up the key producing `ch` on the current keyboard layout.
    fn key_stroke(&self, ch: char) -> Option<KeyStroke>;
    fn key_down(&self, key: Key) -> anyhow::Result<()>;
    fn key_up(&self, key: Key) -> anyhow::Result<()>;
    /// Moves the pointer to absolute screen coordinates.
    fn move_pointer(&self, x: i32, y: i32) -> anyhow::Result<()>;
    /// Presses the primary mouse button.
    fn button_down(&self) -> anyhow::Result<()>;
    /// Releases the primary mouse button.
    fn button_up(&self) -> anyhow::Result<()>;

    /// Gives the target application time to process the input sent so far.
    fn pause(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Everything a login run needs from the desktop.
pub trait Desktop: WindowSystem + ScreenCapture + InputDevice {}

impl<T: WindowSystem + ScreenCapture + InputDevice> Desktop for T {}

#[test]
fn rect_translation() {
    let rect = Rect::new(100, 50, 400, 250);
    assert_eq!(rect.width(), 300);
    assert_eq!(rect.height(), 200);
    assert!(!rect.is_empty());
    assert!(rect.contains_relative(MatchPosition::new(299, 199)));
    assert!(!rect.contains_relative(MatchPosition::new(300, 10)));
    assert!(!rect.contains_relative(MatchPosition::new(10, 200)));
    assert_eq!(rect.to_absolute(MatchPosition::new(15, 20)), (115, 70));

    let negative = Rect::new(-1920, -20, -1000, 500);
    assert_eq!(negative.to_absolute(MatchPosition::new(20, 30)), (-1900, 10));

    assert!(Rect::new(10, 10, 10, 200).is_empty());
    assert!(Rect::new(10, 10, 200, 5).is_empty());
}
