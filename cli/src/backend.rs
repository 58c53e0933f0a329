use {
    anyhow::Context as _,
    autologin::{InputDevice, Key, KeyStroke, Rect, ScreenCapture, WindowSystem},
    autologin_desktop::{Button, Context, Window},
    derive_more::Deref,
    image::RgbaImage,
};

/// The real desktop.
#[derive(Clone, Deref)]
pub struct DesktopBackend(Context);

impl DesktopBackend {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self(Context::new().context(
            "failed to connect to the window system",
        )?))
    }
}

fn to_desktop_key(key: Key) -> autologin_desktop::Key {
    use autologin_desktop::Key as K;
    match key {
        Key::Tab => K::Tab,
        Key::Return => K::Return,
        Key::Shift => K::Shift,
        Key::Char(ch) => K::Unicode(ch),
        Key::Code(code) => K::Other(code),
    }
}

fn from_desktop_key(key: autologin_desktop::Key) -> Option<Key> {
    use autologin_desktop::Key as K;
    match key {
        K::Unicode(ch) => Some(Key::Char(ch)),
        K::Other(code) => Some(Key::Code(code)),
        K::Tab => Some(Key::Tab),
        K::Return => Some(Key::Return),
        K::Shift => Some(Key::Shift),
        _ => None,
    }
}

impl WindowSystem for DesktopBackend {
    type Window = Window;

    fn find_window(&self, class_name: &str) -> anyhow::Result<Option<Window>> {
        self.find_window_by_class(class_name)
    }

    fn window_rect(&self, window: &Window) -> anyhow::Result<Rect> {
        let (x, y, width, height) = window.geometry()?;
        Ok(Rect::new(
            x,
            y,
            x.saturating_add_unsigned(width),
            y.saturating_add_unsigned(height),
        ))
    }

    fn bring_to_front(&self, window: &Window) -> anyhow::Result<()> {
        window.activate()
    }
}

impl ScreenCapture for DesktopBackend {
    fn capture(&self, rect: Rect) -> anyhow::Result<RgbaImage> {
        let width = u32::try_from(rect.width()).context("negative rectangle width")?;
        let height = u32::try_from(rect.height()).context("negative rectangle height")?;
        self.capture_region(rect.left, rect.top, width, height)
    }
}

impl InputDevice for DesktopBackend {
    fn key_stroke(&self, ch: char) -> Option<KeyStroke> {
        let (key, shift) = self.key_for_char(ch)?;
        Some(KeyStroke::new(from_desktop_key(key)?, shift))
    }

    fn key_down(&self, key: Key) -> anyhow::Result<()> {
        self.0.key_down(to_desktop_key(key))
    }

    fn key_up(&self, key: Key) -> anyhow::Result<()> {
        self.0.key_up(to_desktop_key(key))
    }

    fn move_pointer(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.mouse_move_global(x, y)
    }

    fn button_down(&self) -> anyhow::Result<()> {
        self.mouse_down(Button::Left)
    }

    fn button_up(&self) -> anyhow::Result<()> {
        self.mouse_up(Button::Left)
    }
}
