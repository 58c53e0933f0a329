#![allow(dead_code)]

use {
    anyhow::{bail, Context as _},
    autologin::{
        ImageSource, InputDevice, Key, KeyStroke, LoginConfig, Rect, ScreenCapture, WindowSystem,
    },
    image::{imageops, DynamicImage, Rgb, RgbImage, Rgba, RgbaImage},
    std::{
        cell::{Cell, RefCell},
        collections::{BTreeMap, VecDeque},
        path::{Path, PathBuf},
        time::Duration,
    },
};

pub const BUTTON: &str = "button.png";
pub const CROSS: &str = "cross.png";
pub const WINDOW_CLASS: &str = "SDL_app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FindWindow(String),
    BringToFront,
    Capture(Rect),
    KeyDown(Key),
    KeyUp(Key),
    MovePointer(i32, i32),
    ButtonDown,
    ButtonUp,
    Pause(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeWindow;

/// Scripted desktop with a single window.
///
/// Every capture returns the next scripted frame; the last frame repeats
/// forever.
pub struct FakeDesktop {
    rect: Option<Rect>,
    frames: RefCell<VecDeque<RgbaImage>>,
    captures_before_close: Cell<Option<usize>>,
    events: RefCell<Vec<Event>>,
}

impl FakeDesktop {
    pub fn new(rect: Rect, frames: Vec<RgbaImage>) -> Self {
        assert!(!frames.is_empty());
        Self {
            rect: Some(rect),
            frames: RefCell::new(frames.into()),
            captures_before_close: Cell::new(None),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn without_window() -> Self {
        Self {
            rect: None,
            frames: RefCell::new(VecDeque::new()),
            captures_before_close: Cell::new(None),
            events: RefCell::new(Vec::new()),
        }
    }

    /// The window disappears after `count` captures.
    pub fn close_after_captures(self, count: usize) -> Self {
        self.captures_before_close.set(Some(count));
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn captures(&self) -> usize {
        self.count(|e| matches!(e, Event::Capture(_)))
    }

    pub fn clicks(&self) -> Vec<(i32, i32)> {
        let events = self.events.borrow();
        let mut clicks = Vec::new();
        let mut pointer = None;
        for event in events.iter() {
            match event {
                Event::MovePointer(x, y) => pointer = Some((*x, *y)),
                Event::ButtonDown => clicks.push(pointer.expect("click without pointer move")),
                _ => {}
            }
        }
        clicks
    }

    /// Reconstructs typed input from key presses.
    pub fn typed(&self) -> String {
        let events = self.events.borrow();
        let mut shift = false;
        let mut text = String::new();
        for event in events.iter() {
            match event {
                Event::KeyDown(Key::Shift) => shift = true,
                Event::KeyUp(Key::Shift) => shift = false,
                Event::KeyDown(Key::Tab) => text.push('\t'),
                Event::KeyDown(Key::Return) => text.push('\n'),
                Event::KeyDown(Key::Char(ch)) if shift => text.extend(ch.to_uppercase()),
                Event::KeyDown(Key::Char(ch)) => text.push(*ch),
                _ => {}
            }
        }
        text
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Pause(duration) => Some(*duration),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| f(e)).count()
    }

    fn is_open(&self) -> bool {
        match self.captures_before_close.get() {
            Some(limit) => self.captures() < limit,
            None => true,
        }
    }

    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl WindowSystem for FakeDesktop {
    type Window = FakeWindow;

    fn find_window(&self, class_name: &str) -> anyhow::Result<Option<FakeWindow>> {
        self.record(Event::FindWindow(class_name.into()));
        Ok((self.rect.is_some() && class_name == WINDOW_CLASS).then_some(FakeWindow))
    }

    fn window_rect(&self, _window: &FakeWindow) -> anyhow::Result<Rect> {
        if !self.is_open() {
            bail!("window was closed");
        }
        self.rect.context("no window")
    }

    fn bring_to_front(&self, _window: &FakeWindow) -> anyhow::Result<()> {
        self.record(Event::BringToFront);
        Ok(())
    }
}

impl ScreenCapture for FakeDesktop {
    fn capture(&self, rect: Rect) -> anyhow::Result<RgbaImage> {
        self.record(Event::Capture(rect));
        let mut frames = self.frames.borrow_mut();
        let frame = if frames.len() > 1 {
            frames.pop_front()
        } else {
            frames.front().cloned()
        };
        frame.context("no frames")
    }
}

impl InputDevice for FakeDesktop {
    fn key_stroke(&self, ch: char) -> Option<KeyStroke> {
        if ch.is_ascii_uppercase() {
            Some(KeyStroke::new(Key::Char(ch.to_ascii_lowercase()), true))
        } else if ch.is_ascii_graphic() || ch == ' ' {
            Some(KeyStroke::new(Key::Char(ch), false))
        } else {
            None
        }
    }

    fn key_down(&self, key: Key) -> anyhow::Result<()> {
        self.record(Event::KeyDown(key));
        Ok(())
    }

    fn key_up(&self, key: Key) -> anyhow::Result<()> {
        self.record(Event::KeyUp(key));
        Ok(())
    }

    fn move_pointer(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.record(Event::MovePointer(x, y));
        Ok(())
    }

    fn button_down(&self) -> anyhow::Result<()> {
        self.record(Event::ButtonDown);
        Ok(())
    }

    fn button_up(&self) -> anyhow::Result<()> {
        self.record(Event::ButtonUp);
        Ok(())
    }

    // Nothing actually sleeps. Zero pauses are not recorded, so tests without
    // delays see only input events.
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            self.record(Event::Pause(duration));
        }
    }
}

/// In-memory templates with per-path read counters.
#[derive(Default)]
pub struct MemorySource {
    images: BTreeMap<PathBuf, DynamicImage>,
    reads: RefCell<BTreeMap<PathBuf, usize>>,
}

impl MemorySource {
    pub fn with(mut self, path: &str, image: RgbImage) -> Self {
        self.images
            .insert(path.into(), DynamicImage::ImageRgb8(image));
        self
    }

    pub fn reads(&self, path: &str) -> usize {
        self.reads
            .borrow()
            .get(Path::new(path))
            .copied()
            .unwrap_or(0)
    }
}

impl ImageSource for MemorySource {
    fn open(&self, path: &Path) -> anyhow::Result<Option<DynamicImage>> {
        *self.reads.borrow_mut().entry(path.into()).or_default() += 1;
        Ok(self.images.get(path).cloned())
    }
}

/// Deterministic pseudo-random pattern.
pub fn noise(width: u32, height: u32, seed: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([0, 1, 2].map(|c| {
            let mut h = x.wrapping_mul(0x9E37_79B1)
                ^ y.wrapping_mul(0x85EB_CA77)
                ^ (c + 3 * seed).wrapping_mul(0xC2B2_AE3D);
            h ^= h >> 15;
            h = h.wrapping_mul(0x2C1B_3C6D);
            h ^= h >> 12;
            (h % 251) as u8
        }))
    })
}

pub fn button_template() -> RgbImage {
    noise(30, 12, 1)
}

pub fn cross_template() -> RgbImage {
    noise(8, 8, 2)
}

pub fn templates() -> MemorySource {
    MemorySource::default()
        .with(BUTTON, button_template())
        .with(CROSS, cross_template())
}

pub const WINDOW_RECT: Rect = Rect {
    left: 300,
    top: 200,
    right: 500,
    bottom: 320,
};

/// A frame of the window with the given templates at stride-aligned offsets.
pub fn frame(placements: &[(&RgbImage, u32, u32)]) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(200, 120, Rgba([40, 40, 60, 255]));
    for (template, x, y) in placements {
        let template = DynamicImage::ImageRgb8((*template).clone()).into_rgba8();
        imageops::replace(&mut frame, &template, i64::from(*x), i64::from(*y));
    }
    frame
}

pub fn empty_frame() -> RgbaImage {
    frame(&[])
}

pub fn button_frame() -> RgbaImage {
    frame(&[(&button_template(), 80, 90)])
}

/// Overlay with a close button hiding the login button.
pub fn overlay_frame() -> RgbaImage {
    frame(&[(&cross_template(), 150, 10)])
}

pub fn config() -> LoginConfig {
    LoginConfig::default()
        .with_button_template(BUTTON)
        .with_cross_template(CROSS)
        .without_delays()
}
