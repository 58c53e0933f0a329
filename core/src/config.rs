use std::{num::NonZeroU32, path::PathBuf, time::Duration};

/// Window class of the target application.
pub const WINDOW_CLASS: &str = "SDL_app";
/// Reference image of the login button, relative to the working directory.
pub const BUTTON_TEMPLATE: &str = "button.png";
/// Reference image of the overlay close button, relative to the working directory.
pub const CROSS_TEMPLATE: &str = "cross.png";
/// Minimal similarity (0..=1) for a sub-region to be accepted as a match.
pub const TEMPLATE_THRESHOLD: f64 = 0.86;
/// Distance in pixels between candidate positions of the template search.
pub const SEARCH_STRIDE: NonZeroU32 = match NonZeroU32::new(5) {
    Some(stride) => stride,
    None => unreachable!(),
};
/// Number of overlay dismissal rounds before giving up.
pub const MAX_RETRIES: u32 = 3;
/// Delay after each typed character.
pub const TYPE_DELAY: Duration = Duration::from_millis(20);
/// Delay that lets the target application handle a focus change.
pub const FOCUS_DELAY: Duration = Duration::from_millis(100);
/// Delay before the next retry round, lets the UI settle.
pub const RETRY_DELAY: Duration = Duration::from_millis(300);

/// Parameters of a login run.
///
/// The defaults are the fixed values the tool runs with. The `with_*` methods
/// exist for embedding and tests (e.g. to remove all delays).
#[derive(Debug, Clone, PartialEq)]
pub struct LoginConfig {
    pub window_class: String,
    pub button_template: PathBuf,
    pub cross_template: PathBuf,
    pub threshold: f64,
    pub stride: NonZeroU32,
    pub max_retries: u32,
    pub type_delay: Duration,
    pub focus_delay: Duration,
    pub retry_delay: Duration,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            window_class: WINDOW_CLASS.into(),
            button_template: BUTTON_TEMPLATE.into(),
            cross_template: CROSS_TEMPLATE.into(),
            threshold: TEMPLATE_THRESHOLD,
            stride: SEARCH_STRIDE,
            max_retries: MAX_RETRIES,
            type_delay: TYPE_DELAY,
            focus_delay: FOCUS_DELAY,
            retry_delay: RETRY_DELAY,
        }
    }
}

impl LoginConfig {
    pub fn with_window_class(mut self, class_name: impl Into<String>) -> Self {
        self.window_class = class_name.into();
        self
    }

    pub fn with_button_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.button_template = path.into();
        self
    }

    pub fn with_cross_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.cross_template = path.into();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_stride(mut self, stride: NonZeroU32) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_type_delay(mut self, delay: Duration) -> Self {
        self.type_delay = delay;
        self
    }

    pub fn with_focus_delay(mut self, delay: Duration) -> Self {
        self.focus_delay = delay;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sets all delays to zero.
    pub fn without_delays(self) -> Self {
        self.with_type_delay(Duration::ZERO)
            .with_focus_delay(Duration::ZERO)
            .with_retry_delay(Duration::ZERO)
    }
}

#[test]
fn default_config() {
    let config = LoginConfig::default();
    assert_eq!(config.window_class, "SDL_app");
    assert_eq!(config.button_template, PathBuf::from("button.png"));
    assert_eq!(config.cross_template, PathBuf::from("cross.png"));
    assert_eq!(config.threshold, 0.86);
    assert_eq!(config.stride.get(), 5);
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.type_delay, Duration::from_millis(20));
    assert_eq!(config.focus_delay, Duration::from_millis(100));
    assert_eq!(config.retry_delay, Duration::from_millis(300));

    let config = config
        .without_delays()
        .with_max_retries(5)
        .with_stride(NonZeroU32::MIN);
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.stride.get(), 1);
    assert_eq!(config.type_delay, Duration::ZERO);
    assert_eq!(config.focus_delay, Duration::ZERO);
    assert_eq!(config.retry_delay, Duration::ZERO);
}
