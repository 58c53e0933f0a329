use {
    crate::{
        config::LoginConfig,
        desktop::{InputDevice, Key, Rect, WindowSystem},
        matcher::MatchPosition,
    },
    anyhow::anyhow,
    std::{fmt, time::Duration},
    thiserror::Error,
    tracing::{debug, info, warn},
};

/// Username and password for the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ClickError {
    /// The window was closed or minimized after it was captured.
    #[error("target window became invalid")]
    WindowInvalid(#[source] anyhow::Error),
    /// The window shrank after it was captured.
    #[error("position {position:?} is outside of window rectangle {rect:?}")]
    OutOfWindow { position: MatchPosition, rect: Rect },
    #[error("failed to inject mouse input")]
    Input(#[source] anyhow::Error),
}

/// Synthesizes keyboard and mouse input for the target window.
pub struct ActionExecutor<'a, D> {
    desktop: &'a D,
    type_delay: Duration,
    focus_delay: Duration,
}

impl<'a, D: WindowSystem + InputDevice> ActionExecutor<'a, D> {
    pub fn new(desktop: &'a D, config: &LoginConfig) -> Self {
        Self {
            desktop,
            type_delay: config.type_delay,
            focus_delay: config.focus_delay,
        }
    }

    /// Types `text` character by character.
    ///
    /// Characters that have no key on the current keyboard layout are skipped.
    pub fn type_text(&self, text: &str) -> anyhow::Result<()> {
        for (index, ch) in text.chars().enumerate() {
            // The text may be a password, so the character itself is never logged.
            let Some(stroke) = self.desktop.key_stroke(ch) else {
                warn!("no key for character at position {}, skipping", index);
                continue;
            };
            self.press_key(stroke.key, stroke.shift)?;
            self.desktop.pause(self.type_delay);
        }
        Ok(())
    }

    /// Presses and releases `key`, holding shift if `shift` is set.
    pub fn press_key(&self, key: Key, shift: bool) -> anyhow::Result<()> {
        if shift {
            self.desktop.key_down(Key::Shift)?;
        }
        let result = self
            .desktop
            .key_down(key)
            .and_then(|()| self.desktop.key_up(key));
        if shift {
            // Release shift even if the key itself failed.
            let released = self.desktop.key_up(Key::Shift);
            return result.and(released);
        }
        result
    }

    /// Clicks at `position` relative to the window's top left corner.
    ///
    /// The window rectangle is queried again, so the click lands correctly
    /// if the window has moved since it was captured.
    pub fn click_at(&self, window: &D::Window, position: MatchPosition) -> Result<(), ClickError> {
        let rect = self
            .desktop
            .window_rect(window)
            .map_err(ClickError::WindowInvalid)?;
        if rect.is_empty() {
            return Err(ClickError::WindowInvalid(anyhow!(
                "window rectangle is empty: {:?}",
                rect
            )));
        }
        if !rect.contains_relative(position) {
            return Err(ClickError::OutOfWindow { position, rect });
        }
        let (x, y) = rect.to_absolute(position);
        debug!("clicking at ({}, {})", x, y);
        self.desktop
            .move_pointer(x, y)
            .and_then(|()| self.desktop.button_down())
            .and_then(|()| self.desktop.button_up())
            .map_err(ClickError::Input)
    }

    /// Types the username, moves to the password field and submits the form.
    pub fn enter_credentials(&self, credentials: &Credentials) -> anyhow::Result<()> {
        self.type_text(&credentials.username)?;
        self.press_key(Key::Tab, false)?;
        // Characters typed right after Tab may reach the old field.
        self.desktop.pause(self.focus_delay);
        self.type_text(&credentials.password)?;
        self.press_key(Key::Return, false)?;
        info!("credentials entered");
        Ok(())
    }
}

#[test]
fn credentials_debug_hides_password() {
    let credentials = Credentials::new("alice", "hunter2");
    let text = format!("{:?}", credentials);
    assert!(text.contains("alice"));
    assert!(!text.contains("hunter2"));
}
