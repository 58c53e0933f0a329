//! The login state machine.
//!
//! ```text
//! Init -> CheckButton -> Success
//!                     -> RetryLoop -> Success
//!                                  -> Failed
//! ```
//!
//! Only a missing window aborts the run. Missing templates, failed clicks and
//! failed captures inside the retry loop are logged and folded into the
//! decision to retry.

use {
    crate::{
        action::{ActionExecutor, Credentials},
        config::LoginConfig,
        desktop::Desktop,
        matcher::{MatchPosition, TemplateMatcher},
        probe::{CapturedRegion, ScreenProbe},
        template::{FsImageSource, ImageSource, TemplateStore},
    },
    std::path::Path,
    thiserror::Error,
    tracing::{debug, error, info, warn},
};

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("window with class {class_name:?} not found")]
    WindowNotFound { class_name: String },
    #[error("failed to look up window with class {class_name:?}")]
    WindowLookup {
        class_name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to capture the login window")]
    InitialCapture(#[source] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginState {
    Init,
    CheckButton,
    RetryLoop,
    Success,
    Failed,
}

/// Terminal state of a login run.
///
/// `attempts` is the number of retry rounds that were run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginOutcome {
    Success { attempts: u32 },
    Failed { attempts: u32 },
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match *self {
            Self::Success { attempts } | Self::Failed { attempts } => attempts,
        }
    }
}

/// Progress of the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_retries: u32,
    success: bool,
}

impl RetryState {
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_retries,
            success: false,
        }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn succeeded(&self) -> bool {
        self.success
    }

    pub fn should_continue(&self) -> bool {
        !self.success && self.attempt < self.max_retries
    }

    pub fn record_failure(&mut self) {
        self.attempt += 1;
    }

    pub fn record_success(&mut self) {
        self.success = true;
    }
}

pub struct LoginOrchestrator<'a, D, S = FsImageSource> {
    desktop: &'a D,
    templates: TemplateStore<S>,
    matcher: TemplateMatcher,
    config: LoginConfig,
    state: LoginState,
}

impl<'a, D: Desktop, S: ImageSource> LoginOrchestrator<'a, D, S> {
    pub fn new(desktop: &'a D, templates: TemplateStore<S>, config: LoginConfig) -> Self {
        Self {
            desktop,
            templates,
            matcher: TemplateMatcher::new(config.stride),
            config,
            state: LoginState::Init,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn templates(&self) -> &TemplateStore<S> {
        &self.templates
    }

    /// Runs the login sequence to completion.
    ///
    /// Returns an error only if the window can't be found or captured at all.
    /// An exhausted retry budget is reported as [LoginOutcome::Failed].
    pub fn run(&mut self, credentials: &Credentials) -> Result<LoginOutcome, LoginError> {
        self.transition(LoginState::Init);
        let window = self.find_window()?;
        let probe = ScreenProbe::new(self.desktop);
        let region = probe
            .capture(&window)
            .map_err(LoginError::InitialCapture)?;

        self.transition(LoginState::CheckButton);
        if self.button_visible(&region) {
            info!("login button detected, entering credentials");
            return Ok(self.submit(credentials, 0));
        }

        self.transition(LoginState::RetryLoop);
        let actions = ActionExecutor::new(self.desktop, &self.config);
        let mut retry = RetryState::new(self.config.max_retries);
        let mut region = Some(region);
        while retry.should_continue() {
            if let Some(region) = &region {
                self.dismiss_overlay(&actions, &window, region);
            }
            region = match probe.capture(&window) {
                Ok(region) => Some(region),
                Err(err) => {
                    warn!("failed to capture the login window: {:?}", err);
                    None
                }
            };
            if region.as_ref().is_some_and(|r| self.button_visible(r)) {
                info!(
                    "login button detected after closing overlay, entering credentials (attempt {})",
                    retry.attempt() + 1
                );
                retry.record_success();
                break;
            }
            retry.record_failure();
            warn!(
                "login button not detected, retrying ({}/{})",
                retry.attempt(),
                retry.max_retries()
            );
            self.desktop.pause(self.config.retry_delay);
        }

        if retry.succeeded() {
            return Ok(self.submit(credentials, retry.attempt() + 1));
        }
        // The exit status of the tool is not affected by this outcome.
        error!(
            "login button not detected after {} retries, giving up",
            retry.max_retries()
        );
        self.transition(LoginState::Failed);
        Ok(LoginOutcome::Failed {
            attempts: retry.attempt(),
        })
    }

    fn transition(&mut self, state: LoginState) {
        debug!("login state: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn find_window(&self) -> Result<D::Window, LoginError> {
        let class_name = &self.config.window_class;
        let window = self
            .desktop
            .find_window(class_name)
            .map_err(|source| LoginError::WindowLookup {
                class_name: class_name.clone(),
                source,
            })?
            .ok_or_else(|| LoginError::WindowNotFound {
                class_name: class_name.clone(),
            })?;
        debug!("found window {:?}", window);
        if let Err(err) = self.desktop.bring_to_front(&window) {
            warn!("failed to bring window to the foreground: {:?}", err);
        }
        self.desktop.pause(self.config.focus_delay);
        Ok(window)
    }

    fn button_visible(&mut self, region: &CapturedRegion) -> bool {
        let path = self.config.button_template.clone();
        self.template_position(&path, region).is_some()
    }

    fn template_position(
        &mut self,
        path: &Path,
        region: &CapturedRegion,
    ) -> Option<MatchPosition> {
        let template = self.templates.load(path)?;
        let position = self.matcher.find(region, &template, self.config.threshold);
        debug!("template {:?} position: {:?}", path, position);
        position
    }

    /// Clicks the overlay's close button if it's visible in `region`.
    fn dismiss_overlay(
        &mut self,
        actions: &ActionExecutor<'_, D>,
        window: &D::Window,
        region: &CapturedRegion,
    ) {
        let path = self.config.cross_template.clone();
        let Some(position) = self.template_position(&path, region) else {
            return;
        };
        match actions.click_at(window, position) {
            Ok(()) => {
                info!("clicked cross to close overlay");
                self.desktop.pause(self.config.focus_delay);
            }
            Err(err) => warn!("failed to close overlay: {:?}", err),
        }
    }

    fn submit(&mut self, credentials: &Credentials, attempts: u32) -> LoginOutcome {
        let actions = ActionExecutor::new(self.desktop, &self.config);
        match actions.enter_credentials(credentials) {
            Ok(()) => {
                self.transition(LoginState::Success);
                LoginOutcome::Success { attempts }
            }
            Err(err) => {
                error!("failed to enter credentials: {:?}", err);
                self.transition(LoginState::Failed);
                LoginOutcome::Failed { attempts }
            }
        }
    }
}

#[test]
fn retry_state_budget() {
    let mut retry = RetryState::new(2);
    assert!(retry.should_continue());
    retry.record_failure();
    assert!(retry.should_continue());
    retry.record_failure();
    assert!(!retry.should_continue());
    assert!(!retry.succeeded());
    assert_eq!(retry.attempt(), 2);

    let mut retry = RetryState::new(3);
    retry.record_success();
    assert!(!retry.should_continue());
    assert!(retry.succeeded());

    assert!(!RetryState::new(0).should_continue());
}
