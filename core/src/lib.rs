//! Automates a login form in a single desktop application window.
//!
//! The window is captured, reference images of the login button and of a
//! dismissible overlay are searched for in the capture, and keyboard and mouse
//! input is synthesized to submit credentials. Access to the window system,
//! the screen and the input devices goes through the traits in [desktop],
//! so everything in this crate can be driven by a scripted desktop in tests.

pub mod action;
pub mod config;
pub mod desktop;
pub mod matcher;
pub mod orchestrator;
pub mod probe;
pub mod template;

pub use crate::{
    action::{ActionExecutor, ClickError, Credentials},
    config::LoginConfig,
    desktop::{Desktop, InputDevice, Key, KeyStroke, Rect, ScreenCapture, WindowSystem},
    matcher::{MatchPosition, TemplateMatcher},
    orchestrator::{LoginError, LoginOrchestrator, LoginOutcome, LoginState, RetryState},
    probe::{CapturedRegion, ScreenProbe},
    template::{FsImageSource, ImageSource, ReferenceImage, TemplateStore},
};
