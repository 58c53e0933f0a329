use {
    anyhow::{ensure, Context as _},
    enigo::Key,
    std::process::Command,
    tracing::trace,
};

pub struct Context {}

impl Context {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {})
    }

    // macOS windows have no class names, so the application name is matched instead.
    pub fn find_window_by_class(
        &self,
        context: &crate::Context,
        class_name: &str,
    ) -> anyhow::Result<Option<crate::Window>> {
        for window in context.all_windows()? {
            match window.app_name() {
                Ok(name) if name == class_name => return Ok(Some(window)),
                Ok(_) => {}
                Err(err) => trace!("failed to get app name of window {}: {:?}", window.id(), err),
            }
        }
        Ok(None)
    }

    pub fn key_for_char(&self, ch: char) -> Option<(Key, bool)> {
        if ch.is_control() {
            return None;
        }
        Some((Key::Unicode(ch), false))
    }

    pub fn activate_window(&self, window: &crate::Window) -> anyhow::Result<()> {
        // We're not running a macos event loop, so the request goes through System Events.
        let script = format!(
            "tell application \"System Events\" to set frontmost of (first process whose unix id is {}) to true",
            window.pid()
        );
        let output = Command::new("osascript")
            .args(["-e", &script])
            .output()
            .context("failed to execute osascript")?;
        ensure!(output.status.success(), "osascript failed: {:?}", output);
        Ok(())
    }
}
