use std::process::Command;

use anyhow::{bail, Context as _};
use enigo::Key;
use tracing::trace;
use x11rb::{
    protocol::xproto::{AtomEnum, ConnectionExt},
    rust_connection::RustConnection,
};

/// Upper bound for the length of a WM_CLASS property, in 32-bit units.
const MAX_CLASS_LENGTH: u32 = 256;

pub struct Context {
    connection: RustConnection,
}

impl Context {
    pub fn new() -> anyhow::Result<Self> {
        let (connection, _screen_num) = x11rb::connect(None)?;
        Ok(Self { connection })
    }

    fn run_xdotool(&self, args: &[&str]) -> anyhow::Result<()> {
        let status = Command::new("xdotool")
            .args(args)
            .status()
            .with_context(|| format!("failed to execute command: xdotool {:?}", args))?;
        if !status.success() {
            bail!("xdotool failed with status {:?}", status);
        }
        Ok(())
    }

    /// Instance and class names from the WM_CLASS property of a window.
    fn window_classes(&self, id: u32) -> anyhow::Result<Vec<String>> {
        let reply = self
            .connection
            .get_property(
                false,
                id,
                AtomEnum::WM_CLASS,
                AtomEnum::STRING,
                0,
                MAX_CLASS_LENGTH,
            )?
            .reply()?;
        Ok(reply
            .value
            .split(|byte| *byte == 0)
            .filter(|name| !name.is_empty())
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect())
    }

    pub fn find_window_by_class(
        &self,
        context: &crate::Context,
        class_name: &str,
    ) -> anyhow::Result<Option<crate::Window>> {
        for window in context.all_windows()? {
            match self.window_classes(window.id()) {
                Ok(classes) if classes.iter().any(|c| c == class_name) => {
                    return Ok(Some(window));
                }
                Ok(_) => {}
                Err(err) => {
                    trace!("failed to get class of window {}: {:?}", window.id(), err);
                }
            }
        }
        Ok(None)
    }

    pub fn key_for_char(&self, ch: char) -> Option<(Key, bool)> {
        // enigo maps characters to keysyms itself, including shifted ones.
        if ch.is_control() {
            return None;
        }
        Some((Key::Unicode(ch), false))
    }

    pub fn activate_window(&self, window: &crate::Window) -> anyhow::Result<()> {
        // `windowactivate` also maps a minimized window.
        self.run_xdotool(&["windowactivate", "--sync", &window.id().to_string()])
    }
}
