use {
    anyhow::bail,
    enigo::Key,
    std::{ffi::c_void, iter, ptr},
    tracing::trace,
    windows_sys::Win32::{
        Foundation::GetLastError,
        UI::{
            Input::KeyboardAndMouse::VkKeyScanW,
            WindowsAndMessaging::{FindWindowW, SetForegroundWindow, ShowWindow, SW_RESTORE},
        },
    },
};

pub struct Context {}

impl Context {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {})
    }

    pub fn find_window_by_class(
        &self,
        context: &crate::Context,
        class_name: &str,
    ) -> anyhow::Result<Option<crate::Window>> {
        let class_name_w: Vec<u16> = class_name.encode_utf16().chain(iter::once(0)).collect();
        let hwnd = unsafe { FindWindowW(class_name_w.as_ptr(), ptr::null()) };
        if hwnd.is_null() {
            return Ok(None);
        }
        // xcap returns HWND pointer as window id.
        let id = hwnd as usize as u32;
        let window = context.all_windows()?.into_iter().find(|w| w.id() == id);
        if window.is_none() {
            trace!("window {:?} with class {:?} is not capturable", hwnd, class_name);
        }
        Ok(window)
    }

    pub fn key_for_char(&self, ch: char) -> Option<(Key, bool)> {
        let mut buf = [0u16; 2];
        let [unit] = *ch.encode_utf16(&mut buf) else {
            return None;
        };
        let scan = unsafe { VkKeyScanW(unit) };
        if scan == -1 {
            return None;
        }
        let vk = (scan & 0xff) as u32;
        let shift = (scan >> 8) & 0x01 != 0;
        Some((Key::Other(vk), shift))
    }

    pub fn activate_window(&self, window: &crate::Window) -> anyhow::Result<()> {
        let hwnd = window.id() as usize as *mut c_void;
        unsafe {
            ShowWindow(hwnd, SW_RESTORE);
        }
        let ret = unsafe { SetForegroundWindow(hwnd) };
        if ret == 0 {
            let error = unsafe { GetLastError() };
            bail!("failed to activate window (error code: {})", error);
        }
        Ok(())
    }
}
