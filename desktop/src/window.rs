use {crate::Context, std::fmt};

#[derive(Clone)]
pub struct Window {
    id: u32,
    pid: u32,
    inner: xcap::Window,
    context: Context,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("pid", &self.pid)
            .finish()
    }
}

impl Window {
    pub(crate) fn new(context: Context, inner: xcap::Window) -> anyhow::Result<Self> {
        Ok(Self {
            id: inner.id()?,
            pid: inner.pid()?,
            inner,
            context,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The window id
    pub fn id(&self) -> u32 {
        self.id
    }
    /// The window app name
    pub fn app_name(&self) -> anyhow::Result<String> {
        Ok(self.inner.app_name()?)
    }

    /// Current position and size of the window: `(x, y, width, height)`.
    pub fn geometry(&self) -> anyhow::Result<(i32, i32, u32, u32)> {
        Ok((
            self.inner.x()?,
            self.inner.y()?,
            self.inner.width()?,
            self.inner.height()?,
        ))
    }

    /// Restores the window if it's minimized and brings it to the foreground.
    pub fn activate(&self) -> anyhow::Result<()> {
        self.context.0.imp.activate_window(self)
    }
}
