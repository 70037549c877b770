//! Details sidebar layout state and drag-to-resize sessions

use tracing::debug;

pub const MIN_WIDTH: f64 = 320.0;
pub const MAX_WIDTH: f64 = 800.0;
pub const DEFAULT_WIDTH: f64 = 420.0;

/// Right-docked sidebar geometry
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarLayout {
    width: f64,
    open: bool,
}

impl Default for SidebarLayout {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            open: false,
        }
    }
}

impl SidebarLayout {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// The only place the width changes; always clamped
    pub fn set_width(&mut self, width: f64) {
        if width.is_finite() {
            self.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        }
    }

    /// Start a drag at horizontal pointer position `pointer_x`
    ///
    /// The layout stays borrowed until the session is finished or dropped.
    pub fn begin_resize(&mut self, pointer_x: f64) -> ResizeSession<'_> {
        debug!("Sidebar resize started at width {}", self.width);
        ResizeSession {
            start_width: self.width,
            start_x: pointer_x,
            layout: self,
            committed: false,
        }
    }
}

/// One drag gesture; dropping it without [`ResizeSession::finish`] cancels
#[derive(Debug)]
pub struct ResizeSession<'a> {
    layout: &'a mut SidebarLayout,
    start_width: f64,
    start_x: f64,
    committed: bool,
}

impl ResizeSession<'_> {
    /// Pointer moved; dragging left widens a right-docked sidebar
    pub fn pointer_moved(&mut self, pointer_x: f64) {
        self.layout
            .set_width(self.start_width + (self.start_x - pointer_x));
    }

    #[must_use]
    pub fn current_width(&self) -> f64 {
        self.layout.width
    }

    /// Keep the width reached by the drag
    pub fn finish(mut self) -> f64 {
        self.committed = true;
        debug!("Sidebar resize finished at width {}", self.layout.width);
        self.layout.width
    }
}

impl Drop for ResizeSession<'_> {
    fn drop(&mut self) {
        if !self.committed {
            debug!("Sidebar resize cancelled");
            self.layout.width = self.start_width;
        }
    }
}
