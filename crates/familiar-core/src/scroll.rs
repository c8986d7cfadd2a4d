//! Scroll position that survives suspend/resume.

/// A scrollable list as seen by the screen controller.
pub trait ListViewport {
    /// Index of the first (partially) visible row.
    fn first_visible_position(&self) -> usize;

    /// Top edge of the first visible row relative to the viewport, in pixels.
    /// `None` when no rows are laid out.
    fn first_child_top(&self) -> Option<i32>;

    /// Scroll so row `index` starts `offset` pixels below the viewport top.
    fn set_selection_from_top(&mut self, index: usize, offset: i32);
}

/// Top visible row plus its pixel offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollAnchor {
    pub top_visible_index: usize,
    pub pixel_offset: i32,
}

impl ScrollAnchor {
    pub fn capture(viewport: &impl ListViewport) -> Self {
        Self {
            top_visible_index: viewport.first_visible_position(),
            pixel_offset: viewport.first_child_top().unwrap_or(0),
        }
    }

    pub fn restore(&self, viewport: &mut impl ListViewport) {
        viewport.set_selection_from_top(self.top_visible_index, self.pixel_offset);
    }
}

/// Viewport over rows of identical height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedRowViewport {
    row_height: u32,
    viewport_height: u32,
    row_count: usize,
    /// Pixels scrolled from the top of row 0.
    scroll_offset: u64,
}

impl FixedRowViewport {
    pub fn new(row_height: u32, viewport_height: u32, row_count: usize) -> Self {
        Self {
            row_height: row_height.max(1),
            viewport_height,
            row_count,
            scroll_offset: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    fn max_offset(&self) -> u64 {
        let content = self.row_count as u64 * u64::from(self.row_height);
        content.saturating_sub(u64::from(self.viewport_height))
    }

    /// Scroll by `delta` pixels, clamped to the content.
    pub fn scroll_by(&mut self, delta: i64) {
        let target = (self.scroll_offset as i64).saturating_add(delta).max(0) as u64;
        self.scroll_offset = target.min(self.max_offset());
    }

    /// Rows intersecting the viewport.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        if self.row_count == 0 {
            return 0..0;
        }
        let h = u64::from(self.row_height);
        let first = (self.scroll_offset / h) as usize;
        let end = (self.scroll_offset + u64::from(self.viewport_height)).div_ceil(h) as usize;
        first..end.min(self.row_count).max(first + 1)
    }
}

impl ListViewport for FixedRowViewport {
    fn first_visible_position(&self) -> usize {
        self.visible_range().start
    }

    fn first_child_top(&self) -> Option<i32> {
        if self.row_count == 0 {
            return None;
        }
        let h = u64::from(self.row_height);
        Some(-((self.scroll_offset % h) as i32))
    }

    fn set_selection_from_top(&mut self, index: usize, offset: i32) {
        if self.row_count == 0 {
            self.scroll_offset = 0;
            return;
        }
        let index = index.min(self.row_count - 1);
        let row_top = index as i64 * i64::from(self.row_height);
        let target = (row_top - i64::from(offset)).max(0) as u64;
        self.scroll_offset = target.min(self.max_offset());
    }
}
