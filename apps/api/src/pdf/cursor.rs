//! Vertical write position for single-pass, greedy pagination.
//!
//! Total document height is unknown up front (it depends on wrapped line
//! counts), so layout never backtracks: every element asks for its height
//! before drawing and a page break happens when it would cross the bottom
//! margin. Nothing repeats on continuation pages.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    y: f32,
    page_height: f32,
    top_margin: f32,
    bottom_margin: f32,
    page_index: usize,
    /// Nothing has been placed on the current page yet.
    fresh: bool,
}

impl PageCursor {
    pub fn new(page_height: f32, top_margin: f32, bottom_margin: f32) -> Self {
        Self {
            y: page_height - top_margin,
            page_height,
            top_margin,
            bottom_margin,
            page_index: 0,
            fresh: true,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Y coordinate where content starts on every page.
    pub fn top(&self) -> f32 {
        self.page_height - self.top_margin
    }

    /// Makes room for an element `required` points tall. Returns `true` when
    /// a new page was started.
    ///
    /// On a fresh page the element is accepted even if it is taller than the
    /// usable area, so oversized elements cannot trigger endless page breaks.
    pub fn ensure_space(&mut self, required: f32) -> bool {
        if self.y - required >= self.bottom_margin || self.fresh {
            return false;
        }
        self.y = self.top();
        self.page_index += 1;
        self.fresh = true;
        true
    }

    /// Moves the write position down after drawing.
    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
        self.fresh = false;
    }
}
