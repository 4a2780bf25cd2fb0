//! Viewport windowing and column layout
//!
//! Only rows intersecting the viewport (plus an overscan margin) are
//! materialized, so the cost of a recompute depends on the viewport height
//! and never on the length of the list.

use std::ops::Range;

use crate::sort::SortColumn;

/// Scroll position and visible height of the list container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub scroll_offset: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(scroll_offset: u32, height: u32) -> Self {
        Self {
            scroll_offset,
            height,
        }
    }
}

/// Rows to materialize for one viewport position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowRange {
    /// `floor(scroll_offset / row_height)`, clamped to the list length
    pub first_visible: usize,
    /// Rows needed to cover the viewport from `first_visible`
    pub visible_count: usize,
    /// First materialized row, `first_visible` minus overscan
    pub start: usize,
    /// One past the last materialized row
    pub end: usize,
}

impl WindowRange {
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn visible(&self) -> Range<usize> {
        self.first_visible..self.first_visible + self.visible_count
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Fixed row height and overscan used to window the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub row_height: u32,
    pub overscan: usize,
}

impl WindowGeometry {
    pub fn new(row_height: u32, overscan: usize) -> Self {
        Self {
            row_height: row_height.max(1),
            overscan,
        }
    }

    /// Upper bound on materialized rows for a viewport height.
    pub fn max_rows(&self, viewport_height: u32) -> usize {
        self.rows_in_view(viewport_height) + 2 * self.overscan
    }

    fn rows_in_view(&self, viewport_height: u32) -> usize {
        // +1 for the partially visible row at the bottom edge
        viewport_height.div_ceil(self.row_height) as usize + 1
    }

    pub fn content_height(&self, total: usize) -> u64 {
        total as u64 * u64::from(self.row_height)
    }

    pub fn row_top(&self, index: usize) -> u64 {
        index as u64 * u64::from(self.row_height)
    }

    pub fn max_scroll(&self, total: usize, viewport_height: u32) -> u32 {
        let overflow = self
            .content_height(total)
            .saturating_sub(u64::from(viewport_height));
        u32::try_from(overflow).unwrap_or(u32::MAX)
    }

    pub fn clamp_scroll(&self, total: usize, viewport: Viewport) -> u32 {
        viewport
            .scroll_offset
            .min(self.max_scroll(total, viewport.height))
    }

    pub fn range(&self, total: usize, viewport: Viewport) -> WindowRange {
        let offset = self.clamp_scroll(total, viewport);
        let first_visible = ((offset / self.row_height) as usize).min(total);
        let rows_in_view = self.rows_in_view(viewport.height);
        let visible_count = rows_in_view.min(total - first_visible);

        WindowRange {
            first_visible,
            visible_count,
            start: first_visible.saturating_sub(self.overscan),
            end: first_visible
                .saturating_add(rows_in_view + self.overscan)
                .min(total),
        }
    }
}

/// Columns of the server table, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListColumn {
    Name,
    Public,
    Password,
    Online,
    Version,
}

impl ListColumn {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Public,
        Self::Password,
        Self::Online,
        Self::Version,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Public => "public",
            Self::Password => "password",
            Self::Online => "online",
            Self::Version => "version",
        }
    }

    /// Sort column bound to this header, if it is clickable.
    pub fn sort_column(self) -> Option<SortColumn> {
        match self {
            Self::Name => Some(SortColumn::Name),
            Self::Online => Some(SortColumn::Online),
            Self::Public | Self::Password | Self::Version => None,
        }
    }
}

/// Fixed columns each take 1/14 of the width; name gets the rest.
pub const FIXED_COLUMN_DIVISOR: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    widths: [f64; 5],
}

impl ColumnLayout {
    pub fn compute(total_width: f64) -> Self {
        let total_width = total_width.max(0.0);
        let fixed = total_width / FIXED_COLUMN_DIVISOR;
        let name = (total_width - fixed * 4.0).max(0.0);
        Self {
            widths: [name, fixed, fixed, fixed, fixed],
        }
    }

    pub fn width(&self, column: ListColumn) -> f64 {
        let index = ListColumn::ALL
            .iter()
            .position(|c| *c == column)
            .unwrap_or_default();
        self.widths.get(index).copied().unwrap_or_default()
    }
}
