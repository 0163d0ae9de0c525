//! Pagination of the roster into screen-sized pages

use std::ops::Range;

use vgrid_protocol::Viewport;

use crate::config::LayoutConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Pagination {
    config: LayoutConfig,
    page: usize,
    page_size: usize,
    total_page: usize,
    total_size: usize,
}

impl Pagination {
    pub fn new(config: LayoutConfig, viewport: Viewport) -> Result<Self> {
        config.validate()?;
        let mut pagination = Self {
            config,
            page: 0,
            page_size: 1,
            total_page: 0,
            total_size: 0,
        };
        pagination.page_size = pagination.page_size_for(viewport);
        Ok(pagination)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_page(&self) -> usize {
        self.total_page
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Recompute the page size for a resized viewport
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let page_size = self.page_size_for(viewport);
        if page_size != self.page_size {
            tracing::debug!("Page size {} -> {} for {}", self.page_size, page_size, viewport);
            self.page_size = page_size;
            self.recompute();
        }
    }

    pub fn set_total_size(&mut self, total_size: usize) {
        if total_size != self.total_size {
            self.total_size = total_size;
            self.recompute();
        }
    }

    /// Jump to a page; returns false and leaves the page unchanged if out of range
    pub fn set_page(&mut self, page: usize) -> bool {
        if page >= self.total_page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.set_page(page),
            None => false,
        }
    }

    /// Indices into the ordered roster shown on the current page
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.total_size);
        let end = (start + self.page_size).min(self.total_size);
        start..end
    }

    fn page_size_for(&self, viewport: Viewport) -> usize {
        let (columns, rows) = self.config.capacity(viewport.width, viewport.height);
        self.config.max_tiles.min(columns * rows)
    }

    fn recompute(&mut self) {
        self.total_page = self.total_size.div_ceil(self.page_size);
        let last = self.total_page.saturating_sub(1);
        if self.page > last {
            tracing::debug!("Clamping page {} to {}", self.page, last);
            self.page = last;
        }
    }
}
