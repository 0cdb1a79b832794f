//! Fixed-size pagination with a clamped 1-based cursor.

use std::num::NonZeroUsize;

/// Split `items` into pages of `page_size`. Every page but the last is full;
/// an empty input yields no pages.
pub fn paginate<T: Clone>(page_size: NonZeroUsize, items: &[T]) -> Vec<Vec<T>> {
    items.chunks(page_size.get()).map(<[T]>::to_vec).collect()
}

/// Next page, stopping at the last one. Zero pages means no cursor (0).
pub fn advance(cursor: usize, page_count: usize) -> usize {
    if page_count == 0 {
        return 0;
    }
    cursor.saturating_add(1).clamp(1, page_count)
}

/// Previous page, stopping at the first one. Zero pages means no cursor (0).
pub fn retreat(cursor: usize, page_count: usize) -> usize {
    if page_count == 0 {
        return 0;
    }
    cursor.saturating_sub(1).clamp(1, page_count)
}

/// Force `cursor` into `[1, page_count]`, or 0 when there are no pages.
pub fn clamp(cursor: usize, page_count: usize) -> usize {
    if page_count == 0 {
        0
    } else {
        cursor.clamp(1, page_count)
    }
}

/// What the navigation controls should show for a cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub page: usize,
    pub total: usize,
    /// No pages at all: show the "no results" notice instead of content.
    pub empty: bool,
}

impl Controls {
    pub fn derive(cursor: usize, page_count: usize) -> Self {
        if page_count == 0 {
            return Self {
                prev_enabled: false,
                next_enabled: false,
                page: 0,
                total: 0,
                empty: true,
            };
        }
        Self {
            prev_enabled: cursor > 1,
            next_enabled: cursor < page_count,
            page: cursor,
            total: page_count,
            empty: false,
        }
    }
}

/// A paginated set plus its cursor.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    page_size: NonZeroUsize,
    pages: Vec<Vec<T>>,
    cursor: usize,
}

impl<T: Clone> Pager<T> {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            cursor: 0,
        }
    }

    /// Replace the contents and return to the first page.
    pub fn load(&mut self, items: &[T]) {
        self.pages = paginate(self.page_size, items);
        self.cursor = clamp(1, self.pages.len());
    }

    /// Replace the contents but stay on the current page where possible.
    pub fn reload(&mut self, items: &[T]) {
        self.pages = paginate(self.page_size, items);
        self.cursor = clamp(self.cursor.max(1), self.pages.len());
    }

    pub fn next(&mut self) -> usize {
        self.cursor = advance(self.cursor, self.pages.len());
        self.cursor
    }

    pub fn prev(&mut self) -> usize {
        self.cursor = retreat(self.cursor, self.pages.len());
        self.cursor
    }

    pub fn current(&self) -> &[T] {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[cfg(test)]
    pub fn pages(&self) -> &[Vec<T>] {
        &self.pages
    }

    pub fn controls(&self) -> Controls {
        Controls::derive(self.cursor, self.pages.len())
    }
}
