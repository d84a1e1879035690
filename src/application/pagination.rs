//! Offset pagination helpers.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_PAGE: u32 = 1;

/// A 1-based page request. Zero values are lifted to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    per_page: u32,
    page: u32,
}

impl PageRequest {
    pub fn new(per_page: u32, page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            page: page.max(1),
        }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE, DEFAULT_PAGE)
    }
}

/// A page of results that knows the size of the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthAwarePage<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl<T> LengthAwarePage<T> {
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        let per_page = request.limit();
        let last_page = total.div_ceil(per_page).max(1);
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = request.offset() + 1;
            (Some(from), Some(from + data.len() as u64 - 1))
        };

        Self {
            data,
            current_page: request.page(),
            per_page: request.per_page(),
            total,
            last_page,
            from,
            to,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
