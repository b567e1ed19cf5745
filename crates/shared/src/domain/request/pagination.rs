use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

pub const DEFAULT_PAGE_SIZE: i32 = 10;
pub const MAX_PAGE_SIZE: i32 = 100;

pub fn default_page() -> i32 {
    1
}

pub fn default_page_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

/// Clamps raw query values into a usable page window.
pub fn normalize_page(page: i32, page_size: i32) -> (i32, i32) {
    let page = if page > 0 { page } else { 1 };
    let page_size = if page_size > 0 {
        page_size.min(MAX_PAGE_SIZE)
    } else {
        DEFAULT_PAGE_SIZE
    };

    (page, page_size)
}

/// Row offset of a page, widened so large page numbers cannot overflow.
pub fn page_offset(page: i32, page_size: i32) -> u64 {
    let page = u64::try_from(page.max(1)).unwrap_or(1);
    let page_size = u64::try_from(page_size.max(0)).unwrap_or(0);

    (page - 1) * page_size
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: i32,

    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page_window() {
        assert_eq!(normalize_page(0, 0), (1, 10));
        assert_eq!(normalize_page(3, 500), (3, 100));
        assert_eq!(normalize_page(-2, 25), (1, 25));
    }

    #[test]
    fn huge_pages_do_not_overflow_the_offset() {
        let (page, page_size) = normalize_page(i32::MAX, 100);

        assert_eq!(page_offset(page, page_size), (i32::MAX as u64 - 1) * 100);
        assert_eq!(page_offset(1, 100), 0);
        assert_eq!(page_offset(0, 10), 0);
    }
}
