//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

/// One page of a larger list.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    /// The items on this page, at most `page_size` of them.
    pub items: &'a [T],
    /// The 1-based index of this page.
    pub page: u64,
    /// The total number of pages, `ceil(total_items / page_size)`.
    pub page_count: u64,
    /// The number of items across all pages.
    pub total_items: usize,
    /// The 0-based offset of the first item on this page.
    pub offset: usize,
}

/// Slice `items` into the 1-based `page` of `page_size` items.
///
/// The page covers `[(page - 1) * page_size, page * page_size)` clipped to the
/// list, so pages past the end are empty. A `page_size` of zero is treated as one
/// and a `page` of zero as the first page.
pub fn paginate<T>(items: &[T], page: u64, page_size: u64) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total_items = items.len();
    let page_count = (total_items as u64).div_ceil(page_size);

    let start = usize::try_from((page - 1).saturating_mul(page_size))
        .unwrap_or(usize::MAX)
        .min(total_items);
    let end = usize::try_from(page.saturating_mul(page_size))
        .unwrap_or(usize::MAX)
        .min(total_items);

    Page {
        items: &items[start..end],
        page,
        page_count,
        total_items,
        offset: start,
    }
}

/// One entry in the row of page links under a paginated list.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

impl<T> Page<'_, T> {
    /// The page links for this page, showing at most `max_pages` numbered
    /// pages around the current one plus the first and last page.
    pub fn indicators(&self, max_pages: u64) -> Vec<PaginationIndicator> {
        create_pagination_indicators(self.page, self.page_count, max_pages)
    }
}

fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let max_pages = max_pages.max(1);
    let half = max_pages / 2;
    let indicator = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let window = if page_count <= max_pages {
        1..=page_count
    } else if curr_page <= half {
        1..=max_pages
    } else if curr_page > page_count - half {
        (page_count - max_pages + 1)..=page_count
    } else {
        (curr_page - half)..=(curr_page + half)
    };

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    let truncated = page_count > max_pages;
    if truncated && curr_page > half + 1 {
        indicators.push(PaginationIndicator::Page(1));
        indicators.push(PaginationIndicator::Ellipsis);
    }

    indicators.extend(window.map(indicator));

    if truncated && curr_page < page_count - half {
        indicators.push(PaginationIndicator::Ellipsis);
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
