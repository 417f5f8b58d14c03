//! Page arithmetic for OMDb search results.

/// OMDb returns ten search results per page.
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Gap,
}

pub fn total_pages(total_results: u32) -> u32 {
    total_results.div_ceil(PAGE_SIZE)
}

/// Page buttons around `current`: first page, a gap marker where pages are
/// skipped, `siblings` pages either side of `current`, then the last page.
pub fn page_window(current: u32, total: u32, siblings: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let left = current.saturating_sub(siblings).max(1);
    let right = current.saturating_add(siblings).min(total);

    let mut items = vec![PageItem::Page(1)];
    if left > 2 {
        items.push(PageItem::Gap);
    }
    items.extend(
        (left..=right)
            .filter(|&p| p != 1 && p != total)
            .map(PageItem::Page),
    );
    if right + 1 < total {
        items.push(PageItem::Gap);
    }
    if total > 1 {
        items.push(PageItem::Page(total));
    }
    items
}

/// 1-based inclusive range of results shown on `page`.
pub fn result_range(page: u32, total_results: u32) -> Option<(u32, u32)> {
    if total_results == 0 || page == 0 {
        return None;
    }
    let start = (page - 1).saturating_mul(PAGE_SIZE).saturating_add(1);
    if start > total_results {
        return None;
    }
    Some((start, page.saturating_mul(PAGE_SIZE).min(total_results)))
}
