use super::*;

fn info(page: u32, pages: u32, total: u64) -> PageInfo {
    PageInfo { page, total_pages: pages, total_count: total }
}

// =============================================================================
// has_more
// =============================================================================

#[test]
fn has_more_when_pages_remain() {
    let cursor = PageCursor::at(info(1, 3, 50));
    assert!(cursor.has_more());
}

#[test]
fn no_more_on_last_page() {
    let cursor = PageCursor::at(info(3, 3, 50));
    assert!(!cursor.has_more());
}

#[test]
fn no_more_on_empty_feed() {
    let cursor = PageCursor::at(PageInfo::empty());
    assert!(!cursor.has_more());
}

// =============================================================================
// begin_fetch
// =============================================================================

#[test]
fn begin_fetch_advances_to_next_page() {
    let mut cursor = PageCursor::at(info(1, 2, 30));
    assert_eq!(cursor.begin_fetch(), FetchStart::Begin { page: 2 });
    assert!(cursor.is_fetching());
}

#[test]
fn begin_fetch_twice_is_single_flight() {
    let mut cursor = PageCursor::at(info(1, 3, 50));
    assert_eq!(cursor.begin_fetch(), FetchStart::Begin { page: 2 });
    assert_eq!(cursor.begin_fetch(), FetchStart::AlreadyFetching);
}

#[test]
fn begin_fetch_exhausted_when_no_more() {
    let mut cursor = PageCursor::at(info(2, 2, 30));
    assert_eq!(cursor.begin_fetch(), FetchStart::Exhausted);
    assert!(!cursor.is_fetching());
}

// =============================================================================
// complete / fail
// =============================================================================

#[test]
fn complete_moves_position_and_goes_idle() {
    let mut cursor = PageCursor::at(info(1, 2, 30));
    cursor.begin_fetch();
    cursor.complete(info(2, 2, 30));
    assert_eq!(cursor.page(), 2);
    assert!(!cursor.is_fetching());
    assert!(!cursor.has_more());
}

#[test]
fn fail_goes_idle_with_position_unchanged() {
    let mut cursor = PageCursor::at(info(1, 3, 50));
    cursor.begin_fetch();
    cursor.fail();
    assert_eq!(cursor.page(), 1);
    assert!(!cursor.is_fetching());
    // The retry is available again.
    assert_eq!(cursor.begin_fetch(), FetchStart::Begin { page: 2 });
}

// =============================================================================
// sync_totals / record_created
// =============================================================================

#[test]
fn sync_totals_keeps_position() {
    let mut cursor = PageCursor::at(info(3, 3, 50));
    cursor.sync_totals(info(1, 4, 61));
    assert_eq!(cursor.page(), 3);
    assert_eq!(cursor.total_pages(), 4);
    assert_eq!(cursor.total_count(), 61);
    assert!(cursor.has_more());
}

#[test]
fn sync_totals_does_not_clear_fetching() {
    let mut cursor = PageCursor::at(info(1, 3, 50));
    cursor.begin_fetch();
    cursor.sync_totals(info(1, 3, 51));
    assert!(cursor.is_fetching());
}

#[test]
fn record_created_bumps_total() {
    let mut cursor = PageCursor::at(info(1, 1, 5));
    cursor.record_created();
    assert_eq!(cursor.total_count(), 6);
}
