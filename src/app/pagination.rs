/// Ticket for one in-flight page fetch. Echoed back with the response so the
/// controller can discard results that no longer match its latest request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: u64,
    pub offset: usize,
    pub limit: usize,
    pub reset: bool,
}

/// Offset-based incremental loader for one ordered list.
///
/// At most one request is in flight at a time; `begin_reset` is the one
/// exception and may supersede an in-flight load, in which case the older
/// response is dropped when it arrives (last request wins).
pub struct Pagination<T> {
    items: Vec<T>,
    offset: usize,
    has_more: bool,
    is_loading: bool,
    page_size: usize,
    seq: u64,
}

impl<T> Pagination<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            has_more: true,
            is_loading: false,
            page_size,
            seq: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Starts a first-page fetch, invalidating any response still in flight.
    pub fn begin_reset(&mut self) -> PageRequest {
        self.seq += 1;
        self.is_loading = true;
        PageRequest {
            seq: self.seq,
            offset: 0,
            limit: self.page_size,
            reset: true,
        }
    }

    /// Starts a continuation fetch, or `None` while one is already running or
    /// the list is exhausted.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.is_loading || !self.has_more {
            return None;
        }
        self.seq += 1;
        self.is_loading = true;
        Some(PageRequest {
            seq: self.seq,
            offset: self.offset,
            limit: self.page_size,
            reset: false,
        })
    }

    /// Applies a page response. Returns `false` when the response is stale
    /// (superseded by a newer request) and was dropped.
    pub fn apply(&mut self, request: PageRequest, results: Vec<T>, has_more: bool) -> bool {
        if request.seq != self.seq {
            return false;
        }
        self.is_loading = false;
        // An empty page means done regardless of what the server claims,
        // otherwise a lying `has_more` would loop forever.
        self.has_more = has_more && !results.is_empty();
        if request.reset {
            self.offset = results.len();
            self.items = results;
        } else {
            self.offset += results.len();
            self.items.extend(results);
        }
        true
    }

    /// Marks a failed fetch as settled. Stale failures are ignored.
    pub fn fail(&mut self, request: PageRequest) -> bool {
        if request.seq != self.seq {
            return false;
        }
        self.is_loading = false;
        true
    }

    /// Replaces the whole list with a freshly fetched first page, e.g. after
    /// a mutation refreshed it out of band. Invalidates in-flight loads.
    pub fn replace_first_page(&mut self, results: Vec<T>, has_more: bool) {
        self.seq += 1;
        self.is_loading = false;
        self.has_more = has_more && !results.is_empty();
        self.offset = results.len();
        self.items = results;
    }

    /// Empties the list and invalidates in-flight loads, ready for the next
    /// reset. Used when the owning view loses its context.
    pub fn clear(&mut self) {
        self.seq += 1;
        self.is_loading = false;
        self.has_more = true;
        self.offset = 0;
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_more_advances_offset_by_received_count() {
        let mut pagination: Pagination<u32> = Pagination::new(6);
        let first = pagination.begin_reset();
        assert!(pagination.apply(first, vec![1, 2, 3, 4, 5, 6], true));
        let second = pagination.begin_load_more().unwrap();
        assert_eq!(second.offset, 6);
        assert!(pagination.apply(second, vec![7, 8], false));
        assert_eq!(pagination.items(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(pagination.offset(), 8);
        assert!(!pagination.has_more());
    }

    #[test]
    fn exhausted_list_blocks_load_more_until_reset() {
        let mut pagination: Pagination<u32> = Pagination::new(2);
        let first = pagination.begin_reset();
        pagination.apply(first, vec![1, 2], false);
        assert!(pagination.begin_load_more().is_none());
        let reset = pagination.begin_reset();
        pagination.apply(reset, vec![3, 4], true);
        assert!(pagination.begin_load_more().is_some());
    }

    #[test]
    fn only_one_request_in_flight() {
        let mut pagination: Pagination<u32> = Pagination::new(2);
        let first = pagination.begin_reset();
        pagination.apply(first, vec![1, 2], true);
        let inflight = pagination.begin_load_more();
        assert!(inflight.is_some());
        // A second trigger while loading is dropped, not queued.
        assert!(pagination.begin_load_more().is_none());
    }

    #[test]
    fn reset_supersedes_inflight_response() {
        let mut pagination: Pagination<u32> = Pagination::new(2);
        let stale = pagination.begin_reset();
        let fresh = pagination.begin_reset();
        // The later reset's response lands first.
        assert!(pagination.apply(fresh, vec![10, 11], true));
        // The stale response must be dropped, leaving the fresh page intact.
        assert!(!pagination.apply(stale, vec![1, 2], true));
        assert_eq!(pagination.items(), &[10, 11]);
        assert_eq!(pagination.offset(), 2);
        assert!(!pagination.is_loading());
    }

    #[test]
    fn empty_first_page_is_terminal() {
        let mut pagination: Pagination<u32> = Pagination::new(2);
        let first = pagination.begin_reset();
        pagination.apply(first, vec![], false);
        assert!(pagination.items().is_empty());
        assert!(!pagination.has_more());
        assert!(pagination.begin_load_more().is_none());
    }

    #[test]
    fn empty_page_with_claimed_more_stops_anyway() {
        let mut pagination: Pagination<u32> = Pagination::new(2);
        let first = pagination.begin_reset();
        pagination.apply(first, vec![], true);
        assert!(!pagination.has_more());
        assert!(pagination.begin_load_more().is_none());
    }

    #[test]
    fn failure_clears_loading_and_permits_retry() {
        let mut pagination: Pagination<u32> = Pagination::new(2);
        let first = pagination.begin_reset();
        pagination.apply(first, vec![1, 2], true);
        let more = pagination.begin_load_more().unwrap();
        assert!(pagination.fail(more));
        assert!(!pagination.is_loading());
        assert!(pagination.begin_load_more().is_some());
    }

    #[test]
    fn replace_first_page_invalidates_inflight_load() {
        let mut pagination: Pagination<u32> = Pagination::new(2);
        let first = pagination.begin_reset();
        pagination.apply(first, vec![1, 2], true);
        let inflight = pagination.begin_load_more().unwrap();
        pagination.replace_first_page(vec![9, 8], true);
        assert!(!pagination.apply(inflight, vec![3, 4], true));
        assert_eq!(pagination.items(), &[9, 8]);
        assert_eq!(pagination.offset(), 2);
    }
}
