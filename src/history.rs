use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One past bid/purchase on a listing. Supplied by the caller, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Already masked for display (see [`mask_buyer`])
    pub buyer: String,
    pub price: Decimal,
}

/// `"Nguyen"` → `"N****n"`. Names of one or two characters are fully starred.
pub fn mask_buyer(name: &str) -> String {
    let chars: Vec<char> = name.trim().chars().collect();
    match chars.len() {
        0 => String::new(),
        1 | 2 => "*".repeat(chars.len()),
        n => {
            let mut out = String::with_capacity(name.len());
            out.push(chars[0]);
            out.extend(std::iter::repeat('*').take(n - 2));
            out.push(chars[n - 1]);
            out
        }
    }
}

/// ceil(count / page_size). Zero page size means zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Records on 1-based `page`. Out-of-range pages (including 0) are empty.
pub fn page_slice<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// A table row: a record, or the placeholder shown when there is nothing to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRow<'a> {
    Record(&'a Transaction),
    Empty,
}

/// Paginated view over a listing's transaction history.
#[derive(Debug, Clone)]
pub struct TransactionHistory<'a> {
    records: &'a [Transaction],
    page_size: usize,
    page: usize,
}

impl<'a> TransactionHistory<'a> {
    pub fn new(records: &'a [Transaction]) -> Self {
        Self::with_page_size(records, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(records: &'a [Transaction], page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.records.len(), self.page_size)
    }

    /// Jump to `page`, clamped into `1..=total_pages` (page 1 when empty).
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Records on the current page.
    pub fn current(&self) -> &'a [Transaction] {
        page_slice(self.records, self.page, self.page_size)
    }

    pub fn rows(&self) -> Vec<HistoryRow<'a>> {
        if self.records.is_empty() {
            return vec![HistoryRow::Empty];
        }
        self.current().iter().map(HistoryRow::Record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn records(n: usize) -> Vec<Transaction> {
        (1..=n)
            .map(|i| Transaction {
                id: format!("tx{}", i),
                timestamp: Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, i as u32 % 60).unwrap(),
                buyer: mask_buyer("Nguyen"),
                price: dec!(1000000) + Decimal::from(i as u64 * 50000),
            })
            .collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(15, 5), 3);
        assert_eq!(total_pages(16, 5), 4);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(3, 0), 0);
    }

    #[test]
    fn test_first_page_in_order() {
        let all = records(15);
        let ids: Vec<&str> = page_slice(&all, 1, 5).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tx1", "tx2", "tx3", "tx4", "tx5"]);
    }

    #[test]
    fn test_partial_last_page() {
        let all = records(12);
        assert_eq!(page_slice(&all, 3, 5).len(), 2);
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let all = records(15);
        assert!(page_slice(&all, 0, 5).is_empty());
        assert!(page_slice(&all, 4, 5).is_empty());
        assert!(page_slice(&all, usize::MAX, 5).is_empty());
    }

    #[test]
    fn test_view_navigation_clamps() {
        let all = records(15);
        let mut view = TransactionHistory::new(&all);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.page(), 1);

        view.prev();
        assert_eq!(view.page(), 1);

        view.set_page(99);
        assert_eq!(view.page(), 3);
        assert_eq!(view.current()[0].id, "tx11");

        view.next();
        assert_eq!(view.page(), 3);

        view.set_page(0);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_empty_history_row() {
        let view = TransactionHistory::new(&[]);
        assert_eq!(view.rows(), vec![HistoryRow::Empty]);
        assert_eq!(view.total_pages(), 0);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_rows_are_records() {
        let all = records(7);
        let mut view = TransactionHistory::with_page_size(&all, 5);
        view.next();
        let rows = view.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], HistoryRow::Record(&all[5]));
    }

    #[test]
    fn test_mask_buyer() {
        assert_eq!(mask_buyer("Nguyen"), "N****n");
        assert_eq!(mask_buyer("Lê"), "**");
        assert_eq!(mask_buyer("Ánh"), "Á*h");
        assert_eq!(mask_buyer("  "), "");
    }
}
