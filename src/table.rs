//! Generic table engine: free-text search, per-column sort and pagination.
//!
//! The engine works over any record type implementing [`TableRow`]. View
//! state lives in [`TableState`]; everything shown on screen is recomputed by
//! [`derive`] from that state and the (immutable) data slice.

use crate::error::TableError;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Page-size choices offered by the rows-per-page selector.
pub const ROWS_PER_PAGE_CHOICES: [usize; 3] = [10, 25, 50];

/// Maximum number of page buttons rendered between Prev and Next.
const PAGE_WINDOW: usize = 3;

/// A record the table can display.
pub trait TableRow {
    type Key: Copy + Eq;

    /// Value of one column. `None` is treated as an empty string.
    fn cell(&self, key: Self::Key) -> Option<Cow<'_, str>>;

    /// Every field value of the record, used for free-text search.
    fn cells(&self) -> Vec<Cow<'_, str>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column<K> {
    pub key: K,
    pub label: &'static str,
}

impl<K> Column<K> {
    pub const fn new(key: K, label: &'static str) -> Self {
        Self { key, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortOrder::Asc => "▲",
            SortOrder::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowsPerPage {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl RowsPerPage {
    pub fn get(self) -> usize {
        match self {
            RowsPerPage::Ten => 10,
            RowsPerPage::TwentyFive => 25,
            RowsPerPage::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for RowsPerPage {
    type Error = TableError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            10 => Ok(RowsPerPage::Ten),
            25 => Ok(RowsPerPage::TwentyFive),
            50 => Ok(RowsPerPage::Fifty),
            other => Err(TableError::InvalidRowsPerPage(other)),
        }
    }
}

/// Transient view state. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState<K> {
    pub search: String,
    pub sort: Option<(K, SortOrder)>,
    pub page: usize,
    pub rows_per_page: RowsPerPage,
}

impl<K> Default for TableState<K> {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: None,
            page: 1,
            rows_per_page: RowsPerPage::default(),
        }
    }
}

/// Everything the view needs to render one frame of the table.
#[derive(Debug)]
pub struct DerivedView<'a, T> {
    /// Number of records matching the search.
    pub filtered_len: usize,
    pub total_pages: usize,
    /// Current page after clamping to `[1, total_pages]`.
    pub page: usize,
    pub rows: Vec<&'a T>,
    /// Page numbers to render as navigation buttons.
    pub page_numbers: Vec<usize>,
}

impl<T> DerivedView<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

fn row_matches<T: TableRow>(row: &T, needle: &str) -> bool {
    row.cells().join(" ").to_lowercase().contains(needle)
}

fn filter<'a, T: TableRow>(data: &'a [T], search: &str) -> Vec<&'a T> {
    if search.is_empty() {
        return data.iter().collect();
    }
    let needle = search.to_lowercase();
    data.iter().filter(|row| row_matches(*row, &needle)).collect()
}

fn sort_key<T: TableRow>(row: &T, key: T::Key) -> String {
    row.cell(key).unwrap_or_default().to_lowercase()
}

fn compare<T: TableRow>(a: &T, b: &T, key: T::Key, order: SortOrder) -> Ordering {
    let ord = sort_key(a, key).cmp(&sort_key(b, key));
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

fn total_pages(len: usize, rows_per_page: RowsPerPage) -> usize {
    len.div_ceil(rows_per_page.get())
}

/// Up to three consecutive page numbers centred on `page`, shifted to the
/// start on the first page and to the end on the last.
pub fn page_numbers(page: usize, total_pages: usize) -> Vec<usize> {
    let mut start = page.saturating_sub(1).max(1);
    let mut end = (page + 1).min(total_pages);
    if page == 1 {
        end = total_pages.min(PAGE_WINDOW);
    }
    if page == total_pages {
        start = total_pages.saturating_sub(PAGE_WINDOW - 1).max(1);
    }
    (start..=end).collect()
}

/// Filter, sort and slice `data` according to `state`.
pub fn derive<'a, T: TableRow>(state: &TableState<T::Key>, data: &'a [T]) -> DerivedView<'a, T> {
    let mut rows = filter(data, &state.search);
    if let Some((key, order)) = state.sort {
        // `sort_by` is stable, so equal keys keep their original order.
        rows.sort_by(|a, b| compare(*a, *b, key, order));
    }

    let filtered_len = rows.len();
    let total_pages = total_pages(filtered_len, state.rows_per_page);
    let page = state.page.clamp(1, total_pages.max(1));
    let per_page = state.rows_per_page.get();
    let rows: Vec<&T> = rows
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    DerivedView {
        filtered_len,
        total_pages,
        page,
        rows,
        page_numbers: page_numbers(page, total_pages),
    }
}

/// A table bound to a data slice and a set of columns.
pub struct Table<'a, T: TableRow> {
    data: &'a [T],
    columns: Vec<Column<T::Key>>,
    title: String,
    state: TableState<T::Key>,
}

impl<'a, T: TableRow> Table<'a, T> {
    pub fn new(data: &'a [T], columns: Vec<Column<T::Key>>) -> Self {
        Self {
            data,
            columns,
            title: "Data Table".to_string(),
            state: TableState::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_rows_per_page(mut self, rows_per_page: RowsPerPage) -> Self {
        self.state.rows_per_page = rows_per_page;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[Column<T::Key>] {
        &self.columns
    }

    pub fn state(&self) -> &TableState<T::Key> {
        &self.state
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search = text.into();
        self.state.page = 1;
    }

    /// Same column toggles direction; a new column starts ascending.
    pub fn set_sort(&mut self, key: T::Key) {
        self.state.sort = match self.state.sort {
            Some((current, order)) if current == key => Some((key, order.toggle())),
            _ => Some((key, SortOrder::Asc)),
        };
    }

    /// Moves to page `n` if it exists; otherwise leaves the page unchanged.
    /// Returns whether the page changed.
    pub fn set_page(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.total_pages() {
            self.state.page = n;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.state.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.state.page.checked_sub(1) {
            Some(n) => self.set_page(n),
            None => false,
        }
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: RowsPerPage) {
        self.state.rows_per_page = rows_per_page;
        self.state.page = 1;
    }

    pub fn total_pages(&self) -> usize {
        total_pages(
            filter(self.data, &self.state.search).len(),
            self.state.rows_per_page,
        )
    }

    pub fn derive(&self) -> DerivedView<'a, T> {
        derive(&self.state, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct City {
        name: &'static str,
        state: Option<&'static str>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum CityKey {
        Name,
        State,
    }

    impl TableRow for City {
        type Key = CityKey;

        fn cell(&self, key: CityKey) -> Option<Cow<'_, str>> {
            match key {
                CityKey::Name => Some(Cow::Borrowed(self.name)),
                CityKey::State => self.state.map(Cow::Borrowed),
            }
        }

        fn cells(&self) -> Vec<Cow<'_, str>> {
            vec![
                Cow::Borrowed(self.name),
                Cow::Borrowed(self.state.unwrap_or("")),
            ]
        }
    }

    fn city(name: &'static str, state: Option<&'static str>) -> City {
        City { name, state }
    }

    fn columns() -> Vec<Column<CityKey>> {
        vec![
            Column::new(CityKey::Name, "Name"),
            Column::new(CityKey::State, "State"),
        ]
    }

    fn numbered(n: usize) -> Vec<City> {
        const NAMES: [&str; 12] = [
            "Seattle", "Tacoma", "Spokane", "Bellevue", "Kent", "Everett", "Renton", "Yakima",
            "Redmond", "Kirkland", "Olympia", "Bothell",
        ];
        NAMES.into_iter().cycle().take(n).map(|name| city(name, Some("WA"))).collect()
    }

    #[test]
    fn search_finds_single_matching_record() {
        let data = vec![
            city("Seattle", Some("WA")),
            city("Portland", Some("OR")),
            city("Boise", Some("ID")),
        ];
        let mut table = Table::new(&data, columns());
        table.set_search("PORT");
        let view = table.derive();
        assert_eq!(view.filtered_len, 1);
        assert_eq!(view.rows, vec![&data[1]]);
    }

    #[test]
    fn search_matches_across_joined_fields() {
        let data = vec![city("Seattle", Some("WA")), city("Boise", Some("ID"))];
        let mut table = Table::new(&data, columns());
        table.set_search("seattle wa");
        assert_eq!(table.derive().rows, vec![&data[0]]);
    }

    #[test]
    fn clearing_search_restores_all_rows_and_resets_page() {
        let data = numbered(12);
        let mut table = Table::new(&data, columns());
        assert!(table.set_page(2));
        table.set_search("seattle");
        assert_eq!(table.state().page, 1);
        assert_eq!(table.derive().filtered_len, 1);

        table.set_page(1);
        table.set_search("");
        let view = table.derive();
        assert_eq!(view.filtered_len, 12);
        assert_eq!(view.page, 1);
    }

    #[test]
    fn sorting_same_column_toggles_direction() {
        let data = vec![
            city("b", None),
            city("A", None),
            city("c", None),
        ];
        let mut table = Table::new(&data, columns());

        table.set_sort(CityKey::Name);
        assert_eq!(table.state().sort, Some((CityKey::Name, SortOrder::Asc)));
        let names: Vec<_> = table.derive().rows.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A", "b", "c"]);

        table.set_sort(CityKey::Name);
        assert_eq!(table.state().sort, Some((CityKey::Name, SortOrder::Desc)));
        let names: Vec<_> = table.derive().rows.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["c", "b", "A"]);
    }

    #[test]
    fn sorting_new_column_starts_ascending() {
        let data = vec![city("x", Some("b"))];
        let mut table = Table::new(&data, columns());
        table.set_sort(CityKey::Name);
        table.set_sort(CityKey::Name);
        table.set_sort(CityKey::State);
        assert_eq!(table.state().sort, Some((CityKey::State, SortOrder::Asc)));
    }

    #[test]
    fn sort_is_stable_and_treats_missing_as_empty() {
        let data = vec![
            city("first", Some("WA")),
            city("nostate", None),
            city("second", Some("wa")),
            city("third", Some("OR")),
        ];
        let mut table = Table::new(&data, columns());
        table.set_sort(CityKey::State);
        let names: Vec<_> = table.derive().rows.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["nostate", "third", "first", "second"]);

        table.set_sort(CityKey::State);
        let names: Vec<_> = table.derive().rows.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["first", "second", "third", "nostate"]);
    }

    #[test]
    fn out_of_range_pages_are_ignored() {
        let data = numbered(12);
        let mut table = Table::new(&data, columns());
        assert_eq!(table.total_pages(), 2);
        assert!(!table.set_page(0));
        assert!(!table.set_page(3));
        assert_eq!(table.state().page, 1);
        assert!(table.set_page(2));
        assert!(!table.next_page());
        assert!(table.prev_page());
        assert!(!table.prev_page());
        assert_eq!(table.state().page, 1);
    }

    #[test]
    fn rows_per_page_change_resets_page() {
        let data = numbered(30);
        let mut table = Table::new(&data, columns());
        assert!(table.set_page(3));
        table.set_rows_per_page(RowsPerPage::TwentyFive);
        assert_eq!(table.state().page, 1);
        let view = table.derive();
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.rows.len(), 25);
    }

    #[test]
    fn rows_per_page_only_accepts_fixed_choices() {
        assert_eq!(RowsPerPage::try_from(25), Ok(RowsPerPage::TwentyFive));
        assert_eq!(
            RowsPerPage::try_from(20),
            Err(TableError::InvalidRowsPerPage(20))
        );
        for n in ROWS_PER_PAGE_CHOICES {
            assert_eq!(RowsPerPage::try_from(n).map(RowsPerPage::get), Ok(n));
        }
    }

    #[test]
    fn twelve_rows_make_two_pages() {
        let data = numbered(12);
        let mut table = Table::new(&data, columns());

        let view = table.derive();
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.page_numbers, vec![1, 2]);
        assert!(!view.has_prev());
        assert!(view.has_next());

        table.set_page(2);
        let view = table.derive();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.page_numbers, vec![1, 2]);
        assert!(view.has_prev());
        assert!(!view.has_next());
    }

    #[test]
    fn page_window_is_centred_and_bounded() {
        assert_eq!(page_numbers(1, 10), vec![1, 2, 3]);
        assert_eq!(page_numbers(5, 10), vec![4, 5, 6]);
        assert_eq!(page_numbers(10, 10), vec![8, 9, 10]);
        assert_eq!(page_numbers(1, 1), vec![1]);
        assert!(page_numbers(1, 0).is_empty());
    }

    #[test]
    fn empty_result_yields_no_rows_or_pages() {
        let data = numbered(5);
        let mut table = Table::new(&data, columns());
        table.set_search("zzz");
        let view = table.derive();
        assert_eq!(view.filtered_len, 0);
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.page, 1);
        assert!(view.rows.is_empty());
        assert!(view.page_numbers.is_empty());
    }

    #[test]
    fn derive_clamps_stale_page() {
        let data = numbered(12);
        let state = TableState {
            page: 9,
            ..TableState::default()
        };
        let view = derive(&state, &data);
        assert_eq!(view.page, 2);
        assert_eq!(view.rows.len(), 2);
    }
}
