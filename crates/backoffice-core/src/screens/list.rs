use crate::models::Record;

use super::{LoadState, Notification};

/// State of a table screen: the fetched rows, the cursor, and a delete
/// that is waiting for confirmation.
///
/// Filters live with the caller; methods that deal with the cursor take the
/// filter predicate so the selection always indexes the visible rows.
#[derive(Debug)]
pub struct ListScreen<T> {
    rows: Vec<T>,
    pub state: LoadState,
    pub notice: Notification,
    selected: usize,
    pending_delete: Option<String>,
}

impl<T> Default for ListScreen<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            state: LoadState::Loading,
            notice: Notification::default(),
            selected: 0,
            pending_delete: None,
        }
    }
}

impl<T: Record> ListScreen<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn start_loading(&mut self) {
        self.state = LoadState::Loading;
    }

    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.state = LoadState::Loaded;
        self.clamp(self.rows.len());
    }

    /// Record a failed fetch and raise its banner
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.notice.show_error(message.clone());
        self.state = LoadState::Failed(message);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Drop exactly the row with `id`
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.rows.iter().position(|r| r.id() == id)?;
        let removed = self.rows.remove(index);
        if self.pending_delete.as_deref() == Some(id) {
            self.pending_delete = None;
        }
        self.clamp(self.rows.len());
        Some(removed)
    }

    /// Swap in a fresh copy of a row; false when the row is gone
    pub fn replace(&mut self, record: T) -> bool {
        match self.rows.iter_mut().find(|r| r.id() == record.id()) {
            Some(row) => {
                *row = record;
                true
            }
            None => false,
        }
    }

    pub fn update_where(&mut self, id: &str, f: impl FnOnce(&mut T)) -> bool {
        match self.rows.iter_mut().find(|r| r.id() == id) {
            Some(row) => {
                f(row);
                true
            }
            None => false,
        }
    }

    // ===== Selection =====

    pub fn visible<'a>(&'a self, keep: impl Fn(&T) -> bool) -> Vec<&'a T> {
        self.rows.iter().filter(|r| keep(*r)).collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected<'a>(&'a self, keep: impl Fn(&T) -> bool) -> Option<&'a T> {
        self.rows.iter().filter(|r| keep(*r)).nth(self.selected)
    }

    pub fn selected_row(&self) -> Option<&T> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self, visible_len: usize) {
        if visible_len > 0 && self.selected + 1 < visible_len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, visible_len: usize) {
        self.selected = visible_len.saturating_sub(1);
    }

    /// Keep the cursor inside a list of `visible_len` rows
    pub fn clamp(&mut self, visible_len: usize) {
        if self.selected >= visible_len {
            self.selected = visible_len.saturating_sub(1);
        }
    }

    // ===== Delete confirmation =====

    /// Ask for confirmation before deleting `id`. False if no such row.
    pub fn request_delete(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.pending_delete = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn pending_delete(&self) -> Option<&T> {
        self.pending_delete.as_deref().and_then(|id| self.get(id))
    }

    /// The confirmed id, ready to send to the API
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        label: &'static str,
    }

    impl Record for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, label: &'static str) -> Row {
        Row {
            id: id.to_string(),
            label,
        }
    }

    fn screen() -> ListScreen<Row> {
        let mut s = ListScreen::new();
        s.set_rows(vec![row("A", "one"), row("X", "two"), row("B", "three"), row("XY", "four")]);
        s
    }

    #[test]
    fn test_remove_exactly_that_id() {
        let mut s = screen();
        let removed = s.remove("X").unwrap();
        assert_eq!(removed.label, "two");
        let ids: Vec<&str> = s.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "XY"]);
        assert!(s.remove("X").is_none());
    }

    #[test]
    fn test_replace_and_update_where() {
        let mut s = screen();
        assert!(s.replace(row("B", "updated")));
        assert_eq!(s.get("B").unwrap().label, "updated");
        assert!(!s.replace(row("Z", "missing")));

        assert!(s.update_where("A", |r| r.label = "changed"));
        assert_eq!(s.get("A").unwrap().label, "changed");
        assert!(!s.update_where("Z", |r| r.label = "never"));
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut s = screen();
        assert!(!s.request_delete("Z"));
        assert!(s.request_delete("X"));
        assert_eq!(s.pending_delete().unwrap().label, "two");

        s.cancel_delete();
        assert!(s.pending_delete().is_none());
        assert_eq!(s.confirm_delete(), None);

        s.request_delete("X");
        assert_eq!(s.confirm_delete().as_deref(), Some("X"));
        assert_eq!(s.rows().len(), 4);
    }

    #[test]
    fn test_selection_tracks_filter() {
        let mut s = screen();
        let keep = |r: &Row| r.id.starts_with('X');
        let visible_len = s.visible(keep).len();
        assert_eq!(visible_len, 2);

        s.select_next(visible_len);
        s.select_next(visible_len);
        assert_eq!(s.selected(keep).unwrap().id, "XY");

        s.select_prev();
        assert_eq!(s.selected(keep).unwrap().id, "X");
    }

    #[test]
    fn test_selection_clamped_after_remove() {
        let mut s = screen();
        s.select_last(4);
        s.remove("XY");
        assert_eq!(s.selected_index(), 2);
        assert_eq!(s.selected_row().unwrap().id, "B");
    }

    #[test]
    fn test_fail_sets_banner() {
        let mut s: ListScreen<Row> = ListScreen::new();
        assert_eq!(s.state, LoadState::Loading);
        s.fail("Failed to fetch services");
        assert_eq!(s.state, LoadState::Failed("Failed to fetch services".to_string()));
        assert_eq!(s.notice.error(), Some("Failed to fetch services"));
    }
}
