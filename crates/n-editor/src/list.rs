//! List manager: the ordered outline and its structural edits.
//!
//! `ListManager` owns the item sequence. Document order is display order, and
//! the hierarchy is nothing more than each item's level read in sequence.
//! Every structural or level-changing edit ends with a full renumber, so
//! `number` is always consistent with the levels when control returns to the
//! caller.
//!
//! # Insertion position
//!
//! `current_position` is where the next [`add_item`](ListManager::add_item)
//! lands. It is *not* the editor's focused line; the session keeps the two
//! in step by setting the position before inserting.
//!
//! # Out-of-range indices
//!
//! Delete, indent, outdent, and collapse take an index and quietly do nothing
//! when it is out of range. Nothing here returns an error.

use tracing::debug;

use crate::item::{ItemId, ListItem};
use crate::numbering::{self, MAX_LEVEL};

/// The ordered outline.
#[derive(Debug, Clone, Default)]
pub struct ListManager {
    items: Vec<ListItem>,
    current_position: usize,
    next_id: u64,
}

impl ListManager {
    /// Create an empty outline with the insertion position at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Access -------------------------------------------------------------

    /// All items in document order.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ListItem> {
        self.items.get(index)
    }

    /// Mutable access for content edits. Levels and numbers stay under the
    /// manager's control.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ListItem> {
        self.items.get_mut(index)
    }

    /// The level of every item, in order.
    #[must_use]
    pub fn levels(&self) -> Vec<usize> {
        self.items.iter().map(ListItem::level).collect()
    }

    /// Where the next `add_item` inserts.
    #[inline]
    #[must_use]
    pub const fn current_position(&self) -> usize {
        self.current_position
    }

    /// Move the insertion position, clamped to `0..=len`.
    pub fn set_current_position(&mut self, position: usize) {
        self.current_position = position.min(self.items.len());
    }

    // -- Mutation -----------------------------------------------------------

    /// Insert a new item at the insertion position and advance past it.
    ///
    /// With `level == None` the item inherits the level of the item just
    /// before the insertion point, or 0 at the top of the list. An insertion
    /// position past the end appends.
    pub fn add_item(&mut self, content: impl Into<String>, level: Option<usize>) -> &ListItem {
        let level = level.unwrap_or_else(|| self.recommended_level());
        let id = self.allocate_id();
        let item = ListItem::new(id, content, level);

        let at = self.current_position.min(self.items.len());
        self.items.insert(at, item);
        self.current_position = at + 1;
        self.renumber_items();

        debug!(%id, at, level, "added item");
        &self.items[at]
    }

    /// Level a new item gets when none is given.
    fn recommended_level(&self) -> usize {
        match self.current_position {
            0 => 0,
            pos => self.items.get(pos - 1).map_or(0, ListItem::level),
        }
    }

    const fn allocate_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId::new(self.next_id)
    }

    /// Remove the item at `index`. Out-of-range indices are ignored.
    ///
    /// The insertion position is clamped to the last remaining index (0 when
    /// the list is now empty).
    pub fn delete_item(&mut self, index: usize) -> Option<ListItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.renumber_items();
        self.current_position = self
            .current_position
            .min(self.items.len().saturating_sub(1));

        debug!(id = %removed.id(), index, remaining = self.items.len(), "deleted item");
        Some(removed)
    }

    /// Increase the level of the item at `index`, up to [`MAX_LEVEL`].
    pub fn indent_item(&mut self, index: usize) {
        self.shift_level(index, |level| (level + 1).min(MAX_LEVEL));
    }

    /// Decrease the level of the item at `index`, down to 0.
    pub fn outdent_item(&mut self, index: usize) {
        self.shift_level(index, |level| level.saturating_sub(1));
    }

    fn shift_level(&mut self, index: usize, f: impl FnOnce(usize) -> usize) {
        let Some(item) = self.items.get_mut(index) else {
            return;
        };
        let level = f(item.level());
        item.set_level(level);
        self.renumber_items();
    }

    /// Flip the collapsed flag of the item at `index`.
    pub fn toggle_collapse(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.collapsed = !item.collapsed;
        }
    }

    /// Recompute every item's section number from the level sequence.
    pub fn renumber_items(&mut self) {
        let numbers = numbering::renumber(&self.levels());
        for (item, number) in self.items.iter_mut().zip(numbers) {
            item.set_number(number);
        }
    }

    /// Drop every item and reset the insertion position. Ids keep counting
    /// up so none is ever reused within a session.
    pub fn clear(&mut self) {
        self.items.clear();
        self.current_position = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn list_with_levels(levels: &[usize]) -> ListManager {
        let mut list = ListManager::new();
        for (i, &level) in levels.iter().enumerate() {
            list.add_item(format!("item {i}"), Some(level));
        }
        list
    }

    fn numbers(list: &ListManager) -> Vec<&str> {
        list.items().iter().map(ListItem::number).collect()
    }

    fn contents(list: &ListManager) -> Vec<&str> {
        list.items().iter().map(|i| i.content.as_str()).collect()
    }

    // -- add_item -----------------------------------------------------------

    #[test]
    fn add_to_empty_list() {
        let mut list = ListManager::new();
        let item = list.add_item("first", None);
        assert_eq!(item.level(), 0);
        assert_eq!(item.number(), "1");
        assert_eq!(list.current_position(), 1);
    }

    #[test]
    fn add_inherits_previous_level() {
        let mut list = ListManager::new();
        list.add_item("a", Some(0));
        list.add_item("b", Some(2));
        let c = list.add_item("c", None);
        assert_eq!(c.level(), 2);
    }

    #[test]
    fn add_at_top_defaults_to_level_zero() {
        let mut list = list_with_levels(&[3]);
        list.set_current_position(0);
        let item = list.add_item("top", None);
        assert_eq!(item.level(), 0);
        assert_eq!(contents(&list), vec!["top", "item 0"]);
    }

    #[test]
    fn add_in_the_middle_shifts_right() {
        let mut list = list_with_levels(&[0, 0, 0]);
        list.set_current_position(1);
        list.add_item("new", None);
        assert_eq!(contents(&list), vec!["item 0", "new", "item 1", "item 2"]);
        assert_eq!(list.current_position(), 2);
        assert_eq!(numbers(&list), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn add_clamps_explicit_level() {
        let mut list = ListManager::new();
        assert_eq!(list.add_item("x", Some(42)).level(), MAX_LEVEL);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let list = list_with_levels(&[0, 0, 0]);
        let ids: Vec<u64> = list.items().iter().map(|i| i.id().get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn ids_not_reused_after_clear() {
        let mut list = list_with_levels(&[0, 0]);
        list.clear();
        assert_eq!(list.add_item("again", None).id().get(), 3);
    }

    #[test]
    fn set_current_position_clamps_to_len() {
        let mut list = list_with_levels(&[0, 0]);
        list.set_current_position(99);
        assert_eq!(list.current_position(), 2);
    }

    // -- delete_item --------------------------------------------------------

    #[test]
    fn delete_renumbers() {
        let mut list = list_with_levels(&[0, 1, 1, 0]);
        let removed = list.delete_item(1);
        assert_eq!(removed.map(|i| i.content), Some("item 1".to_string()));
        assert_eq!(numbers(&list), vec!["1", "1.1", "2"]);
    }

    #[test]
    fn delete_out_of_range_is_noop() {
        let mut list = list_with_levels(&[0, 0]);
        assert!(list.delete_item(2).is_none());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn delete_clamps_current_position() {
        let mut list = list_with_levels(&[0, 0, 0]);
        assert_eq!(list.current_position(), 3);
        list.delete_item(0);
        assert_eq!(list.current_position(), 1);
    }

    #[test]
    fn delete_last_item_resets_position() {
        let mut list = list_with_levels(&[0]);
        list.delete_item(0);
        assert!(list.is_empty());
        assert_eq!(list.current_position(), 0);
    }

    // -- indent / outdent ---------------------------------------------------

    #[test]
    fn indent_then_outdent() {
        let mut list = list_with_levels(&[0, 0]);
        list.indent_item(1);
        assert_eq!(numbers(&list), vec!["1", "1.1"]);
        list.outdent_item(1);
        assert_eq!(numbers(&list), vec!["1", "2"]);
    }

    #[test]
    fn indent_stops_at_max_level() {
        let mut list = list_with_levels(&[0]);
        for _ in 0..20 {
            list.indent_item(0);
        }
        assert_eq!(list.items()[0].level(), MAX_LEVEL);
    }

    #[test]
    fn outdent_stops_at_zero() {
        let mut list = list_with_levels(&[1]);
        list.outdent_item(0);
        list.outdent_item(0);
        assert_eq!(list.items()[0].level(), 0);
    }

    #[test]
    fn indent_out_of_range_is_noop() {
        let mut list = list_with_levels(&[0]);
        list.indent_item(5);
        list.outdent_item(5);
        assert_eq!(list.levels(), vec![0]);
    }

    // -- toggle_collapse ----------------------------------------------------

    #[test]
    fn toggle_collapse_flips_and_survives_edits() {
        let mut list = list_with_levels(&[0, 0]);
        list.toggle_collapse(1);
        assert!(list.items()[1].collapsed);
        list.indent_item(1);
        list.set_current_position(0);
        list.add_item("above", None);
        assert!(list.items()[2].collapsed);
        list.toggle_collapse(2);
        assert!(!list.items()[2].collapsed);
    }

    #[test]
    fn toggle_collapse_out_of_range_is_noop() {
        let mut list = list_with_levels(&[0]);
        list.toggle_collapse(3);
        assert!(!list.items()[0].collapsed);
    }

    // -- Properties ---------------------------------------------------------

    proptest! {
        #[test]
        fn n_adds_leave_position_at_n(contents in prop::collection::vec(".*", 0..32)) {
            let mut list = ListManager::new();
            for text in &contents {
                list.add_item(text.clone(), None);
            }
            prop_assert_eq!(list.len(), contents.len());
            prop_assert_eq!(list.current_position(), contents.len());
            for (item, text) in list.items().iter().zip(&contents) {
                prop_assert_eq!(&item.content, text);
            }
        }

        #[test]
        fn levels_stay_in_bounds(ops in prop::collection::vec((any::<bool>(), 0usize..4), 0..200)) {
            let mut list = list_with_levels(&[0, 0, 0]);
            for (indent, index) in ops {
                if indent {
                    list.indent_item(index);
                } else {
                    list.outdent_item(index);
                }
                prop_assert!(list.levels().iter().all(|&l| l <= MAX_LEVEL));
                prop_assert!(list.current_position() <= list.len());
            }
        }
    }
}
