use std::collections::BTreeSet;
use std::fmt;

use quiz_core::model::{ItemKey, OptionId};

//
// ─── COLUMNS & PAIRS ───────────────────────────────────────────────────────────
//

/// Side of a matching board. Left holds the A items, right the B items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Left,
    Right,
}

impl Column {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Column::Left => Column::Right,
            Column::Right => Column::Left,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Left => f.write_str("left"),
            Column::Right => f.write_str("right"),
        }
    }
}

/// A committed left/right pairing made by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemPair {
    pub left: ItemKey,
    pub right: ItemKey,
}

impl ItemPair {
    #[must_use]
    pub fn key_in(&self, column: Column) -> ItemKey {
        match column {
            Column::Left => self.left,
            Column::Right => self.right,
        }
    }
}

/// What a single click on a matching item did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The item was part of a pair; the pair is gone.
    Unmatched(ItemPair),
    /// The click completed a pair with the other column's pending item.
    Paired(ItemPair),
    /// The item is now the pending selection of its column.
    Pending,
    /// The item was pending and has been deselected.
    Cleared,
}

//
// ─── PAIR BOARD ────────────────────────────────────────────────────────────────
//

/// Click-to-pair state for one matching group.
///
/// At most one pending item per column; an item that is part of a committed
/// pair can never be pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairBoard {
    pairs: Vec<ItemPair>,
    pending_left: Option<ItemKey>,
    pending_right: Option<ItemKey>,
}

impl PairBoard {
    #[must_use]
    pub fn pairs(&self) -> &[ItemPair] {
        &self.pairs
    }

    #[must_use]
    pub fn pending(&self, column: Column) -> Option<ItemKey> {
        match column {
            Column::Left => self.pending_left,
            Column::Right => self.pending_right,
        }
    }

    /// The pair `key` belongs to, if it is matched.
    #[must_use]
    pub fn pair_for(&self, column: Column, key: ItemKey) -> Option<ItemPair> {
        self.pairs
            .iter()
            .copied()
            .find(|pair| pair.key_in(column) == key)
    }

    #[must_use]
    pub fn is_paired(&self, column: Column, key: ItemKey) -> bool {
        self.pair_for(column, key).is_some()
    }

    fn pending_slot(&mut self, column: Column) -> &mut Option<ItemKey> {
        match column {
            Column::Left => &mut self.pending_left,
            Column::Right => &mut self.pending_right,
        }
    }

    /// Apply a click on `key` in `column`.
    pub fn toggle(&mut self, column: Column, key: ItemKey) -> ToggleOutcome {
        if let Some(index) = self.pairs.iter().position(|p| p.key_in(column) == key) {
            return ToggleOutcome::Unmatched(self.pairs.remove(index));
        }

        if self.pending(column) == Some(key) {
            *self.pending_slot(column) = None;
            return ToggleOutcome::Cleared;
        }

        match self.pending(column.other()) {
            Some(counterpart) => {
                let pair = match column {
                    Column::Left => ItemPair {
                        left: key,
                        right: counterpart,
                    },
                    Column::Right => ItemPair {
                        left: counterpart,
                        right: key,
                    },
                };
                self.pending_left = None;
                self.pending_right = None;
                self.pairs.push(pair);
                ToggleOutcome::Paired(pair)
            }
            None => {
                *self.pending_slot(column) = Some(key);
                ToggleOutcome::Pending
            }
        }
    }
}

//
// ─── USER ANSWER ───────────────────────────────────────────────────────────────
//

/// The answer recorded for one step. Recording never grades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAnswer {
    Choice(BTreeSet<OptionId>),
    Matching(PairBoard),
}

impl UserAnswer {
    #[must_use]
    pub fn selected_options(&self) -> Option<&BTreeSet<OptionId>> {
        match self {
            UserAnswer::Choice(selected) => Some(selected),
            UserAnswer::Matching(_) => None,
        }
    }

    #[must_use]
    pub fn board(&self) -> Option<&PairBoard> {
        match self {
            UserAnswer::Matching(board) => Some(board),
            UserAnswer::Choice(_) => None,
        }
    }
}

/// Single-answer questions replace the selection, multi-answer ones toggle.
pub(crate) fn record_choice(selected: &mut BTreeSet<OptionId>, option: OptionId, allow_multiple: bool) {
    if allow_multiple {
        if !selected.remove(&option) {
            selected.insert(option);
        }
    } else {
        selected.clear();
        selected.insert(option);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_answer_replaces_selection() {
        let mut selected = BTreeSet::new();
        record_choice(&mut selected, OptionId::new(1), false);
        record_choice(&mut selected, OptionId::new(2), false);
        assert_eq!(selected, BTreeSet::from([OptionId::new(2)]));
    }

    #[test]
    fn multi_answer_toggles_membership() {
        let mut selected = BTreeSet::new();
        record_choice(&mut selected, OptionId::new(1), true);
        record_choice(&mut selected, OptionId::new(2), true);
        record_choice(&mut selected, OptionId::new(1), true);
        assert_eq!(selected, BTreeSet::from([OptionId::new(2)]));
    }

    #[test]
    fn left_then_right_commits_pair() {
        let (l, r) = (ItemKey::random(), ItemKey::random());
        let mut board = PairBoard::default();

        assert_eq!(board.toggle(Column::Left, l), ToggleOutcome::Pending);
        assert_eq!(board.pending(Column::Left), Some(l));

        let outcome = board.toggle(Column::Right, r);
        assert_eq!(outcome, ToggleOutcome::Paired(ItemPair { left: l, right: r }));
        assert_eq!(board.pending(Column::Left), None);
        assert_eq!(board.pending(Column::Right), None);
        assert_eq!(board.pairs().len(), 1);
    }

    #[test]
    fn right_first_is_symmetric() {
        let (l, r) = (ItemKey::random(), ItemKey::random());
        let mut board = PairBoard::default();
        board.toggle(Column::Right, r);
        let outcome = board.toggle(Column::Left, l);
        assert_eq!(outcome, ToggleOutcome::Paired(ItemPair { left: l, right: r }));
    }

    #[test]
    fn clicking_paired_item_unmatches_back_to_initial_state() {
        let (l, r) = (ItemKey::random(), ItemKey::random());
        let mut board = PairBoard::default();
        let before = board.clone();

        board.toggle(Column::Left, l);
        board.toggle(Column::Right, r);
        let outcome = board.toggle(Column::Left, l);

        assert_eq!(outcome, ToggleOutcome::Unmatched(ItemPair { left: l, right: r }));
        assert_eq!(board, before);
    }

    #[test]
    fn new_pending_replaces_previous_in_same_column() {
        let (a, b) = (ItemKey::random(), ItemKey::random());
        let mut board = PairBoard::default();
        board.toggle(Column::Left, a);
        board.toggle(Column::Left, b);
        assert_eq!(board.pending(Column::Left), Some(b));
        assert!(board.pairs().is_empty());
    }

    #[test]
    fn clicking_pending_item_clears_it() {
        let a = ItemKey::random();
        let mut board = PairBoard::default();
        board.toggle(Column::Right, a);
        assert_eq!(board.toggle(Column::Right, a), ToggleOutcome::Cleared);
        assert_eq!(board.pending(Column::Right), None);
    }

    #[test]
    fn paired_item_cannot_become_pending() {
        let (l, r, l2) = (ItemKey::random(), ItemKey::random(), ItemKey::random());
        let mut board = PairBoard::default();
        board.toggle(Column::Left, l);
        board.toggle(Column::Right, r);

        board.toggle(Column::Left, l2);
        // r is already paired: the click unmatches it instead of pairing with l2.
        assert!(matches!(
            board.toggle(Column::Right, r),
            ToggleOutcome::Unmatched(_)
        ));
        assert_eq!(board.pending(Column::Left), Some(l2));
        assert!(board.pairs().is_empty());
    }
}
