use serde::{Deserialize, Serialize};

use crate::*;

/// What the player has done to a cell so far.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Unopened,
    Opened,
    Flagged,
}

/// One grid position.
///
/// `adjacent` only carries meaning when `has_mine` is false; the board
/// keeps it at 0 for mined cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    state: CellState,
    has_mine: bool,
    adjacent: u8,
    position: Coord2,
}

impl Cell {
    pub(crate) const fn new(position: Coord2) -> Self {
        Self {
            state: CellState::Unopened,
            has_mine: false,
            adjacent: 0,
            position,
        }
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn has_mine(&self) -> bool {
        self.has_mine
    }

    pub const fn adjacent(&self) -> u8 {
        self.adjacent
    }

    pub const fn position(&self) -> Coord2 {
        self.position
    }

    pub const fn is_unopened(&self) -> bool {
        matches!(self.state, CellState::Unopened)
    }

    pub const fn is_opened(&self) -> bool {
        matches!(self.state, CellState::Opened)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    /// A flag sitting on a safe cell.
    pub const fn is_wrong_flag(&self) -> bool {
        self.is_flagged() && !self.has_mine
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub(crate) fn set_mine(&mut self, has_mine: bool) {
        self.has_mine = has_mine;
        if has_mine {
            self.adjacent = 0;
        }
    }

    pub(crate) fn set_adjacent(&mut self, adjacent: u8) {
        self.adjacent = if self.has_mine { 0 } else { adjacent };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cell_is_unopened_and_safe() {
        let cell = Cell::new((3, 4));

        assert_eq!(cell.state(), CellState::Unopened);
        assert!(!cell.has_mine());
        assert_eq!(cell.adjacent(), 0);
        assert_eq!(cell.position(), (3, 4));
    }

    #[test]
    fn mined_cell_never_carries_a_count() {
        let mut cell = Cell::new((0, 0));
        cell.set_adjacent(3);
        cell.set_mine(true);
        assert_eq!(cell.adjacent(), 0);

        cell.set_adjacent(5);
        assert_eq!(cell.adjacent(), 0);
    }

    #[test]
    fn wrong_flag_only_on_safe_cells() {
        let mut cell = Cell::new((0, 0));
        cell.set_state(CellState::Flagged);
        assert!(cell.is_wrong_flag());

        cell.set_mine(true);
        assert!(!cell.is_wrong_flag());
    }
}
