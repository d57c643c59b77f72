use ndarray::Array2;
use rand::Rng;
use serde::Serialize;
use smallvec::SmallVec;

use crate::*;

/// Rectangular grid of cells, indexed `[col, row]`.
///
/// Invariants held between public calls:
/// - exactly `mine_count` cells have a mine,
/// - every safe cell's `adjacent` equals the mines among its neighbors.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    fn blank(size: Coord2) -> Self {
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(col, row)| {
            Cell::new((col as Coord, row as Coord))
        });
        Self {
            cells,
            mine_count: 0,
        }
    }

    /// Places `config.mines` mines by drawing uniform `(col, row)` pairs and
    /// retrying on collision, then labels every safe cell.
    ///
    /// Panics if the config leaves no safe cell, the placement loop could
    /// never finish otherwise. Configs built through [`GameConfig::new`] or
    /// [`Difficulty::config`] always satisfy this.
    pub fn generate<R: Rng>(config: GameConfig, rng: &mut R) -> Self {
        let (width, height) = config.size;
        assert!(
            width > 0 && height > 0 && config.mines < config.total_cells(),
            "cannot place {} mines on a {}x{} board",
            config.mines,
            width,
            height
        );

        let mut board = Self::blank(config.size);
        let mut draws = 0u32;
        while board.mine_count < config.mines {
            draws += 1;
            let coords = (rng.random_range(0..width), rng.random_range(0..height));
            let cell = &mut board.cells[coords.to_nd_index()];
            if !cell.has_mine() {
                cell.set_mine(true);
                board.mine_count += 1;
            }
        }
        board.recompute_adjacency();

        log::debug!(
            "generated {}x{} board with {} mines in {} draws",
            width,
            height,
            board.mine_count,
            draws
        );
        board
    }

    /// Builds a board with mines exactly at `mine_coords`. Duplicates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        let mut board = Self::blank(size);
        for &coords in mine_coords {
            if !board.contains(coords) {
                return Err(GameError::InvalidCoords);
            }
            let cell = &mut board.cells[coords.to_nd_index()];
            if !cell.has_mine() {
                cell.set_mine(true);
                board.mine_count += 1;
            }
        }
        board.recompute_adjacency();
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.cells.dim();
        (width as Coord, height as Coord)
    }

    pub fn contains(&self, (col, row): Coord2) -> bool {
        let (width, height) = self.size();
        col < width && row < height
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// All cells, column by column.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_where(Cell::is_flagged)
    }

    pub fn opened_count(&self) -> CellCount {
        self.count_where(Cell::is_opened)
    }

    fn count_where(&self, pred: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells.iter().filter(|&cell| pred(cell)).count() as CellCount
    }

    /// In-bounds Moore neighbors of `coords`, between 0 and 8 of them.
    pub fn neighbors(&self, coords: Coord2) -> SmallVec<[Coord2; 8]> {
        Neighbors::new(coords, self.size()).collect()
    }

    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        Neighbors::new(coords, self.size())
            .filter(|&pos| self.cells[pos.to_nd_index()].has_mine())
            .count() as u8
    }

    /// Relabels every safe cell. Needed after any change to mine placement.
    pub fn recompute_adjacency(&mut self) {
        let (width, height) = self.size();
        for col in 0..width {
            for row in 0..height {
                let count = self.count_adjacent_mines((col, row));
                self.cells[(col, row).to_nd_index()].set_adjacent(count);
            }
        }
    }

    /// Opens `coords` and, when it is a safe zero, floods across the connected
    /// zero region, also exposing the numbered cells on its border.
    ///
    /// Flagged, opened or out-of-bounds targets are left alone. Mined
    /// neighbors and flags are never touched by the flood. Returns how many
    /// cells were opened.
    pub fn reveal_flood(&mut self, coords: Coord2) -> CellCount {
        let Some(&target) = self.cell(coords) else {
            return 0;
        };
        if !target.is_unopened() {
            return 0;
        }

        self.set_state(coords, CellState::Opened);
        if target.has_mine() || target.adjacent() > 0 {
            return 1;
        }

        let mut opened = 1;
        let mut pending = vec![coords];
        while let Some(current) = pending.pop() {
            for next in self.neighbors(current) {
                let cell = self.cells[next.to_nd_index()];
                if !cell.is_unopened() || cell.has_mine() {
                    continue;
                }

                self.set_state(next, CellState::Opened);
                opened += 1;
                if cell.adjacent() == 0 {
                    pending.push(next);
                }
            }
        }
        opened
    }

    /// Removes the mine at `coords`, returning whether there was one.
    /// Adjacency is stale until [`Board::recompute_adjacency`].
    pub fn clear_mine(&mut self, coords: Coord2) -> bool {
        let Some(cell) = self.cells.get_mut(coords.to_nd_index()) else {
            return false;
        };
        if !cell.has_mine() {
            return false;
        }
        cell.set_mine(false);
        self.mine_count -= 1;
        true
    }

    /// Mines the first safe cell in row-major order (row by row, left to
    /// right), skipping `exclude`. Returns the cell that received the mine.
    /// Adjacency is stale until [`Board::recompute_adjacency`].
    pub fn relocate_first_mine(&mut self, exclude: Coord2) -> Option<Coord2> {
        let (width, height) = self.size();
        let target = (0..height)
            .flat_map(|row| (0..width).map(move |col| (col, row)))
            .find(|&coords| coords != exclude && !self.cells[coords.to_nd_index()].has_mine())?;

        self.cells[target.to_nd_index()].set_mine(true);
        self.mine_count += 1;
        Some(target)
    }

    /// Opens every mined cell, flagged ones included.
    pub fn open_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.has_mine()) {
            cell.set_state(CellState::Opened);
        }
    }

    /// No cell is left unopened and no flag sits on a safe cell.
    pub fn is_cleared(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| !cell.is_unopened() && !cell.is_wrong_flag())
    }

    pub(crate) fn set_state(&mut self, coords: Coord2, state: CellState) {
        self.cells[coords.to_nd_index()].set_state(state);
    }
}
