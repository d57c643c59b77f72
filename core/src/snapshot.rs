use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a presentation layer should draw for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Hidden,
    Flagged,
    Number(u8),
    Mine,
    TriggeredMine,
    /// Flag on a safe cell, only exposed once the game is lost
    WrongFlag,
}

impl TileView {
    fn of(cell: &Cell, status: GameStatus, triggered: Option<Coord2>) -> Self {
        match cell.state() {
            CellState::Unopened => Self::Hidden,
            CellState::Flagged if status == GameStatus::Dead && !cell.has_mine() => Self::WrongFlag,
            CellState::Flagged => Self::Flagged,
            CellState::Opened if cell.has_mine() && triggered == Some(cell.position()) => {
                Self::TriggeredMine
            }
            CellState::Opened if cell.has_mine() => Self::Mine,
            CellState::Opened => Self::Number(cell.adjacent()),
        }
    }
}

/// Read-only picture of a session, safe to hand to a renderer or serialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub difficulty: Difficulty,
    pub size: Coord2,
    pub status: GameStatus,
    pub flags_remaining: CellCount,
    pub elapsed_secs: u32,
    pub best_time: Option<u32>,
    pub triggered_mine: Option<Coord2>,
    pub tiles: Array2<TileView>,
}

impl Snapshot {
    pub fn from_session<S>(session: &GameSession<S>) -> Self {
        let board = session.board();
        let status = session.status();
        let triggered_mine = session.triggered_mine();
        let tiles = board
            .cells()
            .map(|cell| TileView::of(cell, status, triggered_mine));

        Self {
            difficulty: session.difficulty(),
            size: board.size(),
            status,
            flags_remaining: session.flags_remaining(),
            elapsed_secs: session.elapsed_secs(),
            best_time: session.best_time(),
            triggered_mine,
            tiles,
        }
    }

    pub fn tile(&self, coords: Coord2) -> Option<TileView> {
        self.tiles.get(coords.to_nd_index()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lost_session() -> (GameSession<MemoryScoreStore>, Coord2, Coord2) {
        let mut session = GameSession::new(Difficulty::Beginner, MemoryScoreStore::new(), 12);
        let board = session.board().clone();
        let safe: Vec<_> = board.iter().filter(|c| !c.has_mine()).map(Cell::position).collect();
        let mines: Vec<_> = board.iter().filter(|c| c.has_mine()).map(Cell::position).collect();

        let wrong = *safe.last().unwrap();

        session.toggle_flag(wrong);
        session.reveal(safe[0]);
        session.reveal(mines[0]);
        (session, mines[0], wrong)
    }

    #[test]
    fn fresh_session_is_all_hidden() {
        let session = GameSession::new(Difficulty::Expert, MemoryScoreStore::new(), 1);

        let snapshot = Snapshot::from_session(&session);

        assert_eq!(snapshot.size, (30, 16));
        assert_eq!(snapshot.flags_remaining, 99);
        assert!(snapshot.tiles.iter().all(|&t| t == TileView::Hidden));
        assert_eq!(snapshot.tile((30, 0)), None);
    }

    #[test]
    fn loss_exposes_mines_and_wrong_flags() {
        let (session, triggered, wrong) = lost_session();

        let snapshot = Snapshot::from_session(&session);

        assert_eq!(snapshot.status, GameStatus::Dead);
        assert_eq!(snapshot.tile(triggered), Some(TileView::TriggeredMine));
        assert_eq!(snapshot.tile(wrong), Some(TileView::WrongFlag));
        assert_eq!(
            snapshot.tiles.iter().filter(|&&t| t == TileView::Mine).count(),
            9
        );
    }

    #[test]
    fn serializes_to_json() {
        let (session, _, _) = lost_session();

        let json = serde_json::to_value(Snapshot::from_session(&session)).unwrap();

        assert_eq!(json["status"], "Dead");
        assert_eq!(json["difficulty"], "Beginner");
        assert_eq!(json["flags_remaining"], 9);
    }
}
