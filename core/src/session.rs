use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::*;

/// Valid transitions:
/// - Alive -> Dead
/// - Alive -> Won
/// - Dead | Won -> Alive, only through a fresh board
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Alive,
    Dead,
    Won,
}

impl GameStatus {
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// One playthrough at a time: the board plus everything the player sees
/// around it. Every new game draws a board seed from the session's own
/// stream, so a session built from a fixed seed replays identically.
#[derive(Debug)]
pub struct GameSession<S> {
    difficulty: Difficulty,
    board: Board,
    status: GameStatus,
    flags_remaining: CellCount,
    first_reveal: bool,
    triggered_mine: Option<Coord2>,
    started_at: Instant,
    ended_at: Option<Instant>,
    best_time: Option<u32>,
    new_best: bool,
    store: S,
    seeds: SmallRng,
}

impl<S: ScoreStore> GameSession<S> {
    pub fn new(difficulty: Difficulty, store: S, seed: u64) -> Self {
        let mut seeds = SmallRng::seed_from_u64(seed);
        let board = Self::fresh_board(difficulty, &mut seeds);
        let best_time = store.load(difficulty);

        Self {
            difficulty,
            board,
            status: GameStatus::Alive,
            flags_remaining: difficulty.config().mines,
            first_reveal: true,
            triggered_mine: None,
            started_at: Instant::now(),
            ended_at: None,
            best_time,
            new_best: false,
            store,
            seeds,
        }
    }

    pub fn with_random_seed(difficulty: Difficulty, store: S) -> Self {
        Self::new(difficulty, store, rand::random())
    }

    fn fresh_board(difficulty: Difficulty, seeds: &mut SmallRng) -> Board {
        let seed = seeds.random();
        log::debug!("new {} board from seed {}", difficulty, seed);
        RandomMineGenerator::new(seed).generate(difficulty.config())
    }

    /// Throws away the current game and deals a new board.
    pub fn start(&mut self, difficulty: Difficulty) {
        self.board = Self::fresh_board(difficulty, &mut self.seeds);
        self.difficulty = difficulty;
        self.status = GameStatus::Alive;
        self.flags_remaining = difficulty.config().mines;
        self.first_reveal = true;
        self.triggered_mine = None;
        self.started_at = Instant::now();
        self.ended_at = None;
        self.best_time = self.store.load(difficulty);
        self.new_best = false;
    }

    /// New game at the same difficulty, only once the current one is over.
    pub fn reset(&mut self) -> bool {
        if self.status.is_alive() {
            return false;
        }
        self.start(self.difficulty);
        true
    }

    /// Always allowed, abandons any game in progress.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        self.start(difficulty);
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        self.reveal_at(coords, Instant::now())
    }

    pub fn reveal_at(&mut self, coords: Coord2, now: Instant) -> RevealOutcome {
        if !self.status.is_alive() {
            return RevealOutcome::NoChange;
        }
        let Some(&cell) = self.board.cell(coords) else {
            return RevealOutcome::NoChange;
        };
        if cell.is_flagged() {
            return RevealOutcome::NoChange;
        }

        if self.first_reveal && cell.has_mine() {
            self.board.clear_mine(coords);
            let moved_to = self.board.relocate_first_mine(coords);
            self.board.recompute_adjacency();
            log::debug!("first reveal at {:?} was a mine, moved to {:?}", coords, moved_to);
        }
        self.first_reveal = false;

        if self.board.reveal_flood(coords) == 0 {
            return RevealOutcome::NoChange;
        }

        if self.board.cell(coords).is_some_and(|cell| cell.has_mine()) {
            self.status = GameStatus::Dead;
            self.triggered_mine = Some(coords);
            self.ended_at = Some(now);
            self.board.open_all_mines();
            log::info!(
                "{} game lost on {:?} after {}s",
                self.difficulty,
                coords,
                self.elapsed_secs()
            );
            return RevealOutcome::HitMine;
        }

        if self.finish_if_cleared(now) {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        self.toggle_flag_at(coords, Instant::now())
    }

    pub fn toggle_flag_at(&mut self, coords: Coord2, now: Instant) -> FlagOutcome {
        if !self.status.is_alive() {
            return FlagOutcome::NoChange;
        }
        let Some(&cell) = self.board.cell(coords) else {
            return FlagOutcome::NoChange;
        };

        match cell.state() {
            CellState::Flagged => {
                self.board.set_state(coords, CellState::Unopened);
                self.flags_remaining += 1;
                FlagOutcome::Unflagged
            }
            CellState::Unopened if self.flags_remaining > 0 => {
                self.board.set_state(coords, CellState::Flagged);
                self.flags_remaining -= 1;
                if self.finish_if_cleared(now) {
                    FlagOutcome::Won
                } else {
                    FlagOutcome::Flagged
                }
            }
            _ => FlagOutcome::NoChange,
        }
    }

    fn finish_if_cleared(&mut self, now: Instant) -> bool {
        if !self.board.is_cleared() {
            return false;
        }

        self.status = GameStatus::Won;
        self.ended_at = Some(now);
        let secs = self.elapsed_secs();
        log::info!("{} game won in {}s", self.difficulty, secs);

        if self.best_time.is_none_or(|best| secs < best) {
            log::info!("New best time for {}: {}s", self.difficulty, secs);
            self.best_time = Some(secs);
            self.new_best = true;
            if let Err(err) = self.store.save(self.difficulty, secs) {
                log::warn!("Could not save best time for {}: {}", self.difficulty, err);
            }
        }
        true
    }
}

impl<S> GameSession<S> {
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn flags_remaining(&self) -> CellCount {
        self.flags_remaining
    }

    pub fn is_first_reveal(&self) -> bool {
        self.first_reveal
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn best_time(&self) -> Option<u32> {
        self.best_time
    }

    /// Whether the finished game beat the previous best time.
    pub fn is_new_best(&self) -> bool {
        self.new_best
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time since the board was dealt, frozen once the game ends.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.ended_at
            .unwrap_or(now)
            .saturating_duration_since(self.started_at)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed().as_secs().try_into().unwrap_or(u32::MAX)
    }
}
