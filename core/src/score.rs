use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::*;

/// Token written in place of a time for difficulties never won.
const UNSET: &str = "-";

/// Where best completion times live between runs.
///
/// `load` never fails: anything unreadable counts as "no recorded time".
pub trait ScoreStore {
    fn load(&self, difficulty: Difficulty) -> Option<u32>;
    fn save(&mut self, difficulty: Difficulty, secs: u32) -> core::result::Result<(), StoreError>;
}

/// Best time in whole seconds for each difficulty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    best: [Option<u32>; Difficulty::ALL.len()],
}

impl ScoreTable {
    pub fn get(&self, difficulty: Difficulty) -> Option<u32> {
        self.best[difficulty.index()]
    }

    pub fn set(&mut self, difficulty: Difficulty, secs: u32) {
        self.best[difficulty.index()] = Some(secs);
    }

    /// One line per difficulty in [`Difficulty::ALL`] order. Missing lines and
    /// lines that are neither a number nor `-` are treated as unset.
    pub fn parse(text: &str) -> Self {
        let mut table = Self::default();
        let mut lines = text.lines();

        for difficulty in Difficulty::ALL {
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.trim();
            if line == UNSET {
                continue;
            }
            match line.parse::<u32>() {
                Ok(secs) => table.set(difficulty, secs),
                Err(_) => log::warn!("Ignoring malformed best time for {}: {:?}", difficulty, line),
            }
        }

        table
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for difficulty in Difficulty::ALL {
            match self.get(difficulty) {
                Some(secs) => out.push_str(&secs.to_string()),
                None => out.push_str(UNSET),
            }
            out.push('\n');
        }
        out
    }
}

/// Keeps best times for the lifetime of the process only.
#[derive(Clone, Debug, Default)]
pub struct MemoryScoreStore {
    table: ScoreTable,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: ScoreTable) -> Self {
        Self { table }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self, difficulty: Difficulty) -> Option<u32> {
        self.table.get(difficulty)
    }

    fn save(&mut self, difficulty: Difficulty, secs: u32) -> core::result::Result<(), StoreError> {
        self.table.set(difficulty, secs);
        Ok(())
    }
}

/// Text file in the [`ScoreTable`] format.
#[derive(Clone, Debug)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> core::result::Result<ScoreTable, StoreError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(ScoreTable::parse(&text))
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self, difficulty: Difficulty) -> Option<u32> {
        match self.read_table() {
            Ok(table) => table.get(difficulty),
            Err(StoreError::Io(err)) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("Could not read best times from {}: {}", self.path.display(), err);
                None
            }
        }
    }

    fn save(&mut self, difficulty: Difficulty, secs: u32) -> core::result::Result<(), StoreError> {
        // an unreadable file gets replaced rather than blocking the new record
        let mut table = self.read_table().unwrap_or_default();
        table.set(difficulty, secs);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, table.render())?;
        Ok(())
    }
}
