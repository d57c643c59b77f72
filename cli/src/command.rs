use clap::ValueEnum;
use sweeper_core::{Coord, Coord2, Difficulty};
use thiserror::Error;

use crate::DifficultyArg;

pub(crate) const HELP: &str = "commands: r <col> <row> | f <col> <row> | n | d <beginner|intermediate|expert> | s | j | q";

/// One line of player input, already mapped onto board coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Reset,
    ChangeDifficulty(Difficulty),
    Show,
    Json,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command {0:?}")]
    Unknown(String),
    #[error("Expected a column and a row")]
    MissingCoords,
    #[error("Not a board coordinate: {0:?}")]
    BadCoord(String),
    #[error("Expected a difficulty")]
    MissingDifficulty,
    #[error("Unknown difficulty {0:?}")]
    BadDifficulty(String),
}

impl Command {
    pub(crate) fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(ParseError::Empty);
        };

        Ok(match verb.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Self::Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Self::Flag(parse_coords(&mut words)?),
            "n" | "new" | "reset" => Self::Reset,
            "d" | "difficulty" => {
                let name = words.next().ok_or(ParseError::MissingDifficulty)?;
                let arg = DifficultyArg::from_str(name, true)
                    .map_err(|_| ParseError::BadDifficulty(name.to_string()))?;
                Self::ChangeDifficulty(arg.into())
            }
            "s" | "show" => Self::Show,
            "j" | "json" => Self::Json,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(ParseError::Unknown(verb.to_string())),
        })
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2, ParseError> {
    let col = parse_coord(words.next())?;
    let row = parse_coord(words.next())?;
    Ok((col, row))
}

fn parse_coord(word: Option<&str>) -> Result<Coord, ParseError> {
    let word = word.ok_or(ParseError::MissingCoords)?;
    word.parse()
        .map_err(|_| ParseError::BadCoord(word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_board_actions() {
        assert_eq!(Command::parse("r 3 4"), Ok(Command::Reveal((3, 4))));
        assert_eq!(Command::parse("  FLAG 0 15 "), Ok(Command::Flag((0, 15))));
        assert_eq!(Command::parse("n"), Ok(Command::Reset));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn parses_difficulty_names_case_insensitively() {
        assert_eq!(
            Command::parse("d Expert"),
            Ok(Command::ChangeDifficulty(Difficulty::Expert))
        );
        assert_eq!(
            Command::parse("difficulty intermediate"),
            Ok(Command::ChangeDifficulty(Difficulty::Intermediate))
        );
        assert_eq!(
            Command::parse("d insane"),
            Err(ParseError::BadDifficulty("insane".to_string()))
        );
        assert_eq!(Command::parse("d"), Err(ParseError::MissingDifficulty));
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert_eq!(Command::parse("r 1"), Err(ParseError::MissingCoords));
        assert_eq!(Command::parse("r -1 2"), Err(ParseError::BadCoord("-1".to_string())));
        assert_eq!(Command::parse("f 2 300"), Err(ParseError::BadCoord("300".to_string())));
    }

    #[test]
    fn rejects_unknown_and_empty_input() {
        assert_eq!(Command::parse(""), Err(ParseError::Empty));
        assert_eq!(Command::parse("dig 1 1"), Err(ParseError::Unknown("dig".to_string())));
    }
}
