use anyhow::Context;
use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use sweeper_core::*;
use tracing_subscriber::EnvFilter;

use command::{Command, HELP, ParseError};

mod command;
mod render;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum DifficultyArg {
    Beginner,
    Intermediate,
    Expert,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Beginner => Difficulty::Beginner,
            DifficultyArg::Intermediate => Difficulty::Intermediate,
            DifficultyArg::Expert => Difficulty::Expert,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::WarnLevel>,

    /// Board preset to start with
    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Beginner)]
    difficulty: DifficultyArg,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// File holding the best time per difficulty
    #[arg(long)]
    scores: Option<PathBuf>,
}

fn default_scores_path() -> PathBuf {
    ProjectDirs::from("", "", "sweeper")
        .map(|dirs| dirs.data_dir().join("best_times.txt"))
        .unwrap_or_else(|| PathBuf::from("best_times.txt"))
}

fn apply<S: ScoreStore>(
    session: &mut GameSession<S>,
    command: Command,
    out: &mut impl Write,
) -> io::Result<()> {
    match command {
        Command::Reveal(coords) => match session.reveal(coords) {
            RevealOutcome::NoChange => writeln!(out, "Nothing to reveal at {:?}", coords)?,
            RevealOutcome::HitMine => {
                render::draw(out, &Snapshot::from_session(session))?;
                writeln!(out, "Boom. Type n for a new game.")?;
            }
            RevealOutcome::Won => announce_win(session, out)?,
            RevealOutcome::Revealed => render::draw(out, &Snapshot::from_session(session))?,
        },
        Command::Flag(coords) => match session.toggle_flag(coords) {
            FlagOutcome::NoChange => writeln!(out, "Cannot flag {:?}", coords)?,
            FlagOutcome::Won => announce_win(session, out)?,
            FlagOutcome::Flagged | FlagOutcome::Unflagged => {
                render::draw(out, &Snapshot::from_session(session))?
            }
        },
        Command::Reset => {
            if session.reset() {
                render::draw(out, &Snapshot::from_session(session))?;
            } else {
                writeln!(out, "Game still running, change difficulty to start over")?;
            }
        }
        Command::ChangeDifficulty(difficulty) => {
            session.change_difficulty(difficulty);
            render::draw(out, &Snapshot::from_session(session))?;
        }
        Command::Show => render::draw(out, &Snapshot::from_session(session))?,
        Command::Json => {
            let json = serde_json::to_string_pretty(&Snapshot::from_session(session))?;
            writeln!(out, "{}", json)?;
        }
        // handled by the input loop
        Command::Quit => {}
    }
    Ok(())
}

fn announce_win<S>(session: &GameSession<S>, out: &mut impl Write) -> io::Result<()> {
    render::draw(out, &Snapshot::from_session(session))?;
    let secs = session.elapsed_secs();
    if session.is_new_best() {
        writeln!(out, "Cleared in {}s, a new best!", secs)
    } else {
        writeln!(out, "Cleared in {}s", secs)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.verbose.tracing_level_filter().into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let store = FileScoreStore::new(args.scores.unwrap_or_else(default_scores_path));
    log::debug!("best times kept in {}", store.path().display());

    let difficulty = args.difficulty.into();
    let mut session = match args.seed {
        Some(seed) => GameSession::new(difficulty, store, seed),
        None => GameSession::with_random_seed(difficulty, store),
    };

    let mut out = io::stdout().lock();
    render::draw(&mut out, &Snapshot::from_session(&session))?;
    writeln!(out, "{}", HELP)?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read command")?;
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => apply(&mut session, command, &mut out)?,
            Err(ParseError::Empty) => {}
            Err(err) => writeln!(out, "{}\n{}", err, HELP)?,
        }
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &mut GameSession<MemoryScoreStore>, line: &str) -> String {
        let mut buf = Vec::new();
        apply(session, Command::parse(line).unwrap(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn win_through_commands(session: &mut GameSession<MemoryScoreStore>) -> String {
        let (width, height) = session.board().size();
        let coords: Vec<Coord2> = (0..height)
            .flat_map(|row| (0..width).map(move |col| (col, row)))
            .collect();
        let mut text = String::new();
        for (col, row) in coords {
            let cell = *session.board().cell((col, row)).unwrap();
            if !cell.is_unopened() {
                continue;
            }
            let verb = if cell.has_mine() { "f" } else { "r" };
            text = run(session, &format!("{} {} {}", verb, col, row));
        }
        assert_eq!(session.status(), GameStatus::Won);
        text
    }

    #[test]
    fn first_win_is_announced_as_best() {
        let mut session = GameSession::new(Difficulty::Beginner, MemoryScoreStore::new(), 3);

        let text = win_through_commands(&mut session);

        assert!(text.trim_end().ends_with("a new best!"), "{}", text);
    }

    #[test]
    fn tying_the_best_time_is_not_a_new_best() {
        let mut table = ScoreTable::default();
        table.set(Difficulty::Beginner, 0);
        let store = MemoryScoreStore::from_table(table);
        let mut session = GameSession::new(Difficulty::Beginner, store, 3);

        let text = win_through_commands(&mut session);

        let last = text.lines().last().unwrap();
        assert!(last.starts_with("Cleared in"), "{}", last);
        assert!(!last.contains("new best"), "{}", last);
        assert_eq!(session.best_time(), Some(0));
    }

    #[test]
    fn args_default_to_beginner() {
        let args = Args::try_parse_from(["sweeper"]).unwrap();

        assert_eq!(args.difficulty, DifficultyArg::Beginner);
        assert_eq!(args.seed, None);
        assert_eq!(args.scores, None);
    }

    #[test]
    fn args_accept_difficulty_and_seed() {
        let args = Args::try_parse_from(["sweeper", "-d", "expert", "--seed", "42"]).unwrap();

        assert_eq!(Difficulty::from(args.difficulty), Difficulty::Expert);
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn reset_is_refused_mid_game() {
        let mut session = GameSession::new(Difficulty::Beginner, MemoryScoreStore::new(), 1);

        assert!(run(&mut session, "n").starts_with("Game still running"));
    }

    #[test]
    fn difficulty_command_redraws_new_board() {
        let mut session = GameSession::new(Difficulty::Beginner, MemoryScoreStore::new(), 1);

        let text = run(&mut session, "d intermediate");

        assert_eq!(session.difficulty(), Difficulty::Intermediate);
        assert!(text.starts_with(":) intermediate  flags 040"));
    }

    #[test]
    fn out_of_board_reveal_reports_no_change() {
        let mut session = GameSession::new(Difficulty::Beginner, MemoryScoreStore::new(), 1);

        assert_eq!(run(&mut session, "r 20 20"), "Nothing to reveal at (20, 20)\n");
    }

    #[test]
    fn json_command_prints_snapshot() {
        let mut session = GameSession::new(Difficulty::Beginner, MemoryScoreStore::new(), 1);

        let text = run(&mut session, "j");
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["status"], "Alive");
        assert_eq!(value["size"], serde_json::json!([9, 9]));
    }
}
