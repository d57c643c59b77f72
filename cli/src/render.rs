use std::io::{self, Write};
use sweeper_core::{GameStatus, Snapshot, TileView};

fn format_counter(num: u32) -> String {
    match num {
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

fn face(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Alive => ":)",
        GameStatus::Dead => "x(",
        GameStatus::Won => "B)",
    }
}

fn glyph(tile: TileView) -> char {
    match tile {
        TileView::Hidden => '#',
        TileView::Flagged => 'F',
        TileView::Number(0) => '.',
        TileView::Number(count) => char::from(b'0' + count.min(8)),
        TileView::Mine => '*',
        TileView::TriggeredMine => 'X',
        TileView::WrongFlag => 'x',
    }
}

/// Draws the counters line followed by the grid, columns across and rows down.
pub(crate) fn draw(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    let best = snapshot
        .best_time
        .map(format_counter)
        .unwrap_or_else(|| "---".to_string());
    writeln!(
        out,
        "{} {}  flags {}  time {}  best {}",
        face(snapshot.status),
        snapshot.difficulty,
        format_counter(snapshot.flags_remaining.into()),
        format_counter(snapshot.elapsed_secs),
        best,
    )?;

    let (width, height) = snapshot.size;
    write!(out, "   ")?;
    for col in 0..width {
        write!(out, "{:>3}", col)?;
    }
    writeln!(out)?;

    for row in 0..height {
        write!(out, "{:>3}", row)?;
        for col in 0..width {
            let tile = snapshot.tile((col, row)).unwrap_or(TileView::Hidden);
            write!(out, "{:>3}", glyph(tile))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
