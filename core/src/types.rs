/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine, flag and cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(col, row)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Moore neighborhood of a cell, clipped to the board bounds.
///
/// Walks the 3x3 window around `center` in row-major order, skipping the
/// center itself and anything that falls off the board.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    bounds: Coord2,
    step: u8,
}

impl Neighbors {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            step: 0,
        }
    }

    fn offset(&self, step: u8) -> Option<Coord2> {
        let (col, row) = self.center;
        let (width, height) = self.bounds;

        // step 0..9 maps onto dx, dy in -1..=1
        let dx = (step % 3) as i16 - 1;
        let dy = (step / 3) as i16 - 1;
        if dx == 0 && dy == 0 {
            return None;
        }

        let next_col = col as i16 + dx;
        let next_row = row as i16 + dy;
        if next_col < 0 || next_row < 0 || next_col >= width as i16 || next_row >= height as i16 {
            return None;
        }

        Some((next_col as Coord, next_row as Coord))
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while self.step < 9 {
            let step = self.step;
            self.step += 1;
            if let Some(coords) = self.offset(step) {
                return Some(coords);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let found: Vec<_> = Neighbors::new((0, 0), (9, 9)).collect();

        assert_eq!(found, vec![(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn edge_has_five_neighbors() {
        assert_eq!(Neighbors::new((4, 0), (9, 9)).count(), 5);
        assert_eq!(Neighbors::new((8, 4), (9, 9)).count(), 5);
    }

    #[test]
    fn interior_has_eight_neighbors() {
        let found: Vec<_> = Neighbors::new((1, 1), (3, 3)).collect();

        assert_eq!(found.len(), 8);
        assert!(!found.contains(&(1, 1)));
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(Neighbors::new((0, 0), (1, 1)).count(), 0);
    }

    #[test]
    fn mult_saturates() {
        assert_eq!(mult(30, 16), 480);
        assert_eq!(mult(255, 255), 65025);
    }
}
