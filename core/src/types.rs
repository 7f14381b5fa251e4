/// Single coordinate axis used for the grid side and for row/column positions.
pub type Coord = u8;

/// Count type used for mine counts, gem counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional position `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Largest supported grid side.
pub const MAX_GRID_SIZE: Coord = 10;

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

/// Row-major iterator over every position of a `size × size` grid.
pub fn iter_positions(size: Coord) -> impl Iterator<Item = Coord2> {
    (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_row_major() {
        let positions: alloc::vec::Vec<_> = iter_positions(2).collect();
        assert_eq!(positions, [(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn mult_saturates() {
        assert_eq!(mult(10, 10), 100);
        assert_eq!(mult(Coord::MAX, Coord::MAX), 65025);
    }
}
