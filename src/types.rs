use ndarray::Array2;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts, flag budgets, and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional board coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait GridIndex {
    type Output;
    fn grid_index(self) -> Self::Output;
}

impl GridIndex for Coord2 {
    type Output = [usize; 2];

    fn grid_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn cell_total(rows: Coord, cols: Coord) -> CellCount {
    let rows = rows as CellCount;
    let cols = cols as CellCount;
    rows.saturating_mul(cols)
}

pub trait AdjacentIterExt {
    fn iter_adjacent(&self, index: Coord2) -> AdjacentIter;
}

impl<T> AdjacentIterExt for Array2<T> {
    fn iter_adjacent(&self, index: Coord2) -> AdjacentIter {
        let dim = self.dim();
        let size = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        AdjacentIter::new(index, size)
    }
}

const OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (drow, dcol) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(drow.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dcol.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterator over the up-to-8 in-bounds neighbors of a cell (Chebyshev distance 1).
#[derive(Debug)]
pub struct AdjacentIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl AdjacentIter {
    fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for AdjacentIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= OFFSETS.len() {
                return None;
            }

            let next_item = apply_delta(self.center, OFFSETS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
