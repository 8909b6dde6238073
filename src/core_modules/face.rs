use crate::core_modules::classifier::{ColorLabel, LABEL_COUNT};
use serde::{Deserialize, Serialize};

/// The number of cells along one edge of a face.
pub const GRID_DIM: usize = 3;
/// The number of sticker cells on a face.
pub const CELL_COUNT: usize = GRID_DIM * GRID_DIM;

/// An immutable 3x3 grid of color labels, the product of one face scan.
///
/// A `Face` is a "dumb" data container in the same sense a detected blob is:
/// it summarizes one observation and is never mutated afterwards. Cells are
/// stored row-major, top-left first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    cells: [ColorLabel; CELL_COUNT],
}

impl Face {
    pub fn new(cells: [ColorLabel; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// The label at the given grid position. `row` and `col` must be below
    /// `GRID_DIM`.
    pub fn cell(&self, row: usize, col: usize) -> ColorLabel {
        self.cells[row * GRID_DIM + col]
    }

    /// The center sticker, which fixes which side of the cube this face is on
    /// a physically valid cube.
    pub fn center(&self) -> ColorLabel {
        self.cell(1, 1)
    }

    /// All nine labels, row-major.
    pub fn cells(&self) -> &[ColorLabel; CELL_COUNT] {
        &self.cells
    }

    /// Per-label tally over the nine cells, indexed by `ColorLabel::index`.
    pub fn counts(&self) -> [usize; LABEL_COUNT] {
        let mut counts = [0usize; LABEL_COUNT];
        for label in &self.cells {
            counts[label.index()] += 1;
        }
        counts
    }
}
