//! # Grid
//!
//! Dense, row-major 2D container of cell states.
//!
//! ## Format
//!
//! Cells are stored in a single `Vec<CellState>` indexed as
//! `row * width + col`, origin top-left. The shape is fixed at creation;
//! only cell contents change.
//!
//! ## Boundary Policy
//!
//! Neighbour queries treat every cell outside the grid as [`CellState::Wall`].
//! This biases caves to close off at the map edges.

use std::fmt;

use crate::error::{GenerationError, GenerationResult};

/// State of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellState {
    /// Empty, walkable space.
    #[default]
    Floor = 0,
    /// Solid rock.
    Wall = 1,
}

impl CellState {
    /// Returns the wire value of this state (`0` floor, `1` wall).
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Converts a wire value back into a state.
    ///
    /// Returns `None` for anything outside the `{0, 1}` vocabulary.
    #[inline]
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Floor),
            1 => Some(Self::Wall),
            _ => None,
        }
    }

    /// Returns true if this is a floor cell.
    #[inline]
    #[must_use]
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Floor)
    }

    /// Returns the character used to draw this state.
    #[inline]
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Floor => ' ',
            Self::Wall => '#',
        }
    }
}

/// A 2D map of cell states.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    /// Number of rows.
    height: usize,
    /// Number of columns.
    width: usize,
    /// Cell data (indexed as `row * width + col`).
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid with every cell set to `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidDimensions`] if either dimension is zero.
    pub fn new(height: usize, width: usize, fill: CellState) -> GenerationResult<Self> {
        if height == 0 || width == 0 {
            return Err(GenerationError::InvalidDimensions { height, width });
        }

        Ok(Self {
            height,
            width,
            cells: vec![fill; height * width],
        })
    }

    /// Builds a grid from row-major wire values.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidDimensions`] for empty or ragged
    /// input and [`GenerationError::InvalidConfig`] for values outside `{0, 1}`.
    pub fn from_rows(rows: &[Vec<u8>]) -> GenerationResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut grid = Self::new(height, width, CellState::Floor)?;

        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(GenerationError::InvalidDimensions {
                    height,
                    width: values.len(),
                });
            }
            for (col, &id) in values.iter().enumerate() {
                let state = CellState::from_id(id).ok_or_else(|| {
                    GenerationError::InvalidConfig(format!(
                        "cell ({row}, {col}) has unknown state {id}"
                    ))
                })?;
                grid.cells[row * width + col] = state;
            }
        }

        Ok(grid)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns true if `(row, col)` lies inside the grid.
    #[inline]
    #[must_use]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Gets the state at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::OutOfBounds`] for indices outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> GenerationResult<CellState> {
        self.check(row, col)?;
        Ok(self.cells[row * self.width + col])
    }

    /// Sets the state at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::OutOfBounds`] for indices outside the grid.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: CellState) -> GenerationResult<()> {
        self.check(row, col)?;
        self.cells[row * self.width + col] = value;
        Ok(())
    }

    /// Reads a cell at signed coordinates, `None` when off-grid.
    #[inline]
    #[must_use]
    pub fn at_signed(&self, row: isize, col: isize) -> Option<CellState> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        self.contains(row, col)
            .then(|| self.cells[row * self.width + col])
    }

    /// Counts cells equal to `state` within Chebyshev distance `radius`
    /// of `(row, col)`, excluding the cell itself.
    ///
    /// Off-grid positions count as [`CellState::Wall`]. With `radius = 1`
    /// this is the 8-cell Moore neighbourhood.
    #[must_use]
    pub fn neighbor_count(&self, row: usize, col: usize, state: CellState, radius: usize) -> usize {
        let r = radius as isize;
        let (row, col) = (row as isize, col as isize);
        let mut count = 0;

        for dr in -r..=r {
            for dc in -r..=r {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let cell = self
                    .at_signed(row + dr, col + dc)
                    .unwrap_or(CellState::Wall);
                if cell == state {
                    count += 1;
                }
            }
        }

        count
    }

    /// Counts all cells in a given state.
    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    /// Fills the rectangle starting at `(row, col)`, clipped to the grid.
    pub fn fill_rect(&mut self, row: usize, col: usize, height: usize, width: usize, value: CellState) {
        let row_end = row.saturating_add(height).min(self.height);
        let col_end = col.saturating_add(width).min(self.width);

        for r in row..row_end {
            let start = r * self.width;
            self.cells[start + col.min(col_end)..start + col_end].fill(value);
        }
    }

    /// Iterates over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    /// Converts to the row-major wire form consumed by renderers.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.id()).collect())
            .collect()
    }

    /// Raw cell slice, row-major.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Flat index of a validated cell.
    #[inline]
    pub(crate) const fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Unchecked write for engine code that already validated coordinates.
    #[inline]
    pub(crate) fn put(&mut self, row: usize, col: usize, value: CellState) {
        debug_assert!(self.contains(row, col), "put({row}, {col}) out of bounds");
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    #[inline]
    fn check(&self, row: usize, col: usize) -> GenerationResult<()> {
        if self.contains(row, col) {
            Ok(())
        } else {
            Err(GenerationError::OutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            })
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.height, self.width)?;
        fmt::Display::fmt(self, f)
    }
}
