//! Two-dimensional table whose rows and columns can be split in place.
//!
//! Cells live in a flat, column-major backing store. Each axis keeps a small index table
//! mapping a logical position to a physical slot in that store, so splitting a row copies
//! one physical row to the first unused slot and shifts only the index table. The store
//! doubles along an axis when that axis runs out of physical slots.

use std::fmt;

use tracing::trace;

use crate::error::{Axis, Result, SpritePackerError};

/// Size of a logical row/column and the physical slot holding its cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Dimension {
    size: u32,
    slot: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ResizableGrid<T> {
    columns: Vec<Dimension>,
    rows: Vec<Dimension>,
    data: Vec<T>,
    capacity_x: usize,
    capacity_y: usize,
    nbr_columns: usize,
    nbr_rows: usize,
}

impl<T: Clone + Default> ResizableGrid<T> {
    /// Creates an empty grid with no backing storage. Call [`initialize`](Self::initialize)
    /// before reading cells.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            data: Vec::new(),
            capacity_x: 0,
            capacity_y: 0,
            nbr_columns: 0,
            nbr_rows: 0,
        }
    }

    /// Resets the grid to a single cell of `first_column_width` x `first_row_height`.
    ///
    /// Existing storage is reused when it already holds at least
    /// `capacity_x` x `capacity_y` cells; otherwise it is reallocated at that size.
    pub fn initialize(
        &mut self,
        capacity_x: usize,
        capacity_y: usize,
        first_column_width: u32,
        first_row_height: u32,
        first_value: T,
    ) -> Result<()> {
        if capacity_x == 0 || capacity_y == 0 {
            return Err(SpritePackerError::InvalidCapacity {
                capacity_x,
                capacity_y,
            });
        }

        if self.columns.len() < capacity_x {
            self.columns.resize(capacity_x, Dimension::default());
        }
        if self.rows.len() < capacity_y {
            self.rows.resize(capacity_y, Dimension::default());
        }
        if self.capacity_x < capacity_x || self.capacity_y < capacity_y {
            self.capacity_x = self.capacity_x.max(capacity_x);
            self.capacity_y = self.capacity_y.max(capacity_y);
            self.data = vec![T::default(); self.capacity_x * self.capacity_y];
        }

        self.nbr_columns = 1;
        self.nbr_rows = 1;
        self.columns[0] = Dimension {
            size: first_column_width,
            slot: 0,
        };
        self.rows[0] = Dimension {
            size: first_row_height,
            slot: 0,
        };
        self.data[0] = first_value;
        Ok(())
    }

    pub fn nbr_columns(&self) -> usize {
        self.nbr_columns
    }

    pub fn nbr_rows(&self) -> usize {
        self.nbr_rows
    }

    /// Physical capacity `(columns, rows)` of the backing store.
    pub fn capacity(&self) -> (usize, usize) {
        (self.capacity_x, self.capacity_y)
    }

    #[inline]
    fn physical(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.nbr_columns && y < self.nbr_rows);
        self.columns[x].slot * self.capacity_y + self.rows[y].slot
    }

    #[inline]
    pub fn item(&self, x: usize, y: usize) -> &T {
        &self.data[self.physical(x, y)]
    }

    #[inline]
    pub fn set_item(&mut self, x: usize, y: usize, value: T) {
        let idx = self.physical(x, y);
        self.data[idx] = value;
    }

    #[inline]
    pub fn column_width(&self, x: usize) -> u32 {
        self.columns[x].size
    }

    #[inline]
    pub fn row_height(&self, y: usize) -> u32 {
        self.rows[y].size
    }

    /// Splits logical row `y`: it keeps `old - new_row_height` and a copy of it with
    /// height `new_row_height` is inserted directly after it.
    pub fn insert_row(&mut self, y: usize, new_row_height: u32) -> Result<()> {
        if y >= self.nbr_rows {
            return Err(SpritePackerError::IndexOutOfRange {
                axis: Axis::Row,
                index: y,
                len: self.nbr_rows,
            });
        }
        let old_height = self.rows[y].size;
        check_split(Axis::Row, y, old_height, new_row_height)?;

        if self.nbr_rows == self.capacity_y {
            self.grow(self.capacity_x, self.capacity_y * 2);
        }

        // The new physical row is the first unused slot.
        let new_slot = self.nbr_rows;
        let src_slot = self.rows[y].slot;
        for px in 0..self.nbr_columns {
            let base = px * self.capacity_y;
            self.data[base + new_slot] = self.data[base + src_slot].clone();
        }

        self.rows.copy_within(y + 1..self.nbr_rows, y + 2);
        self.rows[y + 1] = Dimension {
            size: new_row_height,
            slot: new_slot,
        };
        self.rows[y].size = old_height - new_row_height;
        self.nbr_rows += 1;
        Ok(())
    }

    /// Column counterpart of [`insert_row`](Self::insert_row).
    pub fn insert_column(&mut self, x: usize, new_column_width: u32) -> Result<()> {
        if x >= self.nbr_columns {
            return Err(SpritePackerError::IndexOutOfRange {
                axis: Axis::Column,
                index: x,
                len: self.nbr_columns,
            });
        }
        let old_width = self.columns[x].size;
        check_split(Axis::Column, x, old_width, new_column_width)?;

        if self.nbr_columns == self.capacity_x {
            self.grow(self.capacity_x * 2, self.capacity_y);
        }

        // Columns are contiguous in the store, so this is a single slice copy.
        let new_slot = self.nbr_columns;
        let src = self.columns[x].slot * self.capacity_y;
        let dst = new_slot * self.capacity_y;
        for py in 0..self.nbr_rows {
            self.data[dst + py] = self.data[src + py].clone();
        }

        self.columns.copy_within(x + 1..self.nbr_columns, x + 2);
        self.columns[x + 1] = Dimension {
            size: new_column_width,
            slot: new_slot,
        };
        self.columns[x].size = old_width - new_column_width;
        self.nbr_columns += 1;
        Ok(())
    }

    /// Reallocates the store at the given capacity, keeping every used cell at its
    /// physical (slot, slot) position.
    fn grow(&mut self, capacity_x: usize, capacity_y: usize) {
        trace!(
            from_x = self.capacity_x,
            from_y = self.capacity_y,
            to_x = capacity_x,
            to_y = capacity_y,
            "grid capacity grow"
        );
        let mut data = vec![T::default(); capacity_x * capacity_y];
        for px in 0..self.nbr_columns {
            let src = px * self.capacity_y;
            let dst = px * capacity_y;
            data[dst..dst + self.nbr_rows].clone_from_slice(&self.data[src..src + self.nbr_rows]);
        }
        self.data = data;
        self.capacity_x = capacity_x;
        self.capacity_y = capacity_y;
        if self.columns.len() < capacity_x {
            self.columns.resize(capacity_x, Dimension::default());
        }
        if self.rows.len() < capacity_y {
            self.rows.resize(capacity_y, Dimension::default());
        }
    }
}

fn check_split(axis: Axis, index: usize, size: u32, new_size: u32) -> Result<()> {
    if new_size == 0 || new_size >= size {
        return Err(SpritePackerError::InvalidSplit {
            axis,
            index,
            size,
            new_size,
        });
    }
    Ok(())
}

impl<T: Clone + Default + fmt::Display> fmt::Display for ResizableGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "        ")?;
        for x in 0..self.nbr_columns {
            write!(f, " ({:>4})", self.column_width(x))?;
        }
        writeln!(f)?;
        for y in 0..self.nbr_rows {
            write!(f, "{:>2} ({:>4})", y, self.row_height(y))?;
            for x in 0..self.nbr_columns {
                write!(f, "    {}  ", self.item(x, y))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
