//! Cursor state
//!
//! The cursor tracks the write position and the VT100 pending-wrap state:
//! after writing the last column the cursor stays put, and only the next
//! printable character pushes it onto the following line. Explicit movement
//! always cancels a pending wrap.
//!
//! Movement is clamped to the screen. Operations that can scroll
//! ([`Cursor::resolve_wrap`], [`Cursor::advance_down`],
//! [`Cursor::handle_control`]) borrow the grid instead of holding a
//! back-reference, keeping ownership acyclic.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    row: usize,
    col: usize,
    pending_wrap: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row position (0-indexed from the top of the screen).
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column position (0-indexed).
    pub fn col(&self) -> usize {
        self.col
    }

    /// True when the cursor sits on the last column with a wrap pending.
    pub fn pending_wrap(&self) -> bool {
        self.pending_wrap
    }

    /// Move to an absolute position, clamped to the screen.
    pub fn set(&mut self, row: usize, col: usize, width: usize, height: usize) {
        self.row = row.min(height.saturating_sub(1));
        self.col = col.min(width.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Move up `n` rows, stopping at the top.
    pub fn up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n);
        self.pending_wrap = false;
    }

    /// Move down `n` rows, stopping at the bottom. Does not scroll.
    pub fn down(&mut self, n: usize, height: usize) {
        self.row = (self.row + n).min(height.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Move left `n` columns, stopping at column 0.
    pub fn left(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
        self.pending_wrap = false;
    }

    /// Move right `n` columns, stopping at the right margin.
    pub fn right(&mut self, n: usize, width: usize) {
        self.col = (self.col + n).min(width.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Move to column 0 of the current row, cancelling a pending wrap.
    pub fn carriage_return(&mut self) {
        self.col = 0;
        self.pending_wrap = false;
    }

    /// Step one cell after a write. At the last column the cursor stays and
    /// arms the pending wrap instead.
    pub(crate) fn advance(&mut self, width: usize) {
        if self.col + 1 < width {
            self.col += 1;
        } else {
            self.pending_wrap = true;
        }
    }

    /// Step two cells after a wide write; if fewer than two columns remain,
    /// park at the last column with a wrap pending.
    pub(crate) fn advance_for_wide(&mut self, width: usize) {
        if self.col + 2 < width {
            self.col += 2;
        } else {
            self.col = width.saturating_sub(1);
            self.pending_wrap = true;
        }
    }

    /// Complete a pending wrap: scroll if on the bottom row, move to the
    /// start of the next row, and mark that row as a soft-wrap continuation.
    /// No-op without a pending wrap.
    pub(crate) fn resolve_wrap(&mut self, grid: &mut Grid) -> Result<()> {
        if !self.pending_wrap {
            return Ok(());
        }
        if self.row + 1 >= grid.height() {
            grid.scroll()?;
        } else {
            self.row += 1;
        }
        self.col = 0;
        self.pending_wrap = false;
        grid.set_wrapped(self.row)?;
        Ok(())
    }

    /// Move down one row, scrolling when already on the bottom row.
    pub(crate) fn advance_down(&mut self, grid: &mut Grid) -> Result<()> {
        if self.row + 1 >= grid.height() {
            grid.scroll()?;
        } else {
            self.row += 1;
        }
        Ok(())
    }

    /// [`Cursor::resolve_wrap`] as pure arithmetic: a scroll at the bottom
    /// row leaves the row index unchanged, so simulations can track the
    /// final position without a grid.
    pub(crate) fn resolve_wrap_no_scroll(&mut self, height: usize) {
        if !self.pending_wrap {
            return;
        }
        if self.row + 1 < height {
            self.row += 1;
        }
        self.col = 0;
        self.pending_wrap = false;
    }

    /// [`Cursor::advance_down`] without the scroll side effect.
    pub(crate) fn advance_down_no_scroll(&mut self, height: usize) {
        if self.row + 1 < height {
            self.row += 1;
        }
    }

    /// Apply a control character: `\n` moves to the start of the next row
    /// (scrolling at the bottom), `\r` to the start of the current row.
    /// Either cancels a pending wrap.
    pub(crate) fn handle_control(&mut self, c: char, grid: &mut Grid) -> Result<()> {
        match c {
            '\n' => {
                self.advance_down(grid)?;
                self.carriage_return();
            }
            '\r' => self.carriage_return(),
            _ => {}
        }
        Ok(())
    }
}
