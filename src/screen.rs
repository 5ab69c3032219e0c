//! Screen driver
//!
//! The public face of the buffer: a fixed-height screen over a bounded
//! scrollback, written to through a VT100-flavored cursor. Input arrives as
//! already-decoded text; escape parsing and rendering live elsewhere.
//!
//! `write` overwrites at the cursor, chunking narrow runs into block copies
//! and handling `\r`/`\n` and wide characters at run boundaries. `insert`
//! shifts existing content right instead, cascading displaced cells through
//! subsequent lines via an overflow work-queue.

use serde::{Deserialize, Serialize};

use crate::attr::{Attributes, Color, StyleFlags};
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::line::{Line, Overflow, WIDE_PLACEHOLDER};
use crate::wide::is_wide;

/// Terminal buffer: visible screen, scrollback, and cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    grid: Grid,
    cursor: Cursor,
}

impl Screen {
    /// Create a buffer. Width and height are clamped to at least 1;
    /// `max_scrollback` of 0 disables scrollback entirely.
    pub fn new(width: usize, height: usize, max_scrollback: usize) -> Self {
        Screen {
            grid: Grid::new(width.max(1), height.max(1), max_scrollback),
            cursor: Cursor::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn max_scrollback(&self) -> usize {
        self.grid.max_scrollback()
    }

    pub fn scrollback_len(&self) -> usize {
        self.grid.scrollback_len()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Attributes applied to subsequent writes.
    pub fn current_attributes(&self) -> Attributes {
        self.grid.attrs()
    }

    /// Set the attributes applied to subsequent writes.
    pub fn set_attributes(&mut self, fg: Color, bg: Color, style: StyleFlags) {
        self.grid.set_attrs(Attributes::pack(fg, bg, style));
    }

    // ------------------------------------------------------------------
    // Cursor movement
    // ------------------------------------------------------------------

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor
            .set(row, col, self.grid.width(), self.grid.height());
    }

    pub fn cursor_up(&mut self, n: usize) {
        self.cursor.up(n);
    }

    pub fn cursor_down(&mut self, n: usize) {
        self.cursor.down(n, self.grid.height());
    }

    pub fn cursor_left(&mut self, n: usize) {
        self.cursor.left(n);
    }

    pub fn cursor_right(&mut self, n: usize) {
        self.cursor.right(n, self.grid.width());
    }

    // ------------------------------------------------------------------
    // Write
    // ------------------------------------------------------------------

    /// Write text at the cursor, overwriting cells and wrapping at the right
    /// margin. `\n` and `\r` move the cursor; wide characters take two
    /// cells; placeholder characters in the input are skipped.
    pub fn write(&mut self, text: &str) -> Result<()> {
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let boundary = find_boundary(&chars, i);
            self.write_chunk(&chars, i, boundary)?;
            if boundary < chars.len() {
                let c = chars[boundary];
                if c == '\r' || c == '\n' {
                    self.cursor.handle_control(c, &mut self.grid)?;
                } else if c != WIDE_PLACEHOLDER {
                    self.write_wide(c)?;
                }
            }
            i = boundary + 1;
        }
        Ok(())
    }

    /// Move the cursor, then [`Screen::write`].
    pub fn write_at(&mut self, text: &str, row: usize, col: usize) -> Result<()> {
        self.set_cursor(row, col);
        self.write(text)
    }

    // Emit a narrow run in block copies bounded by the remaining line width.
    fn write_chunk(&mut self, chars: &[char], start: usize, end: usize) -> Result<()> {
        let mut current = start;
        while current < end {
            self.cursor.resolve_wrap(&mut self.grid)?;
            let width = self.grid.width();
            let available = width - self.cursor.col();
            let to_write = available.min(end - current);
            let col = self.cursor.col();
            let row = self.cursor.row();
            let attrs = self.grid.attrs();
            self.grid
                .line_mut(row)?
                .write_block(col, chars, current, to_write, attrs)?;
            self.cursor.right(to_write - 1, width);
            self.cursor.advance(width);
            current += to_write;
        }
        Ok(())
    }

    fn write_wide(&mut self, c: char) -> Result<()> {
        self.cursor.resolve_wrap(&mut self.grid)?;
        let width = self.grid.width();
        if self.cursor.col() == width - 1 {
            // One column left: leave it blank and wrap first.
            self.cursor.advance(width);
            self.cursor.resolve_wrap(&mut self.grid)?;
        }
        let row = self.cursor.row();
        let col = self.cursor.col();
        let attrs = self.grid.attrs();
        self.grid.line_mut(row)?.set_wide(col, c, attrs)?;
        self.cursor.advance_for_wide(width);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Insert
    // ------------------------------------------------------------------

    /// Insert text at the cursor, shifting existing content right. Cells
    /// pushed past the right edge cascade onto the following lines. The
    /// cursor ends just past the inserted text, as if it had been written.
    pub fn insert(&mut self, text: &str) -> Result<()> {
        self.cursor.resolve_wrap(&mut self.grid)?;
        let target = self.simulate_insert_cursor(text);

        // Expand wide characters into explicit base+placeholder pairs so the
        // cascade can move cell pairs as plain spans.
        let attrs = self.grid.attrs();
        let mut chars = Vec::with_capacity(text.len());
        let mut cell_attrs = Vec::with_capacity(text.len());
        for c in text.chars() {
            chars.push(c);
            cell_attrs.push(attrs);
            if is_wide(c) {
                chars.push(WIDE_PLACEHOLDER);
                cell_attrs.push(attrs);
            }
        }

        let mut pending: Vec<Overflow> = Vec::new();
        self.insert_segment(&chars, &cell_attrs, &mut pending)?;
        while let Some(segment) = pending.pop() {
            self.insert_segment(&segment.chars, &segment.attrs, &mut pending)?;
        }

        // Incremental motion above only drove overflow placement; the final
        // position is the simulated one.
        self.cursor = target;
        Ok(())
    }

    /// Move the cursor, then [`Screen::insert`].
    pub fn insert_at(&mut self, text: &str, row: usize, col: usize) -> Result<()> {
        self.set_cursor(row, col);
        self.insert(text)
    }

    fn insert_segment(
        &mut self,
        chars: &[char],
        attrs: &[Attributes],
        pending: &mut Vec<Overflow>,
    ) -> Result<()> {
        self.cursor.resolve_wrap(&mut self.grid)?;
        let mut i = 0;
        while i < chars.len() {
            let boundary = find_boundary(chars, i);
            self.insert_chunk(chars, attrs, i, boundary, pending)?;
            if boundary < chars.len() {
                let c = chars[boundary];
                if c == '\r' || c == '\n' {
                    self.cursor.handle_control(c, &mut self.grid)?;
                } else if c != WIDE_PLACEHOLDER {
                    self.insert_wide_char(c, attrs[boundary], pending)?;
                }
            }
            i = boundary + 1;
        }
        Ok(())
    }

    fn insert_chunk(
        &mut self,
        chars: &[char],
        attrs: &[Attributes],
        start: usize,
        end: usize,
        pending: &mut Vec<Overflow>,
    ) -> Result<()> {
        if start == end {
            return Ok(());
        }
        let width = self.grid.width();
        let row = self.cursor.row();
        let col = self.cursor.col();
        let overflow = self
            .grid
            .line_mut(row)?
            .insert_at(col, chars, attrs, start, end)?;
        // With overflow the cursor runs to the right margin so the displaced
        // segment continues on the next row; otherwise it follows the text.
        let shift = if overflow.is_some() {
            width - 1
        } else {
            end - start - 1
        };
        self.cursor.right(shift, width);
        self.cursor.advance(width);
        if let Some(segment) = overflow {
            pending.push(segment);
        }
        Ok(())
    }

    fn insert_wide_char(
        &mut self,
        c: char,
        attrs: Attributes,
        pending: &mut Vec<Overflow>,
    ) -> Result<()> {
        self.cursor.resolve_wrap(&mut self.grid)?;
        let width = self.grid.width();
        if self.cursor.col() + 1 >= width {
            self.cursor.advance(width);
            self.cursor.resolve_wrap(&mut self.grid)?;
        }
        let row = self.cursor.row();
        let col = self.cursor.col();
        let overflow = self.grid.line_mut(row)?.insert_wide(col, c, attrs)?;
        if let Some(segment) = overflow {
            // Park at the right margin so the displaced segment continues at
            // the start of the next row.
            self.cursor.right(width - 1, width);
            self.cursor.advance(width);
            pending.push(segment);
        } else {
            self.cursor.advance_for_wide(width);
        }
        Ok(())
    }

    // Where the cursor lands once the insert settles, computed without
    // touching the grid: a scroll at the bottom row leaves the row index in
    // place, so plain clamped arithmetic reproduces the final position.
    fn simulate_insert_cursor(&self, text: &str) -> Cursor {
        let width = self.grid.width();
        let height = self.grid.height();
        let mut cursor = self.cursor;
        for c in text.chars() {
            match c {
                WIDE_PLACEHOLDER => {}
                '\n' => {
                    cursor.advance_down_no_scroll(height);
                    cursor.carriage_return();
                }
                '\r' => cursor.carriage_return(),
                c if is_wide(c) => {
                    cursor.resolve_wrap_no_scroll(height);
                    if cursor.col() == width - 1 {
                        cursor.advance(width);
                        cursor.resolve_wrap_no_scroll(height);
                    }
                    cursor.advance_for_wide(width);
                }
                _ => {
                    cursor.resolve_wrap_no_scroll(height);
                    cursor.advance(width);
                }
            }
        }
        cursor
    }

    // ------------------------------------------------------------------
    // Line operations
    // ------------------------------------------------------------------

    /// Fill a screen line with `ch` using the current attributes. The cursor
    /// does not move.
    pub fn fill_line(&mut self, row: usize, ch: char) -> Result<()> {
        let attrs = self.grid.attrs();
        self.grid.line_mut(row)?.fill(ch, attrs);
        Ok(())
    }

    /// Scroll up one line: the top line moves to scrollback and a fresh line
    /// appears at the bottom. The cursor follows its line upward.
    pub fn add_empty_line(&mut self) -> Result<()> {
        self.grid.scroll()?;
        let row = self.cursor.row();
        let col = self.cursor.col();
        self.cursor
            .set(row.saturating_sub(1), col, self.grid.width(), self.grid.height());
        Ok(())
    }

    /// Reset every screen line; scrollback is preserved. Cursor to (0, 0).
    pub fn clear_screen(&mut self) -> Result<()> {
        self.grid.reset_screen()?;
        self.cursor.set(0, 0, self.grid.width(), self.grid.height());
        Ok(())
    }

    /// Reset the screen and drop all scrollback. Cursor to (0, 0).
    pub fn clear_screen_and_scrollback(&mut self) -> Result<()> {
        self.clear_screen()?;
        self.grid.clear_scrollback();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// A screen or scrollback line. Non-negative rows index the screen from
    /// the top; negative rows index scrollback, -1 being the most recent
    /// scrolled-out line.
    pub fn line(&self, row: isize) -> Result<&Line> {
        if row >= 0 {
            self.grid
                .line(row as usize)
                .map_err(|_| Error::LineOutOfRange(row))
        } else {
            let index = self.grid.scrollback_len() as isize + row;
            if index < 0 {
                return Err(Error::LineOutOfRange(row));
            }
            self.grid
                .scrollback_line(index as usize)
                .ok_or(Error::LineOutOfRange(row))
        }
    }

    /// Character at a position; see [`Screen::line`] for row indexing.
    pub fn get_char(&self, row: isize, col: usize) -> Result<char> {
        self.line(row)?
            .get_char(col)
            .ok_or(Error::OutOfRange { row, col })
    }

    /// Attributes at a position; see [`Screen::line`] for row indexing.
    pub fn get_attr(&self, row: isize, col: usize) -> Result<Attributes> {
        self.line(row)?
            .get_attr(col)
            .ok_or(Error::OutOfRange { row, col })
    }

    /// A line rendered as exactly `width` characters, wide-character
    /// placeholders included.
    pub fn get_line(&self, row: isize) -> Result<String> {
        Ok(self.line(row)?.to_string())
    }

    /// The visible screen, one `\n`-terminated row per line.
    pub fn screen_to_string(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for line in self.grid.screen_lines() {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    /// Scrollback (oldest first) followed by the visible screen.
    pub fn screen_and_scrollback_to_string(&self) -> String {
        let mut out = String::new();
        for line in self.grid.scrollback_lines() {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out.push_str(&self.screen_to_string());
        out
    }

    // ------------------------------------------------------------------
    // Shared with the reflow engine
    // ------------------------------------------------------------------

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub(crate) fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::new(
            crate::DEFAULT_COLS,
            crate::DEFAULT_ROWS,
            crate::DEFAULT_SCROLLBACK,
        )
    }
}

// First control character, placeholder, or wide character at or after
// `start`; the run in between is a plain narrow block.
fn find_boundary(chars: &[char], start: usize) -> usize {
    chars[start..]
        .iter()
        .position(|&c| c == '\r' || c == '\n' || c == WIDE_PLACEHOLDER || is_wide(c))
        .map_or(chars.len(), |p| start + p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_screen() {
        let screen = Screen::new(10, 5, 10);
        assert_eq!(screen.width(), 10);
        assert_eq!(screen.height(), 5);
        assert_eq!(screen.cursor().row(), 0);
        assert_eq!(screen.cursor().col(), 0);
        assert_eq!(screen.get_line(0).unwrap(), " ".repeat(10));
    }

    #[test]
    fn test_degenerate_dimensions_clamped() {
        let screen = Screen::new(0, 0, 0);
        assert_eq!(screen.width(), 1);
        assert_eq!(screen.height(), 1);
    }

    #[test]
    fn test_write_simple() {
        let mut screen = Screen::new(10, 5, 10);
        screen.write("HELLO").unwrap();
        assert_eq!(screen.get_line(0).unwrap(), "HELLO     ");
        assert_eq!(screen.cursor().col(), 5);
    }

    #[test]
    fn test_write_at_position() {
        let mut screen = Screen::new(10, 5, 10);
        screen.write_at("TEST", 2, 3).unwrap();
        assert_eq!(screen.get_line(2).unwrap(), "   TEST   ");
    }

    #[test]
    fn test_write_overwrites() {
        let mut screen = Screen::new(10, 5, 10);
        screen.write("AAAAAAAAAA").unwrap();
        screen.set_cursor(0, 0);
        screen.write("BBB").unwrap();
        assert_eq!(screen.get_line(0).unwrap(), "BBBAAAAAAA");
    }

    #[test]
    fn test_write_wraps() {
        let mut screen = Screen::new(10, 5, 10);
        screen.set_cursor(0, 8);
        screen.write("ABCD").unwrap();
        assert!(screen.get_line(0).unwrap().ends_with("AB"));
        assert!(screen.get_line(1).unwrap().starts_with("CD"));
        assert!(screen.line(1).unwrap().is_wrapped());
    }

    #[test]
    fn test_write_empty_string() {
        let mut screen = Screen::new(10, 5, 10);
        screen.write("TEST").unwrap();
        screen.set_cursor(0, 0);
        screen.write("").unwrap();
        assert_eq!(screen.get_line(0).unwrap(), "TEST      ");
        assert_eq!(screen.cursor().col(), 0);
    }

    #[test]
    fn test_placeholder_in_input_skipped() {
        let mut screen = Screen::new(10, 5, 10);
        screen.write("A\0B").unwrap();
        assert_eq!(screen.get_line(0).unwrap(), "AB        ");
        assert_eq!(screen.cursor().col(), 2);
    }

    #[test]
    fn test_newline_and_carriage_return() {
        let mut screen = Screen::new(10, 5, 10);
        screen.write("A\nB").unwrap();
        assert_eq!(screen.get_char(0, 0).unwrap(), 'A');
        assert_eq!(screen.get_char(1, 0).unwrap(), 'B');

        screen.clear_screen().unwrap();
        screen.write("HELLO\rX").unwrap();
        assert_eq!(screen.get_line(0).unwrap(), "XELLO     ");
        assert_eq!(screen.cursor().col(), 1);
    }

    #[test]
    fn test_crlf() {
        let mut screen = Screen::new(10, 5, 10);
        screen.write("AB\r\nCD").unwrap();
        assert_eq!(screen.get_line(0).unwrap(), "AB        ");
        assert_eq!(screen.get_line(1).unwrap(), "CD        ");
    }

    #[test]
    fn test_write_uses_current_attributes() {
        let mut screen = Screen::new(10, 5, 10);
        let mut style = StyleFlags::empty();
        style.insert(StyleFlags::BOLD);
        screen.set_attributes(Color::Red, Color::Black, style);
        screen.write("X").unwrap();

        let attrs = screen.get_attr(0, 0).unwrap();
        assert_eq!(attrs.fg(), Color::Red);
        assert!(attrs.style().contains(StyleFlags::BOLD));
        assert!(!attrs.is_empty());
        assert!(screen.get_attr(0, 1).unwrap().is_empty());
    }

    #[test]
    fn test_fill_line() {
        let mut screen = Screen::new(10, 5, 10);
        screen.fill_line(2, 'X').unwrap();
        assert_eq!(screen.get_line(2).unwrap(), "X".repeat(10));
        assert_eq!(screen.cursor().row(), 0);
    }

    #[test]
    fn test_clear_screen_preserves_scrollback() {
        let mut screen = Screen::new(10, 2, 10);
        screen.write("AAA\nBBB\nCCC").unwrap();
        assert_eq!(screen.scrollback_len(), 1);

        screen.clear_screen().unwrap();
        assert_eq!(screen.get_line(0).unwrap(), " ".repeat(10));
        assert_eq!(screen.scrollback_len(), 1);
        assert_eq!(screen.cursor().row(), 0);
        assert_eq!(screen.cursor().col(), 0);
    }

    #[test]
    fn test_clear_screen_and_scrollback() {
        let mut screen = Screen::new(10, 2, 10);
        screen.write("AAA\nBBB\nCCC").unwrap();
        screen.clear_screen_and_scrollback().unwrap();
        assert_eq!(screen.scrollback_len(), 0);
        assert!(screen.line(-1).is_err());
    }

    #[test]
    fn test_add_empty_line_moves_cursor_up_with_line() {
        let mut screen = Screen::new(10, 5, 10);
        screen.write_at("TEST", 4, 0).unwrap();
        screen.add_empty_line().unwrap();

        assert_eq!(screen.get_line(4).unwrap(), " ".repeat(10));
        assert_eq!(screen.get_line(3).unwrap(), "TEST      ");
        assert_eq!(screen.cursor().row(), 3);
    }

    #[test]
    fn test_negative_row_indexes_scrollback() {
        let mut screen = Screen::new(10, 1, 5);
        screen.write("A\nB\nC").unwrap();

        // Screen shows C; scrollback holds A then B.
        assert_eq!(screen.get_char(0, 0).unwrap(), 'C');
        assert_eq!(screen.get_char(-1, 0).unwrap(), 'B');
        assert_eq!(screen.get_char(-2, 0).unwrap(), 'A');
        assert!(screen.get_char(-3, 0).is_err());
    }

    #[test]
    fn test_out_of_range_queries() {
        let screen = Screen::new(10, 5, 10);
        assert!(screen.get_char(5, 0).is_err());
        assert!(screen.get_char(0, 10).is_err());
        assert!(screen.get_line(-1).is_err());
    }

    #[test]
    fn test_screen_to_string_shape() {
        let mut screen = Screen::new(4, 2, 10);
        screen.write("AB").unwrap();
        let s = screen.screen_to_string();
        assert_eq!(s, "AB  \n    \n");
    }

    #[test]
    fn test_screen_and_scrollback_to_string() {
        let mut screen = Screen::new(4, 1, 10);
        screen.write("A\nB").unwrap();
        assert_eq!(screen.screen_and_scrollback_to_string(), "A   \nB   \n");
    }

    #[test]
    fn test_default_screen() {
        let screen = Screen::default();
        assert_eq!(screen.width(), crate::DEFAULT_COLS);
        assert_eq!(screen.height(), crate::DEFAULT_ROWS);
        assert_eq!(screen.max_scrollback(), crate::DEFAULT_SCROLLBACK);
    }
}
