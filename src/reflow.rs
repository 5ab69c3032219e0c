//! Resize and reflow
//!
//! Resizing reflows the whole buffer to the new width: scrollback and the
//! meaningful part of the screen are stitched into paragraphs along the
//! soft-wrap flags, each paragraph is trimmed to its effective length and
//! re-cut at the new width, and the results are redistributed between
//! scrollback and screen. The cursor is anchored to its cell offset within
//! its paragraph before the rebuild and mapped back afterwards.
//!
//! The copy is direct cell-to-cell; no intermediate per-cell buffers are
//! allocated beyond the new lines themselves.

use log::debug;

use crate::attr::Attributes;
use crate::error::Result;
use crate::line::Line;
use crate::screen::Screen;
use crate::wide::is_wide;

/// Cursor position expressed as (paragraph index, cell offset within the
/// paragraph), which survives re-cutting at a different width.
struct CursorAnchor {
    block: usize,
    offset: usize,
}

struct Reflowed {
    lines: Vec<Line>,
    cursor: Option<(usize, usize)>,
}

impl Screen {
    /// Resize the buffer, reflowing all content to the new width and
    /// redistributing lines between scrollback and screen. Dimensions are
    /// clamped to at least 1.
    ///
    /// Soft-wrapped runs merge or split as the width allows; trailing blank
    /// cells beyond each paragraph's last meaningful cell are dropped. The
    /// cursor keeps its logical position; if its line ends up in scrollback
    /// it moves to (0, 0).
    pub fn resize(&mut self, new_width: usize, new_height: usize) -> Result<()> {
        let new_width = new_width.max(1);
        let new_height = new_height.max(1);
        debug!(
            "resize {}x{} -> {}x{}",
            self.width(),
            self.height(),
            new_width,
            new_height
        );

        let old_width = self.width();
        let scrollback_len = self.scrollback_len();
        let all_lines = self.collect_lines()?;
        let cursor_line = scrollback_len + self.cursor().row();
        let anchor = cursor_anchor(&all_lines, cursor_line, self.cursor().col(), old_width);
        let attrs = self.current_attributes();

        let reflowed = reflow(&all_lines, old_width, new_width, &anchor, attrs)?;
        let screen_start = self
            .grid_mut()
            .rebuild(reflowed.lines, new_width, new_height)?;

        match reflowed.cursor {
            Some((row, col)) if row >= screen_start => {
                self.cursor_mut()
                    .set(row - screen_start, col, new_width, new_height);
            }
            // Anchor swallowed by scrollback, or never found.
            _ => self.cursor_mut().set(0, 0, new_width, new_height),
        }
        Ok(())
    }

    // Drain scrollback and the meaningful screen rows, in order, out of the
    // rings. The rings are rebuilt afterwards, so leftovers are discarded.
    fn collect_lines(&mut self) -> Result<Vec<Line>> {
        let keep = self.meaningful_rows();
        let mut all = Vec::with_capacity(self.scrollback_len() + keep);
        while self.scrollback_len() > 0 {
            all.push(self.grid_mut().pop_scrollback_front()?);
        }
        for _ in 0..keep {
            all.push(self.grid_mut().pop_screen_front()?);
        }
        Ok(all)
    }

    // Screen rows up to and including the last non-empty one or the cursor's
    // row, whichever is lower; rows below that are trailing blanks.
    fn meaningful_rows(&self) -> usize {
        let cursor_row = self.cursor().row();
        for row in (0..self.height()).rev() {
            let blank = self.grid().line(row).map_or(true, |l| l.is_empty());
            if blank && row != cursor_row {
                continue;
            }
            return row + 1;
        }
        0
    }
}

fn cursor_anchor(
    lines: &[Line],
    cursor_line: usize,
    cursor_col: usize,
    old_width: usize,
) -> CursorAnchor {
    let mut block = 0;
    let mut offset = 0;
    for (i, line) in lines.iter().enumerate() {
        if !line.is_wrapped() && offset > 0 {
            block += 1;
            offset = 0;
        }
        if i == cursor_line {
            return CursorAnchor {
                block,
                offset: offset + cursor_col,
            };
        }
        offset += old_width;
    }
    CursorAnchor { block: 0, offset: 0 }
}

fn reflow(
    lines: &[Line],
    old_width: usize,
    new_width: usize,
    anchor: &CursorAnchor,
    current: Attributes,
) -> Result<Reflowed> {
    let mut out = Vec::new();
    let mut cursor = None;
    let mut block = 0;
    let mut i = 0;

    while i < lines.len() {
        // A paragraph: one hard line plus its soft-wrap continuations.
        let start = i;
        let mut end = i;
        while end + 1 < lines.len() && lines[end + 1].is_wrapped() {
            end += 1;
        }

        let effective = effective_length(lines, start, end, old_width, current);
        // The cursor may sit in blank space past the content; keep room for it.
        let logical = if block == anchor.block {
            effective.max(anchor.offset + 1)
        } else {
            effective
        };

        let mut offset = 0;
        loop {
            let mut line = Line::new(new_width, current);
            if offset > 0 {
                line.set_wrapped();
            }
            let consumed =
                copy_paragraph(lines, start, end, &mut line, offset, old_width, new_width)?;
            if block == anchor.block && (offset..offset + consumed).contains(&anchor.offset) {
                cursor = Some((out.len(), anchor.offset - offset));
            }
            out.push(line);
            offset += consumed;
            if offset >= logical {
                break;
            }
        }

        block += 1;
        i = end + 1;
    }

    Ok(Reflowed { lines: out, cursor })
}

// 1-based offset of the paragraph's last cell that is written and is not a
// space in the current attributes; 0 for an all-blank paragraph.
fn effective_length(
    lines: &[Line],
    start: usize,
    end: usize,
    old_width: usize,
    current: Attributes,
) -> usize {
    for l in (start..=end).rev() {
        let line = &lines[l];
        for c in (0..old_width).rev() {
            if line.is_empty_cell(c) {
                continue;
            }
            let meaningful = match (line.get_char(c), line.get_attr(c)) {
                (Some(ch), Some(attr)) => ch != ' ' || attr != current,
                _ => false,
            };
            if meaningful {
                return (l - start) * old_width + c + 1;
            }
        }
    }
    0
}

// Fill `target` from the paragraph's cells starting at `start_offset`.
// Returns how many source cells were consumed; a wide pair that would be cut
// by the right edge stops the line so the pair starts the next one.
fn copy_paragraph(
    lines: &[Line],
    start: usize,
    end: usize,
    target: &mut Line,
    start_offset: usize,
    old_width: usize,
    new_width: usize,
) -> Result<usize> {
    let mut copied = 0;
    let mut consumed = 0;

    while copied < new_width {
        let global = start_offset + consumed;
        let line_in_block = global / old_width;
        let col = global % old_width;
        if start + line_in_block > end {
            break;
        }
        let source = &lines[start + line_in_block];
        let (Some(ch), Some(attr)) = (source.get_char(col), source.get_attr(col)) else {
            break;
        };

        if is_wide(ch) {
            if copied + 1 >= new_width {
                break;
            }
            target.set_wide(copied, ch, attr)?;
            copied += 2;
            consumed += 2;
        } else {
            target.set(copied, ch, attr)?;
            copied += 1;
            consumed += 1;
        }
    }

    // A target too narrow to take the next cell must still make progress.
    if consumed == 0 && new_width > 0 {
        Ok(1)
    } else {
        Ok(consumed)
    }
}
