//! Grid storage
//!
//! The storage half of the buffer: the always-full screen ring, the bounded
//! scrollback ring, the dimensions, and the attributes applied to new
//! writes. The cursor's scroll-coupled operations borrow this type, and the
//! write engine in `screen` drives it.

use serde::{Deserialize, Serialize};

use crate::attr::Attributes;
use crate::error::{Error, Result};
use crate::line::Line;
use crate::ring::RingBuffer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Grid {
    width: usize,
    height: usize,
    max_scrollback: usize,
    screen: RingBuffer<Line>,
    scrollback: RingBuffer<Line>,
    attrs: Attributes,
}

impl Grid {
    pub(crate) fn new(width: usize, height: usize, max_scrollback: usize) -> Self {
        let attrs = Attributes::default();
        Grid {
            width,
            height,
            max_scrollback,
            screen: RingBuffer::full_with(height, |_| Line::new(width, attrs)),
            scrollback: RingBuffer::new(max_scrollback),
            attrs,
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn max_scrollback(&self) -> usize {
        self.max_scrollback
    }

    pub(crate) fn attrs(&self) -> Attributes {
        self.attrs
    }

    pub(crate) fn set_attrs(&mut self, attrs: Attributes) {
        self.attrs = attrs;
    }

    pub(crate) fn line(&self, row: usize) -> Result<&Line> {
        self.screen
            .get(row)
            .ok_or(Error::LineOutOfRange(row as isize))
    }

    pub(crate) fn line_mut(&mut self, row: usize) -> Result<&mut Line> {
        self.screen
            .get_mut(row)
            .ok_or(Error::LineOutOfRange(row as isize))
    }

    pub(crate) fn scrollback_line(&self, i: usize) -> Option<&Line> {
        self.scrollback.get(i)
    }

    pub(crate) fn scrollback_len(&self) -> usize {
        self.scrollback.len()
    }

    pub(crate) fn screen_lines(&self) -> impl Iterator<Item = &Line> {
        self.screen.iter()
    }

    pub(crate) fn scrollback_lines(&self) -> impl Iterator<Item = &Line> {
        self.scrollback.iter()
    }

    /// Move the top screen line into scrollback and append a fresh line at
    /// the bottom.
    pub(crate) fn scroll(&mut self) -> Result<()> {
        let removed = self.screen.pop()?;
        self.push_scrollback(removed)?;
        self.screen.push(Line::new(self.width, self.attrs))
    }

    /// Push a line into scrollback, evicting the oldest when full. With
    /// scrollback disabled the line is dropped.
    pub(crate) fn push_scrollback(&mut self, line: Line) -> Result<()> {
        if self.max_scrollback == 0 {
            return Ok(());
        }
        if self.scrollback.is_full() {
            self.scrollback.pop()?;
        }
        self.scrollback.push(line)
    }

    pub(crate) fn set_wrapped(&mut self, row: usize) -> Result<()> {
        self.line_mut(row)?.set_wrapped();
        Ok(())
    }

    /// Replace every screen line with a fresh one. Scrollback is untouched.
    pub(crate) fn reset_screen(&mut self) -> Result<()> {
        self.screen.clear();
        for _ in 0..self.height {
            self.screen.push(Line::new(self.width, self.attrs))?;
        }
        Ok(())
    }

    pub(crate) fn clear_scrollback(&mut self) {
        self.scrollback.clear();
    }

    pub(crate) fn pop_scrollback_front(&mut self) -> Result<Line> {
        self.scrollback.pop()
    }

    pub(crate) fn pop_screen_front(&mut self) -> Result<Line> {
        self.screen.pop()
    }

    /// Adopt reflowed lines under new dimensions: the latest `new_height`
    /// lines become the screen (padded with fresh lines if short) and the
    /// overflow ahead of them goes to scrollback, oldest first. Returns the
    /// number of lines that went to scrollback.
    pub(crate) fn rebuild(
        &mut self,
        mut lines: Vec<Line>,
        new_width: usize,
        new_height: usize,
    ) -> Result<usize> {
        self.width = new_width;
        self.height = new_height;

        self.scrollback.clear();
        self.screen.resize_and_clear(new_height);

        let screen_start = lines.len().saturating_sub(new_height);
        let screen_lines = lines.split_off(screen_start);
        for line in lines {
            self.push_scrollback(line)?;
        }
        for line in screen_lines {
            self.screen.push(line)?;
        }
        while self.screen.len() < new_height {
            self.screen.push(Line::new(new_width, self.attrs))?;
        }
        Ok(screen_start)
    }
}
