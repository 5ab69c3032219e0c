//! Terminal cell buffer
//!
//! The in-memory grid behind a terminal emulator: a fixed-height visible
//! screen over a bounded scrollback, with styled cells, VT100 pending-wrap
//! cursor semantics, double-width character support, and resize with content
//! reflow.
//!
//! The crate is a pure data structure: input arrives as already-decoded
//! text, and escape-sequence parsing, PTY plumbing, and rendering all live
//! with the caller. Everything is single-threaded and synchronous.
//!
//! ```
//! use termbuf::Screen;
//!
//! let mut screen = Screen::new(10, 5, 100);
//! screen.write("hello\nworld").unwrap();
//! assert_eq!(screen.get_char(1, 0).unwrap(), 'w');
//! ```

pub mod attr;
pub mod cursor;
pub mod error;
mod grid;
pub mod line;
mod reflow;
pub mod ring;
pub mod screen;
pub mod wide;

pub use attr::{Attributes, Color, StyleFlags};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use line::{Line, Overflow, WIDE_PLACEHOLDER};
pub use ring::RingBuffer;
pub use screen::Screen;
pub use wide::is_wide;

/// Default screen width.
pub const DEFAULT_COLS: usize = 80;
/// Default screen height.
pub const DEFAULT_ROWS: usize = 24;
/// Default scrollback limit.
pub const DEFAULT_SCROLLBACK: usize = 10_000;
