//! Character-grid display surfaces.
//!
//! [`TerminalSurface`] drives a real terminal through `crossterm`;
//! [`MemorySurface`] keeps the grid in memory for tests and headless runs.
//! Both address cells as `(row, col)` with `0..rows × 0..cols` valid.

use std::collections::{HashSet, VecDeque};
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::debug;

use crate::error::SurfaceError;

// ════════════════════════════════════════════════════════════════════════════
// DisplaySurface trait
// ════════════════════════════════════════════════════════════════════════════

/// A fixed-size grid of character cells.
pub trait DisplaySurface {
    /// `(rows, cols)`.
    fn size(&self) -> (u16, u16);

    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Place one character. Cells outside the grid are rejected with
    /// [`SurfaceError::OutOfBounds`].
    fn put_char(&mut self, row: u16, col: u16, ch: char) -> Result<(), SurfaceError>;

    /// Write text starting at a cell, clipped at the right edge.
    fn put_str(&mut self, row: u16, col: u16, text: &str) -> Result<(), SurfaceError>;

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), SurfaceError>;

    /// Push everything drawn since the last refresh to the screen.
    fn refresh(&mut self) -> Result<(), SurfaceError>;

    /// Non-blocking: the pending key press, if any.
    fn poll_key(&mut self) -> Result<Option<KeyCode>, SurfaceError>;
}

fn check_cell(row: u16, col: u16, (rows, cols): (u16, u16)) -> Result<(), SurfaceError> {
    if row < rows && col < cols {
        Ok(())
    } else {
        Err(SurfaceError::OutOfBounds { row, col, rows, cols })
    }
}

fn clipped(text: &str, col: u16, cols: u16) -> impl Iterator<Item = char> + '_ {
    text.chars().take(usize::from(cols.saturating_sub(col)))
}

// ════════════════════════════════════════════════════════════════════════════
// TerminalSurface — crossterm
// ════════════════════════════════════════════════════════════════════════════

/// The controlling terminal, switched to raw mode on an alternate screen.
///
/// The terminal is put back the way it was when this value is dropped, on
/// every exit path including errors and panics that unwind.
pub struct TerminalSurface {
    out:  Stdout,
    rows: u16,
    cols: u16,
}

impl TerminalSurface {
    pub fn new() -> Result<Self, SurfaceError> {
        let (cols, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;

        let mut out = io::stdout();
        if let Err(e) = crossterm::execute!(out, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e.into());
        }
        debug!(rows, cols, "terminal surface opened");

        Ok(TerminalSurface { out, rows, cols })
    }
}

impl DisplaySurface for TerminalSurface {
    fn size(&self) -> (u16, u16) { (self.rows, self.cols) }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        queue!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    fn put_char(&mut self, row: u16, col: u16, ch: char) -> Result<(), SurfaceError> {
        check_cell(row, col, self.size())?;
        queue!(self.out, MoveTo(col, row), Print(ch))?;
        Ok(())
    }

    fn put_str(&mut self, row: u16, col: u16, text: &str) -> Result<(), SurfaceError> {
        check_cell(row, col, self.size())?;
        let line: String = clipped(text, col, self.cols).collect();
        queue!(self.out, MoveTo(col, row), Print(line))?;
        Ok(())
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), SurfaceError> {
        check_cell(row, col, self.size())?;
        queue!(self.out, MoveTo(col, row))?;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), SurfaceError> {
        self.out.flush()?;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<KeyCode>, SurfaceError> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key.code));
                }
            }
        }
        Ok(None)
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = crossterm::execute!(self.out, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MemorySurface — in-memory grid
// ════════════════════════════════════════════════════════════════════════════

/// A drawing call as seen by [`MemorySurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Clear,
    PutChar { row: u16, col: u16, ch: char },
    PutStr  { row: u16, col: u16, text: String },
    MoveCursor { row: u16, col: u16 },
    Refresh,
}

/// Headless surface: keeps the grid contents, a log of every call, a queue
/// of key presses to hand out, and a set of cells to refuse as if the
/// terminal could not draw there.
#[derive(Clone, Debug)]
pub struct MemorySurface {
    rows:     u16,
    cols:     u16,
    cells:    Vec<char>,
    cursor:   (u16, u16),
    ops:      Vec<SurfaceOp>,
    keys:     VecDeque<Option<KeyCode>>,
    rejected: HashSet<(u16, u16)>,
}

impl MemorySurface {
    pub fn new(rows: u16, cols: u16) -> Self {
        MemorySurface {
            rows,
            cols,
            cells:    vec![' '; usize::from(rows) * usize::from(cols)],
            cursor:   (0, 0),
            ops:      Vec::new(),
            keys:     VecDeque::new(),
            rejected: HashSet::new(),
        }
    }

    /// Queue the answers for successive [`poll_key`](DisplaySurface::poll_key)
    /// calls; once drained, no key is pending.
    pub fn script_keys(&mut self, keys: impl IntoIterator<Item = Option<KeyCode>>) {
        self.keys.extend(keys);
    }

    /// Make `put_char` at this cell fail with `Refused`.
    pub fn reject_cell(&mut self, row: u16, col: u16) {
        self.rejected.insert((row, col));
    }

    pub fn cell(&self, row: u16, col: u16) -> Option<char> {
        if row < self.rows && col < self.cols {
            Some(self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    /// Row contents with trailing blanks trimmed.
    pub fn row_text(&self, row: u16) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = self.index(row, 0);
        let line: String = self.cells[start..start + usize::from(self.cols)].iter().collect();
        line.trim_end().to_string()
    }

    pub fn cursor(&self) -> (u16, u16) { self.cursor }

    pub fn ops(&self) -> &[SurfaceOp] { &self.ops }

    pub fn clear_ops(&mut self) { self.ops.clear(); }

    /// Every `(row, col, ch)` placed with `put_char`, in call order.
    pub fn char_draws(&self) -> Vec<(u16, u16, char)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                SurfaceOp::PutChar { row, col, ch } => Some((row, col, ch)),
                _ => None,
            })
            .collect()
    }

    fn index(&self, row: u16, col: u16) -> usize {
        usize::from(row) * usize::from(self.cols) + usize::from(col)
    }
}

impl DisplaySurface for MemorySurface {
    fn size(&self) -> (u16, u16) { (self.rows, self.cols) }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.cells.fill(' ');
        self.ops.push(SurfaceOp::Clear);
        Ok(())
    }

    fn put_char(&mut self, row: u16, col: u16, ch: char) -> Result<(), SurfaceError> {
        self.ops.push(SurfaceOp::PutChar { row, col, ch });
        check_cell(row, col, self.size())?;
        if self.rejected.contains(&(row, col)) {
            return Err(SurfaceError::Refused { row, col });
        }
        let i = self.index(row, col);
        self.cells[i] = ch;
        Ok(())
    }

    fn put_str(&mut self, row: u16, col: u16, text: &str) -> Result<(), SurfaceError> {
        self.ops.push(SurfaceOp::PutStr { row, col, text: text.to_string() });
        check_cell(row, col, self.size())?;
        let start = self.index(row, col);
        for (i, ch) in clipped(text, col, self.cols).enumerate() {
            self.cells[start + i] = ch;
        }
        Ok(())
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), SurfaceError> {
        self.ops.push(SurfaceOp::MoveCursor { row, col });
        check_cell(row, col, self.size())?;
        self.cursor = (row, col);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), SurfaceError> {
        self.ops.push(SurfaceOp::Refresh);
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<KeyCode>, SurfaceError> {
        Ok(self.keys.pop_front().flatten())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
