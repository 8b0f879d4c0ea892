//! Terminal renderer
//!
//! Samples the world at the center of each character cell.

use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use super::{Frame, RenderSink};
use crate::consts::*;
use crate::sim::{GameState, WingFrame};

/// World pixels per character cell
pub const CELL_WIDTH: f32 = 10.0;
pub const CELL_HEIGHT: f32 = 20.0;

const COLS: usize = (WIN_WIDTH / CELL_WIDTH) as usize;
const ROWS: usize = (WIN_HEIGHT / CELL_HEIGHT) as usize;

const EMPTY: char = ' ';
const PIPE: char = '#';

/// Character grid covering the whole window
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    cells: Vec<char>,
}

impl Default for AsciiCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl AsciiCanvas {
    pub fn new() -> Self {
        Self {
            cells: vec![EMPTY; COLS * ROWS],
        }
    }

    pub fn cols(&self) -> usize {
        COLS
    }

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        (col < COLS && row < ROWS).then(|| self.cells[row * COLS + col])
    }

    fn put(&mut self, col: i32, row: i32, c: char) {
        if (0..COLS as i32).contains(&col) && (0..ROWS as i32).contains(&row) {
            self.cells[row as usize * COLS + col as usize] = c;
        }
    }

    /// Redraw the grid from a world snapshot
    pub fn draw(&mut self, state: &GameState) {
        self.cells.fill(EMPTY);

        for row in 0..ROWS {
            let y = cell_center_y(row);
            for col in 0..COLS {
                let x = cell_center_x(col);
                let c = if y >= state.ground.y {
                    ground_char(state, x, y)
                } else if state
                    .pipes
                    .iter()
                    .any(|p| x >= p.x && x < p.right() && (y < p.gap_y() || y >= p.bottom()))
                {
                    PIPE
                } else {
                    EMPTY
                };
                self.cells[row * COLS + col] = c;
            }
        }

        for bird in &state.birds {
            let cx = bird.pos.x + BIRD_WIDTH as f32 / 2.0;
            let cy = bird.pos.y + BIRD_HEIGHT as f32 / 2.0;
            let c = match bird.frame {
                WingFrame::Up => '^',
                WingFrame::Mid => '>',
                WingFrame::Down => 'v',
            };
            self.put(
                (cx / CELL_WIDTH).floor() as i32,
                (cy / CELL_HEIGHT).floor() as i32,
                c,
            );
        }
    }

    /// One grid row as text
    pub fn row_text(&self, row: usize) -> String {
        self.cells
            .chunks_exact(COLS)
            .nth(row)
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }
}

fn cell_center_x(col: usize) -> f32 {
    col as f32 * CELL_WIDTH + CELL_WIDTH / 2.0
}

fn cell_center_y(row: usize) -> f32 {
    row as f32 * CELL_HEIGHT + CELL_HEIGHT / 2.0
}

/// Striped ground; the stripes follow the scrolling tiles
fn ground_char(state: &GameState, x: f32, y: f32) -> char {
    if y < state.ground.y + CELL_HEIGHT {
        let offset = (x - state.ground.x1).rem_euclid(4.0 * CELL_WIDTH);
        if offset < 2.0 * CELL_WIDTH { '=' } else { '-' }
    } else {
        ':'
    }
}

/// Terminal row just below the status line and grid, free for prompts
pub const MESSAGE_ROW: u16 = ROWS as u16 + 2;

/// Draws each frame to a terminal (or any writer)
pub struct AsciiSink<W: Write> {
    out: W,
    canvas: AsciiCanvas,
    cleared: bool,
    failed: bool,
}

impl AsciiSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AsciiSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            canvas: AsciiCanvas::new(),
            cleared: false,
            failed: false,
        }
    }

    pub fn canvas(&self) -> &AsciiCanvas {
        &self.canvas
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Status line on row 0, grid below; rows are overwritten in place
    fn write_frame(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        if !self.cleared {
            queue!(self.out, Clear(ClearType::All))?;
            self.cleared = true;
        }
        queue!(
            self.out,
            MoveTo(0, 0),
            Print(frame.status_line()),
            Clear(ClearType::UntilNewLine)
        )?;
        for row in 0..ROWS {
            queue!(
                self.out,
                MoveTo(0, row as u16 + 1),
                Print(self.canvas.row_text(row))
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> RenderSink for AsciiSink<W> {
    fn present(&mut self, frame: &Frame<'_>) {
        if self.failed {
            return;
        }
        self.canvas.draw(frame.state);
        if let Err(e) = self.write_frame(frame) {
            log::warn!("Terminal output failed, rendering disabled: {}", e);
            self.failed = true;
        }
    }
}
