//! Display renderers.
//!
//! The widget hands a renderer the full set of rows every time the title or
//! the container width changes. [`TerminalRenderer`] draws them as flap
//! cells on a terminal; [`RecordingRenderer`] just keeps them.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::error::{Error, Result};
use crate::flap::FlapBoard;
use crate::rows::DisplayRow;

/// Approximate width of one terminal column in pixels.
pub const PX_PER_COLUMN: f64 = 8.0;

/// Container width in pixels for a terminal `columns` wide.
#[must_use]
pub fn columns_to_px(columns: u16) -> f64 {
    f64::from(columns) * PX_PER_COLUMN
}

/// Width of the controlling terminal in pixels, if it can be measured.
#[must_use]
pub fn terminal_width_px() -> Option<f64> {
    crossterm::terminal::size()
        .ok()
        .map(|(columns, _rows)| columns_to_px(columns))
}

/// Something that can present display rows.
#[async_trait]
pub trait DisplayRenderer: Send {
    /// Present `rows`, replacing whatever was shown before.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    async fn render(&mut self, rows: &[DisplayRow]) -> Result<()>;
}

/// Keeps every frame it is given.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    frames: Vec<Vec<DisplayRow>>,
}

impl RecordingRenderer {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames rendered so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Vec<DisplayRow>] {
        &self.frames
    }

    /// The most recent frame.
    #[must_use]
    pub fn last(&self) -> Option<&[DisplayRow]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Text of each row in the most recent frame.
    #[must_use]
    pub fn last_texts(&self) -> Vec<String> {
        self.last()
            .map(|rows| rows.iter().map(|row| row.text.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DisplayRenderer for RecordingRenderer {
    async fn render(&mut self, rows: &[DisplayRow]) -> Result<()> {
        self.frames.push(rows.to_vec());
        Ok(())
    }
}

/// Draws the board as bracketed cells, redrawing in place.
///
/// With animation on, every flap step is drawn with `flip_interval` between
/// steps; otherwise only the settled board is drawn.
#[derive(Debug)]
pub struct TerminalRenderer<W> {
    out: W,
    board: FlapBoard,
    flip_interval: Duration,
    animate: bool,
    drawn_lines: usize,
}

impl<W> TerminalRenderer<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// A renderer writing to `out`.
    pub fn new(out: W, flip_interval: Duration, animate: bool) -> Self {
        Self {
            out,
            board: FlapBoard::new(),
            flip_interval,
            animate,
            drawn_lines: 0,
        }
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Format one row: `[P][I][Z][Z][A]  31.1px`.
    #[must_use]
    pub fn format_row(glyphs: &str, font_size_px: f64) -> String {
        let mut line = String::with_capacity(glyphs.len() * 3 + 10);
        for glyph in glyphs.chars() {
            line.push('[');
            line.push(glyph);
            line.push(']');
        }
        line.push_str(&format!("  {font_size_px:.1}px"));
        line
    }

    async fn draw(&mut self) -> Result<()> {
        let mut frame = String::new();
        if self.drawn_lines > 0 {
            // Move back to the top of the previous frame.
            frame.push_str(&format!("\x1b[{}A", self.drawn_lines));
        }
        for row in self.board.rows() {
            frame.push_str("\r\x1b[2K");
            frame.push_str(&Self::format_row(&row.visible(), row.font_size_px()));
            frame.push('\n');
        }
        // Wipe lines left over from a taller previous frame.
        frame.push_str("\x1b[J");

        self.out
            .write_all(frame.as_bytes())
            .await
            .map_err(|e| Error::render(format!("writing frame: {e}")))?;
        self.out
            .flush()
            .await
            .map_err(|e| Error::render(format!("flushing frame: {e}")))?;
        self.drawn_lines = self.board.rows().len();
        Ok(())
    }
}

#[async_trait]
impl<W> DisplayRenderer for TerminalRenderer<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn render(&mut self, rows: &[DisplayRow]) -> Result<()> {
        self.board.set_target(rows);
        if !self.animate {
            self.board.settle();
            return self.draw().await;
        }

        trace!(steps = self.board.steps_remaining(), "animating board");
        self.draw().await?;
        while self.board.step() {
            tokio::time::sleep(self.flip_interval).await;
            self.draw().await?;
        }
        Ok(())
    }
}
