//! Split-flap cell mechanics.
//!
//! Each cell holds one glyph and can only move forward through its
//! alphabet, one flap at a time, wrapping from the last glyph back to the
//! first. Glyphs outside the alphabet (punctuation, accented letters) have
//! no flap, so the cell snaps straight to them.

use crate::rows::DisplayRow;

/// Space, A-Z, then 0-9.
pub const ALPHANUMERIC: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The glyph a fresh cell shows.
pub const BLANK: char = ' ';

/// Number of single-flap steps from `from` to `to`, or `None` when either
/// glyph is outside `alphabet` and the cell has to snap.
#[must_use]
pub fn flip_distance(alphabet: &[char], from: char, to: char) -> Option<usize> {
    let start = alphabet.iter().position(|&c| c == from)?;
    let end = alphabet.iter().position(|&c| c == to)?;
    Some((end + alphabet.len() - start) % alphabet.len())
}

/// A single flap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlapCell {
    current: char,
    target: char,
}

impl FlapCell {
    /// A cell showing `glyph` with nothing to do.
    #[must_use]
    pub fn showing(glyph: char) -> Self {
        Self {
            current: glyph,
            target: glyph,
        }
    }

    /// The glyph currently visible.
    #[must_use]
    pub fn current(&self) -> char {
        self.current
    }

    /// The glyph the cell is flipping towards.
    #[must_use]
    pub fn target(&self) -> char {
        self.target
    }

    /// True once the visible glyph is the target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Flip once. Returns false if the cell was already settled.
    fn step(&mut self, alphabet: &[char]) -> bool {
        if self.is_settled() {
            return false;
        }
        self.current = match alphabet.iter().position(|&c| c == self.current) {
            Some(pos) if alphabet.contains(&self.target) => alphabet[(pos + 1) % alphabet.len()],
            _ => self.target,
        };
        true
    }
}

/// One row of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FlapRow {
    cells: Vec<FlapCell>,
    font_size_px: f64,
}

impl FlapRow {
    /// The row's cells, left to right.
    #[must_use]
    pub fn cells(&self) -> &[FlapCell] {
        &self.cells
    }

    /// Font size the row is drawn at.
    #[must_use]
    pub fn font_size_px(&self) -> f64 {
        self.font_size_px
    }

    /// The currently visible glyphs.
    #[must_use]
    pub fn visible(&self) -> String {
        self.cells.iter().map(FlapCell::current).collect()
    }
}

/// A board of flap rows animating towards a set of [`DisplayRow`]s.
#[derive(Debug, Clone)]
pub struct FlapBoard {
    alphabet: Vec<char>,
    rows: Vec<FlapRow>,
}

impl Default for FlapBoard {
    fn default() -> Self {
        Self::with_alphabet(ALPHANUMERIC)
    }
}

impl FlapBoard {
    /// An empty board using [`ALPHANUMERIC`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty board with a custom alphabet.
    #[must_use]
    pub fn with_alphabet(alphabet: &str) -> Self {
        Self {
            alphabet: alphabet.chars().collect(),
            rows: Vec::new(),
        }
    }

    /// The rows currently on the board.
    #[must_use]
    pub fn rows(&self) -> &[FlapRow] {
        &self.rows
    }

    /// Point the board at new content.
    ///
    /// Existing cells keep their visible glyph and flip from there. Each row
    /// is resized to its target length; new cells start blank.
    pub fn set_target(&mut self, targets: &[DisplayRow]) {
        self.rows.resize_with(targets.len(), || FlapRow {
            cells: Vec::new(),
            font_size_px: 0.0,
        });

        for (row, target) in self.rows.iter_mut().zip(targets) {
            let glyphs: Vec<char> = target.text.chars().collect();
            row.cells
                .resize_with(glyphs.len(), || FlapCell::showing(BLANK));
            for (cell, glyph) in row.cells.iter_mut().zip(glyphs) {
                cell.target = glyph;
            }
            row.font_size_px = target.font_size_px;
        }
    }

    /// Advance every unsettled cell by one flap. Returns true if anything
    /// moved.
    pub fn step(&mut self) -> bool {
        let alphabet = &self.alphabet;
        let mut moved = false;
        for cell in self.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            moved |= cell.step(alphabet);
        }
        moved
    }

    /// Jump every cell straight to its target.
    pub fn settle(&mut self) {
        for cell in self.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            cell.current = cell.target;
        }
    }

    /// True when every cell shows its target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.cells.iter().all(FlapCell::is_settled))
    }

    /// The visible text of every row.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.rows.iter().map(FlapRow::visible).collect()
    }

    /// Every intermediate frame from the current state until the board
    /// settles, starting with the current one. Leaves the board settled.
    pub fn frames(&mut self) -> Vec<Vec<String>> {
        let mut frames = vec![self.snapshot()];
        while self.step() {
            frames.push(self.snapshot());
        }
        frames
    }

    /// Steps needed before the board settles from its current state.
    #[must_use]
    pub fn steps_remaining(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .map(|cell| {
                if cell.is_settled() {
                    0
                } else {
                    flip_distance(&self.alphabet, cell.current, cell.target).unwrap_or(1)
                }
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet() -> Vec<char> {
        ALPHANUMERIC.chars().collect()
    }

    fn row(text: &str) -> DisplayRow {
        DisplayRow {
            text: text.to_string(),
            font_size_px: 24.0,
        }
    }

    fn run_to_settle(board: &mut FlapBoard) -> usize {
        let mut steps = 0;
        while board.step() {
            steps += 1;
            assert!(steps <= ALPHANUMERIC.len(), "board never settled");
        }
        steps
    }

    #[test]
    fn test_flip_distance_forward_only() {
        let a = alphabet();
        assert_eq!(flip_distance(&a, 'A', 'C'), Some(2));
        assert_eq!(flip_distance(&a, 'C', 'A'), Some(a.len() - 2));
        assert_eq!(flip_distance(&a, 'Z', '0'), Some(1));
        assert_eq!(flip_distance(&a, '9', ' '), Some(1));
        assert_eq!(flip_distance(&a, 'A', 'A'), Some(0));
        assert_eq!(flip_distance(&a, 'A', '-'), None);
    }

    #[test]
    fn test_blank_board_flips_to_word() {
        let mut board = FlapBoard::new();
        board.set_target(&[row("DAD")]);
        assert_eq!(board.snapshot(), ["   "]);
        assert_eq!(board.steps_remaining(), 4);

        board.step();
        assert_eq!(board.snapshot(), ["AAA"]);

        let steps = run_to_settle(&mut board);
        assert_eq!(steps, 3);
        assert!(board.is_settled());
        assert_eq!(board.snapshot(), ["DAD"]);
    }

    #[test]
    fn test_non_alphabet_glyphs_snap() {
        let mut board = FlapBoard::new();
        board.set_target(&[row("A-B")]);
        board.step();
        assert_eq!(board.snapshot(), ["A-A"]);
        run_to_settle(&mut board);
        assert_eq!(board.snapshot(), ["A-B"]);
    }

    #[test]
    fn test_cells_flip_from_visible_glyph() {
        let mut board = FlapBoard::new();
        board.set_target(&[row("AB")]);
        board.settle();

        board.set_target(&[row("BB")]);
        assert_eq!(board.steps_remaining(), 1);
        board.step();
        assert_eq!(board.snapshot(), ["BB"]);
        assert!(!board.step());
    }

    #[test]
    fn test_rows_resize_to_targets() {
        let mut board = FlapBoard::new();
        board.set_target(&[row("PIZZA"), row("CHEF")]);
        board.settle();

        board.set_target(&[row("DAD")]);
        assert_eq!(board.rows().len(), 1);
        assert_eq!(board.rows()[0].cells().len(), 3);
        // The surviving cells keep "PIZ" and flip on from there.
        assert_eq!(board.snapshot(), ["PIZ"]);
        run_to_settle(&mut board);
        assert_eq!(board.snapshot(), ["DAD"]);
    }

    #[test]
    fn test_frames_run_until_settled() {
        let mut board = FlapBoard::new();
        board.set_target(&[row("C"), row("A")]);

        let frames = board.frames();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], [" ", " "]);
        assert_eq!(frames[1], ["A", "A"]);
        assert_eq!(frames[3], ["C", "A"]);
        assert!(board.is_settled());
        assert_eq!(board.frames(), [["C", "A"]]);
    }

    #[test]
    fn test_font_size_follows_target() {
        let mut board = FlapBoard::new();
        board.set_target(&[DisplayRow {
            text: "X".to_string(),
            font_size_px: 31.5,
        }]);
        assert_eq!(board.rows()[0].font_size_px(), 31.5);
    }

    #[test]
    fn test_empty_board_is_settled() {
        let mut board = FlapBoard::new();
        assert!(board.is_settled());
        assert!(!board.step());
        assert_eq!(board.steps_remaining(), 0);
    }

    #[test]
    fn test_cell_accessors() {
        let cell = FlapCell::showing('Q');
        assert_eq!(cell.current(), 'Q');
        assert_eq!(cell.target(), 'Q');
        assert!(cell.is_settled());
    }
}
