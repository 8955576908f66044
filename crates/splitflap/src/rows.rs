//! Turning a title into sized display rows.

use serde::{Deserialize, Serialize};

use crate::sizing::SizingProfile;
use crate::tokenizer::{split_title, whole_title};

/// How a title is laid out on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// One row per word, each sized to its own length.
    #[default]
    PerWord,
    /// The whole title on a single row.
    WholeTitle,
}

impl LayoutMode {
    /// The sizing constants this layout was tuned with.
    #[must_use]
    pub fn profile(self) -> SizingProfile {
        match self {
            Self::PerWord => SizingProfile::PER_WORD,
            Self::WholeTitle => SizingProfile::WHOLE_TITLE,
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerWord => write!(f, "per_word"),
            Self::WholeTitle => write!(f, "whole_title"),
        }
    }
}

/// One rendered line of flap cells and the font size to draw it at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    /// Uppercased text, one flap cell per character.
    pub text: String,
    /// Font size in pixels.
    pub font_size_px: f64,
}

impl DisplayRow {
    /// Number of flap cells in the row.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Rows for `title` in a container `container_width_px` wide.
///
/// A blank title yields no rows.
#[must_use]
pub fn assemble_rows(
    title: &str,
    container_width_px: f64,
    mode: LayoutMode,
    profile: &SizingProfile,
) -> Vec<DisplayRow> {
    match mode {
        LayoutMode::PerWord => split_title(title)
            .into_iter()
            .map(|word| DisplayRow {
                font_size_px: profile.compute(container_width_px, word.char_count()),
                text: word.to_string(),
            })
            .collect(),
        LayoutMode::WholeTitle => whole_title(title)
            .map(|text| {
                let font_size_px = profile.compute(container_width_px, text.chars().count());
                vec![DisplayRow { text, font_size_px }]
            })
            .unwrap_or_default(),
    }
}
