//! Font sizing for split-flap rows.
//!
//! A row's font size is chosen so that its characters fill the container
//! width. Each flap cell is roughly `char_width_factor` times as wide as its
//! font size (gap included), and the result is clamped so very narrow
//! containers stay legible and very short words don't blow up.

use serde::{Deserialize, Serialize};

/// Constants that drive [`SizingProfile::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingProfile {
    /// Horizontal padding subtracted from the container width.
    pub padding_px: f64,
    /// Cell width as a multiple of the font size.
    pub char_width_factor: f64,
    /// Smallest font size ever returned.
    pub min_size_px: f64,
    /// Largest font size ever returned.
    pub max_size_px: f64,
}

impl SizingProfile {
    /// One row per word.
    pub const PER_WORD: Self = Self {
        padding_px: 32.0,
        char_width_factor: 1.35,
        min_size_px: 18.0,
        max_size_px: 48.0,
    };

    /// The whole title on a single row.
    pub const WHOLE_TITLE: Self = Self {
        padding_px: 40.0,
        char_width_factor: 1.3,
        min_size_px: 16.0,
        max_size_px: 40.0,
    };

    /// Font size in pixels for `char_count` characters in a container
    /// `container_width_px` wide.
    ///
    /// Total over its inputs: a zero `char_count` is sized as one character,
    /// and zero, negative or NaN widths land on the lower bound. Swapped
    /// bounds are put back in order rather than trusted.
    #[must_use]
    pub fn compute(&self, container_width_px: f64, char_count: usize) -> f64 {
        let lower = self.min_size_px.min(self.max_size_px);
        let upper = self.min_size_px.max(self.max_size_px);

        let chars = char_count.max(1) as f64;
        let available = container_width_px - self.padding_px;
        let raw = available / (chars * self.char_width_factor);
        if raw.is_nan() {
            return lower;
        }
        // max/min instead of clamp: clamp panics on unordered or NaN bounds.
        raw.max(lower).min(upper)
    }
}

impl Default for SizingProfile {
    fn default() -> Self {
        Self::PER_WORD
    }
}

/// Font size for one row using the per-word profile.
///
/// ```
/// use splitflap::sizing::compute_font_size;
///
/// let size = compute_font_size(200.0, 4);
/// assert!((size - 31.11).abs() < 0.01);
/// assert_eq!(compute_font_size(50.0, 10), 18.0);
/// ```
#[must_use]
pub fn compute_font_size(container_width_px: f64, char_count: usize) -> f64 {
    SizingProfile::PER_WORD.compute(container_width_px, char_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclamped_size() {
        let size = compute_font_size(200.0, 4);
        let expected = 168.0 / (4.0 * 1.35);
        assert!((size - expected).abs() < 1e-9);
        assert!((size - 31.11).abs() < 0.01);
    }

    #[test]
    fn test_clamped_to_minimum() {
        assert_eq!(compute_font_size(50.0, 10), 18.0);
    }

    #[test]
    fn test_clamped_to_maximum() {
        assert_eq!(compute_font_size(2000.0, 2), 48.0);
    }

    #[test]
    fn test_zero_char_count_treated_as_one() {
        assert_eq!(compute_font_size(100.0, 0), compute_font_size(100.0, 1));
    }

    #[test]
    fn test_degenerate_widths() {
        assert_eq!(compute_font_size(0.0, 5), 18.0);
        assert_eq!(compute_font_size(-300.0, 5), 18.0);
        assert_eq!(compute_font_size(f64::NAN, 5), 18.0);
        assert_eq!(compute_font_size(f64::INFINITY, 5), 48.0);
    }

    #[test]
    fn test_always_within_bounds() {
        for width in (0..=2400).step_by(7) {
            for chars in 0..=40 {
                let size = compute_font_size(f64::from(width), chars);
                assert!(
                    (18.0..=48.0).contains(&size),
                    "width {width} chars {chars} gave {size}"
                );
            }
        }
    }

    #[test]
    fn test_longer_words_never_get_larger() {
        let mut previous = f64::MAX;
        for chars in 1..=30 {
            let size = compute_font_size(640.0, chars);
            assert!(size <= previous);
            previous = size;
        }
    }

    #[test]
    fn test_whole_title_profile() {
        let profile = SizingProfile::WHOLE_TITLE;
        // "PRODUCT ENGINEER" is 16 characters.
        let size = profile.compute(400.0, 16);
        let expected = 360.0 / (16.0 * 1.3);
        assert!((size - expected).abs() < 1e-9);
        assert_eq!(profile.compute(10.0, 16), 16.0);
        assert_eq!(profile.compute(5000.0, 3), 40.0);
    }

    #[test]
    fn test_swapped_bounds_do_not_panic() {
        let profile = SizingProfile {
            min_size_px: 45.0,
            ..SizingProfile::WHOLE_TITLE
        };
        assert_eq!(profile.compute(480.0, 10), 40.0);
        assert_eq!(profile.compute(10.0, 10), 40.0);
        assert_eq!(profile.compute(5000.0, 1), 45.0);
        assert_eq!(profile.compute(f64::NAN, 3), 40.0);
    }

    #[test]
    fn test_nan_bounds_do_not_panic() {
        let profile = SizingProfile {
            max_size_px: f64::NAN,
            ..SizingProfile::PER_WORD
        };
        let size = profile.compute(200.0, 4);
        assert!(size.is_finite());
    }

    #[test]
    fn test_default_profile_is_per_word() {
        assert_eq!(SizingProfile::default(), SizingProfile::PER_WORD);
    }
}
