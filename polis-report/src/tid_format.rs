//! Zero-padded comment display ids
//!
//! All comment ids in one report render at the same width so that tables
//! and matrix labels line up. The width is fixed when the formatter is built
//! from a comment set and never recomputed per call.

use polis_common::{Comment, Tid};
use serde::Serialize;

/// Display-id formatter bound to one comment set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TidFormatter {
    width: usize,
}

impl TidFormatter {
    /// Formatter padding to the digit count of the largest tid
    ///
    /// An empty comment set pads to width 1.
    pub fn from_comments(comments: &[Comment]) -> Self {
        let width = comments
            .iter()
            .map(|c| c.tid)
            .max()
            .map_or(1, digit_count);
        Self { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `#` followed by the tid left-padded with zeros
    ///
    /// Tids wider than the bound width are rendered in full.
    pub fn format(&self, tid: Tid) -> String {
        format!("#{:0width$}", tid, width = self.width)
    }
}

fn digit_count(mut n: Tid) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
