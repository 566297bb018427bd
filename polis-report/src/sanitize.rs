//! Correlation matrix sanitizer
//!
//! The backend occasionally emits a `"NaN"` sentinel for comments whose
//! correlation could not be computed. When that happens the corruption always
//! shows up in row 0 of the affected column, so only row 0 is scanned. This
//! is a targeted repair for that upstream quirk, not a general NaN detector:
//! a sentinel that appears elsewhere without a matching row-0 sentinel is
//! passed through unchanged.

use polis_common::{Cell, Tid};
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Matrix/id-list pair with inconsistent dimensions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeMismatch {
    #[error("matrix has {rows} rows but {ids} ids")]
    IdCount { rows: usize, ids: usize },

    #[error("matrix is not square: row {row} has {actual} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Square matrix with the ids that index its rows and columns
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CorrelationMatrix {
    pub matrix: Vec<Vec<Cell>>,
    pub ids: Vec<Tid>,
}

/// Sanitizer output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SanitizedMatrix {
    pub matrix: CorrelationMatrix,
    pub removed_ids: BTreeSet<Tid>,
}

/// Check that `matrix` is square and index-aligned with `ids`
pub fn check_shape(matrix: &[Vec<Cell>], ids: &[Tid]) -> Result<(), ShapeMismatch> {
    if matrix.len() != ids.len() {
        return Err(ShapeMismatch::IdCount {
            rows: matrix.len(),
            ids: ids.len(),
        });
    }

    let expected = matrix.len();
    match matrix.iter().position(|row| row.len() != expected) {
        Some(row) => Err(ShapeMismatch::NotSquare {
            row,
            expected,
            actual: matrix[row].len(),
        }),
        None => Ok(()),
    }
}

/// Drop every row and column whose row-0 cell is a sentinel
pub fn sanitize(matrix: Vec<Vec<Cell>>, ids: Vec<Tid>) -> Result<SanitizedMatrix, ShapeMismatch> {
    check_shape(&matrix, &ids)?;

    let keep: Vec<bool> = match matrix.first() {
        Some(first_row) => first_row.iter().map(|cell| !cell.is_sentinel()).collect(),
        None => Vec::new(),
    };

    let removed_ids: BTreeSet<Tid> = ids
        .iter()
        .zip(&keep)
        .filter(|(_, &kept)| !kept)
        .map(|(&tid, _)| tid)
        .collect();

    if removed_ids.is_empty() {
        return Ok(SanitizedMatrix {
            matrix: CorrelationMatrix { matrix, ids },
            removed_ids,
        });
    }

    let filtered: Vec<Vec<Cell>> = matrix
        .into_iter()
        .zip(&keep)
        .filter(|(_, &kept)| kept)
        .map(|(row, _)| {
            row.into_iter()
                .zip(&keep)
                .filter(|(_, &kept)| kept)
                .map(|(cell, _)| cell)
                .collect()
        })
        .collect();

    let filtered_ids: Vec<Tid> = ids
        .into_iter()
        .zip(&keep)
        .filter(|(_, &kept)| kept)
        .map(|(tid, _)| tid)
        .collect();

    Ok(SanitizedMatrix {
        matrix: CorrelationMatrix {
            matrix: filtered,
            ids: filtered_ids,
        },
        removed_ids,
    })
}
