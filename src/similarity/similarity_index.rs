use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_RECOMMENDATION_COUNT: usize = 4;

#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("Title index has {titles} entries but the matrix has {rows} rows")]
    DimensionMismatch { titles: usize, rows: usize },

    #[error("Matrix row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Matrix cell ({row}, {column}) is not a finite number")]
    NonFiniteScore { row: usize, column: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("Unknown title \"{0}\"")]
    UnknownTitle(String),
}

/// On-disk shape of the similarity artifact.
#[derive(Deserialize, Debug)]
pub struct SimilarityFile {
    pub titles: Vec<String>,
    pub scores: Vec<Vec<f64>>,
}

/// Precomputed item-item similarity scores over a fixed title index.
///
/// Row `i` and column `j` of the matrix refer to `titles[i]` and `titles[j]`.
/// Scores are stored row-major in a single buffer.
#[derive(Debug)]
pub struct SimilarityIndex {
    titles: Vec<String>,
    rows: HashMap<String, usize>,
    scores: Vec<f64>,
}

impl SimilarityIndex {
    pub fn new(titles: Vec<String>, scores: Vec<Vec<f64>>) -> Result<Self, SimilarityError> {
        let dim = titles.len();
        if scores.len() != dim {
            return Err(SimilarityError::DimensionMismatch {
                titles: dim,
                rows: scores.len(),
            });
        }

        let mut flat = Vec::with_capacity(dim * dim);
        for (row, values) in scores.into_iter().enumerate() {
            if values.len() != dim {
                return Err(SimilarityError::NotSquare {
                    row,
                    len: values.len(),
                    expected: dim,
                });
            }
            if let Some(column) = values.iter().position(|v| !v.is_finite()) {
                return Err(SimilarityError::NonFiniteScore { row, column });
            }
            flat.extend(values);
        }

        let mut rows = HashMap::with_capacity(dim);
        for (index, title) in titles.iter().enumerate() {
            rows.entry(title.clone()).or_insert(index);
        }

        Ok(SimilarityIndex {
            titles,
            rows,
            scores: flat,
        })
    }

    pub fn from_file(file: SimilarityFile) -> Result<Self, SimilarityError> {
        Self::new(file.titles, file.scores)
    }

    /// The title index, in matrix order.
    pub fn known_titles(&self) -> &[String] {
        &self.titles
    }

    pub fn contains(&self, title: &str) -> bool {
        self.rows.contains_key(title)
    }

    pub fn dimension(&self) -> usize {
        self.titles.len()
    }

    pub fn score(&self, row: usize, column: usize) -> f64 {
        self.scores[row * self.dimension() + column]
    }

    fn row(&self, row: usize) -> &[f64] {
        let dim = self.dimension();
        &self.scores[row * dim..(row + 1) * dim]
    }

    /// Titles most similar to `title`, best first.
    ///
    /// The row is ranked by descending score with a stable sort, so equal
    /// scores keep the index order. The first ranked entry is dropped because
    /// it is expected to be `title` itself. The skip is positional: when the
    /// self score is not the strict maximum of the row, another title is
    /// dropped instead and `title` may show up in the result.
    pub fn recommend(&self, title: &str, count: usize) -> Result<Vec<String>, RecommendError> {
        let row = *self
            .rows
            .get(title)
            .ok_or_else(|| RecommendError::UnknownTitle(title.to_owned()))?;

        let mut ranked: Vec<(usize, f64)> = self.row(row).iter().copied().enumerate().collect();
        // Scores are validated finite at construction.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(ranked
            .into_iter()
            .skip(1)
            .take(count)
            .map(|(column, _)| self.titles[column].clone())
            .collect())
    }
}
