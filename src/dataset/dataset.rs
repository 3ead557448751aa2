use crate::catalog::{BookRecord, Catalog, PopularEntry};
use crate::similarity::{SimilarityError, SimilarityFile, SimilarityIndex};
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const BOOKS_FILE_NAME: &str = "books.json";
pub const POPULAR_FILE_NAME: &str = "popular.json";
pub const SIMILARITY_FILE_NAME: &str = "similarity.json";

/// Relative difference above which two mirrored matrix cells are reported.
#[cfg(not(feature = "no_checks"))]
const SYMMETRY_TOLERANCE: f64 = 1e-9;

#[derive(Debug)]
pub struct DataFiles {
    pub books: PathBuf,
    pub popular: PathBuf,
    pub similarity: PathBuf,
}

impl DataFiles {
    pub fn from_root(root: &Path) -> Result<DataFiles> {
        if !root.is_dir() {
            bail!("{} is not a valid directory.", root.display());
        }

        let books = root.join(BOOKS_FILE_NAME);
        let popular = root.join(POPULAR_FILE_NAME);
        let similarity = root.join(SIMILARITY_FILE_NAME);

        for file in [&books, &popular, &similarity] {
            if !file.is_file() {
                bail!("No {} in {}", file.display(), root.display());
            }
        }

        Ok(DataFiles {
            books,
            popular,
            similarity,
        })
    }
}

#[derive(Debug)]
pub enum Problem {
    InvalidDataDir(String),
    UnreadableArtifact { path: PathBuf, reason: String },
    InvalidSimilarityMatrix(SimilarityError),
    DuplicateCatalogTitle(String),
    DuplicateKnownTitle(String),
    KnownTitleNotInCatalog(String),
    PopularTitleNotInCatalog(String),
    AsymmetricScores { pairs: usize },
}

impl Problem {
    /// Fatal problems prevent the dataset from being built.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Problem::InvalidDataDir(_)
                | Problem::UnreadableArtifact { .. }
                | Problem::InvalidSimilarityMatrix(_)
        )
    }
}

pub struct DatasetBuildResult {
    pub dataset: Option<Dataset>,
    pub problems: Vec<Problem>,
}

/// Everything the server reads at request time, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub catalog: Arc<Catalog>,
    pub similarity: Arc<SimilarityIndex>,
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file_text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&file_text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn duplicates<'a>(titles: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = vec![];
    for title in titles {
        if !seen.insert(title) && reported.insert(title) {
            out.push(title.to_owned());
        }
    }
    out
}

#[cfg(not(feature = "no_checks"))]
fn count_asymmetric_pairs(similarity: &SimilarityIndex) -> usize {
    let dim = similarity.dimension();
    (0..dim)
        .into_par_iter()
        .map(|row| {
            ((row + 1)..dim)
                .filter(|&column| {
                    let a = similarity.score(row, column);
                    let b = similarity.score(column, row);
                    (a - b).abs() > SYMMETRY_TOLERANCE * a.abs().max(b.abs()).max(1.0)
                })
                .count()
        })
        .sum()
}

impl Dataset {
    pub fn new(catalog: Catalog, similarity: SimilarityIndex) -> Dataset {
        Dataset {
            catalog: Arc::new(catalog),
            similarity: Arc::new(similarity),
        }
    }

    pub fn build(root_dir: &Path, cache_capacity: NonZeroUsize) -> DatasetBuildResult {
        let mut problems = vec![];

        let files = match DataFiles::from_root(root_dir) {
            Ok(files) => files,
            Err(err) => {
                problems.push(Problem::InvalidDataDir(err.to_string()));
                return DatasetBuildResult {
                    dataset: None,
                    problems,
                };
            }
        };

        let books: Option<Vec<BookRecord>> = Self::read_or_report(&files.books, &mut problems);
        let popular: Option<Vec<PopularEntry>> =
            Self::read_or_report(&files.popular, &mut problems);
        let similarity_file: Option<SimilarityFile> =
            Self::read_or_report(&files.similarity, &mut problems);

        let similarity = similarity_file.and_then(|file| match SimilarityIndex::from_file(file) {
            Ok(index) => Some(index),
            Err(err) => {
                problems.push(Problem::InvalidSimilarityMatrix(err));
                None
            }
        });

        let (books, popular, similarity) = match (books, popular, similarity) {
            (Some(books), Some(popular), Some(similarity)) => (books, popular, similarity),
            _ => {
                return DatasetBuildResult {
                    dataset: None,
                    problems,
                }
            }
        };

        problems.extend(
            duplicates(books.iter().map(|b| b.title.as_str()))
                .into_iter()
                .map(Problem::DuplicateCatalogTitle),
        );
        problems.extend(
            duplicates(similarity.known_titles().iter().map(String::as_str))
                .into_iter()
                .map(Problem::DuplicateKnownTitle),
        );

        let catalog = Catalog::new(books, popular, cache_capacity);

        let mut missing: Vec<Problem> = similarity
            .known_titles()
            .par_iter()
            .filter(|title| !catalog.contains(title))
            .map(|title| Problem::KnownTitleNotInCatalog(title.clone()))
            .collect();
        problems.append(&mut missing);

        problems.extend(
            catalog
                .popular_list()
                .iter()
                .filter(|entry| !catalog.contains(&entry.book.title))
                .map(|entry| Problem::PopularTitleNotInCatalog(entry.book.title.clone())),
        );

        #[cfg(not(feature = "no_checks"))]
        {
            let pairs = count_asymmetric_pairs(&similarity);
            if pairs > 0 {
                problems.push(Problem::AsymmetricScores { pairs });
            }
        }

        DatasetBuildResult {
            dataset: Some(Dataset::new(catalog, similarity)),
            problems,
        }
    }

    fn read_or_report<T: DeserializeOwned>(path: &Path, problems: &mut Vec<Problem>) -> Option<T> {
        match read_artifact(path) {
            Ok(value) => Some(value),
            Err(err) => {
                problems.push(Problem::UnreadableArtifact {
                    path: path.to_owned(),
                    reason: format!("{:#}", err),
                });
                None
            }
        }
    }
}
