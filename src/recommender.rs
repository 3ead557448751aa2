//! Resolves similar titles into full catalog records.

use crate::catalog::{BookRecord, Catalog};
use crate::dataset::Dataset;
use crate::similarity::{RecommendError, SimilarityIndex};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Default, PartialEq)]
pub struct Resolution {
    pub books: Vec<BookRecord>,
    /// Recommended titles with no catalog record, skipped.
    pub unresolved: Vec<String>,
}

#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityIndex>,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, similarity: Arc<SimilarityIndex>) -> Recommender {
        Recommender {
            catalog,
            similarity,
        }
    }

    pub fn from_dataset(dataset: &Dataset) -> Recommender {
        Recommender::new(dataset.catalog.clone(), dataset.similarity.clone())
    }

    pub fn resolve(&self, title: &str, count: usize) -> Result<Vec<BookRecord>, RecommendError> {
        Ok(self.resolve_detailed(title, count)?.books)
    }

    /// Like [`Recommender::resolve`], also reporting which titles were skipped.
    pub fn resolve_detailed(
        &self,
        title: &str,
        count: usize,
    ) -> Result<Resolution, RecommendError> {
        let mut resolution = Resolution::default();
        for recommended in self.similarity.recommend(title, count)? {
            match self.catalog.lookup(&recommended) {
                Some(book) => resolution.books.push(book),
                None => {
                    warn!(
                        "Skipping recommendation \"{}\" for \"{}\": no catalog record",
                        recommended, title
                    );
                    resolution.unresolved.push(recommended);
                }
            }
        }
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn book(title: &str) -> BookRecord {
        BookRecord {
            title: title.to_owned(),
            author: format!("{} author", title),
            year: "1990".to_owned(),
            publisher: "Pub".to_owned(),
            image_url: String::new(),
            isbn: format!("isbn-{}", title),
        }
    }

    fn recommender() -> Recommender {
        let catalog = Catalog::new(
            vec![book("A"), book("B"), book("D")],
            vec![],
            NonZeroUsize::new(8).unwrap(),
        );
        let similarity = SimilarityIndex::new(
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            vec![
                vec![1.0, 0.9, 0.8, 0.1],
                vec![0.9, 1.0, 0.3, 0.5],
                vec![0.8, 0.3, 1.0, 0.2],
                vec![0.1, 0.5, 0.2, 1.0],
            ],
        )
        .unwrap();
        Recommender::new(Arc::new(catalog), Arc::new(similarity))
    }

    #[test]
    fn resolves_records_in_rank_order() {
        let books = recommender().resolve("B", 2).unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "D"]);
        assert_eq!(books[0].isbn, "isbn-A");
    }

    #[test]
    fn skips_titles_missing_from_catalog() {
        let resolution = recommender().resolve_detailed("A", 3).unwrap();
        let titles: Vec<&str> = resolution.books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "D"]);
        assert_eq!(resolution.unresolved, vec!["C"]);
    }

    #[test]
    fn propagates_unknown_title() {
        assert_eq!(
            recommender().resolve("Nope", 4),
            Err(RecommendError::UnknownTitle("Nope".to_owned()))
        );
    }
}
