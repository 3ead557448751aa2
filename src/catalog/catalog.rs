use super::{BookRecord, PopularEntry};
use lru::LruCache;
use serde::Serialize;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const DEFAULT_LOOKUP_CACHE_CAPACITY: usize = 1000;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Read-only book catalog with the popular list.
///
/// Lookups by title are memoized in a bounded LRU cache. Two threads missing
/// the same title at the same time both compute the record and the second
/// insertion overwrites the first with an identical value.
#[derive(Debug)]
pub struct Catalog {
    books: Vec<BookRecord>,
    first_by_title: HashMap<String, usize>,
    popular: Vec<PopularEntry>,
    lookup_cache: Mutex<LruCache<String, Option<BookRecord>>>,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl Catalog {
    pub fn new(
        books: Vec<BookRecord>,
        popular: Vec<PopularEntry>,
        cache_capacity: NonZeroUsize,
    ) -> Catalog {
        let mut first_by_title = HashMap::with_capacity(books.len());
        for (index, book) in books.iter().enumerate() {
            first_by_title.entry(book.title.clone()).or_insert(index);
        }
        Catalog {
            books,
            first_by_title,
            popular,
            lookup_cache: Mutex::new(LruCache::new(cache_capacity)),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
        }
    }

    /// Returns the first catalog record whose title matches exactly.
    pub fn lookup(&self, title: &str) -> Option<BookRecord> {
        if let Some(cached) = self.cache().get(title) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }
        self.cache_misses.fetch_add(1, Ordering::Relaxed);

        let found = self
            .first_by_title
            .get(title)
            .map(|&index| self.books[index].clone());
        self.cache().put(title.to_owned(), found.clone());
        found
    }

    pub fn contains(&self, title: &str) -> bool {
        self.first_by_title.contains_key(title)
    }

    /// The popular list, in stored order.
    pub fn popular_list(&self) -> &[PopularEntry] {
        &self.popular
    }

    pub fn get_books_count(&self) -> usize {
        self.books.len()
    }

    pub fn get_popular_count(&self) -> usize {
        self.popular.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.cache();
        CacheStats {
            hits: self.cache_hits.load(Ordering::Relaxed),
            misses: self.cache_misses.load(Ordering::Relaxed),
            len: cache.len(),
            capacity: cache.cap().get(),
        }
    }

    // The cache holds no invariant a panicking holder could break.
    fn cache(&self) -> MutexGuard<'_, LruCache<String, Option<BookRecord>>> {
        self.lookup_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub fn dummy() -> Catalog {
        let book = |title: &str, isbn: &str| BookRecord {
            title: title.to_owned(),
            author: format!("Author of {}", title),
            year: "2000".to_owned(),
            publisher: "Dummy Press".to_owned(),
            image_url: format!("http://images.example.com/{}.jpg", isbn),
            isbn: isbn.to_owned(),
        };
        let books = vec![book("A", "0001"), book("B", "0002"), book("A", "0003")];
        let popular = vec![PopularEntry {
            book: books[1].clone(),
            num_ratings: 10,
            avg_rating: 4.5,
        }];
        Catalog::new(
            books,
            popular,
            NonZeroUsize::new(DEFAULT_LOOKUP_CACHE_CAPACITY).unwrap(),
        )
    }
}
