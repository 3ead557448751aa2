//! HTML pages rendered with askama templates.

use crate::catalog::{BookRecord, PopularEntry};
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

const FALLBACK_ERROR_PAGE: &str =
    "<!DOCTYPE html><html><body><h1>Internal server error</h1></body></html>";

pub const MESSAGE_EMPTY_INPUT: &str = "Please enter a book name";
pub const MESSAGE_UNKNOWN_TITLE: &str = "Book not found in database";
pub const MESSAGE_BOOK_NOT_FOUND: &str = "Book details not found";
pub const MESSAGE_PAGE_NOT_FOUND: &str = "Page not found";
pub const MESSAGE_INTERNAL_ERROR: &str = "Internal server error";

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PurchaseLink {
    pub store: &'static str,
    pub url: String,
}

/// Retailer search links for a book, keyed by its ISBN.
pub fn purchase_links(isbn: &str) -> Vec<PurchaseLink> {
    let isbn = urlencoding::encode(isbn);
    vec![
        PurchaseLink {
            store: "Amazon",
            url: format!("https://amazon.com/s?k={}", isbn),
        },
        PurchaseLink {
            store: "eBay",
            url: format!("https://www.ebay.com/sch/i.html?_nkw={}", isbn),
        },
    ]
}

pub fn book_details_url(title: &str) -> String {
    format!("/book/{}", urlencoding::encode(title))
}

pub struct BookCard {
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub details_url: String,
}

impl From<&BookRecord> for BookCard {
    fn from(book: &BookRecord) -> Self {
        BookCard {
            title: book.title.clone(),
            author: book.author.clone(),
            image_url: book.image_url.clone(),
            details_url: book_details_url(&book.title),
        }
    }
}

pub struct PopularCard {
    pub card: BookCard,
    pub num_ratings: u64,
    pub avg_rating: String,
}

impl From<&PopularEntry> for PopularCard {
    fn from(entry: &PopularEntry) -> Self {
        PopularCard {
            card: BookCard::from(&entry.book),
            num_ratings: entry.num_ratings,
            avg_rating: format!("{:.2}", entry.avg_rating),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub books: Vec<PopularCard>,
}

#[derive(Template)]
#[template(path = "recommend.html")]
pub struct RecommendPage<'a> {
    pub titles: &'a [String],
    pub query: String,
    pub results: Vec<BookCard>,
    pub searched: bool,
}

#[derive(Template)]
#[template(path = "book_details.html")]
pub struct BookDetailsPage {
    pub book: BookRecord,
    pub purchase_links: Vec<PurchaseLink>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub message: &'a str,
}

/// Renders `page`, falling back to a static 500 page if the template fails.
pub fn render<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!("Failed to render page: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(FALLBACK_ERROR_PAGE),
            )
                .into_response()
        }
    }
}

/// Request failures surfaced to the browser as the uniform error page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{}", MESSAGE_INTERNAL_ERROR)]
    Internal,
}

impl PageError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::Validation(_) => StatusCode::BAD_REQUEST,
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            PageError::Validation(message) | PageError::NotFound(message) => message,
            PageError::Internal => MESSAGE_INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        render(
            self.status(),
            &ErrorPage {
                message: self.message(),
            },
        )
    }
}
