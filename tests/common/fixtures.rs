//! Test fixture creation for the dataset directory

use super::constants::*;
use anyhow::Result;
use bookrec_server::dataset::{BOOKS_FILE_NAME, POPULAR_FILE_NAME, SIMILARITY_FILE_NAME};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn book(
    title: &str,
    author: &str,
    year: serde_json::Value,
    publisher: &str,
    isbn: &str,
) -> serde_json::Value {
    json!({
        "Book-Title": title,
        "Book-Author": author,
        "Year-Of-Publication": year,
        "Publisher": publisher,
        "Image-URL-M": format!("http://images.example.com/{}.jpg", isbn),
        "ISBN": isbn,
    })
}

/// Creates a temporary dataset directory with 5 catalog rows (two editions
/// of The Hobbit), 2 popular entries and a 5x5 similarity matrix whose
/// "Ghost Title" has no catalog record.
///
/// Returns (temp_dir, data_dir, static_dir)
pub fn create_test_dataset() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;
    let data_dir = dir.path().join("data");
    let static_dir = dir.path().join("static");
    fs::create_dir_all(&data_dir)?;
    fs::create_dir_all(&static_dir)?;

    let books = json!([
        book(
            THE_HOBBIT,
            THE_HOBBIT_AUTHOR,
            json!(1937),
            THE_HOBBIT_PUBLISHER,
            THE_HOBBIT_ISBN
        ),
        book(DUNE, DUNE_AUTHOR, json!("1965"), "Chilton Books", "0441172717"),
        book(NEUROMANCER, "William Gibson", json!(1984), "Ace", "0441569595"),
        book(
            THE_HOBBIT,
            THE_HOBBIT_AUTHOR,
            json!(1986),
            "Del Rey",
            THE_HOBBIT_SECOND_ISBN
        ),
        book(EMMA, "Jane Austen", json!(1815), "Penguin Classics", "0141439580"),
    ]);

    let mut hobbit = book(
        THE_HOBBIT,
        THE_HOBBIT_AUTHOR,
        json!(1937),
        THE_HOBBIT_PUBLISHER,
        THE_HOBBIT_ISBN,
    );
    hobbit["num_ratings"] = json!(120);
    hobbit["avg_rating"] = json!(8.91234);
    let mut dune = book(DUNE, DUNE_AUTHOR, json!("1965"), "Chilton Books", "0441172717");
    dune["num_ratings"] = json!(90);
    dune["avg_rating"] = json!(8.5);
    let popular = json!([hobbit, dune]);

    let similarity = json!({
        "titles": [DUNE, EMMA, NEUROMANCER, THE_HOBBIT, GHOST_TITLE],
        "scores": [
            [1.0, 0.1, 0.9, 0.4, 0.6],
            [0.1, 1.0, 0.05, 0.3, 0.2],
            [0.9, 0.05, 1.0, 0.35, 0.7],
            [0.4, 0.3, 0.35, 1.0, 0.8],
            [0.6, 0.2, 0.7, 0.8, 1.0],
        ],
    });

    fs::write(data_dir.join(BOOKS_FILE_NAME), serde_json::to_string(&books)?)?;
    fs::write(data_dir.join(POPULAR_FILE_NAME), serde_json::to_string(&popular)?)?;
    fs::write(
        data_dir.join(SIMILARITY_FILE_NAME),
        serde_json::to_string(&similarity)?,
    )?;
    fs::write(static_dir.join(STATIC_CSS_NAME), STATIC_CSS_CONTENT)?;

    Ok((dir, data_dir, static_dir))
}
