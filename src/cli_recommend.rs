use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use bookrec_server::catalog::DEFAULT_LOOKUP_CACHE_CAPACITY;
use bookrec_server::dataset::load_dataset;
use bookrec_server::recommender::Recommender;
use bookrec_server::similarity::{RecommendError, DEFAULT_RECOMMENDATION_COUNT};
use bookrec_server::BookRecord;

fn parse_root_dir(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s).canonicalize()?;
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory containing the exported dataset.
    #[clap(value_parser = parse_root_dir)]
    pub data_dir: PathBuf,

    /// How many recommendations to print for each title.
    #[clap(short, long, default_value_t = DEFAULT_RECOMMENDATION_COUNT)]
    pub count: usize,
}

fn print_book(position: usize, book: &BookRecord) {
    println!(
        "{}. {} - {} ({}, {}) ISBN {}",
        position, book.title, book.author, book.publisher, book.year, book.isbn,
    );
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    println!(
        "Cli Recommend loading dataset at {}...",
        cli_args.data_dir.display()
    );

    let cache_capacity = NonZeroUsize::new(DEFAULT_LOOKUP_CACHE_CAPACITY)
        .context("Lookup cache capacity must be greater than zero")?;
    let dataset = load_dataset(&cli_args.data_dir, cache_capacity)?;
    let recommender = Recommender::from_dataset(&dataset);
    println!("Done!");

    loop {
        println!("Please enter a book title:");

        let mut user_input = String::new();
        let read = io::stdin()
            .read_line(&mut user_input)
            .context("Failed to read line")?;
        if read == 0 {
            return Ok(());
        }

        let user_input = user_input.trim();
        if user_input.is_empty() {
            continue;
        }

        match recommender.resolve(user_input, cli_args.count) {
            Ok(books) if books.is_empty() => {
                println!("No catalog records for the titles similar to \"{}\".", user_input)
            }
            Ok(books) => {
                println!("Books similar to \"{}\":\n", user_input);
                for (index, book) in books.iter().enumerate() {
                    print_book(index + 1, book);
                }
            }
            Err(RecommendError::UnknownTitle(title)) => {
                println!("\"{}\" is not a known title.", title)
            }
        }
        println!("\n");
    }
}
