#[allow(clippy::module_inception)]
mod dataset;
mod load;

pub use dataset::{
    DataFiles, Dataset, DatasetBuildResult, Problem, BOOKS_FILE_NAME, POPULAR_FILE_NAME,
    SIMILARITY_FILE_NAME,
};
pub use load::{load_dataset, log_problems};
