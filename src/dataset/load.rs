use super::{Dataset, Problem};
use anyhow::{bail, Result};
use std::num::NonZeroUsize;
use tracing::{error, info, warn};

pub fn log_problems(problems: &[Problem]) {
    if problems.is_empty() {
        return;
    }
    info!("Found {} problems:", problems.len());
    for problem in problems.iter() {
        if problem.is_fatal() {
            error!("- {:?}", problem);
        } else {
            warn!("- {:?}", problem);
        }
    }
}

/// Loads the dataset from `path`, logging every problem found on the way.
///
/// Fails if any artifact is missing or malformed, the server must not start
/// without data.
pub fn load_dataset<P: AsRef<std::path::Path>>(
    path: P,
    cache_capacity: NonZeroUsize,
) -> Result<Dataset> {
    info!("Loading dataset from {}...", path.as_ref().display());
    let build_result = Dataset::build(path.as_ref(), cache_capacity);
    let problems = build_result.problems;
    let dataset = build_result.dataset;

    log_problems(&problems);

    match (&dataset, problems.is_empty()) {
        (Some(_), true) => info!("Dataset checked, no issues found."),
        (Some(_), false) => info!(
            "Dataset was built, but check the {} non-fatal issues above.",
            problems.len()
        ),
        (None, _) => {
            error!(
                "Check the {} problems above, the dataset could not be loaded.",
                problems.len()
            )
        }
    }
    if let Some(dataset) = dataset {
        info!(
            "Dataset has:\n{} books\n{} popular books\n{} known titles",
            dataset.catalog.get_books_count(),
            dataset.catalog.get_popular_count(),
            dataset.similarity.dimension()
        );
        return Ok(dataset);
    }

    match problems.iter().find(|p| p.is_fatal()) {
        Some(problem) => bail!("Could not load dataset: {:?}", problem),
        None => bail!("Could not load dataset"),
    }
}
