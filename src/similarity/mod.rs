mod similarity_index;

pub use similarity_index::{
    RecommendError, SimilarityError, SimilarityFile, SimilarityIndex,
    DEFAULT_RECOMMENDATION_COUNT,
};
