//! Comparison of surfaces

mod similarity;

pub use similarity::similarity_index;
