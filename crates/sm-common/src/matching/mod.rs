pub mod matcher;
pub mod ranker;
pub mod scoring;
pub mod similarity;
