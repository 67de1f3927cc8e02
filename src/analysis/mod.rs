pub mod client;
pub mod normalize;

pub use client::{FoodAnalyzer, VisionAnalyzer};
pub use normalize::{normalize, NormalizedAnalysis};
