//! Local image analysis: color classification and texture/style tagging.
//!
//! Both analyzers consume the same `PixelGrid` independently and are pure.

pub mod color;
pub mod texture;

pub use color::{
    classifier_for, ColorAnalysis, ColorClassifier, HueBucketClassifier,
    NearestReferenceClassifier,
};
pub use texture::{TextureAnalyzer, TextureStats, TextureTags};
