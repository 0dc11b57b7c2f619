// Engine library root
pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;

pub use analysis::{AnalysisRequest, Analyzer};
pub use config::AnalysisSettings;
pub use error::EngineError;
