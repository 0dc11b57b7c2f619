// Data models and helpers shared between the analysis engine and its callers.
pub mod models;
pub mod utils;
