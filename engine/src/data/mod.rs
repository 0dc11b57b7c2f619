// Candle input: file loading and timeframe resampling
pub mod csv_parser;
pub mod resampler;
