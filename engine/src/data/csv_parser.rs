use crate::error::EngineError;
use anyhow::{anyhow, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Field parsing for candle files: numbers with '.' decimals, timestamps as
// epoch milliseconds, RFC 3339 or a bare YYYY-MM-DD date (midnight UTC).
pub mod candle_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate};
    use std::str::FromStr;

    pub fn parse_decimal(s: &str) -> Result<f64> {
        let value = f64::from_str(s.trim()).map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))?;
        if !value.is_finite() {
            return Err(anyhow!("Non-finite value '{}'", s));
        }
        Ok(value)
    }

    pub fn parse_time_millis(s: &str) -> Result<i64> {
        let s = s.trim();
        if let Ok(millis) = s.parse::<i64>() {
            return Ok(millis);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.timestamp_millis());
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow!("Failed to parse time '{}': {}", s, e))?;
        date.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .ok_or_else(|| anyhow!("Failed to parse time '{}'", s))
    }

}

pub struct CandleCsvParser;

impl CandleCsvParser {
    // CSV Header: time,open,high,low,close,volume  (volume optional)
    // Example Row: 1704067200000,42283.5,42554.0,42180.1,42475.2,1532.7
    pub fn load_candles_from_csv(file_path: impl AsRef<Path>) -> Result<Vec<Candle>, EngineError> {
        let file = File::open(file_path.as_ref())?;
        Self::load_candles(BufReader::new(file))
    }

    /// Parses candles from any reader, then orders them by time and drops
    /// duplicate timestamps.
    pub fn load_candles<R: Read>(reader: R) -> Result<Vec<Candle>, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut candles = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;
            let candle = Self::parse_record(&record, &headers, line)
                .map_err(|e| EngineError::CsvDataFormatError(format!("{:#}", e)))?;
            candles.push(candle);
        }

        let parsed = candles.len();
        candles.sort_by_key(|c| c.time);
        candles.dedup_by_key(|c| c.time);
        tracing::debug!(parsed, kept = candles.len(), "Loaded candles from CSV");
        Ok(candles)
    }

    fn parse_record(record: &StringRecord, headers: &StringRecord, line: usize) -> Result<Candle> {
        let time = candle_format::parse_time_millis(Self::required(record, headers, "time", line)?)
            .map_err(|e| anyhow!("Error parsing 'time' at line {}: {}", line, e))?;
        let volume = match Self::get_field(record, headers, "volume") {
            Some(raw) if !raw.is_empty() => candle_format::parse_decimal(raw)
                .map_err(|e| anyhow!("Error parsing 'volume' at line {}: {}", line, e))?,
            _ => 0.0,
        };

        Ok(Candle {
            time,
            open: Self::price(record, headers, "open", line)?,
            high: Self::price(record, headers, "high", line)?,
            low: Self::price(record, headers, "low", line)?,
            close: Self::price(record, headers, "close", line)?,
            volume,
        })
    }

    fn price(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
        candle_format::parse_decimal(Self::required(record, headers, name, line)?)
            .map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", name, line, e))
    }

    fn required<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        Self::get_field(record, headers, name)
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }

    // Looks a field up by header name so column order does not matter.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}
