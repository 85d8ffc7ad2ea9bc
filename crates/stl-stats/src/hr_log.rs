//! Parsing of the per-track embedded heart-rate log.
//!
//! Some recorders attach a single text blob to the whole track instead of an
//! HR field on every point. Each line holds `<bpm> <yyyy-MM-ddTHH:mm:ssZ>`.

use serde::Serialize;
use thiserror::Error;
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};
use tracing::warn;

use crate::model::unix_millis;

const LOG_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// One heart-rate reading taken from the embedded log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HrLogSample {
    pub time_ms: i64,
    pub bpm: f64,
}

/// Result of parsing a whole log. Lines that fail are skipped; `had_errors`
/// records that at least one did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedHrLog {
    pub samples: Vec<HrLogSample>,
    pub had_errors: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum HrLogLineError {
    #[error("expected \"<bpm> <time>\", found {0:?}")]
    MissingField(String),
    #[error("invalid bpm value {0:?}")]
    InvalidBpm(String),
    #[error("invalid time {0:?}")]
    InvalidTime(String),
}

/// Parses a single non-empty log line.
pub fn parse_line(line: &str) -> Result<HrLogSample, HrLogLineError> {
    let mut fields = line.split_whitespace();
    let (Some(bpm), Some(time), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(HrLogLineError::MissingField(line.to_string()));
    };

    let bpm: f64 = bpm
        .parse()
        .map_err(|_| HrLogLineError::InvalidBpm(bpm.to_string()))?;
    let time = PrimitiveDateTime::parse(time, LOG_TIME_FORMAT)
        .map_err(|_| HrLogLineError::InvalidTime(time.to_string()))?
        .assume_utc();

    Ok(HrLogSample {
        time_ms: unix_millis(time),
        bpm,
    })
}

/// Parses every line of `text`. Blank lines are ignored.
///
/// Samples are returned in time order; lines with equal times keep their
/// order in the log.
pub fn parse_hr_log(text: &str) -> ParsedHrLog {
    let mut parsed = ParsedHrLog::default();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(sample) => parsed.samples.push(sample),
            Err(e) => {
                warn!(line = index + 1, "skipping heart-rate log line: {e}");
                parsed.had_errors = true;
            }
        }
    }

    parsed.samples.sort_by_key(|s| s.time_ms);
    parsed
}
