//! Compact sequence codec used by split-pipe reports to embed point arrays.
//!
//! Numeric sequences are comma-separated tokens, each either a bare number or
//! `value x count` (written `2x3`) meaning `value` repeated `count` times.
//! Label sequences are plain comma-joined category ids.

use thiserror::Error;

pub const TOKEN_SEPARATOR: char = ',';
pub const REPEAT_DELIMITER: char = 'x';
/// Upper bound on the values one numeric sequence may expand to.
pub const MAX_DECODED_VALUES: usize = 1 << 26;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid numeric value {value:?} in token {token:?}")]
    InvalidNumber { token: String, value: String },
    #[error("non-finite numeric value in token {token:?}")]
    NonFinite { token: String },
    #[error("invalid repeat count {count:?} in token {token:?}")]
    InvalidCount { token: String, count: String },
    #[error("token {token:?} expands past {MAX_DECODED_VALUES} values")]
    TooLarge { token: String },
}

pub fn decode_numeric(text: &str) -> Result<Vec<f64>, DecodeError> {
    let mut out = Vec::new();
    for raw in text.split(TOKEN_SEPARATOR) {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }
        match token.split_once(REPEAT_DELIMITER) {
            Some((value, count)) => {
                let v = parse_value(token, value.trim())?;
                let n = parse_count(token, count.trim())?;
                reserve(&mut out, token, n)?;
                out.extend(std::iter::repeat_n(v, n));
            }
            None => {
                let v = parse_value(token, token)?;
                reserve(&mut out, token, 1)?;
                out.push(v);
            }
        }
    }
    Ok(out)
}

pub fn decode_labels(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(TOKEN_SEPARATOR).map(str::to_string).collect()
}

/// Collapses consecutive bit-identical values into `value x count` tokens.
#[cfg(test)]
pub fn encode_numeric(values: &[f64]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let mut i = 0usize;
    while i < values.len() {
        let v = values[i];
        let mut run = 1usize;
        while i + run < values.len() && values[i + run].to_bits() == v.to_bits() {
            run += 1;
        }
        if !out.is_empty() {
            out.push(TOKEN_SEPARATOR);
        }
        // Display for f64 is the shortest text that parses back to the same value.
        let _ = write!(out, "{v}");
        if run > 1 {
            let _ = write!(out, "{REPEAT_DELIMITER}{run}");
        }
        i += run;
    }
    out
}

#[cfg(test)]
pub fn encode_labels<S: AsRef<str>>(labels: &[S]) -> String {
    let mut out = String::new();
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            out.push(TOKEN_SEPARATOR);
        }
        out.push_str(label.as_ref());
    }
    out
}

fn reserve(out: &mut Vec<f64>, token: &str, additional: usize) -> Result<(), DecodeError> {
    let too_large = || DecodeError::TooLarge {
        token: token.to_string(),
    };
    out.len()
        .checked_add(additional)
        .filter(|&total| total <= MAX_DECODED_VALUES)
        .ok_or_else(too_large)?;
    out.try_reserve(additional).map_err(|_| too_large())
}

fn parse_value(token: &str, value: &str) -> Result<f64, DecodeError> {
    let v: f64 = value.parse().map_err(|_| DecodeError::InvalidNumber {
        token: token.to_string(),
        value: value.to_string(),
    })?;
    if !v.is_finite() {
        return Err(DecodeError::NonFinite {
            token: token.to_string(),
        });
    }
    Ok(v)
}

fn parse_count(token: &str, count: &str) -> Result<usize, DecodeError> {
    match count.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(DecodeError::InvalidCount {
            token: token.to_string(),
            count: count.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/codec.rs"]
mod tests;
