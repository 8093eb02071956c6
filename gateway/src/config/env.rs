//! Environment variable readers.
//!
//! Empty values are treated as unset so `KEY=` in a `.env` file falls back to
//! the default.

use std::error::Error;
use std::str::FromStr;

/// Read `key`, ignoring unset and empty values
pub(crate) fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse `key`. A value that does not parse is an error, not a default.
pub(crate) fn parse<T>(key: &str) -> Result<Option<T>, Box<dyn Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {key} ('{raw}'): {e}").into()),
        None => Ok(None),
    }
}

/// Read a boolean flag: `true/false`, `1/0`, `yes/no`, `on/off`
pub(crate) fn flag(key: &str) -> Result<Option<bool>, Box<dyn Error>> {
    match var(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(format!("Invalid boolean for {key}: '{raw}'").into()),
        },
        None => Ok(None),
    }
}

/// Read a comma-separated list, dropping blank entries
pub(crate) fn list(key: &str) -> Option<Vec<String>> {
    var(key).map(|raw| split_list(&raw))
}

pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
