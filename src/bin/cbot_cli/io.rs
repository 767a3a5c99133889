#![deny(clippy::all, clippy::pedantic)]

use std::collections::BTreeMap;

use crate::client::CliError;

/// Parse `key1:value1,key2:value2` into a mapping; later keys overwrite earlier ones.
///
/// A pair splitting into an odd number of `:` tokens is rejected. Empty input
/// yields an empty mapping.
pub fn parse_input(raw: &str) -> Result<BTreeMap<String, String>, CliError> {
    let mut input = BTreeMap::new();
    if raw.is_empty() {
        return Ok(input);
    }

    for pair in raw.split(',') {
        let tokens: Vec<&str> = pair.split(':').collect();
        if tokens.len() % 2 != 0 {
            return Err(CliError::InputFormat);
        }
        input.insert(tokens[0].to_string(), tokens[1].to_string());
    }
    Ok(input)
}

pub fn to_value<T: serde::Serialize>(value: T) -> Result<serde_json::Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::InvalidInput(e.to_string()))
}
