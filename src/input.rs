use std::io::Read;
use std::path::Path;

use crate::error::InputError;
use crate::types::Item;

/// Parses the heatmap feed: a JSON array of items.
pub fn parse_items(raw: &str) -> Result<Vec<Item>, InputError> {
    Ok(serde_json::from_str(raw)?)
}

/// Reads items from `path`, or from stdin when `path` is `-`.
pub fn read_items(path: &Path) -> Result<Vec<Item>, InputError> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    parse_items(&raw)
}
