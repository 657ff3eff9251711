//! Identifier sources: an IDs file, an inline comma list, or random IDs.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdOrigin {
    File,
    Inline,
    Random,
}

/// Picks the IDs file if it exists, else the inline list if it names at
/// least one ID, else `random_count` random IDs.
///
/// An existing file that yields no IDs gives an empty list (a blank sheet),
/// never random labels.
pub fn resolve_ids(
    ids_file: Option<&Path>,
    inline: Option<&str>,
    random_count: usize,
) -> Result<(Vec<String>, IdOrigin), AppError> {
    if let Some(path) = ids_file {
        match load_ids_file(path)? {
            Some(ids) => {
                if ids.is_empty() {
                    warn!(path = %path.display(), "IDs file contains no IDs");
                } else {
                    info!(count = ids.len(), path = %path.display(), "using IDs from file");
                }
                return Ok((ids, IdOrigin::File));
            }
            None => warn!(path = %path.display(), "IDs file not found"),
        }
    }

    if let Some(list) = inline {
        let ids = parse_inline(list);
        if !ids.is_empty() {
            info!(count = ids.len(), "using inline IDs");
            return Ok((ids, IdOrigin::Inline));
        }
    }

    info!(count = random_count, "generating random IDs");
    Ok((random_ids(random_count), IdOrigin::Random))
}

/// `None` when the file does not exist.
pub fn load_ids_file(path: &Path) -> Result<Option<Vec<String>>, AppError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(parse_id_list(&content)))
}

/// JSON array first; anything else is read one ID per line.
pub fn parse_id_list(text: &str) -> Vec<String> {
    let text = text.trim();
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
    }
}

pub fn parse_inline(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn generate_short_id() -> String {
    let uuid = Uuid::new_v4();
    let hex = format!("{:x}", uuid);
    hex[..8].to_uppercase()
}

/// `count` distinct 8-character IDs.
pub fn random_ids(count: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(count);
    let mut ids = Vec::with_capacity(count);
    while ids.len() < count {
        let id = generate_short_id();
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    ids
}
