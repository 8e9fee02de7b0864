// targets.rs - Bucket name sources

use crate::error::InputError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read a newline-delimited name list. Blank lines and `#` comments are skipped.
pub fn load_names_from_file(path: &Path) -> Result<Vec<String>, InputError> {
    if !path.exists() {
        return Err(InputError::ListNotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| InputError::ListUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| InputError::ListUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let name = line.trim();
        if !name.is_empty() && !name.starts_with('#') {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

/// Pick the name source: a list file wins over positional names. Nothing at all
/// is an input error.
pub fn resolve_names(positional: &[String], list: Option<&Path>) -> Result<Vec<String>, InputError> {
    let names = match list {
        Some(path) => load_names_from_file(path)?,
        None => positional.to_vec(),
    };

    if names.is_empty() {
        return Err(InputError::NoTargets);
    }
    Ok(names)
}
