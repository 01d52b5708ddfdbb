//! Source roster reading.
//!
//! The roster is a CSV export from the source platform; one row per
//! migration candidate. `user_alias` is the only required column.

use chatlift_core::model::SourceUser;
use chatlift_core::{ChatliftError, Result};
use std::path::Path;
use tracing::warn;

/// Reads the source roster file.
///
/// # Returns
///
/// - `Ok(Vec<SourceUser>)`: all rows carrying a user alias, in file order.
///   Rows without an alias are skipped with a warning.
/// - `Err(_)`: the file is missing, unopenable, or a row fails to parse.
pub fn read_roster(path: &Path) -> Result<Vec<SourceUser>> {
    if !path.exists() {
        return Err(ChatliftError::store(format!(
            "roster file not found at {:?}",
            path
        )));
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| ChatliftError::store(format!("failed to open roster at {:?}: {}", path, e)))?;

    let mut users = Vec::new();
    for (index, record) in reader.deserialize::<SourceUser>().enumerate() {
        // +2: one for the header row, one for 1-based numbering
        let line = index + 2;
        let user = record
            .map_err(|e| ChatliftError::store(format!("failed to parse roster row {}: {}", line, e)))?;
        if user.user_alias.is_empty() {
            warn!("roster row {} has no user alias, skipping", line);
            continue;
        }
        users.push(user);
    }
    Ok(users)
}
