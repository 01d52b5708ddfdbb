//! Source roster rows.

use serde::{Deserialize, Serialize};

/// One migration candidate from the source roster.
///
/// `user_alias` is the source platform's stable identifier and is the only
/// required column; a row without it cannot be migrated. Name, email and
/// phone are optional, but destination-user lookup needs at least one of
/// email/phone to attempt a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUser {
    /// Stable source-side identifier.
    pub user_alias: String,
    /// Display name; older rosters used a plain `name` column.
    #[serde(alias = "name")]
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl SourceUser {
    /// The display name to persist in the registry, empty when the roster
    /// carried none.
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("")
    }
}
