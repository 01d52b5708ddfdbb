//! Agent and channel directory entries.
//!
//! Two parallel directories exist per kind (source and destination). Each is
//! fetched at most once per run and cached by the identity resolver.

use serde::{Deserialize, Serialize};

/// One agent of either platform's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryAgent {
    #[serde(default)]
    pub id: String,
    /// Agents are matched across platforms by email equality.
    pub email: Option<String>,
}

/// One channel of either platform's directory.
///
/// Channel ids are not stable across platforms; mapping goes by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryChannel {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
}
