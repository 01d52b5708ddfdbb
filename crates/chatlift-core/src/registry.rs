//! Contact registry rows: normalization, formatting, and merging.
//!
//! The registry is the persisted cross-reference of source-to-destination
//! contact mappings. Historical files were written with several header
//! spellings; reads coalesce each logical field over a fixed ordered alias
//! list, and writes always use the canonical header set.
//!
//! Merging is append-only: existing rows are preserved verbatim (modulo
//! header normalization) and never deduplicated against new rows. Re-running
//! a migration for the same user appends a second row; the registry is an
//! audit log, not a keyed table.

use crate::model::MigrationResult;
use std::collections::HashMap;

/// Canonical header row, in persisted column order.
pub const CANONICAL_HEADERS: [&str; 6] = [
    "sourceUserId",
    "destinationUserId",
    "name",
    "email",
    "phone",
    "Conversation_ids",
];

/// Accepted spellings per logical field, first match wins.
const SOURCE_USER_ID_ALIASES: &[&str] = &[
    "sourceUserId",
    "SourceUserId",
    "source_user_id",
    "Source User Id",
];
const DESTINATION_USER_ID_ALIASES: &[&str] = &[
    "destinationUserId",
    "DestinationUserId",
    "destination_user_id",
    "Destination User Id",
];
const NAME_ALIASES: &[&str] = &["name", "Name"];
const EMAIL_ALIASES: &[&str] = &["email", "Email"];
const PHONE_ALIASES: &[&str] = &["phone", "Phone"];
const CONVERSATION_IDS_ALIASES: &[&str] = &[
    "Conversation_ids",
    "conversation_ids",
    "ConversationIds",
    "conversationIds",
    "Conversation Ids",
];

/// One persisted registry row. Every field is always present, possibly
/// empty, never absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRow {
    pub source_user_id: String,
    pub destination_user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub conversation_ids: String,
}

impl RegistryRow {
    /// The row's fields in canonical column order.
    pub fn to_record(&self) -> [&str; 6] {
        [
            &self.source_user_id,
            &self.destination_user_id,
            &self.name,
            &self.email,
            &self.phone,
            &self.conversation_ids,
        ]
    }
}

/// Returns the first non-missing value among `keys`, defaulting to empty.
fn coalesce(row: &HashMap<String, String>, keys: &[&str]) -> String {
    for key in keys {
        if let Some(value) = row.get(*key) {
            return value.clone();
        }
    }
    String::new()
}

/// Normalizes a row read from an existing registry file.
///
/// Normalizing an already-canonical row yields the same row.
pub fn normalize_row(row: &HashMap<String, String>) -> RegistryRow {
    RegistryRow {
        source_user_id: coalesce(row, SOURCE_USER_ID_ALIASES),
        destination_user_id: coalesce(row, DESTINATION_USER_ID_ALIASES),
        name: coalesce(row, NAME_ALIASES),
        email: coalesce(row, EMAIL_ALIASES),
        phone: coalesce(row, PHONE_ALIASES),
        conversation_ids: coalesce(row, CONVERSATION_IDS_ALIASES),
    }
}

/// Formats a freshly migrated result as a registry row.
///
/// The ordered conversation id list serializes comma-joined; an empty list
/// serializes to the empty string.
pub fn format_result_row(result: &MigrationResult) -> RegistryRow {
    RegistryRow {
        source_user_id: result.source_user_id.clone(),
        destination_user_id: result.destination_user_id.clone(),
        name: result.name.clone(),
        email: result.email.clone(),
        phone: result.phone.clone(),
        conversation_ids: result.conversation_ids.join(","),
    }
}

/// Combines existing registry rows with newly migrated results: normalized
/// existing rows first, formatted new rows after, order preserved on both
/// sides, no deduplication.
pub fn merge(
    existing: &[HashMap<String, String>],
    new: &[MigrationResult],
) -> Vec<RegistryRow> {
    existing
        .iter()
        .map(normalize_row)
        .chain(new.iter().map(format_result_row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn result(source: &str, ids: &[&str]) -> MigrationResult {
        MigrationResult {
            source_user_id: source.to_string(),
            destination_user_id: format!("dest-{source}"),
            name: "Ada".to_string(),
            email: "a@x.com".to_string(),
            phone: String::new(),
            conversation_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_normalize_accepts_historical_spellings() {
        let row = raw(&[
            ("Source User Id", "u1"),
            ("DestinationUserId", "d1"),
            ("Name", "Ada"),
            ("Email", "a@x.com"),
            ("Phone", "123"),
            ("conversation_ids", "c1,c2"),
        ]);
        let normalized = normalize_row(&row);
        assert_eq!(normalized.source_user_id, "u1");
        assert_eq!(normalized.destination_user_id, "d1");
        assert_eq!(normalized.name, "Ada");
        assert_eq!(normalized.conversation_ids, "c1,c2");
    }

    #[test]
    fn test_normalize_first_match_wins() {
        let row = raw(&[("sourceUserId", "canonical"), ("source_user_id", "legacy")]);
        assert_eq!(normalize_row(&row).source_user_id, "canonical");
    }

    #[test]
    fn test_normalize_missing_fields_default_to_empty() {
        let normalized = normalize_row(&raw(&[("sourceUserId", "u1")]));
        assert_eq!(normalized.source_user_id, "u1");
        assert_eq!(normalized.email, "");
        assert_eq!(normalized.conversation_ids, "");
    }

    #[test]
    fn test_normalize_is_idempotent_on_canonical_rows() {
        let canonical = raw(&[
            ("sourceUserId", "u1"),
            ("destinationUserId", "d1"),
            ("name", "Ada"),
            ("email", "a@x.com"),
            ("phone", ""),
            ("Conversation_ids", "c1"),
        ]);
        let once = normalize_row(&canonical);
        let again: HashMap<String, String> = CANONICAL_HEADERS
            .iter()
            .zip(once.to_record())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(normalize_row(&again), once);
    }

    #[test]
    fn test_format_joins_conversation_ids_without_trailing_comma() {
        assert_eq!(format_result_row(&result("u1", &["c1"])).conversation_ids, "c1");
        assert_eq!(
            format_result_row(&result("u1", &["c1", "c2"])).conversation_ids,
            "c1,c2"
        );
        assert_eq!(format_result_row(&result("u1", &[])).conversation_ids, "");
    }

    #[test]
    fn test_merge_appends_without_dedup() {
        let existing = vec![raw(&[("sourceUserId", "u1"), ("Conversation_ids", "c1")])];
        let new = vec![result("u1", &["c2"])];
        let merged = merge(&existing, &new);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source_user_id, "u1");
        assert_eq!(merged[1].source_user_id, "u1");
        assert_eq!(merged[0].conversation_ids, "c1");
        assert_eq!(merged[1].conversation_ids, "c2");
    }
}
