use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use sqlx::FromRow;

/// A job posting as returned by the search provider. Only the fields the
/// pipeline reads are kept; everything else in the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawJobResult {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub via: Option<String>,
    #[serde(default)]
    pub detected_extensions: Option<JsonValue>,
    #[serde(default)]
    pub job_highlights: Option<Highlights>,
}

/// The provider's `job_highlights` field. Its shape differs between
/// postings, so every shape is accepted and `Other` catches the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Highlights {
    Mapping(Map<String, JsonValue>),
    Sequence(Vec<JsonValue>),
    Text(String),
    Other(JsonValue),
}

impl Highlights {
    /// Collapses the highlights into one comma separated display string.
    /// Never fails: shapes it does not understand become an empty string.
    pub fn flatten(&self) -> String {
        match self {
            Highlights::Mapping(entries) => {
                let mut parts: Vec<String> = Vec::new();
                for value in entries.values() {
                    match value {
                        JsonValue::Array(items) => parts.extend(items.iter().map(display_value)),
                        JsonValue::String(s) => parts.push(s.clone()),
                        _ => {}
                    }
                }
                parts.join(", ")
            }
            Highlights::Sequence(items) => items
                .iter()
                .map(display_value)
                .collect::<Vec<_>>()
                .join(", "),
            Highlights::Text(text) => text.clone(),
            Highlights::Other(_) => String::new(),
        }
    }
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flat, display- and storage-ready job row. Field names are the column
/// names of the `jobs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EnrichedJobRecord {
    pub company_name: Option<String>,
    pub title: Option<String>,
    pub location: String,
    pub description: String,
    pub summary: String,
    pub extensions: String,
    pub via: String,
    pub job_highlights: String,
}

impl EnrichedJobRecord {
    /// Builds the record from a raw result and an already computed summary.
    pub fn from_raw(raw: RawJobResult, fallback_location: &str, summary: String) -> Self {
        let extensions = raw
            .detected_extensions
            .as_ref()
            .and_then(JsonValue::as_object)
            .map(|tags| tags.keys().map(String::as_str).collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        let job_highlights = raw
            .job_highlights
            .as_ref()
            .map(Highlights::flatten)
            .unwrap_or_default();

        Self {
            company_name: raw.company_name,
            title: raw.title,
            location: raw
                .location
                .unwrap_or_else(|| fallback_location.to_string()),
            description: raw.description.unwrap_or_default(),
            summary,
            extensions,
            via: raw.via.unwrap_or_else(|| "Unknown".to_string()),
            job_highlights,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("<untitled>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn highlights(value: JsonValue) -> Option<Highlights> {
        let raw: RawJobResult =
            serde_json::from_value(json!({ "job_highlights": value })).expect("raw result");
        raw.job_highlights
    }

    fn flatten(value: JsonValue) -> String {
        highlights(value).map(|h| h.flatten()).unwrap_or_default()
    }

    #[test]
    fn flattens_mapping_of_lists_in_insertion_order() {
        let value = json!({
            "Responsibilities": ["Ship features", "Review code"],
            "Qualifications": ["Rust", "SQL"],
        });
        assert_eq!(flatten(value), "Ship features, Review code, Rust, SQL");
    }

    #[test]
    fn flattens_mapping_of_strings() {
        let value = json!({ "Benefits": "Dental", "Schedule": "Remote" });
        assert_eq!(flatten(value), "Dental, Remote");
    }

    #[test]
    fn mapping_skips_values_of_other_shapes() {
        let value = json!({ "a": ["x"], "b": 42, "c": null, "d": "y" });
        assert_eq!(flatten(value), "x, y");
    }

    #[test]
    fn flattens_flat_list_using_string_representations() {
        assert_eq!(flatten(json!(["Remote", 3, true])), "Remote, 3, true");
    }

    #[test]
    fn plain_string_is_kept_verbatim() {
        assert_eq!(flatten(json!("Full-time, remote ok")), "Full-time, remote ok");
    }

    #[test]
    fn missing_empty_or_unexpected_shapes_become_empty() {
        assert_eq!(flatten(json!({})), "");
        assert_eq!(flatten(json!(12)), "");
        assert_eq!(flatten(json!(null)), "");
        assert!(highlights(json!(null)).is_none());

        let raw: RawJobResult = serde_json::from_value(json!({})).expect("raw result");
        assert!(raw.job_highlights.is_none());
    }

    #[test]
    fn record_applies_defaults_for_missing_fields() {
        let raw: RawJobResult = serde_json::from_value(json!({ "title": "Engineer" })).unwrap();
        let record = EnrichedJobRecord::from_raw(raw, "Austin, TX", "s".to_string());

        assert_eq!(record.via, "Unknown");
        assert_eq!(record.location, "Austin, TX");
        assert_eq!(record.description, "");
        assert_eq!(record.company_name, None);
        assert_eq!(record.extensions, "");
        assert_eq!(record.job_highlights, "");
    }

    #[test]
    fn record_copies_provider_fields() {
        let raw: RawJobResult = serde_json::from_value(json!({
            "company_name": "Acme",
            "title": "Backend Engineer",
            "location": "Remote",
            "description": "Build things",
            "via": "LinkedIn",
            "detected_extensions": { "posted_at": "2 days ago", "schedule_type": "Full-time" },
            "job_highlights": { "Qualifications": ["Rust"] },
            "job_id": "ignored",
        }))
        .unwrap();
        let record = EnrichedJobRecord::from_raw(raw, "Austin, TX", "Summary".to_string());

        assert_eq!(record.company_name.as_deref(), Some("Acme"));
        assert_eq!(record.location, "Remote");
        assert_eq!(record.via, "LinkedIn");
        assert_eq!(record.extensions, "posted_at, schedule_type");
        assert_eq!(record.job_highlights, "Rust");
        assert_eq!(record.summary, "Summary");
    }
}
