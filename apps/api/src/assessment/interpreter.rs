//! Response interpreter: turns a raw structured reply into an `AssessmentResult`.
//!
//! Parsing happens in two steps. The reply is read into optional-field
//! records (`AssessmentRecord`, `HazardRecord`) that accept anything the
//! model might leave out, then `fill_missing` substitutes the `"N/A"`
//! placeholder. A reply that is not JSON, or not shaped like the schema,
//! comes back as a `FormatError` holding the untouched raw text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::strip_json_fences;
use crate::models::assessment::{AssessmentResult, HazardFinding, MISSING_FIELD};

/// The reply could not be read as a structured assessment.
/// Recovered by showing `raw_text` instead of hazard cards.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("JSON Parse Error: {message}")]
pub struct FormatError {
    #[serde(rename = "error")]
    pub message: String,
    pub raw_text: String,
}

#[derive(Debug, Deserialize)]
struct AssessmentRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    workplace_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    employees_count: Option<u64>,
    #[serde(default)]
    hazards: Option<Vec<HazardRecord>>,
}

#[derive(Debug, Deserialize)]
struct HazardRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    hazard: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    risk_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    recommended_measures: Option<String>,
}

impl HazardRecord {
    fn fill_missing(self) -> HazardFinding {
        let or_placeholder = |v: Option<String>| v.unwrap_or_else(|| MISSING_FIELD.to_string());
        HazardFinding {
            hazard: or_placeholder(self.hazard),
            category: or_placeholder(self.category),
            risk_level: or_placeholder(self.risk_level),
            recommended_measures: or_placeholder(self.recommended_measures),
        }
    }
}

/// Strings pass through; numbers and booleans keep their JSON spelling;
/// `null` counts as missing.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Accepts a non-negative integer or a numeric string; anything else is absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

/// Interprets a structured reply. Never panics; every failure is a `FormatError`.
pub fn interpret_assessment(raw: &str) -> Result<AssessmentResult, FormatError> {
    let format_error = |message: String| FormatError {
        message,
        raw_text: raw.to_string(),
    };

    let value: Value =
        serde_json::from_str(strip_json_fences(raw)).map_err(|e| format_error(e.to_string()))?;

    if !value.is_object() {
        return Err(format_error(
            "expected a JSON object at the top level".to_string(),
        ));
    }

    let record =
        AssessmentRecord::deserialize(value).map_err(|e| format_error(e.to_string()))?;

    Ok(AssessmentResult {
        workplace_type: record
            .workplace_type
            .unwrap_or_else(|| MISSING_FIELD.to_string()),
        employees_count: record.employees_count,
        hazards: record
            .hazards
            .unwrap_or_default()
            .into_iter()
            .map(HazardRecord::fill_missing)
            .collect(),
    })
}
