use serde::{Deserialize, Serialize};

/// Placeholder rendered for any hazard field the model left out.
pub const MISSING_FIELD: &str = "N/A";

/// Workplace details submitted through the assessment form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkplaceAssessmentRequest {
    pub workplace_type: String,
    pub employees_count: u32,
    pub hazards_description: String,
}

impl WorkplaceAssessmentRequest {
    /// The form widget enforces `min=1`; API callers get the same rule here.
    /// Text fields are passed through untouched, blanks included.
    pub fn validate(&self) -> Result<(), String> {
        if self.employees_count < 1 {
            return Err("employees_count must be at least 1".to_string());
        }
        Ok(())
    }
}

/// A single hazard with every field filled in, `"N/A"` where the reply had none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardFinding {
    pub hazard: String,
    pub category: String,
    pub risk_level: String,
    pub recommended_measures: String,
}

/// Parsed structured reply. Lives only between interpretation and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub workplace_type: String,
    pub employees_count: Option<u64>,
    pub hazards: Vec<HazardFinding>,
}
