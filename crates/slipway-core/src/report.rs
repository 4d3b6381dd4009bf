//! Deploy run report.

use serde::Serialize;

use crate::context::DeployState;
use crate::platform;

/// Outcome of one completed step as recorded in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Warned,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub title: String,
    pub status: StepStatus,
    /// Warning text for non-fatal failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl StepRecord {
    pub fn completed(title: &str) -> Self {
        Self {
            title: title.to_string(),
            status: StepStatus::Completed,
            note: None,
        }
    }

    pub fn warned(title: &str, note: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            status: StepStatus::Warned,
            note: Some(note.into()),
        }
    }
}

/// Summary of a fully successful deploy run.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub app_name: String,
    pub app_url: String,
    pub contact_number: String,
    pub steps: Vec<StepRecord>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl DeployReport {
    pub fn new(state: &DeployState, steps: Vec<StepRecord>) -> Self {
        Self {
            app_name: state.app_name.clone(),
            app_url: platform::app_url(&state.app_name),
            contact_number: state.contact_number.clone(),
            steps,
            finished_at: chrono::Utc::now(),
        }
    }

    /// Warning notes accumulated across all steps.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| step.note.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> DeployReport {
        let mut state = DeployState::new("alert-relay-bot".to_string());
        state.contact_number = "5215512345678".to_string();
        DeployReport::new(
            &state,
            vec![
                StepRecord::completed("Check requirements"),
                StepRecord::warned("Select runtime stack", "stack unchanged"),
            ],
        )
    }

    #[test]
    fn test_report_derives_app_url() {
        let report = sample_report();
        assert_eq!(report.app_url, "https://alert-relay-bot.herokuapp.com");
    }

    #[test]
    fn test_warnings_come_from_warned_steps() {
        let report = sample_report();
        let warnings: Vec<_> = report.warnings().collect();
        assert_eq!(warnings, vec!["stack unchanged"]);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = sample_report();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"app_name\": \"alert-relay-bot\""));
        assert!(json.contains("\"status\": \"warned\""));
        assert!(json.contains("\"note\": \"stack unchanged\""));
        // Completed steps carry no note field at all.
        assert_eq!(json.matches("\"note\"").count(), 1);
    }
}
