//! Error types for the booking console core

use shared::{BookingStatus, FieldErrorBody, Species};
use std::fmt;
use thiserror::Error;

/// Draft fields a validation issue can be attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Customer,
    Animal,
    AnimalName,
    AnimalSpecies,
    Vaccination,
    Branch,
    AppointmentDate,
    TimeSlot,
}

impl DraftField {
    /// Name of the form field as the booking form labels it
    pub fn name(&self) -> &'static str {
        match self {
            DraftField::Customer => "customerId",
            DraftField::Animal => "animalId",
            DraftField::AnimalName => "animalName",
            DraftField::AnimalSpecies => "animalSpecies",
            DraftField::Vaccination => "vaccinationId",
            DraftField::Branch => "branchId",
            DraftField::AppointmentDate => "appointmentDate",
            DraftField::TimeSlot => "timeSlot",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single problem found in a booking draft
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldIssue {
    #[error("{0}: required")]
    Required(DraftField),
    #[error("{field}: unknown id {id}")]
    UnknownReference { field: DraftField, id: String },
    #[error("vaccinationId: {vaccination_id} is not offered for {species}")]
    NotEligible {
        vaccination_id: String,
        species: Species,
    },
}

impl FieldIssue {
    pub fn field(&self) -> DraftField {
        match self {
            FieldIssue::Required(field) => *field,
            FieldIssue::UnknownReference { field, .. } => *field,
            FieldIssue::NotEligible { .. } => DraftField::Vaccination,
        }
    }
}

/// Errors surfaced by console operations. None of them is fatal; every one
/// leaves the visible booking list as it was after the last successful fetch.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The draft failed one or more composition rules. No request was sent.
    #[error("Booking draft is invalid: {}", join_issues(.0))]
    Validation(Vec<FieldIssue>),

    /// The selected vaccination does not cover the resolved species. No request was sent.
    #[error("Vaccination {vaccination_id} is not offered for {species}")]
    Ineligible {
        vaccination_id: String,
        species: Species,
    },

    /// Network or transport failure
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The store answered with a non-2xx status
    #[error("Server rejected the request (status {status}): {}", rejection_text(.message, .field_errors))]
    ServerRejection {
        status: u16,
        message: Option<String>,
        field_errors: Vec<FieldErrorBody>,
    },

    /// The store answered 401. Handed to the session owner, never retried here.
    #[error("Unauthorized - session credential was rejected")]
    AuthFailure,

    /// No credential is available to sign requests
    #[error("No session credential available: {0}")]
    MissingCredential(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{0} is read-only for the selected customer")]
    ReadOnlyField(DraftField),

    #[error("Month {month} is out of range (expected 0-11)")]
    InvalidMonth { month: u32 },

    #[error("Booking cannot move from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

impl ConsoleError {
    /// Collapse a list of draft issues into the error the caller sees.
    /// An eligibility failure reported on its own keeps its own variant.
    pub fn from_issues(issues: Vec<FieldIssue>) -> Self {
        if let [FieldIssue::NotEligible {
            vaccination_id,
            species,
        }] = issues.as_slice()
        {
            return ConsoleError::Ineligible {
                vaccination_id: vaccination_id.clone(),
                species: *species,
            };
        }
        ConsoleError::Validation(issues)
    }

    /// True for failures detected before any request went out
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ConsoleError::Validation(_)
                | ConsoleError::Ineligible { .. }
                | ConsoleError::InvalidTransition { .. }
                | ConsoleError::NotFound { .. }
                | ConsoleError::ReadOnlyField(_)
                | ConsoleError::InvalidMonth { .. }
        )
    }

    /// Lines to show the operator for this failure
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            ConsoleError::Validation(issues) => issues.iter().map(|i| i.to_string()).collect(),
            ConsoleError::Ineligible {
                vaccination_id,
                species,
            } => vec![FieldIssue::NotEligible {
                vaccination_id: vaccination_id.clone(),
                species: *species,
            }
            .to_string()],
            ConsoleError::ServerRejection {
                message,
                field_errors,
                ..
            } => {
                if !field_errors.is_empty() {
                    field_errors.iter().map(|e| e.to_string()).collect()
                } else {
                    vec![message
                        .clone()
                        .unwrap_or_else(|| GENERIC_REJECTION.to_string())]
                }
            }
            ConsoleError::RequestFailed(_) => {
                vec!["Could not reach the booking service. Please try again.".to_string()]
            }
            other => vec![other.to_string()],
        }
    }
}

const GENERIC_REJECTION: &str = "The booking service rejected the request";

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn rejection_text(message: &Option<String>, field_errors: &[FieldErrorBody]) -> String {
    if !field_errors.is_empty() {
        field_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        message
            .clone()
            .unwrap_or_else(|| GENERIC_REJECTION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_renders_field_messages_verbatim() {
        let error = ConsoleError::ServerRejection {
            status: 400,
            message: Some("Validation failed".to_string()),
            field_errors: vec![FieldErrorBody {
                field: "branch".to_string(),
                message: "required".to_string(),
            }],
        };

        assert_eq!(error.user_messages(), vec!["branch: required".to_string()]);
        assert!(error.to_string().ends_with("branch: required"));
        assert!(!error.is_local());
    }

    #[test]
    fn test_rejection_without_body_falls_back_to_generic_text() {
        let error = ConsoleError::ServerRejection {
            status: 500,
            message: None,
            field_errors: vec![],
        };
        assert_eq!(error.user_messages(), vec![GENERIC_REJECTION.to_string()]);
    }

    #[test]
    fn test_lone_eligibility_issue_keeps_its_own_variant() {
        let error = ConsoleError::from_issues(vec![FieldIssue::NotEligible {
            vaccination_id: "vac-1".to_string(),
            species: Species::Sheep,
        }]);
        assert!(matches!(error, ConsoleError::Ineligible { species: Species::Sheep, .. }));

        let error = ConsoleError::from_issues(vec![
            FieldIssue::Required(DraftField::Branch),
            FieldIssue::Required(DraftField::TimeSlot),
        ]);
        assert_eq!(
            error.user_messages(),
            vec!["branchId: required".to_string(), "timeSlot: required".to_string()]
        );
    }
}
