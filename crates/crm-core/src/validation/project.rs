use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{
    FieldErrors, IntoValidated, non_blank, required, required_date, trimmed, validate_date,
    validate_uuid,
};
use crate::models::project::{ProjectInput, ProjectStatus};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProjectPayload {
    #[validate(required(message = "Required"), custom(function = "validate_uuid"))]
    pub client_id: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Title must not be empty")
    )]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(
        required(message = "Required"),
        range(min = 0.0, message = "Budget must not be negative")
    )]
    pub budget: Option<f64>,
    #[validate(required(message = "Required"), custom(function = "validate_date"))]
    pub deadline: Option<String>,
    #[validate(required(message = "Required"), custom(function = "validate_status"))]
    pub status: Option<String>,
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    value.parse::<ProjectStatus>().map(|_| ()).map_err(|_| {
        ValidationError::new("enum").with_message(
            "Invalid enum value. Expected 'planned' | 'in_progress' | 'completed' | 'cancelled'"
                .into(),
        )
    })
}

impl IntoValidated for ProjectPayload {
    type Output = ProjectInput;

    fn into_validated(self) -> Result<ProjectInput, FieldErrors> {
        let payload = ProjectPayload {
            client_id: trimmed(self.client_id),
            title: trimmed(self.title),
            description: non_blank(self.description),
            budget: self.budget,
            deadline: trimmed(self.deadline),
            status: trimmed(self.status),
        };
        payload.validate()?;

        let client_id = Uuid::parse_str(&required("client_id", payload.client_id)?)
            .map_err(|_| FieldErrors::single("client_id", "Invalid uuid"))?;
        let status = required("status", payload.status)?
            .parse::<ProjectStatus>()
            .map_err(|e| FieldErrors::single("status", e.to_string()))?;

        Ok(ProjectInput {
            client_id,
            title: required("title", payload.title)?,
            description: payload.description,
            budget: required("budget", payload.budget)?,
            deadline: required_date("deadline", payload.deadline)?,
            status,
        })
    }
}
