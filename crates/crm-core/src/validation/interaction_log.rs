use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{
    FieldErrors, IntoValidated, non_blank, optional_uuid, required, required_date, trimmed,
    validate_date, validate_uuid,
};
use crate::models::interaction_log::{InteractionLogInput, InteractionType};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_has_link"))]
pub struct InteractionLogPayload {
    #[validate(custom(function = "validate_uuid"))]
    pub client_id: Option<String>,
    #[validate(custom(function = "validate_uuid"))]
    pub project_id: Option<String>,
    #[validate(required(message = "Required"), custom(function = "validate_date"))]
    pub date: Option<String>,
    #[serde(rename = "type")]
    #[validate(required(message = "Required"), custom(function = "validate_type"))]
    pub kind: Option<String>,
    pub notes: Option<String>,
}

fn validate_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<InteractionType>().map(|_| ()).map_err(|_| {
        ValidationError::new("enum")
            .with_message("Invalid enum value. Expected 'call' | 'email' | 'meeting'".into())
    })
}

/// A log with no parent could never be listed by any tenant.
fn validate_has_link(payload: &InteractionLogPayload) -> Result<(), ValidationError> {
    if payload.client_id.is_none() && payload.project_id.is_none() {
        return Err(ValidationError::new("link")
            .with_message("Either client_id or project_id is required".into()));
    }
    Ok(())
}

impl IntoValidated for InteractionLogPayload {
    type Output = InteractionLogInput;

    fn into_validated(self) -> Result<InteractionLogInput, FieldErrors> {
        let payload = InteractionLogPayload {
            client_id: non_blank(self.client_id),
            project_id: non_blank(self.project_id),
            date: trimmed(self.date),
            kind: trimmed(self.kind),
            notes: non_blank(self.notes),
        };
        payload
            .validate()
            .map_err(|e| FieldErrors::from(e).renamed("kind", "type"))?;

        let kind = required("type", payload.kind)?
            .parse::<InteractionType>()
            .map_err(|e| FieldErrors::single("type", e))?;

        Ok(InteractionLogInput {
            client_id: optional_uuid("client_id", payload.client_id)?,
            project_id: optional_uuid("project_id", payload.project_id)?,
            date: required_date("date", payload.date)?,
            kind,
            notes: payload.notes,
        })
    }
}
