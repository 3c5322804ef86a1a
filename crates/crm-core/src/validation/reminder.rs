use serde::Deserialize;
use validator::Validate;

use super::{
    FieldErrors, IntoValidated, non_blank, optional_uuid, required, required_date, trimmed,
    validate_date, validate_uuid,
};
use crate::models::reminder::ReminderInput;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReminderPayload {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Note must not be empty")
    )]
    pub note: Option<String>,
    #[validate(required(message = "Required"), custom(function = "validate_date"))]
    pub due_date: Option<String>,
    #[validate(custom(function = "validate_uuid"))]
    pub client_id: Option<String>,
    #[validate(custom(function = "validate_uuid"))]
    pub project_id: Option<String>,
}

impl IntoValidated for ReminderPayload {
    type Output = ReminderInput;

    fn into_validated(self) -> Result<ReminderInput, FieldErrors> {
        let payload = ReminderPayload {
            note: trimmed(self.note),
            due_date: trimmed(self.due_date),
            client_id: non_blank(self.client_id),
            project_id: non_blank(self.project_id),
        };
        payload.validate()?;

        Ok(ReminderInput {
            client_id: optional_uuid("client_id", payload.client_id)?,
            project_id: optional_uuid("project_id", payload.project_id)?,
            note: required("note", payload.note)?,
            due_date: required_date("due_date", payload.due_date)?,
        })
    }
}
