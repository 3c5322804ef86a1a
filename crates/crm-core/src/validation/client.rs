use serde::Deserialize;
use validator::Validate;

use super::{FieldErrors, IntoValidated, non_blank, required, trimmed};
use crate::models::client::ClientInput;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ClientPayload {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Name must not be empty")
    )]
    pub name: Option<String>,
    #[validate(required(message = "Required"), email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Phone must not be empty")
    )]
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

impl IntoValidated for ClientPayload {
    type Output = ClientInput;

    fn into_validated(self) -> Result<ClientInput, FieldErrors> {
        let payload = ClientPayload {
            name: trimmed(self.name),
            email: trimmed(self.email),
            phone: trimmed(self.phone),
            company: non_blank(self.company),
            notes: non_blank(self.notes),
        };
        payload.validate()?;

        Ok(ClientInput {
            name: required("name", payload.name)?,
            email: required("email", payload.email)?,
            phone: required("phone", payload.phone)?,
            company: payload.company,
            notes: payload.notes,
        })
    }
}
