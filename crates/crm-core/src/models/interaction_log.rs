//! Interaction log domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Call,
    Email,
    Meeting,
}

impl InteractionType {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionType::Call => "call",
            InteractionType::Email => "email",
            InteractionType::Meeting => "meeting",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(InteractionType::Call),
            "email" => Ok(InteractionType::Email),
            "meeting" => Ok(InteractionType::Meeting),
            other => Err(format!("unknown interaction type: {other}")),
        }
    }
}

/// A record of contact with a client, a project, or both. Visible to
/// the tenant that owns either linked parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionLog {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated log fields. At least one of `client_id` / `project_id`
/// is always set.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionLogInput {
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub kind: InteractionType,
    pub notes: Option<String>,
}
