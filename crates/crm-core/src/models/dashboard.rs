//! Dashboard summary projection.

use serde::{Deserialize, Serialize};

use super::project::ProjectStatus;

/// Per-status project counts. Always carries all four canonical keys.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectsByStatus {
    pub planned: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub cancelled: u64,
}

impl ProjectsByStatus {
    /// Build the mapping from raw `(status, count)` group-by rows.
    ///
    /// Rows whose status is not one of the canonical values are
    /// dropped, so the sum can be lower than the project total.
    pub fn tally<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut tally = Self::default();
        for (status, count) in rows {
            let Ok(status) = status.parse::<ProjectStatus>() else {
                continue;
            };
            *tally.slot_mut(status) += count;
        }
        tally
    }

    pub fn total(&self) -> u64 {
        self.planned + self.in_progress + self.completed + self.cancelled
    }

    fn slot_mut(&mut self, status: ProjectStatus) -> &mut u64 {
        match status {
            ProjectStatus::Planned => &mut self.planned,
            ProjectStatus::InProgress => &mut self.in_progress,
            ProjectStatus::Completed => &mut self.completed,
            ProjectStatus::Cancelled => &mut self.cancelled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_clients: u64,
    pub total_projects: u64,
    pub reminders_due: u64,
    pub projects_by_status: ProjectsByStatus,
}
