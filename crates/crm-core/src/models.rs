//! Domain models for the freelancer CRM.
//!
//! Clients are the tenancy root. Projects inherit their tenant through
//! the owning client, interaction logs through either linked parent,
//! and reminders carry their own tenant stamp.

pub mod account;
pub mod client;
pub mod dashboard;
pub mod interaction_log;
pub mod project;
pub mod reminder;
