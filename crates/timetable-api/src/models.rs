// Wire types for the `/staff` resource.

use serde::{Deserialize, Serialize};

use crate::schedule::Schedule;

/// A staff member as returned by the API.
///
/// `schedule` is the opaque serialized form; use [`Staff::schedule`] for the
/// structured view. Timestamps are passed through as the server sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub schedule: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Staff {
    /// Decoded weekly schedule. Malformed data yields empty days.
    pub fn schedule(&self) -> Schedule {
        Schedule::decode(&self.schedule)
    }
}

/// `GET /staff/` response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffListResponse {
    #[serde(default)]
    pub staff: Vec<Staff>,
}

/// Body of `POST /staff/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl CreateStaffRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            schedule: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach a structured schedule, encoded for the wire.
    pub fn schedule(mut self, schedule: &Schedule) -> Self {
        self.schedule = Some(schedule.encode());
        self
    }
}

/// Body of `PUT /staff/{id}`. Replaces name, email and schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl UpdateStaffRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            schedule: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn schedule(mut self, schedule: &Schedule) -> Self {
        self.schedule = Some(schedule.encode());
        self
    }
}

impl From<&Staff> for UpdateStaffRequest {
    fn from(staff: &Staff) -> Self {
        Self {
            name: staff.name.clone(),
            email: staff.email.clone(),
            schedule: Some(staff.schedule.clone()),
        }
    }
}

/// Plain `{message}` acknowledgement (e.g. from `DELETE /staff/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
