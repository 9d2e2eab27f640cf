// `/staff` resource endpoints
//
// Thin typed surface over the client verbs. Errors pass through unchanged.

use tracing::debug;
use url::Url;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    CreateStaffRequest, MessageResponse, Staff, StaffListResponse, UpdateStaffRequest,
};

impl ApiClient {
    /// List staff members, optionally filtered by the active flag.
    ///
    /// `GET /staff/`, with `?is_active=true|false` only when `active` is set.
    pub async fn list_staff(&self, active: Option<bool>) -> Result<StaffListResponse, Error> {
        let url = self.endpoint("staff/")?;
        debug!(?active, "listing staff");
        match active {
            Some(flag) => {
                self.get_with_params(url, &[("is_active", flag.to_string())])
                    .await
            }
            None => self.get(url).await,
        }
    }

    /// Create a staff member. The server assigns id and timestamps.
    ///
    /// `POST /staff/`
    pub async fn create_staff(&self, request: &CreateStaffRequest) -> Result<Staff, Error> {
        let url = self.endpoint("staff/")?;
        debug!(name = %request.name, "creating staff member");
        self.post(url, request).await
    }

    /// `GET /staff/{id}`
    pub async fn get_staff(&self, id: &str) -> Result<Staff, Error> {
        let url = self.staff_url(id)?;
        debug!(id, "fetching staff member");
        self.get(url).await
    }

    /// Replace name, email and schedule of a staff member.
    ///
    /// `PUT /staff/{id}`
    pub async fn update_staff(
        &self,
        id: &str,
        request: &UpdateStaffRequest,
    ) -> Result<Staff, Error> {
        let url = self.staff_url(id)?;
        debug!(id, "updating staff member");
        self.put(url, request).await
    }

    /// Deactivate a staff member. The server flips `is_active` rather than
    /// deleting the record.
    ///
    /// `DELETE /staff/{id}`
    pub async fn delete_staff(&self, id: &str) -> Result<MessageResponse, Error> {
        let url = self.staff_url(id)?;
        debug!(id, "deactivating staff member");
        self.delete(url).await
    }

    /// `staff/{id}`, refusing blank ids that would resolve to the collection.
    fn staff_url(&self, id: &str) -> Result<Url, Error> {
        if id.trim().is_empty() {
            return Err(Error::InvalidId(id.to_owned()));
        }
        self.endpoint_segments(&["staff", id])
    }
}
