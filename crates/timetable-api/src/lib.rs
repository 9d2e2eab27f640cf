// timetable-api: Async Rust client for the staff timetable API
//
// Schedule codec, bearer-token session, transport with error normalization,
// the `/staff` resource, and the navigation guard consumed by the view layer.

pub mod client;
pub mod error;
pub mod guard;
pub mod models;
pub mod schedule;
pub mod session;
pub mod staff;
pub mod transport;

pub use client::ApiClient;
pub use error::{ApiError, Error};
pub use guard::{Navigation, Route, SessionGuard, document_title};
pub use models::{CreateStaffRequest, MessageResponse, Staff, StaffListResponse, UpdateStaffRequest};
pub use schedule::{Schedule, TimeSlot, Weekday};
pub use session::{MemoryTokenStore, Session, TOKEN_KEY, TokenStore};
pub use transport::TransportConfig;
