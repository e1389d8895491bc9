use serde::Serialize;
use utoipa::ToSchema;

/// `{"success": true}` acknowledgement returned by the mutating endpoints.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
