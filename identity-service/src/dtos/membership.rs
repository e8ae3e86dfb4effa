use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 128, message = "Organization name is required"))]
    pub name: String,

    pub domain: Option<String>,

    /// Explicit admin list; when empty the creator becomes the sole admin.
    #[serde(default)]
    pub admins: Vec<Uuid>,
}
