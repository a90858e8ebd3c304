use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity attached to a request by the session gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    #[serde(skip)]
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}
