use database::entities::users;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub group_id: Option<Uuid>,
    pub mentored_group_ids: Vec<Uuid>,
    pub can_manage_schedules: bool,
}

impl From<users::Model> for MeResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            role: user.role.as_str().to_string(),
            group_id: user.group_id,
            mentored_group_ids: user.mentored_group_ids.0,
            can_manage_schedules: user.role.can_manage_schedules(),
        }
    }
}
