use models::{role::Role, visibility::Viewer};
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Group ids stored as a JSON array
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct GroupIds(pub Vec<Uuid>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The `sub` claim issued for this user by the identity provider
    #[sea_orm(unique)]
    pub auth_subject: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub role: Role,
    /// Home group, meaningful for students
    pub group_id: Option<Uuid>,
    #[sea_orm(column_type = "Json")]
    pub mentored_group_ids: GroupIds,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    HomeGroup,
    #[sea_orm(has_many = "super::user_groups::Entity")]
    UserGroups,
}

impl Related<super::user_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for Viewer {
    fn from(user: &Model) -> Self {
        Viewer {
            id: user.id,
            role: user.role,
            group_id: user.group_id,
            mentored_group_ids: user.mentored_group_ids.0.clone(),
        }
    }
}
