use models::days::DayOfWeek;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A dated schedule entry. Entries are soft-deleted by clearing `is_active`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subject_id: Uuid,
    pub group_id: Option<Uuid>,
    pub subgroup_id: Option<Uuid>,
    pub date: Date,
    #[sea_orm(column_type = "Text")]
    pub day_of_week: DayOfWeek,
    pub start_time: Time,
    pub end_time: Time,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::subgroups::Entity",
        from = "Column::SubgroupId",
        to = "super::subgroups::Column::Id"
    )]
    Subgroup,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::subgroups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subgroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
