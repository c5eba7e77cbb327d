use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A numbered subdivision of a group.
///
/// With `subject_id` unset the subgroup is group-wide and usable for any
/// subject; otherwise it only applies to that subject.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subgroups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub group_id: Uuid,
    pub subject_id: Option<Uuid>,
    pub number: i32,
    pub is_active: bool,
}

impl Model {
    pub fn is_subject_scoped(&self) -> bool {
        self.subject_id.is_some()
    }

    /// Whether a schedule entry for `group_id` and `subject_id` may reference this subgroup
    pub fn fits(&self, group_id: Uuid, subject_id: Uuid) -> bool {
        self.group_id == group_id && self.subject_id.is_none_or(|s| s == subject_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
