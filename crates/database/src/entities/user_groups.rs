use models::membership::{MembershipDimension, SubgroupAssignments};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's membership in a group, with one subgroup number per dimension
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub commerce_subgroup: Option<i32>,
    pub tutorial_subgroup: Option<i32>,
    pub finance_subgroup: Option<i32>,
    pub systems_thinking_subgroup: Option<i32>,
}

impl Model {
    pub fn assignments(&self) -> SubgroupAssignments {
        [
            (MembershipDimension::Commerce, self.commerce_subgroup),
            (MembershipDimension::Tutorial, self.tutorial_subgroup),
            (MembershipDimension::Finance, self.finance_subgroup),
            (
                MembershipDimension::SystemsThinking,
                self.systems_thinking_subgroup,
            ),
        ]
        .into_iter()
        .collect()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Group,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
