use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only audit record of a mutation attempt
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,      // CREATE, UPDATE, DELETE
    pub entity_type: String, // e.g. "Schedule"
    pub entity_id: Option<Uuid>,
    pub status: String, // SUCCESS, FAILURE
    pub details: Json,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
