use crate::entities::activity_logs;
use chrono::Utc;
use log::warn;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Success,
    Failure,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        }
    }
}

/// One audit record to append
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<Uuid>,
    pub action: ActivityAction,
    pub entity_type: &'static str,
    pub entity_id: Option<Uuid>,
    pub status: ActivityStatus,
    pub details: Value,
}

pub struct ActivityLogService;

impl ActivityLogService {
    /// Appends an audit record. Failures are logged and swallowed so that
    /// auditing never changes the outcome of the audited operation.
    pub async fn record(db: &DatabaseConnection, activity: NewActivity) {
        let entry = activity_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(activity.user_id),
            action: Set(activity.action.as_str().to_string()),
            entity_type: Set(activity.entity_type.to_string()),
            entity_id: Set(activity.entity_id),
            status: Set(activity.status.as_str().to_string()),
            details: Set(activity.details),
            created_at: Set(Utc::now().naive_utc()),
        };

        if let Err(e) = entry.insert(db).await {
            warn!(
                "Failed to record {} {} activity for {:?}: {e}",
                activity.action.as_str(),
                activity.entity_type,
                activity.entity_id
            );
        }
    }

    /// All audit records for one entity, oldest first
    pub async fn history(
        db: &DatabaseConnection,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<activity_logs::Model>, DbErr> {
        activity_logs::Entity::find()
            .filter(activity_logs::Column::EntityType.eq(entity_type))
            .filter(activity_logs::Column::EntityId.eq(entity_id))
            .order_by_asc(activity_logs::Column::CreatedAt)
            .all(db)
            .await
    }
}

/// Splits two JSON snapshots into the before and after values of the fields that differ
pub fn changed_fields(before: &Value, after: &Value, ignore: &[&str]) -> (Value, Value) {
    let mut old = serde_json::Map::new();
    let mut new = serde_json::Map::new();

    if let (Value::Object(before), Value::Object(after)) = (before, after) {
        for (key, after_value) in after {
            if ignore.contains(&key.as_str()) {
                continue;
            }

            let before_value = before.get(key).cloned().unwrap_or(Value::Null);
            if &before_value != after_value {
                old.insert(key.clone(), before_value);
                new.insert(key.clone(), after_value.clone());
            }
        }
    }

    (Value::Object(old), Value::Object(new))
}
