use crate::{
    entities::{activity_logs, groups, schedules, subjects, users},
    services::{
        activity_log::{
            ActivityAction, ActivityLogService, ActivityStatus, NewActivity, changed_fields,
        },
        error::ServiceError,
        notify::{ScheduleNotice, ScheduleNotifier},
        schedule_visibility::ScheduleVisibility,
        subgroup_resolver::SubgroupResolver,
    },
};
use chrono::{NaiveDate, NaiveTime, Utc};
use log::{error, info};
use models::{
    days::DayOfWeek,
    visibility::{ScheduleFilters, Viewer, VisibilityScope},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use uuid::Uuid;

/// A schedule entry with the subject and group it belongs to
pub type ScheduleDetails = (
    schedules::Model,
    Option<subjects::Model>,
    Option<groups::Model>,
);

/// Fields for a new schedule entry. Subject, date and times are required.
#[derive(Debug, Clone, Default)]
pub struct NewSchedule {
    pub subject_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    /// Raw subgroup reference, resolved on write
    pub subgroup: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub description: Option<String>,
}

/// A partial update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default)]
pub struct ScheduleChanges {
    pub id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    /// Raw subgroup reference; `""` or `"none"` clears the subgroup
    pub subgroup: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub description: Option<String>,
}

/// Outcome of a successful mutation: the stored row and its audit payload
type Mutation = (schedules::Model, Value);

pub struct ScheduleService;

impl ScheduleService {
    pub const ENTITY_TYPE: &'static str = "Schedule";

    /// Active entries visible to `viewer`, ordered by date then start time
    pub async fn list(
        db: &DatabaseConnection,
        viewer: &Viewer,
        filters: &ScheduleFilters,
        limit: Option<u64>,
    ) -> Result<Vec<ScheduleDetails>, DbErr> {
        let scope = VisibilityScope::build(viewer, filters);
        let condition = ScheduleVisibility::condition(db, &scope).await?;

        let entries = schedules::Entity::find()
            .filter(condition)
            .order_by_asc(schedules::Column::Date)
            .order_by_asc(schedules::Column::StartTime)
            .limit(limit)
            .all(db)
            .await?;

        Self::with_refs(db, entries).await
    }

    /// A single entry, inactive or not, if `viewer` may see it
    pub async fn get(
        db: &DatabaseConnection,
        viewer: &Viewer,
        id: Uuid,
    ) -> Result<Option<ScheduleDetails>, DbErr> {
        let scope = VisibilityScope::for_entry(viewer, id);
        let condition = ScheduleVisibility::condition(db, &scope).await?;

        let Some(entry) = schedules::Entity::find().filter(condition).one(db).await? else {
            return Ok(None);
        };

        Ok(Self::with_refs(db, vec![entry]).await?.pop())
    }

    /// Audit records of one entry, oldest first
    pub async fn history(
        db: &DatabaseConnection,
        actor: &users::Model,
        id: Uuid,
    ) -> Result<Vec<activity_logs::Model>, ServiceError> {
        Self::authorize(actor)?;

        schedules::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Schedule"))?;

        Ok(ActivityLogService::history(db, Self::ENTITY_TYPE, id).await?)
    }

    pub async fn create(
        db: &DatabaseConnection,
        notifier: &dyn ScheduleNotifier,
        actor: &users::Model,
        input: NewSchedule,
    ) -> Result<schedules::Model, ServiceError> {
        let result = Self::insert_entry(db, actor, input).await;
        Self::finish(db, notifier, actor, ActivityAction::Create, None, result).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        notifier: &dyn ScheduleNotifier,
        actor: &users::Model,
        changes: ScheduleChanges,
    ) -> Result<schedules::Model, ServiceError> {
        let id = changes.id;
        let result = Self::update_entry(db, actor, changes).await;
        Self::finish(db, notifier, actor, ActivityAction::Update, id, result).await
    }

    /// Marks an active entry inactive. Deleting an inactive entry is `NotFound`.
    pub async fn soft_delete(
        db: &DatabaseConnection,
        notifier: &dyn ScheduleNotifier,
        actor: &users::Model,
        id: Option<Uuid>,
    ) -> Result<schedules::Model, ServiceError> {
        let result = Self::deactivate_entry(db, actor, id).await;
        Self::finish(db, notifier, actor, ActivityAction::Delete, id, result).await
    }

    /// Attach subjects and groups to entries, preserving entry order
    pub async fn with_refs(
        db: &DatabaseConnection,
        entries: Vec<schedules::Model>,
    ) -> Result<Vec<ScheduleDetails>, DbErr> {
        if entries.is_empty() {
            return Ok(vec![]);
        }

        let subject_ids: Vec<Uuid> = entries.iter().map(|e| e.subject_id).collect();
        let group_ids: Vec<Uuid> = entries.iter().filter_map(|e| e.group_id).collect();

        // Batch fetch subjects and groups
        let (subjects, groups) = futures::try_join!(
            subjects::Entity::find()
                .filter(subjects::Column::Id.is_in(subject_ids))
                .all(db),
            groups::Entity::find()
                .filter(groups::Column::Id.is_in(group_ids))
                .all(db),
        )?;

        let subjects_by_id: HashMap<Uuid, subjects::Model> =
            subjects.into_iter().map(|s| (s.id, s)).collect();
        let groups_by_id: HashMap<Uuid, groups::Model> =
            groups.into_iter().map(|g| (g.id, g)).collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let subject = subjects_by_id.get(&entry.subject_id).cloned();
                let group = entry.group_id.and_then(|id| groups_by_id.get(&id).cloned());
                (entry, subject, group)
            })
            .collect())
    }

    fn authorize(actor: &users::Model) -> Result<(), ServiceError> {
        if actor.role.can_manage_schedules() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "Role {} may not manage schedules",
                actor.role
            )))
        }
    }

    async fn ensure_subject(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        subjects::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(|_| ())
            .ok_or(ServiceError::NotFound("Subject"))
    }

    async fn ensure_group(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        groups::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(|_| ())
            .ok_or(ServiceError::NotFound("Group"))
    }

    async fn insert_entry(
        db: &DatabaseConnection,
        actor: &users::Model,
        input: NewSchedule,
    ) -> Result<Mutation, ServiceError> {
        Self::authorize(actor)?;

        let (subject_id, date, start_time, end_time) =
            match (input.subject_id, input.date, input.start_time, input.end_time) {
                (Some(subject_id), Some(date), Some(start_time), Some(end_time)) => {
                    (subject_id, date, start_time, end_time)
                }
                _ => return Err(ServiceError::Validation(missing_fields(&input))),
            };

        Self::ensure_subject(db, subject_id).await?;
        if let Some(group_id) = input.group_id {
            Self::ensure_group(db, group_id).await?;
        }

        let subgroup_id =
            SubgroupResolver::resolve(db, input.subgroup.as_deref(), input.group_id, subject_id)
                .await?;

        let now = Utc::now().naive_utc();
        let entry = schedules::ActiveModel {
            id: Set(Uuid::new_v4()),
            subject_id: Set(subject_id),
            group_id: Set(input.group_id),
            subgroup_id: Set(subgroup_id),
            date: Set(date),
            day_of_week: Set(DayOfWeek::from_date(date)),
            start_time: Set(start_time),
            end_time: Set(end_time),
            location: Set(input.location),
            event_type: Set(input.event_type),
            description: Set(input.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        let details = json!({ "created": snapshot(&entry) });
        Ok((entry, details))
    }

    async fn update_entry(
        db: &DatabaseConnection,
        actor: &users::Model,
        changes: ScheduleChanges,
    ) -> Result<Mutation, ServiceError> {
        Self::authorize(actor)?;

        let id = changes
            .id
            .ok_or_else(|| ServiceError::Validation("Schedule id is required".to_string()))?;

        let existing = schedules::Entity::find_by_id(id)
            .one(db)
            .await?
            .filter(|entry| entry.is_active)
            .ok_or(ServiceError::NotFound("Schedule"))?;

        let mut entry: schedules::ActiveModel = existing.clone().into();

        // Effective subject and group after this update
        let subject_id = match changes.subject_id {
            Some(subject_id) => {
                Self::ensure_subject(db, subject_id).await?;
                entry.subject_id = Set(subject_id);
                subject_id
            }
            None => existing.subject_id,
        };

        let group_id = match changes.group_id {
            Some(group_id) => {
                Self::ensure_group(db, group_id).await?;
                entry.group_id = Set(Some(group_id));
                Some(group_id)
            }
            None => existing.group_id,
        };

        let scope_changed = subject_id != existing.subject_id || group_id != existing.group_id;

        if let Some(raw) = changes.subgroup.as_deref() {
            let subgroup_id = SubgroupResolver::resolve(db, Some(raw), group_id, subject_id).await?;
            entry.subgroup_id = Set(subgroup_id);
        } else if scope_changed && let Some(current) = existing.subgroup_id {
            // The stored subgroup must still belong to the new group and subject
            let subgroup_id = SubgroupResolver::revalidate(db, current, group_id, subject_id).await?;
            entry.subgroup_id = Set(subgroup_id);
        }

        if let Some(date) = changes.date {
            entry.date = Set(date);
            entry.day_of_week = Set(DayOfWeek::from_date(date));
        }
        if let Some(start_time) = changes.start_time {
            entry.start_time = Set(start_time);
        }
        if let Some(end_time) = changes.end_time {
            entry.end_time = Set(end_time);
        }
        if let Some(location) = changes.location {
            entry.location = Set(Some(location));
        }
        if let Some(event_type) = changes.event_type {
            entry.event_type = Set(Some(event_type));
        }
        if let Some(description) = changes.description {
            entry.description = Set(Some(description));
        }
        entry.updated_at = Set(Utc::now().naive_utc());

        let updated = entry.update(db).await?;

        let (before, after) =
            changed_fields(&snapshot(&existing), &snapshot(&updated), &["updated_at"]);
        let details = json!({ "before": before, "after": after });
        Ok((updated, details))
    }

    async fn deactivate_entry(
        db: &DatabaseConnection,
        actor: &users::Model,
        id: Option<Uuid>,
    ) -> Result<Mutation, ServiceError> {
        Self::authorize(actor)?;

        let id = id.ok_or_else(|| ServiceError::Validation("Schedule id is required".to_string()))?;

        let existing = schedules::Entity::find_by_id(id)
            .one(db)
            .await?
            .filter(|entry| entry.is_active)
            .ok_or(ServiceError::NotFound("Schedule"))?;

        let mut entry: schedules::ActiveModel = existing.clone().into();
        entry.is_active = Set(false);
        entry.updated_at = Set(Utc::now().naive_utc());

        let deactivated = entry.update(db).await?;

        let details = json!({ "before": snapshot(&existing) });
        Ok((deactivated, details))
    }

    /// Audits a mutation whose input was rejected before it reached the service.
    ///
    /// A caller without a managing role gets `Forbidden` instead of the input error.
    pub async fn reject(
        db: &DatabaseConnection,
        actor: &users::Model,
        action: ActivityAction,
        error: ServiceError,
    ) -> ServiceError {
        let error = Self::authorize(actor).err().unwrap_or(error);
        Self::audit(db, actor, action, None, Err(&error)).await;
        error
    }

    /// Records the audit entry and notifies on success, for every mutation attempt
    async fn finish(
        db: &DatabaseConnection,
        notifier: &dyn ScheduleNotifier,
        actor: &users::Model,
        action: ActivityAction,
        entity_id: Option<Uuid>,
        result: Result<Mutation, ServiceError>,
    ) -> Result<schedules::Model, ServiceError> {
        Self::audit(db, actor, action, entity_id, result.as_ref()).await;

        let (entry, _) = result?;

        info!("Schedule {} {} by {}", entry.id, action.as_str(), actor.id);
        notifier.schedule_changed(&ScheduleNotice::new(action, actor.id, &entry));

        Ok(entry)
    }

    async fn audit(
        db: &DatabaseConnection,
        actor: &users::Model,
        action: ActivityAction,
        entity_id: Option<Uuid>,
        outcome: Result<&Mutation, &ServiceError>,
    ) {
        let (status, entity_id, details) = match outcome {
            Ok((entry, details)) => (ActivityStatus::Success, Some(entry.id), details.clone()),
            Err(e) => {
                if e.is_internal() {
                    error!("Schedule {} failed: {e}", action.as_str());
                }
                (
                    ActivityStatus::Failure,
                    entity_id,
                    json!({ "error": e.to_string() }),
                )
            }
        };

        ActivityLogService::record(
            db,
            NewActivity {
                user_id: Some(actor.id),
                action,
                entity_type: Self::ENTITY_TYPE,
                entity_id,
                status,
                details,
            },
        )
        .await;
    }
}

fn snapshot(entry: &schedules::Model) -> Value {
    serde_json::to_value(entry).unwrap_or_default()
}

fn missing_fields(input: &NewSchedule) -> String {
    let missing: Vec<&str> = [
        ("subjectId", input.subject_id.is_none()),
        ("date", input.date.is_none()),
        ("startTime", input.start_time.is_none()),
        ("endTime", input.end_time.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, is_missing)| is_missing.then_some(field))
    .collect();

    format!("Missing required fields: {}", missing.join(", "))
}
