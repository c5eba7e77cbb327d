use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use database::{
    entities::activity_logs,
    services::schedule::{NewSchedule, ScheduleChanges, ScheduleDetails},
};
use models::visibility::ScheduleFilters;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScheduleQueryParams {
    pub subject_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    /// Only entries on or after this date
    pub from: Option<NaiveDate>,
    /// Only subjects the caller lectures
    #[serde(default)]
    pub lector: bool,
    /// Only groups the caller mentors
    #[serde(default)]
    pub mentor: bool,
    pub limit: Option<u64>,
}

impl ScheduleQueryParams {
    pub fn filters(&self) -> ScheduleFilters {
        ScheduleFilters {
            subject_id: self.subject_id,
            group_id: self.group_id,
            date: self.date,
            from: self.from,
            lector: self.lector,
            mentor: self.mentor,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteScheduleParams {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<Uuid>,
}

/// Reads an optional id. Text that is not a UUID becomes the nil id, which
/// no row carries, so it is reported as not found rather than malformed.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    Ok(raw
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| Uuid::parse_str(raw.trim()).unwrap_or(Uuid::nil())))
}

/// A subgroup reference as sent by clients: an ordinal, `"none"`, or a subgroup id.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SubgroupRefInput {
    Number(i64),
    Text(String),
}

impl SubgroupRefInput {
    pub fn into_raw(self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub subject_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: Option<Uuid>,
    pub subgroup_id: Option<SubgroupRefInput>,
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "10:30:00")]
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub description: Option<String>,
}

impl From<CreateScheduleRequest> for NewSchedule {
    fn from(request: CreateScheduleRequest) -> Self {
        NewSchedule {
            subject_id: request.subject_id,
            group_id: request.group_id,
            subgroup: request.subgroup_id.map(SubgroupRefInput::into_raw),
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            location: request.location,
            event_type: request.event_type,
            description: request.description,
        }
    }
}

/// Fields to change on an existing entry; omitted fields stay as they are
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub subject_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: Option<Uuid>,
    pub subgroup_id: Option<SubgroupRefInput>,
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "10:30:00")]
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateScheduleRequest> for ScheduleChanges {
    fn from(request: UpdateScheduleRequest) -> Self {
        ScheduleChanges {
            id: request.id,
            subject_id: request.subject_id,
            group_id: request.group_id,
            subgroup: request.subgroup_id.map(SubgroupRefInput::into_raw),
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            location: request.location,
            event_type: request.event_type,
            description: request.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Summary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub subject: Option<Summary>,
    pub group_id: Option<Uuid>,
    pub group: Option<Summary>,
    pub subgroup_id: Option<Uuid>,
    pub date: NaiveDate,
    pub day_of_week: String,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:30:00")]
    pub end_time: NaiveTime,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ScheduleDetails> for ScheduleResponse {
    fn from((entry, subject, group): ScheduleDetails) -> Self {
        Self {
            id: entry.id,
            subject_id: entry.subject_id,
            subject: subject.map(|s| Summary {
                id: s.id,
                name: s.name,
            }),
            group_id: entry.group_id,
            group: group.map(|g| Summary {
                id: g.id,
                name: g.name,
            }),
            subgroup_id: entry.subgroup_id,
            date: entry.date,
            day_of_week: entry.day_of_week.to_string(),
            start_time: entry.start_time,
            end_time: entry.end_time,
            location: entry.location,
            event_type: entry.event_type,
            description: entry.description,
            is_active: entry.is_active,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub status: String,
    #[schema(value_type = Object)]
    pub details: Value,
    pub created_at: NaiveDateTime,
}

impl From<activity_logs::Model> for ActivityResponse {
    fn from(log: activity_logs::Model) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            action: log.action,
            status: log.status,
            details: log.details,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    pub id: Uuid,
}
