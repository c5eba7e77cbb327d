use crate::entities::{
    activity_logs, groups, schedules, subgroups, subjects, user_groups, users, users::GroupIds,
};
use crate::services::notify::{ScheduleNotice, ScheduleNotifier};
use chrono::{NaiveDate, NaiveTime, Utc};
use models::{days::DayOfWeek, role::Role};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, Database, DatabaseConnection, Schema,
};
use std::sync::Mutex;
use uuid::Uuid;

/// An in-memory SQLite database with every table created
pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Parents before children so foreign keys resolve
    let statements = [
        schema.create_table_from_entity(groups::Entity),
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(subjects::Entity),
        schema.create_table_from_entity(subgroups::Entity),
        schema.create_table_from_entity(user_groups::Entity),
        schema.create_table_from_entity(schedules::Entity),
        schema.create_table_from_entity(activity_logs::Entity),
    ];

    for statement in statements {
        db.execute(backend.build(&statement)).await.unwrap();
    }

    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub async fn insert_group(db: &DatabaseConnection, name: &str) -> groups::Model {
    groups::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        semester: Set(1),
        year: Set(2024),
        is_active: Set(true),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_user(
    db: &DatabaseConnection,
    role: Role,
    group_id: Option<Uuid>,
    mentored: Vec<Uuid>,
) -> users::Model {
    let id = Uuid::new_v4();
    users::ActiveModel {
        id: Set(id),
        auth_subject: Set(format!("sub-{id}")),
        name: Set(format!("{role} {id}")),
        role: Set(role),
        group_id: Set(group_id),
        mentored_group_ids: Set(GroupIds(mentored)),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_subject(
    db: &DatabaseConnection,
    name: &str,
    lecturer_id: Option<Uuid>,
) -> subjects::Model {
    subjects::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        lecturer_id: Set(lecturer_id),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_subgroup(
    db: &DatabaseConnection,
    group_id: Uuid,
    subject_id: Option<Uuid>,
    number: i32,
    is_active: bool,
) -> subgroups::Model {
    subgroups::ActiveModel {
        id: Set(Uuid::new_v4()),
        group_id: Set(group_id),
        subject_id: Set(subject_id),
        number: Set(number),
        is_active: Set(is_active),
    }
    .insert(db)
    .await
    .unwrap()
}

/// Adds a membership; `numbers` are commerce, tutorial, finance and systems thinking
pub async fn insert_membership(
    db: &DatabaseConnection,
    user_id: Uuid,
    group_id: Uuid,
    numbers: [Option<i32>; 4],
) -> user_groups::Model {
    let [commerce, tutorial, finance, systems_thinking] = numbers;
    user_groups::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        group_id: Set(group_id),
        commerce_subgroup: Set(commerce),
        tutorial_subgroup: Set(tutorial),
        finance_subgroup: Set(finance),
        systems_thinking_subgroup: Set(systems_thinking),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_schedule(
    db: &DatabaseConnection,
    subject_id: Uuid,
    group_id: Option<Uuid>,
    subgroup_id: Option<Uuid>,
    on: NaiveDate,
    start: NaiveTime,
) -> schedules::Model {
    let now = Utc::now().naive_utc();
    schedules::ActiveModel {
        id: Set(Uuid::new_v4()),
        subject_id: Set(subject_id),
        group_id: Set(group_id),
        subgroup_id: Set(subgroup_id),
        date: Set(on),
        day_of_week: Set(DayOfWeek::from_date(on)),
        start_time: Set(start),
        end_time: Set(start + chrono::Duration::minutes(90)),
        location: Set(None),
        event_type: Set(None),
        description: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

/// Notifier that keeps every notice it receives
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<ScheduleNotice>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.notices.lock().unwrap().len()
    }
}

impl ScheduleNotifier for RecordingNotifier {
    fn schedule_changed(&self, notice: &ScheduleNotice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}
