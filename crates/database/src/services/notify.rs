use crate::{entities::schedules, services::activity_log::ActivityAction};
use chrono::{NaiveDate, NaiveTime};
use log::info;
use serde::Serialize;
use uuid::Uuid;

/// Structured description of a schedule change, handed to notifiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleNotice {
    pub action: ActivityAction,
    pub actor_id: Uuid,
    pub schedule_id: Uuid,
    pub subject_id: Uuid,
    pub group_id: Option<Uuid>,
    pub subgroup_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: Option<String>,
}

impl ScheduleNotice {
    pub fn new(action: ActivityAction, actor_id: Uuid, schedule: &schedules::Model) -> Self {
        Self {
            action,
            actor_id,
            schedule_id: schedule.id,
            subject_id: schedule.subject_id,
            group_id: schedule.group_id,
            subgroup_id: schedule.subgroup_id,
            date: schedule.date,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            location: schedule.location.clone(),
        }
    }
}

/// Fans out schedule changes to interested parties.
///
/// Dispatch is fire-and-forget: implementations must not block the caller
/// and handle their own failures.
pub trait ScheduleNotifier: Send + Sync {
    fn schedule_changed(&self, notice: &ScheduleNotice);
}

/// Notifier that only writes changes to the log
pub struct LogNotifier;

impl ScheduleNotifier for LogNotifier {
    fn schedule_changed(&self, notice: &ScheduleNotice) {
        info!(
            "Schedule {} {} by {}: subject {}, group {:?}, subgroup {:?}, {} {}-{}",
            notice.schedule_id,
            notice.action.as_str(),
            notice.actor_id,
            notice.subject_id,
            notice.group_id,
            notice.subgroup_id,
            notice.date,
            notice.start_time,
            notice.end_time,
        );
    }
}
