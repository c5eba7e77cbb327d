use crate::entities::{schedules, subgroups, subjects, user_groups};
use models::visibility::{StudentScope, VisibilityScope};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
    QueryTrait,
};
use uuid::Uuid;

pub struct ScheduleVisibility;

impl ScheduleVisibility {
    /// Builds the schedule query condition for a visibility scope
    pub async fn condition(
        db: &DatabaseConnection,
        scope: &VisibilityScope,
    ) -> Result<Condition, DbErr> {
        let mut condition = Condition::all();

        if !scope.include_inactive {
            condition = condition.add(schedules::Column::IsActive.eq(true));
        }

        if let Some(id) = scope.schedule_id {
            condition = condition.add(schedules::Column::Id.eq(id));
        }

        if let Some(subject_id) = scope.subject_id {
            condition = condition.add(schedules::Column::SubjectId.eq(subject_id));
        }

        if let Some(group_id) = scope.group_id {
            condition = condition.add(schedules::Column::GroupId.eq(group_id));
        }

        if let Some(date) = scope.date {
            condition = condition.add(schedules::Column::Date.eq(date));
        }

        if let Some(from) = scope.from {
            condition = condition.add(schedules::Column::Date.gte(from));
        }

        if let Some(lecturer_id) = scope.lecturer_id {
            let lectured_subjects = subjects::Entity::find()
                .select_only()
                .column(subjects::Column::Id)
                .filter(subjects::Column::LecturerId.eq(lecturer_id))
                .into_query();

            condition = condition.add(schedules::Column::SubjectId.in_subquery(lectured_subjects));
        }

        // An empty list matches nothing
        if let Some(group_ids) = &scope.mentored_group_ids {
            condition = condition.add(schedules::Column::GroupId.is_in(group_ids.clone()));
        }

        if let Some(student) = scope.student {
            let subgroup_ids = Self::student_subgroup_ids(db, student).await?;

            let mut subgroup_condition =
                Condition::any().add(schedules::Column::SubgroupId.is_null());
            if !subgroup_ids.is_empty() {
                subgroup_condition =
                    subgroup_condition.add(schedules::Column::SubgroupId.is_in(subgroup_ids));
            }

            condition = condition.add(subgroup_condition);
        }

        Ok(condition)
    }

    /// Subgroups a student is assigned to in their home group.
    ///
    /// Membership stores subgroup numbers, while schedule entries reference
    /// subgroups by id, so the numbers are matched against the active
    /// subgroups of the group. A number matches both group-wide and
    /// subject-scoped subgroups; the entry's subject narrows it further.
    pub async fn student_subgroup_ids(
        db: &DatabaseConnection,
        student: StudentScope,
    ) -> Result<Vec<Uuid>, DbErr> {
        let membership = user_groups::Entity::find()
            .filter(user_groups::Column::UserId.eq(student.student_id))
            .filter(user_groups::Column::GroupId.eq(student.group_id))
            .one(db)
            .await?;

        let numbers = membership
            .map(|m| m.assignments().numbers())
            .unwrap_or_default();

        if numbers.is_empty() {
            return Ok(vec![]);
        }

        subgroups::Entity::find()
            .select_only()
            .column(subgroups::Column::Id)
            .filter(subgroups::Column::GroupId.eq(student.group_id))
            .filter(subgroups::Column::Number.is_in(numbers))
            .filter(subgroups::Column::IsActive.eq(true))
            .into_tuple::<Uuid>()
            .all(db)
            .await
    }
}
