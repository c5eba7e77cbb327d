use crate::role::Role;
use chrono::NaiveDate;
use uuid::Uuid;

/// The identity a schedule query is evaluated for
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    pub id: Uuid,
    pub role: Role,
    /// Home group, meaningful for students
    pub group_id: Option<Uuid>,
    pub mentored_group_ids: Vec<Uuid>,
}

/// Filters a caller passes explicitly when listing schedule entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleFilters {
    pub subject_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    /// Only entries on or after this date
    pub from: Option<NaiveDate>,
    /// Scope to subjects the viewer lectures regardless of role
    pub lector: bool,
    /// Scope to groups the viewer mentors regardless of role
    pub mentor: bool,
}

/// Subgroup restriction applied to a student in their home group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentScope {
    pub student_id: Uuid,
    pub group_id: Uuid,
}

/// Everything a schedule query must be restricted by for one viewer.
///
/// Built by [`VisibilityScope::build`] from the viewer's role and the
/// caller's filters; turned into a store query by the database layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityScope {
    pub schedule_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    /// Subject must be lectured by this user
    pub lecturer_id: Option<Uuid>,
    /// Group must be one of these
    pub mentored_group_ids: Option<Vec<Uuid>>,
    /// Entry must be whole-group or in one of the student's subgroups
    pub student: Option<StudentScope>,
    pub include_inactive: bool,
}

impl VisibilityScope {
    pub fn build(viewer: &Viewer, filters: &ScheduleFilters) -> Self {
        let mut scope = Self {
            subject_id: filters.subject_id,
            group_id: filters.group_id,
            date: filters.date,
            from: filters.from,
            ..Self::default()
        };

        if viewer.role == Role::Student
            && let Some(home_group) = viewer.group_id
        {
            scope.group_id = Some(home_group);
            scope.student = Some(StudentScope {
                student_id: viewer.id,
                group_id: home_group,
            });
        }

        if viewer.role == Role::Lecturer || filters.lector {
            scope.lecturer_id = Some(viewer.id);
        }

        if viewer.role == Role::Mentor || filters.mentor {
            scope.mentored_group_ids = Some(viewer.mentored_group_ids.clone());
        }

        scope
    }

    /// Scope for looking up a single entry by id, inactive entries included
    pub fn for_entry(viewer: &Viewer, schedule_id: Uuid) -> Self {
        Self {
            schedule_id: Some(schedule_id),
            include_inactive: true,
            ..Self::build(viewer, &ScheduleFilters::default())
        }
    }

    /// Whether this scope applies no role-derived restriction
    pub fn is_unrestricted(&self) -> bool {
        self.lecturer_id.is_none() && self.mentored_group_ids.is_none() && self.student.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(role: Role) -> Viewer {
        Viewer {
            id: Uuid::new_v4(),
            role,
            group_id: None,
            mentored_group_ids: vec![],
        }
    }

    #[test]
    fn test_admin_keeps_explicit_filters_only() {
        let group = Uuid::new_v4();
        let subject = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let filters = ScheduleFilters {
            subject_id: Some(subject),
            group_id: Some(group),
            date: Some(date),
            ..Default::default()
        };

        let scope = VisibilityScope::build(&viewer(Role::Admin), &filters);

        assert_eq!(scope.subject_id, Some(subject));
        assert_eq!(scope.group_id, Some(group));
        assert_eq!(scope.date, Some(date));
        assert!(scope.is_unrestricted());
        assert!(!scope.include_inactive);
    }

    #[test]
    fn test_student_is_forced_into_home_group() {
        let home = Uuid::new_v4();
        let mut student = viewer(Role::Student);
        student.group_id = Some(home);
        let filters = ScheduleFilters {
            group_id: Some(Uuid::new_v4()),
            ..Default::default()
        };

        let scope = VisibilityScope::build(&student, &filters);

        assert_eq!(scope.group_id, Some(home));
        assert_eq!(
            scope.student,
            Some(StudentScope {
                student_id: student.id,
                group_id: home,
            })
        );
    }

    #[test]
    fn test_student_without_home_group_has_no_subgroup_scope() {
        let scope = VisibilityScope::build(&viewer(Role::Student), &ScheduleFilters::default());
        assert!(scope.student.is_none());
        assert!(scope.group_id.is_none());
    }

    #[test]
    fn test_lecturer_scoped_by_role_or_flag() {
        let lecturer = viewer(Role::Lecturer);
        let scope = VisibilityScope::build(&lecturer, &ScheduleFilters::default());
        assert_eq!(scope.lecturer_id, Some(lecturer.id));

        let admin = viewer(Role::Admin);
        let filters = ScheduleFilters {
            lector: true,
            ..Default::default()
        };
        let scope = VisibilityScope::build(&admin, &filters);
        assert_eq!(scope.lecturer_id, Some(admin.id));
    }

    #[test]
    fn test_mentor_scoped_to_mentored_groups() {
        let groups = vec![Uuid::new_v4(), Uuid::new_v4()];
        let mut mentor = viewer(Role::Mentor);
        mentor.mentored_group_ids = groups.clone();

        let scope = VisibilityScope::build(&mentor, &ScheduleFilters::default());
        assert_eq!(scope.mentored_group_ids, Some(groups));

        let scope = VisibilityScope::build(&viewer(Role::Mentor), &ScheduleFilters::default());
        assert_eq!(scope.mentored_group_ids, Some(vec![]));
    }

    #[test]
    fn test_unlisted_roles_are_unrestricted() {
        for role in [
            Role::Assistant,
            Role::CoLecturer,
            Role::EducationOfficeHead,
            Role::DepartmentAdmin,
        ] {
            let scope = VisibilityScope::build(&viewer(role), &ScheduleFilters::default());
            assert!(scope.is_unrestricted(), "{role}");
        }
    }

    #[test]
    fn test_entry_scope_includes_inactive() {
        let id = Uuid::new_v4();
        let scope = VisibilityScope::for_entry(&viewer(Role::Admin), id);
        assert_eq!(scope.schedule_id, Some(id));
        assert!(scope.include_inactive);
    }
}
