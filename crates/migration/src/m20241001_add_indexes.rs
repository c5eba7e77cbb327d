use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A user belongs to a group at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_user_groups_user_group")
                    .table(UserGroups::Table)
                    .col(UserGroups::UserId)
                    .col(UserGroups::GroupId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Subgroup numbers are unique within {group, subject}
        manager
            .create_index(
                Index::create()
                    .name("idx_subgroups_group_subject_number")
                    .table(Subgroups::Table)
                    .col(Subgroups::GroupId)
                    .col(Subgroups::SubjectId)
                    .col(Subgroups::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listings are always ordered by date, then start time
        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_date_start_time")
                    .table(Schedules::Table)
                    .col(Schedules::Date)
                    .col(Schedules::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_group_id")
                    .table(Schedules::Table)
                    .col(Schedules::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_subject_id")
                    .table(Schedules::Table)
                    .col(Schedules::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subjects_lecturer_id")
                    .table(Subjects::Table)
                    .col(Subjects::LecturerId)
                    .to_owned(),
            )
            .await?;

        // Audit history lookups by entity
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_entity")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::EntityType)
                    .col(ActivityLogs::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_activity_logs_entity",
            "idx_subjects_lecturer_id",
            "idx_schedules_subject_id",
            "idx_schedules_group_id",
            "idx_schedules_date_start_time",
            "idx_subgroups_group_subject_number",
            "idx_user_groups_user_group",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum UserGroups {
    Table,
    UserId,
    GroupId,
}

#[derive(Iden)]
enum Subgroups {
    Table,
    GroupId,
    SubjectId,
    Number,
}

#[derive(Iden)]
enum Schedules {
    Table,
    Date,
    StartTime,
    GroupId,
    SubjectId,
}

#[derive(Iden)]
enum Subjects {
    Table,
    LecturerId,
}

#[derive(Iden)]
enum ActivityLogs {
    Table,
    EntityType,
    EntityId,
}
