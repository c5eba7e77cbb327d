use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create groups table
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Groups::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Groups::Description).text())
                    .col(ColumnDef::new(Groups::Semester).small_integer().not_null())
                    .col(ColumnDef::new(Groups::Year).small_integer().not_null())
                    .col(
                        ColumnDef::new(Groups::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::AuthSubject)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Role).text().not_null())
                    .col(ColumnDef::new(Users::GroupId).uuid())
                    .col(
                        ColumnDef::new(Users::MentoredGroupIds)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users-group_id")
                            .from(Users::Table, Users::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create subjects table
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subjects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::LecturerId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subjects-lecturer_id")
                            .from(Subjects::Table, Subjects::LecturerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create subgroups table
        manager
            .create_table(
                Table::create()
                    .table(Subgroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subgroups::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subgroups::GroupId).uuid().not_null())
                    .col(ColumnDef::new(Subgroups::SubjectId).uuid())
                    .col(ColumnDef::new(Subgroups::Number).integer().not_null())
                    .col(
                        ColumnDef::new(Subgroups::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subgroups-group_id")
                            .from(Subgroups::Table, Subgroups::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subgroups-subject_id")
                            .from(Subgroups::Table, Subgroups::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create user_groups table, one row per membership
        manager
            .create_table(
                Table::create()
                    .table(UserGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserGroups::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserGroups::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserGroups::GroupId).uuid().not_null())
                    .col(ColumnDef::new(UserGroups::CommerceSubgroup).integer())
                    .col(ColumnDef::new(UserGroups::TutorialSubgroup).integer())
                    .col(ColumnDef::new(UserGroups::FinanceSubgroup).integer())
                    .col(ColumnDef::new(UserGroups::SystemsThinkingSubgroup).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_groups-user_id")
                            .from(UserGroups::Table, UserGroups::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_groups-group_id")
                            .from(UserGroups::Table, UserGroups::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create schedules table
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::GroupId).uuid())
                    .col(ColumnDef::new(Schedules::SubgroupId).uuid())
                    .col(ColumnDef::new(Schedules::Date).date().not_null())
                    .col(ColumnDef::new(Schedules::DayOfWeek).text().not_null())
                    .col(ColumnDef::new(Schedules::StartTime).time().not_null())
                    .col(ColumnDef::new(Schedules::EndTime).time().not_null())
                    .col(ColumnDef::new(Schedules::Location).string())
                    .col(ColumnDef::new(Schedules::EventType).string())
                    .col(ColumnDef::new(Schedules::Description).text())
                    .col(
                        ColumnDef::new(Schedules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Schedules::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Schedules::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-subject_id")
                            .from(Schedules::Table, Schedules::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-group_id")
                            .from(Schedules::Table, Schedules::GroupId)
                            .to(Groups::Table, Groups::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-subgroup_id")
                            .from(Schedules::Table, Schedules::SubgroupId)
                            .to(Subgroups::Table, Subgroups::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create activity_logs table (append-only audit trail)
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLogs::UserId).uuid())
                    .col(ColumnDef::new(ActivityLogs::Action).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::EntityType).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::EntityId).uuid())
                    .col(ColumnDef::new(ActivityLogs::Status).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Details).json().not_null())
                    .col(
                        ColumnDef::new(ActivityLogs::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order to respect foreign key constraints
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UserGroups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subgroups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    Name,
    Description,
    Semester,
    Year,
    IsActive,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    AuthSubject,
    Name,
    Role,
    GroupId,
    MentoredGroupIds,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Id,
    Name,
    LecturerId,
}

#[derive(Iden)]
enum Subgroups {
    Table,
    Id,
    GroupId,
    SubjectId,
    Number,
    IsActive,
}

#[derive(Iden)]
enum UserGroups {
    Table,
    Id,
    UserId,
    GroupId,
    CommerceSubgroup,
    TutorialSubgroup,
    FinanceSubgroup,
    SystemsThinkingSubgroup,
}

#[derive(Iden)]
enum Schedules {
    Table,
    Id,
    SubjectId,
    GroupId,
    SubgroupId,
    Date,
    DayOfWeek,
    StartTime,
    EndTime,
    Location,
    EventType,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    Action,
    EntityType,
    EntityId,
    Status,
    Details,
    CreatedAt,
}
