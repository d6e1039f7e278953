//! Initial schema.
//!
//! - `users`: accounts and password digests
//! - `groups`, `group_members`: drinking groups and their roles
//! - `drinks`, `drink_comments`: logged drinks and their threads
//! - `events`, `event_attendees`, `event_comments`: parties, answers, threads

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Name,
    PasswordHash,
    CreatedAt,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    Name,
    NameNorm,
    Description,
    Owner,
    CreatedAt,
}

#[derive(Iden)]
enum GroupMembers {
    Table,
    GroupId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    GroupId,
    CreatedBy,
    Name,
    Description,
    Location,
    StartAt,
    EndAt,
    CreatedAt,
}

#[derive(Iden)]
enum Drinks {
    Table,
    Id,
    UserId,
    GroupId,
    EventId,
    Name,
    DrinkType,
    Brand,
    VolumeMl,
    Location,
    PhotoUrl,
    Points,
    OccurredAt,
    CreatedAt,
}

#[derive(Iden)]
enum DrinkComments {
    Table,
    Id,
    DrinkId,
    UserId,
    Text,
    CreatedAt,
}

#[derive(Iden)]
enum EventAttendees {
    Table,
    EventId,
    UserId,
    Status,
    ConfirmedAt,
}

#[derive(Iden)]
enum EventComments {
    Table,
    Id,
    EventId,
    UserId,
    Text,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Groups
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Groups::Name).string().not_null())
                    .col(ColumnDef::new(Groups::NameNorm).string().not_null())
                    .col(ColumnDef::new(Groups::Description).string())
                    .col(ColumnDef::new(Groups::Owner).string().not_null())
                    .col(
                        ColumnDef::new(Groups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-groups-owner")
                            .from(Groups::Table, Groups::Owner)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-groups-owner-name_norm-unique")
                    .table(Groups::Table)
                    .col(Groups::Owner)
                    .col(Groups::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Group members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(GroupMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupMembers::GroupId).uuid().not_null())
                    .col(ColumnDef::new(GroupMembers::UserId).string().not_null())
                    .col(ColumnDef::new(GroupMembers::Role).string().not_null())
                    .col(
                        ColumnDef::new(GroupMembers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(GroupMembers::GroupId)
                            .col(GroupMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-group_members-group_id")
                            .from(GroupMembers::Table, GroupMembers::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-group_members-user_id")
                            .from(GroupMembers::Table, GroupMembers::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Events
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Events::GroupId).uuid().not_null())
                    .col(ColumnDef::new(Events::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Events::Name).string().not_null())
                    .col(ColumnDef::new(Events::Description).string())
                    .col(ColumnDef::new(Events::Location).string().not_null())
                    .col(
                        ColumnDef::new(Events::StartAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::EndAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-events-group_id")
                            .from(Events::Table, Events::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-events-created_by")
                            .from(Events::Table, Events::CreatedBy)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-events-group_id-start_at")
                    .table(Events::Table)
                    .col(Events::GroupId)
                    .col(Events::StartAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Drinks
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Drinks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Drinks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Drinks::UserId).string().not_null())
                    .col(ColumnDef::new(Drinks::GroupId).uuid().not_null())
                    .col(ColumnDef::new(Drinks::EventId).uuid())
                    .col(ColumnDef::new(Drinks::Name).string().not_null())
                    .col(ColumnDef::new(Drinks::DrinkType).string().not_null())
                    .col(ColumnDef::new(Drinks::Brand).string().not_null())
                    .col(ColumnDef::new(Drinks::VolumeMl).big_integer().not_null())
                    .col(ColumnDef::new(Drinks::Location).string())
                    .col(ColumnDef::new(Drinks::PhotoUrl).string().not_null())
                    .col(ColumnDef::new(Drinks::Points).double().not_null())
                    .col(
                        ColumnDef::new(Drinks::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Drinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-drinks-group_id")
                            .from(Drinks::Table, Drinks::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-drinks-event_id")
                            .from(Drinks::Table, Drinks::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-drinks-user_id")
                            .from(Drinks::Table, Drinks::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-drinks-group_id-occurred_at")
                    .table(Drinks::Table)
                    .col(Drinks::GroupId)
                    .col(Drinks::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-drinks-user_id-occurred_at")
                    .table(Drinks::Table)
                    .col(Drinks::UserId)
                    .col(Drinks::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Drink comments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DrinkComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrinkComments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DrinkComments::DrinkId).uuid().not_null())
                    .col(ColumnDef::new(DrinkComments::UserId).string().not_null())
                    .col(ColumnDef::new(DrinkComments::Text).text().not_null())
                    .col(
                        ColumnDef::new(DrinkComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-drink_comments-drink_id")
                            .from(DrinkComments::Table, DrinkComments::DrinkId)
                            .to(Drinks::Table, Drinks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Event attendees
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(EventAttendees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventAttendees::EventId).uuid().not_null())
                    .col(ColumnDef::new(EventAttendees::UserId).string().not_null())
                    .col(ColumnDef::new(EventAttendees::Status).string().not_null())
                    .col(
                        ColumnDef::new(EventAttendees::ConfirmedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(EventAttendees::EventId)
                            .col(EventAttendees::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-event_attendees-event_id")
                            .from(EventAttendees::Table, EventAttendees::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-event_attendees-user_id")
                            .from(EventAttendees::Table, EventAttendees::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Event comments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(EventComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventComments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventComments::EventId).uuid().not_null())
                    .col(ColumnDef::new(EventComments::UserId).string().not_null())
                    .col(ColumnDef::new(EventComments::Text).text().not_null())
                    .col(
                        ColumnDef::new(EventComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-event_comments-event_id")
                            .from(EventComments::Table, EventComments::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse creation order for FK dependencies.
        manager
            .drop_table(Table::drop().table(EventComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EventAttendees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DrinkComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
