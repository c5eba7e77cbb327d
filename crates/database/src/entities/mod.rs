pub mod activity_logs;
pub mod groups;
pub mod schedules;
pub mod subgroups;
pub mod subjects;
pub mod user_groups;
pub mod users;
