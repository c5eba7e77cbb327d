pub mod activity_log;
pub mod error;
pub mod notify;
pub mod schedule;
pub mod schedule_visibility;
pub mod subgroup_resolver;
pub mod user;
