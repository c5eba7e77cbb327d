use database::services::notify::ScheduleNotifier;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: Arc<dyn ScheduleNotifier>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, notifier: Arc<dyn ScheduleNotifier>) -> Self {
        Self { db, notifier }
    }
}
