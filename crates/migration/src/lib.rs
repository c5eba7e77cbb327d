pub use sea_orm_migration::prelude::*;

mod m20241001_add_indexes;
mod m20241001_create_all_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241001_create_all_tables::Migration),
            Box::new(m20241001_add_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::Database;

    #[async_std::test]
    async fn test_migrations_apply_and_revert() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let manager = SchemaManager::new(&db);

        Migrator::up(&db, None).await.unwrap();
        assert!(manager.has_table("schedules").await.unwrap());
        assert!(manager.has_table("activity_logs").await.unwrap());

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("schedules").await.unwrap());
    }
}
