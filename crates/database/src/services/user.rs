use crate::entities::users;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

pub struct UserService;

impl UserService {
    /// Looks up the user an identity-provider subject belongs to
    pub async fn find_by_subject(
        db: &DatabaseConnection,
        subject: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::AuthSubject.eq(subject))
            .one(db)
            .await
    }
}
