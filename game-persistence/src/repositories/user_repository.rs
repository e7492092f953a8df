use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use game_types::User;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            username: model.username,
            is_admin: model.is_admin,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user_model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(user_model.map(Self::model_to_user))
    }

    /// Look up a user together with the stored credential hash, for login.
    pub async fn find_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
        let user_model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(user_model.map(|model| {
            let hash = model.password_hash.clone();
            (Self::model_to_user(model), hash)
        }))
    }

    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User> {
        let user_id = Uuid::new_v4();
        let user_model = users::ActiveModel {
            id: sea_orm::ActiveValue::Set(user_id),
            username: sea_orm::ActiveValue::Set(username.to_string()),
            password_hash: sea_orm::ActiveValue::Set(password_hash.to_string()),
            is_admin: sea_orm::ActiveValue::Set(is_admin),
            created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        Users::insert(user_model).exec(&self.db).await?;

        // Fetch the created user
        let created_user = Users::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        Ok(Self::model_to_user(created_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> UserRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserRepository::new(db)
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = setup_test_db().await;

        let created_user = repo.create_user("alice", "hash", false).await.unwrap();
        assert_eq!(created_user.username, "alice");
        assert!(!created_user.is_admin);

        // Find by ID
        let found_user = repo.find_by_id(created_user.id).await.unwrap().unwrap();
        assert_eq!(found_user, created_user);

        // Find by username
        let found_by_name = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found_by_name.id, created_user.id);

        assert!(repo.find_by_username("bobby").await.unwrap().is_none());
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_credentials_lookup() {
        let repo = setup_test_db().await;
        repo.create_user("admin", "$argon2id$stub", true).await.unwrap();

        let (user, hash) = repo.find_credentials("admin").await.unwrap().unwrap();
        assert!(user.is_admin);
        assert_eq!(hash, "$argon2id$stub");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = setup_test_db().await;

        repo.create_user("carol", "hash", false).await.unwrap();
        assert!(repo.create_user("carol", "other", false).await.is_err());
    }
}
