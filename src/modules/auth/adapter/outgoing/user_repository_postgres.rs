use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::auth::application::domain::{AccountStatus, Role, UserAccount};
use crate::auth::application::ports::outgoing::user_repository::{
    NewUserAccount, ProfileChanges, UserRepository, UserRepositoryError,
};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity,
    Model as UserModel, UserStatus,
};

#[derive(Clone, Debug)]
pub struct UserRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl UserRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, user_id: Uuid) -> Result<UserModel, UserRepositoryError> {
        UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(UserRepositoryError::UserNotFound)
    }

    async fn save(&self, active_user: UserActiveModel) -> Result<UserAccount, UserRepositoryError> {
        let updated = active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(updated.into())
    }

    /// A unique violation on insert is either the email or the username index.
    async fn classify_duplicate(&self, email: &str) -> UserRepositoryError {
        let email_taken = UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .count(&*self.db)
            .await;

        match email_taken {
            Ok(count) if count > 0 => UserRepositoryError::DuplicateEmail,
            Ok(_) => UserRepositoryError::DuplicateUsername,
            Err(e) => UserRepositoryError::DatabaseError(e.to_string()),
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryPostgres {
    async fn insert_user(&self, user: NewUserAccount) -> Result<UserAccount, UserRepositoryError> {
        let email = user.email.clone();
        let active_user = UserActiveModel {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            phone_number: Set(None),
            date_of_birth: Set(None),
            gender: Set(None),
            profile_picture: Set(None),
            role: Set(user.role.into()),
            status: Set(UserStatus::Active),
            two_factor_auth: Set(false),
            created_at: NotSet,
            updated_at: NotSet,
            last_login: Set(None),
        };

        match active_user.insert(&*self.db).await {
            Ok(inserted) => Ok(inserted.into()),
            Err(e) if is_unique_violation(&e) => Err(self.classify_duplicate(&email).await),
            Err(e) => {
                error!(error = %e, "Failed to insert user");
                Err(UserRepositoryError::DatabaseError(e.to_string()))
            }
        }
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<UserAccount, UserRepositoryError> {
        let user = self.find_model(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        if let Some(email) = changes.email {
            active_user.email = Set(email);
        }
        if let Some(first_name) = changes.first_name {
            active_user.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active_user.last_name = Set(last_name);
        }
        if let Some(phone_number) = changes.phone_number {
            active_user.phone_number = Set(Some(phone_number));
        }
        if let Some(gender) = changes.gender {
            active_user.gender = Set(Some(gender));
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            active_user.date_of_birth = Set(Some(date_of_birth));
        }

        // Email is the only unique column a profile update can touch.
        match active_user.update(&*self.db).await {
            Ok(updated) => Ok(updated.into()),
            Err(e) if is_unique_violation(&e) => Err(UserRepositoryError::DuplicateEmail),
            Err(e) => Err(UserRepositoryError::DatabaseError(e.to_string())),
        }
    }

    async fn update_profile_picture(
        &self,
        user_id: Uuid,
        profile_picture: String,
    ) -> Result<UserAccount, UserRepositoryError> {
        let user = self.find_model(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.profile_picture = Set(Some(profile_picture));

        self.save(active_user).await
    }

    async fn update_role(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<UserAccount, UserRepositoryError> {
        let user = self.find_model(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.role = Set(role.into());

        self.save(active_user).await
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        status: AccountStatus,
    ) -> Result<UserAccount, UserRepositoryError> {
        let user = self.find_model(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.status = Set(status.into());

        self.save(active_user).await
    }

    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: String,
    ) -> Result<(), UserRepositoryError> {
        let result = UserEntity::update_many()
            .col_expr(UserColumn::PasswordHash, Expr::value(password_hash))
            .col_expr(UserColumn::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(UserColumn::Id.eq(user_id))
            .exec(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(UserRepositoryError::UserNotFound);
        }
        Ok(())
    }

    async fn update_last_login(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        let result = UserEntity::update_many()
            .col_expr(UserColumn::LastLogin, Expr::value(at.fixed_offset()))
            .filter(UserColumn::Id.eq(user_id))
            .exec(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(UserRepositoryError::UserNotFound);
        }
        Ok(())
    }
}
