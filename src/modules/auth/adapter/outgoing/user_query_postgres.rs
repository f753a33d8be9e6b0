use super::sea_orm_entity::users::{
    Column as UserColumn, Entity as UserEntity, UserRole, UserStatus,
};
use crate::auth::application::domain::UserAccount;
use crate::auth::application::ports::outgoing::user_query::{
    AccountFilter, UserQuery, UserQueryError,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct UserQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserQuery for UserQueryPostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserAccount>, UserQueryError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Ok(user.map(UserAccount::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserQueryError> {
        let user = UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Ok(user.map(UserAccount::from))
    }

    async fn count_by_username(&self, username: &str) -> Result<u64, UserQueryError> {
        UserEntity::find()
            .filter(UserColumn::Username.eq(username))
            .count(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))
    }

    async fn list_accounts(
        &self,
        filter: AccountFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<UserAccount>, UserQueryError> {
        let mut query = UserEntity::find();
        query = match filter {
            AccountFilter::All => query,
            AccountFilter::ByRole(role) => query.filter(UserColumn::Role.eq(UserRole::from(role))),
            AccountFilter::ByStatus(status) => {
                query.filter(UserColumn::Status.eq(UserStatus::from(status)))
            }
        };

        let users = query
            .order_by_desc(UserColumn::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Ok(users.into_iter().map(UserAccount::from).collect())
    }
}
