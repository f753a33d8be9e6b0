use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;
use uuid::Uuid;

use super::sea_orm_entity::refresh_tokens::{
    ActiveModel as RefreshTokenActiveModel, Model as RefreshTokenModel,
};
use crate::auth::application::domain::RefreshTokenRecord;
use crate::auth::application::ports::outgoing::refresh_token_repository::{
    RefreshTokenRepository, RefreshTokenRepositoryError,
};

#[derive(Clone, Debug)]
pub struct RefreshTokenRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl RefreshTokenRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_to_record(model: RefreshTokenModel) -> RefreshTokenRecord {
        RefreshTokenRecord {
            id: model.id,
            user_id: model.user_id,
            token: model.token,
            created_at: model.created_at.with_timezone(&Utc),
            expires_at: model.expires_at.with_timezone(&Utc),
            revoked_at: model.revoked_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for RefreshTokenRepositoryPostgres {
    async fn insert_refresh_token(
        &self,
        user_id: Uuid,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, RefreshTokenRepositoryError> {
        let active_token = RefreshTokenActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token: Set(token),
            created_at: NotSet,
            expires_at: Set(expires_at.fixed_offset()),
            revoked_at: Set(None),
        };

        let inserted = active_token
            .insert(&*self.db)
            .await
            .map_err(|e| RefreshTokenRepositoryError::DatabaseError(e.to_string()))?;

        Ok(Self::map_to_record(inserted))
    }
}
