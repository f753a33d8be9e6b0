use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::auth::application::domain::{AccountStatus, RefreshTokenRecord, Role, UserAccount};
use crate::auth::application::ports::outgoing::{
    AccountFilter, NewUserAccount, ProfileChanges, RefreshTokenRepository,
    RefreshTokenRepositoryError, UserQuery, UserQueryError, UserRepository, UserRepositoryError,
};

/// Shared in-memory store backing the query, repository and refresh-token
/// ports in service tests. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<Mutex<Vec<UserAccount>>>,
    refresh_tokens: Arc<Mutex<Vec<RefreshTokenRecord>>>,
    failure: Option<String>,
    fail_last_login: bool,
}

impl InMemoryUserStore {
    pub fn with_users(users: Vec<UserAccount>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn fail_last_login(mut self) -> Self {
        self.fail_last_login = true;
        self
    }

    pub fn users(&self) -> Vec<UserAccount> {
        self.users.lock().unwrap().clone()
    }

    pub fn user(&self, user_id: Uuid) -> Option<UserAccount> {
        self.users().into_iter().find(|u| u.id == user_id)
    }

    pub fn refresh_tokens(&self) -> Vec<RefreshTokenRecord> {
        self.refresh_tokens.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), String> {
        match &self.failure {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }

    fn modify<F>(&self, user_id: Uuid, change: F) -> Result<UserAccount, UserRepositoryError>
    where
        F: FnOnce(&mut UserAccount),
    {
        self.check_failure()
            .map_err(UserRepositoryError::DatabaseError)?;

        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(UserRepositoryError::UserNotFound)?;
        change(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl UserQuery for InMemoryUserStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserAccount>, UserQueryError> {
        self.check_failure().map_err(UserQueryError::DatabaseError)?;
        Ok(self.user(user_id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserQueryError> {
        self.check_failure().map_err(UserQueryError::DatabaseError)?;
        Ok(self.users().into_iter().find(|u| u.email == email))
    }

    async fn count_by_username(&self, username: &str) -> Result<u64, UserQueryError> {
        self.check_failure().map_err(UserQueryError::DatabaseError)?;
        Ok(self
            .users()
            .iter()
            .filter(|u| u.username == username)
            .count() as u64)
    }

    async fn list_accounts(
        &self,
        filter: AccountFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<UserAccount>, UserQueryError> {
        self.check_failure().map_err(UserQueryError::DatabaseError)?;

        let mut users: Vec<UserAccount> = self
            .users()
            .into_iter()
            .filter(|u| match filter {
                AccountFilter::All => true,
                AccountFilter::ByRole(role) => u.role == role,
                AccountFilter::ByStatus(status) => u.status == status,
            })
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(users
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn insert_user(&self, user: NewUserAccount) -> Result<UserAccount, UserRepositoryError> {
        self.check_failure()
            .map_err(UserRepositoryError::DatabaseError)?;

        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserRepositoryError::DuplicateEmail);
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(UserRepositoryError::DuplicateUsername);
        }

        let now = Utc::now();
        let account = UserAccount {
            id: user.id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: None,
            date_of_birth: None,
            gender: None,
            profile_picture: None,
            role: user.role,
            status: AccountStatus::Active,
            two_factor_auth: false,
            created_at: now,
            updated_at: now,
            last_login: None,
        };
        users.push(account.clone());
        Ok(account)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<UserAccount, UserRepositoryError> {
        if let Some(email) = &changes.email {
            let taken = self
                .users()
                .iter()
                .any(|u| &u.email == email && u.id != user_id);
            if taken {
                return Err(UserRepositoryError::DuplicateEmail);
            }
        }

        self.modify(user_id, |user| {
            if let Some(email) = changes.email {
                user.email = email;
            }
            if let Some(first_name) = changes.first_name {
                user.first_name = first_name;
            }
            if let Some(last_name) = changes.last_name {
                user.last_name = last_name;
            }
            if let Some(phone_number) = changes.phone_number {
                user.phone_number = Some(phone_number);
            }
            if let Some(gender) = changes.gender {
                user.gender = Some(gender);
            }
            if let Some(date_of_birth) = changes.date_of_birth {
                user.date_of_birth = Some(date_of_birth);
            }
        })
    }

    async fn update_profile_picture(
        &self,
        user_id: Uuid,
        profile_picture: String,
    ) -> Result<UserAccount, UserRepositoryError> {
        self.modify(user_id, |user| user.profile_picture = Some(profile_picture))
    }

    async fn update_role(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<UserAccount, UserRepositoryError> {
        self.modify(user_id, |user| user.role = role)
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        status: AccountStatus,
    ) -> Result<UserAccount, UserRepositoryError> {
        self.modify(user_id, |user| user.status = status)
    }

    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: String,
    ) -> Result<(), UserRepositoryError> {
        self.modify(user_id, |user| user.password_hash = password_hash)
            .map(|_| ())
    }

    async fn update_last_login(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        if self.fail_last_login {
            return Err(UserRepositoryError::DatabaseError(
                "last_login column locked".to_string(),
            ));
        }
        self.modify(user_id, |user| user.last_login = Some(at))
            .map(|_| ())
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryUserStore {
    async fn insert_refresh_token(
        &self,
        user_id: Uuid,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, RefreshTokenRepositoryError> {
        self.check_failure()
            .map_err(RefreshTokenRepositoryError::DatabaseError)?;

        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id,
            token,
            created_at: Utc::now(),
            expires_at,
            revoked_at: None,
        };
        self.refresh_tokens.lock().unwrap().push(record.clone());
        Ok(record)
    }
}
