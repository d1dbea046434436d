//! Account service: profile mirror and session lookup.
//!
//! Authentication itself happens at the external identity provider; this
//! service only maintains the denormalized profile mirror and resolves
//! session tokens to accounts.

use chrono::Utc;
use sea_orm::{Set, Unchanged};
use serde::Deserialize;
use validator::Validate;

use transitionflow_common::{AppError, AppResult, IdGenerator};
use transitionflow_db::{entities::account, repositories::AccountRepository};

/// Profile data received from the identity provider at login-callback time.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SyncProfileInput {
    #[validate(length(min = 1, max = 64))]
    pub provider_id: String,
    #[validate(length(min = 1, max = 128))]
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    account_repo: AccountRepository,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(account_repo: AccountRepository) -> Self {
        Self {
            account_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Upsert the profile mirror for a provider identity.
    ///
    /// A new account gets a fresh session token; an existing account keeps
    /// its token and has the mirrored profile fields refreshed.
    pub async fn sync_profile(&self, input: SyncProfileInput) -> AppResult<account::Model> {
        input.validate()?;

        if let Some(existing) = self
            .account_repo
            .find_by_provider_id(&input.provider_id)
            .await?
        {
            let model = account::ActiveModel {
                id: Unchanged(existing.id),
                username: Set(input.username),
                display_name: Set(input.display_name),
                avatar_url: Set(input.avatar_url),
                updated_at: Set(Some(Utc::now().into())),
                ..Default::default()
            };
            return self.account_repo.update(model).await;
        }

        let model = account::ActiveModel {
            id: Set(self.id_gen.generate()),
            provider_id: Set(input.provider_id),
            username: Set(input.username),
            display_name: Set(input.display_name),
            avatar_url: Set(input.avatar_url),
            token: Set(Some(self.id_gen.generate_token())),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        self.account_repo.create(model).await
    }

    /// Resolve a session token to an account.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<account::Model> {
        self.account_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get an account by id.
    pub async fn get(&self, id: &str) -> AppResult<account::Model> {
        self.account_repo.get_by_id(id).await
    }
}
