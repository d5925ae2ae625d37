//! Account lifecycle: registration, login, profiles.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use lifelink_auth::jwt::JwtEncoder;
use lifelink_auth::password::PasswordHasher;
use lifelink_core::error::AppError;
use lifelink_core::types::geo::GeoPoint;
use lifelink_database::repositories::user::UserRepository;
use lifelink_entity::blood::BloodType;
use lifelink_entity::notification::NotificationMessage;
use lifelink_entity::user::{CreateUser, UpdateProfile, User, UserRole};

use crate::context::RequestContext;
use crate::notification::NotificationDispatcher;

/// Input for registering a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Requested role.
    pub role: UserRole,
    /// Blood type (donors).
    pub blood_type: Option<BloodType>,
}

/// A user together with a freshly issued access token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    /// The authenticated user.
    pub user: User,
    /// Signed JWT access token.
    pub access_token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Manages accounts and profiles.
#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    dispatcher: Arc<NotificationDispatcher>,
    hasher: PasswordHasher,
    encoder: JwtEncoder,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        dispatcher: Arc<NotificationDispatcher>,
        hasher: PasswordHasher,
        encoder: JwtEncoder,
    ) -> Self {
        Self {
            user_repo,
            dispatcher,
            hasher,
            encoder,
        }
    }

    /// Registers a new account and issues its first access token.
    ///
    /// The hasher enforces the password policy. Sends a welcome
    /// notification; welcome delivery is best-effort and never fails the
    /// registration.
    pub async fn register(&self, input: RegisterUser) -> Result<AuthenticatedUser, AppError> {
        if !input.email.contains('@') {
            return Err(AppError::validation("Invalid email address"));
        }

        let password_hash = self.hasher.hash_password(&input.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                name: input.name,
                email: input.email,
                password_hash,
                phone: input.phone,
                role: input.role,
                blood_type: input.blood_type,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "New user registered");

        let dispatcher = Arc::clone(&self.dispatcher);
        let welcome = NotificationMessage::welcome(&user.name);
        let user_id = user.id;
        tokio::spawn(async move {
            dispatcher.notify_one(user_id, &welcome).await;
        });

        self.issue_token(user)
    }

    /// Authenticates by email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AppError> {
        // Same error for unknown email and wrong password.
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }
        if !user.is_active {
            return Err(AppError::forbidden("Account is deactivated"));
        }

        info!(user_id = %user.id, "User logged in");
        self.issue_token(user)
    }

    /// Gets the current user's profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", ctx.user_id)))
    }

    /// Updates the current user's profile.
    ///
    /// Coordinates are validated as a pair; a partial or out-of-range
    /// location is rejected rather than stored.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        mut update: UpdateProfile,
    ) -> Result<User, AppError> {
        update.id = ctx.user_id;

        match (update.longitude, update.latitude) {
            (Some(lon), Some(lat)) => {
                GeoPoint::new(lon, lat)?;
            }
            (None, None) => {}
            _ => {
                return Err(AppError::validation(
                    "Longitude and latitude must be provided together",
                ));
            }
        }

        self.user_repo.update_profile(&update).await
    }

    /// Toggles the current donor's availability flag.
    pub async fn set_availability(
        &self,
        ctx: &RequestContext,
        available: bool,
    ) -> Result<User, AppError> {
        if !ctx.is_donor() {
            return Err(AppError::forbidden("Only donors have an availability flag"));
        }
        self.user_repo
            .update_profile(&UpdateProfile {
                id: ctx.user_id,
                phone: None,
                blood_type: None,
                address: None,
                city: None,
                longitude: None,
                latitude: None,
                availability: Some(available),
            })
            .await
    }

    /// Looks up a user by ID, for internal callers.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_id(user_id).await
    }

    fn issue_token(&self, user: User) -> Result<AuthenticatedUser, AppError> {
        let (access_token, expires_at) =
            self.encoder
                .generate_access_token(user.id, user.role, &user.name)?;
        Ok(AuthenticatedUser {
            user,
            access_token,
            expires_at,
        })
    }
}
