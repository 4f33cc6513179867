use std::sync::Arc;
use crate::repository::UserRepository;
use crate::{CoreError, CoreResult, NewUser, UserProfile};

/// Simulated sign-up and sign-in over a [`UserRepository`].
///
/// Passwords are compared verbatim. Nothing here is meant to be secure.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create a regular account; fails if the email is already registered
    pub async fn register(&self, name: &str, email: &str, password: &str) -> CoreResult<UserProfile> {
        let email = email.trim();
        if name.trim().is_empty() || email.is_empty() || password.is_empty() {
            return Err(CoreError::ValidationError(
                "name, email and password are required".to_string(),
            ));
        }

        let user = self
            .users
            .create_user(NewUser {
                name: name.trim().to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .inspect_err(|e| tracing::warn!("Registration rejected for {}: {}", email, e))?;

        tracing::info!("Registered account {} for {}", user.id, user.email);
        Ok(UserProfile::from(&user))
    }

    pub async fn login(&self, email: &str, password: &str) -> CoreResult<UserProfile> {
        match self.users.get_user_by_email(email.trim()).await {
            Some(user) if user.password_matches(password) => {
                tracing::info!("Login succeeded for {}", user.email);
                Ok(UserProfile::from(&user))
            }
            _ => {
                tracing::warn!("Login rejected for {}", email);
                Err(CoreError::InvalidCredentials)
            }
        }
    }
}
