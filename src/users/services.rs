use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument};

use crate::{
    config::AdminSeed,
    users::{
        dto::UpdateProfileRequest,
        repo::{StoreError, UserStore},
        repo_types::{NewUser, User},
    },
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn provided(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// Error raised while applying a profile patch.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("Invalid email")]
    InvalidEmail,
    #[error(transparent)]
    Hash(#[from] anyhow::Error),
}

/// Applies the owner-editable fields of `patch` to `user` in place.
/// Returns whether the password hash was replaced.
pub fn apply_profile_patch(user: &mut User, patch: UpdateProfileRequest) -> Result<bool, PatchError> {
    if let Some(name) = provided(patch.name) {
        user.name = name;
    }

    if let Some(email) = provided(patch.email) {
        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Err(PatchError::InvalidEmail);
        }
        user.email = email;
    }

    match provided(patch.password) {
        Some(password) => {
            user.set_password(&password)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Creates the configured admin account unless its email is already taken.
#[instrument(skip(store, seed), fields(email = %seed.email))]
pub async fn bootstrap_admin(store: &dyn UserStore, seed: &AdminSeed) -> anyhow::Result<()> {
    let email = normalize_email(&seed.email);
    if store.find_by_email(&email).await?.is_some() {
        info!("admin account already present");
        return Ok(());
    }

    match store
        .create(NewUser::admin(seed.name.clone(), email, &seed.password)?)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "admin account created");
            Ok(())
        }
        Err(StoreError::DuplicateEmail) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
