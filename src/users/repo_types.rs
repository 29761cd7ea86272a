use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};

/// User record in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub is_admin: bool,
    pub is_employee: bool,
    pub is_authorized: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn match_password(&self, plain: &str) -> anyhow::Result<bool> {
        verify_password(plain, &self.password_hash)
    }

    /// Replaces the stored hash; the caller persists with `UserStore::save`.
    pub fn set_password(&mut self, plain: &str) -> anyhow::Result<()> {
        self.password_hash = hash_password(plain)?;
        Ok(())
    }
}

/// Fields accepted by `UserStore::create`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_employee: bool,
    pub is_authorized: bool,
}

impl NewUser {
    /// Regular account: password hashed, every flag cleared.
    pub fn new(
        name: String,
        surname: Option<String>,
        email: String,
        password: &str,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            name,
            surname,
            email,
            password_hash: hash_password(password)?,
            is_admin: false,
            is_employee: false,
            is_authorized: false,
        })
    }

    pub fn admin(name: String, email: String, password: &str) -> anyhow::Result<Self> {
        Ok(Self {
            is_admin: true,
            is_employee: true,
            is_authorized: true,
            ..Self::new(name, None, email, password)?
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(new: NewUser) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            name: new.name,
            surname: new.surname,
            email: new.email,
            password_hash: new.password_hash,
            is_admin: new.is_admin,
            is_employee: new.is_employee,
            is_authorized: new.is_authorized,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn new_user_hashes_password_and_clears_flags() {
        let new = NewUser::new("A".into(), Some("B".into()), "a@x.com".into(), "secret").unwrap();
        assert_ne!(new.password_hash, "secret");
        assert!(!new.is_admin && !new.is_employee && !new.is_authorized);

        let user = stored(new);
        assert!(user.match_password("secret").unwrap());
        assert!(!user.match_password("Secret").unwrap());
    }

    #[test]
    fn set_password_replaces_the_accepted_password() {
        let mut user = stored(NewUser::new("A".into(), None, "a@x.com".into(), "secret").unwrap());
        let old_hash = user.password_hash.clone();

        user.set_password("n3w-secret").unwrap();

        assert_ne!(user.password_hash, old_hash);
        assert!(user.match_password("n3w-secret").unwrap());
        assert!(!user.match_password("secret").unwrap());
    }

    #[test]
    fn serialized_user_never_carries_the_hash() {
        let user = stored(NewUser::admin("Root".into(), "root@x.com".into(), "rootpass").unwrap());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["is_admin"], true);
    }
}
