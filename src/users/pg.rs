use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::users::{
    repo::{StoreError, StoreResult, UserStore},
    repo_types::{NewUser, User},
};

const USER_COLUMNS: &str = "id, name, surname, email, password_hash, is_admin, is_employee, \
                            is_authorized, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateEmail
        }
        _ => StoreError::Other(e.into()),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, surname, email, password_hash, is_admin, is_employee, is_authorized)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.is_employee)
        .bind(user.is_authorized)
        .fetch_one(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(created)
    }

    async fn save(&self, user: &User) -> StoreResult<User> {
        let saved = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = $2, surname = $3, email = $4, password_hash = $5,
                   is_admin = $6, is_employee = $7, is_authorized = $8, updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.is_employee)
        .bind(user.is_authorized)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        saved.ok_or(StoreError::NotFound)
    }
}
