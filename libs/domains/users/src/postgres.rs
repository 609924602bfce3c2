use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement};
use serde_json::Value;

use crate::{
    error::{UserError, UserResult},
    models::{NewUser, User, UserPredicate},
    repository::UserRepository,
};

const USER_COLUMNS: &str = "id, email, user_type, version, profile";

/// PostgreSQL implementation of UserRepository using raw SeaORM statements
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: i32,
    email: String,
    user_type: String,
    version: i32,
    profile: Value,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let profile = match row.profile {
            Value::Object(map) => map,
            _ => Default::default(),
        };

        User {
            id: row.id,
            email: row.email,
            user_type: row.user_type,
            version: row.version,
            profile,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct ExistsRow {
    present: bool,
}

/// Pool/connection failures and a missing `users` relation mean the store is
/// unusable; anything else is an unclassified fault.
fn map_db_err(err: DbErr) -> UserError {
    let message = err.to_string();

    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => UserError::StoreUnavailable(message),
        _ if message.contains(r#"relation "users" does not exist"#) => {
            UserError::StoreUnavailable(message)
        }
        _ => UserError::Internal(message),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> UserResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let stmt = Statement::from_string(DbBackend::Postgres, sql);

        let rows = UserRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let sql = format!(
            "INSERT INTO users (email, user_type, profile) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.email.into(),
                user.user_type.into(),
                Value::Object(user.profile).into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| UserError::Internal("insert returned no row".to_string()))?;

        tracing::info!(user_id = row.id, "Inserted user");
        Ok(row.into())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET email = $3, user_type = $4, profile = $5, version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING {USER_COLUMNS}
            "#
        );
        let id = user.id;
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.id.into(),
                user.version.into(),
                user.email.into(),
                user.user_type.into(),
                Value::Object(user.profile).into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(UserError::ConcurrencyConflict(id))?;

        tracing::info!(user_id = row.id, version = row.version, "Updated user");
        Ok(row.into())
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM users WHERE id = $1",
            [id.into()],
        );

        let result = self.db.execute_raw(stmt).await.map_err(map_db_err)?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(deleted)
    }

    async fn exists(&self, predicate: UserPredicate) -> UserResult<bool> {
        let stmt = match predicate {
            UserPredicate::Id(id) => Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1) AS present",
                [id.into()],
            ),
            UserPredicate::Email(email) => Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1)) AS present",
                [email.into()],
            ),
        };

        let row = ExistsRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.is_some_and(|r| r.present))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_connection_fault_is_store_unavailable() {
        let err = map_db_err(DbErr::Conn(RuntimeErr::Internal("connection refused".into())));
        assert!(matches!(err, UserError::StoreUnavailable(d) if d.contains("connection refused")));
    }

    #[test]
    fn test_missing_relation_is_store_unavailable() {
        let err = map_db_err(DbErr::Custom(r#"relation "users" does not exist"#.into()));
        assert!(matches!(err, UserError::StoreUnavailable(_)));
    }

    #[test]
    fn test_other_fault_keeps_description() {
        let err = map_db_err(DbErr::Custom("x".into()));
        match err {
            UserError::Internal(detail) => assert!(detail.contains('x')),
            other => panic!("expected Internal, got {:?}", other),
        }
    }
}
