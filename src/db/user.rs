//! User database operations

use super::AppState;
use crate::auth::model::User;

const USER_COLUMNS: &str = "id, username, email, hashed_password";

impl AppState {
    /// Insert a new user. Uniqueness violations surface as the database
    /// error so callers can map them to a conflict.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO users (username, email, hashed_password) VALUES (?1, ?2, ?3)")
                .bind(username)
                .bind(email)
                .bind(hashed_password)
                .execute(&self.pool)
                .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        })
    }

    /// Any user whose username or email matches.
    pub async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1 OR email = ?2 LIMIT 1"
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_state;

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let state = test_state().await;

        let created = state
            .create_user("alice", "alice@example.com", "hash")
            .await
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(
            state.get_user_by_username("alice").await.unwrap(),
            Some(created.clone())
        );
        assert_eq!(state.get_user_by_id(created.id).await.unwrap(), Some(created));
        assert_eq!(state.get_user_by_username("bob").await.unwrap(), None);
        assert_eq!(state.get_user_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_by_username_or_email() {
        let state = test_state().await;
        let alice = state
            .create_user("alice", "alice@example.com", "hash")
            .await
            .unwrap();

        let by_name = state
            .find_user_by_username_or_email("alice", "other@example.com")
            .await
            .unwrap();
        let by_email = state
            .find_user_by_username_or_email("someone", "alice@example.com")
            .await
            .unwrap();
        let neither = state
            .find_user_by_username_or_email("someone", "other@example.com")
            .await
            .unwrap();

        assert_eq!(by_name.map(|u| u.id), Some(alice.id));
        assert_eq!(by_email.map(|u| u.id), Some(alice.id));
        assert!(neither.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let state = test_state().await;
        state
            .create_user("alice", "alice@example.com", "hash")
            .await
            .unwrap();

        let err = state
            .create_user("alice2", "alice@example.com", "hash")
            .await
            .unwrap_err();

        assert!(err
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false));
    }
}
