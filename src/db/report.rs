//! Report database operations
//!
//! Each operation has a typed statement (with `generation_method`) and a
//! legacy one (without it), chosen from the capabilities probed at startup.

use super::AppState;
use crate::report::models::{NewReport, Report};

const SELECT_TYPED: &str = "SELECT id, user_id, topic, filename, file_path, \
     CAST(created_at AS TEXT) AS created_at, generation_method FROM reports";

const SELECT_LEGACY: &str = "SELECT id, user_id, topic, filename, file_path, \
     CAST(created_at AS TEXT) AS created_at, NULL AS generation_method FROM reports";

impl AppState {
    fn select_reports(&self) -> &'static str {
        if self.schema.report_generation_method {
            SELECT_TYPED
        } else {
            SELECT_LEGACY
        }
    }

    /// Persist one generation. On a legacy store the method tag is dropped.
    pub async fn insert_report(&self, report: &NewReport) -> Result<Report, sqlx::Error> {
        let created_at = chrono::Utc::now().to_rfc3339();

        let (result, generation_method) = if self.schema.report_generation_method {
            let result = sqlx::query(
                "INSERT INTO reports (user_id, topic, filename, file_path, created_at, generation_method) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(report.user_id)
            .bind(&report.topic)
            .bind(&report.filename)
            .bind(&report.file_path)
            .bind(&created_at)
            .bind(report.generation_method.as_str())
            .execute(&self.pool)
            .await?;
            (result, Some(report.generation_method.as_str().to_string()))
        } else {
            log::debug!(
                "Inserting report '{}' without generation_method (legacy schema)",
                report.filename
            );
            let result = sqlx::query(
                "INSERT INTO reports (user_id, topic, filename, file_path, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(report.user_id)
            .bind(&report.topic)
            .bind(&report.filename)
            .bind(&report.file_path)
            .bind(&created_at)
            .execute(&self.pool)
            .await?;
            (result, None)
        };

        Ok(Report {
            id: result.last_insert_rowid(),
            user_id: report.user_id,
            topic: report.topic.clone(),
            filename: report.filename.clone(),
            file_path: report.file_path.clone(),
            created_at: Some(created_at),
            generation_method,
        })
    }

    /// All reports owned by `user_id`, oldest first.
    pub async fn get_reports_by_user(&self, user_id: i64) -> Result<Vec<Report>, sqlx::Error> {
        sqlx::query_as::<_, Report>(&format!(
            "{} WHERE user_id = ?1 ORDER BY id",
            self.select_reports()
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// The most recent report named `filename` owned by `user_id`.
    pub async fn find_report_by_filename(
        &self,
        filename: &str,
        user_id: i64,
    ) -> Result<Option<Report>, sqlx::Error> {
        sqlx::query_as::<_, Report>(&format!(
            "{} WHERE filename = ?1 AND user_id = ?2 ORDER BY id DESC LIMIT 1",
            self.select_reports()
        ))
        .bind(filename)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
