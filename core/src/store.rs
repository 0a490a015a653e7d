//! SQLite persistence for computed models.
//!
//! RULE: Only store.rs talks to the database.
//! The engine never touches the store; callers save what it returns.

use crate::{
    error::{VerifyError, VerifyResult},
    model::VerificationFinancialModel,
    types::ModelId,
};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

pub struct ModelStore {
    conn: Connection,
}

/// One row of `list_models`, without the full projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedModelSummary {
    pub model_id:               ModelId,
    pub user_id:                String,
    pub project_name:           String,
    pub project_type:           String,
    pub verification_frequency: String,
    pub recommended_frequency:  String,
    pub total_project_revenue:  f64,
    #[serde(rename = "projectROI")]
    pub project_roi:            f64,
    pub payback_period:         i64,
    pub climate_risk_score:     f64,
    pub description:            Option<String>,
    pub tags:                   Vec<String>,
    pub created_at:             String,
}

impl ModelStore {
    /// Open (or create) the model database at `path`.
    pub fn open(path: &str) -> VerifyResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> VerifyResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> VerifyResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_verification_models.sql"))?;
        Ok(())
    }

    // ── Models ─────────────────────────────────────────────────

    /// Persist a model and return its new id.
    pub fn save_model(
        &self,
        model:       &VerificationFinancialModel,
        user_id:     &str,
        description: Option<&str>,
        tags:        &[String],
    ) -> VerifyResult<ModelId> {
        let model_id = uuid::Uuid::new_v4().to_string();
        let model_json = serde_json::to_string(model)?;
        let tags_json = serde_json::to_string(tags)?;
        let created_at = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO verification_model (
                model_id, user_id, project_name, project_type, verification_frequency,
                recommended_frequency, total_project_revenue, total_project_costs,
                project_roi, payback_period, climate_risk_score, description,
                tags_json, model_json, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                &model_id,
                user_id,
                &model.inputs.project_name,
                model.inputs.project_type.as_str(),
                model.inputs.verification_frequency.as_str(),
                model.comparison.recommended_frequency.as_str(),
                model.total_project_revenue,
                model.total_project_costs,
                model.project_roi,
                model.payback_period as i64,
                model.climate_risk_score,
                description,
                tags_json,
                model_json,
                created_at,
            ],
        )?;

        log::info!(
            "Saved verification model {model_id} for project '{}'",
            model.inputs.project_name
        );
        Ok(model_id)
    }

    pub fn load_model(&self, model_id: &str) -> VerifyResult<Option<VerificationFinancialModel>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT model_json FROM verification_model WHERE model_id = ?1",
                params![model_id],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j).map_err(VerifyError::from))
            .transpose()
    }

    /// Like `load_model`, but a missing id is an error.
    pub fn require_model(&self, model_id: &str) -> VerifyResult<VerificationFinancialModel> {
        self.load_model(model_id)?.ok_or_else(|| VerifyError::ModelNotFound {
            model_id: model_id.to_string(),
        })
    }

    /// All models saved by `user_id`, oldest first.
    pub fn list_models(&self, user_id: &str) -> VerifyResult<Vec<SavedModelSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT model_id, user_id, project_name, project_type, verification_frequency,
                    recommended_frequency, total_project_revenue, project_roi,
                    payback_period, climate_risk_score, description, tags_json, created_at
             FROM verification_model WHERE user_id = ?1
             ORDER BY rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    SavedModelSummary {
                        model_id:               row.get(0)?,
                        user_id:                row.get(1)?,
                        project_name:           row.get(2)?,
                        project_type:           row.get(3)?,
                        verification_frequency: row.get(4)?,
                        recommended_frequency:  row.get(5)?,
                        total_project_revenue:  row.get(6)?,
                        project_roi:            row.get(7)?,
                        payback_period:         row.get(8)?,
                        climate_risk_score:     row.get(9)?,
                        description:            row.get(10)?,
                        tags:                   Vec::new(),
                        created_at:             row.get(12)?,
                    },
                    row.get::<_, String>(11)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(mut summary, tags_json)| -> VerifyResult<SavedModelSummary> {
                summary.tags = serde_json::from_str(&tags_json)?;
                Ok(summary)
            })
            .collect()
    }

    pub fn delete_model(&self, model_id: &str) -> VerifyResult<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM verification_model WHERE model_id = ?1",
            params![model_id],
        )?;
        Ok(deleted > 0)
    }

    // ── Test / summary helpers ─────────────────────────────────

    /// Number of saved models (for tests).
    pub fn model_count(&self) -> VerifyResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM verification_model",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
