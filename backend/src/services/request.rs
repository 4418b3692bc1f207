//! Request queue service: lifecycle of department-submitted stock requests
//!
//! Pending requests resolve exactly once. Approval is owned by the
//! fulfillment engine because it must share the engine's transaction; this
//! service covers every other lifecycle operation.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::InventoryService;
use shared::models::{RequestStatus, StockRequest};
use shared::types::Pagination;
use shared::validation;

/// Request service for managing department stock requests
#[derive(Clone)]
pub struct RequestService {
    db: PgPool,
}

/// Input for creating a stock request
#[derive(Debug, Deserialize)]
pub struct CreateRequestInput {
    pub item_name: String,
    pub quantity: i32,
    pub unit: String,
    pub reason: Option<String>,
}

/// Filter for listing requests
#[derive(Debug, Default, Deserialize)]
pub struct RequestFilter {
    pub department: Option<String>,
    #[serde(default)]
    pub include_archived: bool,
}

impl RequestService {
    /// Create a new RequestService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a request on behalf of a department actor
    ///
    /// The item binding is resolved by name at creation time when the named
    /// item already exists; otherwise the request keeps a name-only binding
    /// and resolution happens at approval.
    pub async fn create(
        &self,
        department: &str,
        requested_by: &str,
        input: CreateRequestInput,
    ) -> AppResult<StockRequest> {
        validation::validate_department(department).map_err(|msg| AppError::Validation {
            field: "department".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_item_name(&input.item_name).map_err(|msg| AppError::Validation {
            field: "item_name".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_quantity(input.quantity)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

        let inventory = InventoryService::new(self.db.clone());
        let item_id = inventory
            .find_by_name(&input.item_name)
            .await?
            .map(|item| item.id);

        let request = sqlx::query_as::<_, StockRequest>(
            r#"
            INSERT INTO stock_requests (department, requested_by, item_id, item_name,
                                        quantity, unit, reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, department, requested_by, item_id, item_name, quantity, unit,
                      reason, status, archived, resolution_notes, created_at, updated_at
            "#,
        )
        .bind(department)
        .bind(requested_by)
        .bind(item_id)
        .bind(input.item_name.trim())
        .bind(input.quantity)
        .bind(&input.unit)
        .bind(&input.reason)
        .fetch_one(&self.db)
        .await?;

        Ok(request)
    }

    /// Get a request by id
    pub async fn get(&self, request_id: Uuid) -> AppResult<StockRequest> {
        let request = sqlx::query_as::<_, StockRequest>(
            r#"
            SELECT id, department, requested_by, item_id, item_name, quantity, unit,
                   reason, status, archived, resolution_notes, created_at, updated_at
            FROM stock_requests
            WHERE id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Request".to_string()))?;

        Ok(request)
    }

    /// List requests, newest first
    pub async fn list(
        &self,
        filter: RequestFilter,
        pagination: Pagination,
    ) -> AppResult<Vec<StockRequest>> {
        let page = pagination.clamped();

        let requests = sqlx::query_as::<_, StockRequest>(
            r#"
            SELECT id, department, requested_by, item_id, item_name, quantity, unit,
                   reason, status, archived, resolution_notes, created_at, updated_at
            FROM stock_requests
            WHERE ($1::varchar IS NULL OR department = $1)
              AND ($2 OR NOT archived)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&filter.department)
        .bind(filter.include_archived)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;

        Ok(requests)
    }

    /// Reject a pending request
    ///
    /// Purely a status change: inventory and the ledger are never touched.
    /// The conditional update makes a racing second resolution observe
    /// `AlreadyResolved` instead of overwriting the first.
    pub async fn reject(&self, request_id: Uuid, reason: Option<String>) -> AppResult<StockRequest> {
        let rejected = sqlx::query_as::<_, StockRequest>(
            r#"
            UPDATE stock_requests
            SET status = 'rejected', resolution_notes = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, department, requested_by, item_id, item_name, quantity, unit,
                      reason, status, archived, resolution_notes, created_at, updated_at
            "#,
        )
        .bind(request_id)
        .bind(&reason)
        .fetch_optional(&self.db)
        .await?;

        match rejected {
            Some(request) => Ok(request),
            None => Err(self.resolution_conflict(request_id).await?),
        }
    }

    /// Toggle the display-only archived flag
    ///
    /// Valid in any status; never re-enters Pending or alters resolution data.
    pub async fn toggle_archive(&self, request_id: Uuid) -> AppResult<StockRequest> {
        let request = sqlx::query_as::<_, StockRequest>(
            r#"
            UPDATE stock_requests
            SET archived = NOT archived, updated_at = NOW()
            WHERE id = $1
            RETURNING id, department, requested_by, item_id, item_name, quantity, unit,
                      reason, status, archived, resolution_notes, created_at, updated_at
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Request".to_string()))?;

        Ok(request)
    }

    /// Hard-remove a request, allowed in any state
    ///
    /// Cleanup only; the movement ledger keeps whatever the request caused.
    pub async fn delete(&self, request_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM stock_requests WHERE id = $1")
            .bind(request_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Request".to_string()));
        }

        Ok(())
    }

    /// Classify a failed conditional resolution: unknown id or lost race
    async fn resolution_conflict(&self, request_id: Uuid) -> AppResult<AppError> {
        let status = sqlx::query_scalar::<_, RequestStatus>(
            "SELECT status FROM stock_requests WHERE id = $1",
        )
        .bind(request_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(match status {
            Some(_) => AppError::AlreadyResolved(request_id),
            None => AppError::NotFound("Request".to_string()),
        })
    }
}
