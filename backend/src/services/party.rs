//! Supplier and customer management service
//!
//! Party balances (payable to a supplier, receivable from a customer) are
//! derived from the purchase and sale tables on every read instead of being
//! cached, so they can never drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::PartyType;
use shared::validation::validate_phone;

/// Supplier/customer service
#[derive(Clone)]
pub struct PartyService {
    db: PgPool,
}

/// Party row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PartyRecord {
    pub id: Uuid,
    pub mill_id: Uuid,
    pub party_type: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a party
#[derive(Debug, Deserialize)]
pub struct CreatePartyInput {
    pub party_type: PartyType,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Input for updating a party
#[derive(Debug, Deserialize)]
pub struct UpdatePartyInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

/// Party with its derived outstanding balance
#[derive(Debug, Serialize)]
pub struct PartyBalance {
    #[serde(flatten)]
    pub party: PartyRecord,
    /// Payable for suppliers, receivable for customers
    pub outstanding: Decimal,
}

impl PartyService {
    /// Create a new PartyService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a supplier or customer
    pub async fn create_party(
        &self,
        mill_id: Uuid,
        input: CreatePartyInput,
    ) -> AppResult<PartyRecord> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Party name is required".to_string(),
            });
        }
        if let Some(phone) = &input.phone {
            if let Err(msg) = validate_phone(phone) {
                return Err(AppError::Validation {
                    field: "phone".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        let party = sqlx::query_as::<_, PartyRecord>(
            r#"
            INSERT INTO parties (mill_id, party_type, name, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, mill_id, party_type, name, phone, address, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(mill_id)
        .bind(input.party_type.as_str())
        .bind(input.name.trim())
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(party)
    }

    /// Get a party by id
    pub async fn get_party(&self, mill_id: Uuid, party_id: Uuid) -> AppResult<PartyRecord> {
        sqlx::query_as::<_, PartyRecord>(
            r#"
            SELECT id, mill_id, party_type, name, phone, address, is_active,
                   created_at, updated_at
            FROM parties
            WHERE id = $1 AND mill_id = $2
            "#,
        )
        .bind(party_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Party".to_string()))
    }

    /// List parties, optionally filtered by type or a name/phone search term
    pub async fn list_parties(
        &self,
        mill_id: Uuid,
        party_type: Option<PartyType>,
        search: Option<String>,
    ) -> AppResult<Vec<PartyRecord>> {
        let parties = sqlx::query_as::<_, PartyRecord>(
            r#"
            SELECT id, mill_id, party_type, name, phone, address, is_active,
                   created_at, updated_at
            FROM parties
            WHERE mill_id = $1
              AND ($2::text IS NULL OR party_type = $2)
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' OR phone ILIKE '%' || $3 || '%')
            ORDER BY name
            "#,
        )
        .bind(mill_id)
        .bind(party_type.map(|t| t.as_str().to_string()))
        .bind(search)
        .fetch_all(&self.db)
        .await?;

        Ok(parties)
    }

    /// Update a party
    pub async fn update_party(
        &self,
        mill_id: Uuid,
        party_id: Uuid,
        input: UpdatePartyInput,
    ) -> AppResult<PartyRecord> {
        let existing = self.get_party(mill_id, party_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let phone = input.phone.or(existing.phone);
        let address = input.address.or(existing.address);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let party = sqlx::query_as::<_, PartyRecord>(
            r#"
            UPDATE parties
            SET name = $1, phone = $2, address = $3, is_active = $4, updated_at = NOW()
            WHERE id = $5 AND mill_id = $6
            RETURNING id, mill_id, party_type, name, phone, address, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&phone)
        .bind(&address)
        .bind(is_active)
        .bind(party_id)
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        Ok(party)
    }

    /// Delete a party; rejected once trades reference it
    pub async fn delete_party(&self, mill_id: Uuid, party_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM purchases WHERE supplier_id = $1)
                OR EXISTS(SELECT 1 FROM sales WHERE customer_id = $1)
            "#,
        )
        .bind(party_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::Conflict(
                "Party has recorded trades and cannot be deleted".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM parties WHERE id = $1 AND mill_id = $2")
            .bind(party_id)
            .bind(mill_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Party".to_string()));
        }

        Ok(())
    }

    /// Get a party with its outstanding balance.
    ///
    /// Suppliers: unpaid purchase remainder (what the mill owes).
    /// Customers: unpaid sale remainder (what the mill is owed).
    pub async fn get_party_balance(&self, mill_id: Uuid, party_id: Uuid) -> AppResult<PartyBalance> {
        let party = self.get_party(mill_id, party_id).await?;

        let outstanding = match party.party_type.as_str() {
            "supplier" => {
                sqlx::query_scalar::<_, Option<Decimal>>(
                    "SELECT SUM(total_amount - paid_amount) FROM purchases WHERE supplier_id = $1",
                )
                .bind(party_id)
                .fetch_one(&self.db)
                .await?
            }
            _ => {
                sqlx::query_scalar::<_, Option<Decimal>>(
                    "SELECT SUM(total_amount - received_amount) FROM sales WHERE customer_id = $1",
                )
                .bind(party_id)
                .fetch_one(&self.db)
                .await?
            }
        }
        .unwrap_or(Decimal::ZERO);

        Ok(PartyBalance { party, outstanding })
    }
}
