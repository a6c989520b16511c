//! Ledger master lookups.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use voucherbook_core::ledger::{LedgerDirectory, LedgerKind, LedgerReference};
use voucherbook_core::voucher::PersistenceError;
use voucherbook_shared::types::LedgerId;

use super::db_error;
use crate::entities::ledgers;

/// Ledger directory reading the `ledgers` table.
#[derive(Debug, Clone)]
pub struct PgLedgerDirectory {
    db: DatabaseConnection,
}

impl PgLedgerDirectory {
    /// Creates a new ledger directory.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts or renames a ledger. Used by the seeder.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(&self, ledger: &LedgerReference) -> Result<(), PersistenceError> {
        let model = ledgers::ActiveModel {
            id: Set(ledger.id.as_str().to_string()),
            name: Set(ledger.name.clone()),
            kind: Set(ledger.kind.as_str().to_string()),
            group_name: Set(ledger.group_name.clone()),
            created_at: Set(Utc::now().into()),
        };

        ledgers::Entity::insert(model)
            .on_conflict(
                OnConflict::column(ledgers::Column::Id)
                    .update_columns([
                        ledgers::Column::Name,
                        ledgers::Column::Kind,
                        ledgers::Column::GroupName,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| db_error(&e))?;
        Ok(())
    }
}

#[async_trait]
impl LedgerDirectory for PgLedgerDirectory {
    async fn list_ledgers(
        &self,
        kinds: &[LedgerKind],
    ) -> Result<Vec<LedgerReference>, PersistenceError> {
        let mut query = ledgers::Entity::find();
        if !kinds.is_empty() {
            query = query.filter(ledgers::Column::Kind.is_in(kinds.iter().map(|k| k.as_str())));
        }

        query
            .order_by_asc(ledgers::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| db_error(&e))?
            .into_iter()
            .map(reference_from_model)
            .collect()
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        self.db.ping().await.map_err(|e| db_error(&e))
    }
}

fn reference_from_model(model: ledgers::Model) -> Result<LedgerReference, PersistenceError> {
    let kind = model
        .kind
        .parse::<LedgerKind>()
        .map_err(|e| PersistenceError::Storage(e.to_string()))?;
    Ok(LedgerReference {
        id: LedgerId::new(model.id),
        name: model.name,
        kind,
        group_name: model.group_name,
    })
}
