//! Voucher repository backed by `PostgreSQL`.
//!
//! A voucher and its lines are written in one database transaction. Number uniqueness
//! per type and fiscal year is enforced by a unique index, so two writers racing for the
//! same number cannot both succeed.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;
use voucherbook_core::fiscal::{FiscalCalendar, FiscalYear};
use voucherbook_core::voucher::{
    Direction, EntryMode, ItemAllocation, PersistenceError, Voucher, VoucherFieldConfig,
    VoucherFilter, VoucherLine, VoucherRepository, VoucherSummary, VoucherType,
};
use voucherbook_shared::types::{
    Amount, CostCentreId, GodownId, LedgerId, PageRequest, PageResponse, StockItemId, VoucherId,
};

use super::db_error;
use crate::entities::{voucher_lines, vouchers};

/// Voucher repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PgVoucherRepository {
    db: DatabaseConnection,
    calendar: FiscalCalendar,
}

impl PgVoucherRepository {
    /// Creates a new voucher repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, calendar: FiscalCalendar) -> Self {
        Self { db, calendar }
    }

    fn fiscal_year_of(&self, voucher: &Voucher) -> Result<(chrono::NaiveDate, FiscalYear), PersistenceError> {
        let date = voucher
            .date
            .ok_or_else(|| PersistenceError::Rejected("voucher date is required".into()))?;
        let year = self.calendar.year_of(date).ok_or_else(|| {
            PersistenceError::Rejected(format!("no fiscal year contains {date}"))
        })?;
        Ok((date, year))
    }

    /// Maps a write failure, recognising a clash on the voucher number index.
    fn write_error(err: &DbErr, voucher: &Voucher) -> PersistenceError {
        if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return PersistenceError::DuplicateNumber {
                number: voucher.number.clone(),
                voucher_type: voucher.voucher_type,
            };
        }
        db_error(err)
    }

    async fn insert_lines(
        txn: &DatabaseTransaction,
        id: Uuid,
        voucher: &Voucher,
    ) -> Result<(), PersistenceError> {
        for (position, line) in voucher.lines().iter().enumerate() {
            line_model(id, position, line)?
                .insert(txn)
                .await
                .map_err(|e| db_error(&e))?;
        }
        Ok(())
    }

    async fn load_lines(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<voucher_lines::Model>>, PersistenceError> {
        let rows = voucher_lines::Entity::find()
            .filter(voucher_lines::Column::VoucherId.is_in(ids))
            .order_by_asc(voucher_lines::Column::VoucherId)
            .order_by_asc(voucher_lines::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| db_error(&e))?;

        let mut grouped: HashMap<Uuid, Vec<voucher_lines::Model>> = HashMap::new();
        for row in rows {
            grouped.entry(row.voucher_id).or_default().push(row);
        }
        Ok(grouped)
    }
}

#[async_trait]
impl VoucherRepository for PgVoucherRepository {
    async fn create(&self, voucher: &Voucher) -> Result<VoucherId, PersistenceError> {
        let (date, year) = self.fiscal_year_of(voucher)?;
        let id = VoucherId::new();
        let now = Utc::now().into();

        let txn = self.db.begin().await.map_err(|e| db_error(&e))?;

        vouchers::ActiveModel {
            id: Set(id.into_inner()),
            voucher_type: Set(voucher.voucher_type.as_str().to_string()),
            number: Set(voucher.number.trim().to_string()),
            fiscal_year: Set(year.start_year()),
            voucher_date: Set(date),
            mode: Set(mode_name(voucher.mode()).to_string()),
            reference_no: Set(voucher.reference_no.clone()),
            reference_date: Set(voucher.reference_date),
            narration: Set(voucher.narration.clone()),
            field_config: Set(config_json(&voucher.config)?),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| Self::write_error(&e, voucher))?;

        Self::insert_lines(&txn, id.into_inner(), voucher).await?;
        txn.commit().await.map_err(|e| db_error(&e))?;

        Ok(id)
    }

    async fn update(&self, id: VoucherId, voucher: &Voucher) -> Result<(), PersistenceError> {
        let (date, year) = self.fiscal_year_of(voucher)?;
        let txn = self.db.begin().await.map_err(|e| db_error(&e))?;

        let existing = vouchers::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| db_error(&e))?
            .ok_or(PersistenceError::NotFound(id))?;

        let mut model: vouchers::ActiveModel = existing.into();
        model.voucher_type = Set(voucher.voucher_type.as_str().to_string());
        model.number = Set(voucher.number.trim().to_string());
        model.fiscal_year = Set(year.start_year());
        model.voucher_date = Set(date);
        model.mode = Set(mode_name(voucher.mode()).to_string());
        model.reference_no = Set(voucher.reference_no.clone());
        model.reference_date = Set(voucher.reference_date);
        model.narration = Set(voucher.narration.clone());
        model.field_config = Set(config_json(&voucher.config)?);
        model.updated_at = Set(Utc::now().into());
        model
            .update(&txn)
            .await
            .map_err(|e| Self::write_error(&e, voucher))?;

        voucher_lines::Entity::delete_many()
            .filter(voucher_lines::Column::VoucherId.eq(id.into_inner()))
            .exec(&txn)
            .await
            .map_err(|e| db_error(&e))?;
        Self::insert_lines(&txn, id.into_inner(), voucher).await?;

        txn.commit().await.map_err(|e| db_error(&e))?;
        Ok(())
    }

    async fn find(&self, id: VoucherId) -> Result<Option<Voucher>, PersistenceError> {
        let Some(model) = vouchers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| db_error(&e))?
        else {
            return Ok(None);
        };

        let mut lines = self.load_lines(vec![model.id]).await?;
        let rows = lines.remove(&model.id).unwrap_or_default();
        voucher_from_models(model, rows).map(Some)
    }

    async fn list(
        &self,
        filter: &VoucherFilter,
        page: PageRequest,
    ) -> Result<PageResponse<VoucherSummary>, PersistenceError> {
        let mut query = vouchers::Entity::find();

        if let Some(voucher_type) = filter.voucher_type {
            query = query.filter(vouchers::Column::VoucherType.eq(voucher_type.as_str()));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(vouchers::Column::VoucherDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(vouchers::Column::VoucherDate.lte(date_to));
        }

        let paginator = query
            .order_by_desc(vouchers::Column::VoucherDate)
            .order_by_desc(vouchers::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await.map_err(|e| db_error(&e))?;
        let models = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(|e| db_error(&e))?;

        let mut lines = self
            .load_lines(models.iter().map(|m| m.id).collect())
            .await?;
        let data = models
            .into_iter()
            .map(|model| {
                let rows = lines.remove(&model.id).unwrap_or_default();
                voucher_from_models(model, rows).map(|voucher| VoucherSummary::from(&voucher))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    async fn numbers_in_fiscal_year(
        &self,
        voucher_type: VoucherType,
        year: &FiscalYear,
    ) -> Result<Vec<String>, PersistenceError> {
        vouchers::Entity::find()
            .select_only()
            .column(vouchers::Column::Number)
            .filter(vouchers::Column::VoucherType.eq(voucher_type.as_str()))
            .filter(vouchers::Column::FiscalYear.eq(year.start_year()))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| db_error(&e))
    }
}

fn mode_name(mode: EntryMode) -> &'static str {
    match mode {
        EntryMode::SingleEntry => "single-entry",
        EntryMode::DoubleEntry => "double-entry",
    }
}

fn parse_mode(name: &str) -> Result<EntryMode, PersistenceError> {
    match name {
        "single-entry" => Ok(EntryMode::SingleEntry),
        "double-entry" => Ok(EntryMode::DoubleEntry),
        other => Err(PersistenceError::Storage(format!("unknown entry mode {other}"))),
    }
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Debit => "debit",
        Direction::Credit => "credit",
    }
}

fn parse_direction(name: &str) -> Result<Direction, PersistenceError> {
    match name {
        "debit" => Ok(Direction::Debit),
        "credit" => Ok(Direction::Credit),
        other => Err(PersistenceError::Storage(format!("unknown direction {other}"))),
    }
}

fn config_json(config: &VoucherFieldConfig) -> Result<serde_json::Value, PersistenceError> {
    serde_json::to_value(config).map_err(|e| PersistenceError::Storage(e.to_string()))
}

fn line_model(
    voucher_id: Uuid,
    position: usize,
    line: &VoucherLine,
) -> Result<voucher_lines::ActiveModel, PersistenceError> {
    let position = i32::try_from(position)
        .map_err(|_| PersistenceError::Rejected("too many voucher lines".into()))?;
    let item = line.item.as_ref();

    Ok(voucher_lines::ActiveModel {
        voucher_id: Set(voucher_id),
        position: Set(position),
        line_key: Set(line.id.clone()),
        ledger_id: Set(line.ledger_id.as_str().to_string()),
        amount: Set(line.amount.value()),
        direction: Set(direction_name(line.direction).to_string()),
        narration: Set(line.narration.clone()),
        cost_centre_id: Set(line.cost_centre_id.as_ref().map(|c| c.as_str().to_string())),
        bank_name: Set(line.bank_name.clone()),
        cheque_number: Set(line.cheque_number.clone()),
        stock_item_id: Set(item.map(|i| i.stock_item_id.as_str().to_string())),
        godown_id: Set(item.and_then(|i| i.godown_id.as_ref().map(|g| g.as_str().to_string()))),
        quantity: Set(item.map(|i| i.quantity)),
        rate: Set(item.and_then(|i| i.rate.map(Amount::value))),
    })
}

fn line_from_model(row: voucher_lines::Model) -> Result<VoucherLine, PersistenceError> {
    let item = row.stock_item_id.map(|stock_item_id| ItemAllocation {
        stock_item_id: StockItemId::new(stock_item_id),
        godown_id: row.godown_id.map(GodownId::new),
        quantity: row.quantity.unwrap_or(Decimal::ZERO),
        rate: row.rate.map(Amount::new),
    });

    Ok(VoucherLine {
        id: row.line_key,
        ledger_id: LedgerId::new(row.ledger_id),
        amount: Amount::new(row.amount),
        direction: parse_direction(&row.direction)?,
        narration: row.narration,
        cost_centre_id: row.cost_centre_id.map(CostCentreId::new),
        bank_name: row.bank_name,
        cheque_number: row.cheque_number,
        item,
    })
}

fn voucher_from_models(
    model: vouchers::Model,
    rows: Vec<voucher_lines::Model>,
) -> Result<Voucher, PersistenceError> {
    let voucher_type = VoucherType::from_str(&model.voucher_type)
        .map_err(|e| PersistenceError::Storage(e.to_string()))?;
    let config: VoucherFieldConfig = serde_json::from_value(model.field_config)
        .map_err(|e| PersistenceError::Storage(e.to_string()))?;
    let lines = rows
        .into_iter()
        .map(line_from_model)
        .collect::<Result<Vec<_>, _>>()?;

    let mut voucher = Voucher::new(voucher_type, Some(model.voucher_date), model.number)
        .with_lines(parse_mode(&model.mode)?, lines);
    voucher.id = VoucherId::from_uuid(model.id);
    voucher.reference_no = model.reference_no;
    voucher.reference_date = model.reference_date;
    voucher.narration = model.narration;
    voucher.config = config;
    Ok(voucher)
}
