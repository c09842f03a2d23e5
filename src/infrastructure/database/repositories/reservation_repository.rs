//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::reservation::{
    PriorityTier, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::{DomainError, DomainResult, TimeWindow};
use crate::infrastructure::database::entities::reservation;

const OPEN_STATUSES: [&str; 2] = ["Pending", "Confirmed"];

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        tenant_id: m.tenant_id,
        model_id: m.model_id,
        jetski_id: m.jetski_id,
        customer_id: m.customer_id,
        seller_id: m.seller_id,
        start: m.start_at,
        end: m.end_at,
        status: ReservationStatus::from_str(&m.status),
        priority: PriorityTier::from_str(&m.priority),
        deposit_paid: m.deposit_paid,
        deposit_amount: m.deposit_amount,
        deposit_paid_at: m.deposit_paid_at,
        expires_at: m.expires_at,
        active: m.active,
        notes: m.notes,
        rental_id: m.rental_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(r: Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id),
        tenant_id: Set(r.tenant_id),
        model_id: Set(r.model_id),
        jetski_id: Set(r.jetski_id),
        customer_id: Set(r.customer_id),
        seller_id: Set(r.seller_id),
        start_at: Set(r.start),
        end_at: Set(r.end),
        status: Set(r.status.as_str().to_string()),
        priority: Set(r.priority.as_str().to_string()),
        deposit_paid: Set(r.deposit_paid),
        deposit_amount: Set(r.deposit_amount),
        deposit_paid_at: Set(r.deposit_paid_at),
        expires_at: Set(r.expires_at),
        active: Set(r.active),
        notes: Set(r.notes),
        rental_id: Set(r.rental_id),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

/// Active, open reservations overlapping `[start, end)`.
fn overlapping(tenant_id: Uuid, window: &TimeWindow) -> Select<reservation::Entity> {
    reservation::Entity::find()
        .filter(reservation::Column::TenantId.eq(tenant_id))
        .filter(reservation::Column::Active.eq(true))
        .filter(reservation::Column::Status.is_in(OPEN_STATUSES))
        .filter(reservation::Column::StartAt.lt(window.end))
        .filter(reservation::Column::EndAt.gt(window.start))
}

/// Refuse to store a jetski-bound reservation that overlaps another active
/// one on the same jetski.
async fn guard_jetski_window<C: ConnectionTrait>(conn: &C, r: &Reservation) -> DomainResult<()> {
    let Some(jetski_id) = r.jetski_id else {
        return Ok(());
    };
    if !r.holds_capacity() {
        return Ok(());
    }

    let clash = overlapping(r.tenant_id, &r.window())
        .filter(reservation::Column::JetskiId.eq(jetski_id))
        .filter(reservation::Column::Id.ne(r.id))
        .one(conn)
        .await
        .map_err(db_err)?;

    match clash {
        None => Ok(()),
        Some(existing) => Err(DomainError::Conflict(format!(
            "jetski {jetski_id} already held by reservation {} for {}..{}",
            existing.id,
            existing.start_at.to_rfc3339(),
            existing.end_at.to_rfc3339()
        ))),
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn save(&self, r: Reservation) -> DomainResult<()> {
        debug!("Saving reservation: {}", r.id);

        let txn = self.db.begin().await.map_err(db_err)?;
        guard_jetski_window(&txn, &r).await?;
        domain_to_active(r).insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, r: Reservation) -> DomainResult<()> {
        debug!("Updating reservation: {}", r.id);

        let txn = self.db.begin().await.map_err(db_err)?;
        let existing = reservation::Entity::find_by_id(r.id)
            .one(&txn)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Reservation", "id", r.id));
        }

        guard_jetski_window(&txn, &r).await?;
        domain_to_active(r).update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .filter(reservation::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_model(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::TenantId.eq(tenant_id))
            .filter(reservation::Column::ModelId.eq(model_id))
            .order_by_asc(reservation::Column::StartAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count_overlapping(
        &self,
        tenant_id: Uuid,
        model_id: Uuid,
        window: TimeWindow,
        tier: Option<PriorityTier>,
    ) -> DomainResult<u32> {
        let mut query = overlapping(tenant_id, &window)
            .filter(reservation::Column::ModelId.eq(model_id));
        if let Some(tier) = tier {
            query = query.filter(reservation::Column::Priority.eq(tier.as_str()));
        }
        let count = query.count(&self.db).await.map_err(db_err)?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn find_jetski_conflicts(
        &self,
        tenant_id: Uuid,
        jetski_id: Uuid,
        window: TimeWindow,
        exclude: Option<Uuid>,
    ) -> DomainResult<Vec<Reservation>> {
        let mut query =
            overlapping(tenant_id, &window).filter(reservation::Column::JetskiId.eq(jetski_id));
        if let Some(id) = exclude {
            query = query.filter(reservation::Column::Id.ne(id));
        }
        let models = query
            .order_by_asc(reservation::Column::StartAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_expirable(&self, now: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Active.eq(true))
            .filter(reservation::Column::DepositPaid.eq(false))
            .filter(reservation::Column::Status.is_in(OPEN_STATUSES))
            .filter(reservation::Column::ExpiresAt.lt(now))
            .order_by_asc(reservation::Column::ExpiresAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
