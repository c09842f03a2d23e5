//! Reservation domain entity

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::window::TimeWindow;
use crate::domain::DomainResult;
use crate::support::errors::DomainError;

/// Lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Created, awaiting confirmation
    Pending,
    /// Confirmed by an operator
    Confirmed,
    /// Cancelled by the customer or an operator
    Cancelled,
    /// No-show past the grace period without a deposit
    Expired,
    /// Converted into a rental or closed administratively
    Finalized,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
            Self::Finalized => "Finalized",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Confirmed" => Self::Confirmed,
            "Expired" => Self::Expired,
            "Finalized" => Self::Finalized,
            _ => Self::Cancelled,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Expired | Self::Finalized)
    }

    /// Statuses that still hold a claim on capacity and may be cancelled,
    /// expired, upgraded or allocated.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority tier. `Guaranteed` iff a deposit has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityTier {
    /// Deposit-backed; counted against physical capacity
    Guaranteed,
    /// No deposit; counted against the overbooking cap
    Overbooked,
}

impl PriorityTier {
    pub fn for_deposit(deposit_paid: bool) -> Self {
        if deposit_paid {
            Self::Guaranteed
        } else {
            Self::Overbooked
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guaranteed => "Guaranteed",
            Self::Overbooked => "Overbooked",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Guaranteed" => Self::Guaranteed,
            _ => Self::Overbooked,
        }
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking request
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_new_reservation"))]
pub struct NewReservation {
    pub tenant_id: Uuid,
    pub model_id: Uuid,
    pub customer_id: Uuid,
    pub seller_id: Option<Uuid>,
    /// Specific jetski requested up front (optional)
    pub jetski_id: Option<Uuid>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub deposit_paid: bool,
    pub deposit_amount: Option<Decimal>,
    pub deposit_paid_at: Option<DateTime<Utc>>,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

fn validate_new_reservation(req: &NewReservation) -> Result<(), ValidationError> {
    if req.start >= req.end {
        let mut err = ValidationError::new("window");
        err.message = Some("start must be before end".into());
        return Err(err);
    }
    if req.deposit_amount.is_some_and(|a| a < Decimal::ZERO) {
        let mut err = ValidationError::new("deposit_amount");
        err.message = Some("deposit amount must not be negative".into());
        return Err(err);
    }
    Ok(())
}

impl NewReservation {
    /// Minimal request without deposit, jetski or notes.
    pub fn new(
        tenant_id: Uuid,
        model_id: Uuid,
        customer_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            tenant_id,
            model_id,
            customer_id,
            seller_id: None,
            jetski_id: None,
            start,
            end,
            deposit_paid: false,
            deposit_amount: None,
            deposit_paid_at: None,
            notes: None,
        }
    }

    pub fn with_deposit(mut self, amount: Decimal) -> Self {
        self.deposit_paid = true;
        self.deposit_amount = Some(amount);
        self
    }

    pub fn with_jetski(mut self, jetski_id: Uuid) -> Self {
        self.jetski_id = Some(jetski_id);
        self
    }

    /// A deposit counts only when flagged paid with a positive amount.
    pub fn has_deposit(&self) -> bool {
        self.deposit_paid && self.deposit_amount.is_some_and(|a| a > Decimal::ZERO)
    }
}

/// Partial update. Notes can always be amended; the window only while open.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReservationPatch {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub seller_id: Option<Uuid>,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl ReservationPatch {
    pub fn changes_window(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Reservation of a jetski model for a time window
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub model_id: Uuid,
    /// Physical jetski, once allocated
    pub jetski_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub seller_id: Option<Uuid>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ReservationStatus,
    pub priority: PriorityTier,
    pub deposit_paid: bool,
    pub deposit_amount: Decimal,
    pub deposit_paid_at: Option<DateTime<Utc>>,
    /// `start + grace period`, fixed at creation
    pub expires_at: DateTime<Utc>,
    /// False once the reservation reached a terminal status
    pub active: bool,
    pub notes: Option<String>,
    /// Rental created at check-in
    pub rental_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Build a `Pending` reservation from a validated request.
    pub fn from_request(req: NewReservation, grace_period_minutes: i64, now: DateTime<Utc>) -> Self {
        let has_deposit = req.has_deposit();
        let (deposit_amount, deposit_paid_at) = if has_deposit {
            (
                req.deposit_amount.unwrap_or(Decimal::ZERO),
                Some(req.deposit_paid_at.unwrap_or(now)),
            )
        } else {
            (Decimal::ZERO, None)
        };

        Self {
            id: Uuid::new_v4(),
            tenant_id: req.tenant_id,
            model_id: req.model_id,
            jetski_id: req.jetski_id,
            customer_id: req.customer_id,
            seller_id: req.seller_id,
            start: req.start,
            end: req.end,
            status: ReservationStatus::Pending,
            priority: PriorityTier::for_deposit(has_deposit),
            deposit_paid: has_deposit,
            deposit_amount,
            deposit_paid_at,
            expires_at: req.start + Duration::minutes(grace_period_minutes),
            active: true,
            notes: req.notes,
            rental_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }

    /// Active and not yet in a terminal status.
    pub fn holds_capacity(&self) -> bool {
        self.active && self.status.is_open()
    }

    pub fn is_expirable_at(&self, now: DateTime<Utc>) -> bool {
        self.holds_capacity() && !self.deposit_paid && now > self.expires_at
    }

    fn ensure_status(&self, allowed: &[ReservationStatus], action: &str) -> DomainResult<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(DomainError::Business(format!(
                "cannot {action} reservation {} in status {}",
                self.id, self.status
            )))
        }
    }

    fn close(&mut self, status: ReservationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.active = false;
        self.updated_at = now;
    }

    /// Pending → Confirmed
    pub fn confirm(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_status(&[ReservationStatus::Pending], "confirm")?;
        self.status = ReservationStatus::Confirmed;
        self.updated_at = now;
        Ok(())
    }

    /// Pending | Confirmed → Cancelled
    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_status(
            &[ReservationStatus::Pending, ReservationStatus::Confirmed],
            "cancel",
        )?;
        self.close(ReservationStatus::Cancelled, now);
        Ok(())
    }

    /// Any status → Finalized. Links the rental when given.
    pub fn finalize(&mut self, rental_id: Option<Uuid>, now: DateTime<Utc>) {
        if rental_id.is_some() {
            self.rental_id = rental_id;
        }
        self.close(ReservationStatus::Finalized, now);
    }

    /// Pending | Confirmed → Expired, only without deposit and past `expires_at`.
    pub fn expire(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_status(
            &[ReservationStatus::Pending, ReservationStatus::Confirmed],
            "expire",
        )?;
        if self.deposit_paid {
            return Err(DomainError::Business(format!(
                "reservation {} has a paid deposit and never expires automatically",
                self.id
            )));
        }
        if now <= self.expires_at {
            return Err(DomainError::Business(format!(
                "reservation {} is within its grace period until {}",
                self.id,
                self.expires_at.to_rfc3339()
            )));
        }
        self.close(ReservationStatus::Expired, now);
        Ok(())
    }

    /// Overbooked → Guaranteed. Capacity must be checked by the caller.
    pub fn record_deposit(&mut self, amount: Decimal, now: DateTime<Utc>) -> DomainResult<()> {
        if self.deposit_paid {
            return Err(DomainError::Business(format!(
                "deposit already paid for reservation {}",
                self.id
            )));
        }
        self.ensure_status(
            &[ReservationStatus::Pending, ReservationStatus::Confirmed],
            "confirm deposit for",
        )?;
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "deposit amount must be positive, got {amount}"
            )));
        }
        self.deposit_paid = true;
        self.deposit_amount = amount;
        self.deposit_paid_at = Some(now);
        self.priority = PriorityTier::Guaranteed;
        self.updated_at = now;
        Ok(())
    }

    /// Bind a jetski. Unit and conflict checks are the caller's.
    pub fn assign_jetski(&mut self, jetski_id: Uuid, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(current) = self.jetski_id {
            return Err(DomainError::Business(format!(
                "reservation {} already has jetski {current} allocated",
                self.id
            )));
        }
        if !self.active {
            return Err(DomainError::Business(format!(
                "reservation {} is no longer active",
                self.id
            )));
        }
        self.ensure_status(
            &[ReservationStatus::Pending, ReservationStatus::Confirmed],
            "allocate a jetski to",
        )?;
        self.jetski_id = Some(jetski_id);
        self.updated_at = now;
        Ok(())
    }

    /// Window after applying `patch`, validated. `expires_at` is left untouched.
    pub fn patched_window(&self, patch: &ReservationPatch) -> DomainResult<TimeWindow> {
        TimeWindow::new(
            patch.start.unwrap_or(self.start),
            patch.end.unwrap_or(self.end),
        )
    }

    pub fn apply_patch(&mut self, patch: ReservationPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if matches!(
            self.status,
            ReservationStatus::Cancelled | ReservationStatus::Finalized | ReservationStatus::Expired
        ) {
            return Err(DomainError::Business(format!(
                "cannot update reservation {} in status {}",
                self.id, self.status
            )));
        }
        let window = self.patched_window(&patch)?;
        self.start = window.start;
        self.end = window.end;
        if patch.seller_id.is_some() {
            self.seller_id = patch.seller_id;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
        self.updated_at = now;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
