//! Repository provider for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate collaborators
//! - `DomainResult`: standard result type for domain operations

use super::customer::CustomerRegistry;
use super::fleet::FleetRegistry;
use super::policy::BookingPolicyRepository;
use super::reservation::ReservationRepository;
use crate::support::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let model = repos.fleet().get_model(tenant_id, model_id).await?;
///     let n = repos.reservations().count_overlapping(tenant_id, model_id, window, None).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn reservations(&self) -> &dyn ReservationRepository;
    fn policies(&self) -> &dyn BookingPolicyRepository;
    fn fleet(&self) -> &dyn FleetRegistry;
    fn customers(&self) -> &dyn CustomerRegistry;
}
