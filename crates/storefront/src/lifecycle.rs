//! Order status transitions.
//!
//! The order store accepts any status write. Managers go through
//! [`OrderLifecycle`], which only allows the steps of the lifecycle:
//! pending → processing → completed, and pending/processing → cancelled.

use tracing::{info, instrument, warn};

use stockroom_core::{Order, OrderId, OrderStatus};

use crate::error::{StoreError, StoreResult};
use crate::store::OrderStore;

/// Validated status changes over an order store.
pub struct OrderLifecycle<'a> {
    orders: &'a dyn OrderStore,
}

impl<'a> OrderLifecycle<'a> {
    #[must_use]
    pub const fn new(orders: &'a dyn OrderStore) -> Self {
        Self { orders }
    }

    /// Move an order to `next`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist and
    /// `StoreError::Validation` if the lifecycle forbids the step.
    #[instrument(skip(self))]
    pub async fn transition(&self, id: OrderId, next: OrderStatus) -> StoreResult<Order> {
        let order = self.orders.get_by_id(id).await?;
        if !order.status.can_transition_to(next) {
            warn!(from = %order.status, to = %next, "Rejected order status change");
            return Err(StoreError::Validation(format!(
                "order {id} cannot move from {} to {next}",
                order.status
            )));
        }

        let updated = self.orders.update_status(id, next).await?;
        info!(from = %order.status, to = %updated.status, "Order status updated");
        Ok(updated)
    }

    /// Cancel a pending or processing order.
    ///
    /// # Errors
    ///
    /// See [`OrderLifecycle::transition`].
    pub async fn cancel(&self, id: OrderId) -> StoreResult<Order> {
        self.transition(id, OrderStatus::Cancelled).await
    }
}
