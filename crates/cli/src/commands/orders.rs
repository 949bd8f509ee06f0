//! Order commands.
//!
//! # Usage
//!
//! ```bash
//! stockroom orders list --status pending
//! stockroom orders recent -n 5
//!
//! # Manager view only
//! stockroom orders status 12 processing
//! stockroom orders delete 12
//! ```

use clap::Subcommand;
use tracing::info;

use stockroom_core::{Order, OrderId, OrderStatus, format_usd};
use stockroom_storefront::OrderLifecycle;
use stockroom_storefront::dashboard::StatusCounts;

use crate::error::CommandError;
use crate::output::Output;
use crate::workspace::Workspace;

#[derive(Subcommand)]
pub enum OrderAction {
    /// List orders, newest first, with per-status counts
    List {
        /// Only orders with this status
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Show one order with its line items
    Show { id: i32 },
    /// The most recent orders
    Recent {
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: usize,
    },
    /// Move an order along its lifecycle (manager)
    Status { id: i32, status: OrderStatus },
    /// Delete an order (manager)
    Delete { id: i32 },
}

/// Run an `orders` subcommand.
///
/// # Errors
///
/// Returns `CommandError` on store failures, illegal status changes, or when a
/// manager action is run in customer view.
pub async fn run(ws: &Workspace, out: Output, action: OrderAction) -> Result<(), CommandError> {
    let store = ws.orders();
    match action {
        OrderAction::List { status } => {
            let mut orders = store.get_all().await?;
            orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            let counts = StatusCounts::tally(&orders);
            if let Some(status) = status {
                orders.retain(|o| o.status == status);
            }
            out.show(&orders, |o| {
                format!("{}\n{}", render_counts(&counts), render_table(o))
            })?;
        }
        OrderAction::Show { id } => {
            let order = store.get_by_id(OrderId::new(id)).await?;
            out.show(&order, render_detail)?;
        }
        OrderAction::Recent { limit } => {
            let orders = store.recent(limit).await?;
            out.show(&orders, |o| render_table(o))?;
        }
        OrderAction::Status { id, status } => {
            ws.require_manager("orders status")?;
            let order = OrderLifecycle::new(store)
                .transition(OrderId::new(id), status)
                .await?;
            out.show(&order, render_detail)?;
        }
        OrderAction::Delete { id } => {
            ws.require_manager("orders delete")?;
            store.delete(OrderId::new(id)).await?;
            info!(order_id = id, "Order deleted");
            out.note(&format!("Deleted order {id}"));
        }
    }
    Ok(())
}

fn render_counts(counts: &StatusCounts) -> String {
    format!(
        "All {} | Pending {} | Processing {} | Completed {} | Cancelled {}",
        counts.all, counts.pending, counts.processing, counts.completed, counts.cancelled
    )
}

pub(crate) fn render_table(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No orders found".to_string();
    }
    orders
        .iter()
        .map(|order| {
            format!(
                "#{:<5} {:<11} {:>3} units {:>10}  {}",
                order.id,
                order.status.as_str(),
                order.unit_count(),
                format_usd(order.total_amount),
                order.created_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_detail(order: &Order) -> String {
    let mut lines = vec![format!(
        "Order #{} ({})\n  Placed:    {}",
        order.id,
        order.status,
        order.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )];
    if let Some(completed_at) = order.completed_at {
        lines.push(format!(
            "  Completed: {}",
            completed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    lines.extend(order.items.iter().map(|item| {
        format!(
            "  product {:>4}  {:>3} x {:>10}",
            item.product_id,
            item.quantity,
            format_usd(item.price_at_add)
        )
    }));
    lines.push(format!("  Total:     {}", format_usd(order.total_amount)));
    lines.join("\n")
}
