//! Manager dashboard.

use serde::Serialize;

use stockroom_core::format_usd;
use stockroom_storefront::dashboard::{Dashboard, DashboardStats};

use super::{orders, products};
use crate::error::CommandError;
use crate::output::Output;
use crate::workspace::Workspace;

#[derive(Serialize)]
struct DashboardView<'a> {
    stats: &'a DashboardStats,
    low_stock: &'a [stockroom_core::Product],
    recent_orders: &'a [stockroom_core::Order],
}

/// Print inventory and order headline figures.
///
/// # Errors
///
/// Returns `CommandError` in customer view or on store failure.
pub async fn run(ws: &Workspace, out: Output) -> Result<(), CommandError> {
    ws.require_manager("dashboard")?;
    let dashboard = Dashboard::load(ws.products(), ws.orders()).await?;

    let view = DashboardView {
        stats: &dashboard.stats,
        low_stock: &dashboard.low_stock,
        recent_orders: &dashboard.recent_orders,
    };
    out.show(&view, render)
}

fn render(view: &DashboardView<'_>) -> String {
    let stats = view.stats;
    let mut sections = vec![format!(
        "Products:        {}\nLow stock:       {}\nOut of stock:    {}\nInventory value: {}\nPending orders:  {}\nProcessing:      {}",
        stats.total_products,
        stats.low_stock_count,
        stats.out_of_stock_count,
        format_usd(stats.inventory_value),
        stats.pending_orders,
        stats.processing_orders,
    )];
    if stats.needs_attention() {
        sections.push(format!(
            "Inventory alert: {} low, {} out of stock",
            stats.low_stock_count, stats.out_of_stock_count
        ));
    }
    if !view.low_stock.is_empty() {
        sections.push(format!("Low stock\n{}", products::render_table(view.low_stock)));
    }
    sections.push(format!("Recent orders\n{}", orders::render_table(view.recent_orders)));
    sections.join("\n\n")
}
