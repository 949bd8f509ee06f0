//! Cart commands and checkout.
//!
//! The cart is saved in the data directory after every change, so it carries
//! over between invocations.

use clap::Subcommand;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use stockroom_core::{OrderTotals, Product, ProductId, StockLevel, format_usd};
use stockroom_storefront::{Cart, CheckoutReceipt, CheckoutService};

use crate::error::CommandError;
use crate::output::Output;
use crate::workspace::Workspace;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add units of a product
    Add {
        product_id: i32,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Set {
        product_id: i32,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove { product_id: i32 },
    /// Empty the cart
    Clear,
}

/// One cart line resolved against the catalog.
#[derive(Debug, Serialize)]
struct CartLine {
    product_id: ProductId,
    /// `None` when the product has been deleted.
    name: Option<String>,
    quantity: u32,
    price_at_add: Decimal,
    unit_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct CartView {
    lines: Vec<CartLine>,
    item_count: u64,
    totals: OrderTotals,
}

impl CartView {
    fn build(cart: &Cart, catalog: &[Product]) -> Self {
        let lines = cart
            .entries()
            .iter()
            .map(|entry| {
                let product = catalog.iter().find(|p| p.id == entry.product_id);
                CartLine {
                    product_id: entry.product_id,
                    name: product.map(|p| p.name.clone()),
                    quantity: entry.quantity,
                    price_at_add: entry.price_at_add,
                    unit_price: product.map(|p| p.price),
                }
            })
            .collect();
        Self {
            lines,
            item_count: cart.item_count(),
            totals: cart.summary(catalog),
        }
    }

    fn render(&self) -> String {
        if self.lines.is_empty() {
            return "Your cart is empty".to_string();
        }
        let mut out: Vec<String> = self
            .lines
            .iter()
            .map(|line| match (&line.name, line.unit_price) {
                (Some(name), Some(price)) => format!(
                    "{:>4}  {:<28} {:>3} x {:>10} = {:>10}",
                    line.product_id,
                    name,
                    line.quantity,
                    format_usd(price),
                    format_usd(price * Decimal::from(line.quantity)),
                ),
                _ => format!(
                    "{:>4}  {:<28} {:>3}   (no longer available)",
                    line.product_id, "?", line.quantity
                ),
            })
            .collect();
        out.push(format!("Items:    {}", self.item_count));
        out.push(format!("Subtotal: {}", format_usd(self.totals.subtotal)));
        out.push(format!("Tax:      {}", format_usd(self.totals.tax)));
        out.push(format!("Total:    {}", format_usd(self.totals.total)));
        out.join("\n")
    }
}

/// Run a `cart` subcommand.
///
/// # Errors
///
/// Returns `CommandError` if the product cannot be loaded or lacks stock.
pub async fn run(ws: &Workspace, out: Output, action: CartAction) -> Result<(), CommandError> {
    let mut cart = ws.cart();
    match action {
        CartAction::Show => {}
        CartAction::Add {
            product_id,
            quantity,
        } => {
            let product = ws.products().get_by_id(ProductId::new(product_id)).await?;
            let in_cart = cart.entry(product.id).map_or(0, |e| u64::from(e.quantity));
            check_stock(&product, in_cart + u64::from(quantity))?;
            cart.add(&product, quantity);
            info!(product_id = %product.id, quantity, "Added to cart");
        }
        CartAction::Set {
            product_id,
            quantity,
        } => {
            let id = ProductId::new(product_id);
            if quantity > 0 {
                let product = ws.products().get_by_id(id).await?;
                check_stock(&product, quantity.unsigned_abs())?;
            }
            cart.set_quantity(id, quantity);
        }
        CartAction::Remove { product_id } => cart.remove(ProductId::new(product_id)),
        CartAction::Clear => cart.clear(),
    }

    let catalog = ws.products().get_all().await?;
    let view = CartView::build(&cart, &catalog);
    out.show(&view, CartView::render)
}

/// Fail unless `requested` units of `product` are on hand.
fn check_stock(product: &Product, requested: u64) -> Result<(), CommandError> {
    if product.stock_level() == StockLevel::OutOfStock {
        return Err(CommandError::OutOfStock(product.name.clone()));
    }
    if requested > u64::from(product.quantity) {
        return Err(CommandError::ExceedsStock {
            name: product.name.clone(),
            available: product.quantity,
        });
    }
    Ok(())
}

/// Place an order for the cart contents.
///
/// # Errors
///
/// Returns `CommandError::Checkout` if the cart is empty or the order cannot
/// be created. The cart is kept in both cases.
pub async fn checkout(ws: &Workspace, out: Output) -> Result<(), CommandError> {
    let mut cart = ws.cart();
    let catalog = ws.products().get_all().await?;

    let receipt = CheckoutService::new(ws.products(), ws.orders())
        .place_order(&mut cart, &catalog)
        .await?;
    if !receipt.stock_synced() {
        warn!(
            order_id = %receipt.order.id,
            products = ?receipt.unsynced,
            "Some stock levels were not updated"
        );
    }

    out.show(&receipt.order, |_| render_receipt(&receipt))
}

fn render_receipt(receipt: &CheckoutReceipt) -> String {
    format!(
        "Order #{} placed ({})\n  Subtotal: {}\n  Tax:      {}\n  Total:    {}",
        receipt.order.id,
        receipt.order.status,
        format_usd(receipt.totals.subtotal),
        format_usd(receipt.totals.tax),
        format_usd(receipt.totals.total),
    )
}
