//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! stockroom products list --search lamp --category Home
//! stockroom products low-stock
//!
//! # Manager view only
//! stockroom products add --name "Desk Lamp" --sku LAMP-01 --category Home --price 39.99 --quantity 10
//! stockroom products set-quantity 3 25
//! stockroom products delete 3
//! ```

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use tracing::info;

use stockroom_core::{Product, ProductDraft, ProductFilter, ProductId, format_usd};

use crate::error::CommandError;
use crate::output::Output;
use crate::workspace::Workspace;

#[derive(Subcommand)]
pub enum ProductAction {
    /// List the catalog
    List {
        /// Match name, description or SKU (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Show { id: i32 },
    /// Products at or below their low-stock threshold
    LowStock,
    /// Distinct catalog categories
    Categories,
    /// Add a product (manager)
    Add(NewProduct),
    /// Change product fields (manager)
    Update {
        id: i32,
        #[command(flatten)]
        changes: ProductChanges,
    },
    /// Set units on hand (manager)
    SetQuantity {
        id: i32,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Delete a product (manager)
    Delete { id: i32 },
}

#[derive(Args)]
pub struct NewProduct {
    #[arg(long)]
    name: String,
    #[arg(long)]
    sku: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    price: Decimal,
    #[arg(long, default_value_t = 0)]
    quantity: u32,
    #[arg(long, default_value_t = 5)]
    low_stock_threshold: u32,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    image_url: String,
}

impl From<NewProduct> for ProductDraft {
    fn from(args: NewProduct) -> Self {
        Self {
            name: args.name,
            description: args.description,
            sku: args.sku,
            category: args.category,
            price: args.price,
            quantity: args.quantity,
            low_stock_threshold: args.low_stock_threshold,
            image_url: args.image_url,
        }
    }
}

#[derive(Args)]
pub struct ProductChanges {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    low_stock_threshold: Option<u32>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
}

impl ProductChanges {
    fn apply(self, draft: &mut ProductDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(sku) = self.sku {
            draft.sku = sku;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(threshold) = self.low_stock_threshold {
            draft.low_stock_threshold = threshold;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(image_url) = self.image_url {
            draft.image_url = image_url;
        }
    }
}

/// Run a `products` subcommand.
///
/// # Errors
///
/// Returns `CommandError` on store failures or when a manager action is run
/// in customer view.
pub async fn run(ws: &Workspace, out: Output, action: ProductAction) -> Result<(), CommandError> {
    let store = ws.products();
    match action {
        ProductAction::List { search, category } => {
            let filter = ProductFilter { search, category };
            let products = filter.apply(store.get_all().await?);
            out.show(&products, |p| render_table(p))?;
        }
        ProductAction::Show { id } => {
            let product = store.get_by_id(ProductId::new(id)).await?;
            out.show(&product, render_detail)?;
        }
        ProductAction::LowStock => {
            let products = store.low_stock().await?;
            out.show(&products, |p| render_table(p))?;
        }
        ProductAction::Categories => {
            let categories = store.categories().await?;
            out.show(&categories, |c| c.join("\n"))?;
        }
        ProductAction::Add(args) => {
            ws.require_manager("products add")?;
            let product = store.create(args.into()).await?;
            info!(product_id = %product.id, sku = %product.sku, "Product added");
            out.show(&product, render_detail)?;
        }
        ProductAction::Update { id, changes } => {
            ws.require_manager("products update")?;
            let id = ProductId::new(id);
            let mut draft = ProductDraft::from(store.get_by_id(id).await?);
            changes.apply(&mut draft);
            let product = store.update(id, draft).await?;
            info!(product_id = %id, "Product updated");
            out.show(&product, render_detail)?;
        }
        ProductAction::SetQuantity { id, quantity } => {
            ws.require_manager("products set-quantity")?;
            let product = store.update_quantity(ProductId::new(id), quantity).await?;
            info!(product_id = %product.id, quantity = product.quantity, "Stock updated");
            out.show(&product, render_detail)?;
        }
        ProductAction::Delete { id } => {
            ws.require_manager("products delete")?;
            store.delete(ProductId::new(id)).await?;
            info!(product_id = id, "Product deleted");
            out.note(&format!("Deleted product {id}"));
        }
    }
    Ok(())
}

fn render_row(product: &Product) -> String {
    format!(
        "{:>4}  {:<28} {:<12} {:<12} {:>10} {:>6}  {}",
        product.id,
        product.name,
        product.sku,
        product.category,
        format_usd(product.price),
        product.quantity,
        product.stock_level(),
    )
}

pub(crate) fn render_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found".to_string();
    }
    let header = format!(
        "{:>4}  {:<28} {:<12} {:<12} {:>10} {:>6}  STATUS",
        "ID", "NAME", "SKU", "CATEGORY", "PRICE", "QTY"
    );
    std::iter::once(header)
        .chain(products.iter().map(render_row))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_detail(product: &Product) -> String {
    format!(
        "#{} {}\n  SKU:        {}\n  Category:   {}\n  Price:      {}\n  On hand:    {} ({}, threshold {})\n  Value:      {}\n  {}",
        product.id,
        product.name,
        product.sku,
        product.category,
        format_usd(product.price),
        product.quantity,
        product.stock_level(),
        product.low_stock_threshold,
        format_usd(product.inventory_value()),
        product.description,
    )
}
