//! `stockroom` subcommands.

pub mod cart;
pub mod dashboard;
pub mod migrate;
pub mod orders;
pub mod products;
pub mod view_mode;
