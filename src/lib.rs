pub mod batch;
pub mod cli;
pub mod date;
pub mod error;
pub mod menu;
pub mod quote;
pub mod table;
pub mod watchlist;

pub use error::{AppError, Result};
