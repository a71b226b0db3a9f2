//! Host crate for bizmatch: configuration loading and error types shared by
//! the `bizmatch` binary. The matching and scraping pipeline lives in
//! [`bizmatch_search`].

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, Result};
