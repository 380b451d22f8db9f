pub mod app;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{FasterApiError, Result};
