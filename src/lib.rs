//! HTTP service collecting waitlist signups into a postgres table.

pub mod app;
pub mod config;
pub mod database;
mod error;
mod telemetry;
mod utils;
pub mod waitlist;
pub mod web;

pub use app::{App, AppState};
pub use error::{Error, Result};
pub use telemetry::{init_dbg_tracing, init_production_tracing};
pub use web::serve;
