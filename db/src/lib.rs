//! # Database Module
//!
//! Postgres access for switchboard definitions, read through a diesel r2d2
//! pool. Queries run on tokio's blocking pool so the dialplan engine can
//! await them like any other I/O.
//!
//! - **schema**: `table!` definitions of the switchboard tables
//! - **models**: `Queryable` rows and their conversion into engine types
//! - **api**: [`api::Database`], the [`ivr_dialplan::store::ModuleStore`]
//!   implementation
//!
//! ```rust,no_run
//! use ivr_db::api::Database;
//!
//! let db = Database::new("postgres://ivr@localhost/ivr")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod models;
pub mod schema;

#[macro_use]
extern crate diesel;
