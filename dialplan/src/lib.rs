//! # Dialplan generation
//!
//! Turns the IVR menu tree of a switchboard into an Asterisk dialplan file
//! and asks Asterisk to reload it.
//!
//! A run goes through these steps:
//! 1. **tree**: find the single root module and check the rest hangs from it
//! 2. **assembler**: fetch every module's settings concurrently and join the
//!    compiled fragments back in load order
//! 3. **compiler**: one fragment per module, dispatched on its slug
//! 4. **writer**: replace `user_<id>.conf` under the deployment's directory
//! 5. **reload**: run `asterisk -rx "dialplan reload"`, failures are logged only
//!
//! [`generator::DialplanGenerator`] drives the steps in the background and
//! serializes runs that target the same switchboard. Nothing is reported back
//! to whoever triggered the run; outcomes go to the log.
//!
//! ```no_run
//! use ivr_dialplan::config::Config;
//! use ivr_dialplan::generator::DialplanGenerator;
//! # async fn example(store: std::sync::Arc<dyn ivr_dialplan::store::ModuleStore>) -> anyhow::Result<()> {
//! let config = Config::load("/etc/ivr/dialplan.conf")?;
//! let generator = DialplanGenerator::from_config(store, &config);
//! generator.reload_switchboard(42).await?;
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod compiler;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod reload;
pub mod store;
pub mod tree;
pub mod writer;

#[cfg(test)]
mod testing;
