//! Casetrack: role-based incident reports and counseling cases.
//!
//! Students, teachers and anonymous visitors file reports. Teachers review
//! them and may forward them to a counselor, who keeps a case record.
//! Once a case is confirmed, the student can ask for counseling sessions.
//!
//! # Layers
//!
//! - **api**: HTTP handlers, session middleware, and routes
//! - **services**: the authenticator, access guard, and workflow engines
//! - **domain**: entities and the pure workflow rules
//! - **infra**: database, session store, and notification sinks
//! - **cli** / **commands**: the `casetrack` binary
//!
//! # CLI Usage
//!
//! ```bash
//! casetrack migrate up
//! CASETRACK_PASSWORD=... casetrack users create --role admin \
//!     --username principal --email principal@school.edu \
//!     --first-name Ana --last-name Reyes
//! casetrack serve
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Report, SessionIdentity, User, UserRole};
pub use errors::{AppError, AppResult};
