//! HTTP request handlers, one module per audience.

pub mod admin_handler;
pub mod anonymous_handler;
pub mod auth_handler;
pub mod counselor_handler;
pub mod guest_handler;
pub mod health_handler;
pub mod report_handler;
pub mod student_handler;
pub mod teacher_handler;

pub use admin_handler::admin_routes;
pub use anonymous_handler::anonymous_routes;
pub use auth_handler::{auth_routes, session_routes};
pub use counselor_handler::counselor_routes;
pub use guest_handler::guest_routes;
pub use health_handler::health_routes;
pub use report_handler::report_routes;
pub use student_handler::student_routes;
pub use teacher_handler::teacher_routes;
