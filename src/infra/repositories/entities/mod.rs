//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod counseling_request;
pub mod counselor_case;
pub mod guidance_request;
pub mod report;
pub mod teacher_review;
pub mod user;
