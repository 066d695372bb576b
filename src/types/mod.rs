//! Wire types shared across handlers.

mod pagination;
mod response;

pub use pagination::{
    Paginated, PaginatedCounselingRequests, PaginatedGuidanceRequests, PaginatedReports,
    PaginatedUsers, PaginationMeta, PaginationParams,
};
pub use response::{ApiResponse, Created, MessageResponse};
