//! Shared request and response types.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginatedPosts, PaginationMeta, PaginationParams};
pub use response::{Created, NoContent};
