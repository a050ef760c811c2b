//! Domain values returned by a call.

mod api_error;
pub use self::api_error::{ApiError, ErrorViolation};

mod pagination;
pub use self::pagination::{Pagination, PaginationLinks};

mod resource;
pub use self::resource::{Collection, Item, Meta, Resource};
