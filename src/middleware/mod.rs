pub mod admin;
pub mod auth;
pub mod response;

pub use admin::authorize_admin;
pub use auth::{authenticate, AuthUser};
pub use response::{ApiResponse, ApiResult, ValidatedJson};
