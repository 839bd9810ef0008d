// handlers/elevated/mod.rs - admin role required (authenticate + authorize_admin)
pub mod users;

pub use users::users_get;
