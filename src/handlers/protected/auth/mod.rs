// handlers/protected/auth/mod.rs - the caller's own account
pub mod me;
pub mod password;

pub use me::me_get;
pub use password::password_put;
