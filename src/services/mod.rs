pub mod category_service;
pub mod credential_service;
pub mod error;
pub mod todo_service;

pub use category_service::{CategoryService, CreateCategory, UpdateCategory};
pub use credential_service::{CredentialService, Credentials, PasswordChange, Registration};
pub use error::{ServiceError, ServiceResult};
pub use todo_service::{CreateTodo, TodoService, UpdateTodo};
