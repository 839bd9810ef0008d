pub mod category;
pub mod todo;
pub mod user;

pub use category::{Category, CategoryChanges, NewCategory, DEFAULT_COLOR};
pub use todo::{CategorySummary, NewTodo, Priority, Todo, TodoChanges};
pub use user::{NewUser, Role, User};
