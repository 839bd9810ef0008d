//! Storage contracts. Every category and todo operation takes the owner id and
//! only ever touches rows owned by it; a row owned by someone else behaves
//! exactly like a missing row.

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, CategoryChanges, NewCategory, NewTodo, NewUser, Role, Todo, TodoChanges, User,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `UniqueViolation` when the email is taken (case-insensitive).
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn list(&self) -> Result<Vec<User>, DatabaseError>;

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError>;

    async fn update_role(&self, email: &str, role: Role) -> Result<Option<User>, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Newest first.
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Category>, DatabaseError>;

    async fn find_for_owner(&self, owner: Uuid, id: Uuid) -> Result<Option<Category>, DatabaseError>;

    async fn insert(&self, owner: Uuid, category: NewCategory) -> Result<Category, DatabaseError>;

    async fn update_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, DatabaseError>;

    /// Also removes the category's todos. Returns false when nothing matched.
    async fn delete_for_owner(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Newest first, category resolved.
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError>;

    async fn find_for_owner(&self, owner: Uuid, id: Uuid) -> Result<Option<Todo>, DatabaseError>;

    /// Fails with `ForeignKeyViolation` when the category is not owned by `owner`.
    async fn insert(&self, owner: Uuid, todo: NewTodo) -> Result<Todo, DatabaseError>;

    async fn update_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError>;

    async fn delete_for_owner(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError>;
}
