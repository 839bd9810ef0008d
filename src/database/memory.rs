//! In-process repository backend. Mirrors the PostgreSQL constraints that the
//! services rely on: case-insensitive unique email, same-owner category
//! reference on todos, and cascade from category to todos.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, CategoryChanges, CategorySummary, NewCategory, NewTodo, NewUser, Priority, Role,
    Todo, TodoChanges, User,
};
use crate::database::repository::{CategoryRepository, TodoRepository, UserRepository};

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

/// Rows are kept in insertion order, so reversing gives newest first.
#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    todos: Vec<TodoRecord>,
}

#[derive(Clone)]
struct TodoRecord {
    id: Uuid,
    user_id: Uuid,
    category_id: Uuid,
    title: String,
    description: String,
    priority: Priority,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn owned_category(&self, owner: Uuid, id: Uuid) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id && c.user_id == owner)
    }

    fn resolve(&self, record: &TodoRecord) -> Result<Todo, DatabaseError> {
        let category = self
            .owned_category(record.user_id, record.category_id)
            .ok_or_else(|| DatabaseError::CorruptRow(format!("todo {} lost its category", record.id)))?;

        Ok(Todo {
            id: record.id,
            user_id: record.user_id,
            title: record.title.clone(),
            description: record.description.clone(),
            priority: record.priority,
            completed: record.completed,
            category: CategorySummary {
                id: category.id,
                name: category.name.clone(),
                description: category.description.clone(),
                color: category.color.clone(),
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let stored = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().rev().cloned().collect())
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|user| {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_role(&self, email: &str, role: Role) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .iter_mut()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .map(|user| {
                user.role = role;
                user.updated_at = Utc::now();
                user.clone()
            }))
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Category>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .iter()
            .rev()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_for_owner(&self, owner: Uuid, id: Uuid) -> Result<Option<Category>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.owned_category(owner, id).cloned())
    }

    async fn insert(&self, owner: Uuid, category: NewCategory) -> Result<Category, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == owner) {
            return Err(DatabaseError::ForeignKeyViolation("categories_user_id_fkey".to_string()));
        }

        let now = Utc::now();
        let stored = Category {
            id: Uuid::new_v4(),
            user_id: owner,
            name: category.name,
            description: category.description,
            color: category.color,
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(stored.clone());
        Ok(stored)
    }

    async fn update_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
            .map(|category| {
                if let Some(name) = changes.name {
                    category.name = name;
                }
                if let Some(description) = changes.description {
                    category.description = description;
                }
                if let Some(color) = changes.color {
                    category.color = color;
                }
                category.updated_at = Utc::now();
                category.clone()
            }))
    }

    async fn delete_for_owner(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.categories.len();
        tables.categories.retain(|c| !(c.id == id && c.user_id == owner));
        if tables.categories.len() == before {
            return Ok(false);
        }
        tables.todos.retain(|t| t.category_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .todos
            .iter()
            .rev()
            .filter(|t| t.user_id == owner)
            .map(|t| tables.resolve(t))
            .collect()
    }

    async fn find_for_owner(&self, owner: Uuid, id: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .todos
            .iter()
            .find(|t| t.id == id && t.user_id == owner)
            .map(|t| tables.resolve(t))
            .transpose()
    }

    async fn insert(&self, owner: Uuid, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.owned_category(owner, todo.category_id).is_none() {
            return Err(DatabaseError::ForeignKeyViolation("todos_category_id_user_id_fkey".to_string()));
        }

        let now = Utc::now();
        let record = TodoRecord {
            id: Uuid::new_v4(),
            user_id: owner,
            category_id: todo.category_id,
            title: todo.title,
            description: todo.description,
            priority: todo.priority,
            completed: todo.completed,
            created_at: now,
            updated_at: now,
        };
        tables.todos.push(record.clone());
        tables.resolve(&record)
    }

    async fn update_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(category_id) = changes.category_id {
            let target_exists = tables.todos.iter().any(|t| t.id == id && t.user_id == owner);
            if target_exists && tables.owned_category(owner, category_id).is_none() {
                return Err(DatabaseError::ForeignKeyViolation("todos_category_id_user_id_fkey".to_string()));
            }
        }

        let updated = tables
            .todos
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
            .map(|record| {
                if let Some(title) = changes.title {
                    record.title = title;
                }
                if let Some(description) = changes.description {
                    record.description = description;
                }
                if let Some(priority) = changes.priority {
                    record.priority = priority;
                }
                if let Some(completed) = changes.completed {
                    record.completed = completed;
                }
                if let Some(category_id) = changes.category_id {
                    record.category_id = category_id;
                }
                record.updated_at = Utc::now();
                record.clone()
            });

        updated.map(|record| tables.resolve(&record)).transpose()
    }

    async fn delete_for_owner(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables.todos.retain(|t| !(t.id == id && t.user_id == owner));
        Ok(tables.todos.len() != before)
    }
}
