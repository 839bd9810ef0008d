use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{NewTodo, Priority, Todo, TodoChanges};
use crate::database::{CategoryRepository, DatabaseError, TodoRepository};
use crate::services::error::{optional_text, parse_id, required_text, ServiceError, ServiceResult};

/// POST /api/todos body. `category` is the id of one of the caller's categories.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub completed: Option<bool>,
}

/// PUT /api/todos/:id body
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Clone)]
pub struct TodoService {
    todos: Arc<dyn TodoRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { todos, categories }
    }

    pub async fn list(&self, owner: Uuid) -> ServiceResult<Vec<Todo>> {
        Ok(self.todos.list_for_owner(owner).await?)
    }

    pub async fn get_one(&self, owner: Uuid, id: &str) -> ServiceResult<Todo> {
        let id = parse_id(id, "ID")?;
        self.todos
            .find_for_owner(owner, id)
            .await?
            .ok_or(ServiceError::NotFound("ToDo"))
    }

    pub async fn create(&self, owner: Uuid, input: CreateTodo) -> ServiceResult<Todo> {
        let title = required_text(input.title, "title", "Title")?;
        let description = required_text(input.description, "description", "Description")?;
        let priority = parse_priority(input.priority)?.unwrap_or_default();

        let category = input
            .category
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ServiceError::invalid_input("category", "Category is required"))?;
        let category_id = self.owned_category(owner, &category).await?;

        let todo = self
            .todos
            .insert(
                owner,
                NewTodo {
                    title,
                    description,
                    priority,
                    completed: input.completed.unwrap_or(false),
                    category_id,
                },
            )
            .await
            .map_err(category_violation)?;

        info!("User {} created todo {}", owner, todo.id);
        Ok(todo)
    }

    pub async fn update(&self, owner: Uuid, id: &str, input: UpdateTodo) -> ServiceResult<Todo> {
        let id = parse_id(id, "ID")?;
        let title = optional_text(input.title, "title", "Title")?;
        let description = optional_text(input.description, "description", "Description")?;
        let priority = parse_priority(input.priority)?;

        let category_id = match input.category {
            Some(category) => Some(self.owned_category(owner, &category).await?),
            None => None,
        };

        let changes = TodoChanges {
            title,
            description,
            priority,
            completed: input.completed,
            category_id,
        };

        self.todos
            .update_for_owner(owner, id, changes)
            .await
            .map_err(category_violation)?
            .ok_or(ServiceError::NotFound("ToDo"))
    }

    pub async fn delete(&self, owner: Uuid, id: &str) -> ServiceResult<()> {
        let id = parse_id(id, "ID")?;
        if !self.todos.delete_for_owner(owner, id).await? {
            return Err(ServiceError::NotFound("ToDo"));
        }

        info!("User {} deleted todo {}", owner, id);
        Ok(())
    }

    /// Resolves a client-supplied category id to one owned by `owner`.
    async fn owned_category(&self, owner: Uuid, raw: &str) -> ServiceResult<Uuid> {
        let category_id = parse_id(raw, "category ID")?;
        match self.categories.find_for_owner(owner, category_id).await? {
            Some(category) => Ok(category.id),
            None => {
                warn!("User {} referenced category {} they do not own", owner, category_id);
                Err(ServiceError::InvalidCategory)
            }
        }
    }
}

fn parse_priority(value: Option<String>) -> ServiceResult<Option<Priority>> {
    value
        .map(|p| {
            p.trim()
                .parse::<Priority>()
                .map_err(|_| ServiceError::invalid_input("priority", "Priority must be Low, Medium or High"))
        })
        .transpose()
}

/// The category can disappear between the ownership check and the write.
fn category_violation(err: DatabaseError) -> ServiceError {
    match err {
        DatabaseError::ForeignKeyViolation(_) => ServiceError::InvalidCategory,
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Category, NewCategory, NewUser, Role, DEFAULT_COLOR};
    use crate::database::{MemoryStore, UserRepository};

    struct Fixture {
        service: TodoService,
        store: MemoryStore,
        alice: Uuid,
        bob: Uuid,
    }

    async fn setup() -> Fixture {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for email in ["a@x.com", "b@x.com"] {
            let user = UserRepository::insert(
                &store,
                NewUser {
                    email: email.to_string(),
                    password_hash: "hash".to_string(),
                    role: Role::User,
                },
            )
            .await
            .unwrap();
            ids.push(user.id);
        }
        let shared = Arc::new(store.clone());
        Fixture {
            service: TodoService::new(shared.clone(), shared),
            store,
            alice: ids[0],
            bob: ids[1],
        }
    }

    async fn category(store: &MemoryStore, owner: Uuid, name: &str) -> Category {
        CategoryRepository::insert(
            store,
            owner,
            NewCategory {
                name: name.to_string(),
                description: "desc".to_string(),
                color: DEFAULT_COLOR.to_string(),
            },
        )
        .await
        .unwrap()
    }

    fn todo(title: &str, category: &Category) -> CreateTodo {
        CreateTodo {
            title: Some(title.to_string()),
            description: Some("something to do".to_string()),
            category: Some(category.id.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_resolves_category_and_defaults() {
        let f = setup().await;
        let work = category(&f.store, f.alice, "Work").await;

        let created = f.service.create(f.alice, todo("T1", &work)).await.unwrap();
        assert_eq!(created.priority, Priority::Medium);
        assert!(!created.completed);
        assert_eq!(created.category.name, "Work");

        let listed = f.service.list(f.alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category.id, work.id);
    }

    #[tokio::test]
    async fn test_create_honours_completed_and_priority() {
        let f = setup().await;
        let work = category(&f.store, f.alice, "Work").await;
        let created = f
            .service
            .create(
                f.alice,
                CreateTodo {
                    priority: Some("High".into()),
                    completed: Some(true),
                    ..todo("T1", &work)
                },
            )
            .await
            .unwrap();
        assert_eq!(created.priority, Priority::High);
        assert!(created.completed);
    }

    #[tokio::test]
    async fn test_create_with_foreign_category_creates_nothing() {
        let f = setup().await;
        let bobs = category(&f.store, f.bob, "Bob").await;

        let err = f.service.create(f.alice, todo("T1", &bobs)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCategory));
        assert!(f.service.list(f.alice).await.unwrap().is_empty());
        assert!(f.service.list(f.bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_validates_inputs() {
        let f = setup().await;
        let work = category(&f.store, f.alice, "Work").await;

        let err = f
            .service
            .create(f.alice, CreateTodo { title: Some(" ".into()), ..todo("T1", &work) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { field: "title", .. }));

        let err = f
            .service
            .create(f.alice, CreateTodo { category: None, ..todo("T1", &work) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { field: "category", .. }));

        let err = f
            .service
            .create(f.alice, CreateTodo { category: Some("nope".into()), ..todo("T1", &work) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidIdentifier("category ID")));

        let err = f
            .service
            .create(f.alice, CreateTodo { priority: Some("Urgent".into()), ..todo("T1", &work) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { field: "priority", .. }));

        let err = f
            .service
            .create(f.alice, CreateTodo { category: Some(Uuid::new_v4().to_string()), ..todo("T1", &work) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCategory));
    }

    #[tokio::test]
    async fn test_update_reverifies_category() {
        let f = setup().await;
        let work = category(&f.store, f.alice, "Work").await;
        let home = category(&f.store, f.alice, "Home").await;
        let bobs = category(&f.store, f.bob, "Bob").await;
        let created = f.service.create(f.alice, todo("T1", &work)).await.unwrap();
        let id = created.id.to_string();

        let err = f
            .service
            .update(f.alice, &id, UpdateTodo { category: Some(bobs.id.to_string()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCategory));
        assert_eq!(f.service.get_one(f.alice, &id).await.unwrap().category.id, work.id);

        let moved = f
            .service
            .update(
                f.alice,
                &id,
                UpdateTodo {
                    category: Some(home.id.to_string()),
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.category.name, "Home");
        assert!(moved.completed);
        assert_eq!(moved.title, "T1");
    }

    #[tokio::test]
    async fn test_update_validates_inputs() {
        let f = setup().await;
        let work = category(&f.store, f.alice, "Work").await;
        let created = f.service.create(f.alice, todo("T1", &work)).await.unwrap();
        let id = created.id.to_string();

        let err = f
            .service
            .update(f.alice, &id, UpdateTodo { priority: Some("Urgent".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { field: "priority", .. }));

        let err = f
            .service
            .update(f.alice, &id, UpdateTodo { category: Some("garbage".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidIdentifier("category ID")));

        let err = f
            .service
            .update(f.alice, &id, UpdateTodo { title: Some("  ".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { field: "title", .. }));

        let err = f
            .service
            .update(f.alice, &id, UpdateTodo { description: Some(String::new()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { field: "description", .. }));

        let unchanged = f.service.get_one(f.alice, &id).await.unwrap();
        assert_eq!(unchanged.title, "T1");
        assert_eq!(unchanged.priority, created.priority);
        assert_eq!(unchanged.category.id, work.id);
    }

    #[tokio::test]
    async fn test_foreign_todo_looks_missing() {
        let f = setup().await;
        let work = category(&f.store, f.alice, "Work").await;
        let created = f.service.create(f.alice, todo("T1", &work)).await.unwrap();
        let id = created.id.to_string();

        assert!(matches!(f.service.get_one(f.bob, &id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            f.service
                .update(f.bob, &id, UpdateTodo { title: Some("mine".into()), ..Default::default() })
                .await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(f.service.delete(f.bob, &id).await, Err(ServiceError::NotFound(_))));
        assert_eq!(f.service.get_one(f.alice, &id).await.unwrap().title, "T1");
    }

    #[tokio::test]
    async fn test_malformed_todo_id_is_distinct_from_missing() {
        let f = setup().await;
        assert!(matches!(
            f.service.get_one(f.alice, "xyz").await,
            Err(ServiceError::InvalidIdentifier("ID"))
        ));
        assert!(matches!(
            f.service.get_one(f.alice, &Uuid::new_v4().to_string()).await,
            Err(ServiceError::NotFound("ToDo"))
        ));
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let f = setup().await;
        let work = category(&f.store, f.alice, "Work").await;
        let created = f.service.create(f.alice, todo("T1", &work)).await.unwrap();
        let id = created.id.to_string();
        f.service.delete(f.alice, &id).await.unwrap();
        assert!(matches!(f.service.delete(f.alice, &id).await, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn test_store_foreign_key_maps_to_invalid_category() {
        let err = category_violation(DatabaseError::ForeignKeyViolation("fk".into()));
        assert!(matches!(err, ServiceError::InvalidCategory));
        let err = category_violation(DatabaseError::CorruptRow("x".into()));
        assert!(matches!(err, ServiceError::Database(_)));
    }
}
