use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::manager::DatabaseError;
use crate::database::models::todo::TodoRow;
use crate::database::models::{NewTodo, Todo, TodoChanges};
use crate::database::repository::TodoRepository;

/// Projection of `source` (aliased `t`) joined with its category
fn select_joined(source: &str) -> String {
    format!(
        r#"
        SELECT t.id, t.user_id, t.title, t.description, t.priority, t.completed,
               t.category_id,
               c.name AS category_name,
               c.description AS category_description,
               c.color AS category_color,
               t.created_at, t.updated_at
        FROM {} t
        JOIN categories c ON c.id = t.category_id
        "#,
        source
    )
}

#[async_trait]
impl TodoRepository for PgStore {
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let sql = format!(
            "{} WHERE t.user_id = $1 ORDER BY t.created_at DESC, t.id DESC",
            select_joined("todos")
        );

        sqlx::query_as::<_, TodoRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Todo::try_from)
            .collect()
    }

    async fn find_for_owner(&self, owner: Uuid, id: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!("{} WHERE t.id = $1 AND t.user_id = $2", select_joined("todos"));

        sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .map(Todo::try_from)
            .transpose()
    }

    async fn insert(&self, owner: Uuid, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO todos (id, user_id, category_id, title, description, priority, completed)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            {}
            "#,
            select_joined("inserted")
        );

        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(todo.category_id)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.priority.as_str())
            .bind(todo.completed)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn update_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE todos
                SET title = COALESCE($3, title),
                    description = COALESCE($4, description),
                    priority = COALESCE($5, priority),
                    completed = COALESCE($6, completed),
                    category_id = COALESCE($7, category_id),
                    updated_at = now()
                WHERE id = $1 AND user_id = $2
                RETURNING *
            )
            {}
            "#,
            select_joined("updated")
        );

        sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .bind(owner)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.priority.map(|p| p.as_str()))
            .bind(changes.completed)
            .bind(changes.category_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Todo::try_from)
            .transpose()
    }

    async fn delete_for_owner(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
