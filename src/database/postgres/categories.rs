use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::manager::DatabaseError;
use crate::database::models::{Category, CategoryChanges, NewCategory};
use crate::database::repository::CategoryRepository;

#[async_trait]
impl CategoryRepository for PgStore {
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, description, color, created_at, updated_at
            FROM categories
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_for_owner(&self, owner: Uuid, id: Uuid) -> Result<Option<Category>, DatabaseError> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, description, color, created_at, updated_at
            FROM categories
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert(&self, owner: Uuid, category: NewCategory) -> Result<Category, DatabaseError> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, user_id, name, description, color)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, description, color, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.color)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, DatabaseError> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                color = COALESCE($5, color),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, color, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.color)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_for_owner(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        // todos go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
