use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::database::models::{Category, CategoryChanges, NewCategory, DEFAULT_COLOR};
use crate::database::CategoryRepository;
use crate::services::error::{optional_text, parse_id, required_text, ServiceError, ServiceResult};

/// POST /api/categories body
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// PUT /api/categories/:id body. The owner is not part of the patch.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, owner: Uuid) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.list_for_owner(owner).await?)
    }

    pub async fn get_one(&self, owner: Uuid, id: &str) -> ServiceResult<Category> {
        let id = parse_id(id, "ID")?;
        self.repo
            .find_for_owner(owner, id)
            .await?
            .ok_or(ServiceError::NotFound("Category"))
    }

    pub async fn create(&self, owner: Uuid, input: CreateCategory) -> ServiceResult<Category> {
        let name = required_text(input.name, "name", "Name")?;
        let description = required_text(input.description, "description", "Description")?;
        let color = color_or_default(input.color);

        let category = self
            .repo
            .insert(owner, NewCategory { name, description, color })
            .await?;

        info!("User {} created category {}", owner, category.id);
        Ok(category)
    }

    pub async fn update(&self, owner: Uuid, id: &str, input: UpdateCategory) -> ServiceResult<Category> {
        let id = parse_id(id, "ID")?;
        let changes = CategoryChanges {
            name: optional_text(input.name, "name", "Name")?,
            description: optional_text(input.description, "description", "Description")?,
            color: input.color.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        };

        self.repo
            .update_for_owner(owner, id, changes)
            .await?
            .ok_or(ServiceError::NotFound("Category"))
    }

    /// Removes the category together with its todos.
    pub async fn delete(&self, owner: Uuid, id: &str) -> ServiceResult<()> {
        let id = parse_id(id, "ID")?;
        if !self.repo.delete_for_owner(owner, id).await? {
            return Err(ServiceError::NotFound("Category"));
        }

        info!("User {} deleted category {}", owner, id);
        Ok(())
    }
}

fn color_or_default(color: Option<String>) -> String {
    color
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
}
