use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

/// Category fields embedded in every todo read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    pub category: CategorySummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    pub category_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub category_id: Option<Uuid>,
}

/// Todo joined with its category, as returned by SQL
#[derive(Debug, FromRow)]
pub struct TodoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub completed: bool,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_description: String,
    pub category_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = DatabaseError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let priority = row.priority.parse().map_err(DatabaseError::CorruptRow)?;
        Ok(Todo {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            priority,
            completed: row.completed,
            category: CategorySummary {
                id: row.category_id,
                name: row.category_name,
                description: row.category_description,
                color: row.category_color,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
