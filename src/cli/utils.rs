use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;
use crate::database::models::User;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".to_string(), json!(true));
            response.insert("message".to_string(), json!(message));

            if let Some(Value::Object(extra)) = data {
                response.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// A failed command's report, bound for exactly one stream
#[derive(Debug, PartialEq, Eq)]
pub enum ErrorReport {
    Stdout(String),
    Stderr(String),
}

impl ErrorReport {
    pub fn emit(&self) {
        match self {
            ErrorReport::Stdout(text) => println!("{}", text),
            ErrorReport::Stderr(text) => eprintln!("{}", text),
        }
    }
}

/// JSON mode reports on stdout only; text mode on stderr only.
pub fn error_report(output_format: &OutputFormat, message: &str) -> ErrorReport {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message
            });
            ErrorReport::Stdout(
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string()),
            )
        }
        OutputFormat::Text => ErrorReport::Stderr(format!("Error: {}", message)),
    }
}

/// Output accounts as a table or a JSON array
pub fn output_users(output_format: &OutputFormat, users: &[User]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?);
        }
        OutputFormat::Text => {
            if users.is_empty() {
                println!("No users found");
                return Ok(());
            }

            println!("{:<38} {:<32} {:<6} {}", "ID", "EMAIL", "ROLE", "CREATED");
            println!("{}", "-".repeat(96));
            for user in users {
                println!(
                    "{:<38} {:<32} {:<6} {}",
                    user.id,
                    user.email,
                    user.role,
                    user.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_go_to_stdout_only() {
        let ErrorReport::Stdout(text) = error_report(&OutputFormat::Json, "no such user") else {
            panic!("expected stdout report");
        };
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body, json!({ "success": false, "error": "no such user" }));
    }

    #[test]
    fn test_text_errors_go_to_stderr_only() {
        assert_eq!(
            error_report(&OutputFormat::Text, "no such user"),
            ErrorReport::Stderr("Error: no such user".to_string())
        );
    }
}
