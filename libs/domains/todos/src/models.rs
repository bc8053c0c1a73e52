use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{TodoError, TodoResult};

/// Page size used when a read asks for none (or for a non-positive one)
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// TODO item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    /// Store-assigned identifier, never reused
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "buy milk")]
    pub subject: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /todos`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTodo {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "subject is empty"))]
    #[schema(example = "buy milk")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Body of `PUT /todos`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(range(min = 1, message = "id is empty"))]
    #[schema(example = 1)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "subject is empty"))]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Body of `DELETE /todos`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct DeleteTodos {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ids: Vec<i64>,
}

/// A JSON `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw query of `GET /todos`.
///
/// Kept as strings so an empty value (`?size=`) reads as absent while a
/// non-integer one is rejected with a field-specific message. A repeated key
/// uses its first value.
#[derive(Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReadTodosQuery {
    /// Return only TODOs with an id below this one; 0 or absent starts at the newest
    #[param(value_type = Option<i64>)]
    pub prev_id: Option<String>,
    /// Maximum number of TODOs to return; absent or <= 0 means 10
    #[param(value_type = Option<i64>)]
    pub size: Option<String>,
}

impl ReadTodosQuery {
    /// Build from decoded `key=value` pairs, keeping the first value per key.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "prev_id" => &mut query.prev_id,
                "size" => &mut query.size,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    /// Parse into `(prev_id, size)`, absent values as 0.
    pub fn parse(&self) -> TodoResult<(i64, i64)> {
        Ok((
            parse_param("prev_id", self.prev_id.as_deref())?,
            parse_param("size", self.size.as_deref())?,
        ))
    }
}

fn parse_param(name: &str, raw: Option<&str>) -> TodoResult<i64> {
    match raw {
        None | Some("") => Ok(0),
        Some(value) => value
            .parse()
            .map_err(|_| TodoError::Validation(format!("invalid {}", name))),
    }
}

/// `{"todo": {...}}` envelope for create and update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    pub todo: Todo,
}

/// `{"todos": [...]}` envelope for reads
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodosResponse {
    pub todos: Vec<Todo>,
}

/// Empty `{}` body returned by delete
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DeleteTodosResponse {}
