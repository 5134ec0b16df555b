use std::cmp::Ordering;
use std::fmt;
use std::hash::{
  Hash,
  Hasher
};
use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};

/// Server-assigned task identifier.
///
/// The service hands out integer keys today, but the client never does
/// arithmetic on them: it only echoes them back in URLs. Both shapes are
/// accepted so a backend switch to string keys does not break parsing.
///
/// Ids compare by their displayed form, so `7` typed on a command line
/// matches `"7"` from the server.
#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
#[serde(untagged)]
pub enum TaskId {
  Number(u64),
  Text(String)
}

impl TaskId {
  fn key(&self) -> std::borrow::Cow<'_, str> {
    match self {
      | TaskId::Number(value) => {
        value.to_string().into()
      }
      | TaskId::Text(value) => {
        value.as_str().into()
      }
    }
  }
}

impl PartialEq for TaskId {
  fn eq(&self, other: &Self) -> bool {
    self.key() == other.key()
  }
}

impl Eq for TaskId {}

impl Hash for TaskId {
  fn hash<H: Hasher>(
    &self,
    state: &mut H
  ) {
    self.key().hash(state);
  }
}

impl PartialOrd for TaskId {
  fn partial_cmp(
    &self,
    other: &Self
  ) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for TaskId {
  fn cmp(&self, other: &Self) -> Ordering {
    self.key().cmp(&other.key())
  }
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | TaskId::Number(value) => {
        write!(f, "{value}")
      }
      | TaskId::Text(value) => {
        f.write_str(value)
      }
    }
  }
}

impl FromStr for TaskId {
  type Err = std::convert::Infallible;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    let trimmed = raw.trim();
    Ok(match trimmed.parse::<u64>() {
      | Ok(value) => {
        TaskId::Number(value)
      }
      | Err(_) => {
        TaskId::Text(trimmed.to_string())
      }
    })
  }
}

impl From<u64> for TaskId {
  fn from(value: u64) -> Self {
    TaskId::Number(value)
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum TaskPriority {
  Low,
  Medium,
  High
}

impl TaskPriority {
  pub fn from_code(
    code: u8
  ) -> Option<Self> {
    match code {
      | 0 => Some(Self::Low),
      | 1 => Some(Self::Medium),
      | 2 => Some(Self::High),
      | _ => None
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Low => "low",
      | Self::Medium => "medium",
      | Self::High => "high"
    }
  }
}

/// A task as the REST API returns it.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskDto {
  pub id:          TaskId,
  pub title:       String,
  #[serde(default)]
  pub completed:   bool,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub priority:    Option<u8>,
  #[serde(default)]
  pub due_date:    Option<String>,
  #[serde(default)]
  pub created_at:  Option<String>,
  #[serde(default)]
  pub updated_at:  Option<String>
}

impl TaskDto {
  pub fn priority(
    &self
  ) -> Option<TaskPriority> {
    self
      .priority
      .and_then(TaskPriority::from_code)
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskCreate {
  pub title: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
  PartialEq,
)]
pub struct TaskPatch {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub completed: Option<bool>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TokenRequest {
  pub username: String,
  pub password: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TokenPair {
  pub access:  String,
  pub refresh: String
}
