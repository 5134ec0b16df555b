use std::fmt;
use std::str::FromStr;

use crate::store::{
  TaskNode,
  TaskStore
};

/// Client-side visibility filter over the rendered list.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum Filter {
  #[default]
  All,
  Completed,
  Incomplete
}

#[derive(Debug, Clone, thiserror::Error)]
#[error(
  "unknown filter '{0}' (expected all, \
   completed or incomplete)"
)]
pub struct FilterParseError(String);

impl Filter {
  pub const ALL: [Filter; 3] = [
    Filter::All,
    Filter::Completed,
    Filter::Incomplete
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Filter::All => "all",
      | Filter::Completed => "completed",
      | Filter::Incomplete => "incomplete"
    }
  }

  pub fn admits(
    self,
    node: &TaskNode
  ) -> bool {
    match self {
      | Filter::All => true,
      | Filter::Completed => {
        node.state.is_complete()
      }
      | Filter::Incomplete => {
        !node.state.is_complete()
      }
    }
  }
}

impl fmt::Display for Filter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Filter {
  type Err = FilterParseError;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    match raw.trim() {
      | "all" => Ok(Filter::All),
      | "completed" => Ok(Filter::Completed),
      | "incomplete" => {
        Ok(Filter::Incomplete)
      }
      | other => Err(FilterParseError(
        other.to_string()
      ))
    }
  }
}

/// Set each node's visibility from its state alone. Never adds or
/// removes nodes.
pub fn apply_filter(
  store: &mut TaskStore,
  filter: Filter
) {
  for node in store.nodes_mut() {
    node.visible = filter.admits(node);
  }
}

#[cfg(test)]
mod tests {
  use todoapp_shared::{
    TaskDto,
    TaskId
  };

  use super::*;

  fn store() -> TaskStore {
    let mut store = TaskStore::new();
    store.replace_all(
      [(1, false), (2, true), (3, false)]
        .into_iter()
        .map(|(id, completed)| TaskDto {
          id: TaskId::Number(id),
          title: format!("task {id}"),
          completed,
          description: None,
          priority: None,
          due_date: None,
          created_at: None,
          updated_at: None
        })
        .collect()
    );
    store
  }

  fn visible(
    store: &TaskStore
  ) -> Vec<bool> {
    store
      .nodes()
      .iter()
      .map(|node| node.visible)
      .collect()
  }

  #[test]
  fn filters_by_state() {
    let mut store = store();

    apply_filter(&mut store, Filter::Completed);
    assert_eq!(visible(&store), vec![false, true, false]);

    apply_filter(&mut store, Filter::Incomplete);
    assert_eq!(visible(&store), vec![true, false, true]);

    apply_filter(&mut store, Filter::All);
    assert_eq!(visible(&store), vec![true, true, true]);
    assert_eq!(store.len(), 3);
  }

  #[test]
  fn applying_twice_is_idempotent() {
    for filter in Filter::ALL {
      let mut once = store();
      apply_filter(&mut once, filter);
      let mut twice = once.clone();
      apply_filter(&mut twice, filter);
      assert_eq!(once, twice, "filter {filter}");
    }
  }

  #[test]
  fn parses_select_values() {
    assert_eq!(
      "incomplete".parse::<Filter>().unwrap(),
      Filter::Incomplete
    );
    assert_eq!(
      "completed".parse::<Filter>().unwrap(),
      Filter::Completed
    );
    assert!("done".parse::<Filter>().is_err());
  }
}
