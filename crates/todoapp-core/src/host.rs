//! Seams to whatever is hosting the client: the browser page or the
//! terminal.

use crate::store::{
  Counters,
  TaskStore
};

/// Moves the active view to another page.
pub trait Navigator {
  fn navigate(&self, path: &str);
}

/// User-facing messages.
pub trait Notifier {
  /// Blocking prompt the user has to acknowledge.
  fn warn(&self, message: &str);

  /// Non-blocking report of a failed background operation.
  fn notice(&self, _message: &str) {}
}

/// Projection of the task store onto the screen.
pub trait TaskView {
  fn render(&self, store: &TaskStore);

  /// Hosts without counter displays keep the default.
  fn show_counters(
    &self,
    _counters: Counters
  ) {
  }
}
