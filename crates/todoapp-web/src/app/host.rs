use todoapp_core::host::{
  Navigator,
  Notifier,
  TaskView
};
use todoapp_core::{
  Counters,
  TaskNode,
  TaskStore
};
use yew::Callback;

/// Full page load, so the next page starts from a fresh store.
#[derive(Debug, Default, Clone, Copy)]
pub struct Redirect;

impl Navigator for Redirect {
  fn navigate(&self, path: &str) {
    tracing::debug!(path, "navigating");
    let Some(window) = web_sys::window()
    else {
      return;
    };
    if let Err(err) =
      window.location().set_href(path)
    {
      tracing::error!(
        error = ?err,
        path,
        "navigation failed"
      );
    }
  }
}

/// Pushes store snapshots and messages into component state.
pub struct PageHost {
  pub on_render:   Callback<Vec<TaskNode>>,
  pub on_counters: Callback<Counters>,
  pub on_notice:   Callback<String>
}

impl Navigator for PageHost {
  fn navigate(&self, path: &str) {
    Redirect.navigate(path);
  }
}

impl Notifier for PageHost {
  fn warn(&self, message: &str) {
    gloo::dialogs::alert(message);
  }

  fn notice(&self, message: &str) {
    self
      .on_notice
      .emit(message.to_string());
  }
}

impl TaskView for PageHost {
  fn render(&self, store: &TaskStore) {
    self
      .on_render
      .emit(store.nodes().to_vec());
  }

  fn show_counters(
    &self,
    counters: Counters
  ) {
    self.on_counters.emit(counters);
  }
}
