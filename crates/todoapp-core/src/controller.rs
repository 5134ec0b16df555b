use std::cell::{
  Ref,
  RefCell
};
use std::collections::BTreeSet;
use std::rc::Rc;

use todoapp_shared::{
  TaskDto,
  TaskId,
  TaskPatch
};
use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::filter::{
  Filter,
  apply_filter
};
use crate::gateway::{
  Gateway,
  Reply
};
use crate::host::{
  Notifier,
  TaskView
};
use crate::store::{
  Counters,
  TaskStore
};

pub const EMPTY_TITLE_WARNING: &str =
  "Please enter a task.";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum ActionOutcome {
  /// The server accepted the change.
  Done,
  /// Refused locally before any request went out.
  Rejected,
  /// Another mutation for the same task is still in flight.
  Busy,
  /// No rendered task has that id.
  Missing,
  /// Server rejection or transport failure; already logged and
  /// reported.
  Failed,
  /// The session ended during the call.
  SessionExpired
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct ClearReport {
  pub attempted:   usize,
  pub failed:      usize,
  /// The session expired before every delete was issued.
  pub interrupted: bool
}

/// Drives create/toggle/delete/clear against the gateway and keeps the
/// task store, and through it the view, in step.
///
/// Cheap to clone; clones share the store and the in-flight set, so an
/// event handler can take its own copy into a spawned future.
#[derive(Clone)]
pub struct TaskController {
  gateway:   Gateway,
  store:     Rc<RefCell<TaskStore>>,
  in_flight: Rc<RefCell<BTreeSet<TaskId>>>,
  view:      Rc<dyn TaskView>,
  notifier:  Rc<dyn Notifier>
}

impl TaskController {
  pub fn new(
    gateway: Gateway,
    view: Rc<dyn TaskView>,
    notifier: Rc<dyn Notifier>
  ) -> Self {
    Self {
      gateway,
      store: Rc::new(RefCell::new(
        TaskStore::new()
      )),
      in_flight: Rc::new(RefCell::new(
        BTreeSet::new()
      )),
      view,
      notifier
    }
  }

  pub fn store(&self) -> Ref<'_, TaskStore> {
    self.store.borrow()
  }

  pub fn gateway(&self) -> &Gateway {
    &self.gateway
  }

  pub fn is_in_flight(
    &self,
    id: &TaskId
  ) -> bool {
    self.in_flight.borrow().contains(id)
  }

  /// Replace the rendered list with the server's.
  #[tracing::instrument(skip(self))]
  pub async fn load(&self) -> ActionOutcome {
    let reply = self.gateway.list_tasks().await;
    let tasks = match reply {
      | Reply::Success(response) => {
        match response.json::<Vec<TaskDto>>() {
          | Ok(tasks) => tasks,
          | Err(err) => {
            self.report(
              "Could not read the task list",
              &err.to_string()
            );
            return ActionOutcome::Failed;
          }
        }
      }
      | Reply::SessionExpired => {
        return ActionOutcome::SessionExpired;
      }
      | other => {
        self.report_reply(
          "Could not load tasks",
          &other
        );
        return ActionOutcome::Failed;
      }
    };

    info!(count = tasks.len(), "loaded tasks");
    self.store.borrow_mut().replace_all(tasks);
    self.render();
    self.update_counters();
    ActionOutcome::Done
  }

  /// Create a task from raw input. On `Done` the caller clears its input
  /// field; on anything else the input stays as typed.
  #[tracing::instrument(skip(self))]
  pub async fn add(
    &self,
    input: &str
  ) -> ActionOutcome {
    let title = input.trim();
    if title.is_empty() {
      self.notifier.warn(EMPTY_TITLE_WARNING);
      return ActionOutcome::Rejected;
    }

    match self.gateway.create_task(title).await {
      | Reply::Success(response) => {
        match response.json::<TaskDto>() {
          | Ok(task) => {
            debug!(id = %task.id, "task created");
            self.store.borrow_mut().append(task);
            self.render();
            self.update_counters();
            ActionOutcome::Done
          }
          | Err(err) => {
            self.report(
              "Failed to create task",
              &err.to_string()
            );
            ActionOutcome::Failed
          }
        }
      }
      | Reply::SessionExpired => {
        ActionOutcome::SessionExpired
      }
      | other => {
        self.report_reply(
          "Failed to create task",
          &other
        );
        ActionOutcome::Failed
      }
    }
  }

  /// Flip a task's completion right away, then tell the server. A failed
  /// update is reported but the flip stays.
  #[tracing::instrument(skip(self, id), fields(id = %id))]
  pub async fn toggle(
    &self,
    id: &TaskId
  ) -> ActionOutcome {
    if let Err(outcome) = self.begin(id) {
      return outcome;
    }

    let toggled =
      self.store.borrow_mut().toggle(id);
    let Some(completed) = toggled else {
      self.finish(id);
      return ActionOutcome::Missing;
    };
    self.render();
    self.update_counters();

    let patch = TaskPatch {
      completed: Some(completed)
    };
    let reply =
      self.gateway.update_task(id, &patch).await;
    self.finish(id);

    match reply {
      | Reply::Success(_) => {
        debug!(completed, "task updated");
        ActionOutcome::Done
      }
      | Reply::SessionExpired => {
        ActionOutcome::SessionExpired
      }
      | other => {
        self.report_reply(
          "Failed to update task",
          &other
        );
        ActionOutcome::Failed
      }
    }
  }

  /// Ask the server to delete a task. The node is only marked as leaving
  /// once the server agreed; [`Self::finish_removal`] takes it out.
  #[tracing::instrument(skip(self, id), fields(id = %id))]
  pub async fn delete(
    &self,
    id: &TaskId
  ) -> ActionOutcome {
    if self.store.borrow().get(id).is_none() {
      return ActionOutcome::Missing;
    }
    if let Err(outcome) = self.begin(id) {
      return outcome;
    }

    let reply = self.gateway.delete_task(id).await;
    self.finish(id);

    match reply {
      | Reply::Success(_) => {
        let marked = self
          .store
          .borrow_mut()
          .mark_removing(id);
        if marked {
          self.render();
        }
        ActionOutcome::Done
      }
      | Reply::SessionExpired => {
        ActionOutcome::SessionExpired
      }
      | other => {
        self.report_reply(
          "Failed to delete",
          &other
        );
        ActionOutcome::Failed
      }
    }
  }

  /// The removal transition for `id` has played out.
  pub fn finish_removal(&self, id: &TaskId) {
    let removed =
      self.store.borrow_mut().remove(id);
    if removed.is_some() {
      self.render();
      self.update_counters();
    }
  }

  /// Delete every rendered task one at a time, then empty the list no
  /// matter how many deletes failed.
  #[tracing::instrument(skip(self))]
  pub async fn clear_all(&self) -> ClearReport {
    let ids = self.store.borrow().ids();
    let mut report = ClearReport::default();

    for id in &ids {
      report.attempted += 1;
      match self.gateway.delete_task(id).await {
        | Reply::Success(_) => {}
        | Reply::SessionExpired => {
          report.interrupted = true;
          break;
        }
        | other => {
          report.failed += 1;
          warn!(
            id = %id,
            status = ?other.status(),
            "delete failed during clear"
          );
        }
      }
    }

    if report.failed > 0 {
      self.notifier.notice(&format!(
        "{} of {} tasks could not be \
         deleted on the server",
        report.failed, report.attempted
      ));
    }

    self.store.borrow_mut().clear();
    self.render();
    self.update_counters();
    info!(
      attempted = report.attempted,
      failed = report.failed,
      interrupted = report.interrupted,
      "cleared task list"
    );
    report
  }

  pub fn filter(&self, filter: Filter) {
    apply_filter(
      &mut self.store.borrow_mut(),
      filter
    );
    self.render();
  }

  pub fn counters(&self) -> Counters {
    self.store.borrow().counters()
  }

  pub fn update_counters(&self) {
    let counters = self.counters();
    self.view.show_counters(counters);
  }

  pub fn logout(&self) {
    info!("logging out");
    self.gateway.end_session();
  }

  fn begin(
    &self,
    id: &TaskId
  ) -> Result<(), ActionOutcome> {
    if self
      .store
      .borrow()
      .get(id)
      .is_some_and(|node| node.removing)
    {
      return Err(ActionOutcome::Busy);
    }
    if !self
      .in_flight
      .borrow_mut()
      .insert(id.clone())
    {
      debug!(id = %id, "mutation already in flight");
      return Err(ActionOutcome::Busy);
    }
    Ok(())
  }

  fn finish(&self, id: &TaskId) {
    self.in_flight.borrow_mut().remove(id);
  }

  fn render(&self) {
    let store = self.store.borrow();
    self.view.render(&store);
  }

  fn report_reply(
    &self,
    what: &str,
    reply: &Reply
  ) {
    match reply {
      | Reply::ServerError {
        status,
        body
      } => {
        warn!(%status, body = %body, "{what}");
        self.notifier.notice(&format!(
          "{what} (server returned {status})"
        ));
      }
      | Reply::TransportError(err) => {
        self.report(what, &err.to_string());
      }
      | Reply::Success(_)
      | Reply::SessionExpired => {}
    }
  }

  fn report(&self, what: &str, detail: &str) {
    error!(detail, "{what}");
    self
      .notifier
      .notice(&format!("{what}: {detail}"));
  }
}
