#![allow(dead_code)]

use std::cell::{
  Cell,
  RefCell
};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use http::Method;
use http::header::AUTHORIZATION;
use todoapp_core::config::Config;
use todoapp_core::host::{
  Navigator,
  Notifier,
  TaskView
};
use todoapp_core::store::{
  Counters,
  TaskStore
};
use todoapp_core::transport::{
  ApiRequest,
  HttpResponse,
  HttpTransport,
  TransportError
};
use todoapp_core::{
  Gateway,
  Session,
  TaskController
};

type SendHook = Box<dyn Fn(&ApiRequest)>;

/// Replays queued responses in order and records every request. Once the
/// queue is empty it answers `200 {}`.
#[derive(Default)]
pub struct ScriptedTransport {
  responses: RefCell<
    VecDeque<Result<HttpResponse, TransportError>>
  >,
  requests:  RefCell<Vec<ApiRequest>>,
  hook:      RefCell<Option<SendHook>>,
  yielding:  Cell<bool>,
  active:    Cell<usize>,
  peak:      Cell<usize>
}

impl ScriptedTransport {
  pub fn new() -> Rc<Self> {
    Rc::new(Self::default())
  }

  pub fn respond(
    &self,
    status: u16,
    body: &str
  ) {
    self
      .responses
      .borrow_mut()
      .push_back(Ok(HttpResponse::new(status, body)));
  }

  pub fn fail(&self, message: &str) {
    self.responses.borrow_mut().push_back(Err(
      TransportError::Network(message.to_string())
    ));
  }

  pub fn on_send(
    &self,
    hook: impl Fn(&ApiRequest) + 'static
  ) {
    self.hook.replace(Some(Box::new(hook)));
  }

  /// Suspend once inside every send, so concurrent callers interleave.
  pub fn yield_on_send(&self) {
    self.yielding.set(true);
  }

  /// Most sends that were ever in progress at the same time.
  pub fn peak_concurrency(&self) -> usize {
    self.peak.get()
  }

  pub fn requests(&self) -> Vec<ApiRequest> {
    self.requests.borrow().clone()
  }

  pub fn calls(&self) -> Vec<(Method, String)> {
    self
      .requests
      .borrow()
      .iter()
      .map(|req| (req.method.clone(), req.url.clone()))
      .collect()
  }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> Result<HttpResponse, TransportError> {
    if let Some(hook) = self.hook.borrow().as_ref() {
      hook(&request);
    }
    self.requests.borrow_mut().push(request);
    self.active.set(self.active.get() + 1);
    self.peak.set(self.peak.get().max(self.active.get()));
    if self.yielding.get() {
      tokio::task::yield_now().await;
    }
    self.active.set(self.active.get() - 1);
    self
      .responses
      .borrow_mut()
      .pop_front()
      .unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
  }
}

#[derive(Default)]
pub struct RecordingHost {
  pub visits:   RefCell<Vec<String>>,
  pub warnings: RefCell<Vec<String>>,
  pub notices:  RefCell<Vec<String>>,
  pub renders:  RefCell<usize>,
  pub counters: RefCell<Option<Counters>>
}

impl RecordingHost {
  pub fn new() -> Rc<Self> {
    Rc::new(Self::default())
  }
}

impl Navigator for RecordingHost {
  fn navigate(&self, path: &str) {
    self.visits.borrow_mut().push(path.to_string());
  }
}

impl Notifier for RecordingHost {
  fn warn(&self, message: &str) {
    self.warnings.borrow_mut().push(message.to_string());
  }

  fn notice(&self, message: &str) {
    self.notices.borrow_mut().push(message.to_string());
  }
}

impl TaskView for RecordingHost {
  fn render(&self, _store: &TaskStore) {
    *self.renders.borrow_mut() += 1;
  }

  fn show_counters(&self, counters: Counters) {
    self.counters.replace(Some(counters));
  }
}

pub struct Harness {
  pub transport:  Rc<ScriptedTransport>,
  pub host:       Rc<RecordingHost>,
  pub session:    Session,
  pub controller: TaskController
}

impl Harness {
  /// Logged-in client with token `T1` against a same-origin API.
  pub fn new() -> Self {
    let transport = ScriptedTransport::new();
    let host = RecordingHost::new();
    let session = Session::in_memory();
    session.set_credential("T1", "T2");

    let gateway = Gateway::from_config(
      &Config::default(),
      session.clone(),
      transport.clone(),
      host.clone()
    );
    let controller =
      TaskController::new(gateway, host.clone(), host.clone());

    Self {
      transport,
      host,
      session,
      controller
    }
  }

  /// Load the store from a JSON task listing.
  pub async fn seed(&self, tasks: &str) {
    self.transport.respond(200, tasks);
    self.controller.load().await;
  }
}

pub fn bearer(request: &ApiRequest) -> Option<String> {
  request
    .headers
    .get(AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .map(str::to_string)
}
