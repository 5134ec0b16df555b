mod support;

use std::rc::Rc;

use http::Method;
use http::header::{
  AUTHORIZATION,
  HeaderValue
};
use support::{
  Harness,
  RecordingHost,
  ScriptedTransport,
  bearer
};
use todoapp_core::config::Config;
use todoapp_core::login::{
  LOGIN_ERROR_MESSAGE,
  LOGIN_FAILED_MESSAGE
};
use todoapp_core::transport::ApiRequest;
use todoapp_core::{
  ActionOutcome,
  Gateway,
  LoginController,
  LoginOutcome,
  Reply,
  Session
};
use todoapp_shared::TaskId;

fn login_fixture() -> (
  LoginController,
  Rc<ScriptedTransport>,
  Rc<RecordingHost>,
  Session
) {
  let transport = ScriptedTransport::new();
  let host = RecordingHost::new();
  let session = Session::in_memory();
  let login = LoginController::new(
    &Config::default(),
    session.clone(),
    transport.clone(),
    host.clone()
  );
  (login, transport, host, session)
}

#[tokio::test]
async fn login_stores_tokens_and_goes_home() {
  let (login, transport, host, session) = login_fixture();
  transport.respond(200, r#"{"access": "T1", "refresh": "T2"}"#);

  let outcome = login.submit(" a ", "b").await;

  assert_eq!(outcome, LoginOutcome::LoggedIn);
  assert_eq!(session.access_token().as_deref(), Some("T1"));
  assert_eq!(session.refresh_token().as_deref(), Some("T2"));
  assert_eq!(host.visits.borrow().as_slice(), ["/".to_string()]);
  assert_eq!(login.error(), None);

  let request = transport.requests().pop().unwrap();
  assert_eq!(request.method, Method::POST);
  assert_eq!(request.url, "/api/token/");
  assert_eq!(
    request.body.as_deref(),
    Some(r#"{"username":"a","password":"b"}"#)
  );
  assert!(request.headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn login_keeps_password_whitespace() {
  let (login, transport, _host, _session) = login_fixture();
  transport.respond(200, r#"{"access": "x", "refresh": "y"}"#);

  login.submit("a", " pw ").await;
  let request = transport.requests().pop().unwrap();
  assert_eq!(
    request.body.as_deref(),
    Some(r#"{"username":"a","password":" pw "}"#)
  );
}

#[tokio::test]
async fn rejected_login_shows_generic_message() {
  let (login, transport, host, session) = login_fixture();
  transport.respond(
    401,
    r#"{"detail": "No active account found"}"#
  );

  assert_eq!(login.submit("a", "wrong").await, LoginOutcome::Rejected);
  assert_eq!(login.error().as_deref(), Some(LOGIN_FAILED_MESSAGE));
  assert!(!session.is_authenticated());
  assert!(host.visits.borrow().is_empty());
}

#[tokio::test]
async fn unreachable_server_and_garbage_body_are_errors() {
  let (login, transport, _host, session) = login_fixture();
  transport.fail("dns");
  assert_eq!(login.submit("a", "b").await, LoginOutcome::Failed);
  assert_eq!(login.error().as_deref(), Some(LOGIN_ERROR_MESSAGE));

  transport.respond(200, "<html>");
  assert_eq!(login.submit("a", "b").await, LoginOutcome::Failed);
  assert!(!session.is_authenticated());
}

#[tokio::test]
async fn new_attempt_clears_previous_error() {
  let (login, transport, _host, _session) = login_fixture();
  transport.respond(400, "{}");
  login.submit("a", "b").await;
  assert!(login.error().is_some());

  transport.respond(200, r#"{"access": "x", "refresh": "y"}"#);
  login.submit("a", "b").await;
  assert_eq!(login.error(), None);
}

#[tokio::test]
async fn gateway_overwrites_caller_authorization() {
  let h = Harness::new();
  let mut request = ApiRequest::get("/api/tasks/");
  request.headers.insert(
    "authorization",
    HeaderValue::from_static("Bearer forged")
  );

  let reply = h.controller.gateway().request(request).await;
  assert!(reply.is_success());

  let sent = h.transport.requests().pop().unwrap();
  assert_eq!(sent.headers.get_all(AUTHORIZATION).iter().count(), 1);
  assert_eq!(bearer(&sent).as_deref(), Some("Bearer T1"));
}

#[tokio::test]
async fn gateway_sends_no_header_without_session() {
  let transport = ScriptedTransport::new();
  let host = RecordingHost::new();
  let gateway = Gateway::from_config(
    &Config::default(),
    Session::in_memory(),
    transport.clone(),
    host.clone()
  );

  gateway.list_tasks().await;
  assert_eq!(bearer(&transport.requests()[0]), None);
}

#[tokio::test]
async fn gateway_passes_other_failures_through() {
  let h = Harness::new();
  h.transport.respond(403, "forbidden");

  match h.controller.gateway().get_task(&TaskId::Number(3)).await {
    | Reply::ServerError { status, body } => {
      assert_eq!(status.as_u16(), 403);
      assert_eq!(body, "forbidden");
    }
    | other => panic!("unexpected reply: {other:?}")
  }
  assert!(h.session.is_authenticated());
  assert!(h.host.visits.borrow().is_empty());
}

#[tokio::test]
async fn unauthorized_reply_tears_down_session_everywhere() {
  let h = Harness::new();
  h.transport.respond(
    200,
    r#"[{"id": 1, "title": "x", "completed": false}]"#
  );
  h.controller.load().await;

  h.transport.respond(401, r#"{"detail": "expired"}"#);
  assert_eq!(
    h.controller.toggle(&TaskId::Number(1)).await,
    ActionOutcome::SessionExpired
  );

  assert_eq!(h.session.access_token(), None);
  assert_eq!(h.session.refresh_token(), None);
  assert_eq!(h.host.visits.borrow().as_slice(), ["/login/".to_string()]);
  // the caller's own failure branch never ran
  assert!(h.host.notices.borrow().is_empty());
}

#[tokio::test]
async fn unauthorized_load_leaves_store_alone() {
  let h = Harness::new();
  h.transport.respond(401, "");

  assert_eq!(h.controller.load().await, ActionOutcome::SessionExpired);
  assert!(h.controller.store().is_empty());
  assert_eq!(*h.host.renders.borrow(), 0);
}

#[tokio::test]
async fn clear_all_stops_once_session_expires() {
  let h = Harness::new();
  h.transport.respond(
    200,
    r#"[
      {"id": 1, "title": "a", "completed": false},
      {"id": 2, "title": "b", "completed": false}
    ]"#
  );
  h.controller.load().await;
  h.transport.respond(401, "");

  let report = h.controller.clear_all().await;
  assert!(report.interrupted);
  assert_eq!(report.attempted, 1);
  assert!(h.controller.store().is_empty());
  assert!(!h.session.is_authenticated());
}
