//! Session, request gateway and task-list state shared by every todoapp
//! front end.
//!
//! Nothing in here touches a real document or socket: front ends plug in
//! an [`transport::HttpTransport`], a [`session::KeyValueStorage`] and the
//! [`host`] traits, then drive the controllers.

pub mod config;
pub mod controller;
pub mod filter;
pub mod gateway;
pub mod host;
pub mod login;
pub mod session;
pub mod store;
pub mod transport;

pub use controller::{
  ActionOutcome,
  ClearReport,
  TaskController
};
pub use filter::Filter;
pub use gateway::{
  ApiPaths,
  Gateway,
  Reply
};
pub use login::{
  LoginController,
  LoginOutcome
};
pub use session::Session;
pub use store::{
  Counters,
  TaskNode,
  TaskState,
  TaskStore
};
