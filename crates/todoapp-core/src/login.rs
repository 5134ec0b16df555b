use std::cell::RefCell;
use std::rc::Rc;

use todoapp_shared::{
  TokenPair,
  TokenRequest
};
use tracing::{
  error,
  info,
  warn
};

use crate::config::Config;
use crate::gateway::ApiPaths;
use crate::host::Navigator;
use crate::session::Session;
use crate::transport::{
  ApiRequest,
  HttpTransport,
  TransportError
};

pub const LOGIN_FAILED_MESSAGE: &str =
  "Login failed";
pub const LOGIN_ERROR_MESSAGE: &str =
  "An error occurred";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum LoginOutcome {
  LoggedIn,
  /// The server answered with a non-2xx status.
  Rejected,
  /// Nothing usable came back.
  Failed
}

impl LoginOutcome {
  pub fn message(
    self
  ) -> Option<&'static str> {
    match self {
      | LoginOutcome::LoggedIn => None,
      | LoginOutcome::Rejected => {
        Some(LOGIN_FAILED_MESSAGE)
      }
      | LoginOutcome::Failed => {
        Some(LOGIN_ERROR_MESSAGE)
      }
    }
  }
}

/// Trades a username and password for a token pair. This is the only
/// call that bypasses the gateway.
pub struct LoginController {
  paths:     ApiPaths,
  root_path: String,
  session:   Session,
  transport: Rc<dyn HttpTransport>,
  navigator: Rc<dyn Navigator>,
  error:     RefCell<Option<String>>
}

impl LoginController {
  pub fn new(
    config: &Config,
    session: Session,
    transport: Rc<dyn HttpTransport>,
    navigator: Rc<dyn Navigator>
  ) -> Self {
    Self {
      paths: config.api_paths(),
      root_path: config.root_path.clone(),
      session,
      transport,
      navigator,
      error: RefCell::new(None)
    }
  }

  /// Message to show under the form, if the last attempt failed.
  pub fn error(&self) -> Option<String> {
    self.error.borrow().clone()
  }

  #[tracing::instrument(skip(self, password))]
  pub async fn submit(
    &self,
    username: &str,
    password: &str
  ) -> LoginOutcome {
    self.error.replace(None);

    let outcome = match self
      .exchange(username.trim(), password)
      .await
    {
      | Ok(Some(tokens)) => {
        self.session.set_credential(
          &tokens.access,
          &tokens.refresh
        );
        info!("login succeeded");
        self
          .navigator
          .navigate(&self.root_path);
        LoginOutcome::LoggedIn
      }
      | Ok(None) => LoginOutcome::Rejected,
      | Err(err) => {
        error!(error = %err, "login request failed");
        LoginOutcome::Failed
      }
    };

    self.error.replace(
      outcome.message().map(str::to_string)
    );
    outcome
  }

  async fn exchange(
    &self,
    username: &str,
    password: &str
  ) -> Result<Option<TokenPair>, TransportError>
  {
    let request = ApiRequest::new(
      http::Method::POST,
      self.paths.token()
    )
    .json(&TokenRequest {
      username: username.to_string(),
      password: password.to_string()
    })?;

    let response =
      self.transport.send(request).await?;
    if !response.ok() {
      warn!(
        status = %response.status,
        body = %response.body,
        "login failed"
      );
      return Ok(None);
    }

    response.json::<TokenPair>().map(Some)
  }
}
