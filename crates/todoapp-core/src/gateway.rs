use std::rc::Rc;

use http::StatusCode;
use http::header::{
  AUTHORIZATION,
  HeaderValue
};
use todoapp_shared::{
  TaskCreate,
  TaskId,
  TaskPatch
};
use tracing::{
  debug,
  error,
  warn
};

use crate::config::Config;
use crate::host::Navigator;
use crate::session::Session;
use crate::transport::{
  ApiRequest,
  HttpResponse,
  HttpTransport,
  TransportError
};

/// URL layout of the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPaths {
  base: String
}

impl ApiPaths {
  /// `base` is prepended verbatim; empty means same origin.
  pub fn new(base: &str) -> Self {
    Self {
      base: base
        .trim()
        .trim_end_matches('/')
        .to_string()
    }
  }

  pub fn token(&self) -> String {
    format!("{}/api/token/", self.base)
  }

  pub fn tasks(&self) -> String {
    format!("{}/api/tasks/", self.base)
  }

  /// The id is one path segment; reserved characters and dot segments
  /// are escaped.
  pub fn task(
    &self,
    id: &TaskId
  ) -> String {
    let raw = id.to_string();
    let segment = match raw.as_str() {
      | "." | ".." => raw.replace('.', "%2E"),
      | _ => urlencoding::encode(&raw)
        .into_owned()
    };
    format!(
      "{}/api/tasks/{segment}/",
      self.base
    )
  }
}

/// What every authenticated call resolves to.
#[derive(Debug, Clone)]
pub enum Reply {
  /// Any 2xx status.
  Success(HttpResponse),
  /// Any non-2xx status other than 401, body kept raw.
  ServerError {
    status: StatusCode,
    body:   String
  },
  /// No response arrived.
  TransportError(TransportError),
  /// The server answered 401. The session is already gone and the view
  /// is on its way to the login page; callers do nothing further.
  SessionExpired
}

impl Reply {
  pub fn is_success(&self) -> bool {
    matches!(self, Reply::Success(_))
  }

  pub fn status(
    &self
  ) -> Option<StatusCode> {
    match self {
      | Reply::Success(response) => {
        Some(response.status)
      }
      | Reply::ServerError {
        status,
        ..
      } => Some(*status),
      | Reply::SessionExpired => {
        Some(StatusCode::UNAUTHORIZED)
      }
      | Reply::TransportError(_) => None
    }
  }
}

/// Single chokepoint for authenticated calls: injects the bearer token
/// and owns the 401 policy.
#[derive(Clone)]
pub struct Gateway {
  paths:      ApiPaths,
  login_path: String,
  session:    Session,
  transport:  Rc<dyn HttpTransport>,
  navigator:  Rc<dyn Navigator>
}

impl Gateway {
  pub fn new(
    paths: ApiPaths,
    login_path: impl Into<String>,
    session: Session,
    transport: Rc<dyn HttpTransport>,
    navigator: Rc<dyn Navigator>
  ) -> Self {
    Self {
      paths,
      login_path: login_path.into(),
      session,
      transport,
      navigator
    }
  }

  pub fn from_config(
    config: &Config,
    session: Session,
    transport: Rc<dyn HttpTransport>,
    navigator: Rc<dyn Navigator>
  ) -> Self {
    Self::new(
      config.api_paths(),
      config.login_path.clone(),
      session,
      transport,
      navigator
    )
  }

  /// Clear the session and leave for the login page.
  pub fn end_session(&self) {
    self.session.clear();
    self
      .navigator
      .navigate(&self.login_path);
  }

  #[tracing::instrument(
    skip(self, request),
    fields(method = %request.method, url = %request.url)
  )]
  pub async fn request(
    &self,
    mut request: ApiRequest
  ) -> Reply {
    if let Some(token) =
      self.session.access_token()
    {
      match HeaderValue::from_str(
        &format!("Bearer {token}")
      ) {
        | Ok(mut value) => {
          value.set_sensitive(true);
          request
            .headers
            .insert(AUTHORIZATION, value);
        }
        | Err(err) => {
          error!(error = %err, "stored access token is not a valid header value");
          return Reply::TransportError(
            TransportError::InvalidRequest(
              err.to_string()
            )
          );
        }
      }
    }

    let response =
      match self.transport.send(request).await {
        | Ok(response) => response,
        | Err(error) => {
          error!(%error, "request failed before a response arrived");
          return Reply::TransportError(error);
        }
      };

    if response.status
      == StatusCode::UNAUTHORIZED
    {
      warn!("server rejected credentials; ending session");
      self.end_session();
      return Reply::SessionExpired;
    }

    debug!(status = %response.status, "response received");
    if response.ok() {
      Reply::Success(response)
    } else {
      Reply::ServerError {
        status: response.status,
        body:   response.body
      }
    }
  }

  pub async fn list_tasks(&self) -> Reply {
    self
      .request(ApiRequest::get(
        self.paths.tasks()
      ))
      .await
  }

  pub async fn get_task(
    &self,
    id: &TaskId
  ) -> Reply {
    self
      .request(ApiRequest::get(
        self.paths.task(id)
      ))
      .await
  }

  pub async fn create_task(
    &self,
    title: &str
  ) -> Reply {
    let body = TaskCreate {
      title: title.to_string()
    };
    match ApiRequest::new(
      http::Method::POST,
      self.paths.tasks()
    )
    .json(&body)
    {
      | Ok(request) => {
        self.request(request).await
      }
      | Err(error) => {
        Reply::TransportError(error)
      }
    }
  }

  pub async fn update_task(
    &self,
    id: &TaskId,
    patch: &TaskPatch
  ) -> Reply {
    match ApiRequest::new(
      http::Method::PATCH,
      self.paths.task(id)
    )
    .json(patch)
    {
      | Ok(request) => {
        self.request(request).await
      }
      | Err(error) => {
        Reply::TransportError(error)
      }
    }
  }

  pub async fn delete_task(
    &self,
    id: &TaskId
  ) -> Reply {
    self
      .request(ApiRequest::delete(
        self.paths.task(id)
      ))
      .await
  }
}
