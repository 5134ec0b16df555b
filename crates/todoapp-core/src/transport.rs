use async_trait::async_trait;
use http::header::{
  CONTENT_TYPE,
  HeaderMap,
  HeaderValue
};
use http::{
  Method,
  StatusCode
};
use serde::Serialize;

/// Failure below the HTTP layer: nothing usable came back from the
/// server.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
  #[error("network request failed: {0}")]
  Network(String),
  #[error("invalid request: {0}")]
  InvalidRequest(String),
  #[error("malformed response body: {0}")]
  Decode(String)
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
  pub method:  Method,
  pub url:     String,
  pub headers: HeaderMap,
  pub body:    Option<String>
}

impl ApiRequest {
  pub fn new(
    method: Method,
    url: impl Into<String>
  ) -> Self {
    Self {
      method,
      url: url.into(),
      headers: HeaderMap::new(),
      body: None
    }
  }

  pub fn get(
    url: impl Into<String>
  ) -> Self {
    Self::new(Method::GET, url)
  }

  pub fn delete(
    url: impl Into<String>
  ) -> Self {
    Self::new(Method::DELETE, url)
  }

  /// Attach a JSON body and the matching content type.
  pub fn json<B: Serialize + ?Sized>(
    mut self,
    body: &B
  ) -> Result<Self, TransportError> {
    let encoded =
      serde_json::to_string(body)
        .map_err(|err| {
          TransportError::InvalidRequest(
            err.to_string()
          )
        })?;
    self.headers.insert(
      CONTENT_TYPE,
      HeaderValue::from_static(
        "application/json"
      )
    );
    self.body = Some(encoded);
    Ok(self)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
  pub status: StatusCode,
  pub body:   String
}

impl HttpResponse {
  pub fn new(
    status: u16,
    body: impl Into<String>
  ) -> Self {
    Self {
      status: StatusCode::from_u16(
        status
      )
      .unwrap_or(
        StatusCode::INTERNAL_SERVER_ERROR
      ),
      body:   body.into()
    }
  }

  pub fn ok(&self) -> bool {
    self.status.is_success()
  }

  pub fn json<T: serde::de::DeserializeOwned>(
    &self
  ) -> Result<T, TransportError> {
    serde_json::from_str(&self.body)
      .map_err(|err| {
        TransportError::Decode(
          err.to_string()
        )
      })
  }
}

/// Issues one HTTP exchange. Implementations never retry and never
/// translate status codes into errors: any response the server produced
/// is returned as-is.
#[async_trait(?Send)]
pub trait HttpTransport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> Result<HttpResponse, TransportError>;
}
