use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder};
use http::Method;
use todoapp_core::transport::{ApiRequest, HttpResponse, HttpTransport, TransportError};

/// `fetch` through gloo-net. Browser futures are not `Send`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTransport;

fn builder_for(method: &Method, url: &str) -> Result<RequestBuilder, TransportError> {
    let builder = if *method == Method::GET {
        Request::get(url)
    } else if *method == Method::POST {
        Request::post(url)
    } else if *method == Method::PATCH {
        Request::patch(url)
    } else if *method == Method::PUT {
        Request::put(url)
    } else if *method == Method::DELETE {
        Request::delete(url)
    } else {
        return Err(TransportError::InvalidRequest(format!(
            "unsupported method {method}"
        )));
    };
    Ok(builder)
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = builder_for(&request.method, &request.url)?;
        for (name, value) in &request.headers {
            let value = value
                .to_str()
                .map_err(|e| TransportError::InvalidRequest(format!("header {name}: {e}")))?;
            builder = builder.header(name.as_str(), value);
        }

        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        tracing::debug!(status, bytes = body.len(), "fetch finished");
        Ok(HttpResponse::new(status, body))
    }
}
