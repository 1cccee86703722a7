//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! The core stays I/O-free; `Transport` is the seam where a host plugs in
//! the actual round-trip. `UreqTransport` is the blocking implementation the
//! scenario suite uses. It disables ureq's status-code-as-error behaviour
//! so 4xx/5xx responses come back as data, and it reads bodies of any size.

use tracing::debug;
use ureq::http::Response;
use ureq::typestate::WithBody;
use ureq::{Agent, Body, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a shared `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder().http_status_as_error(false).build().new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.path, "sending request");

        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;

        let mut response = match method {
            HttpMethod::Get => with_headers(self.agent.get(&path), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&path), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&path), &headers), body.as_deref()),
            HttpMethod::Put => send(with_headers(self.agent.put(&path), &headers), body.as_deref()),
        }?;

        let status = response.status().as_u16();
        // Listings embed every photo as base64, so ureq's 10 MiB default is
        // too small. Invalid UTF-8 is replaced rather than rejected.
        let bytes = response.body_mut().with_config().limit(u64::MAX).read_to_vec()?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(status, url = %path, bytes = bytes.len(), "received response");
        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    headers
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name.as_str(), value.as_str()))
}

fn send(builder: RequestBuilder<WithBody>, body: Option<&[u8]>) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}
