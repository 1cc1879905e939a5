use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use bytes::Bytes;
use http_body_util::BodyExt;
use tower::{Service, ServiceExt};

use crate::{
    error::{BoxError, VespaError, VespaResult},
    target::ServiceKind,
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

pub fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

/// reqwest client as a tower service whose responses carry the collected body.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}
impl HttpClient {
    pub fn new(timeout: Duration) -> VespaResult<Self> {
        let client = reqwest::Client::builder().user_agent(APP_USER_AGENT).timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Service<http::Request<Bytes>> for HttpClient {
    type Response = http::Response<Bytes>;
    type Error = reqwest::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.client.poll_ready(cx)
    }

    fn call(&mut self, request: http::Request<Bytes>) -> Self::Future {
        match reqwest::Request::try_from(request) {
            Ok(req) => {
                let fut = self.client.call(req);
                Box::pin(async move {
                    let (parts, body) = http::Response::<reqwest::Body>::from(fut.await?).into_parts();
                    let bytes = body.collect().await?.to_bytes();
                    Ok::<_, reqwest::Error>(http::Response::from_parts(parts, bytes))
                })
            }
            Err(e) => Box::pin(async move { Err(e) }),
        }
    }
}

/// Sends `request` to the `kind` service, attributing transport failures to it.
pub async fn send<S>(
    service: &mut S,
    kind: ServiceKind,
    request: http::Request<Bytes>,
) -> VespaResult<http::Response<Bytes>>
where
    S: Service<http::Request<Bytes>, Response = http::Response<Bytes>>,
    S::Error: Into<BoxError>,
{
    let url = request.uri().to_string();
    tracing::debug!(method = %request.method(), url = %url, "sending request");
    let unreachable = |e: S::Error| VespaError::Unreachable { service: kind, url: url.clone(), source: e.into() };
    let response = service.ready().await.map_err(unreachable)?.call(request).await.map_err(unreachable)?;
    tracing::debug!(status = %response.status(), url = %url, "received response");
    Ok(response)
}

/// Maps a non-success response to the matching error, passing success through.
pub fn check_status(kind: ServiceKind, url: &str, response: http::Response<Bytes>) -> VespaResult<Bytes> {
    let status = response.status();
    let body = String::from_utf8_lossy(response.body()).into_owned();
    if status.is_success() {
        Ok(response.into_body())
    } else if status.is_client_error() {
        Err(VespaError::InvalidRequest { url: url.to_string(), status, body })
    } else {
        Err(VespaError::ServiceFailure { service: kind, url: url.to_string(), status, body })
    }
}

/// Pretty prints `body` when it is json, otherwise returns it as text.
pub fn pretty_json(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned()),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
