use bytes::Bytes;
use reqwest::Url;
use tower::Service;

use crate::{
    client::send,
    error::{BoxError, VespaError, VespaResult},
    target::{ServiceKind, Target},
};

pub fn status_path(kind: ServiceKind) -> &'static str {
    match kind {
        ServiceKind::Container => "/ApplicationStatus",
        ServiceKind::Deploy => "/status.html",
    }
}

/// Checks that the `kind` service of `target` answers its status page, returning its url.
pub async fn check<S>(service: &mut S, target: &Target, kind: ServiceKind) -> VespaResult<Url>
where
    S: Service<http::Request<Bytes>, Response = http::Response<Bytes>>,
    S::Error: Into<BoxError>,
{
    let base = target.service_url(kind)?;
    let endpoint = target.endpoint(kind, status_path(kind))?;
    let request = http::Request::get(endpoint.as_str()).body(Bytes::new())?;
    let response = send(service, kind, request).await?;

    let status = response.status();
    if status == http::StatusCode::OK {
        tracing::info!(service = kind.name(), url = %base, "service is ready");
        Ok(base)
    } else {
        let url = base.as_str().trim_end_matches('/').to_string();
        Err(VespaError::NotReady { service: kind, url, status })
    }
}

#[cfg(test)]
mod tests {
    use httptest::{matchers::*, responders::*, Expectation, Server};

    use crate::client::{default_timeout, HttpClient};

    use super::*;

    fn target(server: &Server) -> Target {
        server.url_str("/").parse().unwrap()
    }

    #[tokio::test]
    async fn test_container_ready() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/ApplicationStatus"))
                .respond_with(status_code(200).body("{}")),
        );

        let mut client = HttpClient::new(default_timeout()).unwrap();
        let url = check(&mut client, &target(&server), ServiceKind::Container).await.unwrap();
        assert_eq!(url.as_str(), server.url_str("/"));
    }

    #[tokio::test]
    async fn test_container_not_ready() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/ApplicationStatus")).respond_with(status_code(503)),
        );

        let mut client = HttpClient::new(default_timeout()).unwrap();
        let err = check(&mut client, &target(&server), ServiceKind::Container).await.unwrap_err();
        assert!(matches!(err, VespaError::NotReady { service: ServiceKind::Container, status, .. } if status == 503));
    }

    #[tokio::test]
    async fn test_deploy_status_path() {
        let mut service = tower::service_fn(|req: http::Request<Bytes>| async move {
            assert_eq!(req.uri().to_string(), "http://127.0.0.1:19071/status.html");
            Ok::<_, std::convert::Infallible>(http::Response::new(Bytes::new()))
        });
        let url = check(&mut service, &Target::Local, ServiceKind::Deploy).await.unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:19071/");
    }
}
