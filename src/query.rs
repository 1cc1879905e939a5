use std::time::Duration;

use bytes::Bytes;
use tower::Service;

use crate::{
    client::{check_status, send},
    error::{BoxError, VespaError, VespaResult},
    target::{ServiceKind, Target},
};

pub const SEARCH_PATH: &str = "/search/";

/// Request parameters of a query, in the order they were given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    /// A `key=value` argument is a request parameter, any other argument is the yql.
    pub fn from_args<I, A>(args: I, timeout: Option<Duration>) -> VespaResult<Self>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let mut params = Vec::new();
        for arg in args {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((key, value)) if !key.is_empty() && !key.contains(' ') => {
                    params.push((key.to_string(), value.to_string()))
                }
                _ => params.push(("yql".to_string(), arg.to_string())),
            }
        }

        if params.is_empty() {
            Err(VespaError::InvalidQuery("no yql or parameters given".to_string()))?
        }
        if params.iter().filter(|(k, _)| k == "yql").count() > 1 {
            Err(VespaError::InvalidQuery("yql is given more than once".to_string()))?
        }
        if let Some(timeout) = timeout {
            if !params.iter().any(|(k, _)| k == "timeout") {
                params.push(("timeout".to_string(), format!("{}s", timeout.as_secs())));
            }
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn to_query_string(&self) -> VespaResult<String> {
        Ok(serde_urlencoded::to_string(&self.params)?)
    }

    /// Runs the query against the container of `target`, returning the response body.
    pub async fn run<S>(&self, service: &mut S, target: &Target) -> VespaResult<Bytes>
    where
        S: Service<http::Request<Bytes>, Response = http::Response<Bytes>>,
        S::Error: Into<BoxError>,
    {
        let mut url = target.endpoint(ServiceKind::Container, SEARCH_PATH)?;
        url.set_query(Some(&self.to_query_string()?));
        tracing::info!(url = %url, "querying");

        let request = http::Request::get(url.as_str()).body(Bytes::new())?;
        let response = send(service, ServiceKind::Container, request).await?;
        check_status(ServiceKind::Container, url.as_str(), response)
    }
}
