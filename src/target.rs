use std::{fmt::Display, str::FromStr};

use reqwest::Url;

use crate::error::{VespaError, VespaResult};

pub const LOCAL_CONTAINER_URL: &str = "http://127.0.0.1:8080";
pub const LOCAL_DEPLOY_URL: &str = "http://127.0.0.1:19071";
pub const DEPLOY_PORT: u16 = 19071;

/// Vespa services the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// serves the query and document APIs
    Container,
    /// the config server accepting application packages
    Deploy,
}
impl ServiceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Deploy => "deploy",
        }
    }
}
impl Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Container => write!(f, "Container (query API)"),
            Self::Deploy => write!(f, "Deploy API"),
        }
    }
}

/// Where the Vespa application runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Local,
    Custom(Url),
}

impl FromStr for Target {
    type Err = VespaError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "local" {
            return Ok(Self::Local);
        }
        let url = Url::parse(s).map_err(|_| VespaError::InvalidTarget(s.to_string()))?;
        match url.scheme() {
            "http" | "https" if url.has_host() && url.query().is_none() && url.fragment().is_none() => {
                Ok(Self::Custom(url))
            }
            _ => Err(VespaError::InvalidTarget(s.to_string())),
        }
    }
}
impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Custom(url) => write!(f, "{}", url.as_str().trim_end_matches('/')),
        }
    }
}

impl Target {
    pub fn service_url(&self, kind: ServiceKind) -> VespaResult<Url> {
        match (self, kind) {
            (Self::Local, ServiceKind::Container) => parse_url(LOCAL_CONTAINER_URL),
            (Self::Local, ServiceKind::Deploy) => parse_url(LOCAL_DEPLOY_URL),
            (Self::Custom(url), ServiceKind::Container) => Ok(url.clone()),
            (Self::Custom(url), ServiceKind::Deploy) => {
                let mut deploy = url.clone();
                deploy.set_path("");
                deploy.set_query(None);
                deploy.set_port(Some(DEPLOY_PORT)).map_err(|()| VespaError::InvalidTarget(url.to_string()))?;
                Ok(deploy)
            }
        }
    }

    /// Appends the segments of `path` to the service url, keeping any base path of a custom target.
    pub fn endpoint(&self, kind: ServiceKind, path: &str) -> VespaResult<Url> {
        let mut url = self.service_url(kind)?;
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| VespaError::InvalidUrl { url: self.to_string(), reason: "cannot be a base".to_string() })?
            .pop_if_empty()
            .extend(path.trim_start_matches('/').split('/'));
        Ok(url)
    }
}

pub fn parse_url(s: &str) -> VespaResult<Url> {
    Url::parse(s).map_err(|e| VespaError::InvalidUrl { url: s.to_string(), reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_target() {
        let target: Target = "local".parse().unwrap();
        assert_eq!(target, Target::Local);
        assert_eq!(target.service_url(ServiceKind::Container).unwrap().as_str(), "http://127.0.0.1:8080/");
        assert_eq!(target.service_url(ServiceKind::Deploy).unwrap().as_str(), "http://127.0.0.1:19071/");
        assert_eq!(target.to_string(), "local");
    }

    #[test]
    fn test_custom_target() {
        let target: Target = "https://vespa.example.com:4443/base".parse().unwrap();
        assert_eq!(
            target.service_url(ServiceKind::Container).unwrap().as_str(),
            "https://vespa.example.com:4443/base"
        );
        assert_eq!(target.service_url(ServiceKind::Deploy).unwrap().as_str(), "https://vespa.example.com:19071/");
        assert_eq!(
            target.endpoint(ServiceKind::Container, "/search/").unwrap().as_str(),
            "https://vespa.example.com:4443/base/search/"
        );
        assert_eq!(target.to_string(), "https://vespa.example.com:4443/base");
    }

    #[test]
    fn test_endpoint_path() {
        let target: Target = "http://vespa.example.com:8080".parse().unwrap();
        let search = target.endpoint(ServiceKind::Container, "/search/").unwrap();
        assert_eq!(search.path(), "/search/");
        assert_eq!(search.query(), None);

        let target: Target = "http://vespa.example.com:8080/base/".parse().unwrap();
        let status = target.endpoint(ServiceKind::Container, "/ApplicationStatus").unwrap();
        assert_eq!(status.as_str(), "http://vespa.example.com:8080/base/ApplicationStatus");

        let status = Target::Local.endpoint(ServiceKind::Deploy, "/status.html").unwrap();
        assert_eq!(status.as_str(), "http://127.0.0.1:19071/status.html");
    }

    #[test]
    fn test_invalid_target() {
        for invalid in [
            "cloud",
            "ftp://example.com",
            "127.0.0.1:8080",
            "",
            "http://vespa.example.com:8080/?x=1",
            "http://vespa.example.com:8080/#results",
        ] {
            let Err(VespaError::InvalidTarget(s)) = invalid.parse::<Target>() else {
                panic!("`{}` should not be a target", invalid);
            };
            assert_eq!(s, invalid);
        }
    }
}
