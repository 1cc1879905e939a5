use std::path::PathBuf;

use thiserror::Error;

use crate::target::ServiceKind;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type VespaResult<T, E = VespaError> = Result<T, E>;

#[derive(Error, Debug)]
pub enum VespaError {
    #[error("no home directory: set VESPA_CLI_HOME or HOME")]
    NoHomeDirectory,
    #[error("could not read {}: {source}", path.display())]
    CannotRead { path: PathBuf, source: std::io::Error },
    #[error("could not write {}: {source}", path.display())]
    CannotWrite { path: PathBuf, source: std::io::Error },
    #[error("invalid config file {}: {source}", path.display())]
    InvalidConfigFile { path: PathBuf, source: serde_yaml::Error },

    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("invalid value `{value}` for option `{option}`: {reason}")]
    InvalidOptionValue { option: String, value: String, reason: String },
    #[error("invalid target `{0}`: must be `local` or an http(s) url without query or fragment")]
    InvalidTarget(String),
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid document id `{0}`")]
    InvalidDocumentId(String),
    #[error("invalid document operation: {0}")]
    InvalidDocumentOperation(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("{service} at {url} is unreachable: {source}")]
    Unreachable { service: ServiceKind, url: String, source: BoxError },
    #[error("{service} at {url} is not ready: status {status}")]
    NotReady { service: ServiceKind, url: String, status: http::StatusCode },
    #[error("invalid request to {url}: status {status}\n{body}")]
    InvalidRequest { url: String, status: http::StatusCode, body: String },
    #[error("{service} at {url} failed: status {status}\n{body}")]
    ServiceFailure { service: ServiceKind, url: String, status: http::StatusCode, body: String },

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
    #[error(transparent)]
    HttpError(#[from] http::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    UrlEncodeError(#[from] serde_urlencoded::ser::Error),
    #[error(transparent)]
    ClientError(#[from] reqwest::Error),
}

impl VespaError {
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NoHomeDirectory => Some("point VESPA_CLI_HOME at a writable directory".to_string()),
            Self::UnknownOption(_) => Some("run `vespa config get` to list the options".to_string()),
            Self::Unreachable { service, .. } | Self::NotReady { service, .. } => {
                Some(format!("is the {} running? check it with `vespa status {}`", service, service.name()))
            }
            Self::InvalidDocumentId(_) => {
                Some("document ids look like id:<namespace>:<document-type>::<user-specified>".to_string())
            }
            _ => None,
        }
    }
}
