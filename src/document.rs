use std::{fmt::Display, fs::read_to_string, path::Path, str::FromStr};

use bytes::Bytes;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::digit1,
    combinator::{map, map_res, opt, rest},
    sequence::{preceded, terminated},
    IResult,
};
use reqwest::Url;
use serde_json::Value;
use tower::Service;

use crate::{
    client::{check_status, send},
    error::{BoxError, VespaError, VespaResult},
    target::{ServiceKind, Target},
};

pub const DOCUMENT_API_PATH: &str = "/document/v1/";

/// `id:<namespace>:<document-type>:<selection>:<user-specified>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId {
    pub namespace: String,
    pub document_type: String,
    pub selection: Option<Selection>,
    pub user_specified: String,
}
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Number(u64),
    Group(String),
}

impl FromStr for DocumentId {
    type Err = VespaError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse(s) {
            Ok((_, id)) if !id.user_specified.is_empty() => Ok(id),
            _ => Err(VespaError::InvalidDocumentId(s.to_string())),
        }
    }
}
impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let selection = match &self.selection {
            None => String::new(),
            Some(Selection::Number(n)) => format!("n={}", n),
            Some(Selection::Group(g)) => format!("g={}", g),
        };
        write!(f, "id:{}:{}:{}:{}", self.namespace, self.document_type, selection, self.user_specified)
    }
}

impl DocumentId {
    pub fn parse(input: &str) -> IResult<&str, Self> {
        let (input, _) = tag("id:")(input)?;
        let (input, namespace) = terminated(is_not(":"), tag(":"))(input)?;
        let (input, document_type) = terminated(is_not(":"), tag(":"))(input)?;
        let (input, selection) = terminated(opt(Self::parse_selection), tag(":"))(input)?;
        let (input, user_specified) = rest(input)?;
        Ok((
            input,
            Self {
                namespace: namespace.to_string(),
                document_type: document_type.to_string(),
                selection,
                user_specified: user_specified.to_string(),
            },
        ))
    }

    pub fn parse_selection(input: &str) -> IResult<&str, Selection> {
        alt((
            map_res(preceded(tag("n="), digit1), |n: &str| n.parse().map(Selection::Number)),
            map(preceded(tag("g="), is_not(":")), |g: &str| Selection::Group(g.to_string())),
        ))(input)
    }

    /// Segments following `/document/v1/`, not yet percent encoded.
    pub fn path_segments(&self) -> Vec<String> {
        let mut segments = vec![self.namespace.clone(), self.document_type.clone()];
        match &self.selection {
            None => segments.push("docid".to_string()),
            Some(Selection::Number(n)) => segments.extend(["number".to_string(), n.to_string()]),
            Some(Selection::Group(g)) => segments.extend(["group".to_string(), g.clone()]),
        }
        segments.push(self.user_specified.clone());
        segments
    }

    pub fn url(&self, target: &Target) -> VespaResult<Url> {
        let mut url = target.endpoint(ServiceKind::Container, DOCUMENT_API_PATH)?;
        url.path_segments_mut()
            .map_err(|()| VespaError::InvalidUrl { url: target.to_string(), reason: "cannot be a base".to_string() })?
            .pop_if_empty()
            .extend(self.path_segments());
        Ok(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Put,
    Update,
    Remove,
    Get,
}
impl OperationKind {
    pub fn method(&self) -> http::Method {
        match self {
            Self::Put => http::Method::POST,
            Self::Update => http::Method::PUT,
            Self::Remove => http::Method::DELETE,
            Self::Get => http::Method::GET,
        }
    }

    /// Key holding the document id in a feed file.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Put => "put",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Get => "id",
        }
    }
}
impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            kind => write!(f, "{}", kind.key()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOperation {
    pub kind: OperationKind,
    pub id: DocumentId,
    pub fields: Option<Value>,
    pub condition: Option<String>,
    pub create: bool,
}

impl DocumentOperation {
    pub fn new(kind: OperationKind, id: DocumentId) -> Self {
        Self { kind, id, fields: None, condition: None, create: false }
    }

    /// Reads a feed file, `id` overrides the id given in the file.
    pub fn read<P: AsRef<Path>>(kind: OperationKind, id: Option<DocumentId>, path: P) -> VespaResult<Self> {
        let path = path.as_ref();
        let content =
            read_to_string(path).map_err(|source| VespaError::CannotRead { path: path.to_path_buf(), source })?;
        Self::from_json(kind, id, &content)
    }

    pub fn from_json(kind: OperationKind, id: Option<DocumentId>, json: &str) -> VespaResult<Self> {
        let Value::Object(mut object) = serde_json::from_str::<Value>(json)? else {
            return Err(VespaError::InvalidDocumentOperation("expected a json object".to_string()));
        };

        let id = match id {
            Some(id) => id,
            None => match object.get(kind.key()).or_else(|| object.get("id")) {
                Some(Value::String(id)) => id.parse()?,
                _ => Err(VespaError::InvalidDocumentOperation(format!(
                    "no document id: expected `{}` or `id` to be a string",
                    kind.key()
                )))?,
            },
        };
        let fields = object.remove("fields");
        if matches!(kind, OperationKind::Put | OperationKind::Update) && !matches!(fields, Some(Value::Object(_))) {
            Err(VespaError::InvalidDocumentOperation(format!("{} of {} requires a `fields` object", kind, id)))?
        }
        let condition = match object.remove("condition") {
            Some(Value::String(condition)) => Some(condition),
            None => None,
            Some(_) => Err(VespaError::InvalidDocumentOperation("`condition` must be a string".to_string()))?,
        };
        let create = matches!(object.get("create"), Some(Value::Bool(true)));

        Ok(Self { kind, id, fields, condition, create })
    }

    pub fn url(&self, target: &Target) -> VespaResult<Url> {
        let mut url = self.id.url(target)?;
        let mut params = Vec::new();
        if let Some(condition) = &self.condition {
            params.push(("condition", condition.as_str()));
        }
        if self.create && self.kind == OperationKind::Update {
            params.push(("create", "true"));
        }
        if !params.is_empty() {
            url.set_query(Some(&serde_urlencoded::to_string(params)?));
        }
        Ok(url)
    }

    pub fn body(&self) -> VespaResult<Bytes> {
        match &self.fields {
            Some(fields) => Ok(serde_json::to_vec(&serde_json::json!({ "fields": fields }))?.into()),
            None => Ok(Bytes::new()),
        }
    }

    /// Sends the operation to the document API of `target`, returning the response body.
    pub async fn send<S>(&self, service: &mut S, target: &Target) -> VespaResult<Bytes>
    where
        S: Service<http::Request<Bytes>, Response = http::Response<Bytes>>,
        S::Error: Into<BoxError>,
    {
        let url = self.url(target)?;
        tracing::info!(operation = %self.kind, id = %self.id, url = %url, "sending document operation");

        let mut builder = http::Request::builder().method(self.kind.method()).uri(url.as_str());
        if self.fields.is_some() {
            builder = builder.header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
        }
        let request = builder.body(self.body()?)?;
        let response = send(service, ServiceKind::Container, request).await?;
        check_status(ServiceKind::Container, url.as_str(), response)
    }
}
