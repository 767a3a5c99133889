#![deny(clippy::all, clippy::pedantic)]

use std::fmt;

use cbot::config::{ConfigError, Credentials};
use cbot::infra::error::InfraError;
use cbot_api_types::Envelope;
use reqwest::header::{CONTENT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

const ACCESS_TOKEN: &str = "access-token";
const SECRET_KEY: &str = "secret-key";

const LIST_BOTS_PROPERTIES: &str = "created,last_modified,creator";
const SHOW_BOT_PROPERTIES: &str = "created,last_modified,creator,input,output";
const MAX_LISTING_JOBS: &str = "1000";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid API path: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalidate format parameter. Ex: key:value")]
    InputFormat,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Bot,
    Job,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bot => "bot",
            Self::Job => "job",
        })
    }
}

/// Failures reported by the API through the `code` field of a response body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("unauthorized error returned. Check your access token and key.")]
    Unauthorized,
    #[error("forbidden error returned. Do you have a {authority} authorize?")]
    Forbidden { authority: &'static str },
    #[error("{resource} id '{id}' is not found.")]
    NotFound { resource: Resource, id: String },
    #[error("job id '{job_id}' has already done.")]
    JobAlreadyDone { job_id: String },
    #[error("bot id '{bot_id}' execution is aborted.")]
    ExecutionAborted { bot_id: String },
    #[error("too many requests error returned. Try the execution again later.")]
    TooManyRequests,
    #[error("response code '{0}' returned.")]
    UnexpectedCode(i64),
}

/// The five API calls, each a fixed verb, path, query and code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    ListBots,
    ShowBot { bot_id: &'a str },
    ListJobs { bot_id: &'a str },
    ExecuteBot { bot_id: &'a str },
    AbortJob { job_id: &'a str },
}

impl<'a> Operation<'a> {
    pub fn method(self) -> Method {
        match self {
            Self::ListBots | Self::ShowBot { .. } | Self::ListJobs { .. } => Method::GET,
            Self::ExecuteBot { .. } => Method::POST,
            Self::AbortJob { .. } => Method::DELETE,
        }
    }

    pub fn segments(self) -> Vec<&'a str> {
        match self {
            Self::ListBots => vec!["bots"],
            Self::ShowBot { bot_id } => vec!["bots", bot_id],
            Self::ListJobs { bot_id } | Self::ExecuteBot { bot_id } => vec!["bots", bot_id, "jobs"],
            Self::AbortJob { job_id } => vec!["jobs", job_id],
        }
    }

    pub fn query(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::ListBots => &[("properties", LIST_BOTS_PROPERTIES)],
            Self::ShowBot { .. } => &[("properties", SHOW_BOT_PROPERTIES)],
            Self::ListJobs { .. } => &[("limit", MAX_LISTING_JOBS)],
            Self::ExecuteBot { .. } | Self::AbortJob { .. } => &[],
        }
    }

    fn authority(self) -> &'static str {
        match self {
            Self::ListBots | Self::ShowBot { .. } | Self::ListJobs { .. } => "reference",
            Self::ExecuteBot { .. } => "bot execute",
            Self::AbortJob { .. } => "job abort",
        }
    }

    /// Map a response `code` to success or the error wired for this operation.
    pub fn interpret(self, code: i64) -> Result<(), ApiError> {
        match (self, code) {
            (_, 200) | (Self::ExecuteBot { .. }, 202) => Ok(()),
            (_, 401) => Err(ApiError::Unauthorized),
            (_, 403) => Err(ApiError::Forbidden {
                authority: self.authority(),
            }),
            (Self::ShowBot { bot_id } | Self::ExecuteBot { bot_id }, 404) => {
                Err(ApiError::NotFound {
                    resource: Resource::Bot,
                    id: bot_id.to_string(),
                })
            }
            (Self::AbortJob { job_id }, 404) => Err(ApiError::NotFound {
                resource: Resource::Job,
                id: job_id.to_string(),
            }),
            (Self::AbortJob { job_id }, 410) => Err(ApiError::JobAlreadyDone {
                job_id: job_id.to_string(),
            }),
            (Self::ExecuteBot { bot_id }, 410) => Err(ApiError::ExecutionAborted {
                bot_id: bot_id.to_string(),
            }),
            (Self::ExecuteBot { .. }, 429) => Err(ApiError::TooManyRequests),
            (_, other) => Err(ApiError::UnexpectedCode(other)),
        }
    }
}

/// Successful response, body text untouched.
#[derive(Debug, Clone)]
pub struct Reply {
    pub body: String,
}

impl Reply {
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, CliError> {
        serde_json::from_str(&self.body).map_err(CliError::Decode)
    }
}

/// Join URL path pieces the way a filesystem path join would: empty and `.`
/// segments vanish, `..` pops, and the result is rooted.
pub fn join_path(base: &str, segments: &[&str]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for piece in std::iter::once(base)
        .chain(segments.iter().copied())
        .flat_map(|s| s.split('/'))
    {
        match piece {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Build the final URL for `segments` below `base`, replacing any existing
/// values of the keys in `query`.
pub fn endpoint_url(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    url.set_path(&join_path(base.path(), segments));

    if !query.is_empty() {
        let retained: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(k, _)| !query.iter().any(|(q, _)| *q == k.as_ref()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.set_query(None);
        let mut qp = url.query_pairs_mut();
        qp.extend_pairs(retained);
        for (k, v) in query {
            qp.append_pair(k, v);
        }
    }
    url
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub client: Client,
    pub base: Url,
    headers: HeaderMap,
}

impl Ctx {
    pub fn new(credentials: &Credentials) -> Result<Self, CliError> {
        let base = Url::parse(credentials.api_path.trim())?;
        if base.cannot_be_a_base() {
            return Err(CliError::InvalidInput(format!(
                "API path `{}` cannot be used as a base URL",
                credentials.api_path
            )));
        }
        let headers = Self::auth_headers(credentials)?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            base,
            headers,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("cbot-cli/", env!("CARGO_PKG_VERSION"))
    }

    fn auth_headers(credentials: &Credentials) -> Result<HeaderMap, CliError> {
        let value = |raw: &str| {
            HeaderValue::from_str(raw).map_err(|e| CliError::InvalidInput(e.to_string()))
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_LANGUAGE, value(&credentials.content_language)?);
        headers.insert(HeaderName::from_static(ACCESS_TOKEN), value(&credentials.access_token)?);
        let mut secret = value(&credentials.secret_key)?;
        secret.set_sensitive(true);
        headers.insert(HeaderName::from_static(SECRET_KEY), secret);
        Ok(headers)
    }

    pub fn url(&self, op: Operation<'_>) -> Url {
        endpoint_url(&self.base, &op.segments(), op.query())
    }

    /// Send `op`, read the whole body, and map its `code`.
    pub async fn call(
        &self,
        op: Operation<'_>,
        body: Option<&serde_json::Value>,
    ) -> Result<Reply, CliError> {
        let method = op.method();
        let url = self.url(op);
        debug!(%method, %url, "sending request");

        let mut req = self
            .client
            .request(method, url)
            .headers(self.headers.clone());
        if let Some(b) = body {
            let payload =
                serde_json::to_vec(b).map_err(|e| CliError::InvalidInput(e.to_string()))?;
            req = req.body(payload);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(CliError::Decode)?;
        debug!(%status, code = envelope.code, "received response");
        op.interpret(envelope.code)?;

        Ok(Reply {
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
