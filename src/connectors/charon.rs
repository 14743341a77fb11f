use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::connectors::{Connector, ConnectorError};
use crate::core::project::Project;
use crate::core::sample::Sample;
use crate::handlers::{CharonHandler, ModelHandler};

/// Charon REST API version
pub const API_VERSION: &str = "v1";

/// Header carrying the API token on every request
pub const TOKEN_HEADER: &str = "x-charon-api-token";

/// Status code of a successful Charon response
const STATUS_OK: u16 = 200;

/// Status and raw body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Issues HTTP GET requests on behalf of a connector
pub trait Session: std::fmt::Debug {
    /// # Errors
    ///
    /// Returns a `ConnectorError` if the request could not be completed.
    /// A completed request with a non-success status is not an error here.
    fn get(&self, url: &str) -> Result<HttpResponse, ConnectorError>;
}

/// Blocking `reqwest` session sending the API token header with every request
#[derive(Debug)]
pub struct ReqwestSession {
    client: Client,
}

impl ReqwestSession {
    /// # Errors
    ///
    /// Returns `ConnectorError::InvalidToken` if the token is not a valid header
    /// value, or `ConnectorError::Http` if the client cannot be built.
    pub fn new(api_token: &str) -> Result<Self, ConnectorError> {
        let mut token = HeaderValue::from_str(api_token)
            .map_err(|e| ConnectorError::InvalidToken(e.to_string()))?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(TOKEN_HEADER), token);
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }
}

impl Session for ReqwestSession {
    fn get(&self, url: &str) -> Result<HttpResponse, ConnectorError> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Read-only connector over the Charon LIMS REST API
pub struct CharonConnector {
    base_url: String,
    api_token: String,
    api_url: String,
    model_handler: Box<dyn ModelHandler>,
    session: Option<Box<dyn Session>>,
    versions: Option<Value>,
}

impl std::fmt::Debug for CharonConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharonConnector")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model_handler", &self.model_handler)
            .field("session", &self.session)
            .field("versions", &self.versions)
            .finish()
    }
}

impl CharonConnector {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let api_url = format!("{}/api/{API_VERSION}/", base_url.trim_end_matches('/'));
        Self {
            base_url,
            api_token: api_token.into(),
            api_url,
            model_handler: Box::new(CharonHandler),
            session: None,
            versions: None,
        }
    }

    #[must_use]
    pub fn with_model_handler(mut self, model_handler: Box<dyn ModelHandler>) -> Self {
        self.model_handler = model_handler;
        self
    }

    /// Use `session` instead of creating a `ReqwestSession` on `open`
    #[must_use]
    pub fn with_session(mut self, session: Box<dyn Session>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Version information reported by Charon when the connector was opened
    pub fn versions(&self) -> Option<&Value> {
        self.versions.as_ref()
    }

    /// Full URL of an API endpoint given as path segments
    pub fn url(&self, endpoint: &[&str]) -> String {
        format!("{}{}", self.api_url, endpoint.join("/"))
    }

    /// # Errors
    ///
    /// Returns `ConnectorError::Response` for any status other than 200, or
    /// `ConnectorError::Json` if the body is not JSON.
    pub fn handle_response(response: HttpResponse) -> Result<Value, ConnectorError> {
        if response.status != STATUS_OK {
            return Err(ConnectorError::Response {
                status: response.status,
                body: response.body,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    fn fetch(&self, endpoint: &[&str]) -> Result<Value, ConnectorError> {
        let session = self.session.as_ref().ok_or(ConnectorError::NotOpen {
            connector: self.connector_type(),
        })?;
        let url = self.url(endpoint);
        debug!(%url, "GET");
        Self::handle_response(session.get(&url)?)
    }

    /// Fetch one sample of a project
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Response` if Charon does not answer with 200,
    /// or a model error if the document cannot be turned into a sample.
    pub fn get_sample(&self, project_name: &str, sample_name: &str) -> Result<Sample, ConnectorError> {
        let json = self.fetch(&["sample", project_name, sample_name])?;
        Ok(self.model_handler.sample_from_json(&json)?)
    }
}

impl Connector for CharonConnector {
    fn connector_type(&self) -> &'static str {
        "CharonConnector"
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn open(&mut self) -> Result<(), ConnectorError> {
        if self.session.is_none() {
            self.session = Some(Box::new(ReqwestSession::new(&self.api_token)?));
        }
        let versions = self.fetch(&["version"])?;
        debug!(url = %self.api_url, %versions, "Connected to Charon");
        self.versions = Some(versions);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        self.session = None;
        self.versions = None;
        Ok(())
    }

    /// A 404 from Charon is reported as a missing project, with Charon's
    /// response body as the message.
    fn get_project(&self, name: &str) -> Result<Project, ConnectorError> {
        let json = match self.fetch(&["project", name]) {
            Err(ConnectorError::Response { status: 404, body }) => {
                return Err(ConnectorError::ProjectNotFound {
                    name: name.to_string(),
                    message: Some(body),
                });
            }
            other => other?,
        };
        Ok(self.model_handler.project_from_json(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variants::Status;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const BASE_URL: &str = "this-is-the-base-url";
    const API_TOKEN: &str = "this-is-the-api-token";

    #[derive(Debug, Default)]
    struct FakeSession {
        responses: HashMap<String, HttpResponse>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeSession {
        fn respond(mut self, url: &str, status: u16, body: Value) -> Self {
            self.responses.insert(
                url.to_string(),
                HttpResponse {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }
    }

    impl Session for FakeSession {
        fn get(&self, url: &str) -> Result<HttpResponse, ConnectorError> {
            self.requested.borrow_mut().push(url.to_string());
            Ok(self.responses.get(url).cloned().unwrap_or(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }))
        }
    }

    fn api(endpoint: &str) -> String {
        format!("{BASE_URL}/api/v1/{endpoint}")
    }

    fn opened_connector() -> CharonConnector {
        let session = FakeSession::default()
            .respond(&api("version"), 200, json!({"Charon": "17.1"}))
            .respond(
                &api("project/P1234"),
                200,
                json!({"projectid": "P1234", "status": "OPEN", "best_practice_analysis": "whole_genome_reseq"}),
            )
            .respond(
                &api("sample/P1234/P1234_101"),
                200,
                json!({"sampleid": "P1234_101", "projectid": "P1234"}),
            );
        let mut connector =
            CharonConnector::new(BASE_URL, API_TOKEN).with_session(Box::new(session));
        connector.open().unwrap();
        connector
    }

    #[test]
    fn test_url() {
        let connector = CharonConnector::new(BASE_URL, API_TOKEN);
        let url = connector.url(&["this-is-endpoint"]);
        assert!(url.starts_with(BASE_URL));
        assert_eq!(url.split('/').last(), Some("this-is-endpoint"));

        let url = connector.url(&["this", "is", "endpoint"]);
        let segments: Vec<&str> = url.split('/').collect();
        assert_eq!(&segments[segments.len() - 3..], &["this", "is", "endpoint"]);
    }

    #[test]
    fn test_url_trailing_slash() {
        let connector = CharonConnector::new("https://charon.example.org/", API_TOKEN);
        assert_eq!(
            connector.url(&["version"]),
            "https://charon.example.org/api/v1/version"
        );
    }

    #[test]
    fn test_handle_response() {
        let expected = json!({"this-is-the": "json-response"});
        let ok = HttpResponse {
            status: 200,
            body: expected.to_string(),
        };
        assert_eq!(CharonConnector::handle_response(ok).unwrap(), expected);

        let bad = HttpResponse {
            status: 400,
            body: "bad request".to_string(),
        };
        let err = CharonConnector::handle_response(bad).unwrap_err();
        assert!(matches!(err, ConnectorError::Response { status: 400, .. }));
        assert!(err.to_string().contains("bad request"));
    }

    #[test]
    fn test_open_fetches_version() {
        let connector = opened_connector();
        assert_eq!(connector.versions(), Some(&json!({"Charon": "17.1"})));
    }

    #[test]
    fn test_get_project() {
        let connector = opened_connector();
        let project = connector.get_project("P1234").unwrap();
        assert_eq!(project.name(), "P1234");
        assert_eq!(project.status, Some(Status::Open));
    }

    #[test]
    fn test_get_missing_project() {
        let connector = opened_connector();
        let err = connector.get_project("NOPE").unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::ProjectNotFound { ref name, message: Some(_) } if name == "NOPE"
        ));
    }

    #[test]
    fn test_get_sample() {
        let connector = opened_connector();
        let sample = connector.get_sample("P1234", "P1234_101").unwrap();
        assert_eq!(sample.name(), "P1234_101");
    }

    #[test]
    fn test_requires_open() {
        let connector = CharonConnector::new(BASE_URL, API_TOKEN);
        assert!(matches!(
            connector.get_project("P1234"),
            Err(ConnectorError::NotOpen { .. })
        ));
    }

    #[test]
    fn test_always_read_only() {
        let mut connector = opened_connector();
        assert!(matches!(
            connector.commit(),
            Err(ConnectorError::ReadOnly {
                connector: "CharonConnector"
            })
        ));
        assert!(matches!(
            connector.add_or_replace_project(&Project::new("P1")),
            Err(ConnectorError::ReadOnly { .. })
        ));
    }

    #[test]
    fn test_open_propagates_error_status() {
        let session = FakeSession::default().respond(&api("version"), 401, json!("denied"));
        let mut connector =
            CharonConnector::new(BASE_URL, API_TOKEN).with_session(Box::new(session));
        assert!(matches!(
            connector.open(),
            Err(ConnectorError::Response { status: 401, .. })
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let connector = CharonConnector::new(BASE_URL, API_TOKEN);
        let debug = format!("{connector:?}");
        assert!(!debug.contains(API_TOKEN));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains(BASE_URL));
    }

    #[test]
    fn test_invalid_token() {
        assert!(matches!(
            ReqwestSession::new("bad\ntoken"),
            Err(ConnectorError::InvalidToken(_))
        ));
    }
}
