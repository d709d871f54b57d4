//! Registry transport.
//!
//! [`Transport`] is the seam between the registry client and the network.
//! [`HttpTransport`] is the production implementation; tests substitute an
//! in-memory one.

use std::fmt;

use infralens_config::{Auth, ResolverConfig};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;
use url::{Position, Url};

use crate::error::{RegistryError, RegistryResult};

/// A GET request against the registry API.
///
/// Path segments are stored raw and percent-encoded when the URL is built, so
/// instance names containing spaces or slashes address a single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Request for the given raw path segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
        }
    }

    /// `GET /api/health`.
    #[must_use]
    pub fn health() -> Self {
        Self::new(["api", "health"])
    }

    /// `GET /api/service-instances[/<service_type>]`.
    #[must_use]
    pub fn instances(service_type: Option<&str>) -> Self {
        let mut request = Self::new(["api", "service-instances"]);
        if let Some(service_type) = service_type {
            request.segments.push(service_type.to_owned());
        }
        request
    }

    /// `GET /api/service-instances/<instance_id>`.
    #[must_use]
    pub fn instance(instance_id: &str) -> Self {
        Self::new(["api", "service-instances", instance_id])
    }

    /// `GET /api/service-instances/<service_type>/<name>`.
    #[must_use]
    pub fn instance_by_name(service_type: &str, name: &str) -> Self {
        Self::new(["api", "service-instances", service_type, name])
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Raw path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Query parameters in insertion order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Build the absolute URL below `base`.
    ///
    /// Any path already on `base` is kept as a prefix.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] if `base` cannot carry a path
    /// (e.g. `mailto:` URLs).
    pub fn to_url(&self, base: &Url) -> RegistryResult<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| RegistryError::Config(format!("base URL '{base}' cannot carry a path")))?
            .pop_if_empty()
            .extend(&self.segments);

        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

/// Renders the encoded path and query, e.g.
/// `/api/service-instances/kafka?userId=u-1`.
impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = Url::parse("http://registry.local")
            .map_err(|e| RegistryError::Config(e.to_string()))
            .and_then(|base| self.to_url(&base));
        match rendered {
            Ok(url) => f.write_str(&url[Position::BeforePath..]),
            Err(_) => write!(f, "/{}", self.segments.join("/")),
        }
    }
}

/// Executes registry requests and returns the decoded JSON body.
pub trait Transport: Send + Sync {
    /// Perform `request`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] for 404, [`RegistryError::Status`] for any
    /// other non-success status, [`RegistryError::Transport`] for network
    /// failures, [`RegistryError::InvalidResponse`] for undecodable bodies.
    fn get(&self, request: &ApiRequest) -> RegistryResult<Value>;
}

/// Blocking HTTP transport built on `reqwest`.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: Url,
    auth: Auth,
}

impl HttpTransport {
    /// Build a transport from resolver configuration.
    ///
    /// The configured timeout applies to every request. Credentials are
    /// chosen once, here.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] if the base URL does not parse or the
    /// HTTP client cannot be built.
    pub fn new(config: &ResolverConfig) -> RegistryResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            RegistryError::Config(format!("invalid base URL '{}': {e}", config.base_url))
        })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("infralens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RegistryError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            auth: config.auth(),
        })
    }

    /// The registry base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &ApiRequest) -> RegistryResult<Value> {
        let url = request.to_url(&self.base_url)?;
        debug!(url = %url, "registry request");

        let builder = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json");
        let builder = match &self.auth {
            Auth::None => builder,
            Auth::Bearer(token) => builder.bearer_auth(token),
            Auth::Basic { username, password } => builder.basic_auth(username, Some(password)),
        };

        let response = builder
            .send()
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound {
                path: request.to_string(),
            });
        }
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<Value>()
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_paths() {
        assert_eq!(ApiRequest::health().to_string(), "/api/health");
        assert_eq!(
            ApiRequest::instances(None).to_string(),
            "/api/service-instances"
        );
        assert_eq!(
            ApiRequest::instances(Some("kafka"))
                .with_query("userId", "u-1")
                .to_string(),
            "/api/service-instances/kafka?userId=u-1"
        );
        assert_eq!(
            ApiRequest::instance("es-001")
                .with_query("includeConfig", "true")
                .to_string(),
            "/api/service-instances/es-001?includeConfig=true"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let request = ApiRequest::instance_by_name("redis", "cache a/b");
        assert_eq!(
            request.to_string(),
            "/api/service-instances/redis/cache%20a%2Fb"
        );
        assert_eq!(request.segments()[3], "cache a/b");
    }

    #[test]
    fn test_base_path_is_kept() {
        let base = Url::parse("https://gateway.example.com/registry/").unwrap();
        let url = ApiRequest::health().to_url(&base).unwrap();
        assert_eq!(url.as_str(), "https://gateway.example.com/registry/api/health");

        let base = Url::parse("https://gateway.example.com/registry").unwrap();
        let url = ApiRequest::health().to_url(&base).unwrap();
        assert_eq!(url.as_str(), "https://gateway.example.com/registry/api/health");
    }

    #[test]
    fn test_cannot_be_base_url() {
        let base = Url::parse("mailto:ops@example.com").unwrap();
        let err = ApiRequest::health().to_url(&base).unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }

    #[test]
    fn test_http_transport_rejects_bad_base_url() {
        let config = ResolverConfig::new("not a url");
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }

    #[test]
    fn test_http_transport_keeps_base_url() {
        let config = ResolverConfig::new("http://localhost:3000").with_api_key("s3cr3t-token");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:3000/");
        assert!(!format!("{transport:?}").contains("s3cr3t-token"));
    }

    mod loopback {
        use std::io::{Read, Write};
        use std::net::TcpListener;
        use std::thread::{self, JoinHandle};

        /// Serve one canned response on 127.0.0.1 and hand back the raw
        /// request text.
        pub(super) fn serve_once(
            status: &'static str,
            body: &'static str,
        ) -> (String, JoinHandle<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            let handle = thread::spawn(move || {
                let (mut stream, _) = listener.accept().unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
                String::from_utf8(request).unwrap()
            });
            (base_url, handle)
        }

        pub(super) fn request_line(request: &str) -> &str {
            request.lines().next().unwrap_or_default()
        }

        pub(super) fn header<'a>(request: &'a str, name: &str) -> Option<&'a str> {
            request.lines().find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.trim()
                    .eq_ignore_ascii_case(name)
                    .then_some(value.trim())
            })
        }
    }

    #[test]
    fn test_http_get_decodes_json_with_bearer_auth() {
        let (base_url, server) = loopback::serve_once("200 OK", r#"{"status":"healthy"}"#);
        let transport =
            HttpTransport::new(&ResolverConfig::new(base_url).with_api_key("tok")).unwrap();

        let body = transport.get(&ApiRequest::health()).unwrap();
        assert_eq!(body["status"], "healthy");

        let request = server.join().unwrap();
        assert_eq!(loopback::request_line(&request), "GET /api/health HTTP/1.1");
        assert_eq!(loopback::header(&request, "authorization"), Some("Bearer tok"));
        assert_eq!(
            loopback::header(&request, "accept"),
            Some("application/json")
        );
    }

    #[test]
    fn test_http_get_basic_auth_and_user_query() {
        let (base_url, server) = loopback::serve_once("200 OK", r#"{"data":[]}"#);
        let config = ResolverConfig::new(base_url).with_basic_auth("u", "p");
        let transport = HttpTransport::new(&config).unwrap();

        let request = ApiRequest::instances(Some("kafka")).with_query("userId", "u 1");
        transport.get(&request).unwrap();

        let captured = server.join().unwrap();
        assert_eq!(
            loopback::request_line(&captured),
            "GET /api/service-instances/kafka?userId=u+1 HTTP/1.1"
        );
        assert_eq!(loopback::header(&captured, "authorization"), Some("Basic dTpw"));
    }

    #[test]
    fn test_http_get_without_credentials_sends_no_authorization() {
        let (base_url, server) = loopback::serve_once("200 OK", "{}");
        let transport = HttpTransport::new(&ResolverConfig::new(base_url)).unwrap();
        transport.get(&ApiRequest::health()).unwrap();

        let request = server.join().unwrap();
        assert_eq!(loopback::header(&request, "authorization"), None);
    }

    #[test]
    fn test_http_404_is_not_found() {
        let (base_url, server) = loopback::serve_once("404 Not Found", "{}");
        let transport = HttpTransport::new(&ResolverConfig::new(base_url)).unwrap();

        let err = transport.get(&ApiRequest::instance("x")).unwrap_err();
        server.join().unwrap();
        assert!(
            matches!(err, RegistryError::NotFound { ref path } if path == "/api/service-instances/x")
        );
    }

    #[test]
    fn test_http_server_error_is_status() {
        let (base_url, server) =
            loopback::serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
        let transport = HttpTransport::new(&ResolverConfig::new(base_url)).unwrap();

        let err = transport.get(&ApiRequest::health()).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, RegistryError::Status { status: 500, .. }));
    }

    #[test]
    fn test_http_non_json_body_is_invalid_response() {
        let (base_url, server) = loopback::serve_once("200 OK", "<html>gateway</html>");
        let transport = HttpTransport::new(&ResolverConfig::new(base_url)).unwrap();

        let err = transport.get(&ApiRequest::health()).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, RegistryError::InvalidResponse(_)));
    }

    #[test]
    fn test_http_refused_connection_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let transport = HttpTransport::new(&ResolverConfig::new(base_url)).unwrap();
        let err = transport.get(&ApiRequest::health()).unwrap_err();
        assert!(matches!(err, RegistryError::Transport(_)));
    }
}
