//! Upstream origin parsing and request URL resolution.

/// Error type for origin parsing and resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OriginError {
    #[error("empty origin URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("origin must not carry a path, query, or fragment: {0}")]
    NotAnOrigin(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// The single upstream origin the gateway fronts.
///
/// All intercepted request paths resolve against this origin; the gateway
/// never fetches anywhere else.
#[derive(Debug, Clone)]
pub struct UpstreamOrigin {
    base: url::Url,
}

impl UpstreamOrigin {
    /// Parse an origin URL.
    ///
    /// Accepts absolute http(s) URLs with a lowercased host and nothing
    /// after the authority (a bare trailing `/` is fine).
    pub fn parse(input: &str) -> Result<Self, OriginError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(OriginError::Empty);
        }

        let parsed = url::Url::parse(trimmed).map_err(|e| OriginError::InvalidUrl(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => return Err(OriginError::UnsupportedScheme(scheme.to_string())),
        }

        if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(OriginError::NotAnOrigin(trimmed.to_string()));
        }

        Ok(Self { base: parsed })
    }

    /// Resolve a request path-and-query against the origin.
    pub fn resolve(&self, path_and_query: &str) -> Result<url::Url, OriginError> {
        let relative =
            if path_and_query.starts_with('/') { path_and_query.to_string() } else { format!("/{path_and_query}") };
        self.base
            .join(&relative)
            .map_err(|e| OriginError::InvalidUrl(e.to_string()))
    }

    /// The origin as a URL string.
    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }
}
