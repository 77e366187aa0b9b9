// SmartDNS management API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, status mapping, and JSON
// decoding. Endpoint methods live in sibling modules (`auth`, `clients`,
// `upstream`) as inherent impls so this file stays focused on transport.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ApiErrorBody;
use crate::transport::TransportConfig;

/// Raw HTTP client for the SmartDNS management API.
///
/// Session auth is cookie based: [`SmartDnsClient::login`] stores the
/// session cookie in the client's jar and every later request carries it.
#[derive(Debug, Clone)]
pub struct SmartDnsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SmartDnsClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// A cookie jar is attached if the config doesn't carry one already.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join an absolute API path (e.g. `/api/client`) onto the base URL,
    /// keeping any path prefix the base URL carries.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    /// GET with query pairs appended in the given order.
    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        mut url: Url,
        params: &[(String, String)],
    ) -> Result<T, Error> {
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        self.get(url).await
    }

    pub(crate) async fn post<B: Serialize + Sync>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Response, Error> {
        debug!("POST {}", url);
        let mut builder = self.http.post(url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        Self::check_status(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self.http.delete(url).send().await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    /// Turn non-2xx responses into `Error::Api`, or `Error::SessionExpired`
    /// for HTTP 401 and backend code `session_expired`.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.unwrap_or_default();
        let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
        if parsed.code.as_deref() == Some("session_expired") {
            return Err(Error::SessionExpired);
        }

        Err(Error::Api {
            message: parsed
                .error
                .unwrap_or_else(|| format!("HTTP {status}: {}", preview(&body))),
            code: parsed.code,
            status: status.as_u16(),
        })
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_keeps_base_prefix() {
        let client = SmartDnsClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://dns.local/console/").unwrap(),
        );
        assert_eq!(
            client.url("/api/client").unwrap().as_str(),
            "https://dns.local/console/api/client"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        assert!(preview(&body).len() <= 200);
    }
}
