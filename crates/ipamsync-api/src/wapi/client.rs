// WAPI HTTP client
//
// Wraps `reqwest::Client` with WAPI URL construction, basic auth, and
// error-body decoding. Endpoint groups (networks, extattrs, grid) are
// inherent methods in sibling files.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::wapi::models::WapiErrorBody;

/// Default WAPI version spoken by the client.
pub const DEFAULT_WAPI_VERSION: &str = "2.13.1";

/// Default `_max_results` for list queries.
pub const DEFAULT_MAX_RESULTS: u32 = 1000;

/// Async client for the Infoblox WAPI.
///
/// Every request carries HTTP basic auth; the Grid Master also hands back
/// an `ibapauth` cookie which the cookie store replays, so one client is
/// one reusable session.
#[derive(Clone)]
pub struct WapiClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    max_results: u32,
}

impl WapiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `grid_master` (e.g. `https://192.168.1.222`).
    ///
    /// The base path becomes `/wapi/v{version}/` unless the URL already
    /// points at a WAPI root.
    pub fn new(
        grid_master: &str,
        wapi_version: &str,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, grid_master, wapi_version, username, password)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        grid_master: &str,
        wapi_version: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(grid_master, wapi_version)?;
        Ok(Self {
            http,
            base_url,
            username: username.into(),
            password,
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    /// Override `_max_results` for list queries.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// `https://host` -> `https://host/wapi/v2.13.1/`
    fn normalize_base_url(raw: &str, wapi_version: &str) -> Result<Url, Error> {
        let with_scheme = if raw.contains("://") {
            raw.to_owned()
        } else {
            format!("https://{raw}")
        };
        let mut url = Url::parse(&with_scheme)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.contains("/wapi/v") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/wapi/v{wapi_version}/"));
        }

        Ok(url)
    }

    /// The resolved WAPI base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an object path or `_ref` onto the base URL.
    ///
    /// References look like `network/ZG5z...:10.0.0.0/24/default`; the
    /// leading object type keeps them valid relative URLs.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .request(reqwest::Method::GET, url)
            .query(params)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .request(reqwest::Method::PUT, url)
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: format!("Grid Master rejected credentials for '{}'", self.username),
            };
        }

        let raw = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<WapiErrorBody>(&raw) {
            Ok(err) => Error::Wapi {
                status: status.as_u16(),
                message: err
                    .text
                    .or(err.error)
                    .unwrap_or_else(|| status.to_string()),
                code: err.code,
            },
            Err(_) => Error::Wapi {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(raw: &str) -> WapiClient {
        WapiClient::with_client(
            reqwest::Client::new(),
            raw,
            DEFAULT_WAPI_VERSION,
            "admin",
            SecretString::from("infoblox"),
        )
        .unwrap()
    }

    #[test]
    fn base_url_gets_wapi_prefix() {
        assert_eq!(
            client("https://192.168.1.222").base_url().as_str(),
            "https://192.168.1.222/wapi/v2.13.1/"
        );
    }

    #[test]
    fn bare_host_defaults_to_https() {
        assert_eq!(
            client("gm.example.com").base_url().as_str(),
            "https://gm.example.com/wapi/v2.13.1/"
        );
    }

    #[test]
    fn existing_wapi_path_is_kept() {
        assert_eq!(
            client("https://gm/wapi/v2.12").base_url().as_str(),
            "https://gm/wapi/v2.12/"
        );
    }

    #[test]
    fn reference_joins_onto_base() {
        let c = client("https://gm");
        let url = c.url("network/ZG5zLm5ldHdvcmskMTAuMC4wLjAvMjQvMA:10.0.0.0/24/default").unwrap();
        assert_eq!(
            url.as_str(),
            "https://gm/wapi/v2.13.1/network/ZG5zLm5ldHdvcmskMTAuMC4wLjAvMjQvMA:10.0.0.0/24/default"
        );
    }
}
