// Gateway HTTP client
//
// Wraps `reqwest::Client` with the gateway's `/command` URL construction,
// static credential injection, and `{XC_SUC}` marker handling. Every call
// is a single GET; nothing is retried and no session is kept.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::RawDevice;
use crate::transport::TransportConfig;

/// Literal the gateway emits on success, optionally prefixing JSON payloads.
pub const SUCCESS_MARKER: &str = "{XC_SUC}";

const FNC_GET_STATES: &str = "GetStates";
const FNC_SEND_COMMAND: &str = "SendSC";
const PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the gateway's command endpoint.
///
/// Every request carries `XC_USER` / `XC_PASS` followed by the
/// function-specific parameters. Methods return parsed payloads; the
/// success marker is stripped before the caller sees anything.
pub struct GatewayClient {
    http: reqwest::Client,
    endpoint: Url,
    username: String,
    password: SecretString,
    timeout: Duration,
}

impl GatewayClient {
    /// Create a client for the gateway at `host`.
    ///
    /// `host` is usually a bare address (`192.168.1.50` or
    /// `gateway.local:8080`); an explicit `http://` prefix is accepted too.
    pub fn new(
        host: &str,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let endpoint = command_endpoint(host)?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint,
            username: username.into(),
            password,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// `base_url` is the gateway root; the `/command` path is appended.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &Url,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        let mut endpoint = base_url.clone();
        endpoint.set_path("/command");
        endpoint.set_query(None);
        Self {
            http,
            endpoint,
            username: username.into(),
            password,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The `/command` endpoint this client talks to (no credentials).
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The configured gateway user.
    pub fn username(&self) -> &str {
        &self.username
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Fetch the state of every device paired with the gateway.
    ///
    /// `GET /command?XC_USER=..&XC_PASS=..&XC_FNC=GetStates`
    pub async fn get_states(&self) -> Result<Vec<RawDevice>, Error> {
        let body = self.get_text(&[("XC_FNC", FNC_GET_STATES)]).await?;
        let devices = parse_states(&body)?;
        debug!(count = devices.len(), "fetched gateway states");
        Ok(devices)
    }

    /// Send a raw command string for the given device family.
    ///
    /// `GET /command?XC_USER=..&XC_PASS=..&XC_FNC=SendSC&type=..&data=..`
    ///
    /// Returns `Ok(true)` only when the body contains the success marker.
    /// A reachable gateway that rejects the command yields `Ok(false)`.
    pub async fn send_command(&self, family: &str, data: &str) -> Result<bool, Error> {
        debug!(family, data, "sending command");
        let body = self
            .get_text(&[("XC_FNC", FNC_SEND_COMMAND), ("type", family), ("data", data)])
            .await?;

        let accepted = body.contains(SUCCESS_MARKER);
        if !accepted {
            debug!(body = %preview(&body), "gateway did not acknowledge command");
        }
        Ok(accepted)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Build the full request URL: credentials first, then `params`.
    pub(crate) fn command_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("XC_USER", &self.username);
            query.append_pair("XC_PASS", self.password.expose_secret());
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url
    }

    /// Issue a GET and return the body of a 2xx response.
    async fn get_text(&self, params: &[(&str, &str)]) -> Result<String, Error> {
        let url = self.command_url(params);
        trace!(endpoint = %self.endpoint, ?params, "GET XC_PASS=****");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        resp.text().await.map_err(|e| self.map_transport(e))
    }

    /// Classify a reqwest failure, dropping the URL so the password
    /// never ends up in an error message.
    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err.without_url())
        }
    }
}

// ── Parsing ──────────────────────────────────────────────────────────

/// Parse a `GetStates` body, stripping the optional `{XC_SUC}` prefix.
pub fn parse_states(body: &str) -> Result<Vec<RawDevice>, Error> {
    let payload = body.strip_prefix(SUCCESS_MARKER).unwrap_or(body);
    serde_json::from_str(payload).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(payload)),
        body: body.to_owned(),
    })
}

/// Build `http://{host}/command` from a configured host.
fn command_endpoint(host: &str) -> Result<Url, Error> {
    let host = host.trim().trim_end_matches('/');
    let base = if host.contains("://") {
        host.to_owned()
    } else {
        format!("http://{host}")
    };
    let mut url = Url::parse(&base)?;
    url.set_path("/command");
    Ok(url)
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(host: &str) -> GatewayClient {
        GatewayClient::new(
            host,
            "admin",
            SecretString::from("s3cret&x".to_string()),
            &TransportConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_from_bare_host() {
        let c = client("192.168.1.50");
        assert_eq!(c.endpoint().as_str(), "http://192.168.1.50/command");
    }

    #[test]
    fn endpoint_keeps_explicit_scheme_and_port() {
        let c = client("http://gateway.local:8080/");
        assert_eq!(c.endpoint().as_str(), "http://gateway.local:8080/command");
    }

    #[test]
    fn command_url_puts_credentials_first() {
        let c = client("192.168.1.50");
        let url = c.command_url(&[("XC_FNC", "SendSC"), ("type", "WR"), ("data", "01AB010101")]);
        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, ["XC_USER", "XC_PASS", "XC_FNC", "type", "data"]);
    }

    #[test]
    fn command_url_encodes_password() {
        let c = client("192.168.1.50");
        let url = c.command_url(&[("XC_FNC", "GetStates")]);
        assert!(url.as_str().contains("XC_PASS=s3cret%26x"));
        let pass = url
            .query_pairs()
            .find(|(k, _)| k == "XC_PASS")
            .map(|(_, v)| v.into_owned());
        assert_eq!(pass.as_deref(), Some("s3cret&x"));
    }

    #[test]
    fn parse_states_strips_marker() {
        let devices = parse_states(r#"{XC_SUC}[{"type":"ER","sid":"02","adr":"09","state":"1001"}]"#)
            .unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_type, "ER");
    }

    #[test]
    fn parse_states_accepts_bare_json() {
        let devices = parse_states(r#"[{"type":"WR"}]"#).unwrap();
        assert_eq!(devices.len(), 1);
    }

    #[test]
    fn parse_states_rejects_garbage() {
        let err = parse_states("{XC_ERR}{\"code\":\"0010\"}").unwrap_err();
        assert!(
            matches!(err, Error::Deserialization { .. }),
            "unexpected error: {err:?}"
        );
    }
}
