// Router HTTP client
//
// Wraps `reqwest::Client` with the router's CSRF envelope, JSON reply
// unwrapping, status categorization and transparent re-login. Login and
// logout live in `auth.rs`; this module is transport mechanics only.

use std::future::Future;
use std::sync::RwLock;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::{AuthCheck, TransportConfig};

/// Anti-CSRF pair the router expects inside every POST body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfToken {
    pub csrf_param: String,
    pub csrf_token: String,
}

/// Username/password kept after a successful login so an expired session
/// can be renewed without involving the caller.
#[derive(Debug, Clone)]
pub(crate) struct SessionCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Raw HTTP client for the router's JSON management API.
///
/// GETs return the decoded JSON body. POSTs wrap the payload in the
/// `{ data, csrf }` envelope, rotate the CSRF pair from the reply, and
/// surface a non-zero `errcode` as [`Error::Api`].
pub struct RouterClient {
    http: reqwest::Client,
    base_url: Url,
    /// Rotated on every POST reply that carries a new pair.
    csrf: RwLock<Option<CsrfToken>>,
    credentials: RwLock<Option<SessionCredentials>>,
}

impl RouterClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// A cookie jar is added when the config has none -- the router keeps
    /// its session id in a cookie. `base_url` is the router root, e.g.
    /// `http://192.168.3.1`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            csrf: RwLock::new(None),
            credentials: RwLock::new(None),
        }
    }

    // ── CSRF / session state ─────────────────────────────────────────

    /// The CSRF pair that will be sent with the next POST.
    pub fn csrf_token(&self) -> Option<CsrfToken> {
        self.csrf.read().expect("CSRF lock poisoned").clone()
    }

    pub(crate) fn set_csrf_token(&self, token: Option<CsrfToken>) {
        *self.csrf.write().expect("CSRF lock poisoned") = token;
    }

    pub(crate) fn set_credentials(&self, credentials: Option<SessionCredentials>) {
        *self.credentials.write().expect("credentials lock poisoned") = credentials;
    }

    pub(crate) fn credentials(&self) -> Option<SessionCredentials> {
        self.credentials
            .read()
            .expect("credentials lock poisoned")
            .clone()
    }

    /// Replace the stored pair when a reply carries a rotated one.
    fn update_csrf_from_reply(&self, reply: &Value) {
        let param = reply.get("csrf_param").and_then(Value::as_str);
        let token = reply.get("csrf_token").and_then(Value::as_str);
        if let (Some(param), Some(token)) = (param, token) {
            trace!("CSRF token rotated");
            self.set_csrf_token(Some(CsrfToken {
                csrf_param: param.to_owned(),
                csrf_token: token.to_owned(),
            }));
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Resolve an endpoint path (e.g. `api/system/deviceinfo`) against the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(Error::InvalidUrl)
    }

    // ── Public request helpers (with re-login) ───────────────────────

    /// GET an endpoint and decode its JSON body.
    pub async fn get_json(&self, path: &str) -> Result<Value, Error> {
        self.with_relogin(|| self.send_get(path, None)).await
    }

    /// GET an endpoint, treating a reply rejected by `check` as unauthorized.
    ///
    /// Some endpoints answer 200 with placeholder data instead of 401 when
    /// the session is invalid; `check` tells the two apart.
    pub async fn get_json_checked(&self, path: &str, check: AuthCheck) -> Result<Value, Error> {
        self.with_relogin(|| self.send_get(path, Some(check))).await
    }

    /// POST `payload` inside the CSRF envelope, merging `extra` at the top level.
    pub async fn post_json(
        &self,
        path: &str,
        payload: &Value,
        extra: Option<&Value>,
    ) -> Result<Value, Error> {
        self.with_relogin(|| self.send_post(path, payload, extra))
            .await
    }

    /// Run `call`; on an unauthorized failure with stored credentials,
    /// log in again and run it exactly once more.
    async fn with_relogin<F, Fut, T>(&self, call: F) -> Result<T, Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        match call().await {
            Err(err) if err.is_unauthorized() => {
                let Some(credentials) = self.credentials() else {
                    return Err(err);
                };
                debug!("session rejected, re-authenticating");
                self.login(&credentials.username, &credentials.password)
                    .await?;
                call().await
            }
            other => other,
        }
    }

    // ── Raw requests ─────────────────────────────────────────────────

    pub(crate) async fn send_get(&self, path: &str, check: Option<AuthCheck>) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        reject_unauthorized(status)?;

        let body = resp.text().await.map_err(Error::Transport)?;

        if let Some(check) = check {
            let value = parse_json(&body).unwrap_or(Value::Null);
            if !check(status.as_u16(), &value) {
                return Err(Error::Unauthorized {
                    message: format!("authorization check failed for {path}"),
                });
            }
        }

        if !status.is_success() {
            return Err(http_error(status, &body));
        }

        parse_json(&body)
    }

    /// Fetch a page as text (used to scrape the initial CSRF pair).
    pub(crate) async fn send_get_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(http_error(status, &body));
        }
        Ok(body)
    }

    pub(crate) async fn send_post(
        &self,
        path: &str,
        payload: &Value,
        extra: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        let csrf = self.csrf_token().ok_or(Error::MissingCsrf)?;
        let body = envelope(payload, &csrf, extra);
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = resp.status();
        reject_unauthorized(status)?;

        let text = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(http_error(status, &text));
        }

        let reply = if text.trim().is_empty() {
            Value::Null
        } else {
            parse_json(&text)?
        };
        self.update_csrf_from_reply(&reply);
        check_errcode(&reply)?;
        Ok(reply)
    }
}

// ── Envelope helpers ─────────────────────────────────────────────────

/// Build `{"data": payload, "csrf": {...}, ...extra}`.
fn envelope(payload: &Value, csrf: &CsrfToken, extra: Option<&Value>) -> Value {
    let mut body = Map::new();
    body.insert("data".into(), payload.clone());
    body.insert(
        "csrf".into(),
        json!({
            "csrf_param": csrf.csrf_param,
            "csrf_token": csrf.csrf_token,
        }),
    );
    if let Some(Value::Object(extra)) = extra {
        for (key, value) in extra {
            body.insert(key.clone(), value.clone());
        }
    }
    Value::Object(body)
}

fn reject_unauthorized(status: reqwest::StatusCode) -> Result<(), Error> {
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Unauthorized {
            message: format!("session expired or invalid credentials (HTTP {status})"),
        });
    }
    Ok(())
}

fn http_error(status: reqwest::StatusCode, body: &str) -> Error {
    Error::Http {
        status: status.as_u16(),
        message: body.chars().take(200).collect(),
    }
}

/// A non-zero `errcode` (or `err` on the login endpoints) means rejection.
fn check_errcode(reply: &Value) -> Result<(), Error> {
    let code = reply
        .get("errcode")
        .or_else(|| reply.get("err"))
        .and_then(Value::as_i64)
        .unwrap_or(0);
    if code == 0 {
        return Ok(());
    }
    let message = reply
        .get("errmsg")
        .and_then(Value::as_str)
        .unwrap_or("request rejected")
        .to_owned();
    Err(Error::Api { code, message })
}

/// Decode a JSON body, tolerating the `while(1); /*...*/` hijacking guard.
fn parse_json(body: &str) -> Result<Value, Error> {
    let trimmed = body.trim();
    let unguarded = trimmed
        .strip_prefix("while(1); /*")
        .and_then(|rest| rest.strip_suffix("*/"))
        .unwrap_or(trimmed);

    serde_json::from_str(unguarded).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}
