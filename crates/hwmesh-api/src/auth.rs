// Router authentication
//
// CSRF bootstrap, the two-step nonce/proof login handshake, and logout.
// A successful login stores the credentials on the client so an expired
// session is renewed transparently by `RouterClient::with_relogin`.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{CsrfToken, RouterClient, SessionCredentials};
use crate::error::Error;
use crate::scram;

const HOME_PAGE_PATH: &str = "html/index.html";
const LOGIN_NONCE_PATH: &str = "api/system/user_login_nonce";
const LOGIN_PROOF_PATH: &str = "api/system/user_login_proof";
const LOGOUT_PATH: &str = "api/system/user_logout";

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<meta\b[^>]*>").expect("meta tag pattern is valid"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("attribute pattern is valid")
});

/// Challenge returned by `user_login_nonce`.
#[derive(Debug, Deserialize)]
struct LoginChallenge {
    servernonce: String,
    salt: String,
    iterations: u32,
}

impl RouterClient {
    /// Authenticate with the router using username/password.
    ///
    /// Scrapes a fresh CSRF pair, requests a server nonce, and answers with
    /// the salted-password proof. On success the session cookie sits in the
    /// client's jar and the credentials are kept for automatic re-login.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        self.refresh_csrf().await?;

        let first_nonce = scram::client_nonce();
        debug!(username, "requesting login nonce");

        let reply = self
            .send_post(
                LOGIN_NONCE_PATH,
                &json!({
                    "username": username,
                    "firstnonce": first_nonce,
                    "mode": 1,
                }),
                None,
            )
            .await
            .map_err(login_failure)?;

        let challenge: LoginChallenge =
            serde_json::from_value(reply).map_err(|e| Error::Authentication {
                message: format!("unexpected login challenge: {e}"),
            })?;

        let proof = scram::client_proof(
            password.expose_secret(),
            &challenge.salt,
            challenge.iterations,
            &first_nonce,
            &challenge.servernonce,
        )?;

        self.send_post(
            LOGIN_PROOF_PATH,
            &json!({
                "clientproof": proof,
                "finalnonce": challenge.servernonce,
            }),
            None,
        )
        .await
        .map_err(login_failure)?;

        self.set_credentials(Some(SessionCredentials {
            username: username.to_owned(),
            password: password.clone(),
        }));
        debug!("login successful");
        Ok(())
    }

    /// End the current session and forget the stored credentials.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        let result = self.send_post(LOGOUT_PATH, &json!({}), None).await;

        self.set_credentials(None);
        self.set_csrf_token(None);

        result.map(|_| ())
    }

    /// Scrape the initial CSRF pair from the router's landing page.
    pub async fn refresh_csrf(&self) -> Result<(), Error> {
        let html = self.send_get_text(HOME_PAGE_PATH).await?;
        let token = parse_csrf_meta(&html).ok_or(Error::MissingCsrf)?;
        self.set_csrf_token(Some(token));
        Ok(())
    }
}

/// Login rejections surface as `Authentication`, not as generic API errors.
fn login_failure(err: Error) -> Error {
    match err {
        Error::Api { code, message } => Error::Authentication {
            message: format!("login rejected (code {code}): {message}"),
        },
        Error::Unauthorized { message } => Error::Authentication { message },
        other => other,
    }
}

/// Extract `<meta name="csrf_param" content=...>` / `csrf_token` from a page.
fn parse_csrf_meta(html: &str) -> Option<CsrfToken> {
    Some(CsrfToken {
        csrf_param: meta_content(html, "csrf_param")?,
        csrf_token: meta_content(html, "csrf_token")?,
    })
}

/// `content` of the first `<meta>` tag whose `name` is `name`.
fn meta_content(html: &str, name: &str) -> Option<String> {
    META_TAG.find_iter(html).find_map(|tag| {
        let mut tag_name = None;
        let mut content = None;
        for attr in ATTRIBUTE.captures_iter(tag.as_str()) {
            let value = attr.get(2).or_else(|| attr.get(3)).map(|v| v.as_str());
            match attr.get(1).map(|k| k.as_str().to_ascii_lowercase()).as_deref() {
                Some("name") => tag_name = value,
                Some("content") => content = value,
                _ => {}
            }
        }
        (tag_name == Some(name)).then_some(content).flatten().map(str::to_owned)
    })
}
