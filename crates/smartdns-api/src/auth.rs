// Session authentication
//
// `POST /api/auth/login` sets the session cookie in the client's jar;
// `POST /api/auth/logout` revokes it.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::SmartDnsClient;
use crate::error::Error;

impl SmartDnsClient {
    /// Authenticate with username/password.
    ///
    /// Any non-2xx answer (including 401) is reported as
    /// `Error::Authentication` rather than a session expiry.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.url("/api/auth/login")?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.url("/api/auth/logout")?;
        debug!("logging out at {}", url);
        self.post::<()>(url, None).await?;
        debug!("logout complete");
        Ok(())
    }
}
