// Copyright 2025 Webmobix Solutions AG
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUTHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! OAuth2 user-delegated authentication for the Google Sheets API.
//!
//! Credentials are an "authorized user" secret (client id, client secret and
//! a long-lived refresh token) issued ahead of time. This module only
//! exchanges the refresh token for access tokens; it never starts an
//! interactive consent flow.

use crate::auth::secrets::SecretSource;
use anyhow::{Context, Result};
use google_sheets4::hyper_rustls;
use google_sheets4::yup_oauth2::{
    self, AuthorizedUserAuthenticator, AuthorizedUserSecret,
};
use hyper_util::client::legacy::connect::HttpConnector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Scopes required for writing report tabs
const SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

const AUTHORIZED_USER_TYPE: &str = "authorized_user";

pub type SheetsAuthenticator =
    yup_oauth2::authenticator::Authenticator<hyper_rustls::HttpsConnector<HttpConnector>>;

/// Authorized-user credential document as stored in the secrets store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredCredentials {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    #[serde(rename = "type", default = "default_credential_type")]
    credential_type: String,
}

fn default_credential_type() -> String {
    AUTHORIZED_USER_TYPE.to_string()
}

/// OAuth client files downloaded from Google Cloud Console use one of these
/// wrappers and carry no refresh token.
#[derive(Debug, Deserialize)]
struct ClientSecretFileProbe {
    installed: Option<serde_json::Value>,
    web: Option<serde_json::Value>,
}

/// Builds Google authenticators from a secret source.
pub struct AuthManager {
    source: SecretSource,
}

impl AuthManager {
    pub fn new(source: SecretSource) -> Self {
        Self { source }
    }

    /// Loads and validates the authorized-user secret.
    ///
    /// # Errors
    ///
    /// * If the secret source cannot be read
    /// * If the JSON is an OAuth client file rather than user credentials
    /// * If any required field is missing or empty
    pub fn load_authorized_user_secret(&self) -> Result<AuthorizedUserSecret> {
        let raw = self.source.read()?;
        Self::parse_authorized_user_secret(&raw)
            .with_context(|| format!("Invalid OAuth credentials in {}", self.source))
    }

    fn parse_authorized_user_secret(raw: &str) -> Result<AuthorizedUserSecret> {
        if let Ok(probe) = serde_json::from_str::<ClientSecretFileProbe>(raw)
            && (probe.installed.is_some() || probe.web.is_some())
        {
            anyhow::bail!(
                "Found an OAuth client secret file, but user-delegated credentials are required.\n\
                Provide JSON with client_id, client_secret and refresh_token \
                (type \"authorized_user\")."
            );
        }

        let stored: StoredCredentials = serde_json::from_str(raw)
            .context("Failed to parse authorized-user credential JSON")?;

        for (field, value) in [
            ("client_id", &stored.client_id),
            ("client_secret", &stored.client_secret),
            ("refresh_token", &stored.refresh_token),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("Credential field '{}' is empty", field);
            }
        }

        if stored.credential_type != AUTHORIZED_USER_TYPE {
            anyhow::bail!(
                "Unsupported credential type '{}', expected '{}'",
                stored.credential_type,
                AUTHORIZED_USER_TYPE
            );
        }

        Ok(AuthorizedUserSecret {
            client_id: stored.client_id,
            client_secret: stored.client_secret,
            refresh_token: stored.refresh_token,
            key_type: stored.credential_type,
        })
    }

    /// Creates an authenticator and confirms it can mint an access token.
    pub async fn authenticator(&self) -> Result<SheetsAuthenticator> {
        let secret = self.load_authorized_user_secret()?;
        debug!("🔍 Creating authorized-user authenticator from {}", self.source);

        let auth = AuthorizedUserAuthenticator::builder(secret)
            .build()
            .await
            .context("Failed to build authorized-user authenticator")?;

        debug!("🔍 Requesting access token with scopes: {:?}", SCOPES);
        match auth.token(SCOPES).await {
            Ok(token) => {
                debug!(
                    "🔍 Token preview: {}...",
                    token
                        .token()
                        .unwrap_or("None")
                        .chars()
                        .take(20)
                        .collect::<String>()
                );
            }
            Err(e) => {
                anyhow::bail!(
                    "Failed to obtain an access token from the stored refresh token: {}\n\
                    The credentials may be revoked or expired; re-issue them and update the secret.",
                    e
                );
            }
        }

        info!("✅ OAuth credentials accepted");
        Ok(auth)
    }
}
