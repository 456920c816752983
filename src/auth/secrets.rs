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

//! Where OAuth credentials are read from.
//!
//! Deployments inject the credential JSON into an environment variable from
//! their secrets store; local runs usually point at a file instead.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Default environment variable holding the credential JSON.
pub const DEFAULT_CREDENTIALS_ENV: &str = "SITE_REPORT_OAUTH_CREDENTIALS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Secret value stored in the named environment variable
    Env(String),
    /// Secret value stored in a file
    File(PathBuf),
}

impl SecretSource {
    /// Reads the raw secret value.
    ///
    /// # Errors
    ///
    /// * If the environment variable is unset or empty
    /// * If the file cannot be read or is empty
    pub fn read(&self) -> Result<String> {
        let value = match self {
            SecretSource::Env(name) => std::env::var(name).with_context(|| {
                format!(
                    "Credential environment variable '{}' is not set.\n\
                    Export the authorized-user credential JSON into it, or pass --credentials-file.",
                    name
                )
            })?,
            SecretSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read credentials file: {:?}", path))?,
        };

        if value.trim().is_empty() {
            anyhow::bail!("Credential secret from {} is empty", self);
        }

        debug!("🔐 Loaded credential secret from {}", self);
        Ok(value)
    }
}

impl fmt::Display for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretSource::Env(name) => write!(f, "environment variable {}", name),
            SecretSource::File(path) => write!(f, "file {}", path.display()),
        }
    }
}
