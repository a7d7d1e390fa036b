// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! # Gateway configuration
//!
//! Configuration is read from a single INI-style file. Every subsystem gets
//! its own section; secrets (database URL, upstream credential material)
//! are kept behind [`SecretString`] so they never land in debug output.

use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Global configuration options.
    #[serde(rename = "DEFAULT")]
    pub default: Option<DefaultSection>,

    /// Actor (API key) authentication configuration.
    #[serde(default)]
    pub actor: ActorSection,

    /// Audit recorder configuration.
    #[serde(default)]
    pub audit: AuditSection,

    /// Upstream credential resolution.
    #[serde(default)]
    pub credential: CredentialSection,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseSection,

    /// Local resource mirror configuration.
    #[serde(default)]
    pub sync: SyncSection,

    /// Upstream directory provider endpoint.
    #[serde(default)]
    pub upstream: UpstreamSection,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct DefaultSection {
    /// Debug logging.
    pub debug: Option<bool>,
    /// Public endpoint of the gateway.
    pub public_endpoint: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSection {
    /// Database URL.
    #[serde(default = "default_db_connection")]
    pub connection: SecretString,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            connection: default_db_connection(),
        }
    }
}

fn default_db_connection() -> SecretString {
    SecretString::from("sqlite::memory:")
}

impl DatabaseSection {
    pub fn get_connection(&self) -> SecretString {
        self.connection.clone()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActorSection {
    /// Actor backend driver.
    #[serde(default = "default_sql_driver")]
    pub driver: String,
}

impl Default for ActorSection {
    fn default() -> Self {
        Self {
            driver: default_sql_driver(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditSection {
    /// Audit backend driver.
    #[serde(default = "default_sql_driver")]
    pub driver: String,

    /// Upper bound on the captured upstream response body, in bytes.
    /// Larger bodies are truncated before being written to the audit row.
    #[serde(default = "default_response_capture_limit")]
    pub response_capture_limit: usize,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            driver: default_sql_driver(),
            response_capture_limit: default_response_capture_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CredentialSection {
    /// Credential backend driver.
    #[serde(default = "default_sql_driver")]
    pub driver: String,

    /// How long a resolved organization credential may be served from the
    /// in-process cache before the backend is consulted again.
    #[serde(default = "default_credential_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for CredentialSection {
    fn default() -> Self {
        Self {
            driver: default_sql_driver(),
            cache_ttl_secs: default_credential_cache_ttl(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncSection {
    /// Sync backend driver.
    #[serde(default = "default_sql_driver")]
    pub driver: String,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            driver: default_sql_driver(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSection {
    /// Base URL of the upstream directory API. The inbound path (with the
    /// gateway prefix stripped) is appended to this verbatim.
    #[serde(default = "default_upstream_api_base")]
    pub api_base: Url,

    /// Connect timeout towards the upstream provider.
    #[serde(default = "default_upstream_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Total per-request deadline towards the upstream provider. When it
    /// elapses the caller gets a 504 and the audit record is closed as
    /// `failure`.
    #[serde(default = "default_upstream_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            api_base: default_upstream_api_base(),
            connect_timeout_secs: default_upstream_connect_timeout(),
            request_timeout_secs: default_upstream_request_timeout(),
        }
    }
}

fn default_sql_driver() -> String {
    "sql".into()
}

fn default_response_capture_limit() -> usize {
    // Matches the inbound body limit enforced by the binary.
    1024 * 64
}

fn default_credential_cache_ttl() -> u64 {
    300
}

fn default_upstream_connect_timeout() -> u64 {
    5
}

fn default_upstream_request_timeout() -> u64 {
    30
}

fn default_upstream_api_base() -> Url {
    Url::parse("https://directory.example.com/v1/").expect("static url is valid")
}

impl Config {
    /// Load the configuration from the file at `path`.
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let config = config::Config::builder()
            .add_source(
                File::from(path.clone())
                    .format(FileFormat::Ini)
                    .required(true),
            )
            .build()
            .wrap_err_with(|| format!("reading the config file {:?}", path))?;

        config
            .try_deserialize()
            .wrap_err("deserializing the configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.actor.driver, "sql");
        assert_eq!(cfg.audit.driver, "sql");
        assert_eq!(cfg.credential.cache_ttl_secs, 300);
        assert_eq!(cfg.upstream.request_timeout_secs, 30);
        assert_eq!(cfg.audit.response_capture_limit, 65536);
    }
}
