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

//! # Credential provider
//!
//! Resolves the per-organization delegated credential used to authenticate
//! against the upstream provider. Resolution happens per request through an
//! explicit provider call; a TTL-bound cache keyed by organization id
//! fronts the backend so hot organizations do not hit the database on every
//! proxied call.

use async_trait::async_trait;
use dashmap::DashMap;
#[cfg(test)]
use mockall::mock;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub mod backend;
pub mod error;
pub mod types;

use crate::config::Config;
use crate::credential::backend::{CredentialBackend, sql::SqlBackend};
use crate::credential::error::CredentialProviderError;
use crate::credential::types::UpstreamCredential;
use crate::gateway::ServiceState;

#[derive(Clone, Debug)]
struct CacheEntry {
    credential: UpstreamCredential,
    expires_at: Instant,
}

#[derive(Clone, Debug)]
pub struct CredentialProvider {
    backend_driver: Box<dyn CredentialBackend>,
    cache: Arc<DashMap<String, CacheEntry>>,
    cache_ttl: Duration,
}

#[async_trait]
pub trait CredentialApi: Send + Sync + Clone {
    /// Resolve the upstream credential of the organization.
    async fn get_credential<'a>(
        &self,
        state: &ServiceState,
        organization_id: &'a str,
    ) -> Result<UpstreamCredential, CredentialProviderError>;
}

impl CredentialProvider {
    pub fn new(config: &Config) -> Result<Self, CredentialProviderError> {
        let mut backend_driver: Box<dyn CredentialBackend> =
            match config.credential.driver.as_str() {
                "sql" => Box::new(SqlBackend::default()),
                other => {
                    return Err(CredentialProviderError::UnsupportedDriver(other.to_string()));
                }
            };
        backend_driver.set_config(config.clone());
        Ok(Self {
            backend_driver,
            cache: Arc::new(DashMap::new()),
            cache_ttl: Duration::from_secs(config.credential.cache_ttl_secs),
        })
    }

    #[cfg(test)]
    fn with_backend(backend: Box<dyn CredentialBackend>, ttl: Duration) -> Self {
        Self {
            backend_driver: backend,
            cache: Arc::new(DashMap::new()),
            cache_ttl: ttl,
        }
    }
}

#[async_trait]
impl CredentialApi for CredentialProvider {
    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn get_credential<'a>(
        &self,
        state: &ServiceState,
        organization_id: &'a str,
    ) -> Result<UpstreamCredential, CredentialProviderError> {
        if let Some(entry) = self.cache.get(organization_id)
            && entry.expires_at > Instant::now()
        {
            return Ok(entry.credential.clone());
        }

        let credential = self
            .backend_driver
            .get_by_organization(state, organization_id)
            .await?
            .ok_or_else(|| CredentialProviderError::NotConfigured(organization_id.to_string()))?;

        self.cache.insert(
            organization_id.to_string(),
            CacheEntry {
                credential: credential.clone(),
                expires_at: Instant::now() + self.cache_ttl,
            },
        );

        Ok(credential)
    }
}

#[cfg(test)]
mock! {
    pub CredentialProvider {
        pub fn new(cfg: &Config) -> Result<Self, CredentialProviderError>;
    }

    #[async_trait]
    impl CredentialApi for CredentialProvider {
        async fn get_credential<'a>(
            &self,
            state: &ServiceState,
            organization_id: &'a str,
        ) -> Result<UpstreamCredential, CredentialProviderError>;
    }

    impl Clone for CredentialProvider {
        fn clone(&self) -> Self;
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DatabaseConnection;
    use secrecy::ExposeSecret;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::gateway::Service;
    use crate::provider::Provider;

    #[derive(Clone, Debug, Default)]
    struct CountingBackend {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CredentialBackend for CountingBackend {
        fn set_config(&mut self, _config: Config) {}

        async fn get_by_organization<'a>(
            &self,
            _state: &ServiceState,
            organization_id: &'a str,
        ) -> Result<Option<UpstreamCredential>, CredentialProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if organization_id == "org" {
                Ok(Some(UpstreamCredential {
                    organization_id: "org".into(),
                    delegated_subject: "admin@org.example".into(),
                    secret: "s3cr3t".into(),
                    api_base: None,
                }))
            } else {
                Ok(None)
            }
        }
    }

    fn state() -> ServiceState {
        let provider = Provider::mocked_builder().build().unwrap();
        Arc::new(
            Service::new(
                Config::default(),
                DatabaseConnection::Disconnected,
                provider,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn second_hit_within_ttl_is_served_from_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = CountingBackend {
            calls: calls.clone(),
        };
        let provider =
            CredentialProvider::with_backend(Box::new(backend), Duration::from_secs(60));
        let state = state();

        let first = provider.get_credential(&state, "org").await.unwrap();
        let second = provider.get_credential(&state, "org").await.unwrap();
        assert_eq!(first.delegated_subject, second.delegated_subject);
        assert_eq!(
            first.secret.expose_secret(),
            second.secret.expose_secret()
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entries_go_back_to_the_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = CountingBackend {
            calls: calls.clone(),
        };
        let provider = CredentialProvider::with_backend(Box::new(backend), Duration::ZERO);
        let state = state();

        provider.get_credential(&state, "org").await.unwrap();
        provider.get_credential(&state, "org").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unconfigured_organization_is_rejected() {
        let provider = CredentialProvider::with_backend(
            Box::new(CountingBackend::default()),
            Duration::from_secs(60),
        );
        let state = state();

        assert!(matches!(
            provider.get_credential(&state, "ghost").await,
            Err(CredentialProviderError::NotConfigured(org)) if org == "ghost"
        ));
    }
}
