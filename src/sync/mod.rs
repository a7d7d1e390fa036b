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

//! # Sync provider
//!
//! Best-effort local mirror of the upstream directory. After a successful
//! upstream exchange the dispatcher hands the observed response over;
//! extraction rules turn it into mirror writes. Sync failures never fail
//! the proxied request, they are logged and the mirror catches up on the
//! next touch of the same resource.

use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;

pub mod backend;
pub mod error;
pub mod rules;
pub mod types;

use crate::config::Config;
use crate::gateway::ServiceState;
use crate::sync::backend::{SyncBackend, sql::SqlBackend};
use crate::sync::error::SyncProviderError;
use crate::sync::types::{
    SyncInput, SyncOutcome, SyncedResource, SyncedResourceListParameters,
};

#[derive(Clone, Debug)]
pub struct SyncProvider {
    backend_driver: Box<dyn SyncBackend>,
}

#[async_trait]
pub trait SyncApi: Send + Sync + Clone {
    /// Mirror the effect of a successful upstream exchange.
    async fn apply(
        &self,
        state: &ServiceState,
        input: SyncInput,
    ) -> Result<SyncOutcome, SyncProviderError>;

    /// List mirrored resources matching the filters.
    async fn list(
        &self,
        state: &ServiceState,
        params: &SyncedResourceListParameters,
    ) -> Result<Vec<SyncedResource>, SyncProviderError>;
}

impl SyncProvider {
    pub fn new(config: &Config) -> Result<Self, SyncProviderError> {
        let mut backend_driver: Box<dyn SyncBackend> = match config.sync.driver.as_str() {
            "sql" => Box::new(SqlBackend::default()),
            other => {
                return Err(SyncProviderError::UnsupportedDriver(other.to_string()));
            }
        };
        backend_driver.set_config(config.clone());
        Ok(Self { backend_driver })
    }

    #[cfg(test)]
    fn with_backend(backend: Box<dyn SyncBackend>) -> Self {
        Self {
            backend_driver: backend,
        }
    }
}

#[async_trait]
impl SyncApi for SyncProvider {
    #[tracing::instrument(level = "debug", skip(self, state, input), fields(kind = %input.kind, method = %input.method))]
    async fn apply(
        &self,
        state: &ServiceState,
        input: SyncInput,
    ) -> Result<SyncOutcome, SyncProviderError> {
        let Some(rule) = rules::rule_for(input.kind) else {
            return Ok(SyncOutcome::Skipped);
        };

        if input.method == http::Method::DELETE {
            let identifier = input.item.as_deref().ok_or_else(|| {
                SyncProviderError::MissingItem {
                    kind: input.kind.to_string(),
                }
            })?;
            let affected = self
                .backend_driver
                .soft_delete(state, &input.organization_id, input.kind, identifier)
                .await?;
            return Ok(SyncOutcome::Deleted(affected));
        }

        let Some(body) = &input.response_body else {
            return Ok(SyncOutcome::Skipped);
        };
        let resources = rule.extract(body);
        if resources.is_empty() {
            return Ok(SyncOutcome::Skipped);
        }
        let written = self
            .backend_driver
            .upsert(state, &input.organization_id, input.kind, resources)
            .await?;
        Ok(SyncOutcome::Upserted(written))
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn list(
        &self,
        state: &ServiceState,
        params: &SyncedResourceListParameters,
    ) -> Result<Vec<SyncedResource>, SyncProviderError> {
        self.backend_driver.list(state, params).await
    }
}

#[cfg(test)]
mock! {
    pub SyncProvider {
        pub fn new(cfg: &Config) -> Result<Self, SyncProviderError>;
    }

    #[async_trait]
    impl SyncApi for SyncProvider {
        async fn apply(
            &self,
            state: &ServiceState,
            input: SyncInput,
        ) -> Result<SyncOutcome, SyncProviderError>;

        async fn list(
            &self,
            state: &ServiceState,
            params: &SyncedResourceListParameters,
        ) -> Result<Vec<SyncedResource>, SyncProviderError>;
    }

    impl Clone for SyncProvider {
        fn clone(&self) -> Self;
    }
}
