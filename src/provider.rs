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

//! # Provider manager
//!
//! Provider manager provides access to the individual service providers.
//! This gives an easy interface for passing the overall manager down to the
//! individual providers that might need to call other providers while also
//! allowing an easy injection of mocked providers in tests.

use derive_builder::Builder;
use mockall_double::double;

use crate::actor::ActorApi;
#[double]
use crate::actor::ActorProvider;
use crate::audit::AuditApi;
#[double]
use crate::audit::AuditProvider;
use crate::config::Config;
use crate::credential::CredentialApi;
#[double]
use crate::credential::CredentialProvider;
use crate::error::GatewayError;
use crate::sync::SyncApi;
#[double]
use crate::sync::SyncProvider;
use crate::upstream::UpstreamApi;
#[double]
use crate::upstream::UpstreamClient;

/// Global provider manager.
#[derive(Builder, Clone)]
// It is necessary to use the owned pattern since otherwise builder invokes
// clone which immediately confuses mockall used in tests.
#[builder(pattern = "owned")]
pub struct Provider {
    /// Configuration.
    pub config: Config,
    /// Actor (caller identity) provider.
    actor: ActorProvider,
    /// Audit recorder.
    audit: AuditProvider,
    /// Upstream credential provider.
    credential: CredentialProvider,
    /// Local resource mirror.
    sync: SyncProvider,
    /// Upstream forwarding client.
    upstream: UpstreamClient,
}

impl Provider {
    pub fn new(cfg: Config) -> Result<Self, GatewayError> {
        let actor_provider = ActorProvider::new(&cfg)?;
        let audit_provider = AuditProvider::new(&cfg)?;
        let credential_provider = CredentialProvider::new(&cfg)?;
        let sync_provider = SyncProvider::new(&cfg)?;
        let upstream_client = UpstreamClient::new(&cfg)?;

        Ok(Self {
            config: cfg,
            actor: actor_provider,
            audit: audit_provider,
            credential: credential_provider,
            sync: sync_provider,
            upstream: upstream_client,
        })
    }

    /// Get the actor provider.
    pub fn get_actor_provider(&self) -> &impl ActorApi {
        &self.actor
    }

    /// Get the audit provider.
    pub fn get_audit_provider(&self) -> &impl AuditApi {
        &self.audit
    }

    /// Get the credential provider.
    pub fn get_credential_provider(&self) -> &impl CredentialApi {
        &self.credential
    }

    /// Get the sync provider.
    pub fn get_sync_provider(&self) -> &impl SyncApi {
        &self.sync
    }

    /// Get the upstream client.
    pub fn get_upstream_client(&self) -> &impl UpstreamApi {
        &self.upstream
    }
}

#[cfg(test)]
impl Provider {
    pub fn mocked_builder() -> ProviderBuilder {
        let config = Config::default();
        let actor_mock = crate::actor::MockActorProvider::default();
        let audit_mock = crate::audit::MockAuditProvider::default();
        let credential_mock = crate::credential::MockCredentialProvider::default();
        let sync_mock = crate::sync::MockSyncProvider::default();
        let upstream_mock = crate::upstream::MockUpstreamClient::default();

        ProviderBuilder::default()
            .config(config)
            .actor(actor_mock)
            .audit(audit_mock)
            .credential(credential_mock)
            .sync(sync_mock)
            .upstream(upstream_mock)
    }
}
