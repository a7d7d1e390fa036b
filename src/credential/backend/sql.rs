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

use async_trait::async_trait;
use url::Url;

use crate::config::Config;
use crate::credential::backend::CredentialBackend;
use crate::credential::backend::error::CredentialDatabaseError;
use crate::credential::error::CredentialProviderError;
use crate::credential::types::UpstreamCredential;
use crate::db::entity::upstream_credential as db_upstream_credential;
use crate::gateway::ServiceState;

mod upstream_credential;

#[derive(Clone, Debug, Default)]
pub struct SqlBackend {
    pub config: Config,
}

impl TryFrom<db_upstream_credential::Model> for UpstreamCredential {
    type Error = CredentialDatabaseError;

    fn try_from(value: db_upstream_credential::Model) -> Result<Self, Self::Error> {
        let api_base = value
            .api_base
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|source| CredentialDatabaseError::InvalidApiBase {
                source,
                organization_id: value.organization_id.clone(),
            })?;
        Ok(Self {
            organization_id: value.organization_id,
            delegated_subject: value.delegated_subject,
            secret: value.secret.into(),
            api_base,
        })
    }
}

#[async_trait]
impl CredentialBackend for SqlBackend {
    /// Set config.
    fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn get_by_organization<'a>(
        &self,
        state: &ServiceState,
        organization_id: &'a str,
    ) -> Result<Option<UpstreamCredential>, CredentialProviderError> {
        upstream_credential::get_by_organization(&state.db, organization_id)
            .await?
            .map(|model| model.try_into().map_err(CredentialProviderError::from))
            .transpose()
    }
}
