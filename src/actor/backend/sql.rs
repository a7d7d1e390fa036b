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

use crate::actor::backend::ActorBackend;
use crate::actor::backend::error::ActorDatabaseError;
use crate::actor::error::ActorProviderError;
use crate::actor::types::{ActorKind, AuthenticatedActor};
use crate::config::Config;
use crate::db::entity::api_key as db_api_key;
use crate::gateway::ServiceState;

mod api_key;

#[derive(Clone, Debug, Default)]
pub struct SqlBackend {
    pub config: Config,
}

impl TryFrom<db_api_key::Model> for AuthenticatedActor {
    type Error = ActorDatabaseError;

    fn try_from(value: db_api_key::Model) -> Result<Self, Self::Error> {
        let kind = ActorKind::from_str_opt(&value.kind)
            .ok_or_else(|| ActorDatabaseError::UnknownActorKind(value.kind.clone()))?;
        Ok(Self {
            key_id: value.id,
            organization_id: value.organization_id,
            kind,
            name: value.name,
            email: value.email,
        })
    }
}

#[async_trait]
impl ActorBackend for SqlBackend {
    /// Set config.
    fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    #[tracing::instrument(level = "debug", skip(self, state, secret_hash))]
    async fn get_by_secret_hash<'a>(
        &self,
        state: &ServiceState,
        secret_hash: &'a str,
    ) -> Result<Option<AuthenticatedActor>, ActorProviderError> {
        api_key::get_by_secret_hash(&state.db, secret_hash)
            .await?
            .map(|model| model.try_into().map_err(ActorProviderError::from))
            .transpose()
    }
}
