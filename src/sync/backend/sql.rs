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
use chrono::Utc;
use sea_orm::Set;

use crate::classify::ResourceKind;
use crate::config::Config;
use crate::db::entity::synced_resource as db_synced_resource;
use crate::gateway::ServiceState;
use crate::sync::backend::SyncBackend;
use crate::sync::backend::error::SyncDatabaseError;
use crate::sync::error::SyncProviderError;
use crate::sync::types::{SyncUpsert, SyncedResource, SyncedResourceListParameters};

mod synced_resource;

#[derive(Clone, Debug, Default)]
pub struct SqlBackend {
    pub config: Config,
}

impl TryFrom<db_synced_resource::Model> for SyncedResource {
    type Error = SyncDatabaseError;

    fn try_from(value: db_synced_resource::Model) -> Result<Self, Self::Error> {
        let kind = ResourceKind::from_str_opt(&value.kind).ok_or_else(|| {
            SyncDatabaseError::UnknownKind {
                id: value.id,
                value: value.kind.clone(),
            }
        })?;
        Ok(Self {
            id: value.id,
            organization_id: value.organization_id,
            kind,
            external_id: value.external_id,
            display_name: value.display_name,
            email: value.email,
            payload: value.payload,
            last_sync_at: value.last_sync_at,
            is_active: value.is_active,
            deleted_at: value.deleted_at,
            created_at: value.created_at,
        })
    }
}

#[async_trait]
impl SyncBackend for SqlBackend {
    /// Set config.
    fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    #[tracing::instrument(level = "debug", skip(self, state, resources))]
    async fn upsert<'a>(
        &self,
        state: &ServiceState,
        organization_id: &'a str,
        kind: ResourceKind,
        resources: Vec<SyncUpsert>,
    ) -> Result<u64, SyncProviderError> {
        let now = Utc::now().naive_utc();
        let models = resources
            .into_iter()
            .map(|resource| db_synced_resource::ActiveModel {
                organization_id: Set(organization_id.to_string()),
                kind: Set(kind.as_str().to_string()),
                external_id: Set(resource.external_id),
                display_name: Set(resource.display_name),
                email: Set(resource.email),
                payload: Set(resource.payload),
                last_sync_at: Set(now),
                is_active: Set(true),
                deleted_at: Set(None),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();
        synced_resource::upsert_many(&state.db, models)
            .await
            .map_err(SyncProviderError::from)
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn soft_delete<'a>(
        &self,
        state: &ServiceState,
        organization_id: &'a str,
        kind: ResourceKind,
        identifier: &'a str,
    ) -> Result<u64, SyncProviderError> {
        synced_resource::soft_delete(
            &state.db,
            organization_id,
            kind.as_str(),
            identifier,
            Utc::now().naive_utc(),
        )
        .await
        .map_err(SyncProviderError::from)
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn list(
        &self,
        state: &ServiceState,
        params: &SyncedResourceListParameters,
    ) -> Result<Vec<SyncedResource>, SyncProviderError> {
        synced_resource::list(&state.db, params)
            .await?
            .into_iter()
            .map(|model| model.try_into().map_err(SyncProviderError::from))
            .collect()
    }
}
