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
use dyn_clone::DynClone;

use crate::classify::ResourceKind;
use crate::config::Config;
use crate::gateway::ServiceState;
use crate::sync::error::SyncProviderError;
use crate::sync::types::{SyncUpsert, SyncedResource, SyncedResourceListParameters};

pub mod error;
pub mod sql;

#[async_trait]
pub trait SyncBackend: DynClone + Send + Sync + std::fmt::Debug {
    /// Set config.
    fn set_config(&mut self, config: Config);

    /// Write the resources into the mirror, reviving soft deleted rows.
    /// Each row is one atomic insert-or-update on the natural key.
    async fn upsert<'a>(
        &self,
        state: &ServiceState,
        organization_id: &'a str,
        kind: ResourceKind,
        resources: Vec<SyncUpsert>,
    ) -> Result<u64, SyncProviderError>;

    /// Mark a mirrored resource deleted. The identifier is matched against
    /// the external id first and the email column as a fallback.
    async fn soft_delete<'a>(
        &self,
        state: &ServiceState,
        organization_id: &'a str,
        kind: ResourceKind,
        identifier: &'a str,
    ) -> Result<u64, SyncProviderError>;

    /// List mirrored resources matching the filters.
    async fn list(
        &self,
        state: &ServiceState,
        params: &SyncedResourceListParameters,
    ) -> Result<Vec<SyncedResource>, SyncProviderError>;
}

dyn_clone::clone_trait_object!(SyncBackend);
