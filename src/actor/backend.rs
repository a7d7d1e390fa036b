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

use crate::actor::error::ActorProviderError;
use crate::actor::types::AuthenticatedActor;
use crate::config::Config;
use crate::gateway::ServiceState;

pub mod error;
pub mod sql;

#[async_trait]
pub trait ActorBackend: DynClone + Send + Sync + std::fmt::Debug {
    /// Set config.
    fn set_config(&mut self, config: Config);

    /// Look up an active API key by the digest of the presented secret.
    async fn get_by_secret_hash<'a>(
        &self,
        state: &ServiceState,
        secret_hash: &'a str,
    ) -> Result<Option<AuthenticatedActor>, ActorProviderError>;
}

dyn_clone::clone_trait_object!(ActorBackend);
