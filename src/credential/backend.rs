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

use crate::config::Config;
use crate::credential::error::CredentialProviderError;
use crate::credential::types::UpstreamCredential;
use crate::gateway::ServiceState;

pub mod error;
pub mod sql;

#[async_trait]
pub trait CredentialBackend: DynClone + Send + Sync + std::fmt::Debug {
    /// Set config.
    fn set_config(&mut self, config: Config);

    /// Fetch the enabled upstream credential of the organization.
    async fn get_by_organization<'a>(
        &self,
        state: &ServiceState,
        organization_id: &'a str,
    ) -> Result<Option<UpstreamCredential>, CredentialProviderError>;
}

dyn_clone::clone_trait_object!(CredentialBackend);
