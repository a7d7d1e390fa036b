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

//! # Upstream credential types

use derive_builder::Builder;
use secrecy::SecretString;
use url::Url;

/// The capability object used to authenticate as an organization's service
/// identity against the upstream provider.
///
/// The bearer secret stays behind [`SecretString`] so neither debug output
/// nor the credential cache can leak it; it is exposed only at the point
/// where the upstream request is authenticated.
#[derive(Builder, Clone, Debug)]
#[builder(setter(into, strip_option))]
pub struct UpstreamCredential {
    /// Organization the credential belongs to.
    pub organization_id: String,

    /// The directory principal the credential acts on behalf of.
    pub delegated_subject: String,

    /// Bearer secret presented to the upstream provider.
    pub secret: SecretString,

    /// Per-organization override of the upstream API base.
    #[builder(default)]
    pub api_base: Option<Url>,
}

impl UpstreamCredential {
    pub fn builder() -> UpstreamCredentialBuilder {
        UpstreamCredentialBuilder::default()
    }
}
