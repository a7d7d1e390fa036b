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

use derive_builder::Builder;
use http::HeaderMap;

use crate::credential::types::UpstreamCredential;

/// A request to be forwarded to the upstream provider, verbatim except for
/// the credential injection.
#[derive(Builder, Clone, Debug)]
#[builder(setter(into, strip_option), pattern = "owned")]
pub struct ForwardRequest {
    /// HTTP method.
    pub method: http::Method,

    /// Upstream path, relative to the API base, without a leading slash.
    pub path: String,

    /// Raw query string.
    #[builder(default)]
    pub query: Option<String>,

    /// Content type of the request body.
    #[builder(default)]
    pub content_type: Option<String>,

    /// Request body.
    #[builder(default)]
    pub body: Option<Vec<u8>>,

    /// Organization credential to authenticate with.
    pub credential: UpstreamCredential,
}

impl ForwardRequest {
    pub fn builder() -> ForwardRequestBuilder {
        ForwardRequestBuilder::default()
    }
}

/// What the upstream answered. Error statuses are answers too; only
/// transport failures surface as errors.
#[derive(Clone, Debug, Default)]
pub struct UpstreamResponse {
    /// Status code.
    pub status: u16,

    /// Response headers, passed through to the caller.
    pub headers: HeaderMap,

    /// Response body.
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    /// Whether the upstream reported success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
