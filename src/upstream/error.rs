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

use thiserror::Error;

use crate::upstream::types::ForwardRequestBuilderError;

#[derive(Error, Debug)]
pub enum UpstreamClientError {
    /// The upstream could not be reached at all.
    #[error("upstream provider is unreachable")]
    Unavailable { source: reqwest::Error },

    /// The upstream did not answer within the configured deadline.
    #[error("upstream provider did not answer in time")]
    Timeout { source: reqwest::Error },

    /// Transport level failure after the connection was established.
    #[error("upstream transport error")]
    Transport { source: reqwest::Error },

    /// The HTTP client could not be constructed.
    #[error("failed to build the upstream http client")]
    ClientBuild { source: reqwest::Error },

    /// The configured API base is not a usable URL.
    #[error("invalid upstream api base {base}")]
    InvalidBase {
        base: String,
        source: Option<url::ParseError>,
    },

    /// Forward request builder error.
    #[error(transparent)]
    ForwardRequestBuilder(#[from] ForwardRequestBuilderError),
}

impl UpstreamClientError {
    /// Classify a transport error raised by the HTTP client.
    pub fn from_send_error(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { source }
        } else if source.is_connect() {
            Self::Unavailable { source }
        } else {
            Self::Transport { source }
        }
    }
}
