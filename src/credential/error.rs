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

use crate::credential::backend::error::CredentialDatabaseError;
use crate::credential::types::UpstreamCredentialBuilderError;

#[derive(Error, Debug)]
pub enum CredentialProviderError {
    /// The organization has no usable upstream integration. Must
    /// short-circuit before any network call.
    #[error("organization {0} has no configured upstream credential")]
    NotConfigured(String),

    #[error("unsupported driver {0}")]
    UnsupportedDriver(String),

    #[error(transparent)]
    CredentialBuilder {
        #[from]
        source: UpstreamCredentialBuilderError,
    },

    #[error(transparent)]
    Database {
        #[from]
        source: CredentialDatabaseError,
    },
}
