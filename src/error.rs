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

//! # Error
//!
//! Errors that can occur during gateway processing (not the API layer).

use thiserror::Error;

use crate::actor::error::ActorProviderError;
use crate::audit::error::AuditProviderError;
use crate::credential::error::CredentialProviderError;
use crate::sync::error::SyncProviderError;
use crate::upstream::error::UpstreamClientError;

/// Gateway error.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    ActorError {
        #[from]
        source: ActorProviderError,
    },

    #[error(transparent)]
    AuditError {
        #[from]
        source: AuditProviderError,
    },

    #[error(transparent)]
    CredentialError {
        #[from]
        source: CredentialProviderError,
    },

    #[error(transparent)]
    SyncError {
        #[from]
        source: SyncProviderError,
    },

    #[error(transparent)]
    UpstreamError {
        #[from]
        source: UpstreamClientError,
    },

    #[error(transparent)]
    IO {
        #[from]
        source: std::io::Error,
    },

    /// Json serialization error.
    #[error("json serde error: {}", source)]
    JsonError {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Database {
        #[from]
        source: sea_orm::DbErr,
    },

    #[error(transparent)]
    UrlParse {
        #[from]
        source: url::ParseError,
    },
}
