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

use crate::actor::backend::error::ActorDatabaseError;
use crate::actor::types::AuthenticatedActorBuilderError;

#[derive(Error, Debug)]
pub enum ActorProviderError {
    /// The presented key did not resolve to an active actor.
    #[error("The request you have made requires authentication.")]
    Unauthorized,

    /// Vendor key without the per-request operator attribution.
    #[error("vendor calls must carry the x-operator-name and x-operator-email headers")]
    MissingAttribution,

    #[error("unsupported driver {0}")]
    UnsupportedDriver(String),

    #[error(transparent)]
    ActorBuilder {
        #[from]
        source: AuthenticatedActorBuilderError,
    },

    #[error(transparent)]
    Database {
        #[from]
        source: ActorDatabaseError,
    },
}
