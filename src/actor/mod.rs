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

//! # Actor provider
//!
//! Authenticates the caller API key and resolves the caller identity a
//! request is attributed to. Key authentication is a digest lookup against
//! the `api_key` table; attribution turns the authentication context into a
//! [`CallerIdentity`], refusing vendor calls that do not name the human
//! operator behind the request.

use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;
use sha2::{Digest, Sha256};

pub mod backend;
pub mod error;
pub mod types;

use crate::actor::backend::{ActorBackend, sql::SqlBackend};
use crate::actor::error::ActorProviderError;
use crate::actor::types::{ActorKind, AuthenticatedActor, CallerIdentity};
use crate::config::Config;
use crate::gateway::ServiceState;

/// Header naming the human operator of a vendor call.
pub const OPERATOR_NAME_HEADER: &str = "x-operator-name";
/// Header with the contact email of the human operator of a vendor call.
pub const OPERATOR_EMAIL_HEADER: &str = "x-operator-email";

#[derive(Clone, Debug)]
pub struct ActorProvider {
    backend_driver: Box<dyn ActorBackend>,
}

#[async_trait]
pub trait ActorApi: Send + Sync + Clone {
    /// Authenticate the presented API key secret.
    async fn authenticate_by_key<'a>(
        &self,
        state: &ServiceState,
        secret: &'a str,
    ) -> Result<AuthenticatedActor, ActorProviderError>;
}

impl ActorProvider {
    pub fn new(config: &Config) -> Result<Self, ActorProviderError> {
        let mut backend_driver: Box<dyn ActorBackend> = match config.actor.driver.as_str() {
            "sql" => Box::new(SqlBackend::default()),
            other => {
                return Err(ActorProviderError::UnsupportedDriver(other.to_string()));
            }
        };
        backend_driver.set_config(config.clone());
        Ok(Self { backend_driver })
    }
}

#[async_trait]
impl ActorApi for ActorProvider {
    #[tracing::instrument(level = "debug", skip(self, state, secret))]
    async fn authenticate_by_key<'a>(
        &self,
        state: &ServiceState,
        secret: &'a str,
    ) -> Result<AuthenticatedActor, ActorProviderError> {
        let digest = secret_digest(secret);
        self.backend_driver
            .get_by_secret_hash(state, &digest)
            .await?
            .ok_or(ActorProviderError::Unauthorized)
    }
}

/// Hex SHA-256 digest of an API key secret, as stored in the key table.
pub fn secret_digest(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Resolve the caller identity of a request.
///
/// For user and service keys this is a straight conversion. Vendor keys
/// additionally require the caller-supplied operator attribution pair; the
/// check applies to every vendor call, reads included, and a missing pair
/// must keep the request away from the upstream client.
pub fn resolve_caller(
    actor: &AuthenticatedActor,
    operator_name: Option<&str>,
    operator_email: Option<&str>,
) -> Result<CallerIdentity, ActorProviderError> {
    match actor.kind {
        ActorKind::User => Ok(CallerIdentity::User {
            id: actor.key_id.clone(),
            name: actor.name.clone(),
            email: actor.email.clone(),
        }),
        ActorKind::Service => Ok(CallerIdentity::Service {
            id: actor.key_id.clone(),
            name: actor.name.clone(),
            email: actor.email.clone(),
        }),
        ActorKind::Vendor => {
            let operator_name = operator_name
                .map(str::trim)
                .filter(|val| !val.is_empty())
                .ok_or(ActorProviderError::MissingAttribution)?;
            let operator_email = operator_email
                .map(str::trim)
                .filter(|val| !val.is_empty())
                .ok_or(ActorProviderError::MissingAttribution)?;
            Ok(CallerIdentity::Vendor {
                id: actor.key_id.clone(),
                name: actor.name.clone(),
                email: actor.email.clone(),
                operator_name: operator_name.to_string(),
                operator_email: operator_email.to_string(),
            })
        }
    }
}

#[cfg(test)]
mock! {
    pub ActorProvider {
        pub fn new(cfg: &Config) -> Result<Self, ActorProviderError>;
    }

    #[async_trait]
    impl ActorApi for ActorProvider {
        async fn authenticate_by_key<'a>(
            &self,
            state: &ServiceState,
            secret: &'a str,
        ) -> Result<AuthenticatedActor, ActorProviderError>;
    }

    impl Clone for ActorProvider {
        fn clone(&self) -> Self;
    }
}
