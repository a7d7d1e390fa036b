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
//! # Mirrored resource API.

use utoipa_axum::{router::OpenApiRouter, routes};

use crate::gateway::ServiceState;

mod list;
pub mod types;

pub(crate) static DESCRIPTION: &str =
    "Best-effort local mirror of the upstream directory resources.";

pub fn openapi_router() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(list::list))
}

#[cfg(test)]
pub(crate) mod tests {
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;

    use crate::actor::{MockActorProvider, types::AuthenticatedActor};
    use crate::config::Config;
    use crate::gateway::{Service, ServiceState};
    use crate::provider::Provider;
    use crate::sync::MockSyncProvider;

    /// Mocked state with key authentication answering a plain user actor.
    pub(crate) fn get_mocked_state(sync_mock: MockSyncProvider) -> ServiceState {
        let mut actor_mock = MockActorProvider::default();
        actor_mock.expect_authenticate_by_key().returning(|_, _| {
            Ok(AuthenticatedActor {
                key_id: "key1".into(),
                organization_id: "org".into(),
                name: "Jo".into(),
                email: "jo@x.com".into(),
                ..Default::default()
            })
        });

        let provider = Provider::mocked_builder()
            .actor(actor_mock)
            .sync(sync_mock)
            .build()
            .unwrap();

        Arc::new(
            Service::new(
                Config::default(),
                DatabaseConnection::Disconnected,
                provider,
            )
            .unwrap(),
        )
    }
}
