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
//! Mirrored resources: list

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::api::auth::Auth;
use crate::api::error::GatewayApiError;
use crate::api::resource::types::*;
use crate::classify::ResourceKind;
use crate::gateway::ServiceState;
use crate::sync::{
    SyncApi, types::SyncedResourceListParameters as ProviderSyncedResourceListParameters,
};

/// List mirrored resources.
///
/// Returns the local mirror of the upstream directory. The mirror is
/// best-effort; a resource appears here once a proxied request touched it.
#[utoipa::path(
    get,
    path = "/",
    operation_id = "/resource:list",
    params(ResourceListParameters),
    responses(
        (status = OK, description = "List of mirrored resources.", body = ResourceList),
        (status = 500, description = "Internal error.", example = json!(GatewayApiError::InternalError(String::from("id = 1"))))
    ),
    security(("api_key" = [])),
    tag = "resources"
)]
#[tracing::instrument(
    name = "api::resource::list",
    level = "debug",
    skip(state, _actor),
    err(Debug)
)]
pub(super) async fn list(
    Auth(_actor): Auth,
    Query(query): Query<ResourceListParameters>,
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, GatewayApiError> {
    let kind = query
        .kind
        .as_deref()
        .map(|value| {
            ResourceKind::from_str_opt(value)
                .ok_or_else(|| GatewayApiError::BadRequest(format!("unknown kind {value}")))
        })
        .transpose()?;

    let provider_list_params = ProviderSyncedResourceListParameters {
        organization_id: query.organization_id,
        kind,
        include_deleted: query.include_deleted,
        limit: query.limit,
    };

    let resources: Vec<Resource> = state
        .provider
        .get_sync_provider()
        .list(&state, &provider_list_params)
        .await
        .map_err(|error| GatewayApiError::InternalError(error.to_string()))?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(ResourceList { resources })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt; // for `collect`
    use serde_json::json;
    use tower::ServiceExt; // for `call`, `oneshot`, and `ready`
    use tower_http::trace::TraceLayer;
    use tracing_test::traced_test;

    use super::{
        super::{openapi_router, tests::get_mocked_state},
        *,
    };
    use crate::sync::{MockSyncProvider, types::SyncedResource};

    #[tokio::test]
    #[traced_test]
    async fn test_list() {
        let mut sync_mock = MockSyncProvider::default();
        sync_mock
            .expect_list()
            .withf(|_, params: &ProviderSyncedResourceListParameters| {
                params.kind == Some(ResourceKind::User) && !params.include_deleted
            })
            .returning(|_, _| {
                Ok(vec![SyncedResource {
                    id: 1,
                    organization_id: "org".into(),
                    kind: ResourceKind::User,
                    external_id: "u1".into(),
                    email: Some("jo@x.com".into()),
                    payload: json!({"id": "u1"}),
                    is_active: true,
                    ..Default::default()
                }])
            });
        let state = get_mocked_state(sync_mock);

        let mut api = openapi_router()
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let response = api
            .as_service()
            .oneshot(
                Request::builder()
                    .uri("/?kind=user")
                    .header("x-api-key", "foo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let res: ResourceList = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.resources.len(), 1);
        assert_eq!(res.resources[0].kind, "user");
        assert_eq!(res.resources[0].external_id, "u1");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_list_unknown_kind_is_rejected() {
        let state = get_mocked_state(MockSyncProvider::default());

        let mut api = openapi_router()
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let response = api
            .as_service()
            .oneshot(
                Request::builder()
                    .uri("/?kind=printer")
                    .header("x-api-key", "foo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
