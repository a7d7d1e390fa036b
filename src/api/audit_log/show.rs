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
//! Audit log: show

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::auth::Auth;
use crate::api::error::GatewayApiError;
use crate::api::audit_log::types::AuditLog;
use crate::audit::AuditApi;
use crate::gateway::ServiceState;

/// Show a single audit record.
#[utoipa::path(
    get,
    path = "/{id}",
    operation_id = "/audit_log:show",
    params(
        ("id" = String, Path, description = "The id of the audit record.")
    ),
    responses(
        (status = OK, description = "Audit record.", body = AuditLog),
        (status = 404, description = "Audit record not found."),
    ),
    security(("api_key" = [])),
    tag = "audit_logs"
)]
#[tracing::instrument(
    name = "api::audit_log::show",
    level = "debug",
    skip(state, _actor),
    err(Debug)
)]
pub(super) async fn show(
    Auth(_actor): Auth,
    Path(id): Path<String>,
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, GatewayApiError> {
    state
        .provider
        .get_audit_provider()
        .get(&state, &id)
        .await?
        .map(AuditLog::from)
        .ok_or(GatewayApiError::NotFound {
            resource: "audit record".into(),
            identifier: id,
        })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt; // for `collect`
    use tower::ServiceExt; // for `call`, `oneshot`, and `ready`
    use tower_http::trace::TraceLayer;
    use tracing_test::traced_test;

    use super::{
        super::{openapi_router, tests::get_mocked_state},
        *,
    };
    use crate::audit::{MockAuditProvider, types::{AuditOutcome, AuditRecord}};

    #[tokio::test]
    #[traced_test]
    async fn test_show() {
        let mut audit_mock = MockAuditProvider::default();
        audit_mock
            .expect_get()
            .withf(|_, id: &str| id == "a1")
            .returning(|_, _| {
                Ok(Some(AuditRecord {
                    id: "a1".into(),
                    organization_id: "org".into(),
                    status: AuditOutcome::Rejected,
                    rejection_reason: Some("missing operator attribution".into()),
                    ..Default::default()
                }))
            });
        let state = get_mocked_state(audit_mock);

        let mut api = openapi_router()
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let response = api
            .as_service()
            .oneshot(
                Request::builder()
                    .uri("/a1")
                    .header("x-api-key", "foo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let res: AuditLog = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.id, "a1");
        assert_eq!(res.status, "rejected");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_show_missing() {
        let mut audit_mock = MockAuditProvider::default();
        audit_mock
            .expect_get()
            .withf(|_, id: &str| id == "missing")
            .returning(|_, _| Ok(None));
        let state = get_mocked_state(audit_mock);

        let mut api = openapi_router()
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let response = api
            .as_service()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .header("x-api-key", "foo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
