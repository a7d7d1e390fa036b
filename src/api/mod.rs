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
//! Gateway API
//!
//! Two surfaces share the listener: the transparent `/v1/directory/{*path}`
//! proxy (a plain catch-all, since arbitrary forwarded paths cannot be
//! described in the OpenAPI document) and the OpenAPI-described reporting
//! endpoints over the audit trail and the resource mirror.

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
    routing::any,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::error::GatewayApiError;
use crate::gateway::ServiceState;

pub mod audit_log;
pub mod auth;
pub mod error;
mod proxy;
pub mod resource;
pub mod types;

use crate::api::types::*;

#[derive(OpenApi)]
#[openapi(
    info(version = "1.0.0"),
    modifiers(&SecurityAddon),
    tags(
        (name="audit_logs", description=audit_log::DESCRIPTION),
        (name="resources", description=resource::DESCRIPTION),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(auth::API_KEY_HEADER))),
            );
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("The api key secret as a bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// The OpenAPI-described reporting surface.
pub fn openapi_router() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .nest("/v1/audit-logs", audit_log::openapi_router())
        .nest("/v1/resources", resource::openapi_router())
        .routes(routes!(version))
}

/// The transparent forwarding surface.
pub fn proxy_router() -> Router<ServiceState> {
    Router::new().route("/v1/directory/{*path}", any(proxy::forward))
}

/// Versions
#[utoipa::path(
    get,
    path = "/",
    description = "Version discovery",
    responses(
        (status = OK, description = "Versions", body = Versions),
    ),
    tag = "version"
)]
async fn version(
    headers: HeaderMap,
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, GatewayApiError> {
    let host = state
        .config
        .default
        .as_ref()
        .and_then(|dflt| dflt.public_endpoint.clone())
        .or_else(|| {
            headers
                .get(header::HOST)
                .and_then(|header| header.to_str().map(|val| format!("http://{val}")).ok())
        })
        .unwrap_or_else(|| "http://localhost".to_string());

    let res = Versions {
        versions: Values {
            values: vec![Version {
                id: "v1".into(),
                status: VersionStatus::Stable,
                links: Some(vec![Link::new(format!("{host}/v1"))]),
            }],
        },
    };
    Ok(res)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt; // for `collect`
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt; // for `call`, `oneshot`, and `ready`
    use tracing_test::traced_test;

    use super::*;
    use crate::config::Config;
    use crate::gateway::Service;
    use crate::provider::Provider;

    #[tokio::test]
    #[traced_test]
    async fn test_version() {
        let provider = Provider::mocked_builder().build().unwrap();
        let state = Arc::new(
            Service::new(
                Config::default(),
                DatabaseConnection::Disconnected,
                provider,
            )
            .unwrap(),
        );

        let mut api = openapi_router().with_state(state);

        let response = api
            .as_service()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::HOST, "gw.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let res: Versions = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.versions.values[0].id, "v1");
        assert_eq!(
            res.versions.values[0].links.as_ref().unwrap()[0].href,
            "http://gw.example.com/v1"
        );
    }
}
