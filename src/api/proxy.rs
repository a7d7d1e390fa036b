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
//! # Proxy dispatcher.
//!
//! The forwarding pipeline behind the `/v1/directory/{*path}` catch-all.
//! Per request: attribute the caller, open the audit record, resolve the
//! organization credential, forward upstream once, close the record, then
//! mirror the observed effect. The upstream answer is passed through
//! verbatim, error statuses included; only transport failures are replaced
//! by gateway-origin 502/504 answers.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header},
    response::Response,
};

use crate::actor::{
    OPERATOR_EMAIL_HEADER, OPERATOR_NAME_HEADER, error::ActorProviderError, resolve_caller,
};
use crate::api::auth::Auth;
use crate::api::error::GatewayApiError;
use crate::audit::{
    AuditApi, AuditGuard,
    types::{AuditClose, AuditOpen, AuditRejection},
};
use crate::classify::{action_label, classify};
use crate::credential::{CredentialApi, error::CredentialProviderError};
use crate::gateway::ServiceState;
use crate::sync::{SyncApi, types::SyncInput};
use crate::upstream::{UpstreamApi, error::UpstreamClientError, types::ForwardRequest};

// Hop-by-hop headers must not be copied onto the passthrough response.
// Content length is recomputed by axum from the buffered body.
const SKIPPED_RESPONSE_HEADERS: [header::HeaderName; 6] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::CONTENT_LENGTH,
];

#[tracing::instrument(
    name = "api::proxy",
    level = "debug",
    skip(state, actor, request),
    err(Debug)
)]
pub(crate) async fn forward(
    Auth(actor): Auth,
    Path(path): Path<String>,
    State(state): State<ServiceState>,
    request: Request,
) -> Result<Response, GatewayApiError> {
    let method = request.method().clone();
    let query = request.uri().query().map(str::to_string);
    let headers = request.headers().clone();

    let classification = classify(&path);
    let action = action_label(&method, &classification);

    // Attribution. A vendor key without the operator pair never reaches
    // the upstream; the refusal itself is audited.
    let caller = match resolve_caller(
        &actor,
        header_str(&headers, OPERATOR_NAME_HEADER),
        header_str(&headers, OPERATOR_EMAIL_HEADER),
    ) {
        Ok(caller) => caller,
        Err(error @ ActorProviderError::MissingAttribution) => {
            let rejection = AuditRejection::builder()
                .organization_id(actor.organization_id.clone())
                .actor_id(actor.key_id.clone())
                .actor_type(actor.kind)
                .actor_name(actor.name.clone())
                .actor_email(actor.email.clone())
                .action(action)
                .method(method.as_str())
                .path(path)
                .reason(error.to_string())
                .build()
                .map_err(crate::audit::error::AuditProviderError::from)?;
            let rejection = match query {
                Some(query) => AuditRejection {
                    query: Some(query),
                    ..rejection
                },
                None => rejection,
            };
            state
                .provider
                .get_audit_provider()
                .record_rejection(&state, rejection)
                .await?;
            return Err(error.into());
        }
        Err(error) => return Err(error.into()),
    };

    let capture_limit = state.config.audit.response_capture_limit;
    let body_bytes = axum::body::to_bytes(request.into_body(), capture_limit.max(1024 * 1024))
        .await
        .map_err(|error| GatewayApiError::InternalError(error.to_string()))?;

    // The audit record is opened before the upstream is contacted. From
    // here on every exit path closes it exactly once; the guard covers
    // abandonment in between.
    let open = AuditOpen::builder()
        .organization_id(actor.organization_id.clone())
        .caller(&caller)
        .action(action)
        .method(method.as_str())
        .path(path.clone());
    let open = match (&query, body_bytes.is_empty()) {
        (Some(query), true) => open.query(query.clone()),
        (Some(query), false) => open
            .query(query.clone())
            .request_body(capture(&body_bytes, capture_limit)),
        (None, false) => open.request_body(capture(&body_bytes, capture_limit)),
        (None, true) => open,
    };
    let record = state
        .provider
        .get_audit_provider()
        .open(&state, open.build().map_err(crate::audit::error::AuditProviderError::from)?)
        .await?;
    let guard = AuditGuard::new(state.clone(), record.id.clone());

    // Credential resolution. The record is already open, so a missing
    // credential closes it as `rejected` instead of producing a second row.
    let credential = match state
        .provider
        .get_credential_provider()
        .get_credential(&state, &actor.organization_id)
        .await
    {
        Ok(credential) => credential,
        Err(error @ CredentialProviderError::NotConfigured(..)) => {
            let close = AuditClose::rejected(error.to_string(), guard.elapsed_ms());
            let id = guard.disarm();
            state
                .provider
                .get_audit_provider()
                .close(&state, &id, close)
                .await?;
            return Err(error.into());
        }
        Err(error) => return Err(error.into()),
    };

    let forward_request = ForwardRequest {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        content_type: header_str(&headers, header::CONTENT_TYPE.as_str()).map(str::to_string),
        body: (!body_bytes.is_empty()).then(|| body_bytes.to_vec()),
        credential,
    };

    let upstream_response = match state
        .provider
        .get_upstream_client()
        .forward(&state, forward_request)
        .await
    {
        Ok(response) => response,
        Err(
            error @ (UpstreamClientError::Unavailable { .. }
            | UpstreamClientError::Timeout { .. }
            | UpstreamClientError::Transport { .. }),
        ) => {
            let close = AuditClose::failure(None, None, guard.elapsed_ms());
            let id = guard.disarm();
            state
                .provider
                .get_audit_provider()
                .close(&state, &id, close)
                .await?;
            return Err(error.into());
        }
        Err(error) => return Err(error.into()),
    };

    let duration_ms = guard.elapsed_ms();
    let id = guard.disarm();
    let response_capture = capture(&upstream_response.body, capture_limit);
    let close = if upstream_response.is_success() {
        AuditClose::success(upstream_response.status, response_capture, duration_ms)
    } else {
        AuditClose::failure(
            Some(upstream_response.status),
            response_capture,
            duration_ms,
        )
    };
    // The upstream exchange already happened; a failed close must not turn
    // it into an error answer.
    if let Err(error) = state
        .provider
        .get_audit_provider()
        .close(&state, &id, close)
        .await
    {
        tracing::error!(audit_id = %id, %error, "failed to close the audit record");
    }

    if upstream_response.is_success() {
        let input = SyncInput {
            organization_id: actor.organization_id.clone(),
            kind: classification.kind,
            item: classification.item.clone(),
            method: method.clone(),
            response_body: serde_json::from_slice(&upstream_response.body).ok(),
        };
        if let Err(error) = state.provider.get_sync_provider().apply(&state, input).await {
            tracing::warn!(
                organization_id = %actor.organization_id,
                kind = %classification.kind,
                %error,
                "sync of the upstream exchange failed"
            );
        }
    }

    passthrough(upstream_response)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Lossy UTF-8 capture of a body, truncated to the configured limit.
fn capture(body: &[u8], limit: usize) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let slice = &body[..body.len().min(limit)];
    Some(String::from_utf8_lossy(slice).into_owned())
}

fn passthrough(
    upstream: crate::upstream::types::UpstreamResponse,
) -> Result<Response, GatewayApiError> {
    let status = StatusCode::from_u16(upstream.status)
        .map_err(|_| GatewayApiError::InternalError("invalid upstream status code".into()))?;
    let mut builder = Response::builder().status(status);
    for (name, value) in upstream.headers.iter() {
        if !SKIPPED_RESPONSE_HEADERS.contains(name) {
            builder = builder.header(name, value);
        }
    }
    Ok(builder.body(Body::from(upstream.body))?)
}
