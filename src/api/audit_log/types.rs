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
//! Audit log API types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::audit::types::AuditRecord;

/// A single audit trail entry.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, ToSchema)]
pub struct AuditLog {
    /// Record id.
    pub id: String,

    /// Organization the calling key belongs to.
    pub organization_id: String,

    /// Id of the key the request authenticated with.
    pub actor_id: String,

    /// Kind of the calling key (`user`, `service` or `vendor`).
    pub actor_type: String,

    /// Display name of the caller.
    pub actor_name: String,

    /// Contact email of the caller.
    pub actor_email: String,

    /// Operator name supplied by a vendor caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,

    /// Operator email supplied by a vendor caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_email: Option<String>,

    /// Derived action label, `<kind>:<verb>`.
    pub action: String,

    /// HTTP method of the request.
    pub method: String,

    /// Upstream path of the request.
    pub path: String,

    /// Raw query string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Captured request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,

    /// Lifecycle state (`pending`, `success`, `failure` or `rejected`).
    pub status: String,

    /// Why the request was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// Status code the upstream answered with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,

    /// Captured (possibly truncated) upstream response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,

    /// Wall time between open and close, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,

    /// When the record was opened.
    pub opened_at: NaiveDateTime,

    /// When the record was closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<NaiveDateTime>,
}

impl From<AuditRecord> for AuditLog {
    fn from(value: AuditRecord) -> Self {
        Self {
            id: value.id,
            organization_id: value.organization_id,
            actor_id: value.actor_id,
            actor_type: value.actor_type.as_str().to_string(),
            actor_name: value.actor_name,
            actor_email: value.actor_email,
            operator_name: value.operator_name,
            operator_email: value.operator_email,
            action: value.action,
            method: value.method,
            path: value.path,
            query: value.query,
            request_body: value.request_body,
            status: value.status.as_str().to_string(),
            rejection_reason: value.rejection_reason,
            upstream_status: value.upstream_status,
            response_body: value.response_body,
            duration_ms: value.duration_ms,
            opened_at: value.opened_at,
            closed_at: value.closed_at,
        }
    }
}

impl IntoResponse for AuditLog {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// A list of audit trail entries.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, ToSchema)]
pub struct AuditLogList {
    /// Audit records, newest first.
    pub audit_logs: Vec<AuditLog>,
}

impl IntoResponse for AuditLogList {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Query parameters of the audit log list.
#[derive(Clone, Debug, Default, Deserialize, Eq, IntoParams, PartialEq, Serialize)]
pub struct AuditLogListParameters {
    /// Restrict to one organization.
    pub organization_id: Option<String>,

    /// Restrict to one calling key.
    pub actor_id: Option<String>,

    /// Restrict to one lifecycle state.
    pub status: Option<String>,

    /// Only records opened at or after this point.
    pub opened_after: Option<NaiveDateTime>,

    /// Only records opened before this point.
    pub opened_before: Option<NaiveDateTime>,

    /// Cap on the number of returned records.
    pub limit: Option<u64>,
}
