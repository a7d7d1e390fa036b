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
//! Audit log: list

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::api::auth::Auth;
use crate::api::error::GatewayApiError;
use crate::api::audit_log::types::*;
use crate::audit::{
    AuditApi,
    types::{AuditOutcome, AuditRecordListParameters as ProviderAuditRecordListParameters},
};
use crate::gateway::ServiceState;

/// List audit records.
///
/// Returns the audit trail newest first. All filters are optional and
/// combined with AND.
#[utoipa::path(
    get,
    path = "/",
    operation_id = "/audit_log:list",
    params(AuditLogListParameters),
    responses(
        (status = OK, description = "List of audit records.", body = AuditLogList),
        (status = 500, description = "Internal error.", example = json!(GatewayApiError::InternalError(String::from("id = 1"))))
    ),
    security(("api_key" = [])),
    tag = "audit_logs"
)]
#[tracing::instrument(
    name = "api::audit_log::list",
    level = "debug",
    skip(state, _actor),
    err(Debug)
)]
pub(super) async fn list(
    Auth(_actor): Auth,
    Query(query): Query<AuditLogListParameters>,
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, GatewayApiError> {
    let status = query
        .status
        .as_deref()
        .map(|value| {
            AuditOutcome::from_str_opt(value)
                .ok_or_else(|| GatewayApiError::BadRequest(format!("unknown status {value}")))
        })
        .transpose()?;

    let provider_list_params = ProviderAuditRecordListParameters {
        organization_id: query.organization_id,
        actor_id: query.actor_id,
        status,
        opened_after: query.opened_after,
        opened_before: query.opened_before,
        limit: query.limit,
    };

    let audit_logs: Vec<AuditLog> = state
        .provider
        .get_audit_provider()
        .list(&state, &provider_list_params)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(AuditLogList { audit_logs })
}
