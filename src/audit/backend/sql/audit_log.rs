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

use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use sea_orm::entity::*;
use sea_orm::query::*;
use sea_orm::sea_query::Expr;

use crate::audit::backend::error::{AuditDatabaseError, db_err};
use crate::audit::types::{AuditClose, AuditOutcome, AuditRecordListParameters};
use crate::db::entity::{audit_log as db_audit_log, prelude::AuditLog};

pub async fn create(
    db: &DatabaseConnection,
    record: db_audit_log::ActiveModel,
) -> Result<(), AuditDatabaseError> {
    AuditLog::insert(record)
        .exec_without_returning(db)
        .await
        .map_err(|err| db_err(err, "persisting the audit record"))?;
    Ok(())
}

/// Close a `pending` record. The status filter makes the close a no-op on
/// records that are already closed; the returned row count tells the caller
/// which case it hit.
pub async fn close(
    db: &DatabaseConnection,
    id: &str,
    close: &AuditClose,
    closed_at: NaiveDateTime,
) -> Result<u64, AuditDatabaseError> {
    let result = AuditLog::update_many()
        .col_expr(
            db_audit_log::Column::Status,
            Expr::value(close.outcome.as_str()),
        )
        .col_expr(
            db_audit_log::Column::RejectionReason,
            Expr::value(close.rejection_reason.clone()),
        )
        .col_expr(
            db_audit_log::Column::UpstreamStatus,
            Expr::value(close.upstream_status.map(i32::from)),
        )
        .col_expr(
            db_audit_log::Column::ResponseBody,
            Expr::value(close.response_body.clone()),
        )
        .col_expr(
            db_audit_log::Column::DurationMs,
            Expr::value(close.duration_ms),
        )
        .col_expr(db_audit_log::Column::ClosedAt, Expr::value(closed_at))
        .filter(db_audit_log::Column::Id.eq(id))
        .filter(db_audit_log::Column::Status.eq(AuditOutcome::Pending.as_str()))
        .exec(db)
        .await
        .map_err(|err| db_err(err, "closing the audit record"))?;
    Ok(result.rows_affected)
}

pub async fn list(
    db: &DatabaseConnection,
    params: &AuditRecordListParameters,
) -> Result<Vec<db_audit_log::Model>, AuditDatabaseError> {
    let mut select = AuditLog::find().order_by_desc(db_audit_log::Column::OpenedAt);
    if let Some(organization_id) = &params.organization_id {
        select = select.filter(db_audit_log::Column::OrganizationId.eq(organization_id));
    }
    if let Some(actor_id) = &params.actor_id {
        select = select.filter(db_audit_log::Column::ActorId.eq(actor_id));
    }
    if let Some(status) = &params.status {
        select = select.filter(db_audit_log::Column::Status.eq(status.as_str()));
    }
    if let Some(opened_after) = &params.opened_after {
        select = select.filter(db_audit_log::Column::OpenedAt.gte(*opened_after));
    }
    if let Some(opened_before) = &params.opened_before {
        select = select.filter(db_audit_log::Column::OpenedAt.lt(*opened_before));
    }
    if let Some(limit) = params.limit {
        select = select.limit(limit);
    }
    select
        .all(db)
        .await
        .map_err(|err| db_err(err, "listing audit records"))
}

pub async fn get(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<db_audit_log::Model>, AuditDatabaseError> {
    AuditLog::find_by_id(id)
        .one(db)
        .await
        .map_err(|err| db_err(err, "fetching the audit record"))
}
