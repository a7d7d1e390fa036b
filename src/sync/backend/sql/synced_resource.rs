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
use sea_orm::sea_query::{Expr, OnConflict};

use crate::sync::backend::error::{SyncDatabaseError, db_err};
use crate::sync::types::SyncedResourceListParameters;
use crate::db::entity::{prelude::SyncedResource, synced_resource as db_synced_resource};

/// Insert-or-update on the natural key. A conflicting row is refreshed and
/// revived in the same statement, so the mirror write is a single atomic
/// operation per batch.
pub async fn upsert_many(
    db: &DatabaseConnection,
    resources: Vec<db_synced_resource::ActiveModel>,
) -> Result<u64, SyncDatabaseError> {
    if resources.is_empty() {
        return Ok(0);
    }
    let count = resources.len() as u64;
    SyncedResource::insert_many(resources)
        .on_conflict(
            OnConflict::columns([
                db_synced_resource::Column::OrganizationId,
                db_synced_resource::Column::Kind,
                db_synced_resource::Column::ExternalId,
            ])
            .update_columns([
                db_synced_resource::Column::DisplayName,
                db_synced_resource::Column::Email,
                db_synced_resource::Column::Payload,
                db_synced_resource::Column::LastSyncAt,
                db_synced_resource::Column::IsActive,
                db_synced_resource::Column::DeletedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(|err| db_err(err, "upserting mirrored resources"))?;
    Ok(count)
}

/// Mark active rows matching the identifier as deleted. The identifier is
/// tried against the external id first; callers often only know the email
/// (delete-by-address paths), so a second pass matches the email column
/// when the first found nothing.
pub async fn soft_delete(
    db: &DatabaseConnection,
    organization_id: &str,
    kind: &str,
    identifier: &str,
    deleted_at: NaiveDateTime,
) -> Result<u64, SyncDatabaseError> {
    let by_external_id = mark_deleted(
        db,
        organization_id,
        kind,
        db_synced_resource::Column::ExternalId,
        identifier,
        deleted_at,
    )
    .await?;
    if by_external_id > 0 {
        return Ok(by_external_id);
    }
    mark_deleted(
        db,
        organization_id,
        kind,
        db_synced_resource::Column::Email,
        identifier,
        deleted_at,
    )
    .await
}

async fn mark_deleted(
    db: &DatabaseConnection,
    organization_id: &str,
    kind: &str,
    key_column: db_synced_resource::Column,
    identifier: &str,
    deleted_at: NaiveDateTime,
) -> Result<u64, SyncDatabaseError> {
    let result = SyncedResource::update_many()
        .col_expr(db_synced_resource::Column::IsActive, Expr::value(false))
        .col_expr(
            db_synced_resource::Column::DeletedAt,
            Expr::value(deleted_at),
        )
        .col_expr(
            db_synced_resource::Column::LastSyncAt,
            Expr::value(deleted_at),
        )
        .filter(db_synced_resource::Column::OrganizationId.eq(organization_id))
        .filter(db_synced_resource::Column::Kind.eq(kind))
        .filter(db_synced_resource::Column::IsActive.eq(true))
        .filter(key_column.eq(identifier))
        .exec(db)
        .await
        .map_err(|err| db_err(err, "soft deleting a mirrored resource"))?;
    Ok(result.rows_affected)
}

pub async fn list(
    db: &DatabaseConnection,
    params: &SyncedResourceListParameters,
) -> Result<Vec<db_synced_resource::Model>, SyncDatabaseError> {
    let mut select = SyncedResource::find()
        .order_by_asc(db_synced_resource::Column::Kind)
        .order_by_asc(db_synced_resource::Column::ExternalId);
    if let Some(organization_id) = &params.organization_id {
        select = select.filter(db_synced_resource::Column::OrganizationId.eq(organization_id));
    }
    if let Some(kind) = &params.kind {
        select = select.filter(db_synced_resource::Column::Kind.eq(kind.as_str()));
    }
    if !params.include_deleted {
        select = select.filter(db_synced_resource::Column::IsActive.eq(true));
    }
    if let Some(limit) = params.limit {
        select = select.limit(limit);
    }
    select
        .all(db)
        .await
        .map_err(|err| db_err(err, "listing mirrored resources"))
}
