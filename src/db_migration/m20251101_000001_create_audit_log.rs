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

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(string_len(AuditLog::Id, 32).primary_key())
                    .col(string_len(AuditLog::OrganizationId, 64))
                    .col(string_len(AuditLog::ActorId, 64))
                    .col(string_len(AuditLog::ActorType, 16))
                    .col(string_len(AuditLog::ActorName, 255))
                    .col(string_len(AuditLog::ActorEmail, 255))
                    .col(string_len_null(AuditLog::OperatorName, 255))
                    .col(string_len_null(AuditLog::OperatorEmail, 255))
                    .col(string_len(AuditLog::Action, 64))
                    .col(string_len(AuditLog::Method, 10))
                    .col(string_len(AuditLog::Path, 1024))
                    .col(string_len_null(AuditLog::Query, 1024))
                    .col(text_null(AuditLog::RequestBody))
                    .col(string_len(AuditLog::Status, 10))
                    .col(string_len_null(AuditLog::RejectionReason, 255))
                    .col(integer_null(AuditLog::UpstreamStatus))
                    .col(text_null(AuditLog::ResponseBody))
                    .col(big_integer_null(AuditLog::DurationMs))
                    .col(date_time(AuditLog::OpenedAt))
                    .col(date_time_null(AuditLog::ClosedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-audit_log-org-opened")
                    .table(AuditLog::Table)
                    .col(AuditLog::OrganizationId)
                    .col(AuditLog::OpenedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-audit_log-actor")
                    .table(AuditLog::Table)
                    .col(AuditLog::ActorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLog::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AuditLog {
    Table,
    Id,
    OrganizationId,
    ActorId,
    ActorType,
    ActorName,
    ActorEmail,
    OperatorName,
    OperatorEmail,
    Action,
    Method,
    Path,
    Query,
    RequestBody,
    Status,
    RejectionReason,
    UpstreamStatus,
    ResponseBody,
    DurationMs,
    OpenedAt,
    ClosedAt,
}
