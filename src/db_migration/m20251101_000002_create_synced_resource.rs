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
                    .table(SyncedResource::Table)
                    .if_not_exists()
                    .col(pk_auto(SyncedResource::Id))
                    .col(string_len(SyncedResource::OrganizationId, 64))
                    .col(string_len(SyncedResource::Kind, 16))
                    .col(string_len(SyncedResource::ExternalId, 255))
                    .col(string_len_null(SyncedResource::DisplayName, 255))
                    .col(string_len_null(SyncedResource::Email, 255))
                    .col(json(SyncedResource::Payload))
                    .col(date_time(SyncedResource::LastSyncAt))
                    .col(boolean(SyncedResource::IsActive))
                    .col(date_time_null(SyncedResource::DeletedAt))
                    .col(date_time(SyncedResource::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Natural key the sync upserts conflict on.
        manager
            .create_index(
                Index::create()
                    .name("uniq-synced_resource-org-kind-external")
                    .table(SyncedResource::Table)
                    .col(SyncedResource::OrganizationId)
                    .col(SyncedResource::Kind)
                    .col(SyncedResource::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-synced_resource-org-kind")
                    .table(SyncedResource::Table)
                    .col(SyncedResource::OrganizationId)
                    .col(SyncedResource::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncedResource::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SyncedResource {
    Table,
    Id,
    OrganizationId,
    Kind,
    ExternalId,
    DisplayName,
    Email,
    Payload,
    LastSyncAt,
    IsActive,
    DeletedAt,
    CreatedAt,
}
