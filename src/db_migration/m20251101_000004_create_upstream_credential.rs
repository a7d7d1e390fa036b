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
                    .table(UpstreamCredential::Table)
                    .if_not_exists()
                    .col(string_len(UpstreamCredential::OrganizationId, 64).primary_key())
                    .col(string_len(UpstreamCredential::DelegatedSubject, 255))
                    .col(text(UpstreamCredential::Secret))
                    .col(string_len_null(UpstreamCredential::ApiBase, 1024))
                    .col(boolean(UpstreamCredential::Enabled))
                    .col(date_time(UpstreamCredential::CreatedAt))
                    .col(date_time_null(UpstreamCredential::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UpstreamCredential::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum UpstreamCredential {
    Table,
    OrganizationId,
    DelegatedSubject,
    Secret,
    ApiBase,
    Enabled,
    CreatedAt,
    UpdatedAt,
}
