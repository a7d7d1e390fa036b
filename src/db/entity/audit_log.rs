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

use sea_orm::entity::prelude::*;

/// One row per inbound request that reached the dispatcher.
///
/// Rows are opened as `pending`, closed exactly once and never touched
/// afterwards. There is no delete path for this table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub organization_id: String,
    pub actor_id: String,
    pub actor_type: String,
    pub actor_name: String,
    pub actor_email: String,
    pub operator_name: Option<String>,
    pub operator_email: Option<String>,
    pub action: String,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub request_body: Option<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub upstream_status: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub response_body: Option<String>,
    pub duration_ms: Option<i64>,
    pub opened_at: DateTime,
    pub closed_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
