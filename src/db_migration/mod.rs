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

use sea_orm_migration::prelude::*;

mod m20251101_000001_create_audit_log;
mod m20251101_000002_create_synced_resource;
mod m20251101_000003_create_api_key;
mod m20251101_000004_create_upstream_credential;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_create_audit_log::Migration),
            Box::new(m20251101_000002_create_synced_resource::Migration),
            Box::new(m20251101_000003_create_api_key::Migration),
            Box::new(m20251101_000004_create_upstream_credential::Migration),
        ]
    }
}
