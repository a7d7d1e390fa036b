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

//! Shared setup for the end-to-end suites: an in-memory sqlite database
//! with the real migrations applied, seeded API keys and one upstream
//! credential, wired into a real provider stack.

use chrono::Utc;
use eyre::Report;
use sea_orm::{ConnectOptions, Database, DbConn, entity::*};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

use dirgate::actor::secret_digest;
use dirgate::config::Config;
use dirgate::db::entity::prelude::ApiKey;
use dirgate::db::entity::{api_key, upstream_credential};
use dirgate::db_migration::Migrator;
use dirgate::gateway::{Service, ServiceState};
use dirgate::provider::Provider;

pub const USER_KEY_SECRET: &str = "user-key-secret";
pub const VENDOR_KEY_SECRET: &str = "vendor-key-secret";
pub const DISABLED_KEY_SECRET: &str = "disabled-key-secret";

async fn setup_data(db: &DbConn) -> Result<(), Report> {
    let now = Utc::now().naive_utc();

    ApiKey::insert_many([
        api_key::ActiveModel {
            id: Set("key_user".into()),
            organization_id: Set("org_a".into()),
            kind: Set("user".into()),
            name: Set("Jo Dev".into()),
            email: Set("jo@org-a.example".into()),
            secret_hash: Set(secret_digest(USER_KEY_SECRET)),
            enabled: Set(true),
            created_at: Set(now),
        },
        api_key::ActiveModel {
            id: Set("key_vendor".into()),
            organization_id: Set("org_a".into()),
            kind: Set("vendor".into()),
            name: Set("Acme Support".into()),
            email: Set("support@acme.example".into()),
            secret_hash: Set(secret_digest(VENDOR_KEY_SECRET)),
            enabled: Set(true),
            created_at: Set(now),
        },
        api_key::ActiveModel {
            id: Set("key_disabled".into()),
            organization_id: Set("org_a".into()),
            kind: Set("user".into()),
            name: Set("Old Key".into()),
            email: Set("old@org-a.example".into()),
            secret_hash: Set(secret_digest(DISABLED_KEY_SECRET)),
            enabled: Set(false),
            created_at: Set(now),
        },
    ])
    .exec(db)
    .await?;

    upstream_credential::ActiveModel {
        organization_id: Set("org_a".into()),
        delegated_subject: Set("admin@org-a.example".into()),
        secret: Set("delegated-oauth-token".into()),
        api_base: Set(None),
        enabled: Set(true),
        created_at: Set(now),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;

    // A disabled integration behaves like a missing one.
    upstream_credential::ActiveModel {
        organization_id: Set("org_b".into()),
        delegated_subject: Set("admin@org-b.example".into()),
        secret: Set("revoked-token".into()),
        api_base: Set(None),
        enabled: Set(false),
        created_at: Set(now),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;

    Ok(())
}

pub async fn get_state() -> Result<ServiceState, Report> {
    let opt: ConnectOptions = ConnectOptions::new("sqlite::memory:")
        .sqlx_logging(false)
        .to_owned();
    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;
    setup_data(&db).await?;

    let cfg = Config::default();
    let provider = Provider::new(cfg.clone())?;
    Ok(Arc::new(Service::new(cfg, db, provider)?))
}
