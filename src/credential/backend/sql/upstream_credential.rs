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

use sea_orm::DatabaseConnection;
use sea_orm::entity::*;
use sea_orm::query::*;

use crate::credential::backend::error::{CredentialDatabaseError, db_err};
use crate::db::entity::{prelude::UpstreamCredential, upstream_credential as db_upstream_credential};

pub async fn get_by_organization(
    db: &DatabaseConnection,
    organization_id: &str,
) -> Result<Option<db_upstream_credential::Model>, CredentialDatabaseError> {
    UpstreamCredential::find_by_id(organization_id)
        .filter(db_upstream_credential::Column::Enabled.eq(true))
        .one(db)
        .await
        .map_err(|err| db_err(err, "fetching the organization upstream credential"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn get_credential_mock(org: &str) -> db_upstream_credential::Model {
        db_upstream_credential::Model {
            organization_id: org.into(),
            delegated_subject: "admin@org.example".into(),
            secret: "s3cr3t".into(),
            api_base: None,
            enabled: true,
            created_at: NaiveDateTime::default(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_organization() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![get_credential_mock("org")]])
            .into_connection();

        assert_eq!(
            get_by_organization(&db, "org").await.unwrap(),
            Some(get_credential_mock("org"))
        );
    }

    #[tokio::test]
    async fn test_get_by_organization_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<db_upstream_credential::Model>::new()])
            .into_connection();

        assert_eq!(get_by_organization(&db, "none").await.unwrap(), None);
    }
}
