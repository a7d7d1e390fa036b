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

use crate::actor::backend::error::{ActorDatabaseError, db_err};
use crate::db::entity::{api_key as db_api_key, prelude::ApiKey};

pub async fn get_by_secret_hash(
    db: &DatabaseConnection,
    secret_hash: &str,
) -> Result<Option<db_api_key::Model>, ActorDatabaseError> {
    ApiKey::find()
        .filter(db_api_key::Column::SecretHash.eq(secret_hash))
        .filter(db_api_key::Column::Enabled.eq(true))
        .one(db)
        .await
        .map_err(|err| db_err(err, "looking up the api key"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn get_api_key_mock(id: &str) -> db_api_key::Model {
        db_api_key::Model {
            id: id.into(),
            organization_id: "org".into(),
            kind: "vendor".into(),
            name: "Acme Support".into(),
            email: "support@acme.example".into(),
            secret_hash: "hash".into(),
            enabled: true,
            created_at: NaiveDateTime::default(),
        }
    }

    #[tokio::test]
    async fn test_get_by_secret_hash() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![get_api_key_mock("key1")]])
            .into_connection();

        assert_eq!(
            get_by_secret_hash(&db, "hash").await.unwrap(),
            Some(get_api_key_mock("key1"))
        );
    }

    #[tokio::test]
    async fn test_get_by_secret_hash_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<db_api_key::Model>::new()])
            .into_connection();

        assert_eq!(get_by_secret_hash(&db, "nope").await.unwrap(), None);
    }
}
