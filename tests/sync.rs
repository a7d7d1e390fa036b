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

mod common;

use eyre::Report;
use serde_json::json;
use tracing_test::traced_test;

use dirgate::classify::ResourceKind;
use dirgate::gateway::ServiceState;
use dirgate::sync::SyncApi;
use dirgate::sync::types::{SyncInput, SyncOutcome, SyncedResourceListParameters};

async fn seed_users(state: &ServiceState) -> Result<(), Report> {
    let outcome = state
        .provider
        .get_sync_provider()
        .apply(
            state,
            SyncInput::builder()
                .organization_id("org_a")
                .kind(ResourceKind::User)
                .method(http::Method::GET)
                .response_body(json!({
                    "users": [
                        {"id": "u1", "primaryEmail": "ann@org-a.example",
                         "name": {"fullName": "Ann"}},
                        {"id": "u2", "primaryEmail": "bob@org-a.example",
                         "name": {"fullName": "Bob"}}
                    ]
                }))
                .build()?,
        )
        .await?;
    assert_eq!(outcome, SyncOutcome::Upserted(2));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_list_response_populates_the_mirror() -> Result<(), Report> {
    let state = common::get_state().await?;
    seed_users(&state).await?;

    let resources = state
        .provider
        .get_sync_provider()
        .list(
            &state,
            &SyncedResourceListParameters {
                organization_id: Some("org_a".into()),
                kind: Some(ResourceKind::User),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].external_id, "u1");
    assert_eq!(resources[0].display_name.as_deref(), Some("Ann"));
    assert_eq!(resources[0].email.as_deref(), Some("ann@org-a.example"));
    assert!(resources[0].is_active);
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_replaying_the_same_payload_is_idempotent() -> Result<(), Report> {
    let state = common::get_state().await?;
    let sync = state.provider.get_sync_provider();
    let params = SyncedResourceListParameters {
        organization_id: Some("org_a".into()),
        include_deleted: true,
        ..Default::default()
    };

    seed_users(&state).await?;
    let before = sync.list(&state, &params).await?;
    assert_eq!(before.len(), 2);

    // The exact same list response observed a second time.
    seed_users(&state).await?;
    let after = sync.list(&state, &params).await?;

    assert_eq!(after.len(), before.len());
    for (before, after) in before.iter().zip(after.iter()) {
        assert_eq!(after.id, before.id);
        assert_eq!(after.external_id, before.external_id);
        assert_eq!(after.display_name, before.display_name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.payload, before.payload);
        assert_eq!(after.is_active, before.is_active);
        assert_eq!(after.deleted_at, before.deleted_at);
        assert_eq!(after.created_at, before.created_at);
    }
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_upsert_updates_in_place() -> Result<(), Report> {
    let state = common::get_state().await?;
    seed_users(&state).await?;
    let sync = state.provider.get_sync_provider();

    // A later single-resource response for u1 with a changed name.
    let outcome = sync
        .apply(
            &state,
            SyncInput::builder()
                .organization_id("org_a")
                .kind(ResourceKind::User)
                .item("u1")
                .method(http::Method::PUT)
                .response_body(json!({
                    "id": "u1", "primaryEmail": "ann@org-a.example",
                    "name": {"fullName": "Ann Smith"}
                }))
                .build()?,
        )
        .await?;
    assert_eq!(outcome, SyncOutcome::Upserted(1));

    let resources = sync
        .list(
            &state,
            &SyncedResourceListParameters {
                organization_id: Some("org_a".into()),
                ..Default::default()
            },
        )
        .await?;
    // Updated on the natural key, not duplicated.
    assert_eq!(resources.len(), 2);
    let u1 = resources
        .iter()
        .find(|res| res.external_id == "u1")
        .unwrap();
    assert_eq!(u1.display_name.as_deref(), Some("Ann Smith"));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_soft_delete_and_revival() -> Result<(), Report> {
    let state = common::get_state().await?;
    seed_users(&state).await?;
    let sync = state.provider.get_sync_provider();

    let outcome = sync
        .apply(
            &state,
            SyncInput::builder()
                .organization_id("org_a")
                .kind(ResourceKind::User)
                .item("u1")
                .method(http::Method::DELETE)
                .build()?,
        )
        .await?;
    assert_eq!(outcome, SyncOutcome::Deleted(1));

    let active = sync
        .list(
            &state,
            &SyncedResourceListParameters {
                organization_id: Some("org_a".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].external_id, "u2");

    let all = sync
        .list(
            &state,
            &SyncedResourceListParameters {
                organization_id: Some("org_a".into()),
                include_deleted: true,
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(all.len(), 2);
    let deleted = all.iter().find(|res| res.external_id == "u1").unwrap();
    assert!(!deleted.is_active);
    assert!(deleted.deleted_at.is_some());

    // Seeing the resource again revives the row.
    sync.apply(
        &state,
        SyncInput::builder()
            .organization_id("org_a")
            .kind(ResourceKind::User)
            .item("u1")
            .method(http::Method::GET)
            .response_body(json!({
                "id": "u1", "primaryEmail": "ann@org-a.example",
                "name": {"fullName": "Ann"}
            }))
            .build()?,
    )
    .await?;

    let revived = sync
        .list(
            &state,
            &SyncedResourceListParameters {
                organization_id: Some("org_a".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(revived.len(), 2);
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_soft_delete_falls_back_to_email() -> Result<(), Report> {
    let state = common::get_state().await?;
    seed_users(&state).await?;
    let sync = state.provider.get_sync_provider();

    // The caller addressed the user by email rather than by id.
    let outcome = sync
        .apply(
            &state,
            SyncInput::builder()
                .organization_id("org_a")
                .kind(ResourceKind::User)
                .item("bob@org-a.example")
                .method(http::Method::DELETE)
                .build()?,
        )
        .await?;
    assert_eq!(outcome, SyncOutcome::Deleted(1));

    let active = sync
        .list(
            &state,
            &SyncedResourceListParameters {
                organization_id: Some("org_a".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].external_id, "u1");
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_delete_of_unknown_resource_is_a_noop() -> Result<(), Report> {
    let state = common::get_state().await?;
    seed_users(&state).await?;

    let outcome = state
        .provider
        .get_sync_provider()
        .apply(
            &state,
            SyncInput::builder()
                .organization_id("org_a")
                .kind(ResourceKind::User)
                .item("nobody@org-a.example")
                .method(http::Method::DELETE)
                .build()?,
        )
        .await?;
    assert_eq!(outcome, SyncOutcome::Deleted(0));
    Ok(())
}
