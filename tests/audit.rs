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
use tracing_test::traced_test;

use dirgate::audit::AuditApi;
use dirgate::audit::error::AuditProviderError;
use dirgate::audit::types::{
    AuditClose, AuditOpen, AuditOutcome, AuditRecordListParameters, AuditRejection,
};

fn open_input(organization_id: &str, action: &str) -> AuditOpen {
    AuditOpen::builder()
        .organization_id(organization_id)
        .actor_id("key_user")
        .actor_name("Jo Dev")
        .actor_email("jo@org-a.example")
        .action(action)
        .method("GET")
        .path("users/jo@org-a.example")
        .build()
        .unwrap()
}

#[tokio::test]
#[traced_test]
async fn test_open_creates_pending_record() -> Result<(), Report> {
    let state = common::get_state().await?;
    let audit = state.provider.get_audit_provider();

    let record = audit.open(&state, open_input("org_a", "user:get")).await?;
    assert!(!record.id.is_empty());
    assert_eq!(record.status, AuditOutcome::Pending);
    assert!(record.closed_at.is_none());

    let fetched = audit.get(&state, &record.id).await?.unwrap();
    assert_eq!(fetched.action, "user:get");
    assert_eq!(fetched.status, AuditOutcome::Pending);
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_close_happens_exactly_once() -> Result<(), Report> {
    let state = common::get_state().await?;
    let audit = state.provider.get_audit_provider();

    let record = audit.open(&state, open_input("org_a", "user:get")).await?;
    audit
        .close(
            &state,
            &record.id,
            AuditClose::success(200, Some("{}".into()), 12),
        )
        .await?;

    let closed = audit.get(&state, &record.id).await?.unwrap();
    assert_eq!(closed.status, AuditOutcome::Success);
    assert_eq!(closed.upstream_status, Some(200));
    assert_eq!(closed.duration_ms, Some(12));
    assert!(closed.closed_at.is_some());

    // The second close must not rewrite the outcome.
    assert!(matches!(
        audit
            .close(&state, &record.id, AuditClose::failure(Some(500), None, 40))
            .await,
        Err(AuditProviderError::AlreadyClosed(_))
    ));
    let unchanged = audit.get(&state, &record.id).await?.unwrap();
    assert_eq!(unchanged.status, AuditOutcome::Success);
    assert_eq!(unchanged.upstream_status, Some(200));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_rejection_record_is_born_closed() -> Result<(), Report> {
    let state = common::get_state().await?;
    let audit = state.provider.get_audit_provider();

    let record = audit
        .record_rejection(
            &state,
            AuditRejection::builder()
                .organization_id("org_a")
                .actor_id("key_vendor")
                .actor_name("Acme Support")
                .actor_email("support@acme.example")
                .action("user:list")
                .method("GET")
                .path("users")
                .reason("vendor call without operator attribution")
                .build()?,
        )
        .await?;

    assert_eq!(record.status, AuditOutcome::Rejected);
    assert_eq!(
        record.rejection_reason.as_deref(),
        Some("vendor call without operator attribution")
    );
    assert!(record.closed_at.is_some());

    // Born closed means it cannot be closed again.
    assert!(matches!(
        audit
            .close(&state, &record.id, AuditClose::success(200, None, 1))
            .await,
        Err(AuditProviderError::AlreadyClosed(_))
    ));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_list_filters() -> Result<(), Report> {
    let state = common::get_state().await?;
    let audit = state.provider.get_audit_provider();

    let first = audit.open(&state, open_input("org_a", "user:get")).await?;
    audit.open(&state, open_input("org_a", "group:list")).await?;
    audit.open(&state, open_input("org_b", "user:list")).await?;
    audit
        .close(&state, &first.id, AuditClose::success(200, None, 5))
        .await?;

    let org_a = audit
        .list(
            &state,
            &AuditRecordListParameters {
                organization_id: Some("org_a".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(org_a.len(), 2);

    let pending = audit
        .list(
            &state,
            &AuditRecordListParameters {
                organization_id: Some("org_a".into()),
                status: Some(AuditOutcome::Pending),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].action, "group:list");
    Ok(())
}
