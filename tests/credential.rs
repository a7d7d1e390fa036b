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
use sea_orm::entity::*;
use sea_orm::query::*;
use secrecy::ExposeSecret;
use tracing_test::traced_test;

use dirgate::credential::CredentialApi;
use dirgate::credential::error::CredentialProviderError;
use dirgate::db::entity::{prelude::UpstreamCredential, upstream_credential};

#[tokio::test]
#[traced_test]
async fn test_resolve_credential() -> Result<(), Report> {
    let state = common::get_state().await?;

    let credential = state
        .provider
        .get_credential_provider()
        .get_credential(&state, "org_a")
        .await?;
    assert_eq!(credential.organization_id, "org_a");
    assert_eq!(credential.delegated_subject, "admin@org-a.example");
    assert_eq!(credential.secret.expose_secret(), "delegated-oauth-token");
    assert!(credential.api_base.is_none());

    // The secret never shows up in debug output.
    assert!(!format!("{credential:?}").contains("delegated-oauth-token"));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_unknown_organization_is_not_configured() -> Result<(), Report> {
    let state = common::get_state().await?;

    assert!(matches!(
        state
            .provider
            .get_credential_provider()
            .get_credential(&state, "org_without_integration")
            .await,
        Err(CredentialProviderError::NotConfigured(_))
    ));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_disabled_credential_is_not_configured() -> Result<(), Report> {
    let state = common::get_state().await?;

    assert!(matches!(
        state
            .provider
            .get_credential_provider()
            .get_credential(&state, "org_b")
            .await,
        Err(CredentialProviderError::NotConfigured(_))
    ));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_credential_is_served_from_cache() -> Result<(), Report> {
    let state = common::get_state().await?;
    let provider = state.provider.get_credential_provider();

    provider.get_credential(&state, "org_a").await?;

    // Disable the row under the cache. Within the TTL the provider must
    // keep answering from the cached entry.
    UpstreamCredential::update_many()
        .col_expr(
            upstream_credential::Column::Enabled,
            sea_orm::sea_query::Expr::value(false),
        )
        .filter(upstream_credential::Column::OrganizationId.eq("org_a"))
        .exec(&state.db)
        .await?;

    let credential = provider.get_credential(&state, "org_a").await?;
    assert_eq!(credential.secret.expose_secret(), "delegated-oauth-token");
    Ok(())
}
