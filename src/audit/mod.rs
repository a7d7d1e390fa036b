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

//! # Audit provider
//!
//! Owns the durable audit trail. A record is opened before the upstream is
//! contacted and closed exactly once; requests refused before forwarding
//! are written as already closed `rejected` records. [`AuditGuard`] covers
//! the window between open and close so an abandoned request still ends up
//! with a closed record.

use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;
use std::time::Instant;

pub mod backend;
pub mod error;
pub mod types;

use crate::audit::backend::{AuditBackend, sql::SqlBackend};
use crate::audit::error::AuditProviderError;
use crate::audit::types::{
    AuditClose, AuditOpen, AuditRecord, AuditRecordListParameters, AuditRejection,
};
use crate::config::Config;
use crate::gateway::ServiceState;

#[derive(Clone, Debug)]
pub struct AuditProvider {
    backend_driver: Box<dyn AuditBackend>,
}

#[async_trait]
pub trait AuditApi: Send + Sync + Clone {
    /// Open a `pending` record for a request about to be forwarded.
    async fn open(
        &self,
        state: &ServiceState,
        open: AuditOpen,
    ) -> Result<AuditRecord, AuditProviderError>;

    /// Close a `pending` record with its final outcome.
    async fn close<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
        close: AuditClose,
    ) -> Result<(), AuditProviderError>;

    /// Write an already closed `rejected` record.
    async fn record_rejection(
        &self,
        state: &ServiceState,
        rejection: AuditRejection,
    ) -> Result<AuditRecord, AuditProviderError>;

    /// List records matching the filters, newest first.
    async fn list(
        &self,
        state: &ServiceState,
        params: &AuditRecordListParameters,
    ) -> Result<Vec<AuditRecord>, AuditProviderError>;

    /// Fetch a single record by id.
    async fn get<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
    ) -> Result<Option<AuditRecord>, AuditProviderError>;
}

impl AuditProvider {
    pub fn new(config: &Config) -> Result<Self, AuditProviderError> {
        let mut backend_driver: Box<dyn AuditBackend> = match config.audit.driver.as_str() {
            "sql" => Box::new(SqlBackend::default()),
            other => {
                return Err(AuditProviderError::UnsupportedDriver(other.to_string()));
            }
        };
        backend_driver.set_config(config.clone());
        Ok(Self { backend_driver })
    }
}

#[async_trait]
impl AuditApi for AuditProvider {
    #[tracing::instrument(level = "debug", skip(self, state, open))]
    async fn open(
        &self,
        state: &ServiceState,
        open: AuditOpen,
    ) -> Result<AuditRecord, AuditProviderError> {
        self.backend_driver.open(state, open).await
    }

    #[tracing::instrument(level = "debug", skip(self, state, close))]
    async fn close<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
        close: AuditClose,
    ) -> Result<(), AuditProviderError> {
        self.backend_driver.close(state, id, close).await
    }

    #[tracing::instrument(level = "debug", skip(self, state, rejection))]
    async fn record_rejection(
        &self,
        state: &ServiceState,
        rejection: AuditRejection,
    ) -> Result<AuditRecord, AuditProviderError> {
        self.backend_driver.record_rejection(state, rejection).await
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn list(
        &self,
        state: &ServiceState,
        params: &AuditRecordListParameters,
    ) -> Result<Vec<AuditRecord>, AuditProviderError> {
        self.backend_driver.list(state, params).await
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn get<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
    ) -> Result<Option<AuditRecord>, AuditProviderError> {
        self.backend_driver.get(state, id).await
    }
}

/// Closes an open audit record when the request is abandoned.
///
/// The dispatcher arms the guard right after opening the record and disarms
/// it on its explicit close path. If the request future is dropped while
/// the guard is armed (client disconnect, task cancellation) the record is
/// closed as a failure from a detached task, keeping the "every opened
/// record is eventually closed" invariant.
pub struct AuditGuard {
    state: ServiceState,
    id: Option<String>,
    opened: Instant,
}

impl AuditGuard {
    pub fn new(state: ServiceState, id: String) -> Self {
        Self {
            state,
            id: Some(id),
            opened: Instant::now(),
        }
    }

    /// Milliseconds since the guard was armed.
    pub fn elapsed_ms(&self) -> i64 {
        i64::try_from(self.opened.elapsed().as_millis()).unwrap_or(i64::MAX)
    }

    /// Hand the close back to the caller.
    pub fn disarm(mut self) -> String {
        self.id.take().unwrap_or_default()
    }
}

impl Drop for AuditGuard {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            let state = self.state.clone();
            let duration_ms = self.elapsed_ms();
            tokio::spawn(async move {
                let close = AuditClose::failure(None, None, duration_ms);
                match state
                    .provider
                    .get_audit_provider()
                    .close(&state, &id, close)
                    .await
                {
                    Ok(()) => {
                        tracing::warn!(audit_id = %id, "closed abandoned audit record as failure");
                    }
                    Err(AuditProviderError::AlreadyClosed(_)) => {}
                    Err(error) => {
                        tracing::error!(audit_id = %id, %error, "failed to close abandoned audit record");
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mock! {
    pub AuditProvider {
        pub fn new(cfg: &Config) -> Result<Self, AuditProviderError>;
    }

    #[async_trait]
    impl AuditApi for AuditProvider {
        async fn open(
            &self,
            state: &ServiceState,
            open: AuditOpen,
        ) -> Result<AuditRecord, AuditProviderError>;

        async fn close<'a>(
            &self,
            state: &ServiceState,
            id: &'a str,
            close: AuditClose,
        ) -> Result<(), AuditProviderError>;

        async fn record_rejection(
            &self,
            state: &ServiceState,
            rejection: AuditRejection,
        ) -> Result<AuditRecord, AuditProviderError>;

        async fn list(
            &self,
            state: &ServiceState,
            params: &AuditRecordListParameters,
        ) -> Result<Vec<AuditRecord>, AuditProviderError>;

        async fn get<'a>(
            &self,
            state: &ServiceState,
            id: &'a str,
        ) -> Result<Option<AuditRecord>, AuditProviderError>;
    }

    impl Clone for AuditProvider {
        fn clone(&self) -> Self;
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;

    use super::*;
    use crate::audit::types::AuditOutcome;
    use crate::gateway::Service;
    use crate::provider::Provider;

    fn state_with_audit(audit_mock: MockAuditProvider) -> ServiceState {
        let provider = Provider::mocked_builder()
            .audit(audit_mock)
            .build()
            .unwrap();
        Arc::new(
            Service::new(
                Config::default(),
                DatabaseConnection::Disconnected,
                provider,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn disarmed_guard_does_not_close() {
        let mut audit_mock = MockAuditProvider::default();
        audit_mock.expect_close().never();
        let state = state_with_audit(audit_mock);

        let guard = AuditGuard::new(state.clone(), "a1".into());
        assert_eq!(guard.disarm(), "a1");
        // Give any stray close task a chance to run before expectations are
        // checked on drop.
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn dropped_guard_closes_the_record_as_failure() {
        let mut audit_mock = MockAuditProvider::default();
        audit_mock
            .expect_close()
            .withf(|_, id, close| id == "a1" && close.outcome == AuditOutcome::Failure)
            .times(1)
            .returning(|_, _, _| Ok(()));
        let state = state_with_audit(audit_mock);

        drop(AuditGuard::new(state.clone(), "a1".into()));
        tokio::task::yield_now().await;
    }
}
