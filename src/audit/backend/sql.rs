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

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::IntoActiveModel;
use uuid::Uuid;

use crate::actor::types::ActorKind;
use crate::audit::backend::AuditBackend;
use crate::audit::backend::error::AuditDatabaseError;
use crate::audit::error::AuditProviderError;
use crate::audit::types::{
    AuditClose, AuditOpen, AuditOutcome, AuditRecord, AuditRecordListParameters, AuditRejection,
};
use crate::config::Config;
use crate::db::entity::audit_log as db_audit_log;
use crate::gateway::ServiceState;

mod audit_log;

#[derive(Clone, Debug, Default)]
pub struct SqlBackend {
    pub config: Config,
}

impl TryFrom<db_audit_log::Model> for AuditRecord {
    type Error = AuditDatabaseError;

    fn try_from(value: db_audit_log::Model) -> Result<Self, Self::Error> {
        let actor_type = ActorKind::from_str_opt(&value.actor_type).ok_or_else(|| {
            AuditDatabaseError::UnknownColumnValue {
                id: value.id.clone(),
                column: "actor_type",
                value: value.actor_type.clone(),
            }
        })?;
        let status = AuditOutcome::from_str_opt(&value.status).ok_or_else(|| {
            AuditDatabaseError::UnknownColumnValue {
                id: value.id.clone(),
                column: "status",
                value: value.status.clone(),
            }
        })?;
        Ok(Self {
            id: value.id,
            organization_id: value.organization_id,
            actor_id: value.actor_id,
            actor_type,
            actor_name: value.actor_name,
            actor_email: value.actor_email,
            operator_name: value.operator_name,
            operator_email: value.operator_email,
            action: value.action,
            method: value.method,
            path: value.path,
            query: value.query,
            request_body: value.request_body,
            status,
            rejection_reason: value.rejection_reason,
            upstream_status: value.upstream_status.and_then(|v| u16::try_from(v).ok()),
            response_body: value.response_body,
            duration_ms: value.duration_ms,
            opened_at: value.opened_at,
            closed_at: value.closed_at,
        })
    }
}

impl From<AuditRecord> for db_audit_log::Model {
    fn from(value: AuditRecord) -> Self {
        Self {
            id: value.id,
            organization_id: value.organization_id,
            actor_id: value.actor_id,
            actor_type: value.actor_type.as_str().to_string(),
            actor_name: value.actor_name,
            actor_email: value.actor_email,
            operator_name: value.operator_name,
            operator_email: value.operator_email,
            action: value.action,
            method: value.method,
            path: value.path,
            query: value.query,
            request_body: value.request_body,
            status: value.status.as_str().to_string(),
            rejection_reason: value.rejection_reason,
            upstream_status: value.upstream_status.map(i32::from),
            response_body: value.response_body,
            duration_ms: value.duration_ms,
            opened_at: value.opened_at,
            closed_at: value.closed_at,
        }
    }
}

#[async_trait]
impl AuditBackend for SqlBackend {
    /// Set config.
    fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    #[tracing::instrument(level = "debug", skip(self, state, open))]
    async fn open(
        &self,
        state: &ServiceState,
        open: AuditOpen,
    ) -> Result<AuditRecord, AuditProviderError> {
        let record = AuditRecord {
            id: Uuid::new_v4().simple().to_string(),
            organization_id: open.organization_id,
            actor_id: open.actor_id,
            actor_type: open.actor_type,
            actor_name: open.actor_name,
            actor_email: open.actor_email,
            operator_name: open.operator_name,
            operator_email: open.operator_email,
            action: open.action,
            method: open.method,
            path: open.path,
            query: open.query,
            request_body: open.request_body,
            status: AuditOutcome::Pending,
            rejection_reason: None,
            upstream_status: None,
            response_body: None,
            duration_ms: None,
            opened_at: Utc::now().naive_utc(),
            closed_at: None,
        };
        audit_log::create(
            &state.db,
            db_audit_log::Model::from(record.clone()).into_active_model(),
        )
        .await?;
        Ok(record)
    }

    #[tracing::instrument(level = "debug", skip(self, state, close))]
    async fn close<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
        close: AuditClose,
    ) -> Result<(), AuditProviderError> {
        let affected = audit_log::close(&state.db, id, &close, Utc::now().naive_utc()).await?;
        if affected == 0 {
            return Err(AuditProviderError::AlreadyClosed(id.to_string()));
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self, state, rejection))]
    async fn record_rejection(
        &self,
        state: &ServiceState,
        rejection: AuditRejection,
    ) -> Result<AuditRecord, AuditProviderError> {
        let now = Utc::now().naive_utc();
        let record = AuditRecord {
            id: Uuid::new_v4().simple().to_string(),
            organization_id: rejection.organization_id,
            actor_id: rejection.actor_id,
            actor_type: rejection.actor_type,
            actor_name: rejection.actor_name,
            actor_email: rejection.actor_email,
            operator_name: None,
            operator_email: None,
            action: rejection.action,
            method: rejection.method,
            path: rejection.path,
            query: rejection.query,
            request_body: None,
            status: AuditOutcome::Rejected,
            rejection_reason: Some(rejection.reason),
            upstream_status: None,
            response_body: None,
            duration_ms: None,
            opened_at: now,
            closed_at: Some(now),
        };
        audit_log::create(
            &state.db,
            db_audit_log::Model::from(record.clone()).into_active_model(),
        )
        .await?;
        Ok(record)
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn list(
        &self,
        state: &ServiceState,
        params: &AuditRecordListParameters,
    ) -> Result<Vec<AuditRecord>, AuditProviderError> {
        audit_log::list(&state.db, params)
            .await?
            .into_iter()
            .map(|model| model.try_into().map_err(AuditProviderError::from))
            .collect()
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn get<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
    ) -> Result<Option<AuditRecord>, AuditProviderError> {
        audit_log::get(&state.db, id)
            .await?
            .map(|model| model.try_into().map_err(AuditProviderError::from))
            .transpose()
    }
}
