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
use dyn_clone::DynClone;

use crate::audit::error::AuditProviderError;
use crate::audit::types::{
    AuditClose, AuditOpen, AuditRecord, AuditRecordListParameters, AuditRejection,
};
use crate::config::Config;
use crate::gateway::ServiceState;

pub mod error;
pub mod sql;

#[async_trait]
pub trait AuditBackend: DynClone + Send + Sync + std::fmt::Debug {
    /// Set config.
    fn set_config(&mut self, config: Config);

    /// Persist a new `pending` record.
    async fn open(
        &self,
        state: &ServiceState,
        open: AuditOpen,
    ) -> Result<AuditRecord, AuditProviderError>;

    /// Close a `pending` record. Must leave already closed records
    /// untouched and report the attempt.
    async fn close<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
        close: AuditClose,
    ) -> Result<(), AuditProviderError>;

    /// Persist an already closed `rejected` record.
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

    /// Fetch a single record.
    async fn get<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
    ) -> Result<Option<AuditRecord>, AuditProviderError>;
}

dyn_clone::clone_trait_object!(AuditBackend);
