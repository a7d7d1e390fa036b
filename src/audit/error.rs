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

use thiserror::Error;

use crate::audit::backend::error::AuditDatabaseError;
use crate::audit::types::{AuditCloseBuilderError, AuditOpenBuilderError, AuditRejectionBuilderError};

#[derive(Error, Debug)]
pub enum AuditProviderError {
    /// Record not found.
    #[error("audit record {0} not found")]
    NotFound(String),

    /// A close was attempted on a record that is no longer pending.
    #[error("audit record {0} is already closed")]
    AlreadyClosed(String),

    /// Unsupported driver.
    #[error("unsupported audit driver {0}")]
    UnsupportedDriver(String),

    /// Open builder error.
    #[error(transparent)]
    AuditOpenBuilder(#[from] AuditOpenBuilderError),

    /// Close builder error.
    #[error(transparent)]
    AuditCloseBuilder(#[from] AuditCloseBuilderError),

    /// Rejection builder error.
    #[error(transparent)]
    AuditRejectionBuilder(#[from] AuditRejectionBuilderError),

    /// Database error.
    #[error(transparent)]
    Database(#[from] AuditDatabaseError),
}
