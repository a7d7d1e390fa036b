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

//! # Sync types

use chrono::NaiveDateTime;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::ResourceKind;

/// A locally mirrored upstream resource.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SyncedResource {
    /// Row id.
    pub id: i32,

    /// Owning organization.
    pub organization_id: String,

    /// Resource kind.
    pub kind: ResourceKind,

    /// Upstream identifier of the resource.
    pub external_id: String,

    /// Display name extracted from the payload.
    pub display_name: Option<String>,

    /// Primary email extracted from the payload.
    pub email: Option<String>,

    /// Last upstream payload seen for this resource.
    pub payload: Value,

    /// When the mirror last saw this resource.
    pub last_sync_at: NaiveDateTime,

    /// False once the resource was deleted upstream.
    pub is_active: bool,

    /// When the upstream deletion was observed.
    pub deleted_at: Option<NaiveDateTime>,

    /// When the mirror first saw this resource.
    pub created_at: NaiveDateTime,
}

/// One resource extracted from an upstream response body, ready to be
/// written into the mirror.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncUpsert {
    /// Upstream identifier.
    pub external_id: String,

    /// Display name, when the rule extracts one.
    pub display_name: Option<String>,

    /// Primary email, when the rule extracts one.
    pub email: Option<String>,

    /// Full upstream payload.
    pub payload: Value,
}

/// What the dispatcher observed about a completed upstream exchange.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(setter(into, strip_option), pattern = "owned")]
pub struct SyncInput {
    /// Owning organization.
    pub organization_id: String,

    /// Classified resource kind of the request path.
    pub kind: ResourceKind,

    /// Trailing item identifier of the request path, when present.
    #[builder(default)]
    pub item: Option<String>,

    /// HTTP method of the request.
    pub method: http::Method,

    /// Parsed upstream response body, when it was JSON.
    #[builder(default)]
    pub response_body: Option<Value>,
}

impl SyncInput {
    pub fn builder() -> SyncInputBuilder {
        SyncInputBuilder::default()
    }
}

/// What a sync application did to the mirror.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncOutcome {
    /// Rows written or revived.
    Upserted(u64),
    /// Rows marked deleted.
    Deleted(u64),
    /// Nothing to mirror for this exchange.
    Skipped,
}

/// Filters applied when listing mirrored resources.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SyncedResourceListParameters {
    /// Restrict to one organization.
    pub organization_id: Option<String>,

    /// Restrict to one resource kind.
    pub kind: Option<ResourceKind>,

    /// Include rows soft deleted upstream.
    pub include_deleted: bool,

    /// Cap on the number of returned rows.
    pub limit: Option<u64>,
}
