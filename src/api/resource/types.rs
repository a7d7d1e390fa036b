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
//! Mirrored resource API types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::sync::types::SyncedResource;

/// A locally mirrored upstream resource.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, ToSchema)]
pub struct Resource {
    /// Row id.
    pub id: i32,

    /// Owning organization.
    pub organization_id: String,

    /// Resource kind (`user`, `group`, `org_unit`, `alias` or `delegate`).
    pub kind: String,

    /// Upstream identifier of the resource.
    pub external_id: String,

    /// Display name extracted from the payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Primary email extracted from the payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Last upstream payload seen for this resource.
    pub payload: Value,

    /// When the mirror last saw this resource.
    pub last_sync_at: NaiveDateTime,

    /// False once the resource was deleted upstream.
    pub is_active: bool,

    /// When the upstream deletion was observed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<NaiveDateTime>,
}

impl From<SyncedResource> for Resource {
    fn from(value: SyncedResource) -> Self {
        Self {
            id: value.id,
            organization_id: value.organization_id,
            kind: value.kind.as_str().to_string(),
            external_id: value.external_id,
            display_name: value.display_name,
            email: value.email,
            payload: value.payload,
            last_sync_at: value.last_sync_at,
            is_active: value.is_active,
            deleted_at: value.deleted_at,
        }
    }
}

/// A list of mirrored resources.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, ToSchema)]
pub struct ResourceList {
    /// Mirrored resources.
    pub resources: Vec<Resource>,
}

impl IntoResponse for ResourceList {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Query parameters of the mirrored resource list.
#[derive(Clone, Debug, Default, Deserialize, Eq, IntoParams, PartialEq, Serialize)]
pub struct ResourceListParameters {
    /// Restrict to one organization.
    pub organization_id: Option<String>,

    /// Restrict to one resource kind.
    pub kind: Option<String>,

    /// Include rows soft deleted upstream.
    #[serde(default)]
    pub include_deleted: bool,

    /// Cap on the number of returned rows.
    pub limit: Option<u64>,
}
