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

//! # Audit types
//!
//! The audit trail record and the inputs that open, close and reject it.

use chrono::NaiveDateTime;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::actor::types::{ActorKind, CallerIdentity};

/// Lifecycle state of an audit record.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Opened, upstream outcome not yet known.
    #[default]
    Pending,
    /// Upstream answered with a success status.
    Success,
    /// Upstream answered with an error status, was unreachable, or the
    /// request was abandoned mid flight.
    Failure,
    /// The gateway refused the request before contacting the upstream.
    Rejected,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "failure" => Some(Self::Failure),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of the audit trail.
///
/// Every request that passes authentication produces exactly one record.
/// The record is opened before the upstream call and closed exactly once;
/// rejected requests are written already closed.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AuditRecord {
    /// Record id.
    pub id: String,

    /// Organization the calling key belongs to.
    pub organization_id: String,

    /// Id of the key the request authenticated with.
    pub actor_id: String,

    /// Kind of the calling key.
    pub actor_type: ActorKind,

    /// Display name of the caller.
    pub actor_name: String,

    /// Contact email of the caller.
    pub actor_email: String,

    /// Operator name supplied by a vendor caller.
    pub operator_name: Option<String>,

    /// Operator email supplied by a vendor caller.
    pub operator_email: Option<String>,

    /// Derived action label, `<kind>:<verb>`.
    pub action: String,

    /// HTTP method of the request.
    pub method: String,

    /// Upstream path of the request.
    pub path: String,

    /// Raw query string, when present.
    pub query: Option<String>,

    /// Captured request body.
    pub request_body: Option<String>,

    /// Lifecycle state.
    pub status: AuditOutcome,

    /// Why the request was rejected, for `rejected` records.
    pub rejection_reason: Option<String>,

    /// Status code the upstream answered with.
    pub upstream_status: Option<u16>,

    /// Captured (possibly truncated) upstream response body.
    pub response_body: Option<String>,

    /// Wall time between open and close.
    pub duration_ms: Option<i64>,

    /// When the record was opened.
    pub opened_at: NaiveDateTime,

    /// When the record was closed.
    pub closed_at: Option<NaiveDateTime>,
}

/// Input opening a `pending` audit record.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(setter(into, strip_option), pattern = "owned")]
pub struct AuditOpen {
    /// Organization the calling key belongs to.
    pub organization_id: String,

    /// Id of the key the request authenticated with.
    pub actor_id: String,

    /// Kind of the calling key.
    #[builder(default)]
    pub actor_type: ActorKind,

    /// Display name of the caller.
    pub actor_name: String,

    /// Contact email of the caller.
    pub actor_email: String,

    /// Operator name supplied by a vendor caller.
    #[builder(default)]
    pub operator_name: Option<String>,

    /// Operator email supplied by a vendor caller.
    #[builder(default)]
    pub operator_email: Option<String>,

    /// Derived action label.
    pub action: String,

    /// HTTP method of the request.
    pub method: String,

    /// Upstream path of the request.
    pub path: String,

    /// Raw query string.
    #[builder(default)]
    pub query: Option<String>,

    /// Captured request body.
    #[builder(default, setter(strip_option = false))]
    pub request_body: Option<String>,
}

impl AuditOpen {
    pub fn builder() -> AuditOpenBuilder {
        AuditOpenBuilder::default()
    }
}

impl AuditOpenBuilder {
    /// Fill the actor and operator columns from a resolved caller.
    pub fn caller(mut self, caller: &CallerIdentity) -> Self {
        self.actor_id = Some(caller.id().to_string());
        self.actor_type = Some(caller.kind());
        self.actor_name = Some(caller.name().to_string());
        self.actor_email = Some(caller.email().to_string());
        if let Some((name, email)) = caller.operator() {
            self.operator_name = Some(Some(name.to_string()));
            self.operator_email = Some(Some(email.to_string()));
        }
        self
    }
}

/// Input closing a `pending` audit record.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(setter(into, strip_option), pattern = "owned")]
pub struct AuditClose {
    /// Final state, `success`, `failure` or `rejected`.
    pub outcome: AuditOutcome,

    /// Why the request was refused, for `rejected` closes.
    #[builder(default)]
    pub rejection_reason: Option<String>,

    /// Status code the upstream answered with, absent when it was never
    /// reached.
    #[builder(default)]
    pub upstream_status: Option<u16>,

    /// Captured response body.
    #[builder(default)]
    pub response_body: Option<String>,

    /// Wall time between open and close.
    pub duration_ms: i64,
}

impl AuditClose {
    pub fn builder() -> AuditCloseBuilder {
        AuditCloseBuilder::default()
    }

    /// A `success` close for a 2xx upstream answer.
    pub fn success(upstream_status: u16, response_body: Option<String>, duration_ms: i64) -> Self {
        Self {
            outcome: AuditOutcome::Success,
            rejection_reason: None,
            upstream_status: Some(upstream_status),
            response_body,
            duration_ms,
        }
    }

    /// A `failure` close for a non-2xx answer or a transport error.
    pub fn failure(
        upstream_status: Option<u16>,
        response_body: Option<String>,
        duration_ms: i64,
    ) -> Self {
        Self {
            outcome: AuditOutcome::Failure,
            rejection_reason: None,
            upstream_status,
            response_body,
            duration_ms,
        }
    }

    /// A `rejected` close for a request refused after the record was
    /// already opened.
    pub fn rejected(reason: impl Into<String>, duration_ms: i64) -> Self {
        Self {
            outcome: AuditOutcome::Rejected,
            rejection_reason: Some(reason.into()),
            upstream_status: None,
            response_body: None,
            duration_ms,
        }
    }
}

/// Input writing an already closed `rejected` record.
///
/// Used when the gateway refuses a request after authentication but before
/// the upstream call, vendor calls without operator attribution being the
/// primary case.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(setter(into, strip_option), pattern = "owned")]
pub struct AuditRejection {
    /// Organization the calling key belongs to.
    pub organization_id: String,

    /// Id of the key the request authenticated with.
    pub actor_id: String,

    /// Kind of the calling key.
    #[builder(default)]
    pub actor_type: ActorKind,

    /// Display name of the caller.
    pub actor_name: String,

    /// Contact email of the caller.
    pub actor_email: String,

    /// Derived action label.
    pub action: String,

    /// HTTP method of the request.
    pub method: String,

    /// Upstream path of the request.
    pub path: String,

    /// Raw query string.
    #[builder(default)]
    pub query: Option<String>,

    /// Why the request was refused.
    pub reason: String,
}

impl AuditRejection {
    pub fn builder() -> AuditRejectionBuilder {
        AuditRejectionBuilder::default()
    }
}

/// Filters applied when listing audit records.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuditRecordListParameters {
    /// Restrict to one organization.
    pub organization_id: Option<String>,

    /// Restrict to one calling key.
    pub actor_id: Option<String>,

    /// Restrict to one lifecycle state.
    pub status: Option<AuditOutcome>,

    /// Only records opened at or after this point.
    pub opened_after: Option<NaiveDateTime>,

    /// Only records opened before this point.
    pub opened_before: Option<NaiveDateTime>,

    /// Cap on the number of returned records.
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_setter_copies_operator_pair() {
        let caller = CallerIdentity::Vendor {
            id: "key1".into(),
            name: "Acme".into(),
            email: "support@acme.example".into(),
            operator_name: "Pat".into(),
            operator_email: "pat@acme.example".into(),
        };
        let open = AuditOpen::builder()
            .organization_id("org")
            .caller(&caller)
            .action("user:get")
            .method("GET")
            .path("users/jo@x.com")
            .build()
            .unwrap();
        assert_eq!(open.actor_type, ActorKind::Vendor);
        assert_eq!(open.operator_name.as_deref(), Some("Pat"));
        assert_eq!(open.operator_email.as_deref(), Some("pat@acme.example"));
    }

    #[test]
    fn outcome_round_trips_as_str() {
        for outcome in [
            AuditOutcome::Pending,
            AuditOutcome::Success,
            AuditOutcome::Failure,
            AuditOutcome::Rejected,
        ] {
            assert_eq!(AuditOutcome::from_str_opt(outcome.as_str()), Some(outcome));
        }
        assert_eq!(AuditOutcome::from_str_opt("bogus"), None);
    }
}
