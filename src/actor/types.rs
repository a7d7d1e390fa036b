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

//! # Actor types
//!
//! The authenticated key context and the fully attributed caller identity
//! derived from it.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// The kind of credential a caller authenticated with.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A person using their own key.
    #[default]
    User,
    /// An internal automation/service key.
    Service,
    /// A shared key held by an external vendor organization.
    Vendor,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Service => "service",
            Self::Vendor => "vendor",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "service" => Some(Self::Service),
            "vendor" => Some(Self::Vendor),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Information about a successfully authenticated API key.
///
/// This is the raw authentication context; it becomes a [`CallerIdentity`]
/// only after attribution succeeds (see [`crate::actor::resolve_caller`]).
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into, strip_option))]
pub struct AuthenticatedActor {
    /// Key id.
    pub key_id: String,

    /// Organization the key belongs to.
    pub organization_id: String,

    /// Kind of the key.
    #[builder(default)]
    pub kind: ActorKind,

    /// Display name registered for the key.
    pub name: String,

    /// Contact email registered for the key.
    pub email: String,
}

impl AuthenticatedActor {
    pub fn builder() -> AuthenticatedActorBuilder {
        AuthenticatedActorBuilder::default()
    }
}

/// The resolved identity a request is attributed to for audit purposes.
///
/// A `Vendor` identity always carries the human operator pair; the resolver
/// refuses to construct one without it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallerIdentity {
    User {
        id: String,
        name: String,
        email: String,
    },
    Service {
        id: String,
        name: String,
        email: String,
    },
    Vendor {
        id: String,
        name: String,
        email: String,
        operator_name: String,
        operator_email: String,
    },
}

impl CallerIdentity {
    pub fn kind(&self) -> ActorKind {
        match self {
            Self::User { .. } => ActorKind::User,
            Self::Service { .. } => ActorKind::Service,
            Self::Vendor { .. } => ActorKind::Vendor,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::User { id, .. } | Self::Service { id, .. } | Self::Vendor { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::User { name, .. } | Self::Service { name, .. } | Self::Vendor { name, .. } => {
                name
            }
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::User { email, .. }
            | Self::Service { email, .. }
            | Self::Vendor { email, .. } => email,
        }
    }

    /// The per-request operator attribution, present only for vendors.
    pub fn operator(&self) -> Option<(&str, &str)> {
        match self {
            Self::Vendor {
                operator_name,
                operator_email,
                ..
            } => Some((operator_name.as_str(), operator_email.as_str())),
            _ => None,
        }
    }
}
