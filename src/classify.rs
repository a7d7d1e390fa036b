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

//! # Resource classifier
//!
//! Maps an upstream request path (gateway prefix already stripped) to the
//! canonical resource kind the sync engine understands. The classifier is a
//! pure function over a single ordered rule table: sub-resource patterns
//! (aliases, delegates) are tested before their parent patterns (users,
//! groups), so a path matching both always classifies as the sub-resource.
//! `Unclassified` is a valid outcome and means "forward and audit, but do
//! not sync".

use axum::http::Method;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Canonical local category a request path is classified into.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Group,
    OrgUnit,
    Alias,
    Delegate,
    #[default]
    Unclassified,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::OrgUnit => "org_unit",
            Self::Alias => "alias",
            Self::Delegate => "delegate",
            Self::Unclassified => "unclassified",
        }
    }

    /// Parse the stored string form back into the kind.
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "group" => Some(Self::Group),
            "org_unit" => Some(Self::OrgUnit),
            "alias" => Some(Self::Alias),
            "delegate" => Some(Self::Delegate),
            "unclassified" => Some(Self::Unclassified),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a request path.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Classification {
    /// Resolved resource kind.
    pub kind: ResourceKind,
    /// The trailing path identifier for item-shaped paths. For deletes this
    /// is the key the sync engine falls back to when the response body
    /// carries no external id.
    pub item: Option<String>,
}

impl Classification {
    /// Whether the path addresses a single resource rather than a
    /// collection.
    pub fn is_item(&self) -> bool {
        self.item.is_some()
    }
}

// The rule order is the precedence contract: sub-resources first, parents
// after, `Unclassified` as the fallthrough.
static RULES: LazyLock<Vec<(ResourceKind, Regex)>> = LazyLock::new(|| {
    vec![
        (
            ResourceKind::Alias,
            Regex::new(r"^users/[^/]+/aliases(?:/(?P<item>[^/]+))?$").expect("static regex"),
        ),
        (
            ResourceKind::Alias,
            Regex::new(r"^groups/[^/]+/aliases(?:/(?P<item>[^/]+))?$").expect("static regex"),
        ),
        (
            ResourceKind::Delegate,
            Regex::new(r"^users/[^/]+/settings/delegates(?:/(?P<item>[^/]+))?$")
                .expect("static regex"),
        ),
        (
            ResourceKind::User,
            Regex::new(r"^users(?:/(?P<item>[^/]+))?$").expect("static regex"),
        ),
        (
            ResourceKind::Group,
            Regex::new(r"^groups(?:/(?P<item>[^/]+))?$").expect("static regex"),
        ),
        (
            // Org unit identifiers are path-shaped themselves
            // (`orgunits/corp/engineering`), so the item may span segments.
            ResourceKind::OrgUnit,
            Regex::new(r"^orgunits(?:/(?P<item>.+))?$").expect("static regex"),
        ),
    ]
});

/// Classify an upstream path into a resource kind.
pub fn classify(path: &str) -> Classification {
    let normalized = path.trim_matches('/');

    for (kind, rule) in RULES.iter() {
        if let Some(captures) = rule.captures(normalized) {
            return Classification {
                kind: *kind,
                item: captures.name("item").map(|m| m.as_str().to_string()),
            };
        }
    }

    Classification {
        kind: ResourceKind::Unclassified,
        item: None,
    }
}

/// Derive the audit action label from the HTTP method and the
/// classification, e.g. `user:list` or `group:create`.
pub fn action_label(method: &Method, classification: &Classification) -> String {
    let verb = match *method {
        Method::GET => {
            if classification.is_item() {
                "get"
            } else {
                "list"
            }
        }
        Method::POST => "create",
        Method::PUT | Method::PATCH => "update",
        Method::DELETE => "delete",
        _ => "call",
    };
    format!("{}:{}", classification.kind, verb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_collection_and_item() {
        assert_eq!(
            classify("users"),
            Classification {
                kind: ResourceKind::User,
                item: None
            }
        );
        assert_eq!(
            classify("/users/u1/"),
            Classification {
                kind: ResourceKind::User,
                item: Some("u1".into())
            }
        );
    }

    #[test]
    fn sub_resource_wins_over_parent() {
        // Matches both the alias pattern and (prefix-wise) the user
        // pattern; the alias rule is earlier in the table and must win.
        assert_eq!(classify("users/u1/aliases").kind, ResourceKind::Alias);
        assert_eq!(
            classify("users/u1/aliases/a@x.com"),
            Classification {
                kind: ResourceKind::Alias,
                item: Some("a@x.com".into())
            }
        );
        assert_eq!(classify("groups/g1/aliases").kind, ResourceKind::Alias);
        assert_eq!(
            classify("users/u1/settings/delegates/d@x.com").kind,
            ResourceKind::Delegate
        );
    }

    #[test]
    fn org_unit_item_spans_segments() {
        assert_eq!(
            classify("orgunits/corp/engineering"),
            Classification {
                kind: ResourceKind::OrgUnit,
                item: Some("corp/engineering".into())
            }
        );
    }

    #[test]
    fn unknown_paths_are_unclassified() {
        assert_eq!(classify("users/u1/photos").kind, ResourceKind::Unclassified);
        assert_eq!(classify("chromeosdevices").kind, ResourceKind::Unclassified);
        assert_eq!(classify("").kind, ResourceKind::Unclassified);
    }

    #[test]
    fn every_kind_is_reachable_from_the_rule_table() {
        let mut covered: Vec<ResourceKind> = RULES.iter().map(|(kind, _)| *kind).collect();
        covered.dedup();
        for kind in [
            ResourceKind::Alias,
            ResourceKind::Delegate,
            ResourceKind::User,
            ResourceKind::Group,
            ResourceKind::OrgUnit,
        ] {
            assert!(covered.contains(&kind), "{kind} has no rule");
        }
    }

    #[test]
    fn action_labels() {
        assert_eq!(
            action_label(&Method::GET, &classify("users")),
            "user:list"
        );
        assert_eq!(
            action_label(&Method::GET, &classify("users/u1")),
            "user:get"
        );
        assert_eq!(
            action_label(&Method::POST, &classify("groups")),
            "group:create"
        );
        assert_eq!(
            action_label(&Method::DELETE, &classify("users/u1")),
            "user:delete"
        );
        assert_eq!(
            action_label(&Method::PATCH, &classify("orgunits/corp")),
            "org_unit:update"
        );
        assert_eq!(
            action_label(&Method::GET, &classify("unknown/thing")),
            "unclassified:list"
        );
    }
}
