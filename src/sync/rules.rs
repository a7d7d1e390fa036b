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

//! # Sync extraction rules
//!
//! One rule per mirrorable resource kind, describing where in the upstream
//! payload the identifier, display name and email live. List responses wrap
//! the items in an array under `collection`; item responses are the object
//! itself.

use serde_json::Value;

use crate::classify::ResourceKind;
use crate::sync::types::SyncUpsert;

pub struct SyncRule {
    pub kind: ResourceKind,
    /// Array key wrapping the items in a list response.
    pub collection: &'static str,
    /// Candidate JSON pointers for the upstream identifier, first match
    /// wins.
    pub id_pointers: &'static [&'static str],
    /// JSON pointer of the display name, when the payload carries one.
    pub name_pointer: Option<&'static str>,
    /// JSON pointer of the primary email, when the payload carries one.
    pub email_pointer: Option<&'static str>,
}

static RULES: &[SyncRule] = &[
    SyncRule {
        kind: ResourceKind::User,
        collection: "users",
        id_pointers: &["/id"],
        name_pointer: Some("/name/fullName"),
        email_pointer: Some("/primaryEmail"),
    },
    SyncRule {
        kind: ResourceKind::Group,
        collection: "groups",
        id_pointers: &["/id"],
        name_pointer: Some("/name"),
        email_pointer: Some("/email"),
    },
    SyncRule {
        kind: ResourceKind::OrgUnit,
        collection: "organizationUnits",
        id_pointers: &["/orgUnitId", "/orgUnitPath"],
        name_pointer: Some("/name"),
        email_pointer: None,
    },
    SyncRule {
        // Alias objects use the alias address itself as the natural key;
        // some payloads also carry a synthetic id.
        kind: ResourceKind::Alias,
        collection: "aliases",
        id_pointers: &["/id", "/alias"],
        name_pointer: None,
        email_pointer: Some("/alias"),
    },
    SyncRule {
        kind: ResourceKind::Delegate,
        collection: "delegates",
        id_pointers: &["/delegateEmail"],
        name_pointer: None,
        email_pointer: Some("/delegateEmail"),
    },
];

/// Look up the extraction rule of a kind. `Unclassified` has none.
pub fn rule_for(kind: ResourceKind) -> Option<&'static SyncRule> {
    RULES.iter().find(|rule| rule.kind == kind)
}

impl SyncRule {
    /// The items a response body contributes to the mirror. A list body
    /// yields its collection array, an item body yields itself, anything
    /// without a resolvable identifier yields nothing.
    pub fn extract(&self, body: &Value) -> Vec<SyncUpsert> {
        let items: Vec<&Value> = match body.get(self.collection).and_then(Value::as_array) {
            Some(array) => array.iter().collect(),
            None => vec![body],
        };

        items
            .into_iter()
            .filter_map(|item| {
                let external_id = self
                    .id_pointers
                    .iter()
                    .find_map(|pointer| item.pointer(pointer).and_then(Value::as_str))?;
                Some(SyncUpsert {
                    external_id: external_id.to_string(),
                    display_name: self
                        .name_pointer
                        .and_then(|pointer| item.pointer(pointer))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    email: self
                        .email_pointer
                        .and_then(|pointer| item.pointer(pointer))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    payload: item.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_item_body() {
        let rule = rule_for(ResourceKind::User).unwrap();
        let extracted = rule.extract(&json!({
            "id": "u1",
            "primaryEmail": "jo@x.com",
            "name": {"fullName": "Jo Smith"}
        }));
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].external_id, "u1");
        assert_eq!(extracted[0].display_name.as_deref(), Some("Jo Smith"));
        assert_eq!(extracted[0].email.as_deref(), Some("jo@x.com"));
    }

    #[test]
    fn user_list_body_yields_every_item() {
        let rule = rule_for(ResourceKind::User).unwrap();
        let extracted = rule.extract(&json!({
            "users": [
                {"id": "u1", "primaryEmail": "a@x.com"},
                {"id": "u2", "primaryEmail": "b@x.com"}
            ],
            "nextPageToken": "abc"
        }));
        assert_eq!(extracted.len(), 2);
        assert_eq!(extracted[1].external_id, "u2");
    }

    #[test]
    fn alias_falls_back_to_the_alias_address_as_id() {
        let rule = rule_for(ResourceKind::Alias).unwrap();
        let extracted = rule.extract(&json!({"alias": "sales@x.com"}));
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].external_id, "sales@x.com");
        assert_eq!(extracted[0].email.as_deref(), Some("sales@x.com"));
    }

    #[test]
    fn items_without_an_identifier_are_dropped() {
        let rule = rule_for(ResourceKind::Group).unwrap();
        let extracted = rule.extract(&json!({
            "groups": [{"email": "no-id@x.com"}, {"id": "g1", "email": "g@x.com"}]
        }));
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].external_id, "g1");
    }

    #[test]
    fn unclassified_has_no_rule() {
        assert!(rule_for(ResourceKind::Unclassified).is_none());
    }
}
