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

//! # Directory API audit gateway
//!
//! `dirgate` sits between internal callers and an external workspace
//! directory API (users, groups, organizational units and their
//! sub-resources). It forwards every request to the upstream provider
//! unmodified and, around that forwarding, performs three jobs the upstream
//! cannot do for us:
//!
//! - **Caller attribution**: every call is tied to a resolved caller
//!   identity (a person, an internal service, or an external vendor acting
//!   through a shared integration key). Vendor calls must additionally name
//!   the human operator behind the keyboard.
//!
//! - **Durable audit**: exactly one audit record per inbound request,
//!   opened before the upstream call and closed exactly once, whatever
//!   happens in between.
//!
//! - **Best-effort mirror**: successful responses for recognized resource
//!   kinds are folded into a local cache so dashboards can list and search
//!   directory data without calling the upstream provider.
//!
//! The gateway deliberately does not reinterpret the upstream API: request
//! and response bodies pass through verbatim, upstream errors are returned
//! to the caller as-is, and there are no gateway-side retries or rate
//! limits. Callers can distinguish a gateway rejection from an upstream
//! error by the `origin` field of the error body.

pub mod actor;
pub mod api;
pub mod audit;
pub mod classify;
pub mod config;
pub mod credential;
pub mod db;
pub mod db_migration;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod sync;
pub mod upstream;
