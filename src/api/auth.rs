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
//! # API key authentication extractor.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::actor::ActorApi;
use crate::actor::types::AuthenticatedActor;
use crate::api::error::GatewayApiError;
use crate::gateway::ServiceState;

/// Header carrying the caller API key secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor authenticating the caller API key.
///
/// The secret is taken from the `x-api-key` header or, alternatively, from
/// a bearer `Authorization` header. Failed attempts are logged to the
/// security log and answered with 401 without opening an audit record;
/// unauthenticated noise would otherwise drown the trail.
pub struct Auth(pub AuthenticatedActor);

impl FromRequestParts<ServiceState> for Auth {
    type Rejection = GatewayApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let secret = extract_secret(parts).ok_or_else(|| {
            tracing::warn!(security = true, "request without an api key");
            GatewayApiError::Unauthorized
        })?;

        match state
            .provider
            .get_actor_provider()
            .authenticate_by_key(state, secret)
            .await
        {
            Ok(actor) => Ok(Self(actor)),
            Err(error) => {
                tracing::warn!(security = true, %error, "api key authentication failed");
                Err(GatewayApiError::Unauthorized)
            }
        }
    }
}

fn extract_secret(parts: &Parts) -> Option<&str> {
    if let Some(value) = parts.headers.get(API_KEY_HEADER) {
        return value.to_str().ok();
    }
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn api_key_header_wins_over_authorization() {
        let parts = parts(
            Request::builder()
                .header(API_KEY_HEADER, "key-secret")
                .header(header::AUTHORIZATION, "Bearer other"),
        );
        assert_eq!(extract_secret(&parts), Some("key-secret"));
    }

    #[test]
    fn bearer_token_is_accepted() {
        let parts = parts(Request::builder().header(header::AUTHORIZATION, "Bearer key-secret"));
        assert_eq!(extract_secret(&parts), Some("key-secret"));
    }

    #[test]
    fn missing_and_malformed_credentials_yield_nothing() {
        assert_eq!(extract_secret(&parts(Request::builder())), None);
        assert_eq!(
            extract_secret(&parts(
                Request::builder().header(header::AUTHORIZATION, "Basic Zm9v")
            )),
            None
        );
    }
}
