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
//! # Gateway API error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::actor::error::ActorProviderError;
use crate::audit::error::AuditProviderError;
use crate::credential::error::CredentialProviderError;
use crate::upstream::error::UpstreamClientError;

/// Gateway API operation errors.
///
/// Everything here originates in the gateway itself; upstream error
/// statuses are passed through verbatim and never surface as one of these.
/// The JSON body carries `origin: gateway` so callers can tell the two
/// apart.
#[derive(Debug, Error)]
pub enum GatewayApiError {
    #[error("the request you have made requires authentication")]
    Unauthorized,

    #[error("could not find {resource}: {identifier}")]
    NotFound {
        resource: String,
        identifier: String,
    },

    #[error("{0}")]
    BadRequest(String),

    /// Actor provider error.
    #[error(transparent)]
    Actor {
        #[from]
        source: ActorProviderError,
    },

    /// Audit provider error.
    #[error(transparent)]
    Audit {
        #[from]
        source: AuditProviderError,
    },

    /// Credential provider error.
    #[error(transparent)]
    Credential {
        #[from]
        source: CredentialProviderError,
    },

    /// Upstream transport error.
    #[error(transparent)]
    Upstream {
        #[from]
        source: UpstreamClientError,
    },

    #[error(transparent)]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Http {
        #[from]
        source: axum::http::Error,
    },

    #[error("internal server error: {0}")]
    InternalError(String),
}

impl GatewayApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest(..) => StatusCode::BAD_REQUEST,
            Self::Actor { source } => match source {
                ActorProviderError::Unauthorized => StatusCode::UNAUTHORIZED,
                ActorProviderError::MissingAttribution => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Credential { source } => match source {
                CredentialProviderError::NotConfigured(..) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Upstream { source } => match source {
                UpstreamClientError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Audit { .. }
            | Self::Serde { .. }
            | Self::Http { .. }
            | Self::InternalError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayApiError {
    fn into_response(self) -> Response {
        error!("Error happened during request processing: {:#?}", self);

        let status_code = self.status_code();
        (
            status_code,
            Json(json!({"error": {
                "code": status_code.as_u16(),
                "message": self.to_string(),
                "origin": "gateway"
            }})),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_status_codes() {
        assert_eq!(
            GatewayApiError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayApiError::from(ActorProviderError::MissingAttribution).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayApiError::from(CredentialProviderError::NotConfigured("org".into()))
                .status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
