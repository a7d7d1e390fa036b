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

//! # Upstream client
//!
//! Forwards requests to the upstream directory provider verbatim, with the
//! organization credential injected. One attempt per request, no retries;
//! non-2xx answers are answers, not errors. Only transport failures (cannot
//! connect, deadline elapsed) surface as [`UpstreamClientError`].

use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

pub mod error;
pub mod types;

use crate::config::Config;
use crate::gateway::ServiceState;
use crate::upstream::error::UpstreamClientError;
use crate::upstream::types::{ForwardRequest, UpstreamResponse};

/// Header naming the directory subject the credential acts on behalf of.
pub const DELEGATED_SUBJECT_HEADER: &str = "x-delegated-subject";

#[derive(Clone, Debug)]
pub struct UpstreamClient {
    config: Config,
    client: reqwest::Client,
}

#[async_trait]
pub trait UpstreamApi: Send + Sync + Clone {
    /// Forward the request and return whatever the upstream answered.
    async fn forward(
        &self,
        state: &ServiceState,
        request: ForwardRequest,
    ) -> Result<UpstreamResponse, UpstreamClientError>;
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Result<Self, UpstreamClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.upstream.connect_timeout_secs))
            .timeout(Duration::from_secs(config.upstream.request_timeout_secs))
            .build()
            .map_err(|source| UpstreamClientError::ClientBuild { source })?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }
}

/// Append the forwarded path and query to the API base.
///
/// Path segments are pushed individually so the base query/fragment rules
/// of [`Url::join`] cannot eat parts of the base path.
pub fn build_url(
    base: &Url,
    path: &str,
    query: Option<&str>,
) -> Result<Url, UpstreamClientError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| UpstreamClientError::InvalidBase {
                base: base.to_string(),
                source: None,
            })?;
        segments.pop_if_empty();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            segments.push(segment);
        }
    }
    url.set_query(query);
    Ok(url)
}

#[async_trait]
impl UpstreamApi for UpstreamClient {
    #[tracing::instrument(level = "debug", skip(self, _state, request), fields(method = %request.method, path = %request.path))]
    async fn forward(
        &self,
        _state: &ServiceState,
        request: ForwardRequest,
    ) -> Result<UpstreamResponse, UpstreamClientError> {
        let base = request
            .credential
            .api_base
            .as_ref()
            .unwrap_or(&self.config.upstream.api_base);
        let url = build_url(base, &request.path, request.query.as_deref())?;

        let mut builder = self
            .client
            .request(request.method, url)
            .bearer_auth(request.credential.secret.expose_secret())
            .header(
                DELEGATED_SUBJECT_HEADER,
                &request.credential.delegated_subject,
            );
        if let Some(content_type) = &request.content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(UpstreamClientError::from_send_error)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamClientError::Transport { source })?
            .to_vec();

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mock! {
    pub UpstreamClient {
        pub fn new(cfg: &Config) -> Result<Self, UpstreamClientError>;
    }

    #[async_trait]
    impl UpstreamApi for UpstreamClient {
        async fn forward(
            &self,
            state: &ServiceState,
            request: ForwardRequest,
        ) -> Result<UpstreamResponse, UpstreamClientError>;
    }

    impl Clone for UpstreamClient {
        fn clone(&self) -> Self;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_appends_path_to_base_path() {
        let base = Url::parse("https://dir.example.com/admin/v1/").unwrap();
        let url = build_url(&base, "users/jo@x.com/aliases", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dir.example.com/admin/v1/users/jo@x.com/aliases"
        );
    }

    #[test]
    fn url_carries_the_query_verbatim() {
        let base = Url::parse("https://dir.example.com/v1").unwrap();
        let url = build_url(&base, "users", Some("maxResults=10&pageToken=abc")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dir.example.com/v1/users?maxResults=10&pageToken=abc"
        );
    }

    #[test]
    fn success_range_is_2xx_only() {
        for (status, success) in [(200, true), (204, true), (299, true), (199, false), (301, false), (404, false), (500, false)] {
            let response = UpstreamResponse {
                status,
                ..Default::default()
            };
            assert_eq!(response.is_success(), success, "status {status}");
        }
    }
}
