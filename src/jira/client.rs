use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{JtError, Result};
use crate::jira::issue::{Issue, Transition, TransitionList, User};
use crate::markup::mention::AccountResolver;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Thin client for the Jira REST API (v2, which still speaks wiki markup).
pub struct JiraClient {
    http: Client,
    base_url: String,
    user: String,
    token: String,
}

impl JiraClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.host.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            token: config.token.clone(),
        })
    }

    pub async fn get_issue(&self, key: &str) -> Result<Issue> {
        info!("fetching issue {key}");
        self.get_json(&format!("/rest/api/2/issue/{key}"), &[]).await
    }

    pub async fn get_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let list: TransitionList = self
            .get_json(&format!("/rest/api/2/issue/{key}/transitions"), &[])
            .await?;
        debug!("{key} has {} transition(s)", list.transitions.len());
        Ok(list.transitions)
    }

    pub async fn do_transition(&self, key: &str, transition_id: &str) -> Result<()> {
        info!("applying transition {transition_id} to {key}");
        let body = json!({ "transition": { "id": transition_id } });
        self.send(
            Method::POST,
            &format!("/rest/api/2/issue/{key}/transitions"),
            &[],
            Some(&body),
        )
        .await?;
        Ok(())
    }

    pub async fn myself(&self) -> Result<User> {
        self.get_json("/rest/api/2/myself", &[]).await
    }

    pub async fn get_user(&self, account_id: &str) -> Result<User> {
        self.get_json("/rest/api/2/user", &[("accountId", account_id)])
            .await
    }

    pub async fn assign_issue(&self, key: &str, account_id: &str) -> Result<()> {
        info!("assigning {key} to {account_id}");
        let body = json!({ "accountId": account_id });
        self.send(
            Method::PUT,
            &format!("/rest/api/2/issue/{key}/assignee"),
            &[],
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self.send(Method::GET, path, query, None).await?;
        Ok(response.json().await?)
    }

    /// Sends an authenticated request. Non-2xx responses become `JtError::Api`
    /// carrying the response body.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let started = Instant::now();
        let mut request = self
            .http
            .request(method.clone(), format!("{}{path}", self.base_url))
            .basic_auth(&self.user, Some(&self.token));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    "method={method} path={path} took={:?}: {e}",
                    started.elapsed()
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "method={method} path={path} status_code={} took={:?}",
                status.as_u16(),
                started.elapsed()
            );
            return Err(JtError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(
            "method={method} path={path} status_code={} took={:?}",
            status.as_u16(),
            started.elapsed()
        );
        Ok(response)
    }
}

impl AccountResolver for JiraClient {
    async fn resolve_account(&self, account_id: &str) -> Result<User> {
        self.get_user(account_id).await
    }
}
