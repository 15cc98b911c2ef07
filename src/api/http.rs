use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::api::{decode_error_envelope, Gateway, RequestDescriptor};
use crate::app::{BylineError, Result};
use crate::session::Credential;

/// reqwest-backed gateway to the REST service under the `/api` prefix.
pub struct HttpGateway {
    base: Url,
    client: Client,
}

impl HttpGateway {
    pub fn new(base: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("byline/0.1.0")
            .build()?;
        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}{}",
            self.base.as_str().trim_end_matches('/'),
            path
        );
        Ok(Url::parse(&joined)?)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn execute(
        &self,
        request: &RequestDescriptor,
        credential: Option<&Credential>,
    ) -> Result<Value> {
        let url = self.endpoint(&request.path)?;
        tracing::debug!(method = %request.method, path = %request.path, "issuing request");

        let mut builder = self.client.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(credential) = credential {
            builder = credential.authorize(builder);
        }

        let response = builder.send().await?;
        let status = response.status();
        let value: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            Ok(value)
        } else {
            Err(BylineError::Api {
                status: status.as_u16(),
                messages: decode_error_envelope(&value),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_under_api_prefix() {
        let gateway =
            HttpGateway::new(Url::parse("https://conduit.example.com/api").unwrap()).unwrap();
        let url = gateway.endpoint("/articles/feed").unwrap();
        assert_eq!(url.as_str(), "https://conduit.example.com/api/articles/feed");

        // A trailing slash on the base does not double up.
        let gateway =
            HttpGateway::new(Url::parse("https://conduit.example.com/api/").unwrap()).unwrap();
        let url = gateway.endpoint("/articles").unwrap();
        assert_eq!(url.as_str(), "https://conduit.example.com/api/articles");
    }
}
