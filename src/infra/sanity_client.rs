use crate::abort::AbortSignal;
use crate::app::ports::ContentStorePort;
use crate::config::ContentStoreConfig;
use crate::error::{Result, WorksError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Content store client speaking the Sanity HTTP query API.
pub struct SanityClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl SanityClient {
    pub fn new(config: &ContentStoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| WorksError::Config(format!("Invalid content store token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: Self::endpoint_for(config)?,
        })
    }

    /// `https://<project>.api[cdn].sanity.io/v<version>/data/query/<dataset>`
    pub fn endpoint_for(config: &ContentStoreConfig) -> Result<Url> {
        let host = if config.use_cdn { "apicdn" } else { "api" };
        let version = config.api_version.trim_start_matches('v');
        let raw = format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            config.project_id, host, version, config.dataset
        );
        Url::parse(&raw).map_err(|e| WorksError::Config(format!("Invalid content store URL '{}': {}", raw, e)))
    }

    /// Query URL with the GROQ text and each `$param` JSON-encoded.
    pub fn query_url(&self, query: &str, params: &[(String, Value)]) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(&format!("${}", name.trim_start_matches('$')), &value.to_string());
            }
        }
        url
    }

    async fn execute(&self, url: Url) -> Result<Value> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WorksError::Status { status: status.as_u16(), body });
        }
        let mut body: Value = resp.json().await?;
        match body.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(WorksError::MalformedResponse("response has no `result` field".into())),
        }
    }
}

#[async_trait]
impl ContentStorePort for SanityClient {
    #[instrument(skip(self, query, params, signal))]
    async fn fetch(&self, query: &str, params: &[(String, Value)], signal: &AbortSignal) -> Result<Value> {
        let url = self.query_url(query, params);
        debug!(host = ?url.host_str(), "Querying content store");
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            _ = signal.aborted() => Err(WorksError::Aborted),
            result = self.execute(url) => result,
        };

        debug!("Content store query finished in {:?}", started.elapsed());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abort::AbortController;
    use crate::constants::WORKS_QUERY;
    use serde_json::json;

    #[test]
    fn test_endpoint_uses_cdn_host() {
        let config = ContentStoreConfig::default();
        let url = SanityClient::endpoint_for(&config).unwrap();
        assert_eq!(url.as_str(), "https://nwnpryai.apicdn.sanity.io/v2024-10-10/data/query/production");
    }

    #[test]
    fn test_endpoint_without_cdn() {
        let config = ContentStoreConfig {
            use_cdn: false,
            api_version: "v2021-03-25".into(),
            dataset: "staging".into(),
            ..ContentStoreConfig::default()
        };
        let url = SanityClient::endpoint_for(&config).unwrap();
        assert_eq!(url.as_str(), "https://nwnpryai.api.sanity.io/v2021-03-25/data/query/staging");
    }

    #[test]
    fn test_query_url_encodes_query_and_params() {
        let client = SanityClient::new(&ContentStoreConfig::default()).unwrap();
        let url = client.query_url(WORKS_QUERY, &[("limit".to_string(), json!(3)), ("$cat".to_string(), json!("Survey"))]);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0].0, "query");
        assert_eq!(pairs[0].1, WORKS_QUERY);
        assert_eq!(pairs[1], ("$limit".to_string(), "3".to_string()));
        assert_eq!(pairs[2], ("$cat".to_string(), "\"Survey\"".to_string()));
    }

    #[tokio::test]
    async fn test_aborted_signal_short_circuits() {
        let client = SanityClient::new(&ContentStoreConfig::default()).unwrap();
        let controller = AbortController::new();
        controller.abort();

        let err = client.fetch(WORKS_QUERY, &[], &controller.signal()).await.unwrap_err();
        assert!(err.is_aborted());
    }
}
