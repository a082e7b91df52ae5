use std::collections::HashSet;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::client::perf_source_fetcher_trait::PerfSourceFetcher;
use crate::core::client::treeherder_dto::{
    OptionCollectionDto, PerfDataMapDto, SignatureDto, SignatureMapDto,
};
use crate::domain::perf::error::PerfGraphError;
use crate::domain::perf::model::{DataPoint, SeriesConfig, Source};

/// Perfherder data adapter backed by the Treeherder REST API.
pub struct TreeherderClient {
    client: Client,
    base_url: String,
    interval_seconds: i64,
}

impl TreeherderClient {
    pub fn new(base_url: &str, timeout: Duration, interval_seconds: i64) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("perfgraph-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            interval_seconds,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).query(query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PerfGraphError::Upstream {
                status: status.as_u16(),
                url,
            }
            .into());
        }

        resp.json::<T>()
            .await
            .map_err(|e| anyhow!("Failed to decode Treeherder response from {}: {}", url, e))
    }

    /// Option collection hashes whose option list contains `name`.
    pub async fn option_collection_hashes(&self, name: &str) -> Result<HashSet<String>> {
        let collections: Vec<OptionCollectionDto> =
            self.get_json("/api/optioncollectionhash/", &[]).await?;

        let hashes: HashSet<String> = collections
            .into_iter()
            .filter(|c| c.options.iter().any(|o| o.name == name))
            .map(|c| c.option_collection_hash)
            .collect();

        if hashes.is_empty() {
            return Err(PerfGraphError::UnknownOption(name.to_string()).into());
        }
        Ok(hashes)
    }

    pub async fn signatures(&self, repo: &str, framework: u32, platform: &str) -> Result<SignatureMapDto> {
        self.get_json(
            &format!("/api/project/{}/performance/signatures/", repo),
            &[
                ("framework", framework.to_string()),
                ("platform", platform.to_string()),
                ("interval", self.interval_seconds.to_string()),
            ],
        )
        .await
    }

    pub async fn signature_data(&self, repo: &str, signature_id: u64) -> Result<Vec<DataPoint>> {
        let grouped: PerfDataMapDto = self
            .get_json(
                &format!("/api/project/{}/performance/data/", repo),
                &[
                    ("signature_id", signature_id.to_string()),
                    ("interval", self.interval_seconds.to_string()),
                ],
            )
            .await?;

        Ok(grouped
            .values()
            .flatten()
            .map(DataPoint::from)
            .collect())
    }
}

/// Does `sig` answer the series query? `options` is the allowed option
/// collection set, when the query names one.
pub fn signature_matches(
    sig: &SignatureDto,
    config: &SeriesConfig,
    options: Option<&HashSet<String>>,
) -> bool {
    if sig.suite != config.suite {
        return false;
    }

    let test_ok = match config.test.as_deref() {
        Some(test) => sig.test.as_deref() == Some(test),
        None => sig.is_summary(),
    };
    if !test_ok {
        return false;
    }

    if let Some(options) = options {
        match &sig.option_collection_hash {
            Some(hash) if options.contains(hash) => {}
            _ => return false,
        }
    }

    config
        .extra_options
        .iter()
        .all(|wanted| sig.extra_options.contains(wanted))
}

#[async_trait]
impl PerfSourceFetcher for TreeherderClient {
    async fn fetch_sources(&self, config: &SeriesConfig) -> Result<Vec<Source>> {
        let options = match &config.option {
            Some(name) => Some(self.option_collection_hashes(name).await?),
            None => None,
        };

        let mut matched = Vec::new();
        for platform in &config.platforms {
            let signatures = self.signatures(&config.repo, config.framework, platform).await?;

            // the API hands back a map; order by id so sources come out stable
            let mut hits: Vec<(String, SignatureDto)> = signatures
                .into_iter()
                .filter(|(_, sig)| sig.machine_platform == *platform)
                .filter(|(_, sig)| signature_matches(sig, config, options.as_ref()))
                .collect();
            hits.sort_by_key(|(_, sig)| sig.id);

            if hits.is_empty() {
                warn!(repo = %config.repo, %platform, suite = %config.suite, "no signature matches");
            }
            matched.extend(hits);
        }

        let fetches = matched.iter().map(|(hash, sig)| async move {
            let data = self.signature_data(&config.repo, sig.id).await?;
            debug!(signature = sig.id, points = data.len(), "fetched signature data");
            Ok::<_, anyhow::Error>(Source {
                meta: sig.to_meta(&config.repo, hash),
                data,
            })
        });

        try_join_all(fetches).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn option_collections() -> Json<Value> {
        Json(json!([
            { "option_collection_hash": "opt-hash", "options": [{ "name": "opt" }] },
            { "option_collection_hash": "pgo-hash", "options": [{ "name": "pgo" }] }
        ]))
    }

    async fn signatures(
        Path(repo): Path<String>,
        Query(q): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        if repo != "mozilla-central" {
            return Err(StatusCode::NOT_FOUND);
        }
        let platform = q.get("platform").cloned().unwrap_or_default();
        let body = match platform.as_str() {
            "linux64" => json!({
                "h-summary": {
                    "id": 11, "framework_id": 10, "machine_platform": "linux64",
                    "suite": "speedometer", "lower_is_better": false,
                    "option_collection_hash": "opt-hash", "extra_options": ["e10s"]
                },
                "h-subtest": {
                    "id": 12, "framework_id": 10, "machine_platform": "linux64",
                    "suite": "speedometer", "test": "Inferno-TodoMVC",
                    "option_collection_hash": "opt-hash"
                },
                "h-pgo": {
                    "id": 13, "framework_id": 10, "machine_platform": "linux64",
                    "suite": "speedometer", "option_collection_hash": "pgo-hash"
                }
            }),
            "linux64-shippable" => json!({
                "h-ship": {
                    "id": 21, "framework_id": 10, "machine_platform": "linux64-shippable",
                    "suite": "speedometer", "lower_is_better": false,
                    "option_collection_hash": "opt-hash", "extra_options": ["e10s", "fission"]
                }
            }),
            _ => json!({}),
        };
        Ok(Json(body))
    }

    async fn data(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        let body = match q.get("signature_id").map(String::as_str) {
            Some("11") => json!({ "h-summary": [
                { "push_timestamp": 1_000, "value": 90.0 },
                { "push_timestamp": 2_000, "value": 91.0 }
            ]}),
            Some("21") => json!({ "h-ship": [
                { "push_timestamp": "1970-01-01T00:50:00", "value": 95.0 }
            ]}),
            _ => json!({}),
        };
        Json(body)
    }

    fn router() -> Router {
        Router::new()
            .route("/api/optioncollectionhash/", get(option_collections))
            .route("/api/project/{repo}/performance/signatures/", get(signatures))
            .route("/api/project/{repo}/performance/data/", get(data))
    }

    fn config(platforms: &[&str]) -> SeriesConfig {
        SeriesConfig {
            repo: "mozilla-central".into(),
            framework: 10,
            suite: "speedometer".into(),
            test: None,
            platforms: platforms.iter().map(|p| p.to_string()).collect(),
            option: Some("opt".into()),
            extra_options: vec!["e10s".into()],
        }
    }

    fn client(base: &str) -> TreeherderClient {
        TreeherderClient::new(base, Duration::from_secs(5), 31_536_000).unwrap()
    }

    #[tokio::test]
    async fn fetches_one_source_per_matching_signature() {
        let base = serve(router()).await;
        let sources = client(&base)
            .fetch_sources(&config(&["linux64", "linux64-shippable"]))
            .await
            .unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].meta.id, 11);
        assert_eq!(sources[0].meta.platform.as_deref(), Some("linux64"));
        assert!(!sources[0].meta.lower_is_better);
        assert_eq!(sources[0].data.len(), 2);

        assert_eq!(sources[1].meta.id, 21);
        assert_eq!(sources[1].data, vec![DataPoint::new(3_000, 95.0)]);
    }

    #[tokio::test]
    async fn named_test_selects_subtest_signature() {
        let base = serve(router()).await;
        let mut cfg = config(&["linux64"]);
        cfg.test = Some("Inferno-TodoMVC".into());
        cfg.extra_options.clear();

        let sources = client(&base).fetch_sources(&cfg).await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].meta.id, 12);
        assert!(sources[0].data.is_empty());
    }

    #[tokio::test]
    async fn unknown_option_is_an_error() {
        let base = serve(router()).await;
        let mut cfg = config(&["linux64"]);
        cfg.option = Some("asan".into());

        let err = client(&base).fetch_sources(&cfg).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PerfGraphError>(),
            Some(PerfGraphError::UnknownOption(name)) if name == "asan"
        ));
    }

    #[tokio::test]
    async fn http_error_carries_status() {
        let base = serve(router()).await;
        let mut cfg = config(&["linux64"]);
        cfg.repo = "nonexistent".into();

        let err = client(&base).fetch_sources(&cfg).await.unwrap_err();
        match err.downcast_ref::<PerfGraphError>() {
            Some(PerfGraphError::Upstream { status, url }) => {
                assert_eq!(*status, 404);
                assert!(url.contains("nonexistent"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn matching_rules() {
        let sig: SignatureDto = serde_json::from_value(json!({
            "id": 1, "framework_id": 10, "machine_platform": "linux64",
            "suite": "tp6", "test": "tp6", "option_collection_hash": "opt-hash",
            "extra_options": ["e10s"]
        }))
        .unwrap();
        let mut cfg = config(&["linux64"]);
        cfg.suite = "tp6".into();
        let opts: HashSet<String> = ["opt-hash".to_string()].into_iter().collect();

        assert!(signature_matches(&sig, &cfg, Some(&opts)));

        cfg.extra_options.push("fission".into());
        assert!(!signature_matches(&sig, &cfg, Some(&opts)));

        cfg.extra_options.clear();
        let pgo: HashSet<String> = ["pgo-hash".to_string()].into_iter().collect();
        assert!(!signature_matches(&sig, &cfg, Some(&pgo)));
        assert!(signature_matches(&sig, &cfg, None));
    }
}
