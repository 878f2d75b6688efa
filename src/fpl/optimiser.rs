//! Client for the optimisation/prediction backend.
//!
//! The backend does all the modelling; this client only forwards parameters
//! and decodes the JSON it returns.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::cli::types::PlayerId;
use crate::core::http::{build_client, get_json, join_url};
use crate::core::rate_limit::RateLimiter;
use crate::fpl::service::{OptimiserService, TransferQuery};
use crate::fpl::types::{PredictionResponse, TransferResponse};
use crate::Result;

/// Models the backend can train for predictions.
pub const PREDICTION_MODELS: [&str; 5] = [
    "Linear Regression",
    "Decision Tree",
    "Random Forest",
    "Gradient Boosting",
    "Support Vector Machine",
];

#[derive(Debug, Clone)]
pub struct OptimiserClient {
    client: Client,
    base_url: String,
    limiter: RateLimiter,
}

/// `1,2,3`, the list format the backend expects.
fn join_ids(ids: &[PlayerId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl OptimiserClient {
    pub fn new(base_url: &str, limiter: RateLimiter) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.to_string(),
            limiter,
        })
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Ask the backend to refresh its training data.
    pub async fn ingest_data(&self) -> Result<Value> {
        let url = join_url(&self.base_url, "injest_data");
        get_json(&self.client, &self.limiter, &url, &[]).await
    }
}

#[async_trait]
impl OptimiserService for OptimiserClient {
    async fn optimise_transfers(&self, query: &TransferQuery) -> Result<TransferResponse> {
        let url = join_url(&self.base_url, "optimise_transfers");
        let params = [
            ("team_id", query.team_id.to_string()),
            ("horizon", query.horizon.to_string()),
            ("elements", join_ids(&query.elements)),
            ("transfers", query.transfers.to_string()),
        ];
        get_json(&self.client, &self.limiter, &url, &params).await
    }

    async fn optimise_team(&self, elements: &[PlayerId]) -> Result<Value> {
        let url = join_url(&self.base_url, "optimise_team");
        get_json(
            &self.client,
            &self.limiter,
            &url,
            &[("elements", join_ids(elements))],
        )
        .await
    }

    async fn make_predictions(&self, model: &str, horizon: u32) -> Result<PredictionResponse> {
        let url = join_url(&self.base_url, "make_predictions");
        let params = [("model", model.to_string()), ("horizon", horizon.to_string())];
        get_json(&self.client, &self.limiter, &url, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::TeamId;
    use crate::core::rate_limit::LimiterConfig;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> OptimiserClient {
        OptimiserClient::new(
            &format!("{}/api", server.uri()),
            RateLimiter::new("optimiser-test", LimiterConfig::default()),
        )
        .unwrap()
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[PlayerId::new(1), PlayerId::new(22)]), "1,22");
        assert_eq!(join_ids(&[]), "");
    }

    #[tokio::test]
    async fn test_optimise_transfers_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/optimise_transfers"))
            .and(query_param("team_id", "42"))
            .and(query_param("horizon", "3"))
            .and(query_param("elements", "7,8,9"))
            .and(query_param("transfers", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pairs": [],
                "cost": 0.0,
                "gain": 0.0
            })))
            .mount(&mock_server)
            .await;

        let query = TransferQuery {
            team_id: TeamId::new(42),
            horizon: 3,
            transfers: 2,
            elements: vec![PlayerId::new(7), PlayerId::new(8), PlayerId::new(9)],
        };
        let response = client_for(&mock_server)
            .optimise_transfers(&query)
            .await
            .unwrap();
        assert!(response.pairs.is_empty());
    }

    #[tokio::test]
    async fn test_make_predictions_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/make_predictions"))
            .and(query_param("model", "Random Forest"))
            .and(query_param("horizon", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current_target": "total_points",
                "elements": [{"element": 7, "web_name": "Saka", "total_points": 6.5}]
            })))
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .make_predictions("Random Forest", 2)
            .await
            .unwrap();
        assert_eq!(response.elements[0].web_name, "Saka");
    }

    #[tokio::test]
    async fn test_optimise_team_and_ingest() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/optimise_team"))
            .and(query_param("elements", "1,2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"starting": [1]})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/injest_data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let team = client
            .optimise_team(&[PlayerId::new(1), PlayerId::new(2)])
            .await
            .unwrap();
        assert_eq!(team["starting"][0], 1);
        assert_eq!(client.ingest_data().await.unwrap()["status"], "ok");
    }
}
