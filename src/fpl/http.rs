//! Client for the public FPL API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::cli::types::{Gameweek, PlayerId, TeamId};
use crate::core::cache::ResponseCache;
use crate::core::http::{build_client, get_json, join_url};
use crate::core::rate_limit::RateLimiter;
use crate::fpl::service::DataService;
use crate::fpl::types::{
    Fixture, GameweekData, GeneralInformation, ManagerSummary, ManagersTeam, PlayerSummary,
    TransferRecord,
};
use crate::Result;


const LIVE_CACHE_CAPACITY: usize = 8;
const SUMMARY_CACHE_CAPACITY: usize = 64;

/// FPL API client. Every request passes through the one limiter it was
/// built with; clones share both the limiter and the response caches.
#[derive(Debug, Clone)]
pub struct FplClient {
    client: Client,
    base_url: String,
    limiter: RateLimiter,
    live_cache: Arc<ResponseCache<Gameweek, GameweekData>>,
    summary_cache: Arc<ResponseCache<PlayerId, PlayerSummary>>,
}

impl FplClient {
    pub fn new(base_url: &str, limiter: RateLimiter) -> Result<Self> {
        Ok(Self::with_client(build_client()?, base_url, limiter))
    }

    pub fn with_client(client: Client, base_url: &str, limiter: RateLimiter) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            limiter,
            live_cache: Arc::new(ResponseCache::new(LIVE_CACHE_CAPACITY)),
            summary_cache: Arc::new(ResponseCache::new(SUMMARY_CACHE_CAPACITY)),
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = join_url(&self.base_url, path);
        debug!(%url, "GET");
        get_json(&self.client, &self.limiter, &url, query).await
    }
}

#[async_trait]
impl DataService for FplClient {
    async fn general_information(&self) -> Result<GeneralInformation> {
        self.get("bootstrap-static/", &[]).await
    }

    async fn fixtures(&self) -> Result<Vec<Fixture>> {
        self.get("fixtures/", &[]).await
    }

    async fn fixtures_by_gameweek(&self, gameweek: Gameweek) -> Result<Vec<Fixture>> {
        self.get("fixtures/", &[("event", gameweek.to_string())])
            .await
    }

    async fn player_summary(&self, player: PlayerId) -> Result<PlayerSummary> {
        if let Some(hit) = self.summary_cache.get(&player) {
            return Ok(hit);
        }
        let summary: PlayerSummary = self
            .get(&format!("element-summary/{}/", player), &[])
            .await?;
        self.summary_cache.put(player, summary.clone());
        Ok(summary)
    }

    async fn gameweek_live(&self, gameweek: Gameweek) -> Result<GameweekData> {
        if let Some(hit) = self.live_cache.get(&gameweek) {
            return Ok(hit);
        }
        let data: GameweekData = self.get(&format!("event/{}/live/", gameweek), &[]).await?;
        self.live_cache.put(gameweek, data.clone());
        Ok(data)
    }

    async fn manager_summary(&self, team: TeamId) -> Result<ManagerSummary> {
        self.get(&format!("entry/{}/", team), &[]).await
    }

    async fn manager_picks(&self, team: TeamId, gameweek: Gameweek) -> Result<ManagersTeam> {
        self.get(&format!("entry/{}/event/{}/picks/", team, gameweek), &[])
            .await
    }

    async fn manager_transfers(&self, team: TeamId) -> Result<Vec<TransferRecord>> {
        self.get(&format!("entry/{}/transfers/", team), &[]).await
    }
}
