//! Supabase (PostgREST) data source
//!
//! Tables:
//! - `barbershops` - id, notify_threshold
//! - `barbers` - id, shop_id, average_cut_time, status
//! - `queue_entries` - id, shop_id, status, requested_barber_id, joined_at,
//!   notified, customer_name, phone_number

use crate::domain::types::{Barber, EntryId, QueueEntry, Shop, ShopId};
use crate::infra::config::Config;
use crate::io::error::{LoadError, PersistError};
use crate::io::traits::QueueSource;
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const SHOPS_TABLE: &str = "barbershops";
const BARBERS_TABLE: &str = "barbers";
const QUEUE_TABLE: &str = "queue_entries";

pub struct SupabaseClient {
    rest_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // Create HTTP client once for reuse (connection pooling)
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.supabase_timeout_ms()))
            .build()
            .context("Failed to build Supabase HTTP client")?;

        Ok(Self {
            rest_url: Self::rest_base(config.supabase_url()),
            api_key: config.supabase_key().to_string(),
            http,
        })
    }

    /// `https://x.supabase.co/` -> `https://x.supabase.co/rest/v1`
    fn rest_base(project_url: &str) -> String {
        format!("{}/rest/v1", project_url.trim_end_matches('/'))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn shops_request(&self) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, SHOPS_TABLE).query(&[("select", "id,notify_threshold")])
    }

    fn barbers_request(&self, shop_id: &ShopId) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, BARBERS_TABLE).query(&[
            ("select", "id,average_cut_time".to_string()),
            ("shop_id", eq(shop_id)),
            ("status", eq("active")),
        ])
    }

    /// Waiting entries oldest first; estimation relies on this order
    fn queue_request(&self, shop_id: &ShopId) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, QUEUE_TABLE).query(&[
            ("select", "*".to_string()),
            ("shop_id", eq(shop_id)),
            ("status", eq("waiting")),
            ("order", "joined_at.asc".to_string()),
        ])
    }

    fn mark_notified_request(&self, entry_id: &EntryId) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::PATCH, QUEUE_TABLE)
            .query(&[("id", eq(entry_id))])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "notified": true }))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, LoadError> {
        let response = request
            .send()
            .await
            .map_err(|source| LoadError::Transport { resource: table, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| LoadError::Transport { resource: table, source })?;

        if !status.is_success() {
            return Err(LoadError::Status { resource: table, status: status.as_u16(), body });
        }

        let rows: Vec<T> = serde_json::from_str(&body)
            .map_err(|source| LoadError::Decode { resource: table, source })?;
        debug!(table = %table, rows = %rows.len(), "supabase_select");
        Ok(rows)
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl QueueSource for SupabaseClient {
    async fn list_shops(&self) -> Result<Vec<Shop>, LoadError> {
        self.select(SHOPS_TABLE, self.shops_request()).await
    }

    async fn list_active_barbers(&self, shop_id: &ShopId) -> Result<Vec<Barber>, LoadError> {
        self.select(BARBERS_TABLE, self.barbers_request(shop_id)).await
    }

    async fn list_waiting_queue(&self, shop_id: &ShopId) -> Result<Vec<QueueEntry>, LoadError> {
        self.select(QUEUE_TABLE, self.queue_request(shop_id)).await
    }

    async fn mark_notified(&self, entry_id: &EntryId) -> Result<(), PersistError> {
        let response = self
            .mark_notified_request(entry_id)
            .send()
            .await
            .map_err(|source| PersistError::Transport { entry_id: entry_id.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersistError::Status {
                entry_id: entry_id.clone(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(entry_id = %entry_id, "supabase_mark_notified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_base_trims_slash() {
        assert_eq!(
            SupabaseClient::rest_base("https://abc.supabase.co/"),
            "https://abc.supabase.co/rest/v1"
        );
        assert_eq!(
            SupabaseClient::rest_base("https://abc.supabase.co"),
            "https://abc.supabase.co/rest/v1"
        );
    }

    #[test]
    fn test_table_url() {
        let config = Config::default().with_supabase("https://abc.supabase.co", "key");
        let client = SupabaseClient::new(&config).unwrap();
        assert_eq!(client.table_url(QUEUE_TABLE), "https://abc.supabase.co/rest/v1/queue_entries");
    }

    #[test]
    fn test_eq_filter() {
        assert_eq!(eq(&ShopId::from("42")), "eq.42");
        assert_eq!(eq("active"), "eq.active");
    }

    fn client() -> SupabaseClient {
        let config = Config::default().with_supabase("https://abc.supabase.co", "secret");
        SupabaseClient::new(&config).unwrap()
    }

    fn assert_auth_headers(request: &reqwest::Request) {
        assert_eq!(request.headers()["apikey"], "secret");
        assert_eq!(request.headers()["Authorization"], "Bearer secret");
    }

    #[test]
    fn test_shops_request() {
        let request = client().shops_request().build().unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_auth_headers(&request);
        assert_eq!(
            request.url().as_str(),
            "https://abc.supabase.co/rest/v1/barbershops?select=id%2Cnotify_threshold"
        );
    }

    #[test]
    fn test_barbers_request_filters_active() {
        let request = client().barbers_request(&ShopId::from("42")).build().unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_auth_headers(&request);
        assert_eq!(
            request.url().as_str(),
            "https://abc.supabase.co/rest/v1/barbers?select=id%2Caverage_cut_time&shop_id=eq.42&status=eq.active"
        );
    }

    #[test]
    fn test_queue_request_waiting_oldest_first() {
        let request = client().queue_request(&ShopId::from("42")).build().unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_auth_headers(&request);
        assert_eq!(
            request.url().as_str(),
            "https://abc.supabase.co/rest/v1/queue_entries?select=*&shop_id=eq.42&status=eq.waiting&order=joined_at.asc"
        );
    }

    #[test]
    fn test_mark_notified_request() {
        let request = client().mark_notified_request(&EntryId::from("e1")).build().unwrap();

        assert_eq!(request.method(), &reqwest::Method::PATCH);
        assert_auth_headers(&request);
        assert_eq!(request.url().as_str(), "https://abc.supabase.co/rest/v1/queue_entries?id=eq.e1");
        assert_eq!(request.headers()["Prefer"], "return=minimal");
        assert_eq!(request.headers()["Content-Type"], "application/json");

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let body: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(body, serde_json::json!({ "notified": true }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_load_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let config = Config::default().with_supabase("http://127.0.0.1:9", "key");
        let client = SupabaseClient::new(&config).unwrap();

        let err = client.list_shops().await.unwrap_err();
        assert!(matches!(err, LoadError::Transport { resource: "barbershops", .. }));
    }
}
