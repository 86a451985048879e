//! Hosted REST backend
//!
//! Talks to the PostgREST interface of the hosted project (`/rest/v1/<table>`)
//! with the project's API key. Filters use PostgREST operators (`eq.`, `in.(..)`),
//! error bodies carry a `message` that is passed to the user unchanged.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::config::RestConfig;
use crate::database::Backend;
use crate::models::*;
use crate::utils::errors::{EventHubError, Result};
use crate::utils::logging::log_backend_call;

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusPatch {
    status: RegistrationStatus,
}

#[derive(Clone, Debug)]
pub struct RestBackend {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl RestBackend {
    pub fn new(config: &RestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("CampusEventHub-Bot/1.0")
            .build()?;

        let mut base_url = Url::parse(&config.url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("rest/v1/{}", table))?)
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder> {
        let url = self.table_url(table)?;
        Ok(self
            .client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key))
    }

    /// Turn a non-success response into a backend error carrying the server's message
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                }
            });

        Err(EventHubError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let started = Instant::now();
        let result: Result<Vec<T>> = async {
            let response = self.request(Method::GET, table)?.query(query).send().await?;
            let body = Self::check(response).await?.text().await?;
            serde_json::from_str::<Vec<T>>(&body)
                .map_err(|e| EventHubError::SchemaMismatch(format!("{}: {}", table, e)))
        }
        .await;
        log_backend_call("select", table, started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    async fn insert<T: Serialize + Sync>(&self, table: &str, body: &T, prefer: &str) -> Result<()> {
        let started = Instant::now();
        let result: Result<()> = async {
            let response = self
                .request(Method::POST, table)?
                .header("Prefer", prefer)
                .json(body)
                .send()
                .await?;
            Self::check(response).await.map(|_| ())
        }
        .await;
        log_backend_call("insert", table, started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    fn in_filter(ids: &[Uuid]) -> String {
        let joined = ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(",");
        format!("in.({})", joined)
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn list_events(&self) -> Result<Vec<Event>> {
        self.select("events", &[("select", "*".to_string()), ("order", "start_date.asc".to_string())])
            .await
    }

    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        let rows: Vec<Event> = self
            .select("events", &[("select", "*".to_string()), ("id", format!("eq.{}", event_id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn events_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select("events", &[("select", "*".to_string()), ("id", Self::in_filter(ids))])
            .await
    }

    async fn create_event(&self, request: CreateEventRequest) -> Result<()> {
        self.insert("events", &request, "return=minimal").await
    }

    async fn find_registration(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Registration>> {
        let rows: Vec<Registration> = self
            .select(
                "registrations",
                &[
                    ("select", "*".to_string()),
                    ("event_id", format!("eq.{}", event_id)),
                    ("user_id", format!("eq.{}", user_id)),
                    ("order", "created_at.asc".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_registration_by_id(&self, registration_id: Uuid) -> Result<Option<Registration>> {
        let rows: Vec<Registration> = self
            .select(
                "registrations",
                &[("select", "*".to_string()), ("id", format!("eq.{}", registration_id))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>> {
        self.select(
            "registrations",
            &[("select", "*".to_string()), ("order", "created_at.desc".to_string())],
        )
        .await
    }

    async fn create_registration(&self, request: CreateRegistrationRequest) -> Result<()> {
        self.insert("registrations", &request, "return=minimal").await
    }

    async fn update_registration_status(&self, registration_id: Uuid, status: RegistrationStatus) -> Result<()> {
        let started = Instant::now();
        let result: Result<()> = async {
            let response = self
                .request(Method::PATCH, "registrations")?
                .query(&[("id", format!("eq.{}", registration_id))])
                .header("Prefer", "return=representation")
                .json(&StatusPatch { status })
                .send()
                .await?;
            let body = Self::check(response).await?.text().await?;
            let updated: Vec<serde_json::Value> = serde_json::from_str(&body)?;
            if updated.is_empty() {
                return Err(EventHubError::RegistrationNotFound { registration_id });
            }
            Ok(())
        }
        .await;
        log_backend_call("update", "registrations", started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    async fn create_feedback(&self, request: CreateFeedbackRequest) -> Result<()> {
        self.insert("feedback", &request, "return=minimal").await
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(
            "profiles",
            &[("select", "id,name,college".to_string()), ("id", Self::in_filter(ids))],
        )
        .await
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<()> {
        self.insert("profiles", &profile, "resolution=merge-duplicates,return=minimal").await
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .request(Method::GET, "events")?
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        Self::check(response).await?;
        debug!("REST backend reachable");
        Ok(())
    }
}
