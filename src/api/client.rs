use crate::api::traits::PropertyApi;
use crate::api::types::{
    AmenitiesPayload, BasicInfoPayload, EmailOtpRequest, ErrorBody, RoomsPayload, StatusUpdate,
    VerifyOtpRequest,
};
use crate::config::ClientConfig;
use crate::error::{OnboardError, Result};
use crate::models::{Finance, Location, Media, Policies, Property, PropertyStatus, Room};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("dharamshala-onboard/", env!("CARGO_PKG_VERSION"));

/// Successful bodies arrive either bare or wrapped in `{ "data": ... }`
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(value) => value,
        }
    }
}

/// REST client for the property backend
pub struct HttpPropertyApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPropertyApi {
    /// Create a client from loaded configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/properties{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, id: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.dispatch(method, path, id, body).await?;
        let envelope = response.json::<Envelope<T>>().await?;
        Ok(envelope.into_inner())
    }

    async fn send_empty<B>(&self, method: Method, path: &str, id: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.dispatch(method, path, id, body).await?;
        Ok(())
    }

    /// Send the request and reject non-2xx answers
    async fn dispatch<B>(&self, method: Method, path: &str, id: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(|e| {
            warn!(property_id = id, error = %e, "Request to property backend failed");
            OnboardError::Transport(e)
        })?;
        Self::ensure_success(response, id).await
    }

    /// Map non-2xx responses onto the error taxonomy
    async fn ensure_success(response: Response, id: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                if raw.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    raw.clone()
                }
            });

        warn!(property_id = id, status = status.as_u16(), "Backend rejected request: {}", message);

        Err(match status {
            StatusCode::NOT_FOUND if !id.is_empty() => OnboardError::NotFound(id.to_string()),
            StatusCode::CONFLICT => OnboardError::Conflict {
                id: id.to_string(),
                message,
            },
            _ => OnboardError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl PropertyApi for HttpPropertyApi {
    async fn initialize(&self) -> Result<Property> {
        self.send_json::<(), _>(Method::POST, "/initialize", "", None).await
    }

    async fn fetch_property(&self, id: &str) -> Result<Property> {
        self.send_json::<(), _>(Method::GET, &format!("/{id}"), id, None)
            .await
    }

    async fn draft_properties(&self) -> Result<Vec<Property>> {
        self.send_json::<(), _>(Method::GET, "/drafts", "", None).await
    }

    async fn update_basic_info(&self, id: &str, data: &BasicInfoPayload) -> Result<Property> {
        self.send_json(Method::PATCH, &format!("/{id}/basic-info"), id, Some(data))
            .await
    }

    async fn update_location(&self, id: &str, data: &Location) -> Result<Property> {
        self.send_json(Method::PATCH, &format!("/{id}/location"), id, Some(data))
            .await
    }

    async fn update_amenities(&self, id: &str, data: &AmenitiesPayload) -> Result<Property> {
        self.send_json(Method::PATCH, &format!("/{id}/amenities"), id, Some(data))
            .await
    }

    async fn add_rooms(&self, id: &str, rooms: &[Room]) -> Result<Property> {
        let body = RoomsPayload { rooms };
        self.send_json(Method::POST, &format!("/{id}/rooms"), id, Some(&body))
            .await
    }

    async fn update_room(&self, id: &str, room_id: &str, room: &Room) -> Result<Property> {
        self.send_json(
            Method::PATCH,
            &format!("/{id}/rooms/{room_id}"),
            id,
            Some(room),
        )
        .await
    }

    async fn update_media(&self, id: &str, media: &Media) -> Result<Property> {
        self.send_json(Method::PATCH, &format!("/{id}/media"), id, Some(media))
            .await
    }

    async fn update_policies(&self, id: &str, policies: &Policies) -> Result<Property> {
        self.send_json(Method::PATCH, &format!("/{id}/policies"), id, Some(policies))
            .await
    }

    async fn update_finance(&self, id: &str, finance: &Finance) -> Result<Property> {
        self.send_json(Method::PATCH, &format!("/{id}/finance"), id, Some(finance))
            .await
    }

    async fn send_email_otp(&self, id: &str, email: &str) -> Result<()> {
        let body = EmailOtpRequest {
            property_id: id,
            email,
        };
        self.send_empty(Method::POST, "/email/send-otp", id, Some(&body))
            .await
    }

    async fn verify_email_otp(&self, id: &str, email: &str, otp: &str) -> Result<Property> {
        let body = VerifyOtpRequest {
            property_id: id,
            email,
            otp,
        };
        self.send_json(Method::POST, "/email/verify-otp", id, Some(&body))
            .await
    }

    async fn submit_for_review(&self, id: &str) -> Result<Property> {
        self.send_json::<(), _>(Method::POST, &format!("/{id}/submit"), id, None)
            .await
    }

    async fn delete_property(&self, id: &str) -> Result<()> {
        self.send_empty::<()>(Method::DELETE, &format!("/{id}"), id, None)
            .await
    }

    async fn update_status(&self, id: &str, status: PropertyStatus) -> Result<Property> {
        let body = StatusUpdate { status };
        self.send_json(Method::PATCH, &format!("/{id}/status"), id, Some(&body))
            .await
    }

    fn backend_name(&self) -> &'static str {
        "rest"
    }
}
