use crate::config::Config;
use crate::dto::*;
use crate::error::ApiError;
use crate::gateway::TradingGateway;
use crate::retry::RetryPolicy;
use crate::storage::KeyValueStore;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Key the session token is persisted under.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

const LOGIN_PATH: &str = "/auth/login";
const PROFILE_PATH: &str = "/auth/me";
const WALLET_BALANCE_PATH: &str = "/wallet/balance";
const ROUNDS_PATH: &str = "/trading/rounds";
const BATCH_ORDERS_PATH: &str = "/trading/orders/batch";
const MY_ORDERS_PATH: &str = "/trading/orders/my";

/// HTTP client for the trading backend
pub struct TradingApiClient {
    client: Client,
    config: Arc<Config>,
    base_url: String,
    session_token: Option<String>,
    retry_policy: RetryPolicy,
}

impl TradingApiClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.api.timeout()).build()?;
        let base_url = config.api.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            config: Arc::new(config),
            base_url,
            session_token: None,
            retry_policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Log in with the configured credentials and keep the bearer token
    pub async fn login(&mut self) -> Result<LoginResponse, ApiError> {
        let request = LoginRequest {
            username: self.config.api.username.clone(),
            password: self.config.api.password.clone(),
        };

        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&request)
            .send()
            .await?;
        let login: LoginResponse = Self::decode(response).await?;

        info!("Logged in as {}", self.config.api.username);
        self.session_token = Some(login.token.clone());
        Ok(login)
    }

    pub fn get_session_token(&self) -> Option<String> {
        self.session_token.clone()
    }

    pub fn set_session_token(&mut self, token: String) {
        self.session_token = Some(token);
    }

    pub fn is_logged_in(&self) -> bool {
        self.session_token.is_some()
    }

    /// Restore a previously persisted token. Returns whether one was found.
    pub fn restore_session<S: KeyValueStore>(&mut self, store: &S) -> anyhow::Result<bool> {
        match store.get(AUTH_TOKEN_KEY)? {
            Some(token) if !token.trim().is_empty() => {
                self.session_token = Some(token.trim().to_string());
                debug!("Restored session token");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn persist_session<S: KeyValueStore>(&self, store: &S) -> anyhow::Result<()> {
        match &self.session_token {
            Some(token) => store.set(AUTH_TOKEN_KEY, token),
            None => store.remove(AUTH_TOKEN_KEY),
        }
    }

    /// Forget the token locally and in the store.
    pub fn logout<S: KeyValueStore>(&mut self, store: &S) -> anyhow::Result<()> {
        self.session_token = None;
        store.remove(AUTH_TOKEN_KEY)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Result<&str, ApiError> {
        self.session_token.as_deref().ok_or(ApiError::NotLoggedIn)
    }

    /// Unwrap the `{success, message, data}` envelope.
    async fn decode<U: DeserializeOwned>(response: Response) -> Result<U, ApiError> {
        let status = response.status();
        debug!("API response status: {}", status);

        let response_text = response.text().await?;
        debug!("API response: {}", response_text);

        if !status.is_success() {
            // 4xx bodies usually explain themselves; surface that message
            if status.is_client_error() {
                if let Ok(envelope) =
                    serde_json::from_str::<ApiResponse<serde_json::Value>>(&response_text)
                {
                    if let Some(message) = envelope.message.filter(|m| !m.is_empty()) {
                        return Err(ApiError::Rejected(message));
                    }
                }
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let envelope: ApiResponse<U> = serde_json::from_str(&response_text)?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message_or("Request failed")));
        }
        envelope.data.ok_or(ApiError::MissingData)
    }

    /// Authenticated GET, retried on transient failures.
    async fn get<U: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<U, ApiError> {
        let token = self.token()?;
        let url = self.url(path);

        self.retry_policy
            .retry(|| {
                let request = self.client.get(&url).bearer_auth(token).query(query);
                async move { Self::decode(request.send().await?).await }
            })
            .await
    }

    /// Authenticated POST. Never retried: a resend could place orders twice.
    async fn post<T: Serialize, U: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<U, ApiError> {
        let token = self.token()?;
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    // ========================================================================
    // Account
    // ========================================================================

    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.get(PROFILE_PATH, &[]).await
    }

    pub async fn get_wallet_balance(&self) -> Result<WalletBalance, ApiError> {
        self.get(WALLET_BALANCE_PATH, &[]).await
    }

    // ========================================================================
    // Rounds
    // ========================================================================

    /// List rounds, optionally for one game type
    pub async fn list_rounds(&self, game_type: Option<GameType>) -> Result<Vec<Round>, ApiError> {
        let query: Vec<(&str, String)> = game_type
            .map(|g| vec![("gameType", g.to_string())])
            .unwrap_or_default();
        self.get(ROUNDS_PATH, &query).await
    }

    pub async fn get_round(&self, round_id: &str) -> Result<Round, ApiError> {
        self.get(&format!("{}/{}", ROUNDS_PATH, round_id), &[]).await
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Submit every entry as one batch order
    pub async fn place_batch_trades(
        &self,
        request: &BatchTradeRequest,
    ) -> Result<BatchTradeResult, ApiError> {
        if request.is_empty() {
            return Err(ApiError::Rejected("No trades to place".to_string()));
        }
        debug!("Batch request: {}", serde_json::to_string(request)?);

        let result: BatchTradeResult = self.post(BATCH_ORDERS_PATH, request).await?;
        info!(
            "Placed {} orders totalling {}",
            result.orders.len(),
            request.total_amount()
        );
        Ok(result)
    }

    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get(MY_ORDERS_PATH, &[]).await
    }
}

impl TradingGateway for TradingApiClient {
    async fn fetch_balance(&self) -> Result<WalletBalance, ApiError> {
        self.get_wallet_balance().await
    }

    async fn submit_batch(
        &self,
        request: &BatchTradeRequest,
    ) -> Result<BatchTradeResult, ApiError> {
        self.place_batch_trades(request).await
    }

    async fn fetch_rounds(&self, game_type: Option<GameType>) -> Result<Vec<Round>, ApiError> {
        self.list_rounds(game_type).await
    }
}
