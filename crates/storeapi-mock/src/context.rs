//! HTTP implementation of the store context.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use storeapi_core::{
    sha256_hex, Context, ErrorCode, Product, Result, StoreError, StorePurchaseCallback,
    StorePurchaseStatus,
};

use crate::config::MockConfig;
use crate::error::MockError;

const PRODUCTS_PATH: &str = "/products";
const ALL_AUTHENTICATED_USERS_PATH: &str = "/allauthenticatedusers";
const GENERATE_USER_JWT_PATH: &str = "/generateuserjwt";
const PURCHASE_PATH: &str = "/purchase";

/// `E_FAIL`, reported with [`StorePurchaseStatus::NetworkError`] when the
/// purchase request itself fails.
pub const PURCHASE_TRANSPORT_ERROR: i32 = -2_147_467_259;

/// Store context backed by the store mock REST server.
#[derive(Debug, Clone)]
pub struct MockContext {
    client: Client,
    base_url: String,
}

impl MockContext {
    /// Create a context for the server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &MockConfig) -> std::result::Result<Self, MockError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    /// Create a context for the server named by the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_env() -> std::result::Result<Self, MockError> {
        Self::new(&MockConfig::from_env())
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> std::result::Result<T, MockError> {
        get(&self.client, &self.base_url, path, params).await
    }
}

async fn get<T: serde::de::DeserializeOwned>(
    client: &Client,
    base_url: &str,
    path: &str,
    params: &[(&str, &str)],
) -> std::result::Result<T, MockError> {
    let url = format!("{base_url}{path}");
    tracing::debug!(url = %url, "Calling store mock server");

    let response = client.get(&url).query(params).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MockError::Server {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    // The mock server marshals an empty result as `null`.
    #[serde(default)]
    products: Option<Vec<ProductRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProductRecord {
    #[serde(rename = "StoreID")]
    store_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    product_kind: String,
    is_in_user_collection: bool,
    expiration_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct JwtResponse {
    jwt: String,
}

#[derive(Debug, Deserialize)]
struct PurchaseResponse {
    status: String,
}

/// A product as described by the mock server.
#[derive(Debug, Clone)]
pub struct MockProduct {
    record: ProductRecord,
    client: Client,
    base_url: String,
}

impl MockProduct {
    /// The product title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.record.title
    }

    /// The product description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.record.description
    }

    /// The product kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.record.product_kind
    }
}

impl Product for MockProduct {
    fn store_id(&self) -> &str {
        &self.record.store_id
    }

    fn is_in_user_collection(&self) -> Result<bool> {
        Ok(self.record.is_in_user_collection)
    }

    fn current_expiration_date(&self) -> Result<DateTime<Utc>> {
        if !self.record.is_in_user_collection {
            return Err(StoreError::new(
                ErrorCode::Unsubscribed,
                format!("product ID: {}", self.record.store_id),
            ));
        }
        Ok(self.record.expiration_date)
    }

    fn prompt_user_for_purchase(&self, callback: StorePurchaseCallback) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!("Purchase requested outside of an async runtime");
            callback(StorePurchaseStatus::NetworkError, PURCHASE_TRANSPORT_ERROR);
            return;
        };

        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let id = self.record.store_id.clone();
        runtime.spawn(async move {
            let result: std::result::Result<PurchaseResponse, MockError> =
                get(&client, &base_url, PURCHASE_PATH, &[("id", id.as_str())]).await;
            match result {
                Ok(response) => callback(StorePurchaseStatus::from_name(&response.status), 0),
                Err(err) => {
                    tracing::warn!(error = %err, product_id = %id, "Purchase request failed");
                    callback(StorePurchaseStatus::NetworkError, PURCHASE_TRANSPORT_ERROR);
                }
            }
        });
    }
}

#[async_trait]
impl Context for MockContext {
    type Product = MockProduct;
    type Window = i32;

    async fn get_products(&self, kinds: &[String], ids: &[String]) -> Result<Vec<MockProduct>> {
        let params: Vec<(&str, &str)> = kinds
            .iter()
            .map(|k| ("kinds", k.as_str()))
            .chain(ids.iter().map(|id| ("ids", id.as_str())))
            .collect();

        let response: ProductsResponse = self.call(PRODUCTS_PATH, &params).await?;
        Ok(response
            .products
            .unwrap_or_default()
            .into_iter()
            .map(|record| MockProduct {
                record,
                client: self.client.clone(),
                base_url: self.base_url.clone(),
            })
            .collect())
    }

    async fn generate_user_jwt(&self, token: &str, user_id: &str) -> Result<String> {
        let mut params = vec![("serviceticket", token)];
        if !user_id.is_empty() {
            params.push(("publisheruserid", user_id));
        }

        let response: JwtResponse = self.call(GENERATE_USER_JWT_PATH, &params).await?;
        Ok(response.jwt)
    }

    async fn all_locally_authenticated_user_hashes(&self) -> Result<Vec<String>> {
        let response: UsersResponse = self.call(ALL_AUTHENTICATED_USERS_PATH, &[]).await?;
        // The mock reports account names; hash them like the real runtime does.
        Ok(response
            .users
            .unwrap_or_default()
            .iter()
            .filter(|name| !name.is_empty())
            .map(|name| sha256_hex(name))
            .collect())
    }

    fn init_dialogs(&mut self, _window: i32) -> Result<()> {
        Ok(())
    }
}
