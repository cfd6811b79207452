use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::PaymentError;
use crate::types::{CustomerResponse, ErrorResponse, NewCustomer, PaymentIntentResponse};

const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

/// Operations the checkout flow needs from a payment processor
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Register a customer, returning the processor's customer id
    async fn create_customer(&self, customer: &NewCustomer) -> crate::Result<String>;

    /// Open a payment intent for `amount` in the currency's minor units,
    /// returning the client secret
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        customer_id: &str,
    ) -> crate::Result<String>;
}

/// Stripe REST API client
pub struct StripeClient {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: &str) -> crate::Result<Self> {
        Self::with_base_url(secret_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom API root, e.g. a local mock
    pub fn with_base_url(secret_key: &str, base_url: &str) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(String, String)],
    ) -> crate::Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(fields)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => None,
            }
            .unwrap_or_else(|| format!("request to {path} failed"));
            warn!(status = status.as_u16(), %message, "Payment API request failed");
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_customer(&self, customer: &NewCustomer) -> crate::Result<String> {
        let created: CustomerResponse = self
            .post_form("/v1/customers", &customer.form_fields())
            .await?;
        debug!(customer_id = %created.id, "Created payment customer");
        Ok(created.id)
    }

    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        customer_id: &str,
    ) -> crate::Result<String> {
        let fields = [
            ("amount".to_string(), amount.to_string()),
            ("currency".to_string(), currency.to_string()),
            ("customer".to_string(), customer_id.to_string()),
        ];
        let intent: PaymentIntentResponse =
            self.post_form("/v1/payment_intents", &fields).await?;
        intent.client_secret.ok_or(PaymentError::MissingClientSecret)
    }
}
