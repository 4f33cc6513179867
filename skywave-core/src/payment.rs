use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crate::CoreResult;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentStatus {
    Succeeded,
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentIntent {
    pub id: String, // Provider-style id, e.g. pi_3f2a...
    pub amount: i32,
    pub currency: String,
    pub payer_email: String,
    pub status: IntentStatus,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Authorize and capture `amount` in one step
    async fn charge(&self, amount: i32, currency: &str, payer_email: &str) -> CoreResult<PaymentIntent>;
}

/// Stand-in gateway. Approves every charge unless built with [`MockPaymentGateway::declining`].
pub struct MockPaymentGateway {
    approve: bool,
}

impl MockPaymentGateway {
    pub fn approving() -> Self {
        Self { approve: true }
    }

    pub fn declining() -> Self {
        Self { approve: false }
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::approving()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(&self, amount: i32, currency: &str, payer_email: &str) -> CoreResult<PaymentIntent> {
        let status = if self.approve && amount >= 0 {
            IntentStatus::Succeeded
        } else {
            IntentStatus::Declined
        };

        tracing::info!("Mock charge of {} {} for {}: {:?}", amount, currency, payer_email, status);

        Ok(PaymentIntent {
            id: format!("pi_{}", Uuid::new_v4().simple()),
            amount,
            currency: currency.to_string(),
            payer_email: payer_email.to_string(),
            status,
            created_at: Utc::now(),
        })
    }
}
