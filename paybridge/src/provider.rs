//! The capability contract every payment backend implements.
//!
//! The contract is split into capability groups so backends can share and
//! test them independently; [`Provider`] composes the full set. The facade
//! holds exactly one `Box<dyn Provider>` and never branches on which
//! concrete backend is behind it.
//!
//! Every method returns `Result<_, BoxError>`: backends surface their
//! native SDK errors unchanged and the facade normalizes them through
//! [`classify`](crate::error::classify). No logic lives here, only
//! signatures.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::types::{
    AiUsageMetrics, CreateCustomerRequest, CreateInvoiceRequest, CreatePaymentIntentRequest,
    CreatePaymentMethodRequest, CreatePriceRequest, CreateProductRequest, CreateRefundRequest,
    CreateSubscriptionRequest, Customer, CustomerListQuery, Dispute, DisputeListQuery, Invoice,
    InvoiceListQuery, ListOutput, PaymentIntent, PaymentIntentListQuery, PaymentMethod, Price,
    PriceListQuery, Product, ProductListQuery, Refund, RefundListQuery, Subscription,
    SubscriptionListQuery, UpdateCustomerRequest, UpdateInvoiceRequest,
    UpdatePaymentIntentRequest, UpdatePaymentMethodRequest, UpdatePriceRequest,
    UpdateProductRequest, UpdateSubscriptionRequest, UsageMetrics, UsagePeriod, WebhookEvent,
};

/// Customer management.
#[async_trait]
pub trait CustomerOps: Send + Sync {
    /// Creates a customer.
    async fn create_customer(&self, request: CreateCustomerRequest) -> Result<Customer, BoxError>;

    /// Retrieves a customer by id.
    async fn retrieve_customer(&self, id: &str) -> Result<Customer, BoxError>;

    /// Updates a customer.
    async fn update_customer(
        &self,
        id: &str,
        request: UpdateCustomerRequest,
    ) -> Result<Customer, BoxError>;

    /// Deletes (or soft-deletes) a customer.
    async fn delete_customer(&self, id: &str) -> Result<(), BoxError>;

    /// Lists customers, in either bare-array or page form.
    async fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> Result<ListOutput<Customer>, BoxError>;
}

/// Payment method management, including default selection.
#[async_trait]
pub trait PaymentMethodOps: Send + Sync {
    /// Creates a payment method from a provider token.
    async fn create_payment_method(
        &self,
        request: CreatePaymentMethodRequest,
    ) -> Result<PaymentMethod, BoxError>;

    /// Retrieves a payment method by id.
    async fn retrieve_payment_method(&self, id: &str) -> Result<PaymentMethod, BoxError>;

    /// Updates a payment method.
    async fn update_payment_method(
        &self,
        id: &str,
        request: UpdatePaymentMethodRequest,
    ) -> Result<PaymentMethod, BoxError>;

    /// Lists a customer's payment methods.
    async fn list_payment_methods(&self, customer_id: &str)
    -> Result<Vec<PaymentMethod>, BoxError>;

    /// Attaches an existing payment method to a customer.
    async fn attach_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, BoxError>;

    /// Detaches a payment method from its customer.
    async fn detach_payment_method(&self, payment_method_id: &str) -> Result<(), BoxError>;

    /// Marks a payment method as the customer's default.
    ///
    /// The single-default-per-customer invariant is the provider's to
    /// enforce.
    async fn set_default_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, BoxError>;
}

/// Product and price catalog management.
#[async_trait]
pub trait CatalogOps: Send + Sync {
    /// Creates a product.
    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, BoxError>;

    /// Retrieves a product by id.
    async fn retrieve_product(&self, id: &str) -> Result<Product, BoxError>;

    /// Updates a product.
    async fn update_product(
        &self,
        id: &str,
        request: UpdateProductRequest,
    ) -> Result<Product, BoxError>;

    /// Lists products.
    async fn list_products(&self, query: ProductListQuery) -> Result<Vec<Product>, BoxError>;

    /// Creates a price for a product.
    async fn create_price(&self, request: CreatePriceRequest) -> Result<Price, BoxError>;

    /// Retrieves a price by id.
    async fn retrieve_price(&self, id: &str) -> Result<Price, BoxError>;

    /// Updates a price.
    async fn update_price(&self, id: &str, request: UpdatePriceRequest)
    -> Result<Price, BoxError>;

    /// Lists prices.
    async fn list_prices(&self, query: PriceListQuery) -> Result<Vec<Price>, BoxError>;
}

/// Payment intent lifecycle.
#[async_trait]
pub trait PaymentIntentOps: Send + Sync {
    /// Creates a payment intent.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, BoxError>;

    /// Retrieves a payment intent by id.
    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, BoxError>;

    /// Updates a payment intent.
    async fn update_payment_intent(
        &self,
        id: &str,
        request: UpdatePaymentIntentRequest,
    ) -> Result<PaymentIntent, BoxError>;

    /// Confirms a payment intent, optionally attaching a payment method.
    async fn confirm_payment_intent(
        &self,
        id: &str,
        payment_method_id: Option<&str>,
    ) -> Result<PaymentIntent, BoxError>;

    /// Captures an authorized payment intent, optionally for a partial
    /// amount in minor units.
    async fn capture_payment_intent(
        &self,
        id: &str,
        amount: Option<i64>,
    ) -> Result<PaymentIntent, BoxError>;

    /// Cancels a payment intent.
    async fn cancel_payment_intent(&self, id: &str) -> Result<PaymentIntent, BoxError>;

    /// Lists payment intents, in either bare-array or page form.
    async fn list_payment_intents(
        &self,
        query: PaymentIntentListQuery,
    ) -> Result<ListOutput<PaymentIntent>, BoxError>;
}

/// Subscription lifecycle.
#[async_trait]
pub trait SubscriptionOps: Send + Sync {
    /// Creates a subscription.
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, BoxError>;

    /// Retrieves a subscription by id.
    async fn retrieve_subscription(&self, id: &str) -> Result<Subscription, BoxError>;

    /// Updates a subscription.
    async fn update_subscription(
        &self,
        id: &str,
        request: UpdateSubscriptionRequest,
    ) -> Result<Subscription, BoxError>;

    /// Cancels a subscription.
    async fn cancel_subscription(&self, id: &str) -> Result<Subscription, BoxError>;

    /// Lists subscriptions, in either bare-array or page form.
    async fn list_subscriptions(
        &self,
        query: SubscriptionListQuery,
    ) -> Result<ListOutput<Subscription>, BoxError>;
}

/// Invoice lifecycle.
#[async_trait]
pub trait InvoiceOps: Send + Sync {
    /// Creates a draft invoice.
    async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<Invoice, BoxError>;

    /// Retrieves an invoice by id.
    async fn retrieve_invoice(&self, id: &str) -> Result<Invoice, BoxError>;

    /// Updates an invoice.
    async fn update_invoice(
        &self,
        id: &str,
        request: UpdateInvoiceRequest,
    ) -> Result<Invoice, BoxError>;

    /// Finalizes a draft invoice, making it open for payment.
    async fn finalize_invoice(&self, id: &str) -> Result<Invoice, BoxError>;

    /// Pays an open invoice, optionally with a specific payment method.
    async fn pay_invoice(
        &self,
        id: &str,
        payment_method_id: Option<&str>,
    ) -> Result<Invoice, BoxError>;

    /// Lists invoices, in either bare-array or page form.
    async fn list_invoices(
        &self,
        query: InvoiceListQuery,
    ) -> Result<ListOutput<Invoice>, BoxError>;
}

/// Refund management.
#[async_trait]
pub trait RefundOps: Send + Sync {
    /// Creates a refund against a payment.
    async fn create_refund(&self, request: CreateRefundRequest) -> Result<Refund, BoxError>;

    /// Retrieves a refund by id.
    async fn retrieve_refund(&self, id: &str) -> Result<Refund, BoxError>;

    /// Lists refunds.
    async fn list_refunds(&self, query: RefundListQuery) -> Result<Vec<Refund>, BoxError>;
}

/// Dispute (chargeback) access.
#[async_trait]
pub trait DisputeOps: Send + Sync {
    /// Retrieves a dispute by id.
    async fn retrieve_dispute(&self, id: &str) -> Result<Dispute, BoxError>;

    /// Lists disputes.
    async fn list_disputes(&self, query: DisputeListQuery) -> Result<Vec<Dispute>, BoxError>;
}

/// Webhook signature verification and parsing.
///
/// All cryptography belongs to the provider; this layer only shapes the
/// outcome.
#[async_trait]
pub trait WebhookOps: Send + Sync {
    /// Verifies a webhook payload's signature against a secret.
    async fn verify_webhook(
        &self,
        payload: &str,
        signature: &str,
        secret: &str,
    ) -> Result<bool, BoxError>;

    /// Verifies and parses a webhook payload into a normalized event.
    async fn parse_webhook(
        &self,
        payload: &str,
        signature: &str,
        secret: &str,
    ) -> Result<WebhookEvent, BoxError>;
}

/// Metered-usage tracking and retrieval.
#[async_trait]
pub trait UsageOps: Send + Sync {
    /// Records a usage counter.
    async fn track_usage(&self, metrics: UsageMetrics) -> Result<(), BoxError>;

    /// Records AI token usage.
    async fn track_ai_usage(&self, metrics: AiUsageMetrics) -> Result<(), BoxError>;

    /// Retrieves usage counters for a customer and feature.
    async fn usage_metrics(
        &self,
        customer_id: &str,
        feature_id: &str,
        period: UsagePeriod,
    ) -> Result<Vec<UsageMetrics>, BoxError>;

    /// Retrieves AI usage, optionally narrowed to one model and window.
    async fn ai_usage_metrics(
        &self,
        customer_id: &str,
        model_id: Option<&str>,
        period: Option<UsagePeriod>,
    ) -> Result<Vec<AiUsageMetrics>, BoxError>;
}

/// The full provider contract: every capability group plus identity and
/// liveness.
#[async_trait]
pub trait Provider:
    CustomerOps
    + PaymentMethodOps
    + CatalogOps
    + PaymentIntentOps
    + SubscriptionOps
    + InvoiceOps
    + RefundOps
    + DisputeOps
    + WebhookOps
    + UsageOps
{
    /// The provider's registered name, recorded on classified errors.
    fn name(&self) -> &str;

    /// Reports whether the backend is reachable and credentialed.
    async fn health_check(&self) -> Result<bool, BoxError>;
}
