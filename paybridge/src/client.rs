//! The provider-agnostic facade applications call.
//!
//! [`Paybridge`] owns exactly one boxed [`Provider`] resolved from the
//! process-wide registry (or injected directly) and wraps every operation
//! in the uniform [`ApiResponse`] envelope: provider results pass through
//! on success, provider errors are classified into [`PaymentError`] and
//! surfaced as a failure envelope instead of propagating. The two
//! exceptions are webhook parsing, which returns the classified error
//! itself so handlers can branch on its kind, and the boolean probes
//! (`health_check`, `verify_webhook`), which swallow failures into `false`.

use std::fmt;

use crate::config::{BridgeConfig, ProviderConfig};
use crate::error::{self, BoxError, PaymentError};
use crate::provider::{
    CatalogOps, CustomerOps, DisputeOps, InvoiceOps, PaymentIntentOps, PaymentMethodOps, Provider,
    RefundOps, SubscriptionOps, UsageOps, WebhookOps,
};
use crate::registry::{self, ProviderFactory, RegistryError};
use crate::types::{
    AiUsageMetrics, ApiResponse, CreateCustomerRequest, CreateInvoiceRequest,
    CreatePaymentIntentRequest, CreatePaymentMethodRequest, CreatePriceRequest,
    CreateProductRequest, CreateRefundRequest, CreateSubscriptionRequest, Customer,
    CustomerListQuery, Dispute, DisputeListQuery, Invoice, InvoiceListQuery, ListOutput, ListPage,
    PaymentIntent, PaymentIntentListQuery, PaymentMethod, Price, PriceListQuery, Product,
    ProductListQuery, Refund, RefundListQuery, Subscription, SubscriptionListQuery,
    UpdateCustomerRequest, UpdateInvoiceRequest, UpdatePaymentIntentRequest,
    UpdatePaymentMethodRequest, UpdatePriceRequest, UpdateProductRequest,
    UpdateSubscriptionRequest, UsageMetrics, UsagePeriod, WebhookEvent,
};

/// Single entry point for all payment operations.
pub struct Paybridge {
    provider: Box<dyn Provider>,
    config: BridgeConfig,
}

impl fmt::Debug for Paybridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paybridge")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Paybridge {
    /// Constructs the facade by resolving `config.provider.provider` in the
    /// process-wide registry.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] when no provider is registered under the
    /// configured name; [`RegistryError::Build`] when the factory rejects
    /// the configuration.
    pub fn try_new(config: BridgeConfig) -> Result<Self, RegistryError> {
        let provider =
            registry::shared_read().create(&config.provider.provider, &config.provider)?;
        tracing::debug!(provider = provider.name(), "facade constructed");
        Ok(Self { provider, config })
    }

    /// Constructs the facade around an already-built provider, bypassing
    /// the registry.
    #[must_use]
    pub fn with_provider(config: BridgeConfig, provider: Box<dyn Provider>) -> Self {
        Self { provider, config }
    }

    /// Registers a provider factory in the process-wide registry.
    pub fn register_provider<F>(name: impl Into<String>, factory: F)
    where
        F: ProviderFactory + 'static,
    {
        registry::shared_write().register(name, factory);
    }

    /// Removes a registration from the process-wide registry; returns
    /// whether an entry existed.
    pub fn unregister_provider(name: &str) -> bool {
        registry::shared_write().unregister(name)
    }

    /// Lists the names registered in the process-wide registry, in
    /// registration order.
    #[must_use]
    pub fn registered_providers() -> Vec<String> {
        registry::shared_read().list()
    }

    /// Constructs a bare provider from the process-wide registry without
    /// wrapping it in a facade.
    ///
    /// # Errors
    ///
    /// Same conditions as [`try_new`](Self::try_new).
    pub fn create_provider(
        name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn Provider>, RegistryError> {
        registry::shared_read().create(name, config)
    }

    /// The active provider's registered name.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The configuration this facade was built from.
    #[must_use]
    pub const fn config(&self) -> &BridgeConfig {
        &self.config
    }

    fn classify(&self, err: BoxError) -> PaymentError {
        let classified = error::classify(err, self.provider.name());
        tracing::warn!(
            provider = self.provider.name(),
            code = classified.code(),
            error = %classified,
            "provider operation failed"
        );
        classified
    }

    fn envelope<T>(&self, result: Result<T, BoxError>) -> ApiResponse<T> {
        match result {
            Ok(value) => ApiResponse::ok(value),
            Err(err) => ApiResponse::err(self.classify(err).to_string()),
        }
    }

    fn envelope_list<T>(&self, result: Result<Vec<T>, BoxError>) -> ApiResponse<Vec<T>> {
        match result {
            Ok(items) => ApiResponse::ok(items),
            Err(err) => ApiResponse::err_empty(self.classify(err).to_string()),
        }
    }

    fn envelope_page<T>(
        &self,
        result: Result<ListOutput<T>, BoxError>,
    ) -> ApiResponse<ListPage<T>> {
        match result {
            Ok(output) => ApiResponse::ok(output.into_page()),
            Err(err) => ApiResponse {
                data: Some(ListPage::default()),
                ..ApiResponse::err(self.classify(err).to_string())
            },
        }
    }

    // Customers

    /// Creates a customer.
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> ApiResponse<Customer> {
        self.envelope(self.provider.create_customer(request).await)
    }

    /// Retrieves a customer by id.
    pub async fn get_customer(&self, id: &str) -> ApiResponse<Customer> {
        self.envelope(self.provider.retrieve_customer(id).await)
    }

    /// Updates a customer.
    pub async fn update_customer(
        &self,
        id: &str,
        request: UpdateCustomerRequest,
    ) -> ApiResponse<Customer> {
        self.envelope(self.provider.update_customer(id, request).await)
    }

    /// Deletes a customer.
    pub async fn delete_customer(&self, id: &str) -> ApiResponse<()> {
        self.envelope(self.provider.delete_customer(id).await)
    }

    /// Lists customers as a normalized page.
    pub async fn list_customers(&self, query: CustomerListQuery) -> ApiResponse<ListPage<Customer>> {
        self.envelope_page(self.provider.list_customers(query).await)
    }

    // Payment methods

    /// Creates a payment method from a provider token.
    pub async fn create_payment_method(
        &self,
        request: CreatePaymentMethodRequest,
    ) -> ApiResponse<PaymentMethod> {
        self.envelope(self.provider.create_payment_method(request).await)
    }

    /// Retrieves a payment method by id.
    pub async fn get_payment_method(&self, id: &str) -> ApiResponse<PaymentMethod> {
        self.envelope(self.provider.retrieve_payment_method(id).await)
    }

    /// Updates a payment method.
    pub async fn update_payment_method(
        &self,
        id: &str,
        request: UpdatePaymentMethodRequest,
    ) -> ApiResponse<PaymentMethod> {
        self.envelope(self.provider.update_payment_method(id, request).await)
    }

    /// Lists a customer's payment methods.
    pub async fn list_payment_methods(
        &self,
        customer_id: &str,
    ) -> ApiResponse<Vec<PaymentMethod>> {
        self.envelope_list(self.provider.list_payment_methods(customer_id).await)
    }

    /// Attaches an existing payment method to a customer.
    pub async fn attach_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> ApiResponse<PaymentMethod> {
        self.envelope(
            self.provider
                .attach_payment_method(customer_id, payment_method_id)
                .await,
        )
    }

    /// Detaches a payment method from its customer.
    pub async fn detach_payment_method(&self, payment_method_id: &str) -> ApiResponse<()> {
        self.envelope(self.provider.detach_payment_method(payment_method_id).await)
    }

    /// Marks a payment method as the customer's default.
    pub async fn set_default_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> ApiResponse<PaymentMethod> {
        self.envelope(
            self.provider
                .set_default_payment_method(customer_id, payment_method_id)
                .await,
        )
    }

    // Catalog

    /// Creates a product.
    pub async fn create_product(&self, request: CreateProductRequest) -> ApiResponse<Product> {
        self.envelope(self.provider.create_product(request).await)
    }

    /// Retrieves a product by id.
    pub async fn get_product(&self, id: &str) -> ApiResponse<Product> {
        self.envelope(self.provider.retrieve_product(id).await)
    }

    /// Updates a product.
    pub async fn update_product(
        &self,
        id: &str,
        request: UpdateProductRequest,
    ) -> ApiResponse<Product> {
        self.envelope(self.provider.update_product(id, request).await)
    }

    /// Lists products.
    pub async fn list_products(&self, query: ProductListQuery) -> ApiResponse<Vec<Product>> {
        self.envelope_list(self.provider.list_products(query).await)
    }

    /// Creates a price for a product.
    pub async fn create_price(&self, request: CreatePriceRequest) -> ApiResponse<Price> {
        self.envelope(self.provider.create_price(request).await)
    }

    /// Retrieves a price by id.
    pub async fn get_price(&self, id: &str) -> ApiResponse<Price> {
        self.envelope(self.provider.retrieve_price(id).await)
    }

    /// Updates a price.
    pub async fn update_price(&self, id: &str, request: UpdatePriceRequest) -> ApiResponse<Price> {
        self.envelope(self.provider.update_price(id, request).await)
    }

    /// Lists prices.
    pub async fn list_prices(&self, query: PriceListQuery) -> ApiResponse<Vec<Price>> {
        self.envelope_list(self.provider.list_prices(query).await)
    }

    // Payment intents

    /// Creates a payment intent.
    pub async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> ApiResponse<PaymentIntent> {
        self.envelope(self.provider.create_payment_intent(request).await)
    }

    /// Retrieves a payment intent by id.
    pub async fn get_payment_intent(&self, id: &str) -> ApiResponse<PaymentIntent> {
        self.envelope(self.provider.retrieve_payment_intent(id).await)
    }

    /// Updates a payment intent.
    pub async fn update_payment_intent(
        &self,
        id: &str,
        request: UpdatePaymentIntentRequest,
    ) -> ApiResponse<PaymentIntent> {
        self.envelope(self.provider.update_payment_intent(id, request).await)
    }

    /// Confirms a payment intent, optionally attaching a payment method.
    pub async fn confirm_payment_intent(
        &self,
        id: &str,
        payment_method_id: Option<&str>,
    ) -> ApiResponse<PaymentIntent> {
        self.envelope(
            self.provider
                .confirm_payment_intent(id, payment_method_id)
                .await,
        )
    }

    /// Captures an authorized payment intent, optionally for a partial
    /// amount in minor units.
    pub async fn capture_payment_intent(
        &self,
        id: &str,
        amount: Option<i64>,
    ) -> ApiResponse<PaymentIntent> {
        self.envelope(self.provider.capture_payment_intent(id, amount).await)
    }

    /// Cancels a payment intent.
    pub async fn cancel_payment_intent(&self, id: &str) -> ApiResponse<PaymentIntent> {
        self.envelope(self.provider.cancel_payment_intent(id).await)
    }

    /// Lists payment intents as a normalized page.
    pub async fn list_payment_intents(
        &self,
        query: PaymentIntentListQuery,
    ) -> ApiResponse<ListPage<PaymentIntent>> {
        self.envelope_page(self.provider.list_payment_intents(query).await)
    }

    // Subscriptions

    /// Creates a subscription.
    pub async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> ApiResponse<Subscription> {
        self.envelope(self.provider.create_subscription(request).await)
    }

    /// Retrieves a subscription by id.
    pub async fn get_subscription(&self, id: &str) -> ApiResponse<Subscription> {
        self.envelope(self.provider.retrieve_subscription(id).await)
    }

    /// Updates a subscription.
    pub async fn update_subscription(
        &self,
        id: &str,
        request: UpdateSubscriptionRequest,
    ) -> ApiResponse<Subscription> {
        self.envelope(self.provider.update_subscription(id, request).await)
    }

    /// Cancels a subscription.
    pub async fn cancel_subscription(&self, id: &str) -> ApiResponse<Subscription> {
        self.envelope(self.provider.cancel_subscription(id).await)
    }

    /// Lists subscriptions as a normalized page.
    pub async fn list_subscriptions(
        &self,
        query: SubscriptionListQuery,
    ) -> ApiResponse<ListPage<Subscription>> {
        self.envelope_page(self.provider.list_subscriptions(query).await)
    }

    // Invoices

    /// Creates a draft invoice.
    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> ApiResponse<Invoice> {
        self.envelope(self.provider.create_invoice(request).await)
    }

    /// Retrieves an invoice by id.
    pub async fn get_invoice(&self, id: &str) -> ApiResponse<Invoice> {
        self.envelope(self.provider.retrieve_invoice(id).await)
    }

    /// Updates an invoice.
    pub async fn update_invoice(
        &self,
        id: &str,
        request: UpdateInvoiceRequest,
    ) -> ApiResponse<Invoice> {
        self.envelope(self.provider.update_invoice(id, request).await)
    }

    /// Finalizes a draft invoice, making it open for payment.
    pub async fn finalize_invoice(&self, id: &str) -> ApiResponse<Invoice> {
        self.envelope(self.provider.finalize_invoice(id).await)
    }

    /// Pays an open invoice, optionally with a specific payment method.
    pub async fn pay_invoice(
        &self,
        id: &str,
        payment_method_id: Option<&str>,
    ) -> ApiResponse<Invoice> {
        self.envelope(self.provider.pay_invoice(id, payment_method_id).await)
    }

    /// Lists invoices as a normalized page.
    pub async fn list_invoices(&self, query: InvoiceListQuery) -> ApiResponse<ListPage<Invoice>> {
        self.envelope_page(self.provider.list_invoices(query).await)
    }

    // Refunds and disputes

    /// Creates a refund against a payment.
    pub async fn create_refund(&self, request: CreateRefundRequest) -> ApiResponse<Refund> {
        self.envelope(self.provider.create_refund(request).await)
    }

    /// Retrieves a refund by id.
    pub async fn get_refund(&self, id: &str) -> ApiResponse<Refund> {
        self.envelope(self.provider.retrieve_refund(id).await)
    }

    /// Lists refunds.
    pub async fn list_refunds(&self, query: RefundListQuery) -> ApiResponse<Vec<Refund>> {
        self.envelope_list(self.provider.list_refunds(query).await)
    }

    /// Retrieves a dispute by id.
    pub async fn get_dispute(&self, id: &str) -> ApiResponse<Dispute> {
        self.envelope(self.provider.retrieve_dispute(id).await)
    }

    /// Lists disputes.
    pub async fn list_disputes(&self, query: DisputeListQuery) -> ApiResponse<Vec<Dispute>> {
        self.envelope_list(self.provider.list_disputes(query).await)
    }

    // Usage

    /// Records a usage counter.
    pub async fn track_usage(&self, metrics: UsageMetrics) -> ApiResponse<()> {
        self.envelope(self.provider.track_usage(metrics).await)
    }

    /// Records AI token usage.
    pub async fn track_ai_usage(&self, metrics: AiUsageMetrics) -> ApiResponse<()> {
        self.envelope(self.provider.track_ai_usage(metrics).await)
    }

    /// Retrieves usage counters for a customer and feature.
    pub async fn usage_metrics(
        &self,
        customer_id: &str,
        feature_id: &str,
        period: UsagePeriod,
    ) -> ApiResponse<Vec<UsageMetrics>> {
        self.envelope_list(
            self.provider
                .usage_metrics(customer_id, feature_id, period)
                .await,
        )
    }

    /// Retrieves AI usage, optionally narrowed to one model and window.
    pub async fn ai_usage_metrics(
        &self,
        customer_id: &str,
        model_id: Option<&str>,
        period: Option<UsagePeriod>,
    ) -> ApiResponse<Vec<AiUsageMetrics>> {
        self.envelope_list(
            self.provider
                .ai_usage_metrics(customer_id, model_id, period)
                .await,
        )
    }

    // Webhooks and liveness

    /// Verifies a webhook payload's signature against the configured
    /// secret.
    ///
    /// Never fails: a missing secret or a provider error both yield
    /// `false`, with a diagnostic when `debug` is enabled.
    pub async fn verify_webhook(&self, payload: &str, signature: &str) -> bool {
        let Some(secret) = self.config.provider.webhook_secret.as_deref() else {
            if self.config.debug {
                tracing::warn!(
                    provider = self.provider.name(),
                    "webhook verification without a configured secret"
                );
            }
            return false;
        };
        match self.provider.verify_webhook(payload, signature, secret).await {
            Ok(valid) => valid,
            Err(err) => {
                if self.config.debug {
                    tracing::warn!(
                        provider = self.provider.name(),
                        error = %err,
                        "webhook verification failed"
                    );
                }
                false
            }
        }
    }

    /// Verifies and parses a webhook payload into a normalized event.
    ///
    /// # Errors
    ///
    /// The classified [`PaymentError`]; an invalid signature surfaces as
    /// [`PaymentError::Webhook`] so handlers can reject the delivery.
    pub async fn parse_webhook(
        &self,
        payload: &str,
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        let secret = self
            .config
            .provider
            .webhook_secret
            .as_deref()
            .ok_or_else(|| {
                PaymentError::webhook("Webhook secret is not configured")
                    .with_provider(self.provider.name())
            })?;
        self.provider
            .parse_webhook(payload, signature, secret)
            .await
            .map_err(|err| self.classify(err))
    }

    /// Reports whether the provider is reachable and credentialed.
    ///
    /// Never fails: provider errors yield `false`, with a diagnostic when
    /// `debug` is enabled.
    pub async fn health_check(&self) -> bool {
        match self.provider.health_check().await {
            Ok(healthy) => healthy,
            Err(err) => {
                if self.config.debug {
                    tracing::warn!(
                        provider = self.provider.name(),
                        error = %err,
                        "health check failed"
                    );
                }
                false
            }
        }
    }
}
