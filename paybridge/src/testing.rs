//! Configurable stub provider shared by the unit tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;

use crate::config::ProviderConfig;
use crate::error::{BoxError, ProviderFailure};
use crate::provider::{
    CatalogOps, CustomerOps, DisputeOps, InvoiceOps, PaymentIntentOps, PaymentMethodOps, Provider,
    RefundOps, SubscriptionOps, UsageOps, WebhookOps,
};
use crate::types::{
    AiUsageMetrics, CaptureMethod, CreateCustomerRequest, CreateInvoiceRequest,
    CreatePaymentIntentRequest, CreatePaymentMethodRequest, CreatePriceRequest,
    CreateProductRequest, CreateRefundRequest, CreateSubscriptionRequest, Customer,
    CustomerListQuery, Dispute, DisputeListQuery, Invoice, InvoiceListQuery, InvoiceStatus,
    ListOutput, ListPage, PaymentIntent, PaymentIntentListQuery, PaymentIntentStatus,
    PaymentMethod, PaymentMethodType, Price, PriceListQuery, Product, ProductListQuery, Refund,
    RefundListQuery, RefundStatus, Subscription, SubscriptionListQuery, SubscriptionStatus,
    UpdateCustomerRequest, UpdateInvoiceRequest, UpdatePaymentIntentRequest,
    UpdatePaymentMethodRequest, UpdatePriceRequest, UpdateProductRequest,
    UpdateSubscriptionRequest, UsageMetrics, UsagePeriod, WebhookEvent,
};

/// How the stub should fail, when it fails.
#[derive(Clone)]
pub(crate) enum StubFailure {
    /// Plain error carrying only a message (no status, no code).
    Message(String),
    /// HTTP-shaped failure with a status code.
    Status(u16),
}

impl StubFailure {
    fn to_error(&self) -> BoxError {
        match self {
            Self::Message(message) => Box::new(ProviderFailure::new(message.clone())),
            Self::Status(status) => {
                Box::new(ProviderFailure::new("stub failure").with_status(*status))
            }
        }
    }
}

/// A canned provider for exercising the facade and registry.
///
/// With no failure configured, every operation succeeds with a fixed
/// entity; list operations return either the bare-array or page shape
/// depending on `list_as_page`.
#[derive(Default)]
pub(crate) struct StubProvider {
    pub fail: Option<StubFailure>,
    pub list_as_page: bool,
}

impl StubProvider {
    pub fn failing_with(message: &str) -> Self {
        Self {
            fail: Some(StubFailure::Message(message.to_owned())),
            list_as_page: false,
        }
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self {
            fail: Some(StubFailure::Status(status)),
            list_as_page: false,
        }
    }

    fn check(&self) -> Result<(), BoxError> {
        match &self.fail {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn list_of<T>(&self, items: Vec<T>) -> ListOutput<T> {
        if self.list_as_page {
            ListOutput::Page(ListPage {
                has_more: true,
                total_count: Some(42),
                next_cursor: Some("cur_next".to_owned()),
                ..ListPage::from_items(items)
            })
        } else {
            ListOutput::Items(items)
        }
    }
}

pub(crate) fn sample_customer(id: &str, email: Option<String>) -> Customer {
    let now = Utc::now();
    Customer {
        id: id.to_owned(),
        email,
        name: None,
        phone: None,
        description: None,
        metadata: None,
        created: now,
        updated: now,
        deleted: None,
        provider: "stub".to_owned(),
        provider_id: id.to_owned(),
    }
}

fn sample_payment_method(id: &str, customer_id: &str) -> PaymentMethod {
    let now = Utc::now();
    PaymentMethod {
        id: id.to_owned(),
        customer_id: customer_id.to_owned(),
        method_type: PaymentMethodType::Card,
        brand: Some("visa".to_owned()),
        last4: Some("4242".to_owned()),
        expiry_month: Some(12),
        expiry_year: Some(2030),
        is_default: false,
        metadata: None,
        created: now,
        updated: now,
        provider: "stub".to_owned(),
        provider_id: id.to_owned(),
    }
}

fn sample_intent(id: &str, customer_id: &str, amount: i64) -> PaymentIntent {
    let now = Utc::now();
    PaymentIntent {
        id: id.to_owned(),
        customer_id: customer_id.to_owned(),
        amount,
        currency: "usd".to_owned(),
        status: PaymentIntentStatus::RequiresPaymentMethod,
        client_secret: None,
        description: None,
        metadata: None,
        payment_method_id: None,
        receipt_email: None,
        created: now,
        updated: now,
        provider: "stub".to_owned(),
        provider_id: id.to_owned(),
    }
}

fn sample_subscription(id: &str, customer_id: &str) -> Subscription {
    let now = Utc::now();
    Subscription {
        id: id.to_owned(),
        customer_id: customer_id.to_owned(),
        status: SubscriptionStatus::Active,
        current_period_start: now,
        current_period_end: now,
        cancel_at_period_end: false,
        canceled_at: None,
        trial_start: None,
        trial_end: None,
        metadata: None,
        created: now,
        updated: now,
        provider: "stub".to_owned(),
        provider_id: id.to_owned(),
    }
}

fn sample_invoice(id: &str, customer_id: &str, amount: i64) -> Invoice {
    let now = Utc::now();
    Invoice {
        id: id.to_owned(),
        customer_id: customer_id.to_owned(),
        subscription_id: None,
        status: InvoiceStatus::Draft,
        amount,
        currency: "usd".to_owned(),
        amount_paid: 0,
        amount_due: amount,
        subtotal: amount,
        tax: 0,
        total: amount,
        description: None,
        hosted_invoice_url: None,
        invoice_pdf: None,
        metadata: None,
        created: now,
        updated: now,
        due_date: None,
        paid_at: None,
        provider: "stub".to_owned(),
        provider_id: id.to_owned(),
    }
}

fn sample_refund(id: &str, payment_id: &str, amount: i64) -> Refund {
    let now = Utc::now();
    Refund {
        id: id.to_owned(),
        payment_id: payment_id.to_owned(),
        amount,
        currency: "usd".to_owned(),
        status: RefundStatus::Succeeded,
        reason: None,
        description: None,
        metadata: None,
        created: now,
        updated: now,
        provider: "stub".to_owned(),
        provider_id: id.to_owned(),
    }
}

fn sample_product(id: &str, name: &str) -> Product {
    let now = Utc::now();
    Product {
        id: id.to_owned(),
        name: name.to_owned(),
        description: None,
        metadata: None,
        created: now,
        updated: now,
        provider: "stub".to_owned(),
        provider_id: id.to_owned(),
    }
}

fn sample_price(id: &str, product_id: &str, amount: i64) -> Price {
    let now = Utc::now();
    Price {
        id: id.to_owned(),
        product_id: product_id.to_owned(),
        amount,
        currency: "usd".to_owned(),
        interval: None,
        interval_count: None,
        metadata: None,
        created: now,
        updated: now,
        provider: "stub".to_owned(),
        provider_id: id.to_owned(),
    }
}

#[async_trait]
impl CustomerOps for StubProvider {
    async fn create_customer(&self, request: CreateCustomerRequest) -> Result<Customer, BoxError> {
        self.check()?;
        Ok(sample_customer("cus_1", request.email))
    }
    async fn retrieve_customer(&self, id: &str) -> Result<Customer, BoxError> {
        self.check()?;
        Ok(sample_customer(id, Some("test@example.com".to_owned())))
    }
    async fn update_customer(
        &self,
        id: &str,
        request: UpdateCustomerRequest,
    ) -> Result<Customer, BoxError> {
        self.check()?;
        let mut customer = sample_customer(id, request.email);
        customer.name = request.name;
        Ok(customer)
    }
    async fn delete_customer(&self, _id: &str) -> Result<(), BoxError> {
        self.check()
    }
    async fn list_customers(
        &self,
        _query: CustomerListQuery,
    ) -> Result<ListOutput<Customer>, BoxError> {
        self.check()?;
        Ok(self.list_of(vec![sample_customer("cus_1", None)]))
    }
}

#[async_trait]
impl PaymentMethodOps for StubProvider {
    async fn create_payment_method(
        &self,
        request: CreatePaymentMethodRequest,
    ) -> Result<PaymentMethod, BoxError> {
        self.check()?;
        Ok(sample_payment_method("pm_1", &request.customer_id))
    }
    async fn retrieve_payment_method(&self, id: &str) -> Result<PaymentMethod, BoxError> {
        self.check()?;
        Ok(sample_payment_method(id, "cus_1"))
    }
    async fn update_payment_method(
        &self,
        id: &str,
        _request: UpdatePaymentMethodRequest,
    ) -> Result<PaymentMethod, BoxError> {
        self.check()?;
        Ok(sample_payment_method(id, "cus_1"))
    }
    async fn list_payment_methods(&self, customer_id: &str) -> Result<Vec<PaymentMethod>, BoxError> {
        self.check()?;
        Ok(vec![sample_payment_method("pm_1", customer_id)])
    }
    async fn attach_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, BoxError> {
        self.check()?;
        Ok(sample_payment_method(payment_method_id, customer_id))
    }
    async fn detach_payment_method(&self, _payment_method_id: &str) -> Result<(), BoxError> {
        self.check()
    }
    async fn set_default_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, BoxError> {
        self.check()?;
        let mut method = sample_payment_method(payment_method_id, customer_id);
        method.is_default = true;
        Ok(method)
    }
}

#[async_trait]
impl CatalogOps for StubProvider {
    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, BoxError> {
        self.check()?;
        Ok(sample_product("prod_1", &request.name))
    }
    async fn retrieve_product(&self, id: &str) -> Result<Product, BoxError> {
        self.check()?;
        Ok(sample_product(id, "Widget"))
    }
    async fn update_product(
        &self,
        id: &str,
        request: UpdateProductRequest,
    ) -> Result<Product, BoxError> {
        self.check()?;
        Ok(sample_product(id, request.name.as_deref().unwrap_or("Widget")))
    }
    async fn list_products(&self, _query: ProductListQuery) -> Result<Vec<Product>, BoxError> {
        self.check()?;
        Ok(vec![sample_product("prod_1", "Widget")])
    }
    async fn create_price(&self, request: CreatePriceRequest) -> Result<Price, BoxError> {
        self.check()?;
        Ok(sample_price("price_1", &request.product_id, request.amount))
    }
    async fn retrieve_price(&self, id: &str) -> Result<Price, BoxError> {
        self.check()?;
        Ok(sample_price(id, "prod_1", 500))
    }
    async fn update_price(&self, id: &str, _request: UpdatePriceRequest) -> Result<Price, BoxError> {
        self.check()?;
        Ok(sample_price(id, "prod_1", 500))
    }
    async fn list_prices(&self, _query: PriceListQuery) -> Result<Vec<Price>, BoxError> {
        self.check()?;
        Ok(vec![sample_price("price_1", "prod_1", 500)])
    }
}

#[async_trait]
impl PaymentIntentOps for StubProvider {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, BoxError> {
        self.check()?;
        let mut intent = sample_intent("pi_1", &request.customer_id, request.amount);
        if request.capture_method == CaptureMethod::Manual {
            intent.status = PaymentIntentStatus::RequiresConfirmation;
        }
        Ok(intent)
    }
    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, BoxError> {
        self.check()?;
        Ok(sample_intent(id, "cus_1", 1000))
    }
    async fn update_payment_intent(
        &self,
        id: &str,
        request: UpdatePaymentIntentRequest,
    ) -> Result<PaymentIntent, BoxError> {
        self.check()?;
        let mut intent = sample_intent(id, "cus_1", request.amount.unwrap_or(1000));
        intent.description = request.description;
        Ok(intent)
    }
    async fn confirm_payment_intent(
        &self,
        id: &str,
        payment_method_id: Option<&str>,
    ) -> Result<PaymentIntent, BoxError> {
        self.check()?;
        let mut intent = sample_intent(id, "cus_1", 1000);
        intent.status = PaymentIntentStatus::Succeeded;
        intent.payment_method_id = payment_method_id.map(str::to_owned);
        Ok(intent)
    }
    async fn capture_payment_intent(
        &self,
        id: &str,
        amount: Option<i64>,
    ) -> Result<PaymentIntent, BoxError> {
        self.check()?;
        let mut intent = sample_intent(id, "cus_1", amount.unwrap_or(1000));
        intent.status = PaymentIntentStatus::Succeeded;
        Ok(intent)
    }
    async fn cancel_payment_intent(&self, id: &str) -> Result<PaymentIntent, BoxError> {
        self.check()?;
        let mut intent = sample_intent(id, "cus_1", 1000);
        intent.status = PaymentIntentStatus::Canceled;
        Ok(intent)
    }
    async fn list_payment_intents(
        &self,
        _query: PaymentIntentListQuery,
    ) -> Result<ListOutput<PaymentIntent>, BoxError> {
        self.check()?;
        Ok(self.list_of(vec![sample_intent("pi_1", "cus_1", 1000)]))
    }
}

#[async_trait]
impl SubscriptionOps for StubProvider {
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, BoxError> {
        self.check()?;
        Ok(sample_subscription("sub_1", &request.customer_id))
    }
    async fn retrieve_subscription(&self, id: &str) -> Result<Subscription, BoxError> {
        self.check()?;
        Ok(sample_subscription(id, "cus_1"))
    }
    async fn update_subscription(
        &self,
        id: &str,
        request: UpdateSubscriptionRequest,
    ) -> Result<Subscription, BoxError> {
        self.check()?;
        let mut subscription = sample_subscription(id, "cus_1");
        if let Some(flag) = request.cancel_at_period_end {
            subscription.cancel_at_period_end = flag;
        }
        Ok(subscription)
    }
    async fn cancel_subscription(&self, id: &str) -> Result<Subscription, BoxError> {
        self.check()?;
        let mut subscription = sample_subscription(id, "cus_1");
        subscription.status = SubscriptionStatus::Canceled;
        Ok(subscription)
    }
    async fn list_subscriptions(
        &self,
        _query: SubscriptionListQuery,
    ) -> Result<ListOutput<Subscription>, BoxError> {
        self.check()?;
        Ok(self.list_of(vec![sample_subscription("sub_1", "cus_1")]))
    }
}

#[async_trait]
impl InvoiceOps for StubProvider {
    async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<Invoice, BoxError> {
        self.check()?;
        Ok(sample_invoice("in_1", &request.customer_id, request.amount))
    }
    async fn retrieve_invoice(&self, id: &str) -> Result<Invoice, BoxError> {
        self.check()?;
        Ok(sample_invoice(id, "cus_1", 1000))
    }
    async fn update_invoice(
        &self,
        id: &str,
        _request: UpdateInvoiceRequest,
    ) -> Result<Invoice, BoxError> {
        self.check()?;
        Ok(sample_invoice(id, "cus_1", 1000))
    }
    async fn finalize_invoice(&self, id: &str) -> Result<Invoice, BoxError> {
        self.check()?;
        let mut invoice = sample_invoice(id, "cus_1", 1000);
        invoice.status = InvoiceStatus::Open;
        Ok(invoice)
    }
    async fn pay_invoice(
        &self,
        id: &str,
        _payment_method_id: Option<&str>,
    ) -> Result<Invoice, BoxError> {
        self.check()?;
        let mut invoice = sample_invoice(id, "cus_1", 1000);
        invoice.status = InvoiceStatus::Paid;
        invoice.amount_paid = invoice.total;
        invoice.amount_due = 0;
        Ok(invoice)
    }
    async fn list_invoices(&self, _query: InvoiceListQuery) -> Result<ListOutput<Invoice>, BoxError> {
        self.check()?;
        Ok(self.list_of(vec![sample_invoice("in_1", "cus_1", 1000)]))
    }
}

#[async_trait]
impl RefundOps for StubProvider {
    async fn create_refund(&self, request: CreateRefundRequest) -> Result<Refund, BoxError> {
        self.check()?;
        Ok(sample_refund(
            "re_1",
            &request.payment_id,
            request.amount.unwrap_or(1000),
        ))
    }
    async fn retrieve_refund(&self, id: &str) -> Result<Refund, BoxError> {
        self.check()?;
        Ok(sample_refund(id, "pi_1", 1000))
    }
    async fn list_refunds(&self, _query: RefundListQuery) -> Result<Vec<Refund>, BoxError> {
        self.check()?;
        Ok(vec![sample_refund("re_1", "pi_1", 1000)])
    }
}

#[async_trait]
impl DisputeOps for StubProvider {
    async fn retrieve_dispute(&self, id: &str) -> Result<Dispute, BoxError> {
        self.check()?;
        Err(Box::new(
            ProviderFailure::new(format!("dispute {id} unknown")).with_status(404),
        ))
    }
    async fn list_disputes(&self, _query: DisputeListQuery) -> Result<Vec<Dispute>, BoxError> {
        self.check()?;
        Ok(Vec::new())
    }
}

#[async_trait]
impl WebhookOps for StubProvider {
    async fn verify_webhook(
        &self,
        _payload: &str,
        signature: &str,
        secret: &str,
    ) -> Result<bool, BoxError> {
        self.check()?;
        Ok(signature == secret)
    }
    async fn parse_webhook(
        &self,
        payload: &str,
        signature: &str,
        secret: &str,
    ) -> Result<WebhookEvent, BoxError> {
        self.check()?;
        if signature != secret {
            return Err(Box::new(
                ProviderFailure::new("signature mismatch").with_status(400),
            ));
        }
        let data: HashMap<String, serde_json::Value> = serde_json::from_str(payload)?;
        Ok(WebhookEvent {
            id: "evt_1".to_owned(),
            event_type: "test.event".to_owned(),
            data,
            created: Utc::now(),
            provider: "stub".to_owned(),
            livemode: false,
        })
    }
}

#[async_trait]
impl UsageOps for StubProvider {
    async fn track_usage(&self, _metrics: UsageMetrics) -> Result<(), BoxError> {
        self.check()
    }
    async fn track_ai_usage(&self, _metrics: AiUsageMetrics) -> Result<(), BoxError> {
        self.check()
    }
    async fn usage_metrics(
        &self,
        customer_id: &str,
        feature_id: &str,
        period: UsagePeriod,
    ) -> Result<Vec<UsageMetrics>, BoxError> {
        self.check()?;
        let now = Utc::now();
        Ok(vec![UsageMetrics {
            customer_id: customer_id.to_owned(),
            feature_id: feature_id.to_owned(),
            usage: 7,
            limit: None,
            period,
            start_date: now,
            end_date: now,
            metadata: None,
        }])
    }
    async fn ai_usage_metrics(
        &self,
        customer_id: &str,
        model_id: Option<&str>,
        _period: Option<UsagePeriod>,
    ) -> Result<Vec<AiUsageMetrics>, BoxError> {
        self.check()?;
        Ok(vec![AiUsageMetrics {
            customer_id: customer_id.to_owned(),
            model_id: model_id.unwrap_or("default-model").to_owned(),
            tokens: 30,
            input_tokens: 10,
            output_tokens: 20,
            cost: 3,
            timestamp: Utc::now(),
            metadata: None,
        }])
    }
}

#[async_trait]
impl Provider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }
    async fn health_check(&self) -> Result<bool, BoxError> {
        self.check()?;
        Ok(true)
    }
}

/// Closure-shaped factory for the stub.
pub(crate) fn stub_factory(_config: &ProviderConfig) -> Result<Box<dyn Provider>, BoxError> {
    Ok(Box::new(StubProvider::default()))
}
