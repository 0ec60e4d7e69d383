#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! In-memory reference backend for paybridge.
//!
//! [`MemoryProvider`] implements the full capability contract against
//! process-local state. It exists for local development and integration
//! tests: everything the facade promises (envelope shapes, error
//! classification, lifecycle transitions) can be exercised without a
//! processor account.
//!
//! Records live in plain `Vec`s behind a mutex; lookups are linear, which
//! is fine at the data sizes a test touches. Identifiers are sequential
//! per entity kind (`cus_1`, `pi_1`, ...). Webhook signatures are
//! compared byte-for-byte against the configured secret rather than
//! computed, so a test signs a delivery by sending the secret itself.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use paybridge::config::ProviderConfig;
use paybridge::error::{BoxError, PaymentError, ProviderFailure};
use paybridge::provider::{
    CatalogOps, CustomerOps, DisputeOps, InvoiceOps, PaymentIntentOps, PaymentMethodOps, Provider,
    RefundOps, SubscriptionOps, UsageOps, WebhookOps,
};
use paybridge::types::{
    AiUsageMetrics, CaptureMethod, CreateCustomerRequest, CreateInvoiceRequest,
    CreatePaymentIntentRequest, CreatePaymentMethodRequest, CreatePriceRequest,
    CreateProductRequest, CreateRefundRequest, CreateSubscriptionRequest, Customer,
    CustomerListQuery, Dispute, DisputeListQuery, Invoice, InvoiceListQuery, InvoiceStatus,
    ListOutput, ListPage, ListQuery, PaymentIntent, PaymentIntentListQuery, PaymentIntentStatus,
    PaymentMethod, Price, PriceListQuery, Product, ProductListQuery, Refund, RefundListQuery,
    RefundStatus, Subscription, SubscriptionListQuery, SubscriptionStatus, Timestamp,
    UpdateCustomerRequest, UpdateInvoiceRequest, UpdatePaymentIntentRequest,
    UpdatePaymentMethodRequest, UpdatePriceRequest, UpdateProductRequest,
    UpdateSubscriptionRequest, UsageMetrics, UsagePeriod, WebhookEvent,
};

/// Name this provider registers and stamps on every record.
pub const PROVIDER_NAME: &str = "memory";

const DEFAULT_PERIOD_DAYS: i64 = 30;

#[derive(Default)]
struct Counters {
    customers: u64,
    methods: u64,
    intents: u64,
    subscriptions: u64,
    invoices: u64,
    refunds: u64,
    products: u64,
    prices: u64,
    events: u64,
}

#[derive(Default)]
struct State {
    counters: Counters,
    customers: Vec<Customer>,
    methods: Vec<PaymentMethod>,
    intents: Vec<PaymentIntent>,
    subscriptions: Vec<Subscription>,
    invoices: Vec<Invoice>,
    refunds: Vec<Refund>,
    products: Vec<Product>,
    prices: Vec<Price>,
    usage: Vec<UsageMetrics>,
    ai_usage: Vec<AiUsageMetrics>,
}

fn not_found(resource: &str, id: &str) -> BoxError {
    Box::new(ProviderFailure::new(format!("No such {resource}: {id}")).with_status(404))
}

fn invalid(message: impl Into<String>) -> BoxError {
    Box::new(ProviderFailure::new(message).with_status(400))
}

fn next_id(counter: &mut u64, prefix: &str) -> String {
    *counter += 1;
    format!("{prefix}_{counter}")
}

/// Applies cursor and limit to an already-filtered item list and reports
/// whether more items remain.
fn paginate<T: Clone, F: Fn(&T) -> &str>(items: &[T], query: &ListQuery, id_of: F) -> ListPage<T> {
    let start = query
        .starting_after
        .as_deref()
        .and_then(|cursor| items.iter().position(|item| id_of(item) == cursor))
        .map_or(0, |pos| pos + 1);
    let limit = usize::from(query.limit);
    let window: Vec<T> = items.iter().skip(start).take(limit).cloned().collect();
    let consumed = start + window.len();
    let next_cursor = if consumed < items.len() {
        window.last().map(|item| id_of(item).to_owned())
    } else {
        None
    };
    ListPage {
        has_more: consumed < items.len(),
        total_count: u64::try_from(items.len()).ok(),
        next_cursor,
        prev_cursor: None,
        data: window,
    }
}

/// Fully in-process payment backend.
///
/// Each instance owns its own isolated store; two providers built from the
/// same factory share nothing.
pub struct MemoryProvider {
    state: Mutex<State>,
}

impl std::fmt::Debug for MemoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProvider").finish_non_exhaustive()
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Registry factory for this backend.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches
    /// [`ProviderFactory`](paybridge::registry::ProviderFactory).
    pub fn factory(_config: &ProviderConfig) -> Result<Box<dyn Provider>, BoxError> {
        Ok(Box::new(Self::new()))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    fn customer_exists(&self, id: &str) -> bool {
        self.customers
            .iter()
            .any(|c| c.id == id && c.deleted != Some(true))
    }
}

#[async_trait]
impl CustomerOps for MemoryProvider {
    async fn create_customer(&self, request: CreateCustomerRequest) -> Result<Customer, BoxError> {
        let mut state = self.lock();
        let now = Utc::now();
        let id = next_id(&mut state.counters.customers, "cus");
        let customer = Customer {
            provider_id: id.clone(),
            id,
            email: request.email,
            name: request.name,
            phone: request.phone,
            description: request.description,
            metadata: request.metadata,
            created: now,
            updated: now,
            deleted: None,
            provider: PROVIDER_NAME.to_owned(),
        };
        state.customers.push(customer.clone());
        tracing::debug!(customer = %customer.id, "customer created");
        Ok(customer)
    }

    async fn retrieve_customer(&self, id: &str) -> Result<Customer, BoxError> {
        self.lock()
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| not_found("customer", id))
    }

    async fn update_customer(
        &self,
        id: &str,
        request: UpdateCustomerRequest,
    ) -> Result<Customer, BoxError> {
        let mut state = self.lock();
        let customer = state
            .customers
            .iter_mut()
            .find(|c| c.id == id && c.deleted != Some(true))
            .ok_or_else(|| not_found("customer", id))?;
        if request.email.is_some() {
            customer.email = request.email;
        }
        if request.name.is_some() {
            customer.name = request.name;
        }
        if request.phone.is_some() {
            customer.phone = request.phone;
        }
        if request.description.is_some() {
            customer.description = request.description;
        }
        if request.metadata.is_some() {
            customer.metadata = request.metadata;
        }
        customer.updated = Utc::now();
        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: &str) -> Result<(), BoxError> {
        let mut state = self.lock();
        let customer = state
            .customers
            .iter_mut()
            .find(|c| c.id == id && c.deleted != Some(true))
            .ok_or_else(|| not_found("customer", id))?;
        customer.deleted = Some(true);
        customer.updated = Utc::now();
        Ok(())
    }

    async fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> Result<ListOutput<Customer>, BoxError> {
        let state = self.lock();
        let matched: Vec<Customer> = state
            .customers
            .iter()
            .filter(|c| c.deleted != Some(true))
            .filter(|c| query.email.as_ref().is_none_or(|email| c.email.as_ref() == Some(email)))
            .cloned()
            .collect();
        Ok(ListOutput::Page(paginate(&matched, &query.base, |c| &c.id)))
    }
}

#[async_trait]
impl PaymentMethodOps for MemoryProvider {
    async fn create_payment_method(
        &self,
        request: CreatePaymentMethodRequest,
    ) -> Result<PaymentMethod, BoxError> {
        let mut state = self.lock();
        if !state.customer_exists(&request.customer_id) {
            return Err(not_found("customer", &request.customer_id));
        }
        let now = Utc::now();
        let id = next_id(&mut state.counters.methods, "pm");
        let method = PaymentMethod {
            provider_id: id.clone(),
            id,
            customer_id: request.customer_id,
            method_type: request.method_type,
            brand: None,
            last4: request.token.as_deref().map(|token| {
                let digits: Vec<char> = token.chars().filter(char::is_ascii_digit).collect();
                digits[digits.len().saturating_sub(4)..].iter().collect()
            }),
            expiry_month: None,
            expiry_year: None,
            is_default: false,
            metadata: request.metadata,
            created: now,
            updated: now,
            provider: PROVIDER_NAME.to_owned(),
        };
        state.methods.push(method.clone());
        Ok(method)
    }

    async fn retrieve_payment_method(&self, id: &str) -> Result<PaymentMethod, BoxError> {
        self.lock()
            .methods
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| not_found("payment method", id))
    }

    async fn update_payment_method(
        &self,
        id: &str,
        request: UpdatePaymentMethodRequest,
    ) -> Result<PaymentMethod, BoxError> {
        let mut state = self.lock();
        let method = state
            .methods
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("payment method", id))?;
        if request.metadata.is_some() {
            method.metadata = request.metadata;
        }
        method.updated = Utc::now();
        Ok(method.clone())
    }

    async fn list_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, BoxError> {
        Ok(self
            .lock()
            .methods
            .iter()
            .filter(|m| m.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn attach_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, BoxError> {
        let mut state = self.lock();
        if !state.customer_exists(customer_id) {
            return Err(not_found("customer", customer_id));
        }
        let method = state
            .methods
            .iter_mut()
            .find(|m| m.id == payment_method_id)
            .ok_or_else(|| not_found("payment method", payment_method_id))?;
        method.customer_id = customer_id.to_owned();
        method.is_default = false;
        method.updated = Utc::now();
        Ok(method.clone())
    }

    async fn detach_payment_method(&self, payment_method_id: &str) -> Result<(), BoxError> {
        let mut state = self.lock();
        let before = state.methods.len();
        state.methods.retain(|m| m.id != payment_method_id);
        if state.methods.len() == before {
            return Err(not_found("payment method", payment_method_id));
        }
        Ok(())
    }

    async fn set_default_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, BoxError> {
        let mut state = self.lock();
        if !state
            .methods
            .iter()
            .any(|m| m.id == payment_method_id && m.customer_id == customer_id)
        {
            return Err(not_found("payment method", payment_method_id));
        }
        let now = Utc::now();
        let mut chosen = None;
        for method in state
            .methods
            .iter_mut()
            .filter(|m| m.customer_id == customer_id)
        {
            method.is_default = method.id == payment_method_id;
            if method.is_default {
                method.updated = now;
                chosen = Some(method.clone());
            }
        }
        chosen.ok_or_else(|| not_found("payment method", payment_method_id))
    }
}

#[async_trait]
impl CatalogOps for MemoryProvider {
    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, BoxError> {
        let mut state = self.lock();
        let now = Utc::now();
        let id = next_id(&mut state.counters.products, "prod");
        let product = Product {
            provider_id: id.clone(),
            id,
            name: request.name,
            description: request.description,
            metadata: request.metadata,
            created: now,
            updated: now,
            provider: PROVIDER_NAME.to_owned(),
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn retrieve_product(&self, id: &str) -> Result<Product, BoxError> {
        self.lock()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("product", id))
    }

    async fn update_product(
        &self,
        id: &str,
        request: UpdateProductRequest,
    ) -> Result<Product, BoxError> {
        let mut state = self.lock();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("product", id))?;
        if let Some(name) = request.name {
            product.name = name;
        }
        if request.description.is_some() {
            product.description = request.description;
        }
        if request.metadata.is_some() {
            product.metadata = request.metadata;
        }
        product.updated = Utc::now();
        Ok(product.clone())
    }

    async fn list_products(&self, query: ProductListQuery) -> Result<Vec<Product>, BoxError> {
        let state = self.lock();
        Ok(paginate(&state.products, &query.base, |p| &p.id).data)
    }

    async fn create_price(&self, request: CreatePriceRequest) -> Result<Price, BoxError> {
        let mut state = self.lock();
        if !state.products.iter().any(|p| p.id == request.product_id) {
            return Err(not_found("product", &request.product_id));
        }
        if request.amount <= 0 {
            return Err(invalid("price amount must be positive"));
        }
        let now = Utc::now();
        let id = next_id(&mut state.counters.prices, "price");
        let price = Price {
            provider_id: id.clone(),
            id,
            product_id: request.product_id,
            amount: request.amount,
            currency: request.currency,
            interval: request.interval,
            interval_count: request.interval_count,
            metadata: request.metadata,
            created: now,
            updated: now,
            provider: PROVIDER_NAME.to_owned(),
        };
        state.prices.push(price.clone());
        Ok(price)
    }

    async fn retrieve_price(&self, id: &str) -> Result<Price, BoxError> {
        self.lock()
            .prices
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("price", id))
    }

    async fn update_price(&self, id: &str, request: UpdatePriceRequest) -> Result<Price, BoxError> {
        let mut state = self.lock();
        let price = state
            .prices
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("price", id))?;
        if request.metadata.is_some() {
            price.metadata = request.metadata;
        }
        price.updated = Utc::now();
        Ok(price.clone())
    }

    async fn list_prices(&self, query: PriceListQuery) -> Result<Vec<Price>, BoxError> {
        let state = self.lock();
        let matched: Vec<Price> = state
            .prices
            .iter()
            .filter(|p| query.product_id.as_ref().is_none_or(|pid| p.product_id == *pid))
            .cloned()
            .collect();
        Ok(paginate(&matched, &query.base, |p| &p.id).data)
    }
}

#[async_trait]
impl PaymentIntentOps for MemoryProvider {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, BoxError> {
        let mut state = self.lock();
        if request.amount <= 0 {
            return Err(invalid("amount must be positive"));
        }
        if !state.customer_exists(&request.customer_id) {
            return Err(not_found("customer", &request.customer_id));
        }
        let now = Utc::now();
        let id = next_id(&mut state.counters.intents, "pi");
        let status = if request.payment_method_id.is_some() {
            PaymentIntentStatus::RequiresConfirmation
        } else {
            PaymentIntentStatus::RequiresPaymentMethod
        };
        // Capture mode is remembered in metadata; the entity itself has no
        // slot for it.
        let mut metadata = request.metadata.unwrap_or_default();
        if request.capture_method == CaptureMethod::Manual {
            metadata.insert("captureMethod".to_owned(), "manual".to_owned());
        }
        let intent = PaymentIntent {
            client_secret: Some(format!("{id}_secret")),
            provider_id: id.clone(),
            id,
            customer_id: request.customer_id,
            amount: request.amount,
            currency: request.currency,
            status,
            description: request.description,
            metadata: if metadata.is_empty() { None } else { Some(metadata) },
            payment_method_id: request.payment_method_id,
            receipt_email: request.receipt_email,
            created: now,
            updated: now,
            provider: PROVIDER_NAME.to_owned(),
        };
        state.intents.push(intent.clone());
        Ok(intent)
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, BoxError> {
        self.lock()
            .intents
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| not_found("payment intent", id))
    }

    async fn update_payment_intent(
        &self,
        id: &str,
        request: UpdatePaymentIntentRequest,
    ) -> Result<PaymentIntent, BoxError> {
        let mut state = self.lock();
        let intent = state
            .intents
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("payment intent", id))?;
        if matches!(
            intent.status,
            PaymentIntentStatus::Succeeded | PaymentIntentStatus::Canceled
        ) {
            return Err(invalid(format!(
                "payment intent {id} is {} and cannot be updated",
                intent.status
            )));
        }
        if let Some(amount) = request.amount {
            if amount <= 0 {
                return Err(invalid("amount must be positive"));
            }
            intent.amount = amount;
        }
        if request.description.is_some() {
            intent.description = request.description;
        }
        if request.metadata.is_some() {
            intent.metadata = request.metadata;
        }
        if request.payment_method_id.is_some() {
            intent.payment_method_id = request.payment_method_id;
            if intent.status == PaymentIntentStatus::RequiresPaymentMethod {
                intent.status = PaymentIntentStatus::RequiresConfirmation;
            }
        }
        if request.receipt_email.is_some() {
            intent.receipt_email = request.receipt_email;
        }
        intent.updated = Utc::now();
        Ok(intent.clone())
    }

    async fn confirm_payment_intent(
        &self,
        id: &str,
        payment_method_id: Option<&str>,
    ) -> Result<PaymentIntent, BoxError> {
        let mut state = self.lock();
        let intent = state
            .intents
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("payment intent", id))?;
        if let Some(pm) = payment_method_id {
            intent.payment_method_id = Some(pm.to_owned());
        }
        if intent.payment_method_id.is_none() {
            return Err(invalid(format!(
                "payment intent {id} has no payment method to confirm with"
            )));
        }
        if !matches!(
            intent.status,
            PaymentIntentStatus::RequiresPaymentMethod | PaymentIntentStatus::RequiresConfirmation
        ) {
            return Err(invalid(format!(
                "payment intent {id} is {} and cannot be confirmed",
                intent.status
            )));
        }
        let manual = intent
            .metadata
            .as_ref()
            .is_some_and(|m| m.get("captureMethod").is_some_and(|v| v == "manual"));
        intent.status = if manual {
            PaymentIntentStatus::RequiresCapture
        } else {
            PaymentIntentStatus::Succeeded
        };
        intent.updated = Utc::now();
        Ok(intent.clone())
    }

    async fn capture_payment_intent(
        &self,
        id: &str,
        amount: Option<i64>,
    ) -> Result<PaymentIntent, BoxError> {
        let mut state = self.lock();
        let intent = state
            .intents
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("payment intent", id))?;
        if intent.status != PaymentIntentStatus::RequiresCapture {
            return Err(invalid(format!(
                "payment intent {id} is {} and cannot be captured",
                intent.status
            )));
        }
        if let Some(amount) = amount {
            if amount <= 0 || amount > intent.amount {
                return Err(invalid("capture amount out of range"));
            }
            intent.amount = amount;
        }
        intent.status = PaymentIntentStatus::Succeeded;
        intent.updated = Utc::now();
        Ok(intent.clone())
    }

    async fn cancel_payment_intent(&self, id: &str) -> Result<PaymentIntent, BoxError> {
        let mut state = self.lock();
        let intent = state
            .intents
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("payment intent", id))?;
        if matches!(
            intent.status,
            PaymentIntentStatus::Succeeded | PaymentIntentStatus::Canceled
        ) {
            return Err(invalid(format!(
                "payment intent {id} is {} and cannot be canceled",
                intent.status
            )));
        }
        intent.status = PaymentIntentStatus::Canceled;
        intent.updated = Utc::now();
        Ok(intent.clone())
    }

    async fn list_payment_intents(
        &self,
        query: PaymentIntentListQuery,
    ) -> Result<ListOutput<PaymentIntent>, BoxError> {
        let state = self.lock();
        let matched: Vec<PaymentIntent> = state
            .intents
            .iter()
            .filter(|i| query.customer_id.as_ref().is_none_or(|c| i.customer_id == *c))
            .filter(|i| query.status.is_none_or(|s| i.status == s))
            .cloned()
            .collect();
        Ok(ListOutput::Page(paginate(&matched, &query.base, |i| &i.id)))
    }
}

#[async_trait]
impl SubscriptionOps for MemoryProvider {
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, BoxError> {
        let mut state = self.lock();
        if !state.customer_exists(&request.customer_id) {
            return Err(not_found("customer", &request.customer_id));
        }
        if !state.prices.iter().any(|p| p.id == request.price_id) {
            return Err(not_found("price", &request.price_id));
        }
        let now = Utc::now();
        let id = next_id(&mut state.counters.subscriptions, "sub");
        let trial_days = request.trial_period_days.map(i64::from).unwrap_or(0);
        let (status, trial_start, trial_end) = if trial_days > 0 {
            let end = now + Duration::days(trial_days);
            (SubscriptionStatus::Trialing, Some(now), Some(end))
        } else {
            (SubscriptionStatus::Active, None, None)
        };
        let subscription = Subscription {
            provider_id: id.clone(),
            id,
            customer_id: request.customer_id,
            status,
            current_period_start: now,
            current_period_end: now + Duration::days(DEFAULT_PERIOD_DAYS),
            cancel_at_period_end: false,
            canceled_at: None,
            trial_start,
            trial_end,
            metadata: request.metadata,
            created: now,
            updated: now,
            provider: PROVIDER_NAME.to_owned(),
        };
        state.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn retrieve_subscription(&self, id: &str) -> Result<Subscription, BoxError> {
        self.lock()
            .subscriptions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| not_found("subscription", id))
    }

    async fn update_subscription(
        &self,
        id: &str,
        request: UpdateSubscriptionRequest,
    ) -> Result<Subscription, BoxError> {
        let mut state = self.lock();
        let subscription = state
            .subscriptions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("subscription", id))?;
        if subscription.status == SubscriptionStatus::Canceled {
            return Err(invalid(format!("subscription {id} is canceled")));
        }
        if let Some(flag) = request.cancel_at_period_end {
            subscription.cancel_at_period_end = flag;
        }
        if request.metadata.is_some() {
            subscription.metadata = request.metadata;
        }
        subscription.updated = Utc::now();
        Ok(subscription.clone())
    }

    async fn cancel_subscription(&self, id: &str) -> Result<Subscription, BoxError> {
        let mut state = self.lock();
        let subscription = state
            .subscriptions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("subscription", id))?;
        let now = Utc::now();
        subscription.status = SubscriptionStatus::Canceled;
        subscription.canceled_at = Some(now);
        subscription.updated = now;
        Ok(subscription.clone())
    }

    async fn list_subscriptions(
        &self,
        query: SubscriptionListQuery,
    ) -> Result<ListOutput<Subscription>, BoxError> {
        let state = self.lock();
        let matched: Vec<Subscription> = state
            .subscriptions
            .iter()
            .filter(|s| query.customer_id.as_ref().is_none_or(|c| s.customer_id == *c))
            .filter(|s| query.status.is_none_or(|st| s.status == st))
            .cloned()
            .collect();
        Ok(ListOutput::Page(paginate(&matched, &query.base, |s| &s.id)))
    }
}

#[async_trait]
impl InvoiceOps for MemoryProvider {
    async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<Invoice, BoxError> {
        let mut state = self.lock();
        if request.amount <= 0 {
            return Err(invalid("amount must be positive"));
        }
        if !state.customer_exists(&request.customer_id) {
            return Err(not_found("customer", &request.customer_id));
        }
        let now = Utc::now();
        let id = next_id(&mut state.counters.invoices, "in");
        let invoice = Invoice {
            provider_id: id.clone(),
            id,
            customer_id: request.customer_id,
            subscription_id: request.subscription_id,
            status: InvoiceStatus::Draft,
            amount: request.amount,
            currency: request.currency,
            amount_paid: 0,
            amount_due: request.amount,
            subtotal: request.amount,
            tax: 0,
            total: request.amount,
            description: request.description,
            hosted_invoice_url: None,
            invoice_pdf: None,
            metadata: request.metadata,
            created: now,
            updated: now,
            due_date: request.due_date,
            paid_at: None,
            provider: PROVIDER_NAME.to_owned(),
        };
        state.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn retrieve_invoice(&self, id: &str) -> Result<Invoice, BoxError> {
        self.lock()
            .invoices
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| not_found("invoice", id))
    }

    async fn update_invoice(
        &self,
        id: &str,
        request: UpdateInvoiceRequest,
    ) -> Result<Invoice, BoxError> {
        let mut state = self.lock();
        let invoice = state
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("invoice", id))?;
        if invoice.status != InvoiceStatus::Draft {
            return Err(invalid(format!(
                "invoice {id} is {} and cannot be updated",
                invoice.status
            )));
        }
        if request.description.is_some() {
            invoice.description = request.description;
        }
        if request.metadata.is_some() {
            invoice.metadata = request.metadata;
        }
        if request.due_date.is_some() {
            invoice.due_date = request.due_date;
        }
        invoice.updated = Utc::now();
        Ok(invoice.clone())
    }

    async fn finalize_invoice(&self, id: &str) -> Result<Invoice, BoxError> {
        let mut state = self.lock();
        let invoice = state
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("invoice", id))?;
        if invoice.status != InvoiceStatus::Draft {
            return Err(invalid(format!(
                "invoice {id} is {} and cannot be finalized",
                invoice.status
            )));
        }
        invoice.status = InvoiceStatus::Open;
        invoice.hosted_invoice_url = Some(format!("https://pay.invalid/{id}"));
        invoice.updated = Utc::now();
        Ok(invoice.clone())
    }

    async fn pay_invoice(
        &self,
        id: &str,
        _payment_method_id: Option<&str>,
    ) -> Result<Invoice, BoxError> {
        let mut state = self.lock();
        let invoice = state
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("invoice", id))?;
        if invoice.status != InvoiceStatus::Open {
            return Err(invalid(format!(
                "invoice {id} is {} and cannot be paid",
                invoice.status
            )));
        }
        let now = Utc::now();
        invoice.status = InvoiceStatus::Paid;
        invoice.amount_paid = invoice.total;
        invoice.amount_due = 0;
        invoice.paid_at = Some(now);
        invoice.updated = now;
        Ok(invoice.clone())
    }

    async fn list_invoices(
        &self,
        query: InvoiceListQuery,
    ) -> Result<ListOutput<Invoice>, BoxError> {
        let state = self.lock();
        let matched: Vec<Invoice> = state
            .invoices
            .iter()
            .filter(|i| query.customer_id.as_ref().is_none_or(|c| i.customer_id == *c))
            .filter(|i| {
                query
                    .subscription_id
                    .as_ref()
                    .is_none_or(|s| i.subscription_id.as_ref() == Some(s))
            })
            .filter(|i| query.status.is_none_or(|s| i.status == s))
            .cloned()
            .collect();
        Ok(ListOutput::Page(paginate(&matched, &query.base, |i| &i.id)))
    }
}

#[async_trait]
impl RefundOps for MemoryProvider {
    async fn create_refund(&self, request: CreateRefundRequest) -> Result<Refund, BoxError> {
        let mut state = self.lock();
        let (currency, intent_amount, intent_status) = {
            let intent = state
                .intents
                .iter()
                .find(|i| i.id == request.payment_id)
                .ok_or_else(|| not_found("payment intent", &request.payment_id))?;
            (intent.currency.clone(), intent.amount, intent.status)
        };
        if intent_status != PaymentIntentStatus::Succeeded {
            return Err(invalid(format!(
                "payment intent {} is {intent_status} and cannot be refunded",
                request.payment_id
            )));
        }
        let already: i64 = state
            .refunds
            .iter()
            .filter(|r| r.payment_id == request.payment_id && r.status == RefundStatus::Succeeded)
            .map(|r| r.amount)
            .sum();
        let amount = request.amount.unwrap_or(intent_amount - already);
        if amount <= 0 || already + amount > intent_amount {
            return Err(invalid("refund amount exceeds refundable balance"));
        }
        let now = Utc::now();
        let id = next_id(&mut state.counters.refunds, "re");
        let refund = Refund {
            provider_id: id.clone(),
            id,
            payment_id: request.payment_id,
            amount,
            currency,
            status: RefundStatus::Succeeded,
            reason: request.reason,
            description: request.description,
            metadata: request.metadata,
            created: now,
            updated: now,
            provider: PROVIDER_NAME.to_owned(),
        };
        state.refunds.push(refund.clone());
        Ok(refund)
    }

    async fn retrieve_refund(&self, id: &str) -> Result<Refund, BoxError> {
        self.lock()
            .refunds
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found("refund", id))
    }

    async fn list_refunds(&self, query: RefundListQuery) -> Result<Vec<Refund>, BoxError> {
        let state = self.lock();
        let matched: Vec<Refund> = state
            .refunds
            .iter()
            .filter(|r| query.payment_id.as_ref().is_none_or(|p| r.payment_id == *p))
            .cloned()
            .collect();
        Ok(paginate(&matched, &query.base, |r| &r.id).data)
    }
}

#[async_trait]
impl DisputeOps for MemoryProvider {
    async fn retrieve_dispute(&self, id: &str) -> Result<Dispute, BoxError> {
        // Disputes originate with card networks; nothing in-process ever
        // creates one.
        Err(not_found("dispute", id))
    }

    async fn list_disputes(&self, _query: DisputeListQuery) -> Result<Vec<Dispute>, BoxError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl WebhookOps for MemoryProvider {
    async fn verify_webhook(
        &self,
        _payload: &str,
        signature: &str,
        secret: &str,
    ) -> Result<bool, BoxError> {
        Ok(!secret.is_empty() && signature == secret)
    }

    async fn parse_webhook(
        &self,
        payload: &str,
        signature: &str,
        secret: &str,
    ) -> Result<WebhookEvent, BoxError> {
        if secret.is_empty() || signature != secret {
            return Err(Box::new(PaymentError::webhook(
                "Webhook signature verification failed",
            )));
        }
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| PaymentError::webhook(format!("Malformed webhook payload: {e}")))?;
        let event_type = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("event")
            .to_owned();
        let id = match value.get("id").and_then(serde_json::Value::as_str) {
            Some(id) => id.to_owned(),
            None => next_id(&mut self.lock().counters.events, "evt"),
        };
        let data: HashMap<String, serde_json::Value> = value
            .get("data")
            .and_then(serde_json::Value::as_object)
            .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        let created: Timestamp = value
            .get("created")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Utc::now);
        Ok(WebhookEvent {
            id,
            event_type,
            data,
            created,
            provider: PROVIDER_NAME.to_owned(),
            livemode: false,
        })
    }
}

#[async_trait]
impl UsageOps for MemoryProvider {
    async fn track_usage(&self, metrics: UsageMetrics) -> Result<(), BoxError> {
        self.lock().usage.push(metrics);
        Ok(())
    }

    async fn track_ai_usage(&self, metrics: AiUsageMetrics) -> Result<(), BoxError> {
        self.lock().ai_usage.push(metrics);
        Ok(())
    }

    async fn usage_metrics(
        &self,
        customer_id: &str,
        feature_id: &str,
        period: UsagePeriod,
    ) -> Result<Vec<UsageMetrics>, BoxError> {
        Ok(self
            .lock()
            .usage
            .iter()
            .filter(|m| {
                m.customer_id == customer_id && m.feature_id == feature_id && m.period == period
            })
            .cloned()
            .collect())
    }

    async fn ai_usage_metrics(
        &self,
        customer_id: &str,
        model_id: Option<&str>,
        _period: Option<UsagePeriod>,
    ) -> Result<Vec<AiUsageMetrics>, BoxError> {
        Ok(self
            .lock()
            .ai_usage
            .iter()
            .filter(|m| m.customer_id == customer_id)
            .filter(|m| model_id.is_none_or(|model| m.model_id == model))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn health_check(&self) -> Result<bool, BoxError> {
        Ok(true)
    }
}
