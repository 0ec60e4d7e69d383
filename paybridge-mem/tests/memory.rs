//! End-to-end flows through the facade backed by the in-memory provider.

use paybridge::types::{
    CaptureMethod, CreateCustomerRequest, CreateInvoiceRequest, CreatePaymentIntentRequest,
    CreatePaymentMethodRequest, CreatePriceRequest, CreateProductRequest, CreateRefundRequest,
    CreateSubscriptionRequest, CustomerListQuery, InvoiceStatus, PaymentIntentStatus,
    PaymentMethodType, PriceInterval, SubscriptionStatus, UpdateSubscriptionRequest,
};
use paybridge::{BridgeConfig, Paybridge, ProviderConfig};
use paybridge_mem::MemoryProvider;

fn bridge() -> Paybridge {
    Paybridge::register_provider(paybridge_mem::PROVIDER_NAME, MemoryProvider::factory);
    let config = BridgeConfig::new(
        ProviderConfig::new(paybridge_mem::PROVIDER_NAME, "sk_mem").with_webhook_secret("whsec_mem"),
    );
    Paybridge::try_new(config).expect("memory provider registered above")
}

#[tokio::test]
async fn test_charge_and_refund_flow() {
    let bridge = bridge();

    let customer = bridge
        .create_customer(CreateCustomerRequest {
            email: Some("buyer@example.com".to_owned()),
            name: Some("Buyer".to_owned()),
            ..CreateCustomerRequest::default()
        })
        .await
        .data
        .expect("create customer");

    let method = bridge
        .create_payment_method(CreatePaymentMethodRequest {
            customer_id: customer.id.clone(),
            method_type: PaymentMethodType::Card,
            token: Some("tok_4242424242424242".to_owned()),
            metadata: None,
        })
        .await
        .data
        .expect("create payment method");
    assert_eq!(method.last4.as_deref(), Some("4242"));

    let promoted = bridge
        .set_default_payment_method(&customer.id, &method.id)
        .await
        .data
        .expect("set default");
    assert!(promoted.is_default);

    let intent = bridge
        .create_payment_intent(CreatePaymentIntentRequest {
            customer_id: customer.id.clone(),
            amount: 5000,
            currency: "usd".to_owned(),
            description: Some("order #1".to_owned()),
            metadata: None,
            payment_method_id: Some(method.id.clone()),
            receipt_email: None,
            capture_method: CaptureMethod::Manual,
        })
        .await
        .data
        .expect("create intent");
    assert_eq!(intent.status, PaymentIntentStatus::RequiresConfirmation);
    assert!(intent.client_secret.is_some());

    let confirmed = bridge
        .confirm_payment_intent(&intent.id, None)
        .await
        .data
        .expect("confirm");
    assert_eq!(confirmed.status, PaymentIntentStatus::RequiresCapture);

    let captured = bridge
        .capture_payment_intent(&intent.id, Some(4500))
        .await
        .data
        .expect("capture");
    assert_eq!(captured.status, PaymentIntentStatus::Succeeded);
    assert_eq!(captured.amount, 4500);

    let refund = bridge
        .create_refund(CreateRefundRequest {
            payment_id: intent.id.clone(),
            amount: None,
            reason: None,
            description: None,
            metadata: None,
        })
        .await
        .data
        .expect("refund");
    assert_eq!(refund.amount, 4500);

    // Fully refunded; another refund must fail in the envelope, not panic.
    let denied = bridge
        .create_refund(CreateRefundRequest {
            payment_id: intent.id,
            amount: Some(1),
            reason: None,
            description: None,
            metadata: None,
        })
        .await;
    assert!(!denied.success);
    assert!(denied.data.is_none());
    assert!(denied.error.is_some());
}

#[tokio::test]
async fn test_subscription_and_invoice_flow() {
    let bridge = bridge();

    let customer = bridge
        .create_customer(CreateCustomerRequest {
            email: Some("subscriber@example.com".to_owned()),
            ..CreateCustomerRequest::default()
        })
        .await
        .data
        .expect("create customer");

    let product = bridge
        .create_product(CreateProductRequest {
            name: "Pro plan".to_owned(),
            description: None,
            metadata: None,
        })
        .await
        .data
        .expect("create product");

    let price = bridge
        .create_price(CreatePriceRequest {
            product_id: product.id,
            amount: 1500,
            currency: "usd".to_owned(),
            interval: Some(PriceInterval::Month),
            interval_count: Some(1),
            metadata: None,
        })
        .await
        .data
        .expect("create price");

    let subscription = bridge
        .create_subscription(CreateSubscriptionRequest {
            customer_id: customer.id.clone(),
            price_id: price.id,
            trial_period_days: Some(14),
            metadata: None,
            payment_method_id: None,
        })
        .await
        .data
        .expect("create subscription");
    assert_eq!(subscription.status, SubscriptionStatus::Trialing);
    assert!(subscription.trial_end.is_some());

    let updated = bridge
        .update_subscription(
            &subscription.id,
            UpdateSubscriptionRequest {
                cancel_at_period_end: Some(true),
                ..UpdateSubscriptionRequest::default()
            },
        )
        .await
        .data
        .expect("update subscription");
    assert!(updated.cancel_at_period_end);

    let invoice = bridge
        .create_invoice(CreateInvoiceRequest {
            customer_id: customer.id.clone(),
            subscription_id: Some(subscription.id.clone()),
            amount: 1500,
            currency: "usd".to_owned(),
            description: None,
            metadata: None,
            due_date: None,
        })
        .await
        .data
        .expect("create invoice");
    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert_eq!(invoice.amount_due, 1500);

    // Paying a draft invoice is rejected; it must be finalized first.
    let premature = bridge.pay_invoice(&invoice.id, None).await;
    assert!(!premature.success);

    let open = bridge
        .finalize_invoice(&invoice.id)
        .await
        .data
        .expect("finalize");
    assert_eq!(open.status, InvoiceStatus::Open);
    assert!(open.hosted_invoice_url.is_some());

    let paid = bridge.pay_invoice(&invoice.id, None).await.data.expect("pay");
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert_eq!(paid.amount_paid, 1500);
    assert_eq!(paid.amount_due, 0);
    assert!(paid.paid_at.is_some());

    let canceled = bridge
        .cancel_subscription(&subscription.id)
        .await
        .data
        .expect("cancel");
    assert_eq!(canceled.status, SubscriptionStatus::Canceled);
    assert!(canceled.canceled_at.is_some());
}

#[tokio::test]
async fn test_error_envelopes_and_webhooks() {
    let bridge = bridge();

    let missing = bridge.get_customer("cus_nope").await;
    assert!(!missing.success);
    assert!(missing.data.is_none());
    assert_eq!(missing.error.as_deref(), Some("Resource not found"));

    let empty = bridge
        .list_customers(CustomerListQuery::default())
        .await
        .data
        .expect("list");
    assert!(empty.data.is_empty());
    assert!(!empty.has_more);

    assert!(bridge.verify_webhook("{}", "whsec_mem").await);
    assert!(!bridge.verify_webhook("{}", "forged").await);

    let event = bridge
        .parse_webhook(
            r#"{"id":"evt_7","type":"invoice.paid","data":{"invoice":"in_1"}}"#,
            "whsec_mem",
        )
        .await
        .expect("parse");
    assert_eq!(event.event_type, "invoice.paid");
    assert_eq!(event.provider, "memory");

    let err = bridge.parse_webhook("{}", "forged").await.unwrap_err();
    assert_eq!(err.code(), "WEBHOOK_ERROR");

    assert!(bridge.health_check().await);
}
