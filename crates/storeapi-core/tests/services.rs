//! Store service behavior against the in-process stub backend.

use std::sync::mpsc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use storeapi_core::stub::{StubContext, StubJwt, StubProduct};
use storeapi_core::{
    ClientStoreService, ErrorCode, Product, PurchaseStatus, ServerStoreService, StorePurchaseStatus,
    StoreService, UserInfo, NOT_SUBSCRIBED,
};

const PRODUCT_ID: &str = "my-awesome-addon";

fn one_product(product: StubProduct) -> StubContext {
    StubContext::new().with_product(product)
}

// ============================================================================
// StoreService
// ============================================================================

#[tokio::test]
async fn no_products_found() {
    let service = StoreService::new(StubContext::new());

    let err = service.subscription_product(PRODUCT_ID).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NoProductsFound);
    assert!(err.detail().contains(PRODUCT_ID));
}

#[tokio::test]
async fn too_many_products_found() {
    let ctx = StubContext::new()
        .with_product(StubProduct::new(PRODUCT_ID))
        .with_product(StubProduct::new(PRODUCT_ID))
        .with_product(StubProduct::new(PRODUCT_ID));
    let service = StoreService::new(ctx);

    let err = service.subscription_product(PRODUCT_ID).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::TooManyProductsFound);
    assert!(err.detail().contains('3'));
}

#[tokio::test]
async fn exactly_one_product_found() {
    let service = StoreService::new(one_product(StubProduct::new(PRODUCT_ID)));

    let product = service.subscription_product(PRODUCT_ID).await.unwrap();

    assert_eq!(product.store_id(), PRODUCT_ID);
}

#[tokio::test]
async fn only_durables_are_considered() {
    let ctx = one_product(StubProduct::new(PRODUCT_ID).with_kind("Consumable"));
    let service = StoreService::new(ctx);

    let err = service.subscription_product(PRODUCT_ID).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NoProductsFound);
}

#[tokio::test]
async fn empty_product_id_is_rejected() {
    let service = StoreService::new(one_product(StubProduct::new(PRODUCT_ID)));

    let err = service.subscription_product("").await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidProductId);
}

#[tokio::test]
async fn runtime_failures_propagate() {
    let service = StoreService::new(one_product(StubProduct::new(PRODUCT_ID)).broken());

    let err = service.subscription_product(PRODUCT_ID).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::Runtime);
}

// ============================================================================
// ServerStoreService
// ============================================================================

#[tokio::test]
async fn empty_jwt_fails() {
    let ctx = StubContext::new().with_jwt(StubJwt::Fixed(String::new()));
    let service = ServerStoreService::new(ctx);
    let user = UserInfo::from_account_name("my@name.com");

    let err = service
        .generate_user_jwt("this-is-a-web-token", &user)
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::EmptyJwt);
}

#[tokio::test]
async fn non_empty_jwt_is_returned_unchanged() {
    let service = ServerStoreService::new(StubContext::new().with_jwt(StubJwt::Echo));
    let user = UserInfo::from_account_name("my@name.com");
    let token = "this-is-a-web-token";

    let jwt = service.generate_user_jwt(token, &user).await.unwrap();

    assert_eq!(jwt, token);
}

#[tokio::test]
async fn jwt_requires_a_user() {
    let service = ServerStoreService::new(StubContext::new());

    let err = service
        .generate_user_jwt("this-is-a-web-token", &UserInfo::default())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NoLocalUser);
}

#[tokio::test]
async fn expiration_date_unsubscribed() {
    let service = ServerStoreService::new(one_product(StubProduct::new(PRODUCT_ID)));

    let expiration = service.current_expiration_date(PRODUCT_ID).await.unwrap();

    assert_eq!(expiration, NOT_SUBSCRIBED);
    assert_eq!(expiration, i64::MIN);
}

#[tokio::test]
async fn expiration_date_epoch() {
    let ctx = one_product(StubProduct::new(PRODUCT_ID).owned_until(DateTime::UNIX_EPOCH));
    let service = ServerStoreService::new(ctx);

    let expiration = service.current_expiration_date(PRODUCT_ID).await.unwrap();

    assert_eq!(expiration, 0);
}

#[tokio::test]
async fn expiration_date_truncates_fractional_seconds() {
    let end = Utc.timestamp_opt(1_700_000_000, 999_999_999).unwrap();
    let ctx = one_product(StubProduct::new(PRODUCT_ID).owned_until(end));
    let service = ServerStoreService::new(ctx);

    let expiration = service.current_expiration_date(PRODUCT_ID).await.unwrap();

    assert_eq!(expiration, 1_700_000_000);
}

#[tokio::test]
async fn expiration_date_missing_product() {
    let service = ServerStoreService::new(StubContext::new());

    let err = service.current_expiration_date(PRODUCT_ID).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NoProductsFound);
}

#[tokio::test]
async fn expiration_date_unreadable_ownership_is_not_unsubscribed() {
    let ctx = one_product(StubProduct::new(PRODUCT_ID).with_unreadable_ownership());
    let service = ServerStoreService::new(ctx);

    let err = service.current_expiration_date(PRODUCT_ID).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::Runtime);
}

#[tokio::test]
async fn no_local_users() {
    let service = ServerStoreService::new(StubContext::new());

    let err = service.current_user_info().await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NoLocalUser);
}

#[tokio::test]
async fn too_many_local_users() {
    let ctx = StubContext::new().with_user("first-user").with_user("second-user");
    let service = ServerStoreService::new(ctx);

    let err = service.current_user_info().await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::TooManyLocalUsers);
}

#[tokio::test]
async fn one_local_user() {
    let service = ServerStoreService::new(StubContext::new().with_user("user@email.pizza"));

    let user = service.current_user_info().await.unwrap();

    assert_eq!(user, UserInfo::from_account_name("user@email.pizza"));
}

#[tokio::test]
async fn unhashed_local_user_is_invalid() {
    let service = ServerStoreService::new(StubContext::new().with_user_hash("user@email.pizza"));

    let err = service.current_user_info().await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidUserInfo);
}

// ============================================================================
// ClientStoreService
// ============================================================================

#[tokio::test]
async fn client_initializes_dialogs_once() {
    let service = ClientStoreService::new(StubContext::new(), 42).unwrap();

    assert_eq!(service.store().context().dialogs_window(), Some(42));
}

#[tokio::test]
async fn client_product_not_found() {
    let service = ClientStoreService::new(StubContext::new(), 0).unwrap();

    let err = service.fetch_available_product(PRODUCT_ID).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NoProductsFound);
}

#[tokio::test]
async fn client_unreadable_ownership_is_not_available() {
    let expiration = Utc::now() + Duration::days(9);
    let ctx = one_product(
        StubProduct::new(PRODUCT_ID)
            .owned_until(expiration)
            .with_unreadable_ownership(),
    );
    let service = ClientStoreService::new(ctx, 0).unwrap();

    let err = service.fetch_available_product(PRODUCT_ID).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::Runtime);
}

#[tokio::test]
async fn cannot_repurchase_active_subscription() {
    let expiration = Utc::now() + Duration::days(9);
    let ctx = one_product(StubProduct::new(PRODUCT_ID).owned_until(expiration));
    let service = ClientStoreService::new(ctx, 0).unwrap();

    let err = service.fetch_available_product(PRODUCT_ID).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidProductId);
}

#[tokio::test]
async fn expired_subscription_is_available_again() {
    let expiration = Utc::now() - Duration::days(1);
    let ctx = one_product(StubProduct::new(PRODUCT_ID).owned_until(expiration));
    let service = ClientStoreService::new(ctx, 0).unwrap();

    let product = service.fetch_available_product(PRODUCT_ID).await.unwrap();

    assert_eq!(product.store_id(), PRODUCT_ID);
}

#[tokio::test]
async fn purchase_success_through_callback() {
    let ctx = one_product(
        StubProduct::new(PRODUCT_ID).with_purchase_result(StorePurchaseStatus::Succeeded, 0),
    );
    let service = ClientStoreService::new(ctx, 0).unwrap();
    let product = service.fetch_available_product(PRODUCT_ID).await.unwrap();

    let (tx, rx) = mpsc::channel();
    product.prompt_user_for_purchase(move |status, error| {
        tx.send((status, error)).unwrap();
    });

    assert_eq!(rx.try_recv().unwrap(), (PurchaseStatus::Succeeded, 0));
}

#[tokio::test]
async fn purchase_translates_vendor_status() {
    let ctx = one_product(
        StubProduct::new(PRODUCT_ID).with_purchase_result(StorePurchaseStatus::NotPurchased, 0),
    );
    let service = ClientStoreService::new(ctx, 0).unwrap();
    let product = service.fetch_available_product(PRODUCT_ID).await.unwrap();

    let result = product.purchase().await.unwrap();

    assert_eq!(result, (PurchaseStatus::UserGaveUp, 0));
}

#[tokio::test]
async fn purchase_unknown_vendor_status() {
    let ctx = one_product(
        StubProduct::new(PRODUCT_ID).with_purchase_result(StorePurchaseStatus::Other(17), 0),
    );
    let service = ClientStoreService::new(ctx, 0).unwrap();
    let product = service.fetch_available_product(PRODUCT_ID).await.unwrap();

    let (status, _) = product.purchase().await.unwrap();

    assert_eq!(status, PurchaseStatus::Unknown);
}

#[tokio::test]
async fn purchase_without_result_is_a_runtime_error() {
    let service = ClientStoreService::new(one_product(StubProduct::new(PRODUCT_ID)), 0).unwrap();
    let product = service.fetch_available_product(PRODUCT_ID).await.unwrap();

    let err = product.purchase().await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::Runtime);
}
