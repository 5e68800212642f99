//! `StoreContext` and `StoreProduct` wrappers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storeapi_core::{
    Context, ErrorCode, Product, Result, StoreError, StorePurchaseCallback, StorePurchaseStatus,
    UserInfo,
};
use windows::core::{Interface, HSTRING};
use windows::Foundation::Collections::IIterable;
use windows::Foundation::{AsyncOperationCompletedHandler, AsyncStatus, IReference};
use windows::Services::Store::{self as store, StorePurchaseResult};
use windows::System::{KnownUserProperties, User, UserAuthenticationStatus, UserType};
use windows::Win32::Foundation::{E_FAIL, HWND};
use windows::Win32::UI::Shell::IInitializeWithWindow;

/// 100ns ticks between 1601-01-01 (the WinRT epoch) and 1970-01-01.
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;

fn runtime_error(err: &windows::core::Error) -> StoreError {
    tracing::error!(hresult = err.code().0, message = %err.message(), "Windows Runtime call failed");
    StoreError::runtime(err)
}

fn to_hstrings(input: &[String]) -> Result<IIterable<HSTRING>> {
    let hstrings: Vec<HSTRING> = input.iter().map(HSTRING::from).collect();
    IIterable::try_from(hstrings).map_err(|e| runtime_error(&e))
}

fn to_utc(date: windows::Foundation::DateTime) -> Result<DateTime<Utc>> {
    let ticks = date.UniversalTime - UNIX_EPOCH_TICKS;
    let secs = ticks.div_euclid(TICKS_PER_SECOND);
    // Always in 0..TICKS_PER_SECOND, so the nanoseconds fit in u32.
    let nanos = u32::try_from(ticks.rem_euclid(TICKS_PER_SECOND) * 100).unwrap_or_default();
    DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
        StoreError::new(
            ErrorCode::Runtime,
            format!("date out of range: {} ticks", date.UniversalTime),
        )
    })
}

/// A product from the Microsoft Store.
#[derive(Debug, Clone)]
pub struct StoreProduct {
    inner: store::StoreProduct,
    store_id: String,
}

impl StoreProduct {
    fn new(inner: store::StoreProduct) -> Result<Self> {
        let store_id = inner.StoreId().map_err(|e| runtime_error(&e))?.to_string();
        Ok(Self { inner, store_id })
    }
}

impl Product for StoreProduct {
    fn store_id(&self) -> &str {
        &self.store_id
    }

    fn is_in_user_collection(&self) -> Result<bool> {
        self.inner
            .IsInUserCollection()
            .map_err(|e| runtime_error(&e))
    }

    fn current_expiration_date(&self) -> Result<DateTime<Utc>> {
        // A product may have several SKUs and not all of them (maybe none)
        // carry collection data.
        let skus = self.inner.Skus().map_err(|e| runtime_error(&e))?;
        for sku in skus {
            if sku.IsInUserCollection().map_err(|e| runtime_error(&e))? {
                let collected = sku.CollectionData().map_err(|e| runtime_error(&e))?;
                return to_utc(collected.EndDate().map_err(|e| runtime_error(&e))?);
            }
        }

        Err(StoreError::new(
            ErrorCode::Unsubscribed,
            format!("product ID: {}", self.store_id),
        ))
    }

    fn prompt_user_for_purchase(&self, callback: StorePurchaseCallback) {
        let operation = match self.inner.RequestPurchaseAsync() {
            Ok(op) => op,
            Err(e) => {
                tracing::error!(product_id = %self.store_id, error = %e, "Could not start the purchase flow");
                callback(StorePurchaseStatus::NetworkError, e.code().0);
                return;
            }
        };

        // The handler type is FnMut, the callback runs once.
        let pending = Arc::new(Mutex::new(Some(callback)));
        let slot = Arc::clone(&pending);
        let handler = AsyncOperationCompletedHandler::<StorePurchaseResult>::new(
            move |op, status| {
                let Some(cb) = take(&slot) else {
                    return Ok(());
                };

                match (op, status) {
                    (Some(op), AsyncStatus::Completed) => match op.GetResults() {
                        Ok(res) => {
                            let raw = res.Status().map(|s| s.0).unwrap_or(-1);
                            let error = res.ExtendedError().map(|hr| hr.0).unwrap_or_default();
                            cb(StorePurchaseStatus::from(raw), error);
                        }
                        Err(e) => cb(StorePurchaseStatus::NetworkError, e.code().0),
                    },
                    (Some(op), _) => {
                        let error = op.ErrorCode().map_or(E_FAIL.0, |hr| hr.0);
                        tracing::warn!(?status, hresult = error, "Purchase flow did not complete");
                        cb(StorePurchaseStatus::Other(-1), error);
                    }
                    (None, _) => cb(StorePurchaseStatus::Other(-1), E_FAIL.0),
                }
                Ok(())
            },
        );

        if let Err(e) = operation.SetCompleted(&handler) {
            tracing::error!(error = %e, "Could not await the purchase flow");
            if let Some(cb) = take(&pending) {
                cb(StorePurchaseStatus::NetworkError, e.code().0);
            }
        }
    }
}

fn take(slot: &Mutex<Option<StorePurchaseCallback>>) -> Option<StorePurchaseCallback> {
    slot.lock().ok().and_then(|mut cb| cb.take())
}

/// The Microsoft Store context of the current app.
#[derive(Debug, Clone)]
pub struct StoreContext {
    inner: store::StoreContext,
}

impl StoreContext {
    /// The default store context for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::Runtime`] if the runtime refuses to provide one.
    pub fn new() -> Result<Self> {
        let inner = store::StoreContext::GetDefault().map_err(|e| runtime_error(&e))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl Context for StoreContext {
    type Product = StoreProduct;
    type Window = HWND;

    async fn get_products(&self, kinds: &[String], ids: &[String]) -> Result<Vec<StoreProduct>> {
        let query = self
            .inner
            .GetStoreProductsAsync(&to_hstrings(kinds)?, &to_hstrings(ids)?)
            .and_then(|op| op.get())
            .map_err(|e| runtime_error(&e))?;
        query
            .ExtendedError()
            .and_then(windows::core::HRESULT::ok)
            .map_err(|e| runtime_error(&e))?;

        let products = query.Products().map_err(|e| runtime_error(&e))?;
        products
            .into_iter()
            .map(|pair| StoreProduct::new(pair.Value().map_err(|e| runtime_error(&e))?))
            .collect()
    }

    async fn generate_user_jwt(&self, token: &str, user_id: &str) -> Result<String> {
        let jwt = self
            .inner
            .GetCustomerPurchaseIdAsync(&HSTRING::from(token), &HSTRING::from(user_id))
            .and_then(|op| op.get())
            .map_err(|e| runtime_error(&e))?;
        Ok(jwt.to_string())
    }

    async fn all_locally_authenticated_user_hashes(&self) -> Result<Vec<String>> {
        // Should be a single user, but the API speaks about collections.
        let users = User::FindAllAsyncByTypeAndStatus(
            UserType::LocalUser,
            UserAuthenticationStatus::LocallyAuthenticated,
        )
        .and_then(|op| op.get())
        .map_err(|e| runtime_error(&e))?;

        let property = KnownUserProperties::AccountName().map_err(|e| runtime_error(&e))?;
        let mut hashes = Vec::new();
        for user in users {
            let name = user
                .GetPropertyAsync(&property)
                .and_then(|op| op.get())
                .and_then(|value| value.cast::<IReference<HSTRING>>())
                .and_then(|value| value.Value())
                .map_err(|e| runtime_error(&e))?;

            let user = UserInfo::from_account_name(&name.to_string());
            if !user.is_empty() {
                hashes.push(user.id().to_string());
            }
        }

        Ok(hashes)
    }

    #[allow(unsafe_code)]
    fn init_dialogs(&mut self, window: HWND) -> Result<()> {
        // Apps without a CoreWindow must tell the runtime which window owns
        // the store dialogs.
        let iiw: IInitializeWithWindow = self.inner.cast().map_err(|e| runtime_error(&e))?;
        // SAFETY: `window` is a live top level window handle owned by the caller.
        unsafe { iiw.Initialize(window) }.map_err(|e| runtime_error(&e))
    }
}
