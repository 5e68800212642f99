//! The C entry points.
//!
//! Protocol: every function returns `0` on success and a negative
//! [`ErrorCode`] otherwise. Output parameters are only written on success.
//! A subscription that is not active is not an error: the expiration date
//! output is then [`NOT_SUBSCRIBED`](storeapi_core::NOT_SUBSCRIBED).

#![allow(unsafe_code)]
#![allow(non_snake_case)]

use std::ffi::c_char;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use storeapi_core::{Context, ErrorCode, Result, ServerStoreService, StoreError};

use crate::alloc;
use crate::context::default_context;
use crate::logging;
use crate::validate::{input_str, MAX_PRODUCT_ID_LEN, MAX_TOKEN_LEN};

/// Returns the current user subscription expiration date for `product_id`
/// as seconds since the Unix epoch via `expiration_unix`.
///
/// # Safety
///
/// `product_id` must be null or point to `length` readable bytes.
/// `expiration_unix` must be null or valid for a write of one `i64`.
#[no_mangle]
pub unsafe extern "C" fn GetSubscriptionExpirationDate(
    product_id: *const c_char,
    length: isize,
    expiration_unix: *mut i64,
) -> isize {
    unsafe { subscription_expiration_date(default_context, product_id, length, expiration_unix) }
}

/// Outputs the user JWT for the server `access_token` via `jwt_buf` and its
/// length in bytes via `jwt_len`. The buffer is not null-terminated.
///
/// The caller owns the buffer and must release it with [`FreeUserJWT`] (or
/// `CoTaskMemFree` on Windows).
///
/// # Safety
///
/// `access_token` must be null or point to `length` readable bytes.
/// `jwt_buf` and `jwt_len` must be null or valid for a write.
#[no_mangle]
pub unsafe extern "C" fn GenerateUserJWT(
    access_token: *const c_char,
    length: isize,
    jwt_buf: *mut *mut c_char,
    jwt_len: *mut u64,
) -> isize {
    unsafe { user_jwt(default_context, access_token, length, jwt_buf, jwt_len) }
}

/// Releases a buffer returned by [`GenerateUserJWT`]. Null is ignored.
///
/// # Safety
///
/// `jwt_buf` must be null or a buffer from [`GenerateUserJWT`] that was not
/// released yet.
#[no_mangle]
pub unsafe extern "C" fn FreeUserJWT(jwt_buf: *mut c_char) {
    unsafe { alloc::release(jwt_buf) };
}

/// [`GetSubscriptionExpirationDate`] over the backend `make_context` builds.
/// The backend is only built once the arguments are valid.
///
/// # Safety
///
/// Same as [`GetSubscriptionExpirationDate`].
pub unsafe fn subscription_expiration_date<C, F>(
    make_context: F,
    product_id: *const c_char,
    length: isize,
    expiration_unix: *mut i64,
) -> isize
where
    C: Context,
    F: FnOnce() -> Result<C>,
{
    boundary("GetSubscriptionExpirationDate", || {
        let product_id = unsafe { input_str(product_id, length, MAX_PRODUCT_ID_LEN) }?;
        if expiration_unix.is_null() {
            return Err(StoreError::from_code(ErrorCode::NullOutputPtr));
        }

        let service = ServerStoreService::new(make_context()?);
        let expiration = block_on(service.current_expiration_date(&product_id))??;

        // SAFETY: checked for null above, valid for writes per the contract.
        unsafe { expiration_unix.write(expiration) };
        Ok(())
    })
}

/// [`GenerateUserJWT`] over the backend `make_context` builds.
/// The backend is only built once the arguments are valid.
///
/// # Safety
///
/// Same as [`GenerateUserJWT`].
pub unsafe fn user_jwt<C, F>(
    make_context: F,
    access_token: *const c_char,
    length: isize,
    jwt_buf: *mut *mut c_char,
    jwt_len: *mut u64,
) -> isize
where
    C: Context,
    F: FnOnce() -> Result<C>,
{
    boundary("GenerateUserJWT", || {
        let token = unsafe { input_str(access_token, length, MAX_TOKEN_LEN) }?;
        if jwt_buf.is_null() || jwt_len.is_null() {
            return Err(StoreError::from_code(ErrorCode::NullOutputPtr));
        }

        let service = ServerStoreService::new(make_context()?);
        let jwt = block_on(async {
            let user = service.current_user_info().await?;
            service.generate_user_jwt(&token, &user).await
        })??;

        let size = u64::try_from(jwt.len()).map_err(StoreError::runtime)?;
        let buffer = alloc::copy_to_caller(jwt.as_bytes())?;
        tracing::debug!(jwt_len = size, "User JWT generated");

        // SAFETY: both checked for null above, valid for writes per the
        // contract.
        unsafe {
            jwt_buf.write(buffer);
            jwt_len.write(size);
        }
        Ok(())
    })
}

/// Drives `future` on a runtime private to this call.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(StoreError::runtime)?;
    Ok(runtime.block_on(future))
}

/// Runs `call`, logging and translating its outcome into the integer that
/// crosses the ABI. Panics never unwind past this point.
fn boundary<F>(function: &'static str, call: F) -> isize
where
    F: FnOnce() -> Result<()>,
{
    logging::init();

    let code = match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => ErrorCode::None,
        Ok(Err(err)) => {
            tracing::warn!(
                function,
                code = err.code().as_i32(),
                detail = err.detail(),
                location = %err.location(),
                "{}",
                err.code()
            );
            err.code()
        }
        Err(_) => {
            tracing::error!(function, "Panicked while serving the call");
            ErrorCode::Unknown
        }
    };

    to_int(code)
}

fn to_int(code: ErrorCode) -> isize {
    isize::try_from(code.as_i32()).unwrap_or(-1)
}
