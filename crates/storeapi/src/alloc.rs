//! Buffers handed over to the caller.
//!
//! Memory comes from the OS allocator (`CoTaskMemAlloc` on Windows, the C
//! heap elsewhere) so the other side of the ABI can release it without
//! knowing anything about the Rust allocator.

#![allow(unsafe_code)]

use std::ffi::{c_char, c_void};

use storeapi_core::{ErrorCode, Result, StoreError};

/// Copies `bytes` into a fresh caller-owned buffer. No terminator is added.
///
/// # Errors
///
/// [`ErrorCode::AllocationFailure`] if the allocator returns null.
pub fn copy_to_caller(bytes: &[u8]) -> Result<*mut c_char> {
    // Some allocators return null for empty requests.
    let size = bytes.len().max(1);

    // SAFETY: plain allocation, checked for null below.
    let buffer = unsafe { raw_alloc(size) }.cast::<u8>();
    if buffer.is_null() {
        return Err(StoreError::new(
            ErrorCode::AllocationFailure,
            format!("could not allocate {size} bytes"),
        ));
    }

    // SAFETY: `buffer` holds at least `bytes.len()` bytes and cannot overlap a
    // live Rust slice.
    unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), buffer, bytes.len()) };
    Ok(buffer.cast())
}

/// Releases a buffer returned by [`copy_to_caller`]. Null is ignored.
///
/// # Safety
///
/// `buffer` must be null or come from [`copy_to_caller`] and not have been
/// released yet.
pub unsafe fn release(buffer: *mut c_char) {
    if buffer.is_null() {
        return;
    }
    // SAFETY: forwarded from the caller.
    unsafe { raw_free(buffer.cast()) };
}

#[cfg(target_os = "windows")]
unsafe fn raw_alloc(size: usize) -> *mut c_void {
    unsafe { windows::Win32::System::Com::CoTaskMemAlloc(size) }
}

#[cfg(target_os = "windows")]
unsafe fn raw_free(buffer: *mut c_void) {
    unsafe { windows::Win32::System::Com::CoTaskMemFree(Some(buffer.cast_const())) };
}

#[cfg(not(target_os = "windows"))]
unsafe fn raw_alloc(size: usize) -> *mut c_void {
    unsafe { libc::malloc(size) }
}

#[cfg(not(target_os = "windows"))]
unsafe fn raw_free(buffer: *mut c_void) {
    unsafe { libc::free(buffer) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_and_release() {
        let jwt = b"eyJhbGciOiJIUzI1NiJ9.e30.sig";

        let buffer = copy_to_caller(jwt).unwrap();
        let copied = unsafe { std::slice::from_raw_parts(buffer.cast::<u8>(), jwt.len()) };
        assert_eq!(copied, jwt);

        unsafe { release(buffer) };
    }

    #[test]
    fn test_empty_copy_is_still_a_buffer() {
        let buffer = copy_to_caller(&[]).unwrap();
        assert!(!buffer.is_null());
        unsafe { release(buffer) };
    }

    #[test]
    fn test_release_null_is_noop() {
        unsafe { release(std::ptr::null_mut()) };
    }
}
