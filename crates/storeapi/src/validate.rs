//! String argument checks for the exported functions.

use std::borrow::Cow;
use std::ffi::c_char;

use storeapi_core::{ErrorCode, Result, StoreError};

/// Longest product ID accepted, in bytes. In practice IDs are much shorter.
pub const MAX_PRODUCT_ID_LEN: usize = 128;

/// Longest access token accepted, in bytes.
pub const MAX_TOKEN_LEN: usize = 4096;

/// Checks a `(pointer, length)` string argument without reading it and
/// returns the length as a `usize`.
///
/// `length` counts bytes and excludes any terminator the caller may append.
///
/// # Errors
///
/// In this order: [`ErrorCode::NullInputPtr`], [`ErrorCode::NegativeLength`],
/// [`ErrorCode::ZeroLength`], [`ErrorCode::TooBigLength`].
pub fn check_input(input: *const c_char, length: isize, max_len: usize) -> Result<usize> {
    if input.is_null() {
        return Err(StoreError::from_code(ErrorCode::NullInputPtr));
    }

    let length = usize::try_from(length).map_err(|_| {
        StoreError::new(ErrorCode::NegativeLength, format!("length={length}"))
    })?;

    if length == 0 {
        return Err(StoreError::from_code(ErrorCode::ZeroLength));
    }

    if length > max_len {
        return Err(StoreError::new(
            ErrorCode::TooBigLength,
            format!("length={length}, max={max_len}"),
        ));
    }

    Ok(length)
}

/// Validates and borrows a string argument.
///
/// Invalid UTF-8 sequences are replaced, so they can never match a store ID.
///
/// # Errors
///
/// See [`check_input`].
///
/// # Safety
///
/// If `input` is not null it must point to at least `length` readable bytes
/// that stay valid and unmodified for `'a`.
#[allow(unsafe_code)]
pub unsafe fn input_str<'a>(
    input: *const c_char,
    length: isize,
    max_len: usize,
) -> Result<Cow<'a, str>> {
    let length = check_input(input, length, max_len)?;
    // SAFETY: non-null and readable for `length` bytes per the contract above.
    let bytes = unsafe { std::slice::from_raw_parts(input.cast::<u8>(), length) };
    Ok(String::from_utf8_lossy(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &[u8] = b"9P25B50XMKXT";

    fn ptr(bytes: &[u8]) -> *const c_char {
        bytes.as_ptr().cast()
    }

    #[test]
    fn test_null_is_checked_first() {
        let err = check_input(std::ptr::null(), -1, MAX_PRODUCT_ID_LEN).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NullInputPtr);
    }

    #[test]
    fn test_negative_length() {
        let err = check_input(ptr(VALID), -3, MAX_PRODUCT_ID_LEN).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NegativeLength);
    }

    #[test]
    fn test_zero_length() {
        let err = check_input(ptr(VALID), 0, MAX_PRODUCT_ID_LEN).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ZeroLength);
    }

    #[test]
    fn test_length_limits() {
        let long = vec![b'a'; MAX_TOKEN_LEN + 1];

        assert_eq!(check_input(ptr(&long), 4096, MAX_TOKEN_LEN).unwrap(), 4096);

        let err = check_input(ptr(&long), 4097, MAX_TOKEN_LEN).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TooBigLength);

        let err = check_input(ptr(&long), 129, MAX_PRODUCT_ID_LEN).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TooBigLength);
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_input_str_reads_only_length_bytes() {
        let input = b"A_NICE_ID and trailing garbage";

        let s = unsafe { input_str(ptr(input), 9, MAX_PRODUCT_ID_LEN) }.unwrap();

        assert_eq!(s, "A_NICE_ID");
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_input_str_replaces_invalid_utf8() {
        let input = [b'i', b'd', 0xFF];

        let s = unsafe { input_str(ptr(&input), 3, MAX_PRODUCT_ID_LEN) }.unwrap();

        assert_eq!(s, "id\u{FFFD}");
    }
}
