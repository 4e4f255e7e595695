//! UTF-16 marshalling for netapi32 string fields.

use std::slice;

/// Convert `&str` to wide string, null-terminated.
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Convert a wide pointer to a Rust `String`. Null pointers yield an empty string.
///
/// # Safety
///
/// `wide_ptr` must be null or point to a readable, null-terminated UTF-16 string.
pub unsafe fn from_wide_ptr(wide_ptr: *const u16) -> String {
    if wide_ptr.is_null() {
        return String::new();
    }
    let mut len = 0;
    while *wide_ptr.add(len) != 0 {
        len += 1;
    }
    String::from_utf16_lossy(slice::from_raw_parts(wide_ptr, len))
}
