//! The native seam: one enumeration call and one buffer release.

use crate::level::SessionLevel;

/// `MAX_PREFERRED_LENGTH`: ask netapi32 to allocate as much as the result needs.
pub const MAX_PREFERRED_LENGTH: u32 = u32::MAX;

/// `ERROR_NOT_SUPPORTED`
pub const ERROR_NOT_SUPPORTED: u32 = 50;

/// Raw out-parameters of one `NetSessionEnum` call.
#[derive(Debug)]
pub struct EnumResponse {
    pub status: u32,
    pub buffer: *mut u8,
    pub entries_read: u32,
    pub total_entries: u32,
}

impl EnumResponse {
    pub fn failed(status: u32) -> Self {
        EnumResponse {
            status,
            buffer: std::ptr::null_mut(),
            entries_read: 0,
            total_entries: 0,
        }
    }
}

/// Access to `NetSessionEnum` and `NetApiBufferFree`.
///
/// # Safety
///
/// Whenever [`NetApi::session_enum`] returns status 0, `buffer` must be null or
/// point to `entries_read` consecutive, properly aligned records of `level`'s
/// native layout. Every string pointer in those records must be null or a
/// null-terminated UTF-16 string, and all of it must stay valid until the
/// buffer is passed to [`NetApi::free_buffer`].
///
/// Implementing the trait without `unsafe` is rejected:
///
/// ```compile_fail
/// use session_enum::api::{EnumResponse, NetApi};
/// use session_enum::SessionLevel;
///
/// struct Bogus;
///
/// impl NetApi for Bogus {
///     fn session_enum(&self, _server: &str, _level: SessionLevel) -> EnumResponse {
///         EnumResponse { status: 0, buffer: 0x10 as *mut u8, entries_read: 1, total_entries: 1 }
///     }
///
///     unsafe fn free_buffer(&self, _buffer: *mut u8) {}
/// }
/// ```
pub unsafe trait NetApi {
    /// Enumerate sessions on `server` with no client or user filter, in a single
    /// unbounded request.
    fn session_enum(&self, server: &str, level: SessionLevel) -> EnumResponse;

    /// Release a buffer returned by [`NetApi::session_enum`].
    ///
    /// # Safety
    ///
    /// `buffer` must be a non-null buffer obtained from this API that has not
    /// been released yet.
    unsafe fn free_buffer(&self, buffer: *mut u8);
}

unsafe impl<T: NetApi + ?Sized> NetApi for &T {
    fn session_enum(&self, server: &str, level: SessionLevel) -> EnumResponse {
        (**self).session_enum(server, level)
    }

    unsafe fn free_buffer(&self, buffer: *mut u8) {
        (**self).free_buffer(buffer)
    }
}

#[cfg(windows)]
pub use self::netapi32::Netapi32;

#[cfg(windows)]
pub type PlatformApi = Netapi32;

#[cfg(not(windows))]
pub type PlatformApi = Unsupported;

#[cfg(windows)]
mod netapi32 {
    use std::ffi::c_void;
    use std::ptr::null_mut;

    use windows::core::PCWSTR;
    use windows::Win32::NetworkManagement::NetManagement::NetApiBufferFree;
    use windows::Win32::Storage::FileSystem::NetSessionEnum;

    use super::{EnumResponse, NetApi, MAX_PREFERRED_LENGTH};
    use crate::level::SessionLevel;
    use crate::wide::to_wide;

    /// `NetSessionEnum` / `NetApiBufferFree` from netapi32.dll.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Netapi32;

    // netapi32 allocates the records and their strings in one block that lives
    // until NetApiBufferFree.
    unsafe impl NetApi for Netapi32 {
        fn session_enum(&self, server: &str, level: SessionLevel) -> EnumResponse {
            let mut buffer: *mut u8 = null_mut();
            let mut entries_read: u32 = 0;
            let mut total_entries: u32 = 0;

            let server_wide = to_wide(server);
            let server_name = if server.is_empty() {
                PCWSTR::null()
            } else {
                PCWSTR(server_wide.as_ptr())
            };

            let status = unsafe {
                NetSessionEnum(
                    server_name,
                    PCWSTR::null(),
                    PCWSTR::null(),
                    level.as_u32(),
                    &mut buffer,
                    MAX_PREFERRED_LENGTH,
                    &mut entries_read,
                    &mut total_entries,
                    None,
                )
            };

            EnumResponse {
                status,
                buffer,
                entries_read,
                total_entries,
            }
        }

        unsafe fn free_buffer(&self, buffer: *mut u8) {
            NetApiBufferFree(Some(buffer as *const c_void));
        }
    }
}

/// Stand-in for targets without netapi32: every call fails with
/// `ERROR_NOT_SUPPORTED` and never hands out a buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsupported;

unsafe impl NetApi for Unsupported {
    fn session_enum(&self, _server: &str, _level: SessionLevel) -> EnumResponse {
        EnumResponse::failed(ERROR_NOT_SUPPORTED)
    }

    unsafe fn free_buffer(&self, _buffer: *mut u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_fails_without_buffer() {
        let response = Unsupported.session_enum("localhost", SessionLevel::Level10);
        assert_eq!(response.status, ERROR_NOT_SUPPORTED);
        assert!(response.buffer.is_null());
        assert_eq!(response.entries_read, 0);
    }
}
