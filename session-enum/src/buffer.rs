use crate::api::NetApi;

/// Owns a result buffer allocated by netapi32 and releases it on drop.
pub struct NetBuffer<'a, A: NetApi + ?Sized> {
    ptr: *mut u8,
    api: &'a A,
}

impl<'a, A: NetApi + ?Sized> NetBuffer<'a, A> {
    /// Take ownership of `ptr`. Returns `None` for a null pointer, which needs no release.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or an unreleased buffer returned by `api`, and nothing
    /// else may release it.
    pub unsafe fn from_raw(api: &'a A, ptr: *mut u8) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(NetBuffer { ptr, api })
        }
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }
}

impl<A: NetApi + ?Sized> Drop for NetBuffer<'_, A> {
    fn drop(&mut self) {
        unsafe { self.api.free_buffer(self.ptr) };
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::api::EnumResponse;
    use crate::level::SessionLevel;

    #[derive(Default)]
    struct RecordingApi {
        freed: RefCell<Vec<usize>>,
    }

    unsafe impl NetApi for RecordingApi {
        fn session_enum(&self, _server: &str, _level: SessionLevel) -> EnumResponse {
            EnumResponse::failed(5)
        }

        unsafe fn free_buffer(&self, buffer: *mut u8) {
            self.freed.borrow_mut().push(buffer as usize);
        }
    }

    #[test]
    fn test_null_buffer_is_not_owned() {
        let api = RecordingApi::default();
        assert!(unsafe { NetBuffer::from_raw(&api, std::ptr::null_mut()) }.is_none());
        assert!(api.freed.borrow().is_empty());
    }

    #[test]
    fn test_released_once_on_drop() {
        let api = RecordingApi::default();
        let mut backing = [0u8; 8];
        let ptr = backing.as_mut_ptr();

        let buffer = unsafe { NetBuffer::from_raw(&api, ptr) }.unwrap();
        assert_eq!(buffer.as_ptr(), ptr as *const u8);
        assert!(api.freed.borrow().is_empty());
        drop(buffer);

        assert_eq!(*api.freed.borrow(), vec![ptr as usize]);
    }
}
