use tracing::debug;

use crate::api::NetApi;
use crate::buffer::NetBuffer;
use crate::error::NativeCallError;
use crate::level::SessionLevel;
use crate::record::{decode_record, SessionRecord};

/// Runs `NetSessionEnum` against a host and decodes the result.
#[derive(Debug, Default, Clone)]
pub struct SessionEnumerator<A> {
    api: A,
}

impl<A: NetApi> SessionEnumerator<A> {
    pub fn new(api: A) -> Self {
        SessionEnumerator { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Enumerate the sessions on `host` at `level`.
    ///
    /// On a non-zero status nothing is decoded and no buffer is released. On
    /// success the returned sequence owns the native buffer and releases it when
    /// dropped, whether or not every record was consumed.
    pub fn enumerate(&self, host: &str, level: SessionLevel) -> Result<Sessions<'_, A>, NativeCallError> {
        debug!("NetSessionEnum host={} level={}", host, level);
        let response = self.api.session_enum(host, level);

        if response.status != 0 {
            return Err(NativeCallError::new(response.status));
        }

        let buffer = unsafe { NetBuffer::from_raw(&self.api, response.buffer) };
        let len = match buffer {
            Some(_) => response.entries_read as usize,
            None => 0,
        };

        if response.total_entries != response.entries_read {
            debug!(
                "{} reported {} total sessions but returned {}",
                host, response.total_entries, response.entries_read
            );
        }

        Ok(Sessions {
            buffer,
            level,
            index: 0,
            len,
            total: response.total_entries,
        })
    }
}

/// Lazily decoded sessions over a live netapi32 buffer.
pub struct Sessions<'a, A: NetApi + ?Sized> {
    buffer: Option<NetBuffer<'a, A>>,
    level: SessionLevel,
    index: usize,
    len: usize,
    total: u32,
}

impl<A: NetApi + ?Sized> Sessions<'_, A> {
    pub fn level(&self) -> SessionLevel {
        self.level
    }

    /// `totalentries` as reported by the call.
    pub fn total(&self) -> u32 {
        self.total
    }
}

impl<A: NetApi + ?Sized> Iterator for Sessions<'_, A> {
    type Item = SessionRecord;

    fn next(&mut self) -> Option<SessionRecord> {
        if self.index >= self.len {
            return None;
        }
        let buffer = self.buffer.as_ref()?;
        // index < entries_read and the buffer is still owned, so the record is live.
        let record = unsafe { decode_record(buffer.as_ptr(), self.level, self.index) };
        self.index += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<A: NetApi + ?Sized> ExactSizeIterator for Sessions<'_, A> {}
