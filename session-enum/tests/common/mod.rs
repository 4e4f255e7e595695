//! In-memory stand-in for netapi32 used by the integration tests.
//!
//! Each successful call builds a real array of native `SESSION_INFO_*`
//! records whose string fields point at separately allocated UTF-16 strings,
//! the same shape netapi32 hands back.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use session_enum::api::{EnumResponse, NetApi};
use session_enum::record::{SessionInfo0, SessionInfo1, SessionInfo10, SessionInfo2, SessionInfo502};
use session_enum::wide::to_wide;
use session_enum::SessionLevel;

#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    pub cname: String,
    pub username: String,
    pub num_opens: u32,
    pub time: u32,
    pub idle_time: u32,
    pub user_flags: u32,
    pub cltype_name: String,
    pub transport: String,
}

impl FakeSession {
    pub fn new(cname: &str, username: &str, time: u32, idle_time: u32) -> Self {
        FakeSession {
            cname: cname.to_string(),
            username: username.to_string(),
            time,
            idle_time,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub enum Script {
    Fail(u32),
    NullBuffer,
    Sessions(Vec<FakeSession>),
}

enum Records {
    L0(Vec<SessionInfo0>),
    L1(Vec<SessionInfo1>),
    L2(Vec<SessionInfo2>),
    L10(Vec<SessionInfo10>),
    L502(Vec<SessionInfo502>),
}

impl Records {
    fn as_ptr(&self) -> *mut u8 {
        match self {
            Records::L0(v) => v.as_ptr() as *mut u8,
            Records::L1(v) => v.as_ptr() as *mut u8,
            Records::L2(v) => v.as_ptr() as *mut u8,
            Records::L10(v) => v.as_ptr() as *mut u8,
            Records::L502(v) => v.as_ptr() as *mut u8,
        }
    }
}

struct Allocation {
    strings: Vec<Vec<u16>>,
    records: Records,
}

// The raw pointers only reference `strings`, which the allocation owns.
unsafe impl Send for Allocation {}

impl Allocation {
    fn build(level: SessionLevel, sessions: &[FakeSession]) -> Self {
        let mut strings = Vec::new();
        let mut wide = |s: &str| -> *const u16 {
            let w = to_wide(s);
            let p = w.as_ptr();
            strings.push(w);
            p
        };
        // Keep capacity non-zero so an empty result still gets a distinct, non-null buffer.
        let cap = sessions.len().max(1);

        let records = match level {
            SessionLevel::Level0 => {
                let mut v = Vec::with_capacity(cap);
                v.extend(sessions.iter().map(|s| SessionInfo0 { cname: wide(&s.cname) }));
                Records::L0(v)
            }
            SessionLevel::Level1 => {
                let mut v = Vec::with_capacity(cap);
                v.extend(sessions.iter().map(|s| SessionInfo1 {
                    cname: wide(&s.cname),
                    username: wide(&s.username),
                    num_opens: s.num_opens,
                    time: s.time,
                    idle_time: s.idle_time,
                    user_flags: s.user_flags,
                }));
                Records::L1(v)
            }
            SessionLevel::Level2 => {
                let mut v = Vec::with_capacity(cap);
                v.extend(sessions.iter().map(|s| SessionInfo2 {
                    cname: wide(&s.cname),
                    username: wide(&s.username),
                    num_opens: s.num_opens,
                    time: s.time,
                    idle_time: s.idle_time,
                    user_flags: s.user_flags,
                    cltype_name: wide(&s.cltype_name),
                }));
                Records::L2(v)
            }
            SessionLevel::Level10 => {
                let mut v = Vec::with_capacity(cap);
                v.extend(sessions.iter().map(|s| SessionInfo10 {
                    cname: wide(&s.cname),
                    username: wide(&s.username),
                    time: s.time,
                    idle_time: s.idle_time,
                }));
                Records::L10(v)
            }
            SessionLevel::Level502 => {
                let mut v = Vec::with_capacity(cap);
                v.extend(sessions.iter().map(|s| SessionInfo502 {
                    cname: wide(&s.cname),
                    username: wide(&s.username),
                    num_opens: s.num_opens,
                    time: s.time,
                    idle_time: s.idle_time,
                    user_flags: s.user_flags,
                    cltype_name: wide(&s.cltype_name),
                    transport: wide(&s.transport),
                }));
                Records::L502(v)
            }
        };

        Allocation { strings, records }
    }
}

#[derive(Default)]
pub struct FakeNetApi {
    scripts: HashMap<String, Script>,
    live: Mutex<HashMap<usize, Allocation>>,
    calls: Mutex<Vec<(String, SessionLevel)>>,
    frees: AtomicUsize,
    bad_frees: AtomicUsize,
}

impl FakeNetApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: &str, script: Script) -> Self {
        self.scripts.insert(host.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<(String, SessionLevel)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn frees(&self) -> usize {
        self.frees.load(Ordering::SeqCst)
    }

    /// Releases of pointers that were never handed out or already released.
    pub fn bad_frees(&self) -> usize {
        self.bad_frees.load(Ordering::SeqCst)
    }

    pub fn live_buffers(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

unsafe impl NetApi for FakeNetApi {
    fn session_enum(&self, server: &str, level: SessionLevel) -> EnumResponse {
        self.calls.lock().unwrap().push((server.to_string(), level));

        match self.scripts.get(server) {
            // ERROR_BAD_NETPATH
            None => EnumResponse::failed(53),
            Some(Script::Fail(code)) => EnumResponse::failed(*code),
            Some(Script::NullBuffer) => EnumResponse {
                status: 0,
                buffer: std::ptr::null_mut(),
                entries_read: 0,
                total_entries: 0,
            },
            Some(Script::Sessions(sessions)) => {
                let allocation = Allocation::build(level, sessions);
                let buffer = allocation.records.as_ptr();
                self.live.lock().unwrap().insert(buffer as usize, allocation);
                EnumResponse {
                    status: 0,
                    buffer,
                    entries_read: sessions.len() as u32,
                    total_entries: sessions.len() as u32,
                }
            }
        }
    }

    unsafe fn free_buffer(&self, buffer: *mut u8) {
        self.frees.fetch_add(1, Ordering::SeqCst);
        if self.live.lock().unwrap().remove(&(buffer as usize)).is_none() {
            self.bad_frees.fetch_add(1, Ordering::SeqCst);
        }
    }
}
