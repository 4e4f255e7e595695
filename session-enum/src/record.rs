//! Native `SESSION_INFO_*` layouts and the owned records decoded from them.

use serde::Serialize;

use crate::level::SessionLevel;
use crate::wide::from_wide_ptr;

//========================================================================
// NATIVE LAYOUTS
//========================================================================

/// `SESSION_INFO_0`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SessionInfo0 {
    pub cname: *const u16,
}

/// `SESSION_INFO_1`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SessionInfo1 {
    pub cname: *const u16,
    pub username: *const u16,
    pub num_opens: u32,
    pub time: u32,
    pub idle_time: u32,
    pub user_flags: u32,
}

/// `SESSION_INFO_2`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SessionInfo2 {
    pub cname: *const u16,
    pub username: *const u16,
    pub num_opens: u32,
    pub time: u32,
    pub idle_time: u32,
    pub user_flags: u32,
    pub cltype_name: *const u16,
}

/// `SESSION_INFO_10`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SessionInfo10 {
    pub cname: *const u16,
    pub username: *const u16,
    pub time: u32,
    pub idle_time: u32,
}

/// `SESSION_INFO_502`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SessionInfo502 {
    pub cname: *const u16,
    pub username: *const u16,
    pub num_opens: u32,
    pub time: u32,
    pub idle_time: u32,
    pub user_flags: u32,
    pub cltype_name: *const u16,
    pub transport: *const u16,
}

// The layouts above must match the windows crate's bindings byte for byte.
#[cfg(windows)]
const _: () = {
    use std::mem::{align_of, offset_of, size_of};
    use windows::Win32::Storage::FileSystem::{
        SESSION_INFO_0, SESSION_INFO_1, SESSION_INFO_10, SESSION_INFO_2, SESSION_INFO_502,
    };

    assert!(size_of::<SessionInfo0>() == size_of::<SESSION_INFO_0>());
    assert!(align_of::<SessionInfo0>() == align_of::<SESSION_INFO_0>());

    assert!(size_of::<SessionInfo1>() == size_of::<SESSION_INFO_1>());
    assert!(align_of::<SessionInfo1>() == align_of::<SESSION_INFO_1>());
    assert!(offset_of!(SessionInfo1, user_flags) == offset_of!(SESSION_INFO_1, sesi1_user_flags));

    assert!(size_of::<SessionInfo2>() == size_of::<SESSION_INFO_2>());
    assert!(align_of::<SessionInfo2>() == align_of::<SESSION_INFO_2>());
    assert!(offset_of!(SessionInfo2, cltype_name) == offset_of!(SESSION_INFO_2, sesi2_cltype_name));

    assert!(size_of::<SessionInfo10>() == size_of::<SESSION_INFO_10>());
    assert!(align_of::<SessionInfo10>() == align_of::<SESSION_INFO_10>());
    assert!(offset_of!(SessionInfo10, idle_time) == offset_of!(SESSION_INFO_10, sesi10_idle_time));

    assert!(size_of::<SessionInfo502>() == size_of::<SESSION_INFO_502>());
    assert!(align_of::<SessionInfo502>() == align_of::<SESSION_INFO_502>());
    assert!(offset_of!(SessionInfo502, user_flags) == offset_of!(SESSION_INFO_502, sesi502_user_flags));
    assert!(offset_of!(SessionInfo502, transport) == offset_of!(SESSION_INFO_502, sesi502_transport));
};

/// A native record layout that can be copied out into an owned [`SessionRecord`].
pub trait RawSession {
    const LEVEL: SessionLevel;

    /// # Safety
    ///
    /// Every string pointer in `self` must be null or reference a live,
    /// null-terminated UTF-16 string.
    unsafe fn to_record(&self) -> SessionRecord;
}

//========================================================================
// OWNED RECORDS
//========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session0 {
    pub cname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session1 {
    pub cname: String,
    pub username: String,
    pub num_opens: u32,
    pub time: u32,
    pub idle_time: u32,
    pub user_flags: u32,
    pub user_flag_names: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session2 {
    #[serde(flatten)]
    pub info: Session1,
    pub cltype_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session10 {
    pub cname: String,
    pub username: String,
    pub time: u32,
    pub idle_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session502 {
    #[serde(flatten)]
    pub info: Session2,
    pub transport: String,
}

/// One decoded session. The variant always matches the level the call was made with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SessionRecord {
    Level0(Session0),
    Level1(Session1),
    Level2(Session2),
    Level10(Session10),
    Level502(Session502),
}

impl SessionRecord {
    pub fn level(&self) -> SessionLevel {
        match self {
            SessionRecord::Level0(_) => SessionLevel::Level0,
            SessionRecord::Level1(_) => SessionLevel::Level1,
            SessionRecord::Level2(_) => SessionLevel::Level2,
            SessionRecord::Level10(_) => SessionLevel::Level10,
            SessionRecord::Level502(_) => SessionLevel::Level502,
        }
    }

    pub fn cname(&self) -> &str {
        match self {
            SessionRecord::Level0(s) => &s.cname,
            SessionRecord::Level1(s) => &s.cname,
            SessionRecord::Level2(s) => &s.info.cname,
            SessionRecord::Level10(s) => &s.cname,
            SessionRecord::Level502(s) => &s.info.info.cname,
        }
    }

    /// `None` at level 0, which carries no user.
    pub fn username(&self) -> Option<&str> {
        match self {
            SessionRecord::Level0(_) => None,
            SessionRecord::Level1(s) => Some(&s.username),
            SessionRecord::Level2(s) => Some(&s.info.username),
            SessionRecord::Level10(s) => Some(&s.username),
            SessionRecord::Level502(s) => Some(&s.info.info.username),
        }
    }
}

/// Translate `sesiX_user_flags` bits into names.
pub fn user_flag_names(flags: u32) -> Vec<&'static str> {
    static USER_FLAG_BITS: &[(u32, &str)] = &[
        (0x0000_0001, "guest"),         // SESS_GUEST
        (0x0000_0002, "no_encryption"), // SESS_NOENCRYPTION
    ];

    USER_FLAG_BITS
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}

//========================================================================
// DECODING
//========================================================================

unsafe fn session1_fields(
    cname: *const u16,
    username: *const u16,
    num_opens: u32,
    time: u32,
    idle_time: u32,
    user_flags: u32,
) -> Session1 {
    Session1 {
        cname: from_wide_ptr(cname),
        username: from_wide_ptr(username),
        num_opens,
        time,
        idle_time,
        user_flags,
        user_flag_names: user_flag_names(user_flags),
    }
}

impl RawSession for SessionInfo0 {
    const LEVEL: SessionLevel = SessionLevel::Level0;

    unsafe fn to_record(&self) -> SessionRecord {
        SessionRecord::Level0(Session0 {
            cname: from_wide_ptr(self.cname),
        })
    }
}

impl RawSession for SessionInfo1 {
    const LEVEL: SessionLevel = SessionLevel::Level1;

    unsafe fn to_record(&self) -> SessionRecord {
        SessionRecord::Level1(session1_fields(
            self.cname,
            self.username,
            self.num_opens,
            self.time,
            self.idle_time,
            self.user_flags,
        ))
    }
}

impl RawSession for SessionInfo2 {
    const LEVEL: SessionLevel = SessionLevel::Level2;

    unsafe fn to_record(&self) -> SessionRecord {
        SessionRecord::Level2(Session2 {
            info: session1_fields(
                self.cname,
                self.username,
                self.num_opens,
                self.time,
                self.idle_time,
                self.user_flags,
            ),
            cltype_name: from_wide_ptr(self.cltype_name),
        })
    }
}

impl RawSession for SessionInfo10 {
    const LEVEL: SessionLevel = SessionLevel::Level10;

    unsafe fn to_record(&self) -> SessionRecord {
        SessionRecord::Level10(Session10 {
            cname: from_wide_ptr(self.cname),
            username: from_wide_ptr(self.username),
            time: self.time,
            idle_time: self.idle_time,
        })
    }
}

impl RawSession for SessionInfo502 {
    const LEVEL: SessionLevel = SessionLevel::Level502;

    unsafe fn to_record(&self) -> SessionRecord {
        SessionRecord::Level502(Session502 {
            info: Session2 {
                info: session1_fields(
                    self.cname,
                    self.username,
                    self.num_opens,
                    self.time,
                    self.idle_time,
                    self.user_flags,
                ),
                cltype_name: from_wide_ptr(self.cltype_name),
            },
            transport: from_wide_ptr(self.transport),
        })
    }
}

unsafe fn read_at<R: RawSession>(base: *const u8, index: usize) -> SessionRecord {
    let offset = index * R::LEVEL.record_size();
    let raw = &*(base.add(offset) as *const R);
    raw.to_record()
}

/// Decode the `index`-th record of a `level` buffer starting at `base`.
///
/// # Safety
///
/// `base` must point to at least `index + 1` properly aligned native records of
/// `level`, whose string pointers are valid for the duration of the call.
pub unsafe fn decode_record(base: *const u8, level: SessionLevel, index: usize) -> SessionRecord {
    match level {
        SessionLevel::Level0 => read_at::<SessionInfo0>(base, index),
        SessionLevel::Level1 => read_at::<SessionInfo1>(base, index),
        SessionLevel::Level2 => read_at::<SessionInfo2>(base, index),
        SessionLevel::Level10 => read_at::<SessionInfo10>(base, index),
        SessionLevel::Level502 => read_at::<SessionInfo502>(base, index),
    }
}

/// Decode `count` consecutive records.
///
/// # Safety
///
/// Same contract as [`decode_record`] for every index below `count`.
pub unsafe fn decode_buffer(base: *const u8, level: SessionLevel, count: usize) -> Vec<SessionRecord> {
    (0..count).map(|i| decode_record(base, level, i)).collect()
}
