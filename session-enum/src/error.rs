use thiserror::Error;

/// A non-zero status returned by `NetSessionEnum`.
///
/// Access denied, unknown host, unsupported level and similar conditions are
/// all reported this way and only distinguished by `code`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("status {code} ({message})")]
pub struct NativeCallError {
    pub code: u32,
    pub message: String,
}

impl NativeCallError {
    pub fn new(code: u32) -> Self {
        NativeCallError {
            code,
            message: describe_status(code),
        }
    }
}

/// Human-readable text for a Win32 / NERR status code.
pub fn describe_status(code: u32) -> String {
    static KNOWN_STATUS: &[(u32, &str)] = &[
        (5, "Access is denied"),
        (8, "Not enough memory resources are available to process this command"),
        (50, "The request is not supported"),
        (53, "The network path was not found"),
        (87, "The parameter is incorrect"),
        (123, "The filename, directory name, or volume label syntax is incorrect"),
        (124, "The system call level is not correct"),
        (234, "More data is available"),
        (1722, "The RPC server is unavailable"),
        (2102, "The Workstation service has not been started"),
        (2221, "The user name could not be found"),
        (2312, "A session does not exist with that computer name"),
    ];

    if let Some((_, text)) = KNOWN_STATUS.iter().find(|(known, _)| *known == code) {
        return text.to_string();
    }
    system_message(code)
}

#[cfg(windows)]
fn system_message(code: u32) -> String {
    let message = windows::core::HRESULT::from_win32(code).message();
    let message = message.trim_end();
    if message.is_empty() {
        "unknown error".to_string()
    } else {
        message.to_string()
    }
}

#[cfg(not(windows))]
fn system_message(_code: u32) -> String {
    "unknown error".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_message() {
        let err = NativeCallError::new(5);
        assert_eq!(err.code, 5);
        assert_eq!(err.to_string(), "status 5 (Access is denied)");
    }

    #[test]
    fn test_netapi_codes_are_described() {
        assert_eq!(describe_status(2312), "A session does not exist with that computer name");
        assert_eq!(describe_status(124), "The system call level is not correct");
    }

    #[test]
    fn test_unknown_code_still_carries_code() {
        let err = NativeCallError::new(0xDEAD);
        assert!(err.to_string().starts_with("status 57005 ("));
    }
}
