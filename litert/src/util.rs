use std::ffi::{c_char, CStr, CString};
use std::path::Path;

use crate::error::{Error, ErrorCause, Result};

/// Calls into the C API and returns early with `$cause` unless the status is OK.
macro_rules! check_status {
    ($call:expr, $cause:expr) => {{
        let status = $call;
        if status != litert_sys::LiteRtStatus_kLiteRtStatusOk {
            tracing::debug!("{} returned LiteRtStatus {}", $cause, status);
            return Err($crate::error::Error::new($cause, status));
        }
    }};
}
pub(crate) use check_status;

/// Borrows a string returned by the C API.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid for `'a`.
pub(crate) unsafe fn c_str_to_str<'a>(ptr: *const c_char) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(Error::runtime_failure(ErrorCause::InvalidStringEncoding));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| Error::runtime_failure(ErrorCause::InvalidStringEncoding))
}

/// Converts a Rust string for the C API, rejecting interior NUL bytes.
pub(crate) fn to_c_string(value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::invalid_argument(ErrorCause::InvalidStringEncoding))
}

/// Converts a path for the C API byte for byte.
///
/// On unix any non-NUL byte sequence is passed through; elsewhere the path must be UTF-8.
pub(crate) fn path_to_c_string(path: &Path) -> Result<CString> {
    #[cfg(unix)]
    let bytes = {
        use std::os::unix::ffi::OsStrExt;
        path.as_os_str().as_bytes().to_vec()
    };
    #[cfg(not(unix))]
    let bytes = path
        .to_str()
        .ok_or_else(|| Error::invalid_argument(ErrorCause::InvalidStringEncoding))?
        .as_bytes()
        .to_vec();
    CString::new(bytes).map_err(|_| Error::invalid_argument(ErrorCause::InvalidStringEncoding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_rejected() {
        // SAFETY: null is explicitly allowed.
        let result = unsafe { c_str_to_str(std::ptr::null()) };
        assert_eq!(
            result,
            Err(Error::runtime_failure(ErrorCause::InvalidStringEncoding))
        );
    }

    #[test]
    fn borrows_valid_string() {
        let owned = CString::new("serving_default").unwrap();
        // SAFETY: `owned` outlives the borrow.
        let borrowed = unsafe { c_str_to_str(owned.as_ptr()) };
        assert_eq!(borrowed, Ok("serving_default"));
    }

    #[test]
    fn interior_nul_is_rejected() {
        assert_eq!(
            to_c_string("model\0.tflite").unwrap_err().cause(),
            ErrorCause::InvalidStringEncoding
        );
        assert!(to_c_string("model.tflite").is_ok());
    }

    #[test]
    fn paths_are_passed_through_unchanged() {
        let c_path = path_to_c_string(Path::new("/models/selfie.tflite")).unwrap();
        assert_eq!(c_path.as_bytes(), b"/models/selfie.tflite");

        let err = path_to_c_string(Path::new("/models/a\0b.tflite")).unwrap_err();
        assert_eq!(err.cause(), ErrorCause::InvalidStringEncoding);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_keep_their_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = b"/models/caf\xe9.tflite";
        let c_path = path_to_c_string(Path::new(OsStr::from_bytes(raw))).unwrap();
        assert_eq!(c_path.as_bytes(), raw);
    }
}
