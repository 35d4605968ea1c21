//! splitledger-ffi
//!
//! C ABI over splitledger-core. Callers pass a JSON group snapshot and get
//! JSON back, so every client shares the same balance and settlement logic.
//!
//! Strings returned by this library are owned by the caller and must be
//! released with [`splitledger_string_free`].

use std::{
    ffi::{CStr, CString},
    os::raw::{c_char, c_int},
    ptr,
};

use splitledger_core::{api_compute_report, api_snapshot_warnings, CoreError, SettlementOptions};
use splitledger_domain::{GroupSnapshot, Money};

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Library version as a static, NUL-terminated string. Do not free.
#[no_mangle]
pub extern "C" fn splitledger_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

/// Computes balances and settlements for the snapshot in `input_json`.
///
/// A non-zero `strict` rejects snapshots with dangling references, empty
/// splits or non-positive amounts; zero skips such expenses instead.
/// Returns the report as JSON, or null with `out_error` set on failure.
#[no_mangle]
pub extern "C" fn splitledger_compute_report(
    input_json: *const c_char,
    strict: c_int,
    out_error: *mut *mut c_char,
) -> *mut c_char {
    clear_error(out_error);
    let options = SettlementOptions {
        strict: strict != 0,
        ..SettlementOptions::default()
    };
    let result = unsafe { parse_snapshot(input_json) }
        .and_then(|snapshot| api_compute_report(&snapshot, &options))
        .and_then(|report| {
            serde_json::to_string(&report).map_err(|err| CoreError::Serde(err.to_string()))
        });
    unsafe { into_c_result(result, out_error) }
}

/// Like [`splitledger_compute_report`] but with an explicit tolerance in
/// cents. Values below one cent are raised to one cent.
#[no_mangle]
pub extern "C" fn splitledger_compute_report_with_tolerance(
    input_json: *const c_char,
    strict: c_int,
    tolerance_cents: i64,
    out_error: *mut *mut c_char,
) -> *mut c_char {
    clear_error(out_error);
    let options = SettlementOptions {
        strict: strict != 0,
        tolerance: Money::from_cents(tolerance_cents.max(1)),
        ..SettlementOptions::default()
    };
    let result = unsafe { parse_snapshot(input_json) }
        .and_then(|snapshot| api_compute_report(&snapshot, &options))
        .and_then(|report| {
            serde_json::to_string(&report).map_err(|err| CoreError::Serde(err.to_string()))
        });
    unsafe { into_c_result(result, out_error) }
}

/// Returns a JSON array of diagnostic messages for the snapshot.
#[no_mangle]
pub extern "C" fn splitledger_snapshot_warnings(
    input_json: *const c_char,
    out_error: *mut *mut c_char,
) -> *mut c_char {
    clear_error(out_error);
    let result = unsafe { parse_snapshot(input_json) }.and_then(|snapshot| {
        serde_json::to_string(&api_snapshot_warnings(&snapshot))
            .map_err(|err| CoreError::Serde(err.to_string()))
    });
    unsafe { into_c_result(result, out_error) }
}

/// Releases a string previously returned by this library. Null is ignored.
#[no_mangle]
pub extern "C" fn splitledger_string_free(value: *mut c_char) {
    if value.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(value));
    }
}

unsafe fn parse_snapshot(input_json: *const c_char) -> Result<GroupSnapshot, CoreError> {
    let raw = c_string_argument(input_json)?;
    serde_json::from_str(&raw).map_err(|err| CoreError::Serde(err.to_string()))
}

unsafe fn into_c_result(
    result: Result<String, CoreError>,
    out_error: *mut *mut c_char,
) -> *mut c_char {
    match result {
        Ok(json) => match CString::new(json) {
            Ok(cstring) => cstring.into_raw(),
            Err(err) => {
                write_error(out_error, &err.to_string());
                ptr::null_mut()
            }
        },
        Err(err) => {
            write_core_error(out_error, err);
            ptr::null_mut()
        }
    }
}

fn clear_error(out_error: *mut *mut c_char) {
    if out_error.is_null() {
        return;
    }
    unsafe {
        *out_error = ptr::null_mut();
    }
}

unsafe fn write_error(out_error: *mut *mut c_char, message: &str) {
    if out_error.is_null() {
        return;
    }
    if let Ok(cstring) = CString::new(message) {
        *out_error = cstring.into_raw();
    }
}

unsafe fn write_core_error(out_error: *mut *mut c_char, err: CoreError) {
    write_error(out_error, &err.to_string());
}

unsafe fn c_string_argument(ptr: *const c_char) -> Result<String, CoreError> {
    if ptr.is_null() {
        return Err(CoreError::InvalidOperation(
            "null string pointer received".into(),
        ));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(|s| s.to_string())
        .map_err(|err| CoreError::InvalidOperation(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const SNAPSHOT: &str = r#"{
        "members": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}, {"id": 3, "name": "C"}],
        "expenses": [{"id": 1, "amount": 90, "paidBy": 1, "splitBetween": [1, 2, 3]}]
    }"#;

    fn call(input: &str, strict: c_int) -> (Option<String>, Option<String>) {
        let input = CString::new(input).expect("no interior nul");
        let mut error: *mut c_char = ptr::null_mut();
        let output = splitledger_compute_report(input.as_ptr(), strict, &mut error);
        (take(output), take(error))
    }

    fn take(value: *mut c_char) -> Option<String> {
        if value.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(value) }
            .to_str()
            .expect("utf-8")
            .to_string();
        splitledger_string_free(value);
        Some(text)
    }

    #[test]
    fn version_matches_package() {
        let version = unsafe { CStr::from_ptr(splitledger_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn compute_report_returns_balances_and_settlements() {
        let (output, error) = call(SNAPSHOT, 1);
        assert!(error.is_none());
        let report: Value = serde_json::from_str(&output.expect("report")).unwrap();

        assert_eq!(report["balances"]["1"]["balance"], "60.00");
        assert_eq!(report["balances"]["2"]["balance"], "-30.00");
        assert_eq!(report["settlements"][0]["from"], "B");
        assert_eq!(report["settlements"][0]["to"], "A");
        assert_eq!(report["settlements"][1]["amount"], "30.00");
    }

    #[test]
    fn strict_mode_reports_dangling_reference() {
        let input = r#"{"members": [{"id": 1, "name": "A"}],
            "expenses": [{"id": 1, "amount": 10, "paidBy": 5, "splitBetween": [1]}]}"#;

        let (output, error) = call(input, 1);
        assert!(output.is_none());
        assert!(error.expect("error message").contains('5'));

        let (output, error) = call(input, 0);
        assert!(error.is_none());
        let report: Value = serde_json::from_str(&output.expect("report")).unwrap();
        assert_eq!(report["settlements"], Value::Array(Vec::new()));
    }

    #[test]
    fn out_of_range_amount_sets_error() {
        let input = r#"{"members": [{"id": 1, "name": "A"}],
            "expenses": [{"id": 1, "amount": "99999999999999.00", "paidBy": 1, "splitBetween": [1]}]}"#;
        let (output, error) = call(input, 0);
        assert!(output.is_none());
        assert!(error.expect("error message").contains("out of range"));
    }

    #[test]
    fn malformed_json_sets_error() {
        let (output, error) = call("{", 1);
        assert!(output.is_none());
        assert!(error.is_some());
    }

    #[test]
    fn null_input_sets_error() {
        let mut error: *mut c_char = ptr::null_mut();
        let output = splitledger_compute_report(ptr::null(), 1, &mut error);
        assert!(output.is_null());
        assert!(take(error).expect("error").contains("null"));
    }

    #[test]
    fn warnings_list_dangling_payer() {
        let input = CString::new(
            r#"{"members": [{"id": 1, "name": "A"}],
                "expenses": [{"id": 1, "amount": 10, "paidBy": 5, "splitBetween": [1]}]}"#,
        )
        .unwrap();
        let mut error: *mut c_char = ptr::null_mut();
        let output = take(splitledger_snapshot_warnings(input.as_ptr(), &mut error));
        let warnings: Vec<String> = serde_json::from_str(&output.expect("warnings")).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unknown payer 5"));
    }
}
