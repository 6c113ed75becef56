//! Layered classification through a config loading call chain.

use once_cell::sync::Lazy;
use regex::Regex;
use stackerr::{
    find_as, is, is_code, lookup, must_register, parse_coder, register, wrap_c, Coder,
    DefaultCoder, Error, ResultExt, UNKNOWN_CODE,
};

const CONFIGURATION_NOT_VALID: i32 = 1000;
const ERR_INVALID_JSON: i32 = 1001;
const ERR_EOF: i32 = 1002;
const ERR_LOAD_CONFIG_FAILED: i32 = 1003;

static CODES: Lazy<()> = Lazy::new(|| {
    must_register(DefaultCoder::new_static(
        CONFIGURATION_NOT_VALID,
        500,
        "ConfigurationNotValid error",
        "",
    ));
    must_register(DefaultCoder::new_static(ERR_INVALID_JSON, 500, "Data is not valid JSON", ""));
    must_register(DefaultCoder::new_static(ERR_EOF, 500, "End of input", ""));
    must_register(DefaultCoder::new_static(
        ERR_LOAD_CONFIG_FAILED,
        500,
        "Load configuration file failed",
        "",
    ));
});

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("read: end of input")]
struct ReadEof;

fn load_config() -> stackerr::Result<()> {
    decode_config().wrap_c(
        CONFIGURATION_NOT_VALID,
        "service configuration could not be loaded",
    )
}

fn decode_config() -> stackerr::Result<()> {
    read_config().wrap_c(ERR_INVALID_JSON, "could not decode configuration data")
}

#[inline(never)]
fn read_config() -> stackerr::Result<()> {
    Err(ReadEof).wrap_c(ERR_EOF, "could not read configuration file")
}

#[test]
fn outermost_code_classifies() {
    Lazy::force(&CODES);
    let err = load_config().unwrap_err();

    let coder = parse_coder(&err);
    assert_eq!(coder.code(), CONFIGURATION_NOT_VALID);
    assert_eq!(coder.text(), "ConfigurationNotValid error");
    assert_eq!(coder.http_status(), 500);
}

#[test]
fn every_layer_code_is_present() {
    Lazy::force(&CODES);
    let err = load_config().unwrap_err();

    assert!(is_code(&err, CONFIGURATION_NOT_VALID));
    assert!(is_code(&err, ERR_INVALID_JSON));
    assert!(is_code(&err, ERR_EOF));
    assert!(!is_code(&err, ERR_LOAD_CONFIG_FAILED));
}

#[test]
fn original_error_survives() {
    let err = load_config().unwrap_err();
    assert!(is(&err, &ReadEof));
    assert_eq!(find_as::<ReadEof>(&err), Some(&ReadEof));
    assert_eq!(err.to_string(), "service configuration could not be loaded");
    assert_eq!(err.root_cause().to_string(), "read: end of input");
}

#[test]
fn innermost_stack_points_at_read_config() {
    let err = load_config().unwrap_err();
    let eof_layer = stackerr::chain(&err)
        .filter_map(|e| e.downcast_ref::<Error>())
        .find(|e| e.code() == Some(ERR_EOF))
        .expect("eof layer");

    let re = Regex::new(r"read_config \S+load_config\.rs:\d+$").unwrap();
    let stack = eof_layer.stack().expect("wrap_c captures a stack");
    assert!(
        stack.iter().any(|frame| re.is_match(&frame.to_text())),
        "no read_config frame in:\n{:#}",
        stack
    );
}

#[test]
fn nearest_wrap_wins_and_unknown_falls_back() {
    Lazy::force(&CODES);
    let base = Error::new("base");
    let err = Error::wrap_c(Error::wrap_c(base, ERR_EOF, "a"), ERR_INVALID_JSON, "b");
    assert_eq!(parse_coder(&err).code(), ERR_INVALID_JSON);

    let err = wrap_c(Some(Error::new("base")), 424_242, "m").expect("wrapped");
    let coder = parse_coder(&err);
    assert_eq!(coder.code(), UNKNOWN_CODE);
    assert_eq!(coder.http_status(), 500);
}

#[test]
fn register_twice_last_wins() {
    register(DefaultCoder::new_static(5, 400, "first", ""));
    register(DefaultCoder::new_static(5, 409, "second", ""));
    let coder = lookup(5).expect("registered");
    assert_eq!(coder.text(), "second");
    assert_eq!(coder.http_status(), 409);
}

#[test]
#[should_panic(expected = "already registered")]
fn must_register_twice_panics() {
    must_register(DefaultCoder::new_static(6, 400, "first", ""));
    must_register(DefaultCoder::new_static(6, 400, "second", ""));
}

#[test]
#[should_panic(expected = "reserved")]
fn register_zero_panics() {
    register(DefaultCoder::new_static(0, 500, "zero", ""));
}
