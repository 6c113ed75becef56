//! Layered error codes example
//!
//! Loads a (missing) configuration through three layers, each attaching its
//! own code, then classifies the result the way an HTTP boundary would.
//!
//! # Environment Variables
//!
//! - `RUST_LOG=info` - Show load events
//! - `RUST_LOG=debug` - Also show registry activity
//! - `STACKERR_STACK_DEPTH=<n>` - Frames kept per captured stack
//! - `STACKERR_CAPTURE=0` - Disable stack capture

use stackerr::{is_code, must_register, parse_coder, Coder, DefaultCoder, ResultExt};
use tracing_subscriber::EnvFilter;

const CONFIGURATION_NOT_VALID: i32 = 1000;
const ERR_INVALID_JSON: i32 = 1001;
const ERR_EOF: i32 = 1002;

const CODERS: [DefaultCoder; 3] = [
    DefaultCoder::new_static(CONFIGURATION_NOT_VALID, 500, "ConfigurationNotValid error", ""),
    DefaultCoder::new_static(ERR_INVALID_JSON, 500, "Data is not valid JSON", ""),
    DefaultCoder::new_static(ERR_EOF, 500, "End of input", ""),
];

fn load_config(path: &str) -> stackerr::Result<String> {
    decode_config(path).wrap_c(
        CONFIGURATION_NOT_VALID,
        "service configuration could not be loaded",
    )
}

fn decode_config(path: &str) -> stackerr::Result<String> {
    read_config(path).wrap_c(ERR_INVALID_JSON, "could not decode configuration data")
}

fn read_config(path: &str) -> stackerr::Result<String> {
    std::fs::read_to_string(path).wrap_c(ERR_EOF, format!("could not read {}", path))
}

// RUST_LOG=debug cargo run -p stackerr-codes -- /no/such/config.json
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    for coder in CODERS {
        must_register(coder);
    }

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/no/such/config.json".to_string());

    tracing::info!(%path, "loading configuration");
    match load_config(&path) {
        Ok(contents) => println!("loaded {} bytes", contents.len()),
        Err(err) => {
            let coder = parse_coder(&err);
            tracing::warn!(code = coder.code(), status = coder.http_status(), "load failed");
            println!("=== Classification ===");
            println!("code:      {}", coder.code());
            println!("status:    {}", coder.http_status());
            println!("text:      {}", coder.text());
            println!("eof layer: {}", is_code(&err, ERR_EOF));
            println!();
            println!("=== Chain ===");
            println!("{:?}", err);
        }
    }
}
