//! Visitor counter - persistence example.
//!
//! This example demonstrates:
//! - Keeping state across invocations in the host-mounted data directory
//! - Letting storage faults surface as the standard 500 error envelope
//!
//! Each invocation is a fresh process, so the count lives in a file under
//! `/mnt/data`, the writable directory the host mounts into the function
//! sandbox.

use std::fs;
use std::path::Path;

use callwire_guest::{serve, HandlerResult, Request, Response};
use serde_json::json;

const COUNTER_PATH: &str = "/mnt/data/visits.txt";

/// Bump and report the persistent visitor count.
fn visits(_request: &Request) -> HandlerResult<Response> {
    let path = Path::new(COUNTER_PATH);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let count = match fs::read_to_string(path) {
        Ok(text) => text.trim().parse::<u64>().unwrap_or(0) + 1,
        Err(_) => 1,
    };
    fs::write(path, count.to_string())?;

    Ok(Response::new(json!({
        "message": "visitor counted",
        "visitor_count": count,
        "storage_path": COUNTER_PATH,
    })))
}

fn main() -> callwire_guest::Result<()> {
    serve(visits)
}
