//! Bookmark Board RPC Server: JSON-RPC over stdin/stdout for the board front end.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"board.drop", "params":{"itemId":"101", ...}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;

use bookmark_board::app::BoardApp;
use bookmark_board::logging::init_logging;
use bookmark_board::platform;
use bookmark_board::rpc_handler::handle_method;

use serde_json::{json, Value};
use tracing::{error, info, warn};

/// Requests accepted per one-second window.
const MAX_REQUESTS_PER_SECOND: u32 = 200;

/// Fixed-window rate limiter over all methods.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn send(out: &mut impl Write, response: &Value) -> io::Result<()> {
    writeln!(out, "{}", response)?;
    out.flush()
}

fn main() -> ExitCode {
    init_logging();

    let data_dir = platform::get_data_dir();
    let app = match BoardApp::open(&data_dir, None) {
        Ok(app) => Mutex::new(app),
        Err(e) => {
            error!(error = %e, data_dir = %data_dir.display(), "failed to initialize board");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    if send(&mut stdout, &ready).is_err() {
        return ExitCode::FAILURE;
    }
    info!("rpc server ready");

    let mut rate_limiter = RateLimiter::new(MAX_REQUESTS_PER_SECOND);

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Err(e) => json!({"id": null, "error": format!("parse error: {}", e)}),
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                if !rate_limiter.check() {
                    warn!("rate limit exceeded");
                    json!({"id": id, "error": "rate limit exceeded"})
                } else {
                    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                    let params = req.get("params").cloned().unwrap_or(json!({}));
                    match handle_method(&app, method, &params) {
                        Ok(val) => json!({"id": id, "result": val}),
                        Err(err) => json!({"id": id, "error": err}),
                    }
                }
            }
        };
        if send(&mut stdout, &response).is_err() {
            break;
        }
    }
    ExitCode::SUCCESS
}
