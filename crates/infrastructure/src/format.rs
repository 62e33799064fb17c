//! Plain-text rendering of requests, responses and run results.
//!
//! Renderers only read their input. Header lines are sorted by name so output
//! is stable across runs.

use std::fmt::Write;
use std::time::Duration;

use relay_domain::{Auth, ExecutionResult, RequestSpec, ResponseSpec, Statistics};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f UTC";

/// Renders a response: status line, duration, size, headers and body.
///
/// JSON bodies are pretty-printed; anything else is shown as text.
#[must_use]
pub fn format_response(response: &ResponseSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status: {}", response.status_text);
    let _ = writeln!(out, "Duration: {}", format_duration(response.duration));
    let _ = writeln!(out, "Size: {} bytes", response.size);

    if !response.headers.is_empty() {
        out.push_str("\nHeaders:\n");
        let mut headers: Vec<_> = response.headers.iter().collect();
        headers.sort_by(|a, b| a.0.cmp(b.0));
        for (name, values) in headers {
            let _ = writeln!(out, "  {name}: {}", values.join(", "));
        }
    }

    if !response.body.is_empty() {
        out.push_str("\nBody:\n");
        out.push_str(&pretty_body(&response.body));
        out.push('\n');
    }
    out
}

/// Renders a request template. Credentials are masked.
#[must_use]
pub fn format_request(request: &RequestSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", request.method, request.url);

    if !request.headers.is_empty() {
        out.push_str("\nHeaders:\n");
        let mut headers: Vec<_> = request.headers.iter().collect();
        headers.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in headers {
            let _ = writeln!(out, "  {name}: {value}");
        }
    }

    if let Some(auth) = &request.auth {
        out.push_str("\nAuth:\n");
        let _ = writeln!(out, "  Type: {}", auth.kind());
        match auth {
            Auth::Basic { username, .. } => {
                let _ = writeln!(out, "  Username: {username}");
                out.push_str("  Password: ***\n");
            }
            Auth::Bearer { token } => {
                let _ = writeln!(out, "  Token: {}", mask_secret(token));
            }
            Auth::ApiKey {
                key,
                key_name,
                location,
            } => {
                let _ = writeln!(out, "  Key Name: {key_name}");
                let _ = writeln!(out, "  Key: {}", mask_secret(key));
                let _ = writeln!(out, "  Location: {location}");
            }
        }
    }

    if let Some(body) = request.body.as_ref().filter(|b| !b.is_empty()) {
        out.push_str("\nBody:\n");
        let _ = writeln!(out, "  Type: {}", body.kind.as_str());
        if body.is_textual() {
            out.push_str(&String::from_utf8_lossy(&body.content));
        } else {
            let _ = write!(out, "<{} bytes>", body.content.len());
        }
        out.push('\n');
    }
    out
}

/// Renders a collection run: header, statistics and one entry per record.
#[must_use]
pub fn format_execution_result(result: &ExecutionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Collection: {}", result.collection_name);
    let _ = writeln!(out, "Environment: {}", result.environment_name);
    let _ = writeln!(out, "Start Time: {}", result.start_time.format(TIME_FORMAT));
    let _ = writeln!(out, "End Time: {}", result.end_time.format(TIME_FORMAT));
    let _ = writeln!(
        out,
        "Total Duration: {}",
        format_duration(result.total_duration)
    );

    out.push('\n');
    out.push_str(&format_statistics(&result.statistics));

    if !result.requests.is_empty() {
        out.push_str("\nRequests:\n");
    }
    for (index, record) in result.requests.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n{}. {} {}",
            index + 1,
            record.request.method,
            record.request.url
        );
        if let Some(error) = record.error() {
            let _ = writeln!(out, "   Error: {error}");
        } else if let Some(response) = record.response() {
            let _ = writeln!(out, "   Status: {}", response.status_text);
        }
        let _ = writeln!(out, "   Duration: {}", format_duration(record.duration));
    }
    out
}

/// Renders run statistics.
#[must_use]
pub fn format_statistics(statistics: &Statistics) -> String {
    let mut out = String::from("Statistics:\n");
    let _ = writeln!(out, "  Total: {}", statistics.total);
    let _ = writeln!(out, "  Success: {}", statistics.success);
    let _ = writeln!(out, "  Failed: {}", statistics.failed);
    let _ = writeln!(out, "  Avg Time: {}", format_duration(statistics.avg_time));
    let _ = writeln!(out, "  Min Time: {}", format_duration(statistics.min_time));
    let _ = writeln!(out, "  Max Time: {}", format_duration(statistics.max_time));
    out
}

fn format_duration(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}

fn pretty_body(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}

/// Short secrets become `***`; longer ones keep four characters at each end.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() < 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
