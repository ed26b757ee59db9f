//! Server-rendered landing page listing recent verifications.

use axum::{extract::State, response::Html};
use log::warn;
use wowscales_core::{VerificationService, VerificationServiceError, VerificationSummary};

use super::handlers::{run_blocking, HEALTH_MESSAGE};
use crate::store::AppState;

/// GET /
///
/// Never fails: a store error renders as an empty list.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let verifications = run_blocking(&state, VerificationServiceError::ReadFailure, |repo| {
        VerificationService::new(repo).list_all()
    })
    .await
    .unwrap_or_else(|err| {
        warn!("event=index_render module=api status=degraded error={err}");
        Vec::new()
    });

    Html(render_index(HEALTH_MESSAGE, &verifications))
}

pub fn render_index(status: &str, verifications: &[VerificationSummary]) -> String {
    let mut items = String::new();
    for v in verifications {
        items.push_str(&format!(
            "      <li><strong>{}</strong> &mdash; {} &mdash; {}</li>\n",
            escape_html(v.certificate_no.as_deref().unwrap_or_default()),
            escape_html(v.client_name.as_deref().unwrap_or_default()),
            escape_html(v.verification_date.as_deref().unwrap_or_default()),
        ));
    }
    if verifications.is_empty() {
        items.push_str("      <li>No data</li>\n");
    }

    format!(
        "<!doctype html>
<html lang=\"en\">
  <head>
    <meta charset=\"utf-8\">
    <title>WOW Scales Verification</title>
  </head>
  <body style=\"max-width: 800px; margin: 2rem auto; font-family: system-ui, sans-serif\">
    <h1>WOW Scales Verification</h1>
    <p>API status: {}</p>
    <h2>Recent verifications</h2>
    <ul>
{}    </ul>
  </body>
</html>
",
        escape_html(status),
        items
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
