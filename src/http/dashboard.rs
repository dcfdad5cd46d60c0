//! Endpoint overview served at `GET /`.

use std::fmt::Write;

use axum::response::Html;

use crate::routing::{EndpointRegistry, PROXY_PREFIX};

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;width:100%}\
th,td{text-align:left;padding:.4rem .6rem;border-bottom:1px solid #ddd}\
th{background:#f5f5f5}code{font-size:.95em}\
.method{font-weight:600}.s2{color:#207a3c}.s3{color:#2f5fa8}.s4{color:#b26b00}.s5{color:#b3261e}";

/// Render the list of replayable endpoints.
pub fn render(registry: &EndpointRegistry, cors_enabled: bool) -> Html<String> {
    let mut page = String::with_capacity(1024 + registry.len() * 160);

    // Writing into a String cannot fail.
    let _ = write!(
        page,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>HAR replay</title>\
         <style>{STYLE}</style></head><body><h1>HAR replay</h1>\
         <p>{count} endpoint{plural} recorded. Requests are served under <code>{PROXY_PREFIX}</code>. \
         CORS is {cors}.</p>",
        count = registry.len(),
        plural = if registry.len() == 1 { "" } else { "s" },
        cors = if cors_enabled { "enabled" } else { "disabled" },
    );

    if registry.is_empty() {
        page.push_str("<p>No endpoints loaded.</p>");
    } else {
        page.push_str(
            "<table><thead><tr><th>Method</th><th>Path</th><th>Status</th>\
             <th>Content type</th><th>Recorded</th></tr></thead><tbody>",
        );
        for (_, entry) in registry.iter() {
            let _ = write!(
                page,
                "<tr><td class=\"method\">{}</td><td><code>{}{}</code></td>\
                 <td class=\"s{}\">{}</td><td>{}</td><td>{}</td></tr>",
                escape(&entry.method),
                PROXY_PREFIX,
                escape(&entry.path),
                entry.status / 100,
                entry.status,
                escape(&entry.content_type),
                escape(&entry.timestamp),
            );
        }
        page.push_str("</tbody></table>");
    }

    page.push_str("</body></html>");
    Html(page)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
