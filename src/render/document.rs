// HTML document assembly
// Wraps rendered markup with the target's stylesheets, state and scripts.

use std::fmt::Write;

use super::SsrData;
use crate::assets::StaticBundleInfo;
use crate::build::BuildPlan;

/// Escape text for use inside HTML content or attribute values
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Full HTML page for rendered `data`
///
/// Stylesheets are linked only when css is extracted; otherwise the client
/// bundle injects its own styles. Manifest entries the build did not emit
/// are skipped.
pub fn render_document(
    title: &str,
    info: &StaticBundleInfo,
    plan: &BuildPlan,
    data: &SsrData,
) -> String {
    let mut head = String::new();
    if info.is_extract_css {
        for url in plan.style_entries().iter().filter_map(|e| info.entry_url(e)) {
            let _ = write!(head, r#"<link rel="stylesheet" href="{}">"#, escape_html(&url));
        }
    }

    let mut tail = String::new();
    if let Some(state) = &data.state {
        // "</" would close the script element early
        let json = state.to_string().replace("</", "<\\/");
        let _ = write!(tail, "<script>window.__INITIAL_STATE__={json}</script>");
    }
    for url in plan.script_entries().iter().filter_map(|e| info.entry_url(e)) {
        let _ = write!(tail, r#"<script src="{}" defer></script>"#, escape_html(&url));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n{head}\n</head>\n\
         <body>\n{}\n{tail}\n</body>\n</html>\n",
        escape_html(title),
        data.dom,
    )
}
