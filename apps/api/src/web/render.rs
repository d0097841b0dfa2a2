//! HTML fragments and page layout.

use uuid::Uuid;

use crate::assessment::analyzer::AssessmentOutcome;
use crate::chat::session::Transcript;
use crate::models::assessment::AssessmentResult;
use crate::models::chat::ChatRole;
use crate::web::escape_html;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #f9fafb; margin: 0; color: #111827; }
nav { background: #1e3a8a; padding: 12px 24px; }
nav a { color: white; margin-right: 20px; text-decoration: none; font-weight: 600; }
main { max-width: 960px; margin: 0 auto; padding: 24px; }
h1 { color: #2563eb; text-align: center; font-weight: 700; margin-bottom: 20px; }
h2 { color: #1e3a8a; border-left: 5px solid #2563eb; padding-left: 10px; margin-top: 30px; }
.cards { display: flex; gap: 20px; }
.card { flex: 1; background: white; padding: 20px; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.05); }
.hazard-box { background: #fff7ed; border-left: 6px solid #f97316; padding: 15px; border-radius: 8px; margin-bottom: 15px; }
.hazard-box summary { cursor: pointer; font-weight: 700; }
.chat-user { background: #dbeafe; padding: 12px; border-radius: 12px; margin: 5px 0; }
.chat-assistant { background: #dcfce7; padding: 12px; border-radius: 12px; margin: 5px 0; white-space: pre-wrap; }
.banner { padding: 12px; border-radius: 8px; margin: 12px 0; }
.banner.error { background: #fee2e2; color: #991b1b; }
.banner.warning { background: #fef3c7; color: #92400e; }
.banner.success { background: #dcfce7; color: #166534; }
form label { display: block; margin-top: 12px; font-weight: 600; }
form input, form textarea { width: 100%; padding: 8px; box-sizing: border-box; }
pre { background: #f3f4f6; padding: 12px; overflow-x: auto; white-space: pre-wrap; }
"#;

/// Disables the submit button and reveals the busy label while the request runs.
const BUSY_ON_SUBMIT: &str = "this.querySelector('button').disabled=true;\
this.querySelector('.busy').hidden=false";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Warning,
    Success,
}

impl BannerKind {
    fn class(&self) -> &'static str {
        match self {
            BannerKind::Error => "error",
            BannerKind::Warning => "warning",
            BannerKind::Success => "success",
        }
    }
}

pub fn banner(kind: BannerKind, message: &str) -> String {
    format!(
        "<div class=\"banner {}\">{}</div>",
        kind.class(),
        escape_html(message)
    )
}

/// Wraps page content with navigation, styles, and the degraded-mode banner.
pub fn layout(title: &str, degraded: bool, body: &str) -> String {
    let degraded_banner = if degraded {
        banner(
            BannerKind::Error,
            crate::errors::MISSING_CREDENTIAL_MESSAGE,
        )
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} · OHS Safety Agent</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">🏠 Dashboard</a><a href=\"/assessment\">📝 Hazard Assessment</a>\
         <a href=\"/chat\">💬 Safety Chat</a></nav>\n<main>\n{degraded_banner}\n{body}\n</main>\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

pub fn dashboard() -> String {
    "<h1>🦺 OHS Safety Dashboard</h1>\n<div class=\"cards\">\
     <div class=\"card\"><h3>📊 Reports</h3><p>View workplace hazard reports</p></div>\
     <div class=\"card\"><h3>🧑‍🏫 Training</h3><p>Access safety training material</p></div>\
     <div class=\"card\"><h3>🚨 Alerts</h3><p>Track incidents &amp; risks</p></div>\
     </div>"
        .to_string()
}

/// Values echoed back into the assessment form after a submission.
#[derive(Debug, Default, Clone)]
pub struct AssessmentFormValues<'a> {
    pub workplace_type: &'a str,
    pub employees_count: &'a str,
    pub hazards_description: &'a str,
}

pub fn assessment_form(values: &AssessmentFormValues<'_>) -> String {
    let employees_count = if values.employees_count.is_empty() {
        "1"
    } else {
        values.employees_count
    };
    format!(
        "<h1>📝 Hazard Assessment Tool</h1>\n\
         <form method=\"post\" action=\"/assessment\" onsubmit=\"{BUSY_ON_SUBMIT}\">\n\
         <label for=\"workplace_type\">🏭 Workplace Type</label>\n\
         <input id=\"workplace_type\" name=\"workplace_type\" value=\"{}\" \
         placeholder=\"e.g., Factory, Office, Construction Site\">\n\
         <label for=\"employees_count\">👥 Number of Employees</label>\n\
         <input id=\"employees_count\" name=\"employees_count\" type=\"number\" min=\"1\" step=\"1\" value=\"{}\">\n\
         <label for=\"hazards_description\">⚠️ Hazards or Environment</label>\n\
         <textarea id=\"hazards_description\" name=\"hazards_description\" rows=\"4\" \
         placeholder=\"e.g., Noise, Dust, Slippery floors\">{}</textarea>\n\
         <p><button type=\"submit\">🔍 Analyze Hazards</button> \
         <span class=\"busy\" hidden>🔎 Analyzing workplace hazards...</span></p>\n\
         </form>",
        escape_html(values.workplace_type),
        escape_html(employees_count),
        escape_html(values.hazards_description),
    )
}

pub fn assessment_outcome(outcome: &AssessmentOutcome) -> String {
    let mut html = String::from("<h2>📊 Hazard Assessment Results</h2>\n");
    match outcome {
        AssessmentOutcome::Structured { result } => {
            html.push_str(&assessment_result(result));
            html.push_str(&banner(
                BannerKind::Success,
                "✅ Hazard analysis completed successfully.",
            ));
        }
        AssessmentOutcome::Raw(e) => {
            html.push_str(&banner(
                BannerKind::Error,
                &format!("⚠️ Invalid JSON response from AI ({}). Showing raw output:", e.message),
            ));
            html.push_str(&format!(
                "<pre class=\"raw-reply\">{}</pre>",
                escape_html(&e.raw_text)
            ));
        }
    }
    html
}

fn assessment_result(result: &AssessmentResult) -> String {
    let employees = result
        .employees_count
        .map(|n| n.to_string())
        .unwrap_or_else(|| crate::models::assessment::MISSING_FIELD.to_string());

    let mut html = format!(
        "<p><b>Workplace Type:</b> {}</p>\n<p><b>Number of Employees:</b> {}</p>\n\
         <h3>Identified Hazards</h3>\n",
        escape_html(&result.workplace_type),
        escape_html(&employees),
    );

    for finding in &result.hazards {
        html.push_str(&format!(
            "<details class=\"hazard-box\"><summary>{}</summary>\
             <p><b>Category:</b> {}</p><p><b>Risk Level:</b> {}</p>\
             <p><b>Recommended Measures:</b> {}</p></details>\n",
            escape_html(&finding.hazard),
            escape_html(&finding.category),
            escape_html(&finding.risk_level),
            escape_html(&finding.recommended_measures),
        ));
    }
    html
}

pub fn chat_page(session_id: Uuid, transcript: &Transcript) -> String {
    let mut html = String::from("<h1>💬 OHS Safety Chat</h1>\n<div class=\"transcript\">\n");
    for turn in transcript.visible_turns() {
        let (class, icon) = match turn.role {
            ChatRole::User => ("chat-user", "👤"),
            ChatRole::Model => ("chat-assistant", "🤖"),
        };
        html.push_str(&format!(
            "<div class=\"{class}\">{icon} {}</div>\n",
            escape_html(&turn.text)
        ));
    }
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<form method=\"post\" action=\"/chat/{session_id}\" onsubmit=\"{BUSY_ON_SUBMIT}\">\n\
         <input name=\"message\" placeholder=\"Ask the OHS Agent a question...\" autofocus>\n\
         <p><button type=\"submit\">Send</button> <span class=\"busy\" hidden>🤖 Thinking...</span></p>\n\
         </form>\n\
         <form method=\"post\" action=\"/chat/{session_id}/reset\">\
         <button type=\"submit\">Start over</button></form>"
    ));
    html
}

pub fn not_found(message: &str) -> String {
    format!(
        "<h1>Not found</h1>\n{}\n<p><a href=\"/chat\">Start a new chat</a></p>",
        banner(BannerKind::Warning, message)
    )
}
