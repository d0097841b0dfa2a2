//! Axum handlers for the HTML pages.
//!
//! Every failure is turned into a banner on the page being rendered; the
//! HTTP status still reflects the failure so scripted clients can tell.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::assessment::analyzer::run_assessment;
use crate::chat::handlers::find_session;
use crate::chat::service::send_message;
use crate::errors::AppError;
use crate::models::assessment::WorkplaceAssessmentRequest;
use crate::state::AppState;
use crate::web::render::{self, AssessmentFormValues, BannerKind};

fn page(state: &AppState, status: StatusCode, title: &str, body: &str) -> Response {
    (
        status,
        Html(render::layout(title, state.config.is_degraded(), body)),
    )
        .into_response()
}

/// Inline banner for a failed submit. The missing-credential banner is
/// already part of the layout while degraded, so it is not repeated.
fn error_banner(error: &AppError) -> String {
    match error {
        AppError::MissingCredential => String::new(),
        _ => render::banner(BannerKind::Error, &error.banner()),
    }
}

/// GET /
pub async fn dashboard_page(State(state): State<AppState>) -> Response {
    page(&state, StatusCode::OK, "Dashboard", &render::dashboard())
}

/// GET /assessment
pub async fn assessment_page(State(state): State<AppState>) -> Response {
    let form = render::assessment_form(&AssessmentFormValues::default());
    page(&state, StatusCode::OK, "Hazard Assessment", &form)
}

#[derive(Debug, Deserialize)]
pub struct AssessmentForm {
    #[serde(default)]
    pub workplace_type: String,
    #[serde(default)]
    pub employees_count: String,
    #[serde(default)]
    pub hazards_description: String,
}

impl AssessmentForm {
    fn to_request(&self) -> Result<WorkplaceAssessmentRequest, AppError> {
        let employees_count = self.employees_count.trim().parse::<u32>().map_err(|_| {
            AppError::Validation("Number of Employees must be a whole number".to_string())
        })?;
        let request = WorkplaceAssessmentRequest {
            workplace_type: self.workplace_type.clone(),
            employees_count,
            hazards_description: self.hazards_description.clone(),
        };
        request.validate().map_err(AppError::Validation)?;
        Ok(request)
    }
}

/// POST /assessment
pub async fn submit_assessment(
    State(state): State<AppState>,
    Form(form): Form<AssessmentForm>,
) -> Response {
    let mut body = render::assessment_form(&AssessmentFormValues {
        workplace_type: &form.workplace_type,
        employees_count: &form.employees_count,
        hazards_description: &form.hazards_description,
    });

    let outcome = async {
        let llm = state.completion()?;
        let request = form.to_request()?;
        Ok::<_, AppError>(run_assessment(llm, &request, state.config.chat_variant).await?)
    }
    .await;

    let status = match outcome {
        Ok(outcome) => {
            body.push_str(&render::assessment_outcome(&outcome));
            StatusCode::OK
        }
        Err(e) => {
            body.push_str(&error_banner(&e));
            e.status()
        }
    };

    page(&state, status, "Hazard Assessment", &body)
}

/// GET /chat
///
/// Starts a session and sends the browser to it.
pub async fn new_chat(State(state): State<AppState>) -> Redirect {
    let (id, _) = state.sessions.create().await;
    Redirect::to(&format!("/chat/{id}"))
}

/// GET /chat/:id
pub async fn chat_page(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match find_session(&state, id).await {
        Ok(session) => {
            let mut session = session.lock().await;
            session.touch();
            let body = render::chat_page(id, session.transcript());
            page(&state, StatusCode::OK, "Safety Chat", &body)
        }
        Err(e) => page(&state, e.status(), "Not found", &render::not_found(&e.banner())),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// POST /chat/:id
pub async fn submit_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<ChatForm>,
) -> Response {
    let session = match find_session(&state, id).await {
        Ok(session) => session,
        Err(e) => {
            return page(&state, e.status(), "Not found", &render::not_found(&e.banner()))
        }
    };
    let mut session = session.lock().await;

    // Checked before send_message so a degraded service leaves the transcript alone.
    let result = match state.completion() {
        Ok(llm) => send_message(&mut session, &form.message, llm).await.map(|_| ()),
        Err(e) => Err(e),
    };

    let mut body = render::chat_page(id, session.transcript());
    let status = match result {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            body.push_str(&error_banner(&e));
            e.status()
        }
    };

    page(&state, status, "Safety Chat", &body)
}

/// POST /chat/:id/reset
pub async fn reset_chat(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match find_session(&state, id).await {
        Ok(session) => {
            session.lock().await.reset();
            Redirect::to(&format!("/chat/{id}")).into_response()
        }
        Err(e) => page(&state, e.status(), "Not found", &render::not_found(&e.banner())),
    }
}
