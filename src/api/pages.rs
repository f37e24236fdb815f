//! Page-level routes. Each navigable path resolves to a view name after
//! passing the guard; denials answer with a redirect the way a browser
//! navigation would be bounced.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::api::guard::{self, GuardDecision, DASHBOARD_PATH, LOGIN_PATH, ROUTES};
use crate::api::routes::AppState;
use crate::auth::{extract_bearer_token, UserSession};

const GUARD_NOTICE_HEADER: &str = "x-guard-notice";

pub fn page_routes(state: AppState) -> Router {
    let mut router = Router::new();
    for meta in ROUTES {
        router = router.route(meta.path, get(page));
    }
    router.with_state(state)
}

/// Resolve one page request through the guard
#[tracing::instrument(skip(state, headers))]
async fn page(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let Some(meta) = guard::route_meta(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // The page tier trusts the token signature alone; a bad or absent
    // token just means an anonymous visitor here.
    let session = bearer_session(&state, &headers);

    match guard::evaluate(meta, session.as_ref(), uri.path()) {
        GuardDecision::Allow => Json(json!({ "view": meta.view })).into_response(),
        GuardDecision::RedirectToLogin { redirect } => {
            Redirect::to(&format!("{LOGIN_PATH}?redirect={redirect}")).into_response()
        }
        GuardDecision::RedirectToDashboard { notice } => {
            let mut response = Redirect::to(DASHBOARD_PATH).into_response();
            if let Some(notice) = notice {
                response.headers_mut().insert(
                    GUARD_NOTICE_HEADER,
                    HeaderValue::from_static(notice),
                );
            }
            response
        }
    }
}

fn bearer_session(state: &AppState, headers: &HeaderMap) -> Option<UserSession> {
    let auth_header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = extract_bearer_token(auth_header).ok()?;
    state.auth_service.peek_session(token).ok()
}
