//! Request handlers.
//!
//! Each resolution handler:
//! 1. builds a `ResolutionRequest` from path parameters, query parameters
//!    and the server defaults,
//! 2. loads the matching property sources across all backends,
//! 3. either returns the raw source aggregate (`resolve=false`) or the
//!    reconciled, placeholder-resolved map (`resolve=true`) with the
//!    `X-Resolution-*` headers.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use confserve_core::{
    load_configurations, names::split_names, InjectedProperties, Reconciler, ResolutionRequest,
    Source,
};

use crate::errors::ApiError;
use crate::AppState;

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

type Params = HashMap<String, String>;

pub async fn resolve_get(
    State(state): State<AppState>,
    Path((application, profiles)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Response {
    run(state, application, profiles, String::new(), params, None)
}

pub async fn resolve_get_labeled(
    State(state): State<AppState>,
    Path((application, profiles, labels)): Path<(String, String, String)>,
    Query(params): Query<Params>,
) -> Response {
    run(state, application, profiles, labels, params, None)
}

pub async fn resolve_patch(
    State(state): State<AppState>,
    Path((application, profiles)): Path<(String, String)>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Response {
    run(state, application, profiles, String::new(), params, Some(body))
}

pub async fn resolve_patch_labeled(
    State(state): State<AppState>,
    Path((application, profiles, labels)): Path<(String, String, String)>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Response {
    run(state, application, profiles, labels, params, Some(body))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

fn run(
    state: AppState,
    application: String,
    profiles: String,
    label: String,
    params: Params,
    body: Option<Bytes>,
) -> Response {
    match respond(&state, &application, &profiles, &label, &params, body) {
        Ok(response) => response,
        Err(error) => error.into_response(),
    }
}

fn respond(
    state: &AppState,
    application: &str,
    profiles: &str,
    label: &str,
    params: &Params,
    body: Option<Bytes>,
) -> Result<Response, ApiError> {
    let request = build_request(state, application, profiles, label, params)?;
    let injections = parse_injections(body)?;

    let source = load_configurations(&state.backends, &request)?;

    let resolve = bool_override(
        params.get("resolve"),
        state.settings.defaults.resolve_property_sources,
    );

    if resolve {
        let mut reconciler = Reconciler::new(
            &state.engine,
            &state.settings.templates,
            state.secret_resolver.as_deref(),
            request.flatten_lists,
        );
        let (values, metadata) = reconciler.reconcile(
            &request.applications,
            &request.profiles,
            &injections,
            &source,
        )?;

        let mut headers = resolution_headers(&request, &source);
        headers.insert(
            "X-Resolution-PrecedenceDisplayMessage",
            header_value(&metadata.precedence_display_message),
        );

        let body = marshal(&Value::Object(values), request.pretty)?;
        Ok(json_response(headers, body, request.log_responses))
    } else {
        let body = marshal(&source, request.pretty)?;
        Ok(json_response(HeaderMap::new(), body, request.log_responses))
    }
}

fn build_request(
    state: &AppState,
    application: &str,
    profiles: &str,
    label: &str,
    params: &Params,
) -> Result<ResolutionRequest, ApiError> {
    if !label.is_empty() && state.settings.git.disable_labels {
        return Err(ApiError::bad_request(
            "cannot specify a label when git.disableLabels is true",
        ));
    }

    let defaults = &state.settings.defaults;
    Ok(ResolutionRequest {
        applications: split_names(application),
        profiles: split_names(profiles),
        label: label.to_string(),
        refresh: !params.contains_key("norefresh"),
        flatten: bool_override(
            params.get("flatten"),
            defaults.flatten_hierarchical_config,
        ),
        flatten_lists: bool_override(
            params.get("flattenLists"),
            defaults.flattened_indexed_lists,
        ),
        log_responses: bool_override(params.get("logResponses"), defaults.log_responses),
        pretty: bool_override(params.get("pretty"), defaults.pretty_print_json),
    })
}

/// The query parameter wins when it parses as a boolean; anything else
/// defers to the configured default.
fn bool_override(value: Option<&String>, default: bool) -> bool {
    match value.map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    }
}

fn parse_injections(body: Option<Bytes>) -> Result<InjectedProperties, ApiError> {
    let Some(bytes) = body.filter(|bytes| !bytes.is_empty()) else {
        return Ok(InjectedProperties::new());
    };

    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::bad_request(format!("Unparseable JSON: {e}")))
}

fn resolution_headers(request: &ResolutionRequest, source: &Source) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "X-Resolution-Name",
        header_value(&request.applications.join(",")),
    );
    headers.insert(
        "X-Resolution-Profiles",
        header_value(&request.profiles.join(",")),
    );
    headers.insert("X-Resolution-Label", header_value(""));
    headers.insert("X-Resolution-Version", header_value(&source.version));
    headers
}

fn header_value(text: &str) -> HeaderValue {
    HeaderValue::from_str(text).unwrap_or_else(|_| HeaderValue::from_static(""))
}

fn marshal<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, ApiError> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| ApiError::internal(e.to_string()))
}

fn json_response(mut headers: HeaderMap, body: String, log_responses: bool) -> Response {
    if log_responses {
        debug!("Response: {body}");
    }
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    (StatusCode::OK, headers, body).into_response()
}
