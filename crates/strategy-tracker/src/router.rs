use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::access::{AccessContext, Identity};
use crate::catalog::CatalogKind;
use crate::domain::{
    InvitationDraft, OrganizationId, RecordId, RiskDraft, StakeholderDraft, StrategicReportDraft,
    SwotReport, ValueDraft,
};
use crate::repository::{RepositoryError, StrategyStore};
use crate::service::{ServiceError, StrategyService};

pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const ORGANIZATION_HEADER: &str = "x-organization-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const SUPERUSER_HEADER: &str = "x-superuser";

type Shared<S> = State<Arc<StrategyService<S>>>;

/// Router builder exposing the strategy tracking endpoints.
pub fn strategy_router<S>(service: Arc<StrategyService<S>>) -> Router
where
    S: StrategyStore + 'static,
{
    Router::new()
        .route("/api/v1/access", get(access_handler::<S>))
        .route(
            "/api/v1/catalogs/:kind/options",
            get(catalog_options_handler::<S>),
        )
        .route("/api/v1/catalogs/:kind/leaf", get(catalog_leaf_handler::<S>))
        .route(
            "/api/v1/stakeholders",
            get(list_stakeholders_handler::<S>).post(create_stakeholder_handler::<S>),
        )
        .route(
            "/api/v1/stakeholders/:id",
            get(stakeholder_handler::<S>)
                .put(update_stakeholder_handler::<S>)
                .delete(delete_stakeholder_handler::<S>),
        )
        .route(
            "/api/v1/strategic-reports",
            post(create_strategic_report_handler::<S>),
        )
        .route(
            "/api/v1/strategic-reports/:id",
            get(strategic_report_handler::<S>).delete(delete_strategic_report_handler::<S>),
        )
        .route(
            "/api/v1/swot-reports",
            get(list_swot_reports_handler::<S>).post(create_swot_report_handler::<S>),
        )
        .route(
            "/api/v1/values",
            get(list_values_handler::<S>).post(create_value_handler::<S>),
        )
        .route(
            "/api/v1/missions/suggestions",
            get(mission_suggestions_handler::<S>),
        )
        .route("/api/v1/risks", post(create_risk_handler::<S>))
        .route(
            "/api/v1/initiative-reports/:id",
            get(initiative_report_handler::<S>),
        )
        .route("/api/v1/invitations", post(send_invitation_handler::<S>))
        .route(
            "/api/v1/invitations/:token/accept",
            post(accept_invitation_handler::<S>),
        )
        .with_state(service)
}

fn header<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Reads the caller supplied by the authentication proxy. `None` when no e-mail is
/// present.
pub fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let email = header(headers, USER_EMAIL_HEADER)?.to_string();
    let organization_id = header(headers, ORGANIZATION_HEADER)
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(OrganizationId);
    let role = header(headers, USER_ROLE_HEADER).map(str::to_string);
    let is_superuser = header(headers, SUPERUSER_HEADER)
        .is_some_and(|raw| raw.eq_ignore_ascii_case("true") || raw == "1");

    Some(Identity {
        email,
        organization_id,
        role,
        is_superuser,
    })
}

fn unauthenticated() -> Response {
    let payload = json!({
        "error": "missing caller identity",
    });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

fn authenticate<S>(service: &StrategyService<S>, headers: &HeaderMap) -> Result<AccessContext, Response>
where
    S: StrategyStore + 'static,
{
    let identity = identity_from_headers(headers).ok_or_else(unauthenticated)?;
    service.resolve_access(identity).map_err(error_response)
}

pub(crate) fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Validation(errors) => {
            let payload = json!({
                "error": error.to_string(),
                "fields": errors.errors,
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Transition(_) | ServiceError::Repository(RepositoryError::Conflict) => {
            StatusCode::CONFLICT
        }
        ServiceError::Repository(_) => {
            warn!(error = %error, "storage failure while serving request");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

fn respond<T: serde::Serialize>(status: StatusCode, result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LevelQuery {
    level1: Option<String>,
    level2: Option<String>,
    level3: Option<String>,
    level4: Option<String>,
}

impl LevelQuery {
    /// Selected levels up to the deepest one supplied. A level missing ahead of a
    /// supplied one stays in the path as an empty key, so nothing resolves beneath it.
    fn path(&self, depth: usize) -> Vec<&str> {
        let levels: Vec<Option<&str>> = [&self.level1, &self.level2, &self.level3, &self.level4]
            .into_iter()
            .take(depth)
            .map(Option::as_deref)
            .collect();
        let supplied = levels
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |deepest| deepest + 1);

        levels[..supplied]
            .iter()
            .map(|level| level.unwrap_or(""))
            .collect()
    }
}

fn unknown_catalog(kind: &str) -> Response {
    let payload = json!({
        "error": format!("unknown catalog '{kind}'"),
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

pub(crate) async fn access_handler<S>(State(service): Shared<S>, headers: HeaderMap) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => (StatusCode::OK, Json(context)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn catalog_options_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Path(kind): Path<String>,
    Query(levels): Query<LevelQuery>,
) -> Response
where
    S: StrategyStore + 'static,
{
    if let Err(response) = authenticate(&service, &headers) {
        return response;
    }
    let Some(catalog_kind) = CatalogKind::parse(&kind) else {
        return unknown_catalog(&kind);
    };

    let path = levels.path(3);
    let options = service.catalogs().get(catalog_kind).options(&path);
    let payload = json!({
        "catalog": catalog_kind,
        "path": path,
        "options": options,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn catalog_leaf_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Path(kind): Path<String>,
    Query(levels): Query<LevelQuery>,
) -> Response
where
    S: StrategyStore + 'static,
{
    if let Err(response) = authenticate(&service, &headers) {
        return response;
    }
    let Some(catalog_kind) = CatalogKind::parse(&kind) else {
        return unknown_catalog(&kind);
    };

    let path = levels.path(4);
    let text = service.catalogs().get(catalog_kind).lookup_leaf(&path);
    let payload = json!({
        "catalog": catalog_kind,
        "path": path,
        "text": text,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn list_stakeholders_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(StatusCode::OK, service.stakeholders(&context, today())),
        Err(response) => response,
    }
}

pub(crate) async fn create_stakeholder_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Json(draft): Json<StakeholderDraft>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(
            StatusCode::CREATED,
            service.create_stakeholder(&context, draft),
        ),
        Err(response) => response,
    }
}

pub(crate) async fn stakeholder_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(
            StatusCode::OK,
            service.stakeholder(&context, RecordId(id), today()),
        ),
        Err(response) => response,
    }
}

pub(crate) async fn update_stakeholder_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(draft): Json<StakeholderDraft>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(
            StatusCode::OK,
            service.update_stakeholder(&context, RecordId(id), draft),
        ),
        Err(response) => response,
    }
}

pub(crate) async fn delete_stakeholder_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    S: StrategyStore + 'static,
{
    let context = match authenticate(&service, &headers) {
        Ok(context) => context,
        Err(response) => return response,
    };
    match service.delete_stakeholder(&context, RecordId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_strategic_report_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Json(draft): Json<StrategicReportDraft>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(
            StatusCode::CREATED,
            service.create_strategic_report(&context, draft),
        ),
        Err(response) => response,
    }
}

pub(crate) async fn strategic_report_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(
            StatusCode::OK,
            service.strategic_report(&context, RecordId(id)),
        ),
        Err(response) => response,
    }
}

pub(crate) async fn delete_strategic_report_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    S: StrategyStore + 'static,
{
    let context = match authenticate(&service, &headers) {
        Ok(context) => context,
        Err(response) => return response,
    };
    match service.delete_strategic_report(&context, RecordId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_swot_reports_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(StatusCode::OK, service.swot_reports(&context)),
        Err(response) => response,
    }
}

pub(crate) async fn create_swot_report_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Json(report): Json<SwotReport>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(
            StatusCode::CREATED,
            service.create_swot_report(&context, report),
        ),
        Err(response) => response,
    }
}

pub(crate) async fn list_values_handler<S>(State(service): Shared<S>, headers: HeaderMap) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(StatusCode::OK, service.values(&context)),
        Err(response) => response,
    }
}

pub(crate) async fn create_value_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Json(draft): Json<ValueDraft>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(StatusCode::CREATED, service.create_value(&context, draft)),
        Err(response) => response,
    }
}

pub(crate) async fn mission_suggestions_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(StatusCode::OK, service.mission_suggestions(&context)),
        Err(response) => response,
    }
}

pub(crate) async fn create_risk_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Json(draft): Json<RiskDraft>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(StatusCode::CREATED, service.create_risk(&context, draft)),
        Err(response) => response,
    }
}

pub(crate) async fn initiative_report_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(
            StatusCode::OK,
            service.initiative_report(&context, RecordId(id), today()),
        ),
        Err(response) => response,
    }
}

pub(crate) async fn send_invitation_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Json(draft): Json<InvitationDraft>,
) -> Response
where
    S: StrategyStore + 'static,
{
    match authenticate(&service, &headers) {
        Ok(context) => respond(
            StatusCode::CREATED,
            service.send_invitation(&context, draft),
        ),
        Err(response) => response,
    }
}

/// Redemption needs only the caller's e-mail; the invitee has no membership yet.
pub(crate) async fn accept_invitation_handler<S>(
    State(service): Shared<S>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> Response
where
    S: StrategyStore + 'static,
{
    let Some(identity) = identity_from_headers(&headers) else {
        return unauthenticated();
    };
    let Ok(token) = Uuid::parse_str(&token) else {
        return error_response(ServiceError::NotFound("invitation"));
    };
    respond(StatusCode::OK, service.accept_invitation(&identity, token))
}
