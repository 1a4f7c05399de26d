use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationDraft, CompanyRegistration, Identity, TenderDraft, TenderId};
use super::error::MarketplaceError;
use super::repository::{IdentityProvider, MarketplaceStore};
use super::search::SearchFilter;
use super::service::MarketplaceService;
use super::status::TenderStatus;
use super::views::{BrowseView, CompanyView, TenderView};

/// Header carrying the identity issued by the upstream auth layer.
pub const IDENTITY_HEADER: &str = "x-tenderhub-identity";

/// Identity resolved from the request headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestIdentity(pub Option<Identity>);

impl RequestIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let identity = headers
            .get(IDENTITY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| Identity::new(value.trim()));
        Self(identity)
    }
}

impl IdentityProvider for RequestIdentity {
    fn current_identity(&self) -> Option<Identity> {
        self.0.current_identity()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BrowseParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub industry: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: TenderStatus,
}

/// Router builder exposing the marketplace endpoints.
pub fn marketplace_router<S>(service: Arc<MarketplaceService<S>>) -> Router
where
    S: MarketplaceStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/companies",
            get(companies_handler::<S>).post(register_handler::<S>),
        )
        .route(
            "/api/v1/companies/me",
            get(profile_handler::<S>).put(ensure_profile_handler::<S>),
        )
        .route(
            "/api/v1/companies/me/tenders",
            get(owner_tenders_handler::<S>),
        )
        .route(
            "/api/v1/companies/me/dashboard",
            get(dashboard_handler::<S>),
        )
        .route(
            "/api/v1/tenders",
            get(browse_handler::<S>).post(create_tender_handler::<S>),
        )
        .route(
            "/api/v1/tenders/:tender_id/status",
            post(status_handler::<S>),
        )
        .route(
            "/api/v1/tenders/:tender_id/applications",
            get(received_applications_handler::<S>).post(apply_handler::<S>),
        )
        .with_state(service)
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let status = match &self {
            MarketplaceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MarketplaceError::Authentication => StatusCode::UNAUTHORIZED,
            MarketplaceError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketplaceError::DuplicateApplication { .. }
            | MarketplaceError::InvalidTransition(_) => StatusCode::CONFLICT,
            MarketplaceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = match &self {
            MarketplaceError::DuplicateApplication {
                tender_id,
                company_id,
            } => json!({
                "error": "already applied",
                "detail": self.to_string(),
                "tender_id": tender_id,
                "company_id": company_id,
            }),
            other => json!({ "error": other.to_string() }),
        };

        (status, axum::Json(payload)).into_response()
    }
}

pub(crate) async fn ensure_profile_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let identity = RequestIdentity::from_headers(&headers);
    match service.ensure_profile(&identity) {
        Ok(company) => (StatusCode::OK, axum::Json(company)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn profile_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let identity = RequestIdentity::from_headers(&headers);
    match service.directory().get_by_identity(&identity) {
        Ok(company) => (StatusCode::OK, axum::Json(company)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn companies_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    Query(params): Query<BrowseParams>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let filter = SearchFilter::new(params.q, params.industry);
    match service.companies(&filter) {
        Ok(companies) => {
            let views = companies.iter().map(CompanyView::from).collect::<Vec<_>>();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn register_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
    axum::Json(registration): axum::Json<CompanyRegistration>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let identity = RequestIdentity::from_headers(&headers);
    match service.register(&identity, registration) {
        Ok(company) => (StatusCode::CREATED, axum::Json(company)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn owner_tenders_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let identity = RequestIdentity::from_headers(&headers);
    let now = service.clock().now();
    match service.my_tenders(&identity) {
        Ok(tenders) => {
            let views = tenders
                .iter()
                .map(|tender| TenderView::from_tender(tender, now))
                .collect::<Vec<_>>();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn dashboard_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let identity = RequestIdentity::from_headers(&headers);
    match service.dashboard(&identity) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn browse_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    Query(params): Query<BrowseParams>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let now = service.clock().now();
    let active = match service.catalog().list_active() {
        Ok(active) => active,
        Err(error) => return error.into_response(),
    };

    let total_active = active.len();
    let filter = SearchFilter::new(params.q, params.industry);
    let tenders = filter
        .apply(active)
        .iter()
        .map(|listing| TenderView::from_listing(listing, now))
        .collect::<Vec<_>>();

    let view = BrowseView {
        total_active,
        showing: tenders.len(),
        tenders,
    };
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn create_tender_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<TenderDraft>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let identity = RequestIdentity::from_headers(&headers);
    match service.publish_tender(&identity, draft) {
        Ok(tender) => {
            let view = TenderView::from_tender(&tender, service.clock().now());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn status_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    Path(tender_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<StatusChangeRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let identity = RequestIdentity::from_headers(&headers);
    match service.change_status(&identity, &TenderId(tender_id), request.status) {
        Ok(tender) => {
            let view = TenderView::from_tender(&tender, service.clock().now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn apply_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    Path(tender_id): Path<String>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<ApplicationDraft>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let identity = RequestIdentity::from_headers(&headers);
    match service.apply(&identity, &TenderId(tender_id), draft) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn received_applications_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    Path(tender_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let identity = RequestIdentity::from_headers(&headers);
    match service.received_applications(&identity, &TenderId(tender_id)) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(error) => error.into_response(),
    }
}
