use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::marketplace::deadline::{Clock, FixedClock};
use crate::marketplace::domain::{
    Application, Company, CompanyId, Identity, MarketplacePolicy, MarketplaceSettings, Tender,
    TenderDraft, TenderId,
};
use crate::marketplace::memory::MemoryStore;
use crate::marketplace::repository::{
    ApplicationStore, CompanyStore, StoreError, TenderQuery, TenderStore,
};
use crate::marketplace::router::marketplace_router;
use crate::marketplace::service::MarketplaceService;
use crate::marketplace::status::TenderStatus;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(now()))
}

pub(super) fn alice() -> Identity {
    Identity::new("user-alice")
}

pub(super) fn bob() -> Identity {
    Identity::new("user-bob")
}

pub(super) fn tender_draft() -> TenderDraft {
    TenderDraft {
        title: "Cloud Infrastructure Migration".to_string(),
        description: "Move on-prem workloads to a managed cloud platform".to_string(),
        industry: Some("Technology".to_string()),
        budget_min: Some(10_000.0),
        budget_max: Some(50_000.0),
        deadline: now().date_naive() + Duration::days(30),
    }
}

pub(super) fn build_service() -> (MarketplaceService<MemoryStore>, Arc<MemoryStore>) {
    build_service_with(MarketplacePolicy::default())
}

pub(super) fn build_service_with(
    policy: MarketplacePolicy,
) -> (MarketplaceService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = service_at(Arc::clone(&store), policy, now());
    (service, store)
}

/// Service over an existing store whose clock is pinned to `at`.
pub(super) fn service_at(
    store: Arc<MemoryStore>,
    policy: MarketplacePolicy,
    at: DateTime<Utc>,
) -> MarketplaceService<MemoryStore> {
    let settings = MarketplaceSettings {
        policy,
        ..MarketplaceSettings::default()
    };
    MarketplaceService::with_clock(store, settings, Arc::new(FixedClock(at)))
}

/// Publish the default draft as alice and return the stored tender.
pub(super) fn published_tender(service: &MarketplaceService<MemoryStore>) -> Tender {
    service
        .publish_tender(&alice(), tender_draft())
        .expect("tender publishes")
}

pub(super) fn application_router_with_service(
    service: MarketplaceService<MemoryStore>,
) -> axum::Router {
    marketplace_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Company store whose first `misses` owner lookups report nothing, as if a
/// concurrent request inserted the row right after we looked.
pub(super) struct LaggingCompanyStore {
    pub(super) inner: MemoryStore,
    misses: AtomicUsize,
}

impl LaggingCompanyStore {
    pub(super) fn new(inner: MemoryStore, misses: usize) -> Self {
        Self {
            inner,
            misses: AtomicUsize::new(misses),
        }
    }
}

impl CompanyStore for LaggingCompanyStore {
    fn insert_company(&self, company: Company) -> Result<Company, StoreError> {
        self.inner.insert_company(company)
    }

    fn company_by_owner(&self, owner: &Identity) -> Result<Option<Company>, StoreError> {
        let lagging = self
            .misses
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if lagging {
            return Ok(None);
        }
        self.inner.company_by_owner(owner)
    }

    fn company_by_id(&self, id: &CompanyId) -> Result<Option<Company>, StoreError> {
        self.inner.company_by_id(id)
    }

    fn companies(&self) -> Result<Vec<Company>, StoreError> {
        self.inner.companies()
    }
}

pub(super) struct UnavailableStore;

impl CompanyStore for UnavailableStore {
    fn insert_company(&self, _company: Company) -> Result<Company, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn company_by_owner(&self, _owner: &Identity) -> Result<Option<Company>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn company_by_id(&self, _id: &CompanyId) -> Result<Option<Company>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn companies(&self) -> Result<Vec<Company>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

impl TenderStore for UnavailableStore {
    fn insert_tender(&self, _tender: Tender) -> Result<Tender, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn tender_by_id(&self, _id: &TenderId) -> Result<Option<Tender>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn tenders(&self, _query: &TenderQuery) -> Result<Vec<Tender>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_tender_status(
        &self,
        _id: &TenderId,
        _expected: TenderStatus,
        _next: TenderStatus,
    ) -> Result<Tender, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

impl ApplicationStore for UnavailableStore {
    fn insert_application(&self, _application: Application) -> Result<Application, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn applications_for_tender(
        &self,
        _tender_id: &TenderId,
    ) -> Result<Vec<Application>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}
