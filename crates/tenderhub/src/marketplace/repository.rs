use super::domain::{Application, Company, CompanyId, Identity, Tender, TenderId};
use super::status::TenderStatus;

/// Identity collaborator. `None` (or a blank identity) means the caller is anonymous.
pub trait IdentityProvider {
    fn current_identity(&self) -> Option<Identity>;
}

impl IdentityProvider for Identity {
    fn current_identity(&self) -> Option<Identity> {
        Some(self.clone()).filter(|identity| !identity.is_blank())
    }
}

impl IdentityProvider for Option<Identity> {
    fn current_identity(&self) -> Option<Identity> {
        self.as_ref().and_then(IdentityProvider::current_identity)
    }
}

/// Unique constraints the store must enforce atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConstraint {
    CompanyOwner,
    ApplicationPerTender,
    PrimaryKey,
}

impl UniqueConstraint {
    pub const fn label(self) -> &'static str {
        match self {
            UniqueConstraint::CompanyOwner => "companies.owner_identity",
            UniqueConstraint::ApplicationPerTender => "applications.tender_id_company_id",
            UniqueConstraint::PrimaryKey => "primary_key",
        }
    }
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {}", .0.label())]
    UniqueViolation(UniqueConstraint),
    #[error("record not found")]
    NotFound,
    #[error("stale write: tender status is now {current}")]
    StaleStatus { current: TenderStatus },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Filter for tender reads. Results come back newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenderQuery {
    pub status: Option<TenderStatus>,
    pub owner: Option<CompanyId>,
}

impl TenderQuery {
    pub fn active() -> Self {
        Self {
            status: Some(TenderStatus::Active),
            owner: None,
        }
    }

    pub fn owned_by(owner: CompanyId) -> Self {
        Self {
            status: None,
            owner: Some(owner),
        }
    }

    pub fn matches(&self, tender: &Tender) -> bool {
        self.status.map_or(true, |status| tender.status == status)
            && self
                .owner
                .as_ref()
                .map_or(true, |owner| &tender.owner_company_id == owner)
    }
}

pub trait CompanyStore: Send + Sync {
    fn insert_company(&self, company: Company) -> Result<Company, StoreError>;
    fn company_by_owner(&self, owner: &Identity) -> Result<Option<Company>, StoreError>;
    fn company_by_id(&self, id: &CompanyId) -> Result<Option<Company>, StoreError>;
    /// Every profile, in insertion order.
    fn companies(&self) -> Result<Vec<Company>, StoreError>;
}

pub trait TenderStore: Send + Sync {
    fn insert_tender(&self, tender: Tender) -> Result<Tender, StoreError>;
    fn tender_by_id(&self, id: &TenderId) -> Result<Option<Tender>, StoreError>;
    fn tenders(&self, query: &TenderQuery) -> Result<Vec<Tender>, StoreError>;
    /// Compare-and-set on the status column.
    fn update_tender_status(
        &self,
        id: &TenderId,
        expected: TenderStatus,
        next: TenderStatus,
    ) -> Result<Tender, StoreError>;
}

pub trait ApplicationStore: Send + Sync {
    fn insert_application(&self, application: Application) -> Result<Application, StoreError>;
    fn applications_for_tender(&self, tender_id: &TenderId)
        -> Result<Vec<Application>, StoreError>;
}

/// Everything the marketplace service needs from one backing store.
pub trait MarketplaceStore: CompanyStore + TenderStore + ApplicationStore {}

impl<T> MarketplaceStore for T where T: CompanyStore + TenderStore + ApplicationStore {}
