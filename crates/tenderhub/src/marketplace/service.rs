use std::sync::Arc;

use super::catalog::TenderCatalog;
use super::deadline::{Clock, SystemClock};
use super::directory::CompanyDirectory;
use super::domain::{
    Application, ApplicationDraft, Company, CompanyRegistration, MarketplaceSettings,
    OwnerDashboard, Tender, TenderDraft, TenderId, TenderListing,
};
use super::error::MarketplaceError;
use super::ledger::ApplicationLedger;
use super::repository::{IdentityProvider, MarketplaceStore};
use super::search::SearchFilter;
use super::status::TenderStatus;

/// Service composing the directory, catalog and ledger over one store.
///
/// Every method is a single request: identity and drafts are passed in, nothing
/// is remembered between calls.
pub struct MarketplaceService<S> {
    directory: CompanyDirectory<S>,
    catalog: TenderCatalog<S>,
    ledger: ApplicationLedger<S>,
    clock: Arc<dyn Clock>,
}

impl<S> MarketplaceService<S>
where
    S: MarketplaceStore + 'static,
{
    pub fn new(store: Arc<S>, settings: MarketplaceSettings) -> Self {
        Self::with_clock(store, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<S>,
        settings: MarketplaceSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let MarketplaceSettings {
            policy,
            profile_defaults,
        } = settings;

        Self {
            directory: CompanyDirectory::new(
                Arc::clone(&store),
                profile_defaults,
                Arc::clone(&clock),
            ),
            catalog: TenderCatalog::new(Arc::clone(&store), Arc::clone(&clock)),
            ledger: ApplicationLedger::new(store, Arc::clone(&clock), policy),
            clock,
        }
    }

    pub fn directory(&self) -> &CompanyDirectory<S> {
        &self.directory
    }

    pub fn catalog(&self) -> &TenderCatalog<S> {
        &self.catalog
    }

    pub fn ledger(&self) -> &ApplicationLedger<S> {
        &self.ledger
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn ensure_profile(
        &self,
        identity: &impl IdentityProvider,
    ) -> Result<Company, MarketplaceError> {
        self.directory.ensure_profile(identity)
    }

    pub fn register(
        &self,
        identity: &impl IdentityProvider,
        registration: CompanyRegistration,
    ) -> Result<Company, MarketplaceError> {
        self.directory.register(identity, registration)
    }

    pub fn companies(&self, filter: &SearchFilter) -> Result<Vec<Company>, MarketplaceError> {
        self.directory.search(filter)
    }

    /// Publish a tender as the caller, provisioning their profile if needed.
    pub fn publish_tender(
        &self,
        identity: &impl IdentityProvider,
        draft: TenderDraft,
    ) -> Result<Tender, MarketplaceError> {
        let company = self.directory.ensure_profile(identity)?;
        self.catalog.create(&company.id, draft)
    }

    pub fn browse(&self, filter: &SearchFilter) -> Result<Vec<TenderListing>, MarketplaceError> {
        self.catalog.search(filter)
    }

    pub fn my_tenders(
        &self,
        identity: &impl IdentityProvider,
    ) -> Result<Vec<Tender>, MarketplaceError> {
        let company = self.directory.get_by_identity(identity)?;
        self.catalog.list_by_owner(&company.id)
    }

    pub fn dashboard(
        &self,
        identity: &impl IdentityProvider,
    ) -> Result<OwnerDashboard, MarketplaceError> {
        let company = self.directory.get_by_identity(identity)?;
        self.catalog.owner_summary(&company.id)
    }

    pub fn change_status(
        &self,
        identity: &impl IdentityProvider,
        tender_id: &TenderId,
        target: TenderStatus,
    ) -> Result<Tender, MarketplaceError> {
        let company = self.directory.get_by_identity(identity)?;
        self.catalog.transition(&company.id, tender_id, target)
    }

    pub fn apply(
        &self,
        identity: &impl IdentityProvider,
        tender_id: &TenderId,
        draft: ApplicationDraft,
    ) -> Result<Application, MarketplaceError> {
        self.ledger.submit(tender_id, identity, draft)
    }

    pub fn received_applications(
        &self,
        identity: &impl IdentityProvider,
        tender_id: &TenderId,
    ) -> Result<Vec<Application>, MarketplaceError> {
        self.ledger.list_for_tender(identity, tender_id)
    }
}
