use std::sync::Arc;

use tracing::{debug, info};

use super::deadline::Clock;
use super::domain::{
    normalize_tag, Company, CompanyId, CompanyRegistration, Identity, ProfileDefaults,
};
use super::error::{MarketplaceError, Resource, ValidationError};
use super::repository::{CompanyStore, IdentityProvider, StoreError, UniqueConstraint};
use super::search::SearchFilter;

/// Company profiles keyed by owner identity, one per identity.
pub struct CompanyDirectory<S> {
    store: Arc<S>,
    defaults: ProfileDefaults,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for CompanyDirectory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            defaults: self.defaults.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S> CompanyDirectory<S>
where
    S: CompanyStore + 'static,
{
    pub fn new(store: Arc<S>, defaults: ProfileDefaults, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            defaults,
            clock,
        }
    }

    pub fn defaults(&self) -> &ProfileDefaults {
        &self.defaults
    }

    /// Return the caller's profile, provisioning a placeholder one on first use.
    pub fn ensure_profile(
        &self,
        identity: &impl IdentityProvider,
    ) -> Result<Company, MarketplaceError> {
        let owner = identity
            .current_identity()
            .ok_or(MarketplaceError::Authentication)?;

        if let Some(existing) = self.store.company_by_owner(&owner)? {
            return Ok(existing);
        }

        let placeholder = Company {
            id: CompanyId::generate(),
            owner_identity: owner,
            name: self.defaults.name.clone(),
            industry: Some(self.defaults.industry.clone()),
            description: self.defaults.description.clone(),
            website: None,
            created_at: self.clock.now(),
        };
        self.insert_once(placeholder)
    }

    /// Pure lookup of the caller's profile.
    pub fn get_by_identity(
        &self,
        identity: &impl IdentityProvider,
    ) -> Result<Company, MarketplaceError> {
        let owner = identity
            .current_identity()
            .ok_or(MarketplaceError::Authentication)?;
        self.store
            .company_by_owner(&owner)?
            .ok_or(MarketplaceError::NotFound(Resource::Company))
    }

    /// Like [`get_by_identity`](Self::get_by_identity) but a missing profile is not an error.
    pub fn find_by_identity(
        &self,
        identity: &impl IdentityProvider,
    ) -> Result<Option<Company>, MarketplaceError> {
        let owner = identity
            .current_identity()
            .ok_or(MarketplaceError::Authentication)?;
        Ok(self.store.company_by_owner(&owner)?)
    }

    pub fn get_by_id(&self, id: &CompanyId) -> Result<Company, MarketplaceError> {
        self.store
            .company_by_id(id)?
            .ok_or(MarketplaceError::NotFound(Resource::Company))
    }

    /// Public directory listing, filtered and sorted by company name.
    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<Company>, MarketplaceError> {
        let mut found = self
            .store
            .companies()?
            .into_iter()
            .filter(|company| filter.matches_company(company))
            .collect::<Vec<_>>();
        found.sort_by_cached_key(|company| company.name.to_lowercase());
        Ok(found)
    }

    /// Explicit sign-up. An identity that already has a profile keeps it unchanged.
    pub fn register(
        &self,
        identity: &impl IdentityProvider,
        registration: CompanyRegistration,
    ) -> Result<Company, MarketplaceError> {
        let owner = identity
            .current_identity()
            .ok_or(MarketplaceError::Authentication)?;

        let name = registration.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name" }.into());
        }

        if let Some(existing) = self.store.company_by_owner(&owner)? {
            debug!(company_id = %existing.id, "registration for existing profile ignored");
            return Ok(existing);
        }

        let description = registration
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| self.defaults.description.clone());

        let company = Company {
            id: CompanyId::generate(),
            owner_identity: owner,
            name: name.to_string(),
            industry: normalize_tag(registration.industry),
            description,
            website: normalize_tag(registration.website),
            created_at: self.clock.now(),
        };
        self.insert_once(company)
    }

    /// Insert a new profile. Losing the owner-identity race re-reads the winner once.
    fn insert_once(&self, company: Company) -> Result<Company, MarketplaceError> {
        let owner: Identity = company.owner_identity.clone();
        match self.store.insert_company(company) {
            Ok(stored) => {
                info!(
                    company_id = %stored.id,
                    owner = %stored.owner_identity,
                    "company profile provisioned"
                );
                Ok(stored)
            }
            Err(StoreError::UniqueViolation(UniqueConstraint::CompanyOwner)) => {
                debug!(%owner, "profile created concurrently; returning the stored row");
                self.store.company_by_owner(&owner)?.ok_or_else(|| {
                    MarketplaceError::Store(StoreError::UniqueViolation(
                        UniqueConstraint::CompanyOwner,
                    ))
                })
            }
            Err(other) => Err(other.into()),
        }
    }
}
