use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::budget::validate_amount;
use super::deadline::Clock;
use super::domain::{
    normalize_tag, CompanyId, OwnerDashboard, Tender, TenderDraft, TenderId, TenderListing,
};
use super::error::{MarketplaceError, Resource, ValidationError};
use super::repository::{CompanyStore, StoreError, TenderQuery, TenderStore};
use super::search::SearchFilter;
use super::status::{StatusTransitionError, TenderStatus};

const UNKNOWN_COMPANY: &str = "Unknown company";

/// Tender publication, listing and owner-side lifecycle.
pub struct TenderCatalog<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for TenderCatalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S> TenderCatalog<S>
where
    S: CompanyStore + TenderStore + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validate and publish a tender for `owner`. Nothing is written on failure.
    pub fn create(
        &self,
        owner: &CompanyId,
        draft: TenderDraft,
    ) -> Result<Tender, MarketplaceError> {
        let today = self.clock.today();
        let (budget_min, budget_max) = validate_draft(&draft, today)?;

        if self.store.company_by_id(owner)?.is_none() {
            return Err(MarketplaceError::NotFound(Resource::Company));
        }

        let tender = Tender {
            id: TenderId::generate(),
            owner_company_id: owner.clone(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            budget_min,
            budget_max,
            deadline: draft.deadline,
            industry: normalize_tag(draft.industry),
            status: TenderStatus::INITIAL,
            created_at: self.clock.now(),
        };

        let stored = self.store.insert_tender(tender)?;
        info!(
            tender_id = %stored.id,
            owner = %stored.owner_company_id,
            deadline = %stored.deadline,
            "tender published"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &TenderId) -> Result<Tender, MarketplaceError> {
        self.store
            .tender_by_id(id)?
            .ok_or(MarketplaceError::NotFound(Resource::Tender))
    }

    /// Active tenders with their owner's name, newest first.
    pub fn list_active(&self) -> Result<Vec<TenderListing>, MarketplaceError> {
        let tenders = self.store.tenders(&TenderQuery::active())?;
        self.with_company_names(tenders)
    }

    /// Every tender the company published, any status, newest first.
    pub fn list_by_owner(&self, owner: &CompanyId) -> Result<Vec<Tender>, MarketplaceError> {
        Ok(self.store.tenders(&TenderQuery::owned_by(owner.clone()))?)
    }

    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<TenderListing>, MarketplaceError> {
        Ok(filter.apply(self.list_active()?))
    }

    /// Owner-initiated status change. Foreign tenders read as missing.
    pub fn transition(
        &self,
        owner: &CompanyId,
        tender_id: &TenderId,
        target: TenderStatus,
    ) -> Result<Tender, MarketplaceError> {
        let tender = self.get(tender_id)?;
        if &tender.owner_company_id != owner {
            return Err(MarketplaceError::NotFound(Resource::Tender));
        }

        let next = tender.status.transition_to(target)?;
        let updated = self
            .store
            .update_tender_status(tender_id, tender.status, next)
            .map_err(|err| match err {
                StoreError::StaleStatus { current } => {
                    MarketplaceError::from(StatusTransitionError {
                        from: current,
                        to: target,
                    })
                }
                StoreError::NotFound => MarketplaceError::NotFound(Resource::Tender),
                other => MarketplaceError::Store(other),
            })?;

        info!(
            tender_id = %updated.id,
            from = %tender.status,
            to = %updated.status,
            "tender status changed"
        );
        Ok(updated)
    }

    pub fn owner_summary(&self, owner: &CompanyId) -> Result<OwnerDashboard, MarketplaceError> {
        let mut summary = OwnerDashboard::default();
        for tender in self.list_by_owner(owner)? {
            summary.record(tender.status);
        }
        Ok(summary)
    }

    fn with_company_names(
        &self,
        tenders: Vec<Tender>,
    ) -> Result<Vec<TenderListing>, MarketplaceError> {
        let mut names: HashMap<CompanyId, String> = HashMap::new();
        let mut listings = Vec::with_capacity(tenders.len());

        for tender in tenders {
            let company_name = match names.get(&tender.owner_company_id) {
                Some(name) => name.clone(),
                None => {
                    let name = match self.store.company_by_id(&tender.owner_company_id)? {
                        Some(company) => company.name,
                        None => {
                            warn!(
                                tender_id = %tender.id,
                                owner = %tender.owner_company_id,
                                "tender owner missing"
                            );
                            UNKNOWN_COMPANY.to_string()
                        }
                    };
                    names.insert(tender.owner_company_id.clone(), name.clone());
                    name
                }
            };
            listings.push(TenderListing {
                tender,
                company_name,
            });
        }

        Ok(listings)
    }
}

/// Field rules in order: required text, amounts, range, deadline.
fn validate_draft(
    draft: &TenderDraft,
    today: chrono::NaiveDate,
) -> Result<(Option<f64>, Option<f64>), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "title" });
    }
    if draft.description.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            field: "description",
        });
    }

    let budget_min = validate_amount("budget_min", draft.budget_min)?;
    let budget_max = validate_amount("budget_max", draft.budget_max)?;
    if let (Some(min), Some(max)) = (budget_min, budget_max) {
        if min > max {
            return Err(ValidationError::BudgetRange { min, max });
        }
    }

    if draft.deadline < today {
        return Err(ValidationError::DeadlineInPast {
            deadline: draft.deadline,
            today,
        });
    }

    Ok((budget_min, budget_max))
}
