use std::sync::Arc;

use tracing::info;

use super::deadline::{is_past, Clock};
use super::domain::{
    Application, ApplicationDraft, ApplicationId, Company, CompanyId, MarketplacePolicy, Tender,
    TenderId,
};
use super::error::{MarketplaceError, Resource, ValidationError};
use super::repository::{
    ApplicationStore, CompanyStore, IdentityProvider, StoreError, TenderStore, UniqueConstraint,
};
use super::status::TenderStatus;

/// Records applications; one per (tender, applicant company).
pub struct ApplicationLedger<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    policy: MarketplacePolicy,
}

impl<S> Clone for ApplicationLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<S> ApplicationLedger<S>
where
    S: CompanyStore + TenderStore + ApplicationStore + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, policy: MarketplacePolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> MarketplacePolicy {
        self.policy
    }

    /// Submit on behalf of the caller's company.
    pub fn submit(
        &self,
        tender_id: &TenderId,
        applicant: &impl IdentityProvider,
        draft: ApplicationDraft,
    ) -> Result<Application, MarketplaceError> {
        require_proposal(&draft)?;
        let tender = self.load_tender(tender_id)?;

        let owner = applicant
            .current_identity()
            .ok_or(MarketplaceError::Authentication)?;
        let company = self.store.company_by_owner(&owner)?;

        self.record(tender, company, draft)
    }

    /// Submit for an already resolved company id.
    pub fn submit_for_company(
        &self,
        tender_id: &TenderId,
        applicant: &CompanyId,
        draft: ApplicationDraft,
    ) -> Result<Application, MarketplaceError> {
        require_proposal(&draft)?;
        let tender = self.load_tender(tender_id)?;
        let company = self.store.company_by_id(applicant)?;

        self.record(tender, company, draft)
    }

    /// Applications received by the tender's owner, newest first.
    pub fn list_for_tender(
        &self,
        owner: &impl IdentityProvider,
        tender_id: &TenderId,
    ) -> Result<Vec<Application>, MarketplaceError> {
        let identity = owner
            .current_identity()
            .ok_or(MarketplaceError::Authentication)?;
        let tender = self.load_tender(tender_id)?;

        let is_owner = self
            .store
            .company_by_owner(&identity)?
            .is_some_and(|company| company.id == tender.owner_company_id);
        if !is_owner {
            return Err(MarketplaceError::NotFound(Resource::Tender));
        }

        Ok(self.store.applications_for_tender(tender_id)?)
    }

    fn load_tender(&self, tender_id: &TenderId) -> Result<Tender, MarketplaceError> {
        self.store
            .tender_by_id(tender_id)?
            .ok_or(MarketplaceError::NotFound(Resource::Tender))
    }

    fn record(
        &self,
        tender: Tender,
        company: Option<Company>,
        draft: ApplicationDraft,
    ) -> Result<Application, MarketplaceError> {
        let company = company.ok_or(ValidationError::IncompleteProfile)?;

        if tender.status != TenderStatus::Active {
            return Err(ValidationError::TenderClosed {
                status: tender.status,
            }
            .into());
        }

        let today = self.clock.today();
        if self.policy.enforce_application_deadline && is_past(tender.deadline, today) {
            return Err(ValidationError::DeadlinePassed {
                deadline: tender.deadline,
            }
            .into());
        }

        let budget = match &draft.budget {
            Some(input) => input.resolve("budget")?,
            None => None,
        };

        let application = Application {
            id: ApplicationId::generate(),
            tender_id: tender.id.clone(),
            applicant_company_id: company.id.clone(),
            proposal: draft.proposal,
            budget,
            created_at: self.clock.now(),
        };

        match self.store.insert_application(application) {
            Ok(stored) => {
                info!(
                    application_id = %stored.id,
                    tender_id = %stored.tender_id,
                    company_id = %stored.applicant_company_id,
                    "application accepted"
                );
                Ok(stored)
            }
            Err(StoreError::UniqueViolation(UniqueConstraint::ApplicationPerTender)) => {
                info!(
                    tender_id = %tender.id,
                    company_id = %company.id,
                    "duplicate application rejected"
                );
                Err(MarketplaceError::DuplicateApplication {
                    tender_id: tender.id,
                    company_id: company.id,
                })
            }
            Err(other) => Err(other.into()),
        }
    }
}

fn require_proposal(draft: &ApplicationDraft) -> Result<(), ValidationError> {
    if draft.proposal.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "proposal" });
    }
    Ok(())
}
