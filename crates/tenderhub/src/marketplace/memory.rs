use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Application, Company, CompanyId, Identity, Tender, TenderId};
use super::repository::{
    ApplicationStore, CompanyStore, StoreError, TenderQuery, TenderStore, UniqueConstraint,
};
use super::status::TenderStatus;

/// Process-local store. One lock covers every table so each
/// check-and-insert is atomic, the same guarantee a unique index gives.
#[derive(Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    companies: Vec<Company>,
    tenders: Vec<Tender>,
    applications: Vec<Application>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    pub fn company_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.companies.len())
    }

    pub fn application_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.applications.len())
    }
}

/// Newest first; rows sharing a timestamp keep latest-insert-first order.
fn newest_first<T: Clone>(
    rows: impl DoubleEndedIterator<Item = T>,
    created_at: fn(&T) -> i64,
) -> Vec<T> {
    let mut rows: Vec<T> = rows.rev().collect();
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows
}

impl CompanyStore for MemoryStore {
    fn insert_company(&self, company: Company) -> Result<Company, StoreError> {
        let mut tables = self.lock()?;
        if tables
            .companies
            .iter()
            .any(|existing| existing.owner_identity == company.owner_identity)
        {
            return Err(StoreError::UniqueViolation(UniqueConstraint::CompanyOwner));
        }
        if tables.companies.iter().any(|existing| existing.id == company.id) {
            return Err(StoreError::UniqueViolation(UniqueConstraint::PrimaryKey));
        }
        tables.companies.push(company.clone());
        Ok(company)
    }

    fn company_by_owner(&self, owner: &Identity) -> Result<Option<Company>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .companies
            .iter()
            .find(|company| &company.owner_identity == owner)
            .cloned())
    }

    fn company_by_id(&self, id: &CompanyId) -> Result<Option<Company>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .companies
            .iter()
            .find(|company| &company.id == id)
            .cloned())
    }

    fn companies(&self) -> Result<Vec<Company>, StoreError> {
        Ok(self.lock()?.companies.clone())
    }
}

impl TenderStore for MemoryStore {
    fn insert_tender(&self, tender: Tender) -> Result<Tender, StoreError> {
        let mut tables = self.lock()?;
        if tables.tenders.iter().any(|existing| existing.id == tender.id) {
            return Err(StoreError::UniqueViolation(UniqueConstraint::PrimaryKey));
        }
        tables.tenders.push(tender.clone());
        Ok(tender)
    }

    fn tender_by_id(&self, id: &TenderId) -> Result<Option<Tender>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.tenders.iter().find(|tender| &tender.id == id).cloned())
    }

    fn tenders(&self, query: &TenderQuery) -> Result<Vec<Tender>, StoreError> {
        let tables = self.lock()?;
        let matching = tables
            .tenders
            .iter()
            .filter(|tender| query.matches(tender))
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(matching.into_iter(), |tender| {
            tender.created_at.timestamp_micros()
        }))
    }

    fn update_tender_status(
        &self,
        id: &TenderId,
        expected: TenderStatus,
        next: TenderStatus,
    ) -> Result<Tender, StoreError> {
        let mut tables = self.lock()?;
        let tender = tables
            .tenders
            .iter_mut()
            .find(|tender| &tender.id == id)
            .ok_or(StoreError::NotFound)?;
        if tender.status != expected {
            return Err(StoreError::StaleStatus {
                current: tender.status,
            });
        }
        tender.status = next;
        Ok(tender.clone())
    }
}

impl ApplicationStore for MemoryStore {
    fn insert_application(&self, application: Application) -> Result<Application, StoreError> {
        let mut tables = self.lock()?;
        if tables.applications.iter().any(|existing| {
            existing.tender_id == application.tender_id
                && existing.applicant_company_id == application.applicant_company_id
        }) {
            return Err(StoreError::UniqueViolation(
                UniqueConstraint::ApplicationPerTender,
            ));
        }
        if tables
            .applications
            .iter()
            .any(|existing| existing.id == application.id)
        {
            return Err(StoreError::UniqueViolation(UniqueConstraint::PrimaryKey));
        }
        tables.applications.push(application.clone());
        Ok(application)
    }

    fn applications_for_tender(
        &self,
        tender_id: &TenderId,
    ) -> Result<Vec<Application>, StoreError> {
        let tables = self.lock()?;
        let matching = tables
            .applications
            .iter()
            .filter(|application| &application.tender_id == tender_id)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(matching.into_iter(), |application| {
            application.created_at.timestamp_micros()
        }))
    }
}
