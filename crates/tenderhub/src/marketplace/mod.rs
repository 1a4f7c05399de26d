//! Tender marketplace core: company profiles, tender catalog, search and the
//! application ledger, all over a pluggable store.

pub mod budget;
pub mod catalog;
pub mod deadline;
pub mod directory;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod repository;
pub mod router;
pub mod search;
pub mod service;
pub mod status;
pub mod views;

#[cfg(test)]
mod tests;

pub use budget::{format_amount, format_range, parse_amount, AmountInput};
pub use catalog::TenderCatalog;
pub use deadline::{days_until, Clock, FixedClock, SystemClock};
pub use directory::CompanyDirectory;
pub use domain::{
    Application, ApplicationDraft, ApplicationId, Company, CompanyId, CompanyRegistration,
    Identity, MarketplacePolicy, MarketplaceSettings, OwnerDashboard, ProfileDefaults, Tender,
    TenderDraft, TenderId, TenderListing,
};
pub use error::{MarketplaceError, Resource, ValidationError};
pub use ledger::ApplicationLedger;
pub use memory::MemoryStore;
pub use repository::{
    ApplicationStore, CompanyStore, IdentityProvider, MarketplaceStore, StoreError, TenderQuery,
    TenderStore, UniqueConstraint,
};
pub use router::{marketplace_router, RequestIdentity, IDENTITY_HEADER};
pub use search::{matches, SearchFilter, ALL_INDUSTRIES};
pub use service::MarketplaceService;
pub use status::{StatusTransitionError, TenderStatus};
pub use views::{BrowseView, CompanyView, TenderView};
