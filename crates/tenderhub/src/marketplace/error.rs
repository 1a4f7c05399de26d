use std::fmt;

use chrono::NaiveDate;

use super::domain::{CompanyId, TenderId};
use super::repository::StoreError;
use super::status::{StatusTransitionError, TenderStatus};

/// Input rejected before anything is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be a non-negative amount (found {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{field} must be a number (found '{raw}')")]
    InvalidAmount { field: &'static str, raw: String },
    #[error("budget_min ({min}) must not exceed budget_max ({max})")]
    BudgetRange { min: f64, max: f64 },
    #[error("deadline {deadline} is before today ({today})")]
    DeadlineInPast { deadline: NaiveDate, today: NaiveDate },
    #[error("complete your company profile first")]
    IncompleteProfile,
    #[error("tender is no longer accepting applications (status {status})")]
    TenderClosed { status: TenderStatus },
    #[error("tender deadline {deadline} has passed")]
    DeadlinePassed { deadline: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Company,
    Tender,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Company => f.write_str("company"),
            Resource::Tender => f.write_str("tender"),
        }
    }
}

/// Error raised by the marketplace components.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("authentication required")]
    Authentication,
    #[error("{0} not found")]
    NotFound(Resource),
    #[error("company {company_id} has already applied to tender {tender_id}")]
    DuplicateApplication {
        tender_id: TenderId,
        company_id: CompanyId,
    },
    #[error(transparent)]
    InvalidTransition(#[from] StatusTransitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
