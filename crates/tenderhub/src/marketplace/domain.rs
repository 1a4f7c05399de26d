use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::budget::AmountInput;
use super::status::TenderStatus;

/// Opaque subject handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for company profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Identifier wrapper for published tenders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenderId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl CompanyId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl TenderId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl ApplicationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Business profile owned by exactly one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub owner_identity: Identity,
    pub name: String,
    pub industry: Option<String>,
    pub description: String,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller supplied profile details for explicit registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRegistration {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Placeholder values written when a profile is provisioned on the owner's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDefaults {
    pub name: String,
    pub industry: String,
    pub description: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            name: "My Company".to_string(),
            industry: "Technology".to_string(),
            description: "Company description".to_string(),
        }
    }
}

/// Opportunity published by a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tender {
    pub id: TenderId,
    pub owner_company_id: CompanyId,
    pub title: String,
    pub description: String,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub deadline: NaiveDate,
    pub industry: Option<String>,
    pub status: TenderStatus,
    pub created_at: DateTime<Utc>,
}

/// Owner supplied fields for a new tender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    pub deadline: NaiveDate,
}

/// Active tender joined with the owning company's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct TenderListing {
    pub tender: Tender,
    pub company_name: String,
}

/// Proposal recorded against a tender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub tender_id: TenderId,
    pub applicant_company_id: CompanyId,
    pub proposal: String,
    pub budget: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Request-scoped application input. The budget stays unparsed until the
/// ledger has checked everything that comes before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub proposal: String,
    #[serde(default)]
    pub budget: Option<AmountInput>,
}

impl ApplicationDraft {
    pub fn new(proposal: impl Into<String>, budget: Option<f64>) -> Self {
        Self {
            proposal: proposal.into(),
            budget: budget.map(AmountInput::from),
        }
    }

    /// Draft carrying the budget exactly as a form submitted it.
    pub fn with_budget_text(proposal: impl Into<String>, budget: impl Into<String>) -> Self {
        Self {
            proposal: proposal.into(),
            budget: Some(AmountInput::Text(budget.into())),
        }
    }
}

/// Per-status tender counts shown on an owner's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OwnerDashboard {
    pub active: usize,
    pub closed: usize,
    pub cancelled: usize,
    pub total: usize,
}

impl OwnerDashboard {
    pub fn record(&mut self, status: TenderStatus) {
        match status {
            TenderStatus::Active => self.active += 1,
            TenderStatus::Closed => self.closed += 1,
            TenderStatus::Cancelled => self.cancelled += 1,
        }
        self.total += 1;
    }
}

/// Product rules that are deliberately switchable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketplacePolicy {
    /// Reject applications once the tender deadline is behind today.
    pub enforce_application_deadline: bool,
}

/// Settings the marketplace service is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketplaceSettings {
    pub policy: MarketplacePolicy,
    pub profile_defaults: ProfileDefaults,
}

/// Trimmed copy of an optional tag; blank tags collapse to `None`.
pub(crate) fn normalize_tag(tag: Option<String>) -> Option<String> {
    tag.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
