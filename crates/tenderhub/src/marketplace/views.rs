use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::budget::format_range;
use super::deadline::days_until;
use super::domain::{Company, CompanyId, Tender, TenderId, TenderListing};
use super::status::TenderStatus;

/// Tender as presented to browsers and owners, with derived display fields.
#[derive(Debug, Clone, Serialize)]
pub struct TenderView {
    pub id: TenderId,
    pub owner_company_id: CompanyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub title: String,
    pub description: String,
    pub industry: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub budget_label: String,
    pub deadline: NaiveDate,
    pub days_left: i64,
    pub status: TenderStatus,
    pub status_label: &'static str,
    pub created_at: DateTime<Utc>,
}

impl TenderView {
    pub fn from_tender(tender: &Tender, now: DateTime<Utc>) -> Self {
        Self {
            id: tender.id.clone(),
            owner_company_id: tender.owner_company_id.clone(),
            company_name: None,
            title: tender.title.clone(),
            description: tender.description.clone(),
            industry: tender.industry.clone(),
            budget_min: tender.budget_min,
            budget_max: tender.budget_max,
            budget_label: format_range(tender.budget_min, tender.budget_max),
            deadline: tender.deadline,
            days_left: days_until(tender.deadline, now),
            status: tender.status,
            status_label: tender.status.label(),
            created_at: tender.created_at,
        }
    }

    pub fn from_listing(listing: &TenderListing, now: DateTime<Utc>) -> Self {
        Self {
            company_name: Some(listing.company_name.clone()),
            ..Self::from_tender(&listing.tender, now)
        }
    }
}

/// Public face of a company profile; the owner identity stays private.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyView {
    pub id: CompanyId,
    pub name: String,
    pub industry: Option<String>,
    pub description: String,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Company> for CompanyView {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.clone(),
            name: company.name.clone(),
            industry: company.industry.clone(),
            description: company.description.clone(),
            website: company.website.clone(),
            created_at: company.created_at,
        }
    }
}

/// Filtered browse results plus the size of the unfiltered active set.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseView {
    pub total_active: usize,
    pub showing: usize,
    pub tenders: Vec<TenderView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn tender_view_derives_labels() {
        let now = Utc
            .with_ymd_and_hms(2025, 6, 2, 9, 30, 0)
            .single()
            .expect("valid instant");
        let tender = Tender {
            id: TenderId("tender-7".to_string()),
            owner_company_id: CompanyId("company-7".to_string()),
            title: "Warehouse racking".to_string(),
            description: "Install pallet racking".to_string(),
            budget_min: None,
            budget_max: Some(8_000.0),
            deadline: now.date_naive() + Duration::days(3),
            industry: Some("Manufacturing".to_string()),
            status: TenderStatus::Active,
            created_at: now,
        };

        let view = TenderView::from_listing(
            &TenderListing {
                tender,
                company_name: "Acme".to_string(),
            },
            now,
        );

        assert_eq!(view.budget_label, "up to 8,000");
        assert_eq!(view.days_left, 3);
        assert_eq!(view.status_label, "active");
        assert_eq!(view.company_name.as_deref(), Some("Acme"));
    }
}
