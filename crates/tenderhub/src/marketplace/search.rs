use super::domain::{Company, Tender, TenderListing};

/// Industry filter value that disables industry narrowing.
pub const ALL_INDUSTRIES: &str = "all";

/// Browse-page query: free text plus an industry tag. Used for tenders and for
/// the company directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub query: String,
    pub industry: String,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            industry: industry.into(),
        }
    }

    pub fn matches(&self, listing: &TenderListing) -> bool {
        matches(
            &listing.tender,
            &listing.company_name,
            &self.query,
            &self.industry,
        )
    }

    pub fn apply(&self, listings: Vec<TenderListing>) -> Vec<TenderListing> {
        listings
            .into_iter()
            .filter(|listing| self.matches(listing))
            .collect()
    }

    /// Company name or description, plus the company's industry tag.
    pub fn matches_company(&self, company: &Company) -> bool {
        text_matches(
            &[company.name.as_str(), company.description.as_str()],
            &self.query,
        ) && industry_matches(company.industry.as_deref(), &self.industry)
    }
}

/// Text matches title, description or company name case-insensitively; the
/// industry tag must match exactly unless the filter is empty or `all`.
pub fn matches(
    tender: &Tender,
    owner_company_name: &str,
    query_text: &str,
    industry_filter: &str,
) -> bool {
    text_matches(
        &[
            tender.title.as_str(),
            tender.description.as_str(),
            owner_company_name,
        ],
        query_text,
    ) && industry_matches(tender.industry.as_deref(), industry_filter)
}

/// Surrounding whitespace in the query is ignored, so a blank query matches.
fn text_matches(haystacks: &[&str], query_text: &str) -> bool {
    let needle = query_text.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    haystacks
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
}

fn industry_matches(industry: Option<&str>, industry_filter: &str) -> bool {
    if industry_filter.is_empty() || industry_filter == ALL_INDUSTRIES {
        return true;
    }
    industry == Some(industry_filter)
}
