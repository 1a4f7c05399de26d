use chrono::Duration;

use super::common::{alice, bob, build_service, now, published_tender, tender_draft};
use crate::marketplace::domain::{Identity, OwnerDashboard, TenderDraft};
use crate::marketplace::error::{MarketplaceError, Resource, ValidationError};
use crate::marketplace::repository::{TenderQuery, TenderStore};
use crate::marketplace::search::SearchFilter;
use crate::marketplace::status::TenderStatus;

fn draft_titled(title: &str, industry: &str) -> TenderDraft {
    TenderDraft {
        title: title.to_string(),
        industry: Some(industry.to_string()),
        ..tender_draft()
    }
}

#[test]
fn publish_provisions_owner_and_starts_active() {
    let (service, store) = build_service();

    let tender = published_tender(&service);
    let owner = service.ensure_profile(&alice()).expect("owner profile");

    assert_eq!(tender.owner_company_id, owner.id);
    assert_eq!(tender.status, TenderStatus::Active);
    assert_eq!(tender.created_at, now());
    assert_eq!(store.company_count().expect("count"), 1);
}

#[test]
fn inverted_budget_range_is_rejected_without_writing() {
    let (service, store) = build_service();
    let draft = TenderDraft {
        budget_min: Some(5000.0),
        budget_max: Some(1000.0),
        ..tender_draft()
    };

    let err = service
        .publish_tender(&alice(), draft)
        .expect_err("range rejected");
    assert!(matches!(
        err,
        MarketplaceError::Validation(ValidationError::BudgetRange { .. })
    ));

    let stored = store.tenders(&TenderQuery::default()).expect("query");
    assert!(stored.is_empty());
}

#[test]
fn ordered_budget_range_is_accepted() {
    let (service, _) = build_service();
    let draft = TenderDraft {
        budget_min: Some(1000.0),
        budget_max: Some(5000.0),
        ..tender_draft()
    };

    let tender = service.publish_tender(&alice(), draft).expect("published");
    assert_eq!(tender.budget_min, Some(1000.0));
    assert_eq!(tender.budget_max, Some(5000.0));
}

#[test]
fn negative_amounts_are_rejected() {
    let (service, _) = build_service();
    let draft = TenderDraft {
        budget_min: Some(-1.0),
        budget_max: None,
        ..tender_draft()
    };

    assert!(matches!(
        service.publish_tender(&alice(), draft),
        Err(MarketplaceError::Validation(ValidationError::NegativeAmount {
            field: "budget_min",
            ..
        }))
    ));
}

#[test]
fn past_deadline_is_rejected_but_today_is_fine() {
    let (service, store) = build_service();
    let yesterday = TenderDraft {
        deadline: now().date_naive() - Duration::days(1),
        ..tender_draft()
    };

    assert!(matches!(
        service.publish_tender(&alice(), yesterday),
        Err(MarketplaceError::Validation(ValidationError::DeadlineInPast { .. }))
    ));
    assert!(store
        .tenders(&TenderQuery::default())
        .expect("query")
        .is_empty());

    let today = TenderDraft {
        deadline: now().date_naive(),
        ..tender_draft()
    };
    service.publish_tender(&alice(), today).expect("today accepted");
}

#[test]
fn blank_title_is_reported_before_other_problems() {
    let (service, _) = build_service();
    let draft = TenderDraft {
        title: "  ".to_string(),
        budget_min: Some(5000.0),
        budget_max: Some(1000.0),
        ..tender_draft()
    };

    assert!(matches!(
        service.publish_tender(&alice(), draft),
        Err(MarketplaceError::Validation(ValidationError::EmptyField { field: "title" }))
    ));
}

#[test]
fn anonymous_publish_is_rejected() {
    let (service, store) = build_service();
    let none: Option<Identity> = None;

    assert!(matches!(
        service.publish_tender(&none, tender_draft()),
        Err(MarketplaceError::Authentication)
    ));
    assert_eq!(store.company_count().expect("count"), 0);
}

#[test]
fn create_requires_an_existing_company() {
    let (service, _) = build_service();
    let ghost = crate::marketplace::domain::CompanyId("missing".to_string());

    assert!(matches!(
        service.catalog().create(&ghost, tender_draft()),
        Err(MarketplaceError::NotFound(Resource::Company))
    ));
}

#[test]
fn list_active_is_newest_first_and_skips_closed() {
    let (service, _) = build_service();

    let first = service
        .publish_tender(&alice(), draft_titled("Office Fit-out", "Construction"))
        .expect("first");
    let second = service
        .publish_tender(&bob(), draft_titled("Payroll Platform", "Technology"))
        .expect("second");
    let third = service
        .publish_tender(&alice(), draft_titled("Fleet Leasing", "Logistics"))
        .expect("third");

    service
        .change_status(&bob(), &second.id, TenderStatus::Closed)
        .expect("closed");

    let listings = service.catalog().list_active().expect("listings");
    let ids = listings
        .iter()
        .map(|listing| listing.tender.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![third.id, first.id]);
    assert!(listings
        .iter()
        .all(|listing| listing.company_name == "My Company"));
}

#[test]
fn search_filters_by_text_and_industry() {
    let (service, _) = build_service();
    service
        .publish_tender(&alice(), draft_titled("Office Fit-out", "Construction"))
        .expect("construction");
    service
        .publish_tender(&alice(), draft_titled("Payroll Platform", "Technology"))
        .expect("technology");

    let by_text = service
        .browse(&SearchFilter::new("  PAYROLL ", "all"))
        .expect("search");
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].tender.title, "Payroll Platform");

    let by_industry = service
        .browse(&SearchFilter::new("", "Construction"))
        .expect("search");
    assert_eq!(by_industry.len(), 1);
    assert_eq!(by_industry[0].tender.title, "Office Fit-out");

    let everything = service
        .browse(&SearchFilter::new("", ""))
        .expect("search");
    assert_eq!(everything.len(), 2);
}

#[test]
fn only_the_owner_can_change_status() {
    let (service, _) = build_service();
    let tender = published_tender(&service);
    service.ensure_profile(&bob()).expect("bob profile");

    assert!(matches!(
        service.change_status(&bob(), &tender.id, TenderStatus::Closed),
        Err(MarketplaceError::NotFound(Resource::Tender))
    ));

    let closed = service
        .change_status(&alice(), &tender.id, TenderStatus::Closed)
        .expect("owner closes");
    assert_eq!(closed.status, TenderStatus::Closed);
}

#[test]
fn terminal_statuses_do_not_move() {
    let (service, _) = build_service();
    let tender = published_tender(&service);

    service
        .change_status(&alice(), &tender.id, TenderStatus::Cancelled)
        .expect("cancelled");

    for target in TenderStatus::ordered() {
        let err = service
            .change_status(&alice(), &tender.id, target)
            .expect_err("terminal status is final");
        assert!(matches!(err, MarketplaceError::InvalidTransition(_)));
    }
}

#[test]
fn owner_listing_and_dashboard_cover_every_status() {
    let (service, _) = build_service();
    let open = published_tender(&service);
    let closed = published_tender(&service);
    let cancelled = published_tender(&service);
    service
        .change_status(&alice(), &closed.id, TenderStatus::Closed)
        .expect("close");
    service
        .change_status(&alice(), &cancelled.id, TenderStatus::Cancelled)
        .expect("cancel");

    let mine = service.my_tenders(&alice()).expect("owner listing");
    assert_eq!(mine.len(), 3);
    assert_eq!(mine[2].id, open.id);

    let summary = service.dashboard(&alice()).expect("dashboard");
    assert_eq!(
        summary,
        OwnerDashboard {
            active: 1,
            closed: 1,
            cancelled: 1,
            total: 3,
        }
    );

    assert!(matches!(
        service.dashboard(&bob()),
        Err(MarketplaceError::NotFound(Resource::Company))
    ));
}
