use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use std::sync::Arc;
use tenderhub::error::AppError;
use tenderhub::marketplace::{
    Application, ApplicationDraft, CompanyRegistration, FixedClock, Identity, MarketplaceError,
    MarketplaceService, MarketplaceSettings, MemoryStore, SearchFilter, TenderDraft,
    TenderStatus, TenderView,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pin the marketplace clock to this date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Everything the demo walk-through produced, kept separate from printing.
#[derive(Debug)]
pub(crate) struct DemoOutcome {
    pub(crate) today: NaiveDate,
    pub(crate) buyer: String,
    pub(crate) supplier: String,
    pub(crate) published: TenderView,
    pub(crate) application: Application,
    pub(crate) duplicate: Option<MarketplaceError>,
    pub(crate) search_hits: Vec<TenderView>,
    pub(crate) received: usize,
    pub(crate) closed: TenderView,
    pub(crate) closed_rejection: Option<MarketplaceError>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    let outcome = run_scenario(today)?;
    render_outcome(&outcome);
    Ok(())
}

pub(crate) fn run_scenario(today: NaiveDate) -> Result<DemoOutcome, MarketplaceError> {
    let now = Utc.from_utc_datetime(&today.and_time(NaiveTime::MIN));
    let store = Arc::new(MemoryStore::default());
    let service = MarketplaceService::with_clock(
        store,
        MarketplaceSettings::default(),
        Arc::new(FixedClock(now)),
    );

    let buyer_identity = Identity::new("demo|acme-cloud");
    let supplier_identity = Identity::new("demo|bolt-integrators");

    let buyer = service.register(
        &buyer_identity,
        CompanyRegistration {
            name: "Acme Cloud".to_string(),
            industry: Some("Technology".to_string()),
            description: Some("Managed hosting for regional retailers".to_string()),
            website: None,
        },
    )?;
    let supplier = service.register(
        &supplier_identity,
        CompanyRegistration {
            name: "Bolt Integrators".to_string(),
            industry: Some("Technology".to_string()),
            description: None,
            website: Some("https://bolt.example".to_string()),
        },
    )?;

    let tender = service.publish_tender(
        &buyer_identity,
        TenderDraft {
            title: "Cloud Infrastructure Migration".to_string(),
            description: "Partner wanted to deliver a lift-and-shift of 40 VMs".to_string(),
            industry: Some("Technology".to_string()),
            budget_min: Some(10_000.0),
            budget_max: Some(50_000.0),
            deadline: today + chrono::Duration::days(30),
        },
    )?;

    let proposal = || ApplicationDraft::new("We can deliver in 4 weeks", Some(20_000.0));
    let application = service.apply(&supplier_identity, &tender.id, proposal())?;
    let duplicate = service
        .apply(&supplier_identity, &tender.id, proposal())
        .err();

    let search_hits = service
        .browse(&SearchFilter::new("deliver", "Technology"))?
        .iter()
        .map(|listing| TenderView::from_listing(listing, now))
        .collect();

    let received = service
        .received_applications(&buyer_identity, &tender.id)?
        .len();

    let closed = service.change_status(&buyer_identity, &tender.id, TenderStatus::Closed)?;
    let closed_rejection = service
        .apply(&buyer_identity, &tender.id, proposal())
        .err();

    Ok(DemoOutcome {
        today,
        buyer: buyer.name,
        supplier: supplier.name,
        published: TenderView::from_tender(&tender, now),
        application,
        duplicate,
        search_hits,
        received,
        closed: TenderView::from_tender(&closed, now),
        closed_rejection,
    })
}

fn render_outcome(outcome: &DemoOutcome) {
    println!("TenderHub marketplace demo ({})", outcome.today);
    println!(
        "\n{} published \"{}\"",
        outcome.buyer, outcome.published.title
    );
    println!("  Budget: {}", outcome.published.budget_label);
    println!(
        "  Deadline: {} ({} days left)",
        outcome.published.deadline, outcome.published.days_left
    );
    println!("  Status: {}", outcome.published.status_label);

    println!("\n{} applied", outcome.supplier);
    println!("  Proposal: {}", outcome.application.proposal);
    match outcome.application.budget {
        Some(budget) => println!(
            "  Quoted: {}",
            tenderhub::marketplace::format_amount(budget)
        ),
        None => println!("  Quoted: not specified"),
    }
    match &outcome.duplicate {
        Some(err) => println!("  Second attempt rejected: {err}"),
        None => println!("  Second attempt unexpectedly accepted"),
    }

    println!("\nSearch \"deliver\" in Technology");
    if outcome.search_hits.is_empty() {
        println!("  No matches");
    }
    for hit in &outcome.search_hits {
        println!(
            "  - {} by {} [{}]",
            hit.title,
            hit.company_name.as_deref().unwrap_or("unknown"),
            hit.budget_label
        );
    }

    println!(
        "\nApplications received by {}: {}",
        outcome.buyer, outcome.received
    );
    println!("Tender status is now {}", outcome.closed.status_label);
    if let Some(err) = &outcome.closed_rejection {
        println!("Application to the closed tender rejected: {err}");
    }
}
