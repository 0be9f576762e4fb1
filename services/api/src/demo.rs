use crate::infra::{DryRunTransport, LeadTransport};
use clap::{Args, ValueEnum};
use lead_intake::error::AppError;
use lead_intake::workflows::intake::{
    FormValue, IntakeService, IntakeServiceError, LeadWizard, SubmissionStatus,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum DemoLead {
    Seller,
    Buyer,
    Renter,
    Commercial,
}

impl DemoLead {
    fn all() -> [Self; 4] {
        [Self::Seller, Self::Buyer, Self::Renter, Self::Commercial]
    }

    fn title(self) -> &'static str {
        match self {
            DemoLead::Seller => "Residential seller",
            DemoLead::Buyer => "Residential buyer",
            DemoLead::Renter => "Residential renter",
            DemoLead::Commercial => "Commercial tenant",
        }
    }

    /// Answers typed on each page, in page order.
    fn pages(self) -> [Vec<(&'static str, &'static str)>; 3] {
        let identity = vec![
            ("firstName", "Jordan"),
            ("lastName", "Ellis"),
            ("phoneNumber", "(702) 555-0182"),
            ("email", "jordan.ellis@example.com"),
        ];
        match self {
            DemoLead::Seller => [
                identity,
                vec![
                    ("propertyType", "Residential"),
                    ("purpose", "Primary"),
                    ("action", "Sell"),
                ],
                vec![
                    ("streetAddress", "88 Canyon Crest Dr"),
                    ("reasonForSelling", "Buying Another home"),
                    ("timelineToSell", "3-4 months"),
                ],
            ],
            DemoLead::Buyer | DemoLead::Renter => [
                identity,
                vec![
                    ("propertyType", "Residential"),
                    ("purpose", "Family Home"),
                    (
                        "action",
                        if self == DemoLead::Buyer { "Buy" } else { "Rent/Lease" },
                    ),
                ],
                vec![
                    ("area", "Southwest"),
                    (
                        "priceRange",
                        if self == DemoLead::Buyer {
                            "$500k - $575k"
                        } else {
                            "$2,400 - $2,800"
                        },
                    ),
                    ("bedrooms", "4"),
                    ("bathrooms", "3"),
                    ("sqft", "2300"),
                    ("stories", "2"),
                    ("garages", "2"),
                ],
            ],
            DemoLead::Commercial => [
                identity,
                vec![
                    ("propertyType", "Commercial"),
                    ("purpose", "Personal Business"),
                    ("action", "Rent/Lease"),
                ],
                vec![
                    ("commercialType", "Retail"),
                    ("propertyGoals", "Lease"),
                    ("priceRange", "$6k - $9k / month"),
                    ("sqft", "2800"),
                    ("location", "East"),
                ],
            ],
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only walk this lead (defaults to every lead type)
    #[arg(long, value_enum)]
    pub(crate) lead: Option<DemoLead>,
    /// Print the full record payload as JSON
    #[arg(long)]
    pub(crate) show_payload: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MapArgs {
    /// JSON file holding a flat form object (field name to value)
    pub(crate) path: PathBuf,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { lead, show_payload } = args;
    let leads = match lead {
        Some(lead) => vec![lead],
        None => DemoLead::all().to_vec(),
    };

    let transport = DryRunTransport::default();
    println!("Lead intake demo (records are captured locally, nothing is sent to Notion)");

    for lead in leads {
        println!("\n{}", lead.title());
        let mut wizard = LeadWizard::new();

        for page in lead.pages() {
            let step = wizard.current_step();
            for (name, value) in page {
                if let Err(err) = wizard.on_field_change(name, value) {
                    println!("  ! {err}");
                }
            }
            let gaps = wizard.current_gaps();
            if gaps.is_empty() {
                println!("  [{}] {} complete", step.index + 1, step.kind.label());
            } else {
                for gap in gaps {
                    println!("  [{}] {}", step.index + 1, gap.hint());
                }
            }
            wizard.on_next();
        }

        let status = match wizard.on_submit(&transport).await {
            Ok(status) => status,
            Err(err) => {
                println!("  Submission not started: {err}");
                continue;
            }
        };
        match status {
            SubmissionStatus::Success => {
                let record_id = wizard
                    .state()
                    .record_id
                    .as_ref()
                    .map(|id| id.0.as_str())
                    .unwrap_or("-");
                println!(
                    "  Submitted as {} -> {} ({})",
                    wizard.branch().map(|branch| branch.label()).unwrap_or_default(),
                    record_id,
                    wizard.current_step().kind.label()
                );
            }
            other => println!(
                "  Submission {}: {}",
                other.label(),
                wizard.error_message().unwrap_or("no detail")
            ),
        }
    }

    let records = transport.records();
    println!("\nCaptured {} record(s)", records.len());
    for record in &records {
        let summary: Vec<String> = record
            .iter()
            .map(|(name, value)| format!("{name}={}", value.display_value()))
            .collect();
        println!("- {}", summary.join(" | "));
        if show_payload {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
    }

    Ok(())
}

pub(crate) fn run_map(args: MapArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.path)?;
    let form: BTreeMap<String, Option<FormValue>> = serde_json::from_str(&raw)?;

    let service = IntakeService::new(Arc::new(LeadTransport::DryRun(
        DryRunTransport::default(),
    )));
    match service.preview_form(form) {
        Ok((branch, record)) => {
            println!("Branch: {}", branch.label());
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(IntakeServiceError::Incomplete { gaps }) => {
            println!("Form is incomplete:");
            for gap in &gaps {
                println!("- {}", gap.hint());
            }
            Err(IntakeServiceError::Incomplete { gaps }.into())
        }
        Err(err) => Err(err.into()),
    }
}
