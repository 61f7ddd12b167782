use crate::infra::{bootstrap, SharedPlatform};
use clap::Args;
use job_platform::config::AppConfig;
use job_platform::error::AppError;
use job_platform::platform::{
    AttributeRequest, CompanyRef, JobCsvImporter, JobPosting, JobRequest, PlatformError,
    SearchResultItem,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Search text to run after the sample jobs are posted
    #[arg(long, default_value = "Indigenous")]
    pub(crate) query: String,
    /// Location filter for the search; pass an empty string to skip it
    #[arg(long, default_value = "Canada")]
    pub(crate) location: String,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV export with one job per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Run this search once the import finishes
    #[arg(long)]
    pub(crate) query: Option<String>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { query, location } = args;

    let config = AppConfig::load()?;
    let platform = bootstrap(&config)?;
    let company = platform.registry().company()?.clone();

    println!("Job platform demo ({:?} provider)", config.provider.kind);
    print_registration(&platform, &company)?;

    println!("\nPosting sample jobs");
    let outcomes = platform.post_jobs(&company, sample_jobs());
    render_outcomes(&outcomes);

    let location = Some(location.as_str()).filter(|value| !value.trim().is_empty());
    search_and_render(&platform, &query, location)
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs { csv, query } = args;

    let requests = JobCsvImporter::from_path(&csv)?;
    let config = AppConfig::load()?;
    let platform = bootstrap(&config)?;
    let company = platform.registry().company()?.clone();

    println!("Importing {} job(s) from {}", requests.len(), csv.display());
    print_registration(&platform, &company)?;
    let outcomes = platform.post_jobs(&company, requests);
    render_outcomes(&outcomes);

    match query {
        Some(query) => search_and_render(&platform, &query, None),
        None => Ok(()),
    }
}

fn print_registration(platform: &SharedPlatform, company: &CompanyRef) -> Result<(), AppError> {
    let tenant = platform.registry().tenant()?;
    println!(
        "- Tenant {} -> {}",
        tenant.external_id, tenant.provider_path
    );
    println!(
        "- Company {} ({}) -> {}",
        company.display_name, company.external_id, company.provider_path
    );
    Ok(())
}

fn render_outcomes(outcomes: &[Result<JobPosting, PlatformError>]) {
    let posted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    for (index, outcome) in outcomes.iter().enumerate() {
        match outcome {
            Ok(posting) => println!(
                "  {}. {} -> {}",
                index + 1,
                posting.title,
                posting.provider_path.as_deref().unwrap_or("(no path)")
            ),
            Err(err) if err.is_retryable() => {
                println!("  {}. failed, retry later: {}", index + 1, err)
            }
            Err(err) => println!("  {}. rejected: {}", index + 1, err),
        }
    }
    println!("Posted {} of {} job(s)", posted, outcomes.len());
}

fn search_and_render(
    platform: &SharedPlatform,
    query: &str,
    location: Option<&str>,
) -> Result<(), AppError> {
    let tenant = platform.registry().tenant()?.clone();
    let results = platform.search_jobs(&tenant, query, location)?;

    match location {
        Some(location) => println!("\nSearch '{}' in '{}'", query, location),
        None => println!("\nSearch '{}'", query),
    }
    render_results(&results);
    Ok(())
}

fn render_results(results: &[SearchResultItem]) {
    if results.is_empty() {
        println!("  No matching jobs");
        return;
    }
    for item in results {
        println!("- {} @ {}", item.title, item.primary_location);
        println!("  Company: {}", item.company_ref);
        println!("  {}", item.description);
    }
}

fn indigenous_focused() -> AttributeRequest {
    AttributeRequest {
        name: "indigenous_focused".to_string(),
        string_values: vec!["true".to_string()],
        filterable: true,
    }
}

pub(crate) fn sample_jobs() -> Vec<JobRequest> {
    let benefits = vec!["PAID_TIME_OFF".to_string(), "HEALTH_INSURANCE".to_string()];
    vec![
        JobRequest {
            title: Some("Indigenous Community Liaison".to_string()),
            description: Some(
                "Working with Indigenous communities to build lasting partnerships.".to_string(),
            ),
            addresses: vec!["Vancouver, BC, Canada".to_string()],
            benefits: benefits.clone(),
            custom_attributes: vec![indigenous_focused()],
            ..JobRequest::default()
        },
        JobRequest {
            title: Some("Cultural Program Manager".to_string()),
            description: Some(
                "Managing cultural programs and events that celebrate Indigenous heritage."
                    .to_string(),
            ),
            addresses: vec!["Toronto, ON, Canada".to_string()],
            benefits,
            custom_attributes: vec![indigenous_focused()],
            ..JobRequest::default()
        },
    ]
}
