//! Command-line front end: run a full analysis from a site JSON file, or a
//! canned demo for stakeholder walkthroughs.

use crate::analysis::{AnalysisOptions, Analyzer};
use crate::config::AnalysisDefaults;
use crate::error::{AppError, EngineError};
use crate::residual::ResidualMethod;
use crate::site::{
    ConditionOverrides, EntitlementStage, HeightDistrict, IncomeLevel, MarketArea, MixProfile,
    SiteInput, TcacTier, TransitContext, Zone,
};
use crate::telemetry;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "landres",
    about = "Zoning-incentive feasibility and land-residual analysis for multifamily sites",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a site described by a JSON file
    Analyze(AnalyzeArgs),
    /// Run the analysis against a canned Westside R3 example (default)
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Path to the site JSON file
    site: PathBuf,
    /// Affordable income level (extremely_low, very_low, low, moderate)
    #[arg(long, default_value = "very_low", value_parser = parse_income_level)]
    income: IncomeLevel,
    /// Bedroom-mix profile (urban, family, affordable, workforce)
    #[arg(long, default_value = "urban", value_parser = parse_mix_profile)]
    profile: MixProfile,
    /// Entitlement stage (raw_land, entitled, plan_check, ready_to_issue, permitted)
    #[arg(long, default_value = "raw_land", value_parser = parse_stage)]
    stage: EntitlementStage,
    /// Force the headline residual method instead of the for-sale/rental pick
    #[arg(long, value_parser = parse_method)]
    method: Option<ResidualMethod>,
    /// Write the analysis JSON here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also export the seller sensitivity tables as CSV
    #[arg(long)]
    scenario_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Lot area in square feet
    #[arg(long)]
    lot_sf: Option<f64>,
    /// Distance to the nearest major transit stop, in feet
    #[arg(long)]
    major_stop_ft: Option<f64>,
}

pub fn run() -> Result<(), AppError> {
    let defaults = AnalysisDefaults::load()?;
    // Ignore a second install so library callers embedding `run` keep their
    // own subscriber.
    let _ = telemetry::init(&defaults.log_level);

    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Analyze(args) => run_analyze(args, defaults),
        Command::Demo(args) => run_demo(args, defaults),
    }
}

fn run_analyze(args: AnalyzeArgs, defaults: AnalysisDefaults) -> Result<(), AppError> {
    let file = File::open(&args.site)?;
    let site: SiteInput = serde_json::from_reader(file).map_err(EngineError::from)?;

    let options = AnalysisOptions {
        income_level: args.income,
        mix_profile: args.profile,
        stage: args.stage,
        residual_method: args.method,
    };
    let analysis = Analyzer::new(defaults).analyze(&site, options);

    if let Some(path) = &args.scenario_csv {
        let file = File::create(path)?;
        analysis.seller.write_csv(file).map_err(EngineError::from)?;
    }

    let json = serde_json::to_string_pretty(&analysis).map_err(EngineError::from)?;
    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json.as_bytes())?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_demo(args: DemoArgs, defaults: AnalysisDefaults) -> Result<(), AppError> {
    let site = SiteInput {
        lot_sf: args.lot_sf.unwrap_or(7_500.0),
        zone: Zone::R3,
        height_district: HeightDistrict::Hd1L,
        market_area: MarketArea::Westside,
        tcac_tier: Some(TcacTier::HighResource),
        transit: TransitContext {
            rail_station_ft: Some(900.0),
            bus_corridor_ft: Some(350.0),
            major_stop_ft: Some(args.major_stop_ft.unwrap_or(900.0)),
        },
        very_high_fire_hazard: false,
        coastal_zone: false,
        sea_level_rise: false,
        corridor_adjacent: false,
        conditions: ConditionOverrides::default(),
    };

    let analysis = Analyzer::new(defaults).analyze(&site, AnalysisOptions::default());

    println!(
        "Site: {} SF {} in {} ({})",
        site.lot_sf,
        site.zone.label(),
        site.market_area.label(),
        analysis.options.stage.label()
    );

    println!("\nProgram eligibility");
    for result in &analysis.eligibility.results {
        let status = if result.eligible { "eligible" } else { "ineligible" };
        let detail = result
            .tier
            .as_deref()
            .map(|tier| format!(" (tier {tier})"))
            .or_else(|| result.reason.as_ref().map(|reason| format!(" - {reason}")))
            .unwrap_or_default();
        println!("  {:<22} {status}{detail}", result.program.label());
    }

    println!("\nDevelopment potential");
    for potential in &analysis.potentials {
        println!(
            "  {:<22} {:>3} units ({} affordable), FAR {:.2}, {:.0} ft / {} stories",
            potential.program.label(),
            potential.total_units,
            potential.affordable_units,
            potential.total_far,
            potential.total_height_ft,
            potential.total_stories
        );
    }

    println!(
        "\nPrimary program: {} ({} units)",
        analysis.primary_program.label(),
        analysis.potentials[0].total_units
    );

    println!("\nLand residual by method");
    for result in &analysis.residuals {
        let clamp = if result.rate_clamped { "  [target clamped]" } else { "" };
        println!(
            "  {:<26} ${:>12.0}  (${:.0}/SF){clamp}",
            result.method.label(),
            result.land_value,
            result.implied_land_psf
        );
    }
    println!(
        "Headline value: ${:.0} via {}",
        analysis.selected_residual.land_value,
        analysis.selected_residual.method.label()
    );

    if let Some(hbu) = &analysis.highest_best_use {
        println!(
            "\nHighest and best use: {} stories / {} units ({})",
            hbu.optimal.stories,
            hbu.optimal.units,
            hbu.optimal.construction_type.label()
        );
        if let Some(reasoning) = &hbu.reasoning {
            for line in &reasoning.summary {
                println!("  {line}");
            }
        }
    }

    match (&analysis.seller.guidance, &analysis.seller.warning) {
        (Some(guidance), _) => {
            println!("\nSeller pricing guidance");
            println!(
                "  conservative ${:.0} ({})",
                guidance.conservative, guidance.conservative_source
            );
            println!(
                "  recommended  ${:.0} ({})",
                guidance.recommended, guidance.recommended_source
            );
            println!(
                "  aggressive   ${:.0} ({})",
                guidance.aggressive, guidance.aggressive_source
            );
        }
        (None, Some(warning)) => println!("\n{warning}"),
        (None, None) => {}
    }

    for warning in &analysis.warnings {
        println!("warning: {warning}");
    }

    Ok(())
}

fn parse_income_level(raw: &str) -> Result<IncomeLevel, EngineError> {
    match raw {
        "extremely_low" => Ok(IncomeLevel::ExtremelyLow),
        "very_low" => Ok(IncomeLevel::VeryLow),
        "low" => Ok(IncomeLevel::Low),
        "moderate" => Ok(IncomeLevel::Moderate),
        other => Err(EngineError::UnknownKey {
            field: "income level",
            value: other.to_string(),
        }),
    }
}

fn parse_mix_profile(raw: &str) -> Result<MixProfile, EngineError> {
    match raw {
        "urban" => Ok(MixProfile::Urban),
        "family" => Ok(MixProfile::Family),
        "affordable" => Ok(MixProfile::Affordable),
        "workforce" => Ok(MixProfile::Workforce),
        other => Err(EngineError::UnknownKey {
            field: "mix profile",
            value: other.to_string(),
        }),
    }
}

fn parse_stage(raw: &str) -> Result<EntitlementStage, EngineError> {
    match raw {
        "raw_land" => Ok(EntitlementStage::RawLand),
        "entitled" => Ok(EntitlementStage::Entitled),
        "plan_check" => Ok(EntitlementStage::PlanCheck),
        "ready_to_issue" => Ok(EntitlementStage::ReadyToIssue),
        "permitted" => Ok(EntitlementStage::Permitted),
        other => Err(EngineError::UnknownKey {
            field: "entitlement stage",
            value: other.to_string(),
        }),
    }
}

fn parse_method(raw: &str) -> Result<ResidualMethod, EngineError> {
    match raw {
        "yield_on_cost" => Ok(ResidualMethod::YieldOnCost),
        "development_margin" => Ok(ResidualMethod::DevelopmentMargin),
        "equity_multiple" => Ok(ResidualMethod::EquityMultiple),
        "levered_irr" => Ok(ResidualMethod::LeveredIrr),
        "unlevered_roc" => Ok(ResidualMethod::UnleveredRoc),
        "for_sale" => Ok(ResidualMethod::ForSale),
        other => Err(EngineError::UnknownKey {
            field: "residual method",
            value: other.to_string(),
        }),
    }
}
