//! Seller-side sensitivity analysis: re-run the residual pipeline across a
//! matrix of buyer profiles and construction-cost stances, then distill the
//! viable rows into three-tier pricing guidance.

use crate::config::AnalysisDefaults;
use crate::potential::DevelopmentPotential;
use crate::proforma;
use crate::residual::{self, ResidualInputs, ResidualMethod};
use crate::site::{EntitlementStage, MixProfile, SiteInput};
use crate::tables::{construction, market, zones, CostTier};
use crate::unitmix;
use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

/// Named buyer return targets, institutional through value-buyer.
const YOC_PROFILES: &[(&str, f64)] = &[
    ("Institutional", 0.0475),
    ("Core-Plus", 0.0500),
    ("Value-Add", 0.0525),
    ("Opportunistic", 0.0550),
    ("Value Buyer", 0.0575),
];

/// Development-margin targets, low-risk through speculative.
const MARGIN_PROFILES: &[(&str, f64)] = &[
    ("Low-Risk", 0.12),
    ("Balanced", 0.15),
    ("Standard", 0.18),
    ("Aggressive", 0.22),
    ("Speculative", 0.25),
];

/// One row of a sensitivity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub label: String,
    pub method: ResidualMethod,
    /// The varied assumption: a YOC target, margin target, or cost
    /// multiplier depending on the table.
    pub assumption: f64,
    pub land_value: f64,
    pub land_psf: f64,
    pub viable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingGuidance {
    pub aggressive: f64,
    pub recommended: f64,
    pub conservative: f64,
    pub aggressive_source: String,
    pub recommended_source: String,
    pub conservative_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerAnalysis {
    pub generated_on: NaiveDate,
    /// YOC table: buyer holds the stabilized asset.
    pub build_hold: Vec<ScenarioResult>,
    /// Margin table: buyer builds and exits.
    pub build_sell: Vec<ScenarioResult>,
    /// Construction-cost tiers with the residual method held at YOC.
    pub cost_sensitivity: Vec<ScenarioResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<PricingGuidance>,
    /// Set when no scenario is viable: the absence of a good price is a
    /// finding, never a zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Run the full matrix for one site/program envelope.
pub fn analyze(
    site: &SiteInput,
    potential: &DevelopmentPotential,
    stage: EntitlementStage,
    profile: MixProfile,
    defaults: &AnalysisDefaults,
) -> SellerAnalysis {
    let zone = zones::standards(site.zone);
    let submarket = market::submarket(site.market_area);

    let units = potential.total_units.max(1);
    let mix = unitmix::generate_mix(units, profile);
    let stories = potential.total_stories.max(1);
    let height_ft = stories as f64 * defaults.floor_to_floor_ft;
    let spec = construction::cheapest_for(stories, height_ft)
        .unwrap_or_else(|| construction::spec(crate::tables::ConstructionType::TypeIA));

    let footprint_sf = site.lot_sf * zone.lot_coverage;
    let required = crate::potential::required_spaces(
        units,
        potential.parking_method,
        zone.parking_per_unit,
    );
    let parking = proforma::plan_parking(required, footprint_sf, defaults);

    let rents = unitmix::calculate_rents(
        &mix,
        potential.affordable_set_aside,
        potential.income_level,
        submarket.rent_psf_month,
    );
    let rental = proforma::rental(&rents, submarket.cap_rate, defaults);
    let sale = proforma::for_sale(mix.sellable_sf(), submarket.sale_psf, defaults);

    let base_costs =
        proforma::cost_stack(&mix, spec, &parking, submarket, stage, 1.0, defaults);
    let base_inputs = ResidualInputs::from_proforma(base_costs.total, &rental, &sale);

    let build_hold: Vec<ScenarioResult> = YOC_PROFILES
        .iter()
        .map(|&(label, target)| {
            row(
                label,
                ResidualMethod::YieldOnCost,
                target,
                &base_inputs,
                site.lot_sf,
                defaults,
            )
        })
        .collect();

    let build_sell: Vec<ScenarioResult> = MARGIN_PROFILES
        .iter()
        .map(|&(label, target)| {
            row(
                label,
                ResidualMethod::DevelopmentMargin,
                target,
                &base_inputs,
                site.lot_sf,
                defaults,
            )
        })
        .collect();

    // Cost tiers rebuild the whole stack, so fan those out. Indexed collect
    // keeps the tier order.
    let cost_sensitivity: Vec<ScenarioResult> = CostTier::ordered()
        .into_par_iter()
        .map(|tier| {
            let costs = proforma::cost_stack(
                &mix,
                spec,
                &parking,
                submarket,
                stage,
                tier.hard_cost_multiplier(),
                defaults,
            );
            let inputs = ResidualInputs::from_proforma(costs.total, &rental, &sale);
            let result = row(
                tier.label(),
                ResidualMethod::YieldOnCost,
                defaults.target_yoc,
                &inputs,
                site.lot_sf,
                defaults,
            );
            ScenarioResult {
                assumption: tier.hard_cost_multiplier(),
                ..result
            }
        })
        .collect();

    let (guidance, warning) = derive_guidance(&build_hold, &build_sell);

    debug!(
        viable = build_hold
            .iter()
            .chain(&build_sell)
            .filter(|r| r.viable)
            .count(),
        has_guidance = guidance.is_some(),
        "seller scenario matrix"
    );

    SellerAnalysis {
        generated_on: Local::now().date_naive(),
        build_hold,
        build_sell,
        cost_sensitivity,
        guidance,
        warning,
    }
}

fn row(
    label: &str,
    method: ResidualMethod,
    target: f64,
    inputs: &ResidualInputs,
    lot_sf: f64,
    defaults: &AnalysisDefaults,
) -> ScenarioResult {
    let result = residual::residual(method, inputs, target, lot_sf, defaults);
    ScenarioResult {
        label: label.to_string(),
        method,
        assumption: target,
        land_value: result.land_value,
        land_psf: result.implied_land_psf,
        viable: result.land_value > 0.0,
    }
}

/// Aggressive takes the highest viable value across both buyer tables,
/// conservative the lowest, recommended the sorted median. With zero viable
/// rows the guidance is withheld and an explicit warning carried instead.
fn derive_guidance(
    build_hold: &[ScenarioResult],
    build_sell: &[ScenarioResult],
) -> (Option<PricingGuidance>, Option<String>) {
    let mut viable: Vec<&ScenarioResult> = build_hold
        .iter()
        .chain(build_sell)
        .filter(|result| result.viable)
        .collect();

    if viable.is_empty() {
        return (
            None,
            Some(
                "No buyer profile produces a positive land residual at current \
                 assumptions; the site does not support a development price."
                    .to_string(),
            ),
        );
    }

    viable.sort_by(|a, b| {
        a.land_value
            .partial_cmp(&b.land_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let low = viable[0];
    let high = viable[viable.len() - 1];
    let median = viable[viable.len() / 2];

    (
        Some(PricingGuidance {
            aggressive: high.land_value,
            recommended: median.land_value,
            conservative: low.land_value,
            aggressive_source: high.label.clone(),
            recommended_source: median.label.clone(),
            conservative_source: low.label.clone(),
        }),
        None,
    )
}

impl SellerAnalysis {
    /// Export all three tables as CSV for spreadsheet-bound stakeholders.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(["table", "label", "assumption", "land_value", "land_psf", "viable"])?;
        for (table, rows) in [
            ("build_hold", &self.build_hold),
            ("build_sell", &self.build_sell),
            ("cost_sensitivity", &self.cost_sensitivity),
        ] {
            for row in rows {
                let assumption = format!("{:.4}", row.assumption);
                let land_value = format!("{:.0}", row.land_value);
                let land_psf = format!("{:.2}", row.land_psf);
                out.write_record([
                    table,
                    row.label.as_str(),
                    assumption.as_str(),
                    land_value.as_str(),
                    land_psf.as_str(),
                    if row.viable { "true" } else { "false" },
                ])?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(label: &str, land_value: f64) -> ScenarioResult {
        ScenarioResult {
            label: label.to_string(),
            method: ResidualMethod::YieldOnCost,
            assumption: 0.05,
            land_value,
            land_psf: land_value / 7_500.0,
            viable: land_value > 0.0,
        }
    }

    #[test]
    fn guidance_spans_viable_range() {
        let hold = vec![
            scenario("Institutional", 3_000_000.0),
            scenario("Value Buyer", 1_000_000.0),
        ];
        let sell = vec![scenario("Balanced", 2_000_000.0), scenario("Speculative", -500_000.0)];
        let (guidance, warning) = derive_guidance(&hold, &sell);
        let guidance = guidance.expect("viable rows produce guidance");
        assert!(warning.is_none());
        assert_eq!(guidance.aggressive, 3_000_000.0);
        assert_eq!(guidance.conservative, 1_000_000.0);
        assert_eq!(guidance.recommended, 2_000_000.0);
        assert_eq!(guidance.aggressive_source, "Institutional");
    }

    #[test]
    fn no_viable_rows_yield_warning_not_zero() {
        let hold = vec![scenario("Institutional", -1.0)];
        let sell = vec![scenario("Balanced", -2.0)];
        let (guidance, warning) = derive_guidance(&hold, &sell);
        assert!(guidance.is_none());
        assert!(warning.unwrap().contains("No buyer profile"));
    }
}
