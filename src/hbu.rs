//! Highest-and-best-use search: sweep story counts from the practical
//! minimum to the zoning cap, re-running the cost/revenue/residual pipeline
//! at each count, and explain the trade when the winner is shorter than the
//! entitlement allows.

use crate::config::AnalysisDefaults;
use crate::potential::{required_spaces, DevelopmentPotential};
use crate::proforma::{self, ParkingPlan};
use crate::residual::{self, ResidualInputs, ResidualMethod};
use crate::site::SiteInput;
use crate::tables::{construction, market, zones, ConstructionType};
use crate::unitmix::{self, UnitMix};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One candidate building configuration from the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationOption {
    pub stories: u32,
    pub units: u32,
    pub construction_type: ConstructionType,
    pub parking: ParkingPlan,
    pub buildable_sf: f64,
    pub total_dev_cost: f64,
    pub noi: f64,
    pub land_residual: f64,
    pub residual_method: ResidualMethod,
    /// True iff this configuration is built to the zoning limit: story count
    /// at the cap or unit count at the entitlement maximum.
    pub is_maximum: bool,
}

/// Why the optimizer stopped short of the zoning maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffReasoning {
    /// $/SF spread between the maximum's construction type and the
    /// optimal's, zero when both use the same type.
    pub construction_rate_delta_psf: f64,
    /// Construction dollars avoided by staying at the cheaper type.
    pub construction_premium_delta: f64,
    /// Subterranean parking dollars avoided.
    pub subterranean_premium_delta: f64,
    pub units_foregone: u32,
    /// Premium avoided per unit given up; `None` when no units were
    /// foregone.
    pub saved_per_foregone_unit: Option<f64>,
    pub summary: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighestBestUseAnalysis {
    /// All evaluated configurations, best residual first.
    pub options: Vec<ConfigurationOption>,
    pub optimal: ConfigurationOption,
    pub maximum: ConfigurationOption,
    pub building_less_than_max: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<TradeoffReasoning>,
}

/// Sweep story counts and pick the configuration with the highest land
/// residual. Each story count is evaluated independently (the sweep is
/// fanned out across threads) and the ranking is a deterministic sort of
/// the collected results.
pub fn optimize(
    site: &SiteInput,
    potential: &DevelopmentPotential,
    stage: crate::site::EntitlementStage,
    profile: crate::site::MixProfile,
    defaults: &AnalysisDefaults,
) -> Option<HighestBestUseAnalysis> {
    let story_cap = story_cap(potential, defaults);
    let floor = defaults.min_stories.min(story_cap);

    let mut options: Vec<ConfigurationOption> = (floor..=story_cap)
        .collect::<Vec<u32>>()
        .into_par_iter()
        .filter_map(|stories| evaluate_stories(site, potential, stage, profile, stories, defaults))
        .collect();

    if options.is_empty() {
        return None;
    }

    // Descending by residual; ties prefer the shorter (cheaper) building.
    options.sort_by(|a, b| {
        b.land_residual
            .partial_cmp(&a.land_residual)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.stories.cmp(&b.stories))
    });

    let optimal = options[0].clone();
    let maximum = options
        .iter()
        .max_by_key(|option| (option.stories, option.units))
        .cloned()
        .unwrap_or_else(|| optimal.clone());

    let building_less_than_max =
        optimal.stories < maximum.stories || optimal.units < maximum.units;
    let reasoning = if building_less_than_max {
        Some(explain_tradeoff(&optimal, &maximum))
    } else {
        None
    };

    debug!(
        optimal_stories = optimal.stories,
        optimal_units = optimal.units,
        residual = optimal.land_residual,
        less_than_max = building_less_than_max,
        "hbu selection"
    );

    Some(HighestBestUseAnalysis {
        options,
        optimal,
        maximum,
        building_less_than_max,
        reasoning,
    })
}

/// min(zoning stories, height limit / floor-to-floor, hard cap).
fn story_cap(potential: &DevelopmentPotential, defaults: &AnalysisDefaults) -> u32 {
    let by_height = (potential.total_height_ft / defaults.floor_to_floor_ft).floor() as u32;
    potential
        .total_stories
        .min(by_height)
        .min(defaults.max_story_cap)
        .max(1)
}

fn evaluate_stories(
    site: &SiteInput,
    potential: &DevelopmentPotential,
    stage: crate::site::EntitlementStage,
    profile: crate::site::MixProfile,
    stories: u32,
    defaults: &AnalysisDefaults,
) -> Option<ConfigurationOption> {
    let zone = zones::standards(site.zone);
    let submarket = market::submarket(site.market_area);

    let footprint_sf = site.lot_sf * zone.lot_coverage;
    let envelope_sf = (footprint_sf * stories as f64).min(potential.total_far * site.lot_sf);
    let leasable_sf = envelope_sf * defaults.efficiency_ratio;

    // Physical capacity, then the entitlement cap: never exceed the zoning
    // maximum even when the envelope would hold more units.
    let probe_mix = unitmix::generate_mix(potential.total_units.max(1), profile);
    let average_unit_sf = probe_mix.average_unit_sf().max(1.0);
    let physical_units = (leasable_sf / average_unit_sf).floor() as u32;
    let units = physical_units.min(potential.total_units);
    if units == 0 {
        return None;
    }

    let height_ft = stories as f64 * defaults.floor_to_floor_ft;
    let spec = construction::cheapest_for(stories, height_ft)?;

    let mix = unitmix::generate_mix(units, profile);
    let required = required_spaces(units, potential.parking_method, zone.parking_per_unit);
    let parking = proforma::plan_parking(required, footprint_sf, defaults);

    let (residual, costs, noi) =
        configuration_residual(&mix, spec, &parking, submarket, stage, potential, site, defaults);

    Some(ConfigurationOption {
        stories,
        units,
        construction_type: spec.construction_type,
        parking,
        buildable_sf: envelope_sf,
        total_dev_cost: costs,
        noi,
        land_residual: residual.land_value,
        residual_method: residual.method,
        is_maximum: stories == story_cap(potential, defaults) || units == potential.total_units,
    })
}

#[allow(clippy::too_many_arguments)]
fn configuration_residual(
    mix: &UnitMix,
    spec: &construction::ConstructionSpec,
    parking: &ParkingPlan,
    submarket: &market::SubmarketData,
    stage: crate::site::EntitlementStage,
    potential: &DevelopmentPotential,
    site: &SiteInput,
    defaults: &AnalysisDefaults,
) -> (residual::ResidualResult, f64, f64) {
    let costs = proforma::cost_stack(mix, spec, parking, submarket, stage, 1.0, defaults);
    let rents = unitmix::calculate_rents(
        mix,
        potential.affordable_set_aside,
        potential.income_level,
        submarket.rent_psf_month,
    );
    let rental = proforma::rental(&rents, submarket.cap_rate, defaults);
    let sale = proforma::for_sale(mix.sellable_sf(), submarket.sale_psf, defaults);
    let inputs = ResidualInputs::from_proforma(costs.total, &rental, &sale);

    let for_sale = residual::residual(
        ResidualMethod::ForSale,
        &inputs,
        defaults.profit_margin,
        site.lot_sf,
        defaults,
    );
    let rental_yoc = residual::residual(
        ResidualMethod::YieldOnCost,
        &inputs,
        defaults.target_yoc,
        site.lot_sf,
        defaults,
    );

    (
        residual::resolve_hbu(for_sale, rental_yoc),
        costs.total,
        rental.noi,
    )
}

/// Build the reasoning for an optimal configuration that stops short of the
/// zoning maximum. This narrative is part of the contract, not decoration:
/// it quantifies the construction-type and subterranean-parking cliffs the
/// shorter building avoids.
pub fn explain_tradeoff(
    optimal: &ConfigurationOption,
    maximum: &ConfigurationOption,
) -> TradeoffReasoning {
    let optimal_rate =
        construction::spec(optimal.construction_type).blended_residential_rate(0.18);
    let maximum_rate =
        construction::spec(maximum.construction_type).blended_residential_rate(0.18);
    let construction_rate_delta_psf = (maximum_rate - optimal_rate).max(0.0);
    let construction_premium_delta = if optimal.construction_type == maximum.construction_type {
        0.0
    } else {
        construction_rate_delta_psf * maximum.buildable_sf
    };

    let subterranean_premium_delta =
        (maximum.parking.subterranean_cost - optimal.parking.subterranean_cost).max(0.0);
    let units_foregone = maximum.units.saturating_sub(optimal.units);
    let premium_avoided = construction_premium_delta + subterranean_premium_delta;
    let saved_per_foregone_unit = if units_foregone > 0 {
        Some(premium_avoided / units_foregone as f64)
    } else {
        None
    };

    let mut summary = Vec::new();
    summary.push(format!(
        "{} stories beats the {}-story zoning maximum on land residual",
        optimal.stories, maximum.stories
    ));
    if construction_premium_delta > 0.0 {
        summary.push(format!(
            "avoids stepping up from {} to {} (${:.0}/SF premium, ${:.0} total)",
            optimal.construction_type.label(),
            maximum.construction_type.label(),
            construction_rate_delta_psf,
            construction_premium_delta
        ));
    }
    if subterranean_premium_delta > 0.0 {
        summary.push(format!(
            "avoids {} subterranean space(s) worth ${:.0} in excavation premium",
            maximum.parking.subterranean.saturating_sub(optimal.parking.subterranean),
            subterranean_premium_delta
        ));
    }
    if let Some(saved) = saved_per_foregone_unit {
        summary.push(format!(
            "gives up {units_foregone} unit(s), saving ${saved:.0} per foregone unit"
        ));
    }

    TradeoffReasoning {
        construction_rate_delta_psf,
        construction_premium_delta,
        subterranean_premium_delta,
        units_foregone,
        saved_per_foregone_unit,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(stories: u32, units: u32, sub_spaces: u32, sub_cost: f64) -> ConfigurationOption {
        ConfigurationOption {
            stories,
            units,
            construction_type: ConstructionType::TypeIiiA,
            parking: ParkingPlan {
                required: sub_spaces,
                above_grade: 0,
                subterranean: sub_spaces,
                subterranean_levels: u32::from(sub_spaces > 0),
                above_grade_cost: 0.0,
                subterranean_cost: sub_cost,
            },
            buildable_sf: 30_000.0,
            total_dev_cost: 20_000_000.0,
            noi: 1_000_000.0,
            land_residual: 2_000_000.0,
            residual_method: ResidualMethod::YieldOnCost,
            is_maximum: false,
        }
    }

    #[test]
    fn parking_only_cliff_divides_premium_by_foregone_units() {
        // Six stories with no digging against a seven-story maximum that
        // needs 20 spaces underground for 3 more units.
        let optimal = option(6, 42, 0, 0.0);
        let maximum = option(7, 45, 20, 1_500_000.0);
        let reasoning = explain_tradeoff(&optimal, &maximum);
        assert_eq!(reasoning.construction_premium_delta, 0.0);
        assert_eq!(reasoning.subterranean_premium_delta, 1_500_000.0);
        assert_eq!(reasoning.units_foregone, 3);
        assert_eq!(reasoning.saved_per_foregone_unit, Some(500_000.0));
        assert!(reasoning
            .summary
            .iter()
            .any(|line| line.contains("per foregone unit")));
    }

    #[test]
    fn construction_cliff_is_priced_from_rate_delta() {
        let optimal = option(5, 40, 0, 0.0);
        let mut maximum = option(8, 48, 0, 0.0);
        maximum.construction_type = ConstructionType::TypeIB;
        let reasoning = explain_tradeoff(&optimal, &maximum);
        assert!(reasoning.construction_rate_delta_psf > 0.0);
        assert!(reasoning.construction_premium_delta > 0.0);
    }
}
