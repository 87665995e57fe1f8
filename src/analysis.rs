//! Top-level orchestration: eligibility, per-program envelopes, the residual
//! table, the HBU sweep, and seller scenarios, assembled into one report
//! envelope.

use crate::config::AnalysisDefaults;
use crate::eligibility::{self, SiteEligibility};
use crate::hbu::{self, HighestBestUseAnalysis};
use crate::potential::{self, DevelopmentPotential};
use crate::proforma::{self, plan_parking};
use crate::residual::{self, ResidualInputs, ResidualMethod, ResidualResult};
use crate::scenarios::{self, SellerAnalysis};
use crate::site::{EntitlementStage, IncomeLevel, MixProfile, Program, SiteInput};
use crate::tables::{construction, market, zones};
use crate::unitmix;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Knobs for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub income_level: IncomeLevel,
    pub mix_profile: MixProfile,
    pub stage: EntitlementStage,
    /// Force the headline land value onto one method instead of letting the
    /// for-sale/rental comparison decide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_method: Option<ResidualMethod>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            income_level: IncomeLevel::VeryLow,
            mix_profile: MixProfile::Urban,
            stage: EntitlementStage::RawLand,
            residual_method: None,
        }
    }
}

/// Complete analysis of one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAnalysis {
    pub generated_at: DateTime<Utc>,
    pub site: SiteInput,
    pub options: AnalysisOptions,
    pub eligibility: SiteEligibility,
    /// Envelope per eligible program, strongest unit count first.
    pub potentials: Vec<DevelopmentPotential>,
    pub primary_program: Program,
    /// All six residual methods run against the primary envelope at their
    /// default targets.
    pub residuals: Vec<ResidualResult>,
    /// The headline land value: the forced method when one was requested,
    /// otherwise the better of for-sale and rental yield-on-cost.
    pub selected_residual: ResidualResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_best_use: Option<HighestBestUseAnalysis>,
    pub seller: SellerAnalysis,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub struct Analyzer {
    defaults: AnalysisDefaults,
}

impl Analyzer {
    pub fn new(defaults: AnalysisDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &AnalysisDefaults {
        &self.defaults
    }

    /// Run the full pipeline. Ineligible programs and exclusion overlays are
    /// findings carried in the result, never failures.
    pub fn analyze(&self, site: &SiteInput, options: AnalysisOptions) -> SiteAnalysis {
        let defaults = &self.defaults;
        let eligibility = eligibility::evaluate(site);

        let mut warnings = Vec::new();
        if let Some(reason) = site.exclusion_reason() {
            warnings.push(format!(
                "site is {reason}; incentive programs are unavailable"
            ));
        }

        let mut potentials: Vec<DevelopmentPotential> = eligibility
            .eligible_programs()
            .map(|result| {
                potential::calculate(
                    site,
                    result.program,
                    result.tier.as_deref(),
                    options.income_level,
                    defaults,
                )
            })
            .collect();
        potentials.sort_by(|a, b| {
            b.total_units
                .cmp(&a.total_units)
                .then_with(|| a.program.cmp(&b.program))
        });

        // By-Right is always eligible, so the list is never empty.
        let primary = potentials[0].clone();
        let primary_program = primary.program;

        let (residuals, selected_residual) =
            self.residual_table(site, &primary, options);

        let highest_best_use =
            hbu::optimize(site, &primary, options.stage, options.mix_profile, defaults);
        let seller =
            scenarios::analyze(site, &primary, options.stage, options.mix_profile, defaults);

        if let Some(warning) = &seller.warning {
            warnings.push(warning.clone());
        }
        if selected_residual.rate_clamped {
            warnings.push(format!(
                "{} target was clamped to the configured floor",
                selected_residual.method.label()
            ));
        }

        info!(
            program = primary_program.label(),
            units = primary.total_units,
            land_value = selected_residual.land_value,
            method = selected_residual.method.label(),
            "site analysis complete"
        );

        SiteAnalysis {
            generated_at: Utc::now(),
            site: site.clone(),
            options,
            eligibility,
            potentials,
            primary_program,
            residuals,
            selected_residual,
            highest_best_use,
            seller,
            warnings,
        }
    }

    /// Build the primary envelope's pro-forma once and run every residual
    /// method against it.
    fn residual_table(
        &self,
        site: &SiteInput,
        primary: &DevelopmentPotential,
        options: AnalysisOptions,
    ) -> (Vec<ResidualResult>, ResidualResult) {
        let defaults = &self.defaults;
        let zone = zones::standards(site.zone);
        let submarket = market::submarket(site.market_area);

        let units = primary.total_units.max(1);
        let mix = unitmix::generate_mix(units, options.mix_profile);
        let stories = primary.total_stories.max(1);
        let height_ft = stories as f64 * defaults.floor_to_floor_ft;
        let spec = construction::cheapest_for(stories, height_ft)
            .unwrap_or_else(|| construction::spec(crate::tables::ConstructionType::TypeIA));

        let footprint_sf = site.lot_sf * zone.lot_coverage;
        let required = potential::required_spaces(
            units,
            primary.parking_method,
            zone.parking_per_unit,
        );
        let parking = plan_parking(required, footprint_sf, defaults);

        let costs = proforma::cost_stack(
            &mix,
            spec,
            &parking,
            submarket,
            options.stage,
            1.0,
            defaults,
        );
        let rents = unitmix::calculate_rents(
            &mix,
            primary.affordable_set_aside,
            primary.income_level,
            submarket.rent_psf_month,
        );
        let rental = proforma::rental(&rents, submarket.cap_rate, defaults);
        let sale = proforma::for_sale(mix.sellable_sf(), submarket.sale_psf, defaults);
        let inputs = ResidualInputs::from_proforma(costs.total, &rental, &sale);

        let residuals: Vec<ResidualResult> = ResidualMethod::ordered()
            .into_iter()
            .map(|method| {
                residual::residual(
                    method,
                    &inputs,
                    default_target(method, defaults),
                    site.lot_sf,
                    defaults,
                )
            })
            .collect();

        let pick = |method: ResidualMethod| {
            residuals
                .iter()
                .find(|result| result.method == method)
                .copied()
                .unwrap_or(residuals[0])
        };
        let selected = match options.residual_method {
            Some(method) => pick(method),
            None => residual::resolve_hbu(
                pick(ResidualMethod::ForSale),
                pick(ResidualMethod::YieldOnCost),
            ),
        };

        (residuals, selected)
    }
}

/// Default underwriting target per method, from configuration.
pub fn default_target(method: ResidualMethod, defaults: &AnalysisDefaults) -> f64 {
    match method {
        ResidualMethod::YieldOnCost => defaults.target_yoc,
        ResidualMethod::DevelopmentMargin => defaults.target_margin,
        ResidualMethod::EquityMultiple => defaults.target_equity_multiple,
        ResidualMethod::LeveredIrr => defaults.target_irr,
        ResidualMethod::UnleveredRoc => defaults.target_roc,
        ResidualMethod::ForSale => defaults.profit_margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{
        ConditionOverrides, HeightDistrict, MarketArea, TcacTier, TransitContext, Zone,
    };

    fn hollywood_site() -> SiteInput {
        SiteInput {
            lot_sf: 7_500.0,
            zone: Zone::R3,
            height_district: HeightDistrict::Hd1L,
            market_area: MarketArea::Hollywood,
            tcac_tier: Some(TcacTier::HighResource),
            transit: TransitContext {
                rail_station_ft: Some(900.0),
                bus_corridor_ft: Some(300.0),
                major_stop_ft: Some(900.0),
            },
            very_high_fire_hazard: false,
            coastal_zone: false,
            sea_level_rise: false,
            corridor_adjacent: false,
            conditions: ConditionOverrides::default(),
        }
    }

    #[test]
    fn primary_program_carries_the_most_units() {
        let analyzer = Analyzer::new(AnalysisDefaults::default());
        let analysis = analyzer.analyze(&hollywood_site(), AnalysisOptions::default());
        let best = analysis
            .potentials
            .iter()
            .map(|p| p.total_units)
            .max()
            .unwrap();
        assert_eq!(
            analysis
                .potentials
                .iter()
                .find(|p| p.program == analysis.primary_program)
                .unwrap()
                .total_units,
            best
        );
    }

    #[test]
    fn residual_table_covers_every_method() {
        let analyzer = Analyzer::new(AnalysisDefaults::default());
        let analysis = analyzer.analyze(&hollywood_site(), AnalysisOptions::default());
        assert_eq!(analysis.residuals.len(), ResidualMethod::ordered().len());
        for result in &analysis.residuals {
            assert!(result.land_value.is_finite());
        }
    }

    #[test]
    fn method_override_pins_the_headline_value() {
        let analyzer = Analyzer::new(AnalysisDefaults::default());
        let options = AnalysisOptions {
            residual_method: Some(ResidualMethod::DevelopmentMargin),
            ..AnalysisOptions::default()
        };
        let analysis = analyzer.analyze(&hollywood_site(), options);
        assert_eq!(
            analysis.selected_residual.method,
            ResidualMethod::DevelopmentMargin
        );
    }

    #[test]
    fn exclusion_overlay_surfaces_as_warning_not_failure() {
        let analyzer = Analyzer::new(AnalysisDefaults::default());
        let mut site = hollywood_site();
        site.coastal_zone = true;
        let analysis = analyzer.analyze(&site, AnalysisOptions::default());
        assert!(analysis
            .warnings
            .iter()
            .any(|warning| warning.contains("Coastal")));
        // By-Right and the state statute still produce envelopes.
        assert!(analysis.potentials.len() >= 2);
    }
}
