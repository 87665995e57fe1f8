use super::ProgramEligibilityResult;
use crate::site::{Program, SiteInput, TcacTier, HALF_MILE_FT};
use crate::tables::programs;

pub(crate) fn check_by_right(site: &SiteInput) -> ProgramEligibilityResult {
    let mut result = ProgramEligibilityResult::qualified(Program::ByRight);
    if site.conditions.t_condition {
        result = result.with_note(
            "T classification: required public improvements outstanding".to_string(),
        );
    }
    if let Some(q) = &site.conditions.q_condition {
        result = result.with_note(format!("Q condition applies: {q}"));
    }
    result
}

pub(crate) fn check_state_density_bonus(site: &SiteInput) -> ProgramEligibilityResult {
    // The state statute preempts local exclusion overlays; the check never
    // fails structurally for a residential zone in the table.
    let mut result = ProgramEligibilityResult::qualified(Program::StateDensityBonus);
    match site.transit.major_stop_within(HALF_MILE_FT) {
        Some(true) => {
            result = result.with_note(
                "within half-mile of major transit stop: FAR/height waivers and AB 2097 parking elimination available".to_string(),
            );
        }
        Some(false) => {
            result = result
                .with_note("beyond half-mile of major transit: density bonus only, no FAR/height waiver".to_string());
        }
        None => {
            result = result.with_note(
                "major transit stop distance not provided; FAR/height waivers assumed unavailable"
                    .to_string(),
            );
        }
    }
    result
}

pub(crate) fn check_miip_transit(site: &SiteInput) -> ProgramEligibilityResult {
    if let Some(reason) = site.exclusion_reason() {
        return ProgramEligibilityResult::ineligible(Program::MiipTransit, reason);
    }
    let Some(distance) = site.transit.major_stop_ft else {
        return ProgramEligibilityResult::ineligible(
            Program::MiipTransit,
            "major transit stop distance not provided",
        );
    };
    match programs::transit_tier_for(distance) {
        Some(tier) => ProgramEligibilityResult::qualified(Program::MiipTransit)
            .with_tier(tier.key)
            .with_note(format!(
                "{}: {:.0}% density bonus for {:.0}% {} set-aside",
                tier.label,
                tier.density_bonus * 100.0,
                tier.set_aside * 100.0,
                tier.income_level.label()
            )),
        None => ProgramEligibilityResult::ineligible(
            Program::MiipTransit,
            format!("nearest major transit stop is {distance:.0} ft away, beyond the half-mile tier"),
        ),
    }
}

pub(crate) fn check_miip_opportunity(site: &SiteInput) -> ProgramEligibilityResult {
    if let Some(reason) = site.exclusion_reason() {
        return ProgramEligibilityResult::ineligible(Program::MiipOpportunity, reason);
    }
    let Some(tcac) = site.tcac_tier else {
        return ProgramEligibilityResult::ineligible(
            Program::MiipOpportunity,
            "TCAC opportunity-area tier not provided",
        );
    };
    match programs::opportunity_tier_for(tcac) {
        Some(tier) => ProgramEligibilityResult::qualified(Program::MiipOpportunity)
            .with_tier(tier.key)
            .with_note(tier.label.to_string()),
        None => ProgramEligibilityResult::ineligible(
            Program::MiipOpportunity,
            format!(
                "{} designation does not qualify; Highest or High Resource required",
                tcac.label()
            ),
        ),
    }
}

pub(crate) fn check_miip_corridor(site: &SiteInput) -> ProgramEligibilityResult {
    if let Some(reason) = site.exclusion_reason() {
        return ProgramEligibilityResult::ineligible(Program::MiipCorridor, reason);
    }
    if !site.corridor_adjacent {
        return ProgramEligibilityResult::ineligible(
            Program::MiipCorridor,
            "parcel does not front a designated commercial corridor",
        );
    }
    let tier = programs::corridor_tier();
    ProgramEligibilityResult::qualified(Program::MiipCorridor)
        .with_tier(tier.key)
        .with_note(tier.label.to_string())
}

pub(crate) fn check_ahip(site: &SiteInput) -> ProgramEligibilityResult {
    if let Some(reason) = site.exclusion_reason() {
        return ProgramEligibilityResult::ineligible(Program::Ahip, reason);
    }
    ProgramEligibilityResult::qualified(Program::Ahip).with_note(
        "100% affordable (less one manager unit) qualifies for streamlined ministerial approval"
            .to_string(),
    )
}

pub(crate) fn check_sb79(site: &SiteInput) -> ProgramEligibilityResult {
    if let Some(reason) = site.exclusion_reason() {
        return ProgramEligibilityResult::ineligible(Program::Sb79, reason);
    }
    let Some(distance) = site.transit.major_stop_ft else {
        return ProgramEligibilityResult::ineligible(
            Program::Sb79,
            "major transit stop distance not provided",
        );
    };
    match programs::sb79_tier_for(distance) {
        Some(tier) => ProgramEligibilityResult::qualified(Program::Sb79)
            .with_tier(tier.key)
            .with_note(format!(
                "{}: up to {:.0} units/acre, {:.0} ft",
                tier.label, tier.units_per_acre, tier.height_ft
            )),
        None => ProgramEligibilityResult::ineligible(
            Program::Sb79,
            format!("nearest major transit stop is {distance:.0} ft away, beyond the half-mile tier"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{ConditionOverrides, HeightDistrict, MarketArea, TransitContext, Zone};

    fn site_at(major_stop_ft: Option<f64>) -> SiteInput {
        SiteInput {
            lot_sf: 10_000.0,
            zone: Zone::R4,
            height_district: HeightDistrict::Hd1,
            market_area: MarketArea::Downtown,
            tcac_tier: None,
            transit: TransitContext {
                rail_station_ft: None,
                bus_corridor_ft: None,
                major_stop_ft,
            },
            very_high_fire_hazard: false,
            coastal_zone: false,
            sea_level_rise: false,
            corridor_adjacent: false,
            conditions: ConditionOverrides::default(),
        }
    }

    #[test]
    fn missing_tcac_tier_degrades_opportunity_check() {
        let result = check_miip_opportunity(&site_at(Some(500.0)));
        assert!(!result.eligible);
        assert!(result.reason.as_deref().unwrap().contains("TCAC"));
    }

    #[test]
    fn moderate_resource_area_fails_opportunity_check() {
        let mut site = site_at(Some(500.0));
        site.tcac_tier = Some(TcacTier::ModerateResource);
        let result = check_miip_opportunity(&site);
        assert!(!result.eligible);
    }

    #[test]
    fn fire_hazard_blocks_sb79() {
        let mut site = site_at(Some(500.0));
        site.very_high_fire_hazard = true;
        let result = check_sb79(&site);
        assert!(!result.eligible);
        assert!(result.reason.as_deref().unwrap().contains("Fire Hazard"));
    }

    #[test]
    fn transit_check_reports_tier_key() {
        let result = check_miip_transit(&site_at(Some(600.0)));
        assert!(result.eligible);
        assert_eq!(result.tier.as_deref(), Some("T1"));
    }
}
