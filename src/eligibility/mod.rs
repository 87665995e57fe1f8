mod checks;

use crate::site::{Program, SiteInput};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of one program check. Ineligibility is a first-class result, never
/// an error: the reason is always carried for the caller to surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramEligibilityResult {
    pub program: Program,
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Resolved tier key (e.g. a MIIP transit tier) when the program has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ProgramEligibilityResult {
    pub(crate) fn qualified(program: Program) -> Self {
        Self {
            program,
            eligible: true,
            reason: None,
            tier: None,
            notes: Vec::new(),
        }
    }

    pub(crate) fn ineligible(program: Program, reason: impl Into<String>) -> Self {
        Self {
            program,
            eligible: false,
            reason: Some(reason.into()),
            tier: None,
            notes: Vec::new(),
        }
    }

    pub(crate) fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    pub(crate) fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Eligibility determinations for every program, in `Program::ordered()`
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteEligibility {
    pub results: Vec<ProgramEligibilityResult>,
}

impl SiteEligibility {
    pub fn result_for(&self, program: Program) -> Option<&ProgramEligibilityResult> {
        self.results.iter().find(|result| result.program == program)
    }

    pub fn eligible_programs(&self) -> impl Iterator<Item = &ProgramEligibilityResult> {
        self.results.iter().filter(|result| result.eligible)
    }
}

/// Run every program check independently. A missing optional field degrades
/// only the programs that need it; nothing here raises.
pub fn evaluate(site: &SiteInput) -> SiteEligibility {
    let by_right = checks::check_by_right(site);
    let state_db = checks::check_state_density_bonus(site);
    let mut transit = checks::check_miip_transit(site);
    let mut opportunity = checks::check_miip_opportunity(site);
    let mut corridor = checks::check_miip_corridor(site);
    let ahip = checks::check_ahip(site);
    let sb79 = checks::check_sb79(site);

    // MIIP tiers stack in priority order: Transit incentives are
    // categorically larger than Opportunity, which outranks Corridor.
    if transit.eligible {
        if opportunity.eligible {
            opportunity = ProgramEligibilityResult::ineligible(
                Program::MiipOpportunity,
                "superseded by MIIP Transit, which takes priority",
            );
        }
        if corridor.eligible {
            corridor = ProgramEligibilityResult::ineligible(
                Program::MiipCorridor,
                "superseded by MIIP Transit, which takes priority",
            );
        }
    } else if opportunity.eligible && corridor.eligible {
        corridor = ProgramEligibilityResult::ineligible(
            Program::MiipCorridor,
            "superseded by MIIP Opportunity, which takes priority",
        );
    }

    if !transit.eligible && site.transit.major_stop_ft.is_some() {
        // Keep the losing distance visible for the audit trail.
        if let Some(ft) = site.transit.major_stop_ft {
            transit = transit.with_note(format!("nearest major transit stop {ft:.0} ft away"));
        }
    }

    let results = vec![by_right, state_db, transit, opportunity, corridor, ahip, sb79];
    for result in &results {
        debug!(
            program = result.program.label(),
            eligible = result.eligible,
            tier = result.tier.as_deref().unwrap_or("-"),
            reason = result.reason.as_deref().unwrap_or("-"),
            "program eligibility"
        );
    }

    SiteEligibility { results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{
        ConditionOverrides, HeightDistrict, MarketArea, TcacTier, TransitContext, Zone,
    };

    fn base_site() -> SiteInput {
        SiteInput {
            lot_sf: 7_500.0,
            zone: Zone::R3,
            height_district: HeightDistrict::Hd1L,
            market_area: MarketArea::Hollywood,
            tcac_tier: Some(TcacTier::HighestResource),
            transit: TransitContext {
                rail_station_ft: Some(900.0),
                bus_corridor_ft: Some(300.0),
                major_stop_ft: Some(900.0),
            },
            very_high_fire_hazard: false,
            coastal_zone: false,
            sea_level_rise: false,
            corridor_adjacent: true,
            conditions: ConditionOverrides::default(),
        }
    }

    #[test]
    fn transit_outranks_opportunity_and_corridor() {
        let eligibility = evaluate(&base_site());
        assert!(eligibility
            .result_for(Program::MiipTransit)
            .map(|r| r.eligible)
            .unwrap_or(false));
        let opportunity = eligibility.result_for(Program::MiipOpportunity).unwrap();
        assert!(!opportunity.eligible);
        assert!(opportunity
            .reason
            .as_deref()
            .unwrap()
            .contains("Transit"));
        assert!(!eligibility.result_for(Program::MiipCorridor).unwrap().eligible);
    }

    #[test]
    fn opportunity_outranks_corridor_when_transit_misses() {
        let mut site = base_site();
        site.transit.major_stop_ft = Some(4_000.0);
        let eligibility = evaluate(&site);
        assert!(!eligibility.result_for(Program::MiipTransit).unwrap().eligible);
        assert!(eligibility.result_for(Program::MiipOpportunity).unwrap().eligible);
        let corridor = eligibility.result_for(Program::MiipCorridor).unwrap();
        assert!(!corridor.eligible);
        assert!(corridor.reason.as_deref().unwrap().contains("Opportunity"));
    }

    #[test]
    fn missing_transit_distance_degrades_only_transit_programs() {
        let mut site = base_site();
        site.transit.major_stop_ft = None;
        let eligibility = evaluate(&site);

        let transit = eligibility.result_for(Program::MiipTransit).unwrap();
        assert!(!transit.eligible);
        assert!(transit.reason.as_deref().unwrap().contains("distance"));

        let sb79 = eligibility.result_for(Program::Sb79).unwrap();
        assert!(!sb79.eligible);

        assert!(eligibility.result_for(Program::ByRight).unwrap().eligible);
        assert!(eligibility
            .result_for(Program::StateDensityBonus)
            .unwrap()
            .eligible);
        assert!(eligibility.result_for(Program::MiipOpportunity).unwrap().eligible);
    }

    #[test]
    fn coastal_zone_disqualifies_incentive_programs() {
        let mut site = base_site();
        site.coastal_zone = true;
        let eligibility = evaluate(&site);

        for program in [
            Program::MiipTransit,
            Program::MiipOpportunity,
            Program::MiipCorridor,
            Program::Ahip,
            Program::Sb79,
        ] {
            let result = eligibility.result_for(program).unwrap();
            assert!(!result.eligible, "{:?} should be excluded", program);
            assert!(result.reason.as_deref().unwrap().contains("Coastal"));
        }

        // The state statute applies regardless of local exclusion overlays.
        assert!(eligibility
            .result_for(Program::StateDensityBonus)
            .unwrap()
            .eligible);
    }
}
