mod amenities;
mod density;
mod parking;

pub use parking::{required_spaces, ParkingMethod};

use crate::config::AnalysisDefaults;
use crate::site::{IncomeLevel, Program, SiteInput};
use crate::tables::zones;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Audit trail for the density calculation: which rounding regime was used
/// and the literal formula applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityExplanation {
    pub method: String,
    pub formula: String,
}

/// Computed development envelope for one program. Recomputed whenever inputs
/// or the target income level change; never mutated once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentPotential {
    pub program: Program,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    pub base_units: u32,
    pub bonus_units: u32,
    pub total_units: u32,
    pub base_far: f64,
    pub bonus_far: f64,
    pub total_far: f64,
    pub base_height_ft: f64,
    pub bonus_height_ft: f64,
    pub total_height_ft: f64,
    pub base_stories: u32,
    pub bonus_stories: u32,
    pub total_stories: u32,
    pub parking_method: ParkingMethod,
    pub parking_spaces: u32,
    pub affordable_set_aside: f64,
    pub affordable_units: u32,
    pub income_level: IncomeLevel,
    pub open_space_sf: f64,
    pub bicycle_long_term: u32,
    pub bicycle_short_term: u32,
    pub incentives: Vec<String>,
    pub notes: Vec<String>,
    pub explanation: DensityExplanation,
}

/// Compute the envelope for one program. The caller normally passes the tier
/// resolved by the eligibility evaluator; without one the calculator falls
/// back to the weakest applicable tier rather than failing.
pub fn calculate(
    site: &SiteInput,
    program: Program,
    tier_key: Option<&str>,
    income_level: IncomeLevel,
    defaults: &AnalysisDefaults,
) -> DevelopmentPotential {
    let envelope = density::envelope(site, program, tier_key, income_level, defaults);
    let total_units = envelope.total_units();

    let parking_method = resolve_parking_method(program, envelope.transit_qualified);
    let zone_ratio = zones::standards(site.zone).parking_per_unit;
    let parking_spaces = parking::required_spaces(total_units, parking_method, zone_ratio);

    let mut notes = envelope.notes;
    if parking_method == ParkingMethod::NoneRequired {
        notes.push(
            "AB 2097: within one-half mile of a major transit stop, no minimum vehicle parking may be imposed"
                .to_string(),
        );
    }

    let potential = DevelopmentPotential {
        program,
        tier: tier_key.map(str::to_string),
        base_units: envelope.base_units,
        bonus_units: envelope.bonus_units,
        total_units,
        base_far: envelope.base_far,
        bonus_far: envelope.bonus_far,
        total_far: envelope.base_far + envelope.bonus_far,
        base_height_ft: envelope.base_height_ft,
        bonus_height_ft: envelope.bonus_height_ft,
        total_height_ft: envelope.base_height_ft + envelope.bonus_height_ft,
        base_stories: envelope.base_stories,
        bonus_stories: envelope.bonus_stories,
        total_stories: envelope.base_stories + envelope.bonus_stories,
        parking_method,
        parking_spaces,
        affordable_set_aside: envelope.affordable_set_aside,
        affordable_units: envelope.affordable_units,
        income_level: envelope.income_level,
        open_space_sf: amenities::open_space_sf(total_units),
        bicycle_long_term: amenities::bicycle_long_term(total_units),
        bicycle_short_term: amenities::bicycle_short_term(total_units),
        incentives: envelope.incentives,
        notes,
        explanation: envelope.explanation,
    };

    debug!(
        program = program.label(),
        total_units = potential.total_units,
        total_far = potential.total_far,
        parking = potential.parking_spaces,
        affordable = potential.affordable_units,
        "development potential"
    );

    potential
}

fn resolve_parking_method(program: Program, transit_qualified: bool) -> ParkingMethod {
    if transit_qualified {
        ParkingMethod::NoneRequired
    } else if program.is_bonus_program() {
        ParkingMethod::BonusLawRatio
    } else {
        ParkingMethod::Standard
    }
}
