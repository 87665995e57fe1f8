use crate::config::AnalysisDefaults;
use crate::site::EntitlementStage;
use crate::tables::{ConstructionSpec, SubmarketData};
use crate::unitmix::UnitMix;
use serde::{Deserialize, Serialize};

/// Share of residential area that is wet (kitchen/bath) space.
pub const WET_AREA_SHARE: f64 = 0.18;

/// Subterranean parking $/space by underground level, level 1 first. Each
/// additional level digs deeper and prices higher; levels past the table
/// reuse the last rate.
pub const SUBTERRANEAN_SPACE_RATES: [f64; 3] = [75_000.0, 95_000.0, 115_000.0];

/// Soft-cost terms for an entitlement stage. Advancing a stage strictly
/// shrinks the percentage and contingency because the seller has already
/// carried that scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTerms {
    pub stage: EntitlementStage,
    pub soft_cost_pct: f64,
    pub contingency_pct: f64,
    pub paid_items: &'static [&'static str],
}

const STAGE_TERMS: &[StageTerms] = &[
    StageTerms {
        stage: EntitlementStage::RawLand,
        soft_cost_pct: 0.26,
        contingency_pct: 0.075,
        paid_items: &[],
    },
    StageTerms {
        stage: EntitlementStage::Entitled,
        soft_cost_pct: 0.22,
        contingency_pct: 0.065,
        paid_items: &["entitlement fees", "environmental review"],
    },
    StageTerms {
        stage: EntitlementStage::PlanCheck,
        soft_cost_pct: 0.19,
        contingency_pct: 0.055,
        paid_items: &["entitlement fees", "environmental review", "schematic design"],
    },
    StageTerms {
        stage: EntitlementStage::ReadyToIssue,
        soft_cost_pct: 0.165,
        contingency_pct: 0.05,
        paid_items: &[
            "entitlement fees",
            "environmental review",
            "schematic design",
            "plan-check corrections",
        ],
    },
    StageTerms {
        stage: EntitlementStage::Permitted,
        soft_cost_pct: 0.145,
        contingency_pct: 0.045,
        paid_items: &[
            "entitlement fees",
            "environmental review",
            "schematic design",
            "plan-check corrections",
            "permit issuance fees",
        ],
    },
];

pub fn stage_terms(stage: EntitlementStage) -> &'static StageTerms {
    STAGE_TERMS
        .iter()
        .find(|terms| terms.stage == stage)
        .unwrap_or_else(|| unreachable!("stage table covers every entitlement stage"))
}

/// Parking supply split between above-grade podium stalls and subterranean
/// levels, with the subterranean premium priced per level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkingPlan {
    pub required: u32,
    pub above_grade: u32,
    pub subterranean: u32,
    pub subterranean_levels: u32,
    pub above_grade_cost: f64,
    pub subterranean_cost: f64,
}

impl ParkingPlan {
    pub fn total_cost(&self) -> f64 {
        self.above_grade_cost + self.subterranean_cost
    }

    pub const fn none() -> Self {
        Self {
            required: 0,
            above_grade: 0,
            subterranean: 0,
            subterranean_levels: 0,
            above_grade_cost: 0.0,
            subterranean_cost: 0.0,
        }
    }
}

/// Fit `required` spaces: podium capacity first, then successively deeper
/// subterranean levels at the tiered rates.
pub fn plan_parking(required: u32, footprint_sf: f64, defaults: &AnalysisDefaults) -> ParkingPlan {
    if required == 0 {
        return ParkingPlan::none();
    }

    let level_capacity = ((footprint_sf / defaults.parking_space_sf).floor() as u32).max(1);
    let above_grade = required.min(level_capacity);
    let mut shortfall = required - above_grade;

    let mut levels = 0u32;
    let mut subterranean_cost = 0.0;
    while shortfall > 0 {
        let on_level = shortfall.min(level_capacity);
        let rate_idx = (levels as usize).min(SUBTERRANEAN_SPACE_RATES.len() - 1);
        subterranean_cost += on_level as f64 * SUBTERRANEAN_SPACE_RATES[rate_idx];
        shortfall -= on_level;
        levels += 1;
    }

    ParkingPlan {
        required,
        above_grade,
        subterranean: required - above_grade,
        subterranean_levels: levels,
        above_grade_cost: above_grade as f64 * defaults.above_grade_space_cost,
        subterranean_cost,
    }
}

/// Hard costs by space type. Every component is non-negative by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardCosts {
    pub wet: f64,
    pub dry: f64,
    pub corridor: f64,
    pub lobby: f64,
    pub amenity: f64,
    pub shell: f64,
    pub parking: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftCosts {
    pub percentage: f64,
    pub base: f64,
    pub linkage_fee: f64,
    pub contingency: f64,
    pub total: f64,
    pub already_paid: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostStack {
    pub residential_sf: f64,
    pub gross_building_sf: f64,
    pub hard: HardCosts,
    pub soft: SoftCosts,
    pub financing_carry: f64,
    pub total: f64,
}

impl CostStack {
    pub fn cost_per_gross_sf(&self) -> f64 {
        if self.gross_building_sf > 0.0 {
            self.total / self.gross_building_sf
        } else {
            0.0
        }
    }
}

/// Assemble the full development cost stack for one configuration.
#[allow(clippy::too_many_arguments)]
pub fn cost_stack(
    mix: &UnitMix,
    construction: &ConstructionSpec,
    parking: &ParkingPlan,
    market: &SubmarketData,
    stage: EntitlementStage,
    hard_cost_multiplier: f64,
    defaults: &AnalysisDefaults,
) -> CostStack {
    let residential_sf = mix.sellable_sf();
    let wet_sf = residential_sf * WET_AREA_SHARE;
    let dry_sf = residential_sf - wet_sf;
    let corridor_sf = residential_sf * defaults.common_area_ratio;
    let lobby_sf = defaults.lobby_sf;
    let amenity_sf =
        (mix.total as f64 * defaults.amenity_sf_per_unit).max(defaults.amenity_sf_minimum);
    let gross_sf = residential_sf + corridor_sf + lobby_sf + amenity_sf;

    let rates = &construction.rates;
    let wet = wet_sf * rates.wet * hard_cost_multiplier;
    let dry = dry_sf * rates.dry * hard_cost_multiplier;
    let corridor = corridor_sf * rates.corridor * hard_cost_multiplier;
    let lobby = lobby_sf * rates.lobby * hard_cost_multiplier;
    let amenity = amenity_sf * rates.amenity * hard_cost_multiplier;
    let shell = gross_sf * rates.shell * hard_cost_multiplier;
    let parking_cost = parking.total_cost() * hard_cost_multiplier;
    let hard_total = wet + dry + corridor + lobby + amenity + shell + parking_cost;

    let terms = stage_terms(stage);
    let soft_base = hard_total * terms.soft_cost_pct;
    let linkage_fee = residential_sf * market.linkage_fee_psf;
    let contingency = hard_total * terms.contingency_pct;
    let soft_total = soft_base + linkage_fee + contingency;

    let loanable = (hard_total + soft_total) * defaults.loan_to_cost;
    let financing_carry = loanable
        * defaults.interest_rate
        * (defaults.construction_months / 12.0)
        * defaults.average_draw;

    CostStack {
        residential_sf,
        gross_building_sf: gross_sf,
        hard: HardCosts {
            wet,
            dry,
            corridor,
            lobby,
            amenity,
            shell,
            parking: parking_cost,
            total: hard_total,
        },
        soft: SoftCosts {
            percentage: terms.soft_cost_pct,
            base: soft_base,
            linkage_fee,
            contingency,
            total: soft_total,
            already_paid: terms.paid_items.iter().map(|item| item.to_string()).collect(),
        },
        financing_carry,
        total: hard_total + soft_total + financing_carry,
    }
}
