use serde::{Deserialize, Serialize};

/// One-half mile in feet, the transit threshold shared by the parking
/// exemption (AB 2097) and the outer bonus-program tiers.
pub const HALF_MILE_FT: f64 = 2_640.0;

/// Multifamily-capable base zones covered by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Rd1_5,
    Rd2,
    R3,
    R4,
    R5,
    Ras3,
    Ras4,
    C2,
}

impl Zone {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rd1_5 => "RD1.5",
            Self::Rd2 => "RD2",
            Self::R3 => "R3",
            Self::R4 => "R4",
            Self::R5 => "R5",
            Self::Ras3 => "RAS3",
            Self::Ras4 => "RAS4",
            Self::C2 => "C2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightDistrict {
    Hd1,
    Hd1L,
    Hd1Vl,
    Hd1Xl,
    Hd2,
}

impl HeightDistrict {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hd1 => "1",
            Self::Hd1L => "1L",
            Self::Hd1Vl => "1VL",
            Self::Hd1Xl => "1XL",
            Self::Hd2 => "2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketArea {
    Westside,
    Hollywood,
    Downtown,
    Valley,
    SouthLa,
}

impl MarketArea {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Westside => "Westside",
            Self::Hollywood => "Hollywood",
            Self::Downtown => "Downtown",
            Self::Valley => "Valley",
            Self::SouthLa => "South LA",
        }
    }
}

/// TCAC/HCD opportunity-area designation, pre-resolved by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TcacTier {
    HighestResource,
    HighResource,
    ModerateResource,
    LowResource,
}

impl TcacTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighestResource => "Highest Resource",
            Self::HighResource => "High Resource",
            Self::ModerateResource => "Moderate Resource",
            Self::LowResource => "Low Resource",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeLevel {
    ExtremelyLow,
    VeryLow,
    Low,
    Moderate,
}

impl IncomeLevel {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::ExtremelyLow,
            Self::VeryLow,
            Self::Low,
            Self::Moderate,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ExtremelyLow => "Extremely Low Income",
            Self::VeryLow => "Very Low Income",
            Self::Low => "Low Income",
            Self::Moderate => "Moderate Income",
        }
    }
}

/// Entitlement progress of the site. Advancing a stage removes soft-cost
/// line items the seller has already paid for and shrinks the risk premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementStage {
    RawLand,
    Entitled,
    PlanCheck,
    ReadyToIssue,
    Permitted,
}

impl EntitlementStage {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::RawLand,
            Self::Entitled,
            Self::PlanCheck,
            Self::ReadyToIssue,
            Self::Permitted,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RawLand => "Raw Land",
            Self::Entitled => "Entitled",
            Self::PlanCheck => "Plan Check",
            Self::ReadyToIssue => "Ready to Issue",
            Self::Permitted => "Permitted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    ByRight,
    StateDensityBonus,
    MiipTransit,
    MiipOpportunity,
    MiipCorridor,
    Ahip,
    Sb79,
}

impl Program {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::ByRight,
            Self::StateDensityBonus,
            Self::MiipTransit,
            Self::MiipOpportunity,
            Self::MiipCorridor,
            Self::Ahip,
            Self::Sb79,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ByRight => "By-Right",
            Self::StateDensityBonus => "State Density Bonus",
            Self::MiipTransit => "MIIP Transit",
            Self::MiipOpportunity => "MIIP Opportunity",
            Self::MiipCorridor => "MIIP Corridor",
            Self::Ahip => "AHIP",
            Self::Sb79 => "SB 79",
        }
    }

    /// True for every program that rounds density in the applicant's favor.
    pub const fn is_bonus_program(self) -> bool {
        !matches!(self, Self::ByRight)
    }
}

/// Bedroom-mix presets for the unit-mix generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixProfile {
    Urban,
    Family,
    Affordable,
    Workforce,
}

impl MixProfile {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Urban => "Urban Infill",
            Self::Family => "Family",
            Self::Affordable => "Affordable",
            Self::Workforce => "Workforce",
        }
    }

    /// Bedroom shares ordered studio, 1BR, 2BR, 3BR.
    pub const fn shares(self) -> [f64; 4] {
        match self {
            Self::Urban => [0.30, 0.45, 0.20, 0.05],
            Self::Family => [0.05, 0.25, 0.45, 0.25],
            Self::Affordable => [0.15, 0.35, 0.35, 0.15],
            Self::Workforce => [0.20, 0.40, 0.30, 0.10],
        }
    }
}

/// Straight-line distances from the parcel to transit, in feet. All optional:
/// a missing distance degrades transit-dependent programs rather than failing
/// the evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransitContext {
    pub rail_station_ft: Option<f64>,
    pub bus_corridor_ft: Option<f64>,
    pub major_stop_ft: Option<f64>,
}

impl TransitContext {
    /// Whether a major transit stop lies within `threshold_ft`.
    /// `None` when the distance was never resolved.
    pub fn major_stop_within(&self, threshold_ft: f64) -> Option<bool> {
        self.major_stop_ft.map(|ft| ft <= threshold_ft)
    }
}

/// Q/D/T condition overlays carried on the zoning designation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionOverrides {
    /// Q qualified-condition text, advisory only.
    pub q_condition: Option<String>,
    /// D development-limit FAR cap, overrides the height-district FAR.
    pub d_far_cap: Option<f64>,
    /// D development-limit height cap in feet.
    pub d_height_cap_ft: Option<f64>,
    /// T tentative classification; site improvements outstanding.
    pub t_condition: bool,
}

/// Immutable description of a parcel. Built once per analysis run by the
/// caller (form input or parsed municipal report); every calculator only
/// reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInput {
    pub lot_sf: f64,
    pub zone: Zone,
    pub height_district: HeightDistrict,
    pub market_area: MarketArea,
    #[serde(default)]
    pub tcac_tier: Option<TcacTier>,
    #[serde(default)]
    pub transit: TransitContext,
    #[serde(default)]
    pub very_high_fire_hazard: bool,
    #[serde(default)]
    pub coastal_zone: bool,
    #[serde(default)]
    pub sea_level_rise: bool,
    #[serde(default)]
    pub corridor_adjacent: bool,
    #[serde(default)]
    pub conditions: ConditionOverrides,
}

impl SiteInput {
    /// True when any hazard/coastal exclusion flag applies.
    pub fn has_exclusion_flag(&self) -> bool {
        self.very_high_fire_hazard || self.coastal_zone || self.sea_level_rise
    }

    pub fn exclusion_reason(&self) -> Option<&'static str> {
        if self.very_high_fire_hazard {
            Some("in Very High Fire Hazard Severity Zone")
        } else if self.coastal_zone {
            Some("in Coastal Zone")
        } else if self.sea_level_rise {
            Some("in Sea Level Rise area")
        } else {
            None
        }
    }
}
