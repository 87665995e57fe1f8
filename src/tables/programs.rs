use crate::site::{IncomeLevel, TcacTier};

/// One rung of a density-bonus sliding scale: setting aside at least
/// `set_aside` of total units at the scale's income level earns `bonus`
/// additional density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRow {
    pub set_aside: f64,
    pub bonus: f64,
}

const VLI_SCALE: &[ScaleRow] = &[
    ScaleRow { set_aside: 0.05, bonus: 0.20 },
    ScaleRow { set_aside: 0.07, bonus: 0.25 },
    ScaleRow { set_aside: 0.09, bonus: 0.30 },
    ScaleRow { set_aside: 0.11, bonus: 0.35 },
    ScaleRow { set_aside: 0.13, bonus: 0.40 },
    ScaleRow { set_aside: 0.16, bonus: 0.44 },
    ScaleRow { set_aside: 0.20, bonus: 0.47 },
    ScaleRow { set_aside: 0.24, bonus: 0.50 },
];

const LOW_SCALE: &[ScaleRow] = &[
    ScaleRow { set_aside: 0.10, bonus: 0.20 },
    ScaleRow { set_aside: 0.13, bonus: 0.25 },
    ScaleRow { set_aside: 0.17, bonus: 0.30 },
    ScaleRow { set_aside: 0.20, bonus: 0.35 },
    ScaleRow { set_aside: 0.24, bonus: 0.39 },
    ScaleRow { set_aside: 0.30, bonus: 0.44 },
    ScaleRow { set_aside: 0.35, bonus: 0.47 },
    ScaleRow { set_aside: 0.44, bonus: 0.50 },
];

const MODERATE_SCALE: &[ScaleRow] = &[
    ScaleRow { set_aside: 0.10, bonus: 0.05 },
    ScaleRow { set_aside: 0.20, bonus: 0.15 },
    ScaleRow { set_aside: 0.30, bonus: 0.25 },
    ScaleRow { set_aside: 0.40, bonus: 0.35 },
    ScaleRow { set_aside: 0.50, bonus: 0.50 },
];

/// Sliding scale for an income level. Extremely-low set-asides ride the VLI
/// scale (the statute treats them as at-least-VLI restricted).
pub fn bonus_scale(level: IncomeLevel) -> &'static [ScaleRow] {
    match level {
        IncomeLevel::ExtremelyLow | IncomeLevel::VeryLow => VLI_SCALE,
        IncomeLevel::Low => LOW_SCALE,
        IncomeLevel::Moderate => MODERATE_SCALE,
    }
}

/// Top rung of the scale: the maximum bonus and the minimum set-aside that
/// reaches it.
pub fn max_bonus_row(level: IncomeLevel) -> &'static ScaleRow {
    bonus_scale(level)
        .last()
        .unwrap_or_else(|| unreachable!("every scale has at least one row"))
}

/// Bonus earned by a given set-aside, walking the scale to the highest rung
/// satisfied. Zero when the set-aside misses the first rung.
pub fn bonus_for(level: IncomeLevel, set_aside: f64) -> f64 {
    bonus_scale(level)
        .iter()
        .take_while(|row| row.set_aside <= set_aside + 1e-9)
        .last()
        .map(|row| row.bonus)
        .unwrap_or(0.0)
}

/// Incentive/concession count earned by a set-aside.
pub fn concessions_for(level: IncomeLevel, set_aside: f64) -> u8 {
    let thresholds: &[(f64, u8)] = match level {
        IncomeLevel::ExtremelyLow | IncomeLevel::VeryLow => {
            &[(0.05, 1), (0.10, 2), (0.15, 3), (0.24, 4)]
        }
        IncomeLevel::Low => &[(0.10, 1), (0.17, 2), (0.24, 3), (0.44, 4)],
        IncomeLevel::Moderate => &[(0.10, 1), (0.20, 2), (0.30, 3), (0.50, 4)],
    };
    thresholds
        .iter()
        .take_while(|(pct, _)| *pct <= set_aside + 1e-9)
        .last()
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

/// Incentive record for one MIIP tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiipTier {
    pub key: &'static str,
    pub label: &'static str,
    /// Qualifying distance to the tier's transit anchor, feet. `None` for
    /// tiers keyed on something other than distance.
    pub max_distance_ft: Option<f64>,
    pub density_bonus: f64,
    pub far_bonus: f64,
    pub height_bonus_ft: f64,
    pub extra_stories: u32,
    pub set_aside: f64,
    pub income_level: IncomeLevel,
}

/// Transit tiers, strongest first. Resolution takes the first tier whose
/// distance test passes.
const TRANSIT_TIERS: &[MiipTier] = &[
    MiipTier {
        key: "T1",
        label: "Transit Tier 1",
        max_distance_ft: Some(660.0),
        density_bonus: 0.80,
        far_bonus: 1.25,
        height_bonus_ft: 33.0,
        extra_stories: 3,
        set_aside: 0.11,
        income_level: IncomeLevel::VeryLow,
    },
    MiipTier {
        key: "T2",
        label: "Transit Tier 2",
        max_distance_ft: Some(1_320.0),
        density_bonus: 0.70,
        far_bonus: 1.00,
        height_bonus_ft: 22.0,
        extra_stories: 2,
        set_aside: 0.10,
        income_level: IncomeLevel::VeryLow,
    },
    MiipTier {
        key: "T3",
        label: "Transit Tier 3",
        max_distance_ft: Some(2_640.0),
        density_bonus: 0.50,
        far_bonus: 0.75,
        height_bonus_ft: 11.0,
        extra_stories: 1,
        set_aside: 0.09,
        income_level: IncomeLevel::VeryLow,
    },
];

const OPPORTUNITY_HIGHEST: MiipTier = MiipTier {
    key: "O1",
    label: "Opportunity Tier 1 (Highest Resource)",
    max_distance_ft: None,
    density_bonus: 0.60,
    far_bonus: 0.50,
    height_bonus_ft: 11.0,
    extra_stories: 1,
    set_aside: 0.10,
    income_level: IncomeLevel::Low,
};

const OPPORTUNITY_HIGH: MiipTier = MiipTier {
    key: "O2",
    label: "Opportunity Tier 2 (High Resource)",
    max_distance_ft: None,
    density_bonus: 0.45,
    far_bonus: 0.35,
    height_bonus_ft: 11.0,
    extra_stories: 1,
    set_aside: 0.08,
    income_level: IncomeLevel::Low,
};

const CORRIDOR_TIER: MiipTier = MiipTier {
    key: "C1",
    label: "Corridor Tier 1",
    max_distance_ft: None,
    density_bonus: 0.35,
    far_bonus: 0.25,
    height_bonus_ft: 11.0,
    extra_stories: 1,
    set_aside: 0.07,
    income_level: IncomeLevel::Low,
};

pub fn transit_tiers() -> &'static [MiipTier] {
    TRANSIT_TIERS
}

/// Resolve the transit tier for a distance to the nearest major stop.
pub fn transit_tier_for(major_stop_ft: f64) -> Option<&'static MiipTier> {
    TRANSIT_TIERS.iter().find(|tier| {
        tier.max_distance_ft
            .map(|max| major_stop_ft <= max)
            .unwrap_or(false)
    })
}

pub fn opportunity_tier_for(tcac: TcacTier) -> Option<&'static MiipTier> {
    match tcac {
        TcacTier::HighestResource => Some(&OPPORTUNITY_HIGHEST),
        TcacTier::HighResource => Some(&OPPORTUNITY_HIGH),
        TcacTier::ModerateResource | TcacTier::LowResource => None,
    }
}

pub fn corridor_tier() -> &'static MiipTier {
    &CORRIDOR_TIER
}

pub fn miip_tier_by_key(key: &str) -> Option<&'static MiipTier> {
    TRANSIT_TIERS
        .iter()
        .chain([&OPPORTUNITY_HIGHEST, &OPPORTUNITY_HIGH, &CORRIDOR_TIER])
        .find(|tier| tier.key == key)
}

/// Incentives for the 100%-affordable program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AhipIncentives {
    pub density_bonus: f64,
    pub far_bonus: f64,
    pub height_bonus_ft: f64,
    pub extra_stories: u32,
    /// Entire project restricted, less one manager unit.
    pub set_aside: f64,
    pub income_level: IncomeLevel,
}

const AHIP: AhipIncentives = AhipIncentives {
    density_bonus: 1.00,
    far_bonus: 1.00,
    height_bonus_ft: 33.0,
    extra_stories: 3,
    set_aside: 1.00,
    income_level: IncomeLevel::Low,
};

pub fn ahip() -> &'static AhipIncentives {
    &AHIP
}

/// State transit-oriented development standards keyed on stop distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sb79Tier {
    pub key: &'static str,
    pub label: &'static str,
    pub max_distance_ft: f64,
    pub units_per_acre: f64,
    pub far: f64,
    pub height_ft: f64,
    pub stories: u32,
    pub set_aside: f64,
    pub income_level: IncomeLevel,
}

const SB79_TIERS: &[Sb79Tier] = &[
    Sb79Tier {
        key: "A",
        label: "SB 79 Tier A (quarter mile)",
        max_distance_ft: 1_320.0,
        units_per_acre: 120.0,
        far: 3.5,
        height_ft: 85.0,
        stories: 7,
        set_aside: 0.10,
        income_level: IncomeLevel::Low,
    },
    Sb79Tier {
        key: "B",
        label: "SB 79 Tier B (half mile)",
        max_distance_ft: 2_640.0,
        units_per_acre: 100.0,
        far: 3.0,
        height_ft: 75.0,
        stories: 6,
        set_aside: 0.10,
        income_level: IncomeLevel::Low,
    },
];

pub fn sb79_tier_for(major_stop_ft: f64) -> Option<&'static Sb79Tier> {
    SB79_TIERS
        .iter()
        .find(|tier| major_stop_ft <= tier.max_distance_ft)
}

pub fn sb79_tier_by_key(key: &str) -> Option<&'static Sb79Tier> {
    SB79_TIERS.iter().find(|tier| tier.key == key)
}
