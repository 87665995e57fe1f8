use super::DensityExplanation;
use crate::config::AnalysisDefaults;
use crate::site::{IncomeLevel, Program, SiteInput, HALF_MILE_FT};
use crate::tables::{height, programs, zones};

/// FAR/height waiver available to a density-bonus project within the transit
/// radius.
const DB_TRANSIT_FAR_BONUS: f64 = 1.0;
const DB_TRANSIT_HEIGHT_BONUS_FT: f64 = 33.0;
const DB_TRANSIT_EXTRA_STORIES: u32 = 3;

/// Computed building envelope for one program, before parking and amenity
/// requirements are layered on.
#[derive(Debug, Clone)]
pub(crate) struct Envelope {
    pub base_units: u32,
    pub bonus_units: u32,
    pub base_far: f64,
    pub bonus_far: f64,
    pub base_height_ft: f64,
    pub bonus_height_ft: f64,
    pub base_stories: u32,
    pub bonus_stories: u32,
    pub affordable_set_aside: f64,
    pub affordable_units: u32,
    pub income_level: IncomeLevel,
    pub transit_qualified: bool,
    pub explanation: DensityExplanation,
    pub incentives: Vec<String>,
    pub notes: Vec<String>,
}

impl Envelope {
    pub fn total_units(&self) -> u32 {
        self.base_units + self.bonus_units
    }
}

/// Effective base FAR/height/stories after height-district caps and any D
/// condition limits.
struct BaseStandards {
    far: f64,
    height_ft: f64,
    stories: u32,
}

fn base_standards(site: &SiteInput, defaults: &AnalysisDefaults) -> BaseStandards {
    let zone = zones::standards(site.zone);
    let hd = height::standards(site.height_district);

    let mut far = zone.base_far.min(hd.far_cap);
    if let Some(d_far) = site.conditions.d_far_cap {
        far = far.min(d_far);
    }

    let mut height_ft = hd.height_cap_ft;
    if let Some(d_height) = site.conditions.d_height_cap_ft {
        height_ft = height_ft.min(d_height);
    }

    let stories_by_height = (height_ft / defaults.floor_to_floor_ft).floor() as u32;
    let stories = hd.story_cap.min(stories_by_height);

    BaseStandards {
        far,
        height_ft,
        stories,
    }
}

fn transit_qualified(site: &SiteInput) -> bool {
    site.transit.major_stop_within(HALF_MILE_FT) == Some(true)
}

pub(crate) fn envelope(
    site: &SiteInput,
    program: Program,
    tier_key: Option<&str>,
    income_level: IncomeLevel,
    defaults: &AnalysisDefaults,
) -> Envelope {
    match program {
        Program::ByRight => by_right(site, defaults),
        Program::StateDensityBonus => state_density_bonus(site, income_level, defaults),
        Program::MiipTransit | Program::MiipOpportunity | Program::MiipCorridor => {
            miip(site, program, tier_key, defaults)
        }
        Program::Ahip => ahip(site, defaults),
        Program::Sb79 => sb79(site, tier_key, defaults),
    }
}

/// By-right density rounds down: no bonus statute applies, so fractional
/// units are lost.
fn by_right(site: &SiteInput, defaults: &AnalysisDefaults) -> Envelope {
    let zone = zones::standards(site.zone);
    let base = base_standards(site, defaults);
    let units = (site.lot_sf / zone.sf_per_unit).floor() as u32;

    Envelope {
        base_units: units,
        bonus_units: 0,
        base_far: base.far,
        bonus_far: 0.0,
        base_height_ft: base.height_ft,
        bonus_height_ft: 0.0,
        base_stories: base.stories,
        bonus_stories: 0,
        affordable_set_aside: 0.0,
        affordable_units: 0,
        income_level: IncomeLevel::Low,
        transit_qualified: transit_qualified(site),
        explanation: DensityExplanation {
            method: "by-right floor division".to_string(),
            formula: format!(
                "floor({:.0} / {:.0}) = {units}",
                site.lot_sf, zone.sf_per_unit
            ),
        },
        incentives: Vec::new(),
        notes: Vec::new(),
    }
}

/// Density-bonus arithmetic rounds every fractional result in the
/// applicant's favor, per the statute: base density, bonus units, and the
/// affordable set-aside all take the ceiling.
fn state_density_bonus(
    site: &SiteInput,
    income_level: IncomeLevel,
    defaults: &AnalysisDefaults,
) -> Envelope {
    let zone = zones::standards(site.zone);
    let base = base_standards(site, defaults);

    let base_units = (site.lot_sf / zone.sf_per_unit).ceil() as u32;
    // The set-aside is chosen as the minimum percentage reaching the top of
    // the sliding scale for the requested income level; the audit trail
    // records that choice.
    let row = programs::max_bonus_row(income_level);
    let bonus_units = (base_units as f64 * row.bonus).ceil() as u32;
    let total = base_units + bonus_units;
    let affordable_units = (total as f64 * row.set_aside).ceil() as u32;

    let transit = transit_qualified(site);
    let (bonus_far, bonus_height_ft, bonus_stories) = if transit {
        (
            DB_TRANSIT_FAR_BONUS,
            DB_TRANSIT_HEIGHT_BONUS_FT,
            DB_TRANSIT_EXTRA_STORIES,
        )
    } else {
        (0.0, 0.0, 0)
    };

    let concessions = programs::concessions_for(income_level, row.set_aside);
    let mut incentives = vec![format!(
        "{concessions} incentive/concession(s) under the density-bonus statute"
    )];
    if transit {
        incentives.push("FAR and height waivers within transit radius".to_string());
    }

    Envelope {
        base_units,
        bonus_units,
        base_far: base.far,
        bonus_far,
        base_height_ft: base.height_ft,
        bonus_height_ft,
        base_stories: base.stories,
        bonus_stories,
        affordable_set_aside: row.set_aside,
        affordable_units,
        income_level,
        transit_qualified: transit,
        explanation: DensityExplanation {
            method: format!(
                "density-bonus ceiling; minimum {:.0}% {} set-aside for the maximum {:.0}% bonus",
                row.set_aside * 100.0,
                income_level.label(),
                row.bonus * 100.0
            ),
            formula: format!(
                "ceil({:.0} / {:.0}) = {base_units}; ceil({base_units} x {:.2}) = {bonus_units}",
                site.lot_sf, zone.sf_per_unit, row.bonus
            ),
        },
        incentives,
        notes: Vec::new(),
    }
}

fn miip(
    site: &SiteInput,
    program: Program,
    tier_key: Option<&str>,
    defaults: &AnalysisDefaults,
) -> Envelope {
    let zone = zones::standards(site.zone);
    let base = base_standards(site, defaults);

    // Fall back to the weakest applicable tier when no key was resolved, so
    // a direct call without an eligibility pass still yields an envelope.
    let tier = tier_key
        .and_then(programs::miip_tier_by_key)
        .unwrap_or_else(|| match program {
            Program::MiipOpportunity => programs::opportunity_tier_for(
                site.tcac_tier.unwrap_or(crate::site::TcacTier::HighResource),
            )
            .unwrap_or(programs::corridor_tier()),
            _ => programs::corridor_tier(),
        });

    let base_units = (site.lot_sf / zone.sf_per_unit).ceil() as u32;
    let bonus_units = (base_units as f64 * tier.density_bonus).ceil() as u32;
    let total = base_units + bonus_units;
    let affordable_units = (total as f64 * tier.set_aside).ceil() as u32;

    let transit = transit_qualified(site);
    let (bonus_far, bonus_height_ft, bonus_stories) = if transit {
        (tier.far_bonus, tier.height_bonus_ft, tier.extra_stories)
    } else {
        (0.0, 0.0, 0)
    };

    let mut notes = Vec::new();
    if !transit {
        notes.push(
            "beyond transit radius: tier FAR/height incentives withheld, density bonus retained"
                .to_string(),
        );
    }

    Envelope {
        base_units,
        bonus_units,
        base_far: base.far,
        bonus_far,
        base_height_ft: base.height_ft,
        bonus_height_ft,
        base_stories: base.stories,
        bonus_stories,
        affordable_set_aside: tier.set_aside,
        affordable_units,
        income_level: tier.income_level,
        transit_qualified: transit,
        explanation: DensityExplanation {
            method: format!("{} incentive table", tier.label),
            formula: format!(
                "ceil({:.0} / {:.0}) = {base_units}; ceil({base_units} x {:.2}) = {bonus_units}",
                site.lot_sf, zone.sf_per_unit, tier.density_bonus
            ),
        },
        incentives: vec![tier.label.to_string()],
        notes,
    }
}

fn ahip(site: &SiteInput, defaults: &AnalysisDefaults) -> Envelope {
    let zone = zones::standards(site.zone);
    let base = base_standards(site, defaults);
    let incentives = programs::ahip();

    let base_units = (site.lot_sf / zone.sf_per_unit).ceil() as u32;
    let bonus_units = (base_units as f64 * incentives.density_bonus).ceil() as u32;
    let total = base_units + bonus_units;
    // Entire project restricted except one manager unit.
    let affordable_units = total.saturating_sub(1);
    let set_aside = if total > 0 {
        affordable_units as f64 / total as f64
    } else {
        0.0
    };

    let transit = transit_qualified(site);
    let (bonus_far, bonus_height_ft, bonus_stories) = if transit {
        (
            incentives.far_bonus,
            incentives.height_bonus_ft,
            incentives.extra_stories,
        )
    } else {
        (0.0, 0.0, 0)
    };

    Envelope {
        base_units,
        bonus_units,
        base_far: base.far,
        bonus_far,
        base_height_ft: base.height_ft,
        bonus_height_ft,
        base_stories: base.stories,
        bonus_stories,
        affordable_set_aside: set_aside,
        affordable_units,
        income_level: incentives.income_level,
        transit_qualified: transit,
        explanation: DensityExplanation {
            method: "100% affordable incentive program".to_string(),
            formula: format!(
                "ceil({:.0} / {:.0}) = {base_units}; ceil({base_units} x {:.2}) = {bonus_units}",
                site.lot_sf, zone.sf_per_unit, incentives.density_bonus
            ),
        },
        incentives: vec!["streamlined ministerial approval".to_string()],
        notes: vec!["one unrestricted manager unit assumed".to_string()],
    }
}

const SF_PER_ACRE: f64 = 43_560.0;

fn sb79(site: &SiteInput, tier_key: Option<&str>, defaults: &AnalysisDefaults) -> Envelope {
    let zone = zones::standards(site.zone);
    let base = base_standards(site, defaults);

    let tier = tier_key
        .and_then(programs::sb79_tier_by_key)
        .or_else(|| site.transit.major_stop_ft.and_then(programs::sb79_tier_for))
        .unwrap_or_else(|| {
            programs::sb79_tier_by_key("B").unwrap_or_else(|| unreachable!("tier B is in the table"))
        });

    let base_units = (site.lot_sf / zone.sf_per_unit).ceil() as u32;
    let program_max = (site.lot_sf / SF_PER_ACRE * tier.units_per_acre).ceil() as u32;
    let bonus_units = program_max.saturating_sub(base_units);
    let total = base_units + bonus_units;
    let affordable_units = (total as f64 * tier.set_aside).ceil() as u32;

    let bonus_far = (tier.far - base.far).max(0.0);
    let bonus_height_ft = (tier.height_ft - base.height_ft).max(0.0);
    let bonus_stories = tier.stories.saturating_sub(base.stories);

    Envelope {
        base_units,
        bonus_units,
        base_far: base.far,
        bonus_far,
        base_height_ft: base.height_ft,
        bonus_height_ft,
        base_stories: base.stories,
        bonus_stories,
        affordable_set_aside: tier.set_aside,
        affordable_units,
        income_level: tier.income_level,
        transit_qualified: true,
        explanation: DensityExplanation {
            method: format!("{} per-acre standard", tier.label),
            formula: format!(
                "ceil({:.0} / {SF_PER_ACRE:.0} x {:.0}) = {program_max}",
                site.lot_sf, tier.units_per_acre
            ),
        },
        incentives: vec![tier.label.to_string()],
        notes: Vec::new(),
    }
}
