use serde::{Deserialize, Serialize};

/// IBC construction classifications the engine prices, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionType {
    TypeVB,
    TypeVA,
    TypeIiiB,
    TypeIiiA,
    TypeIB,
    TypeIA,
}

impl ConstructionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TypeVB => "Type V-B",
            Self::TypeVA => "Type V-A",
            Self::TypeIiiB => "Type III-B",
            Self::TypeIiiA => "Type III-A (podium)",
            Self::TypeIB => "Type I-B",
            Self::TypeIA => "Type I-A",
        }
    }
}

/// Hard-cost $/SF by interior space type. Wet areas (kitchens/baths) always
/// price above dry areas regardless of building class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceRates {
    pub wet: f64,
    pub dry: f64,
    pub corridor: f64,
    pub lobby: f64,
    pub amenity: f64,
    pub shell: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructionSpec {
    pub construction_type: ConstructionType,
    pub max_stories: u32,
    pub max_height_ft: f64,
    pub rates: SpaceRates,
}

impl ConstructionSpec {
    /// Blended residential rate used when comparing construction cliffs.
    pub fn blended_residential_rate(&self, wet_share: f64) -> f64 {
        self.rates.wet * wet_share + self.rates.dry * (1.0 - wet_share)
    }
}

/// Ordered ascending by cost; `cheapest_for` walks this front to back.
const SPECS: &[ConstructionSpec] = &[
    ConstructionSpec {
        construction_type: ConstructionType::TypeVB,
        max_stories: 3,
        max_height_ft: 40.0,
        rates: SpaceRates {
            wet: 320.0,
            dry: 195.0,
            corridor: 150.0,
            lobby: 240.0,
            amenity: 260.0,
            shell: 105.0,
        },
    },
    ConstructionSpec {
        construction_type: ConstructionType::TypeVA,
        max_stories: 4,
        max_height_ft: 50.0,
        rates: SpaceRates {
            wet: 335.0,
            dry: 210.0,
            corridor: 160.0,
            lobby: 255.0,
            amenity: 275.0,
            shell: 115.0,
        },
    },
    ConstructionSpec {
        construction_type: ConstructionType::TypeIiiB,
        max_stories: 5,
        max_height_ft: 65.0,
        rates: SpaceRates {
            wet: 350.0,
            dry: 225.0,
            corridor: 170.0,
            lobby: 270.0,
            amenity: 290.0,
            shell: 125.0,
        },
    },
    ConstructionSpec {
        construction_type: ConstructionType::TypeIiiA,
        max_stories: 7,
        max_height_ft: 85.0,
        rates: SpaceRates {
            wet: 370.0,
            dry: 245.0,
            corridor: 185.0,
            lobby: 285.0,
            amenity: 305.0,
            shell: 140.0,
        },
    },
    ConstructionSpec {
        construction_type: ConstructionType::TypeIB,
        max_stories: 12,
        max_height_ft: 160.0,
        rates: SpaceRates {
            wet: 420.0,
            dry: 300.0,
            corridor: 230.0,
            lobby: 330.0,
            amenity: 350.0,
            shell: 185.0,
        },
    },
    ConstructionSpec {
        construction_type: ConstructionType::TypeIA,
        max_stories: 30,
        max_height_ft: 400.0,
        rates: SpaceRates {
            wet: 460.0,
            dry: 340.0,
            corridor: 265.0,
            lobby: 365.0,
            amenity: 385.0,
            shell: 215.0,
        },
    },
];

pub fn spec(construction_type: ConstructionType) -> &'static ConstructionSpec {
    SPECS
        .iter()
        .find(|entry| entry.construction_type == construction_type)
        .unwrap_or_else(|| unreachable!("construction table covers every type"))
}

/// Cheapest type whose story and height limits both accommodate the building.
/// `None` when even Type I-A cannot (caller has exceeded the story cap).
pub fn cheapest_for(stories: u32, height_ft: f64) -> Option<&'static ConstructionSpec> {
    SPECS
        .iter()
        .find(|entry| entry.max_stories >= stories && entry.max_height_ft >= height_ft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wet_rates_exceed_dry_for_every_type() {
        for entry in SPECS {
            assert!(
                entry.rates.wet > entry.rates.dry,
                "{} must price wet areas above dry",
                entry.construction_type.label()
            );
        }
    }

    #[test]
    fn specs_are_ordered_ascending_by_cost() {
        for pair in SPECS.windows(2) {
            assert!(pair[0].rates.dry < pair[1].rates.dry);
            assert!(pair[0].rates.shell < pair[1].rates.shell);
        }
    }

    #[test]
    fn cheapest_for_picks_first_satisfying_type() {
        assert_eq!(
            cheapest_for(3, 33.0).map(|s| s.construction_type),
            Some(ConstructionType::TypeVB)
        );
        assert_eq!(
            cheapest_for(6, 66.0).map(|s| s.construction_type),
            Some(ConstructionType::TypeIiiA)
        );
        assert_eq!(
            cheapest_for(8, 88.0).map(|s| s.construction_type),
            Some(ConstructionType::TypeIB)
        );
        assert!(cheapest_for(40, 440.0).is_none());
    }

    #[test]
    fn six_and_seven_stories_share_a_type() {
        // The podium type spans 6 and 7 stories, so the HBU cliff between
        // those counts comes from parking, not framing.
        assert_eq!(
            cheapest_for(6, 66.0).map(|s| s.construction_type),
            cheapest_for(7, 77.0).map(|s| s.construction_type)
        );
    }
}
