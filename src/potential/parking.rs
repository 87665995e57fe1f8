use serde::{Deserialize, Serialize};

/// How the vehicle parking requirement was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParkingMethod {
    /// AB 2097: no minimum within a half mile of major transit.
    NoneRequired,
    /// Bonus-law ratio for density-bonus projects outside the transit radius.
    BonusLawRatio,
    /// Underlying zone ratio.
    Standard,
}

impl ParkingMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoneRequired => "None required (AB 2097)",
            Self::BonusLawRatio => "Bonus-law ratio",
            Self::Standard => "Zone standard",
        }
    }
}

const BONUS_LAW_RATIO: f64 = 0.5;

/// Required spaces for a unit count under a derivation method.
pub fn required_spaces(units: u32, method: ParkingMethod, zone_ratio: f64) -> u32 {
    match method {
        ParkingMethod::NoneRequired => 0,
        ParkingMethod::BonusLawRatio => (units as f64 * BONUS_LAW_RATIO).ceil() as u32,
        ParkingMethod::Standard => (units as f64 * zone_ratio).ceil() as u32,
    }
}
