use crate::site::MarketArea;
use serde::{Deserialize, Serialize};

/// Submarket underwriting data per market area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmarketData {
    pub area: MarketArea,
    /// Achievable market rent, $/SF/month.
    pub rent_psf_month: f64,
    /// Achievable condo sale price, $/SF.
    pub sale_psf: f64,
    pub cap_rate: f64,
    /// Affordable-housing linkage fee, $/SF of residential area.
    pub linkage_fee_psf: f64,
}

const SUBMARKETS: &[SubmarketData] = &[
    SubmarketData {
        area: MarketArea::Westside,
        rent_psf_month: 4.40,
        sale_psf: 900.0,
        cap_rate: 0.0450,
        linkage_fee_psf: 18.0,
    },
    SubmarketData {
        area: MarketArea::Hollywood,
        rent_psf_month: 3.60,
        sale_psf: 775.0,
        cap_rate: 0.0475,
        linkage_fee_psf: 15.0,
    },
    SubmarketData {
        area: MarketArea::Downtown,
        rent_psf_month: 3.30,
        sale_psf: 700.0,
        cap_rate: 0.0500,
        linkage_fee_psf: 12.0,
    },
    SubmarketData {
        area: MarketArea::Valley,
        rent_psf_month: 3.00,
        sale_psf: 650.0,
        cap_rate: 0.0510,
        linkage_fee_psf: 10.0,
    },
    SubmarketData {
        area: MarketArea::SouthLa,
        rent_psf_month: 2.60,
        sale_psf: 575.0,
        cap_rate: 0.0525,
        linkage_fee_psf: 8.0,
    },
];

pub fn submarket(area: MarketArea) -> &'static SubmarketData {
    SUBMARKETS
        .iter()
        .find(|entry| entry.area == area)
        .unwrap_or_else(|| unreachable!("submarket table covers every market area"))
}

/// Construction-cost stance applied to hard costs in cost-sensitivity runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostTier {
    Aggressive,
    Standard,
    Conservative,
}

impl CostTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Aggressive, Self::Standard, Self::Conservative]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Aggressive => "Aggressive",
            Self::Standard => "Standard",
            Self::Conservative => "Conservative",
        }
    }

    pub const fn hard_cost_multiplier(self) -> f64 {
        match self {
            Self::Aggressive => 0.90,
            Self::Standard => 1.00,
            Self::Conservative => 1.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stronger_submarkets_carry_lower_cap_rates() {
        let westside = submarket(MarketArea::Westside);
        let south = submarket(MarketArea::SouthLa);
        assert!(westside.rent_psf_month > south.rent_psf_month);
        assert!(westside.cap_rate < south.cap_rate);
        assert!(westside.linkage_fee_psf > south.linkage_fee_psf);
    }

    #[test]
    fn cost_tiers_bracket_standard() {
        assert!(CostTier::Aggressive.hard_cost_multiplier() < 1.0);
        assert_eq!(CostTier::Standard.hard_cost_multiplier(), 1.0);
        assert!(CostTier::Conservative.hard_cost_multiplier() > 1.0);
    }
}
