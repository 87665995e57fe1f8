use crate::site::IncomeLevel;

/// Area median income for a four-person household, the anchor every limit
/// scales from.
pub const BASE_AMI_FOUR_PERSON: f64 = 98_200.0;

/// Affordable rents take 30% of the applicable income limit.
const RENT_BURDEN: f64 = 0.30;

/// Household-size adjustment factors for sizes 1 through 6, per the published
/// income-limit schedule.
const HOUSEHOLD_FACTORS: [f64; 6] = [0.70, 0.80, 0.90, 1.00, 1.08, 1.16];

impl IncomeLevel {
    /// Percentage of AMI used as the rent basis for this level.
    pub const fn ami_percentage(self) -> f64 {
        match self {
            Self::ExtremelyLow => 0.30,
            Self::VeryLow => 0.50,
            Self::Low => 0.60,
            Self::Moderate => 1.10,
        }
    }
}

/// Assumed household size for a bedroom count: one person for a studio, then
/// 1.5 persons per bedroom.
fn household_size(bedrooms: u32) -> f64 {
    if bedrooms == 0 {
        1.0
    } else {
        1.0 + 1.5 * bedrooms as f64
    }
}

/// Linear interpolation over the published household-size factors.
fn household_factor(size: f64) -> f64 {
    let clamped = size.clamp(1.0, HOUSEHOLD_FACTORS.len() as f64);
    let lower = (clamped.floor() as usize - 1).min(HOUSEHOLD_FACTORS.len() - 1);
    let upper = (clamped.ceil() as usize - 1).min(HOUSEHOLD_FACTORS.len() - 1);
    let fraction = clamped - clamped.floor();
    HOUSEHOLD_FACTORS[lower] + (HOUSEHOLD_FACTORS[upper] - HOUSEHOLD_FACTORS[lower]) * fraction
}

/// Annual income limit for a level and household size.
pub fn income_limit(level: IncomeLevel, household: f64) -> f64 {
    BASE_AMI_FOUR_PERSON * level.ami_percentage() * household_factor(household)
}

/// Maximum restricted monthly rent for a bedroom count at an income level.
pub fn max_monthly_rent(level: IncomeLevel, bedrooms: u32) -> f64 {
    income_limit(level, household_size(bedrooms)) * RENT_BURDEN / 12.0
}
