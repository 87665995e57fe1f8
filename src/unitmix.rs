use crate::site::{IncomeLevel, MixProfile};
use crate::tables::ami;
use serde::{Deserialize, Serialize};

/// Average net SF per bedroom type, ordered studio, 1BR, 2BR, 3BR.
pub const AVERAGE_UNIT_SF: [f64; 4] = [450.0, 650.0, 900.0, 1_150.0];

pub const BEDROOM_LABELS: [&str; 4] = ["Studio", "1BR", "2BR", "3BR"];

/// Allocation of a total unit count into bedroom types.
///
/// Invariant: the per-type counts always sum to `total` exactly; rounding
/// drift is absorbed by the largest bedroom type the profile actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMix {
    pub profile: MixProfile,
    pub studio: u32,
    pub one_bedroom: u32,
    pub two_bedroom: u32,
    pub three_bedroom: u32,
    pub total: u32,
}

impl UnitMix {
    pub const fn counts(&self) -> [u32; 4] {
        [
            self.studio,
            self.one_bedroom,
            self.two_bedroom,
            self.three_bedroom,
        ]
    }

    /// Total net sellable/leasable SF across all units.
    pub fn sellable_sf(&self) -> f64 {
        self.counts()
            .iter()
            .zip(AVERAGE_UNIT_SF)
            .map(|(&count, sf)| count as f64 * sf)
            .sum()
    }

    /// SF of the average unit in this mix.
    pub fn average_unit_sf(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.sellable_sf() / self.total as f64
        }
    }
}

/// Allocate `total_units` across bedroom types per the profile shares.
pub fn generate_mix(total_units: u32, profile: MixProfile) -> UnitMix {
    let shares = profile.shares();
    let mut counts = [0u32; 4];
    for (slot, share) in counts.iter_mut().zip(shares) {
        *slot = (total_units as f64 * share).round() as u32;
    }

    // Absorb rounding drift into the largest bedroom bucket the profile
    // uses, so units are never silently dropped or duplicated.
    let allocated: u32 = counts.iter().sum();
    let absorber = shares
        .iter()
        .rposition(|&share| share > 0.0)
        .unwrap_or(counts.len() - 1);
    if allocated > total_units {
        let excess = allocated - total_units;
        counts[absorber] = counts[absorber].saturating_sub(excess);
    } else {
        counts[absorber] += total_units - allocated;
    }

    UnitMix {
        profile,
        studio: counts[0],
        one_bedroom: counts[1],
        two_bedroom: counts[2],
        three_bedroom: counts[3],
        total: counts.iter().sum(),
    }
}

/// Per-bedroom-type rent line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitTypeRents {
    pub bedroom_label: &'static str,
    pub bedrooms: u32,
    pub count: u32,
    pub affordable_count: u32,
    pub average_sf: f64,
    pub market_rent_month: f64,
    pub affordable_rent_month: f64,
}

/// A unit mix priced out with the market/affordable split applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitMixWithRents {
    pub mix: UnitMix,
    pub types: Vec<UnitTypeRents>,
    pub market_units: u32,
    pub affordable_units: u32,
    pub income_level: IncomeLevel,
    pub blended_rent_month: f64,
    pub annual_gross_rent: f64,
}

/// Price a mix: affordable units are spread proportionally across bedroom
/// types (never concentrated in one type), then rounded per type with the
/// total preserved.
pub fn calculate_rents(
    mix: &UnitMix,
    affordable_pct: f64,
    income_level: IncomeLevel,
    market_rent_psf: f64,
) -> UnitMixWithRents {
    let counts = mix.counts();
    let affordable_target =
        ((mix.total as f64 * affordable_pct).ceil() as u32).min(mix.total);

    let mut affordable = [0u32; 4];
    for (slot, &count) in affordable.iter_mut().zip(&counts) {
        *slot = ((count as f64 * affordable_pct).round() as u32).min(count);
    }

    // Per-type rounding can land off the ceil'd target; nudge the counts,
    // largest types first, until they reconcile.
    let mut assigned: u32 = affordable.iter().sum();
    while assigned < affordable_target {
        let Some(idx) = (0..4)
            .rev()
            .find(|&idx| affordable[idx] < counts[idx]) else {
            break;
        };
        affordable[idx] += 1;
        assigned += 1;
    }
    while assigned > affordable_target {
        let Some(idx) = (0..4).rev().find(|&idx| affordable[idx] > 0) else {
            break;
        };
        affordable[idx] -= 1;
        assigned -= 1;
    }

    let mut types = Vec::with_capacity(4);
    let mut monthly_revenue = 0.0;
    for bedrooms in 0..4u32 {
        let idx = bedrooms as usize;
        let count = counts[idx];
        if count == 0 {
            continue;
        }
        let average_sf = AVERAGE_UNIT_SF[idx];
        let market_rent = average_sf * market_rent_psf;
        let affordable_rent = ami::max_monthly_rent(income_level, bedrooms);
        let affordable_count = affordable[idx];
        let market_count = count - affordable_count;
        monthly_revenue +=
            market_count as f64 * market_rent + affordable_count as f64 * affordable_rent;
        types.push(UnitTypeRents {
            bedroom_label: BEDROOM_LABELS[idx],
            bedrooms,
            count,
            affordable_count,
            average_sf,
            market_rent_month: market_rent,
            affordable_rent_month: affordable_rent,
        });
    }

    let affordable_units: u32 = affordable.iter().sum();
    let blended = if mix.total > 0 {
        monthly_revenue / mix.total as f64
    } else {
        0.0
    };

    UnitMixWithRents {
        mix: *mix,
        types,
        market_units: mix.total - affordable_units,
        affordable_units,
        income_level,
        blended_rent_month: blended,
        annual_gross_rent: monthly_revenue * 12.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_conserves_unit_count() {
        for profile in [
            MixProfile::Urban,
            MixProfile::Family,
            MixProfile::Affordable,
            MixProfile::Workforce,
        ] {
            for total in [1u32, 7, 15, 16, 33, 100, 251] {
                let mix = generate_mix(total, profile);
                assert_eq!(
                    mix.counts().iter().sum::<u32>(),
                    total,
                    "{profile:?} at {total} units"
                );
                assert_eq!(mix.total, total);
            }
        }
    }

    #[test]
    fn remainder_lands_in_largest_bedroom_bucket() {
        // Urban shares of 15: studio 4.5->5 (rounds up), 1BR 6.75->7,
        // 2BR 3, 3BR 0.75->1; sum 16, so the 3BR bucket absorbs the excess.
        let mix = generate_mix(15, MixProfile::Urban);
        assert_eq!(mix.total, 15);
        assert_eq!(mix.three_bedroom, 0);
        assert_eq!(mix.studio, 5);
    }

    #[test]
    fn affordable_units_spread_across_types() {
        let mix = generate_mix(40, MixProfile::Family);
        let priced = calculate_rents(&mix, 0.20, IncomeLevel::VeryLow, 3.50);
        assert_eq!(priced.affordable_units, 8);
        let spread = priced
            .types
            .iter()
            .filter(|line| line.affordable_count > 0)
            .count();
        assert!(spread > 1, "set-aside must not concentrate in one type");
        for line in &priced.types {
            assert!(line.affordable_count <= line.count);
        }
    }

    #[test]
    fn blended_rent_sits_between_market_and_affordable() {
        let mix = generate_mix(20, MixProfile::Urban);
        let priced = calculate_rents(&mix, 0.25, IncomeLevel::VeryLow, 4.00);
        let min_affordable = priced
            .types
            .iter()
            .map(|line| line.affordable_rent_month)
            .fold(f64::INFINITY, f64::min);
        let max_market = priced
            .types
            .iter()
            .map(|line| line.market_rent_month)
            .fold(0.0, f64::max);
        assert!(priced.blended_rent_month > min_affordable);
        assert!(priced.blended_rent_month < max_market);
        assert!((priced.annual_gross_rent
            - priced.blended_rent_month * 12.0 * mix.total as f64)
            .abs()
            < 1e-6);
    }

    #[test]
    fn full_set_aside_prices_every_unit_affordable() {
        let mix = generate_mix(30, MixProfile::Affordable);
        let priced = calculate_rents(&mix, 1.0, IncomeLevel::Low, 3.00);
        assert_eq!(priced.affordable_units, 30);
        assert_eq!(priced.market_units, 0);
    }
}
