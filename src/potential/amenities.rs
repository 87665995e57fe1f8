//! Banded marginal-rate tables for open space and bicycle parking. These are
//! published as per-band rates, not flat per-unit rates; a linear
//! approximation drifts at every band boundary, so the bands are applied
//! marginally and rounded once at the end.

/// `(units_through, rate)` pairs; the rate applies to units falling inside
/// the band.
type Band = (u32, f64);

fn banded_total(units: u32, bands: &[Band]) -> f64 {
    let mut remaining = units;
    let mut previous_limit = 0u32;
    let mut total = 0.0;
    for &(through, rate) in bands {
        if remaining == 0 {
            break;
        }
        let width = through.saturating_sub(previous_limit);
        let in_band = remaining.min(width);
        total += in_band as f64 * rate;
        remaining -= in_band;
        previous_limit = through;
    }
    total
}

const OPEN_SPACE_BANDS: &[Band] = &[(25, 125.0), (100, 100.0), (u32::MAX, 85.0)];

/// Common open space requirement in SF. Larger projects earn a marginal
/// discount per the banded schedule.
pub fn open_space_sf(units: u32) -> f64 {
    banded_total(units, OPEN_SPACE_BANDS)
}

const LONG_TERM_BANDS: &[Band] = &[
    (25, 1.0),
    (100, 1.0 / 1.5),
    (200, 0.5),
    (u32::MAX, 0.25),
];

/// Long-term bicycle stalls: 1 per unit for the first 25 units, 1 per 1.5
/// for units 26-100, 1 per 2 for 101-200, 1 per 4 beyond.
pub fn bicycle_long_term(units: u32) -> u32 {
    banded_total(units, LONG_TERM_BANDS).ceil() as u32
}

const SHORT_TERM_BANDS: &[Band] = &[
    (25, 0.1),
    (100, 1.0 / 15.0),
    (200, 0.05),
    (u32::MAX, 0.025),
];

/// Short-term bicycle stalls, floor of two for any project with units.
pub fn bicycle_short_term(units: u32) -> u32 {
    if units == 0 {
        return 0;
    }
    (banded_total(units, SHORT_TERM_BANDS).ceil() as u32).max(2)
}
