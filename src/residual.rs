//! Land-residual methods. Each method answers the same question from a
//! different buyer's seat: given a required return, what is left over for
//! the land after development cost?

use crate::config::AnalysisDefaults;
use crate::proforma::{ForSaleRevenue, RentalRevenue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualMethod {
    YieldOnCost,
    DevelopmentMargin,
    EquityMultiple,
    LeveredIrr,
    UnleveredRoc,
    ForSale,
}

impl ResidualMethod {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::YieldOnCost,
            Self::DevelopmentMargin,
            Self::EquityMultiple,
            Self::LeveredIrr,
            Self::UnleveredRoc,
            Self::ForSale,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::YieldOnCost => "Yield on Cost",
            Self::DevelopmentMargin => "Development Margin",
            Self::EquityMultiple => "Equity Multiple",
            Self::LeveredIrr => "Levered IRR",
            Self::UnleveredRoc => "Unlevered Return on Cost",
            Self::ForSale => "For-Sale Residual",
        }
    }
}

/// Cost/revenue base shared by every method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualInputs {
    pub total_dev_cost: f64,
    pub noi_after_tax: f64,
    pub stabilized_value: f64,
    pub net_exit_proceeds: f64,
    pub gross_sales: f64,
    pub net_sales: f64,
}

impl ResidualInputs {
    pub fn from_proforma(
        total_dev_cost: f64,
        rental: &RentalRevenue,
        for_sale: &ForSaleRevenue,
    ) -> Self {
        Self {
            total_dev_cost,
            noi_after_tax: rental.noi_after_tax,
            stabilized_value: rental.stabilized_value,
            net_exit_proceeds: rental.net_exit_proceeds,
            gross_sales: for_sale.gross_sales,
            net_sales: for_sale.net_sales,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualResult {
    pub method: ResidualMethod,
    pub land_value: f64,
    pub implied_land_psf: f64,
    /// True when the target rate had to be clamped to the safety floor; the
    /// number is still usable but a diagnostic should surface the clamp.
    pub rate_clamped: bool,
}

/// Clamp a divisor rate to the configured floor so a careless zero target
/// can never produce an infinite or NaN land value.
fn guarded_rate(rate: f64, defaults: &AnalysisDefaults) -> (f64, bool) {
    if rate.is_finite() && rate >= defaults.min_target_rate {
        (rate, false)
    } else {
        (defaults.min_target_rate, true)
    }
}

/// Multiplied targets (margins) only need to be finite, not floored.
fn guarded_fraction(target: f64) -> (f64, bool) {
    if target.is_finite() {
        (target, false)
    } else {
        (0.0, true)
    }
}

/// Run one residual method against the shared base. `target` is the method's
/// own unit: a rate for YOC/ROC/IRR, a fraction for margin, a multiple for
/// equity-multiple, a profit fraction for for-sale.
pub fn residual(
    method: ResidualMethod,
    inputs: &ResidualInputs,
    target: f64,
    lot_sf: f64,
    defaults: &AnalysisDefaults,
) -> ResidualResult {
    let (land_value, rate_clamped) = match method {
        ResidualMethod::YieldOnCost => {
            let (rate, clamped) = guarded_rate(target, defaults);
            (inputs.noi_after_tax / rate - inputs.total_dev_cost, clamped)
        }
        ResidualMethod::DevelopmentMargin => {
            let (margin, clamped) = guarded_fraction(target);
            (
                inputs.net_exit_proceeds
                    - inputs.stabilized_value * margin
                    - inputs.total_dev_cost,
                clamped,
            )
        }
        ResidualMethod::EquityMultiple => {
            let (multiple, clamped) = guarded_rate(target, defaults);
            let equity = defaults.equity_pct;
            let denominator = ((1.0 - equity) + multiple * equity).max(defaults.min_target_rate);
            (
                inputs.net_exit_proceeds / denominator - inputs.total_dev_cost,
                clamped,
            )
        }
        ResidualMethod::LeveredIrr => {
            let (rate, clamped) = guarded_rate(target, defaults);
            let years = (defaults.construction_months + defaults.sellout_months) / 12.0;
            let growth = (1.0 + rate).powf(years);
            let equity = defaults.equity_pct;
            let denominator = ((1.0 - equity) + growth * equity).max(defaults.min_target_rate);
            (
                inputs.net_exit_proceeds / denominator - inputs.total_dev_cost,
                clamped,
            )
        }
        ResidualMethod::UnleveredRoc => {
            let (rate, clamped) = guarded_rate(target, defaults);
            (inputs.noi_after_tax / rate - inputs.total_dev_cost, clamped)
        }
        ResidualMethod::ForSale => {
            let (margin, clamped) = guarded_fraction(target);
            (
                inputs.net_sales - inputs.total_dev_cost - inputs.gross_sales * margin,
                clamped,
            )
        }
    };

    let implied_land_psf = if lot_sf > 0.0 { land_value / lot_sf } else { 0.0 };

    ResidualResult {
        method,
        land_value,
        implied_land_psf,
        rate_clamped,
    }
}

/// Primary/HBU residual when the inputs do not force a single use: the
/// better of for-sale and rental yield-on-cost. An exact tie goes to
/// for-sale; that tie-break is policy, not law, and callers can force a
/// method through `AnalysisOptions` instead.
pub fn resolve_hbu(for_sale: ResidualResult, rental_yoc: ResidualResult) -> ResidualResult {
    if rental_yoc.land_value > for_sale.land_value {
        rental_yoc
    } else {
        for_sale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inputs() -> ResidualInputs {
        ResidualInputs {
            total_dev_cost: 10_000_000.0,
            noi_after_tax: 700_000.0,
            stabilized_value: 13_000_000.0,
            net_exit_proceeds: 12_740_000.0,
            gross_sales: 15_000_000.0,
            net_sales: 14_250_000.0,
        }
    }

    #[test]
    fn yield_on_cost_formula() {
        let defaults = AnalysisDefaults::default();
        let result = residual(
            ResidualMethod::YieldOnCost,
            &sample_inputs(),
            0.05,
            10_000.0,
            &defaults,
        );
        assert_eq!(result.land_value, 700_000.0 / 0.05 - 10_000_000.0);
        assert_eq!(result.implied_land_psf, result.land_value / 10_000.0);
        assert!(!result.rate_clamped);
    }

    #[test]
    fn for_sale_formula() {
        let defaults = AnalysisDefaults::default();
        let result = residual(
            ResidualMethod::ForSale,
            &sample_inputs(),
            0.15,
            10_000.0,
            &defaults,
        );
        assert_eq!(
            result.land_value,
            14_250_000.0 - 10_000_000.0 - 15_000_000.0 * 0.15
        );
    }

    #[test]
    fn zero_and_negative_targets_stay_finite() {
        let defaults = AnalysisDefaults::default();
        let inputs = sample_inputs();
        for method in ResidualMethod::ordered() {
            for target in [0.0, -0.5, f64::NAN] {
                let result = residual(method, &inputs, target, 7_500.0, &defaults);
                assert!(
                    result.land_value.is_finite(),
                    "{} with target {target} must stay finite",
                    method.label()
                );
                assert!(result.implied_land_psf.is_finite());
            }
        }
    }

    #[test]
    fn clamping_is_reported() {
        let defaults = AnalysisDefaults::default();
        let result = residual(
            ResidualMethod::YieldOnCost,
            &sample_inputs(),
            0.0,
            7_500.0,
            &defaults,
        );
        assert!(result.rate_clamped);
    }

    #[test]
    fn hbu_tie_goes_to_for_sale() {
        let defaults = AnalysisDefaults::default();
        let inputs = sample_inputs();
        let a = residual(ResidualMethod::ForSale, &inputs, 0.15, 7_500.0, &defaults);
        let mut b = residual(ResidualMethod::YieldOnCost, &inputs, 0.05, 7_500.0, &defaults);
        b.land_value = a.land_value;
        let winner = resolve_hbu(a, b);
        assert_eq!(winner.method, ResidualMethod::ForSale);
    }

    #[test]
    fn hbu_takes_the_larger_residual() {
        let defaults = AnalysisDefaults::default();
        let inputs = sample_inputs();
        let for_sale = residual(ResidualMethod::ForSale, &inputs, 0.15, 7_500.0, &defaults);
        let yoc = residual(ResidualMethod::YieldOnCost, &inputs, 0.05, 7_500.0, &defaults);
        let winner = resolve_hbu(for_sale, yoc);
        assert!(winner.land_value >= for_sale.land_value);
        assert!(winner.land_value >= yoc.land_value);
    }
}
