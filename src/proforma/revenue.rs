use crate::config::AnalysisDefaults;
use crate::unitmix::UnitMixWithRents;
use serde::{Deserialize, Serialize};

/// Rental pro-forma from gross potential rent down to after-tax NOI and a
/// stabilized disposition value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentalRevenue {
    pub gross_potential_rent: f64,
    pub effective_gross_income: f64,
    pub operating_expenses: f64,
    pub noi: f64,
    pub noi_after_tax: f64,
    pub stabilized_value: f64,
    pub net_exit_proceeds: f64,
}

/// Compute the rental revenue stack.
///
/// Property tax depends on assessed (stabilized) value, which itself
/// capitalizes after-tax NOI, a circular definition. Substituting
/// `NOI_at = NOI - t * V` into `V = NOI_at / cap` gives the closed form
/// `V = NOI / (cap + t)`, so no iteration is needed and no floating-point
/// fixed-point drift can occur.
pub fn rental(
    rents: &UnitMixWithRents,
    cap_rate: f64,
    defaults: &AnalysisDefaults,
) -> RentalRevenue {
    let gross_potential_rent = rents.annual_gross_rent;
    let effective_gross_income = gross_potential_rent * (1.0 - defaults.vacancy_rate);
    let operating_expenses = effective_gross_income * defaults.opex_ratio;
    let noi = effective_gross_income - operating_expenses;

    let divisor = (cap_rate + defaults.property_tax_rate).max(defaults.min_target_rate);
    let stabilized_value = noi / divisor;
    let noi_after_tax = noi - stabilized_value * defaults.property_tax_rate;
    let net_exit_proceeds = stabilized_value * (1.0 - defaults.exit_cost_pct);

    RentalRevenue {
        gross_potential_rent,
        effective_gross_income,
        operating_expenses,
        noi,
        noi_after_tax,
        stabilized_value,
        net_exit_proceeds,
    }
}

/// For-sale (condo) revenue stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForSaleRevenue {
    pub sellable_sf: f64,
    pub gross_sales: f64,
    pub selling_costs: f64,
    pub net_sales: f64,
}

pub fn for_sale(sellable_sf: f64, sale_psf: f64, defaults: &AnalysisDefaults) -> ForSaleRevenue {
    let gross_sales = sellable_sf * sale_psf;
    let selling_costs = gross_sales * defaults.selling_cost_pct;
    ForSaleRevenue {
        sellable_sf,
        gross_sales,
        selling_costs,
        net_sales: gross_sales - selling_costs,
    }
}
