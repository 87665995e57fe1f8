//! Cost stack and revenue model: hard costs by space type, entitlement-stage
//! soft costs, financing carry, and rental/for-sale revenue waterfalls.

pub mod costs;
pub mod revenue;

pub use costs::{
    cost_stack, plan_parking, stage_terms, CostStack, HardCosts, ParkingPlan, SoftCosts,
};
pub use revenue::{for_sale, rental, ForSaleRevenue, RentalRevenue};
