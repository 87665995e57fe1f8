//! Static reference tables: zone standards, height districts, construction
//! types, AMI rents, incentive-program tiers, and submarket data.
//!
//! Everything here is immutable after process start, so tables may be shared
//! across concurrent analyses without synchronization.

pub mod ami;
pub mod construction;
pub mod height;
pub mod market;
pub mod programs;
pub mod zones;

pub use construction::{ConstructionSpec, ConstructionType, SpaceRates};
pub use height::HeightStandards;
pub use market::{CostTier, SubmarketData};
pub use programs::{AhipIncentives, MiipTier, ScaleRow, Sb79Tier};
pub use zones::ZoneStandards;
