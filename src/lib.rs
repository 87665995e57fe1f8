//! Zoning-incentive feasibility and land-residual engine for Los Angeles
//! multifamily sites.
//!
//! The pipeline runs program eligibility, computes a development envelope
//! per program, prices the envelope through a cost/revenue pro-forma, and
//! backs into land value under six underwriting methods. [`analysis::Analyzer`]
//! is the front door; the individual calculators are public for callers that
//! need only one stage.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod hbu;
pub mod potential;
pub mod proforma;
pub mod residual;
pub mod scenarios;
pub mod site;
pub mod tables;
pub mod telemetry;
pub mod unitmix;

pub use analysis::{AnalysisOptions, Analyzer, SiteAnalysis};
pub use config::AnalysisDefaults;
pub use error::{AppError, EngineError};
pub use site::SiteInput;
