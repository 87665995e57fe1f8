use std::env;
use std::fmt;

/// Named underwriting assumptions shared across every calculator.
///
/// These were implicit magic numbers in older pro-forma spreadsheets; lifting
/// them into one struct lets a test override any of them without patching the
/// calculators themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisDefaults {
    /// Net leasable SF as a fraction of gross building SF.
    pub efficiency_ratio: f64,
    /// Assumed floor-to-floor height used to convert height limits to stories.
    pub floor_to_floor_ft: f64,
    pub vacancy_rate: f64,
    pub opex_ratio: f64,
    pub property_tax_rate: f64,
    pub selling_cost_pct: f64,
    pub exit_cost_pct: f64,
    pub profit_margin: f64,
    pub loan_to_cost: f64,
    pub interest_rate: f64,
    pub average_draw: f64,
    pub construction_months: f64,
    pub sellout_months: f64,
    pub equity_pct: f64,
    pub target_yoc: f64,
    pub target_margin: f64,
    pub target_equity_multiple: f64,
    pub target_irr: f64,
    pub target_roc: f64,
    /// Floor applied to every target-rate divisor so residuals stay finite.
    pub min_target_rate: f64,
    /// Practical minimum story count considered by the HBU sweep.
    pub min_stories: u32,
    /// Hard cap on the HBU story sweep regardless of zoning.
    pub max_story_cap: u32,
    pub above_grade_space_cost: f64,
    pub parking_space_sf: f64,
    pub lobby_sf: f64,
    pub amenity_sf_per_unit: f64,
    pub amenity_sf_minimum: f64,
    pub common_area_ratio: f64,
    pub log_level: String,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            efficiency_ratio: 0.85,
            floor_to_floor_ft: 11.0,
            vacancy_rate: 0.05,
            opex_ratio: 0.28,
            property_tax_rate: 0.011,
            selling_cost_pct: 0.05,
            exit_cost_pct: 0.02,
            profit_margin: 0.15,
            loan_to_cost: 0.65,
            interest_rate: 0.085,
            average_draw: 0.55,
            construction_months: 20.0,
            sellout_months: 10.0,
            equity_pct: 0.35,
            target_yoc: 0.0525,
            target_margin: 0.18,
            target_equity_multiple: 1.8,
            target_irr: 0.18,
            target_roc: 0.055,
            min_target_rate: 0.001,
            min_stories: 3,
            max_story_cap: 12,
            above_grade_space_cost: 35_000.0,
            parking_space_sf: 400.0,
            lobby_sf: 800.0,
            amenity_sf_per_unit: 15.0,
            amenity_sf_minimum: 1_000.0,
            common_area_ratio: 0.12,
            log_level: "info".to_string(),
        }
    }
}

impl AnalysisDefaults {
    /// Load defaults, letting `LANDRES_*` environment variables override the
    /// handful of assumptions operators tune most often.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut defaults = Self::default();
        if let Some(value) = read_rate("LANDRES_TARGET_YOC")? {
            defaults.target_yoc = value;
        }
        if let Some(value) = read_rate("LANDRES_TARGET_MARGIN")? {
            defaults.target_margin = value;
        }
        if let Some(value) = read_rate("LANDRES_EFFICIENCY_RATIO")? {
            defaults.efficiency_ratio = value;
        }
        if let Some(value) = read_rate("LANDRES_INTEREST_RATE")? {
            defaults.interest_rate = value;
        }
        if let Ok(level) = env::var("LANDRES_LOG_LEVEL") {
            defaults.log_level = level;
        }

        Ok(defaults)
    }
}

fn read_rate(key: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(key) {
        Ok(raw) => {
            let value: f64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidRate { key })?;
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate { key });
            }
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidRate { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRate { key } => {
                write!(f, "{key} must be a non-negative decimal rate")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
