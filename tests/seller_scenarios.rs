use landres::config::AnalysisDefaults;
use landres::potential;
use landres::scenarios;
use landres::site::{
    ConditionOverrides, EntitlementStage, HeightDistrict, IncomeLevel, MarketArea, MixProfile,
    Program, SiteInput, TransitContext, Zone,
};

fn hollywood_site() -> SiteInput {
    SiteInput {
        lot_sf: 10_000.0,
        zone: Zone::R4,
        height_district: HeightDistrict::Hd1L,
        market_area: MarketArea::Hollywood,
        tcac_tier: None,
        transit: TransitContext {
            rail_station_ft: Some(700.0),
            bus_corridor_ft: Some(250.0),
            major_stop_ft: Some(700.0),
        },
        very_high_fire_hazard: false,
        coastal_zone: false,
        sea_level_rise: false,
        corridor_adjacent: false,
        conditions: ConditionOverrides::default(),
    }
}

fn run_matrix() -> scenarios::SellerAnalysis {
    let defaults = AnalysisDefaults::default();
    let site = hollywood_site();
    let envelope = potential::calculate(
        &site,
        Program::StateDensityBonus,
        None,
        IncomeLevel::VeryLow,
        &defaults,
    );
    scenarios::analyze(
        &site,
        &envelope,
        EntitlementStage::RawLand,
        MixProfile::Urban,
        &defaults,
    )
}

#[test]
fn matrix_has_the_full_tier_counts() {
    let seller = run_matrix();
    assert_eq!(seller.build_hold.len(), 5);
    assert_eq!(seller.build_sell.len(), 5);
    assert_eq!(seller.cost_sensitivity.len(), 3);
}

#[test]
fn demanding_buyers_pay_less_for_land() {
    let seller = run_matrix();
    for pair in seller.build_hold.windows(2) {
        assert!(
            pair[0].land_value >= pair[1].land_value,
            "a higher required yield must not raise the residual"
        );
        assert!(pair[0].assumption < pair[1].assumption);
    }
    for pair in seller.build_sell.windows(2) {
        assert!(pair[0].land_value >= pair[1].land_value);
    }
}

#[test]
fn cheaper_construction_raises_the_residual() {
    let seller = run_matrix();
    let aggressive = &seller.cost_sensitivity[0];
    let conservative = &seller.cost_sensitivity[2];
    assert!(aggressive.assumption < conservative.assumption);
    assert!(aggressive.land_value > conservative.land_value);
}

#[test]
fn viability_flag_matches_the_sign_of_the_residual() {
    let seller = run_matrix();
    for row in seller
        .build_hold
        .iter()
        .chain(&seller.build_sell)
        .chain(&seller.cost_sensitivity)
    {
        assert_eq!(row.viable, row.land_value > 0.0, "{}", row.label);
    }
}

#[test]
fn guidance_is_ordered_and_sourced_from_viable_rows() {
    let seller = run_matrix();
    match (&seller.guidance, &seller.warning) {
        (Some(guidance), None) => {
            assert!(guidance.conservative <= guidance.recommended);
            assert!(guidance.recommended <= guidance.aggressive);
            let labels: Vec<&str> = seller
                .build_hold
                .iter()
                .chain(&seller.build_sell)
                .map(|row| row.label.as_str())
                .collect();
            assert!(labels.contains(&guidance.aggressive_source.as_str()));
            assert!(labels.contains(&guidance.conservative_source.as_str()));
        }
        (None, Some(warning)) => assert!(warning.contains("No buyer profile")),
        other => panic!("guidance and warning are mutually exclusive: {other:?}"),
    }
}

#[test]
fn csv_export_carries_every_row() {
    let seller = run_matrix();
    let mut buffer = Vec::new();
    seller.write_csv(&mut buffer).expect("csv export");
    let text = String::from_utf8(buffer).expect("utf8 csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "table,label,assumption,land_value,land_psf,viable");
    assert_eq!(lines.len(), 1 + 5 + 5 + 3);
    assert!(lines.iter().any(|line| line.starts_with("build_hold,Institutional")));
    assert!(lines.iter().any(|line| line.starts_with("cost_sensitivity,Conservative")));
}
