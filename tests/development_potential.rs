use landres::config::AnalysisDefaults;
use landres::potential;
use landres::site::{
    ConditionOverrides, HeightDistrict, IncomeLevel, MarketArea, Program, SiteInput, TcacTier,
    TransitContext, Zone,
};

fn r3_hollywood(major_stop_ft: Option<f64>) -> SiteInput {
    SiteInput {
        lot_sf: 7_500.0,
        zone: Zone::R3,
        height_district: HeightDistrict::Hd1L,
        market_area: MarketArea::Hollywood,
        tcac_tier: Some(TcacTier::HighestResource),
        transit: TransitContext {
            rail_station_ft: major_stop_ft,
            bus_corridor_ft: None,
            major_stop_ft,
        },
        very_high_fire_hazard: false,
        coastal_zone: false,
        sea_level_rise: false,
        corridor_adjacent: false,
        conditions: ConditionOverrides::default(),
    }
}

#[test]
fn by_right_and_density_bonus_round_in_opposite_directions() {
    let defaults = AnalysisDefaults::default();
    let site = r3_hollywood(None);

    // 7,500 SF at 800 SF/DU: floor gives 9, the bonus base ceils to 10.
    let by_right = potential::calculate(&site, Program::ByRight, None, IncomeLevel::Low, &defaults);
    assert_eq!(by_right.total_units, 9);

    let bonus = potential::calculate(
        &site,
        Program::StateDensityBonus,
        None,
        IncomeLevel::VeryLow,
        &defaults,
    );
    assert_eq!(bonus.base_units, 10);
    assert_eq!(bonus.total_units, 15);
    assert_eq!(bonus.affordable_units, 4);
}

#[test]
fn every_bonus_program_beats_by_right_on_units() {
    let defaults = AnalysisDefaults::default();
    let site = r3_hollywood(Some(600.0));
    let by_right = potential::calculate(&site, Program::ByRight, None, IncomeLevel::Low, &defaults);

    for program in [
        Program::StateDensityBonus,
        Program::MiipTransit,
        Program::Ahip,
        Program::Sb79,
    ] {
        let envelope = potential::calculate(&site, program, None, IncomeLevel::VeryLow, &defaults);
        assert!(
            envelope.total_units > by_right.total_units,
            "{} should outbuild by-right",
            program.label()
        );
    }
}

#[test]
fn transit_tier_one_unlocks_the_largest_miip_package() {
    let defaults = AnalysisDefaults::default();
    let near = potential::calculate(
        &r3_hollywood(Some(600.0)),
        Program::MiipTransit,
        Some("T1"),
        IncomeLevel::VeryLow,
        &defaults,
    );
    let outer = potential::calculate(
        &r3_hollywood(Some(2_500.0)),
        Program::MiipTransit,
        Some("T3"),
        IncomeLevel::VeryLow,
        &defaults,
    );
    assert!(near.total_units > outer.total_units);
    assert!(near.total_far > outer.total_far);
    assert!(near.total_height_ft > outer.total_height_ft);
}

#[test]
fn amenity_requirements_follow_the_banded_schedules() {
    let defaults = AnalysisDefaults::default();
    let mut site = r3_hollywood(Some(600.0));
    site.lot_sf = 40_000.0;
    let envelope = potential::calculate(
        &site,
        Program::MiipTransit,
        Some("T1"),
        IncomeLevel::VeryLow,
        &defaults,
    );
    let units = envelope.total_units;
    assert!(units > 25, "need a multi-band unit count for this check");

    // First 25 units at the top open-space rate, the rest cheaper.
    let flat_top_rate = units as f64 * 125.0;
    assert!(envelope.open_space_sf < flat_top_rate);
    assert!(envelope.open_space_sf > units as f64 * 85.0);
    assert!(envelope.bicycle_short_term >= 2);
}

#[test]
fn parking_disappears_near_transit_and_halves_under_bonus_law() {
    let defaults = AnalysisDefaults::default();

    let near = potential::calculate(
        &r3_hollywood(Some(900.0)),
        Program::StateDensityBonus,
        None,
        IncomeLevel::VeryLow,
        &defaults,
    );
    assert_eq!(near.parking_spaces, 0);

    let far = potential::calculate(
        &r3_hollywood(Some(4_000.0)),
        Program::StateDensityBonus,
        None,
        IncomeLevel::VeryLow,
        &defaults,
    );
    // 15 units at the bonus-law 0.5 ratio, ceiled.
    assert_eq!(far.parking_spaces, 8);

    let standard = potential::calculate(
        &r3_hollywood(None),
        Program::ByRight,
        None,
        IncomeLevel::Low,
        &defaults,
    );
    // 9 units at the R3 ratio of 1.25, ceiled.
    assert_eq!(standard.parking_spaces, 12);
}
