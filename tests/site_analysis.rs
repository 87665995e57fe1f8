use landres::analysis::{AnalysisOptions, Analyzer, SiteAnalysis};
use landres::config::AnalysisDefaults;
use landres::residual::ResidualMethod;
use landres::site::{
    ConditionOverrides, EntitlementStage, HeightDistrict, IncomeLevel, MarketArea, MixProfile,
    Program, SiteInput, TcacTier, TransitContext, Zone,
};

fn transit_rich_site() -> SiteInput {
    SiteInput {
        lot_sf: 12_000.0,
        zone: Zone::R3,
        height_district: HeightDistrict::Hd1L,
        market_area: MarketArea::Hollywood,
        tcac_tier: Some(TcacTier::HighestResource),
        transit: TransitContext {
            rail_station_ft: Some(500.0),
            bus_corridor_ft: Some(200.0),
            major_stop_ft: Some(500.0),
        },
        very_high_fire_hazard: false,
        coastal_zone: false,
        sea_level_rise: false,
        corridor_adjacent: true,
        conditions: ConditionOverrides::default(),
    }
}

#[test]
fn full_pipeline_produces_a_complete_envelope() {
    let analyzer = Analyzer::new(AnalysisDefaults::default());
    let analysis = analyzer.analyze(&transit_rich_site(), AnalysisOptions::default());

    assert_eq!(analysis.eligibility.results.len(), Program::ordered().len());
    assert!(!analysis.potentials.is_empty());
    assert_eq!(analysis.residuals.len(), 6);
    assert!(analysis.highest_best_use.is_some());
    assert_eq!(analysis.seller.build_hold.len(), 5);
}

#[test]
fn miip_transit_supersedes_the_weaker_miip_paths() {
    let analyzer = Analyzer::new(AnalysisDefaults::default());
    let analysis = analyzer.analyze(&transit_rich_site(), AnalysisOptions::default());

    let transit = analysis
        .eligibility
        .result_for(Program::MiipTransit)
        .expect("transit result present");
    assert!(transit.eligible);
    assert_eq!(transit.tier.as_deref(), Some("T1"));

    for program in [Program::MiipOpportunity, Program::MiipCorridor] {
        let result = analysis.eligibility.result_for(program).unwrap();
        assert!(!result.eligible);
        assert!(result.reason.as_deref().unwrap().contains("priority"));
    }

    // Superseded programs get no envelope.
    assert!(analysis
        .potentials
        .iter()
        .all(|p| p.program != Program::MiipCorridor));
}

#[test]
fn analysis_round_trips_through_json() {
    let analyzer = Analyzer::new(AnalysisDefaults::default());
    let analysis = analyzer.analyze(&transit_rich_site(), AnalysisOptions::default());

    let json = serde_json::to_string(&analysis).expect("serialize");
    let restored: SiteAnalysis = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored.primary_program, analysis.primary_program);
    assert_eq!(restored.residuals, analysis.residuals);
    assert_eq!(restored.potentials, analysis.potentials);
    assert_eq!(
        restored.selected_residual.land_value,
        analysis.selected_residual.land_value
    );
}

#[test]
fn stage_advancement_never_lowers_the_headline_value() {
    let analyzer = Analyzer::new(AnalysisDefaults::default());
    let site = transit_rich_site();

    let mut previous = f64::NEG_INFINITY;
    for stage in EntitlementStage::ordered() {
        let options = AnalysisOptions {
            stage,
            ..AnalysisOptions::default()
        };
        let analysis = analyzer.analyze(&site, options);
        assert!(
            analysis.selected_residual.land_value >= previous,
            "{} priced below the prior stage",
            stage.label()
        );
        previous = analysis.selected_residual.land_value;
    }
}

#[test]
fn forced_method_and_profile_flow_through() {
    let analyzer = Analyzer::new(AnalysisDefaults::default());
    let options = AnalysisOptions {
        income_level: IncomeLevel::Low,
        mix_profile: MixProfile::Family,
        stage: EntitlementStage::Entitled,
        residual_method: Some(ResidualMethod::ForSale),
    };
    let analysis = analyzer.analyze(&transit_rich_site(), options);
    assert_eq!(analysis.selected_residual.method, ResidualMethod::ForSale);
    assert_eq!(analysis.options.income_level, IncomeLevel::Low);
    let primary = &analysis.potentials[0];
    assert!(primary.income_level == IncomeLevel::Low || primary.affordable_set_aside == 1.0);
}
