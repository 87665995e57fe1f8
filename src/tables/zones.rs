use crate::site::Zone;

/// Development standards attached to a base zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneStandards {
    pub zone: Zone,
    /// Lot area required per dwelling unit, SF.
    pub sf_per_unit: f64,
    /// FAR allowed by the zone itself, before height-district caps.
    pub base_far: f64,
    /// Buildable footprint as a fraction of lot area after required yards.
    pub lot_coverage: f64,
    /// Standard vehicle parking ratio, spaces per unit, before any
    /// program-specific or AB 2097 reduction.
    pub parking_per_unit: f64,
}

const STANDARDS: &[ZoneStandards] = &[
    ZoneStandards {
        zone: Zone::Rd1_5,
        sf_per_unit: 1_500.0,
        base_far: 3.0,
        lot_coverage: 0.55,
        parking_per_unit: 1.5,
    },
    ZoneStandards {
        zone: Zone::Rd2,
        sf_per_unit: 2_000.0,
        base_far: 3.0,
        lot_coverage: 0.55,
        parking_per_unit: 1.5,
    },
    ZoneStandards {
        zone: Zone::R3,
        sf_per_unit: 800.0,
        base_far: 3.0,
        lot_coverage: 0.60,
        parking_per_unit: 1.25,
    },
    ZoneStandards {
        zone: Zone::R4,
        sf_per_unit: 400.0,
        base_far: 3.0,
        lot_coverage: 0.65,
        parking_per_unit: 1.25,
    },
    ZoneStandards {
        zone: Zone::R5,
        sf_per_unit: 200.0,
        base_far: 6.0,
        lot_coverage: 0.70,
        parking_per_unit: 1.0,
    },
    ZoneStandards {
        zone: Zone::Ras3,
        sf_per_unit: 800.0,
        base_far: 3.0,
        lot_coverage: 0.70,
        parking_per_unit: 1.25,
    },
    ZoneStandards {
        zone: Zone::Ras4,
        sf_per_unit: 400.0,
        base_far: 3.0,
        lot_coverage: 0.75,
        parking_per_unit: 1.25,
    },
    ZoneStandards {
        zone: Zone::C2,
        sf_per_unit: 400.0,
        base_far: 1.5,
        lot_coverage: 0.80,
        parking_per_unit: 1.0,
    },
];

pub fn standards(zone: Zone) -> &'static ZoneStandards {
    STANDARDS
        .iter()
        .find(|entry| entry.zone == zone)
        .unwrap_or_else(|| unreachable!("zone table covers every Zone variant"))
}
