use crate::site::HeightDistrict;

/// FAR and envelope caps attached to a height district.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightStandards {
    pub district: HeightDistrict,
    pub far_cap: f64,
    pub height_cap_ft: f64,
    pub story_cap: u32,
}

const STANDARDS: &[HeightStandards] = &[
    HeightStandards {
        district: HeightDistrict::Hd1Xl,
        far_cap: 1.5,
        height_cap_ft: 30.0,
        story_cap: 2,
    },
    HeightStandards {
        district: HeightDistrict::Hd1Vl,
        far_cap: 3.0,
        height_cap_ft: 45.0,
        story_cap: 3,
    },
    HeightStandards {
        district: HeightDistrict::Hd1L,
        far_cap: 3.0,
        height_cap_ft: 75.0,
        story_cap: 6,
    },
    HeightStandards {
        district: HeightDistrict::Hd1,
        far_cap: 3.0,
        height_cap_ft: 150.0,
        story_cap: 12,
    },
    HeightStandards {
        district: HeightDistrict::Hd2,
        far_cap: 6.0,
        height_cap_ft: 200.0,
        story_cap: 14,
    },
];

pub fn standards(district: HeightDistrict) -> &'static HeightStandards {
    STANDARDS
        .iter()
        .find(|entry| entry.district == district)
        .unwrap_or_else(|| unreachable!("height table covers every district variant"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_increase_from_xl_to_hd2() {
        let xl = standards(HeightDistrict::Hd1Xl);
        let vl = standards(HeightDistrict::Hd1Vl);
        let l = standards(HeightDistrict::Hd1L);
        let hd2 = standards(HeightDistrict::Hd2);
        assert!(xl.height_cap_ft < vl.height_cap_ft);
        assert!(vl.height_cap_ft < l.height_cap_ft);
        assert!(l.far_cap <= hd2.far_cap);
    }
}
