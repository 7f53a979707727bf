//! Material classification and translation into Radiance material records.

use crate::record::Record;
use crate::scene::MaterialData;
use crate::types::clean_name;
use glam::DVec3;

/// Transmission scale for `trans` materials. Empirical: Radiance documents
/// the range as 0..1, but doubling `1 - alpha` matches rendered output better.
pub const TRANSMISSION_FACTOR: f64 = 2.0;

/// Radiance material type chosen for a source material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialClass {
    Plastic,
    Metal,
    Mirror,
    Trans,
    Glow,
}

impl MaterialClass {
    /// Classify a material. The first matching rule wins:
    /// emission, transparency, mirror reflection, dim specular color, plastic.
    pub fn of(material: &MaterialData) -> Self {
        if material.emit > 0.0 {
            Self::Glow
        } else if material.use_transparency {
            Self::Trans
        } else if material.use_mirror {
            Self::Mirror
        } else if DVec3::from_array(material.specular_color).length() < 1.0 {
            Self::Metal
        } else {
            Self::Plastic
        }
    }

    pub fn radiance_type(self) -> &'static str {
        match self {
            Self::Plastic => "plastic",
            Self::Metal => "metal",
            Self::Mirror => "mirror",
            Self::Trans => "trans",
            Self::Glow => "glow",
        }
    }

    /// Number of real arguments the record carries.
    pub fn real_count(self) -> usize {
        match self {
            Self::Mirror => 3,
            Self::Glow => 4,
            Self::Plastic | Self::Metal => 5,
            Self::Trans => 7,
        }
    }
}

/// Translate a material into its record.
pub fn make_material(material: &MaterialData) -> Record {
    let class = MaterialClass::of(material);
    let color = match class {
        MaterialClass::Mirror => scale(material.mirror_color, material.reflect_factor),
        MaterialClass::Glow => scale(material.diffuse_color, material.emit),
        _ => scale(material.diffuse_color, material.diffuse_intensity),
    };

    let specularity =
        DVec3::from_array(material.specular_color).length() * material.specular_intensity * 0.2;
    let roughness = (1.0 - material.specular_hardness / 100.0) * 0.25;

    let mut reals = color.to_vec();
    match class {
        MaterialClass::Plastic | MaterialClass::Metal => reals.extend([specularity, roughness]),
        MaterialClass::Trans => {
            let transmission = (1.0 - material.alpha) * TRANSMISSION_FACTOR;
            reals.extend([specularity, roughness, transmission, transmission]);
        }
        // Maximum radius for glow sources.
        MaterialClass::Glow => reals.push(0.5),
        MaterialClass::Mirror => {}
    }
    debug_assert_eq!(reals.len(), class.real_count());

    Record::new("void", class.radiance_type(), clean_name(&material.name)).reals(reals)
}

fn scale(color: [f64; 3], factor: f64) -> [f64; 3] {
    color.map(|c| c * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flags(mirror: bool, trans: bool, emit: bool, dim_specular: bool) -> MaterialData {
        let mut material = MaterialData::new("M");
        material.use_mirror = mirror;
        material.use_transparency = trans;
        material.emit = if emit { 1.0 } else { 0.0 };
        material.specular_color = if dim_specular { [0.5; 3] } else { [1.0; 3] };
        material
    }

    #[test]
    fn test_classification_priority_matrix() {
        for bits in 0..16u8 {
            let (mirror, trans, emit, dim) =
                (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let expected = if emit {
                MaterialClass::Glow
            } else if trans {
                MaterialClass::Trans
            } else if mirror {
                MaterialClass::Mirror
            } else if dim {
                MaterialClass::Metal
            } else {
                MaterialClass::Plastic
            };
            assert_eq!(
                MaterialClass::of(&flags(mirror, trans, emit, dim)),
                expected,
                "mirror={} trans={} emit={} dim={}",
                mirror,
                trans,
                emit,
                dim
            );
        }
    }

    #[test]
    fn test_emissive_transparent_is_glow() {
        assert_eq!(MaterialClass::of(&flags(false, true, true, false)), MaterialClass::Glow);
    }

    #[test]
    fn test_plastic_record() {
        let mut material = MaterialData::new("Red Paint");
        material.diffuse_color = [1.0, 0.5, 0.0];
        material.diffuse_intensity = 0.8;
        material.specular_color = [1.0, 0.0, 0.0];
        material.specular_intensity = 0.5;
        material.specular_hardness = 50.0;

        let record = make_material(&material);
        assert_eq!(record.kind, "plastic");
        assert_eq!(record.identifier, "Red_Paint");
        let expected = [0.8, 0.4, 0.0, 0.1, 0.125];
        assert_eq!(record.reals.len(), 5);
        for (got, want) in record.reals.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_trans_record() {
        let mut material = MaterialData::new("Glass");
        material.use_transparency = true;
        material.alpha = 0.25;
        let record = make_material(&material);
        assert_eq!(record.kind, "trans");
        assert_eq!(record.reals.len(), 7);
        assert_relative_eq!(record.reals[5], 1.5);
        assert_relative_eq!(record.reals[6], 1.5);
    }

    #[test]
    fn test_mirror_and_glow_records() {
        let mut material = MaterialData::new("Chrome");
        material.use_mirror = true;
        material.mirror_color = [1.0, 1.0, 0.5];
        material.reflect_factor = 0.5;
        let record = make_material(&material);
        assert_eq!(record.kind, "mirror");
        assert_eq!(record.reals, vec![0.5, 0.5, 0.25]);

        let mut material = MaterialData::new("Neon");
        material.diffuse_color = [0.0, 1.0, 0.0];
        material.emit = 2.0;
        let record = make_material(&material);
        assert_eq!(record.kind, "glow");
        assert_eq!(record.reals, vec![0.0, 2.0, 0.0, 0.5]);
    }
}
