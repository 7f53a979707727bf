//! Light translation: photometric conversion and light geometry.
//!
//! Each light becomes a `<name>.rad` file holding a light material followed by
//! the geometry that carries it, placed into the scene by `lights.lum`.

use crate::record::{push_records, Record};
use crate::scene::{LightData, LightShape};
use crate::types::clean_name;
use log::warn;

/// Fixed analytic sun used for every sun lamp.
pub const SUN: &str = "
void light solar
0
0
3 2.72e+06 2.72e+06 2.72e+06

solar source sun
0
0
4 -0.489041 -0.851114 0.190903 0.5

";

/// Sky material file, written when a sky dome is requested.
pub const SKY_MAT: &str = "
# Hemispherical Blue Sky
# Sunny with sun for Perth W.A
# on 16th March, 10:00 am
# !gensky 3 16 10 +s -a -32 -o 115.6 -m 120
void light solar
0
0
3 2.72e+06 2.72e+06 2.72e+06

solar source sun
0
0
4 -0.489041 -0.851114 0.190903 0.5

void brightfunc skyfunc
2 skybr skybright.cal
0
7 1 3.76e+00 3.72e+00 2.98e-01 -0.489041 -0.851114 0.190903

";

/// Sky and ground glow sources.
pub const SKY_RAD: &str = "
skyfunc glow skyglow
0
0
4 .85 1.04 1.2 0

skyglow source sky
0
0
4 0 0 1 180

skyfunc glow groundglow
0
0
4 .8 1.1 .8 0

groundglow source ground
0
0
4 0 0 -1 180

";

/// Manual calibration from scene light energy to Radiance luminance:
/// `mantissa * 10^power` per unit of energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyScale {
    pub mantissa: f64,
    pub power: i32,
}

impl Default for EnergyScale {
    fn default() -> Self {
        Self {
            mantissa: 0.5,
            power: 0,
        }
    }
}

impl EnergyScale {
    pub fn new(mantissa: f64, power: i32) -> Self {
        Self { mantissa, power }
    }

    pub fn factor(&self) -> f64 {
        self.mantissa * 10f64.powi(self.power)
    }

    /// `color * energy * mantissa * 10^power`.
    pub fn luminance(&self, light: &LightData) -> [f64; 3] {
        let k = light.energy * self.factor();
        light.color.map(|c| c * k)
    }
}

/// A translated light.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRecord {
    /// File stem of `<name>.rad`.
    pub name: String,
    pub records: Vec<Record>,
    /// Sun lamp text appended after the records.
    pub sun: bool,
    /// The light asked for a sky dome.
    pub wants_sky: bool,
}

impl LightRecord {
    pub fn to_rad(&self) -> String {
        let mut out = String::new();
        push_records(&mut out, &self.records);
        if self.sun {
            out.push_str(SUN);
        }
        out
    }
}

/// Translate one light. `lamp_radius` is the nominal bulb radius.
pub fn make_light(light: &LightData, scale: EnergyScale, lamp_radius: f64) -> LightRecord {
    let name = clean_name(&light.name);
    let light_mat = format!("{}.light", name);
    let [r, g, b] = scale.luminance(light);

    let material = match light.shape {
        LightShape::Spot { spot_size } => Record::new("void", "spotlight", light_mat.as_str())
            .reals([r, g, b, spot_size.to_degrees(), 0.0, 0.0, -1.0]),
        _ => Record::new("void", "light", light_mat.as_str()).reals([r, g, b]),
    };

    let mut records = vec![material];
    let mut sun = false;
    let mut wants_sky = false;

    match light.shape {
        LightShape::Point => {
            records.push(
                Record::new(light_mat.as_str(), "sphere", name.as_str())
                    .reals([0.0, 0.0, 0.0, lamp_radius]),
            );
        }
        LightShape::Sun { sky } => {
            sun = true;
            wants_sky = sky;
        }
        LightShape::Spot { spot_size } => {
            // Disk of bulb radius set back from the apex so its rim touches the cone.
            let half_sin = (spot_size / 2.0).sin();
            let distance = if half_sin > f64::EPSILON {
                lamp_radius / half_sin
            } else {
                warn!("spot light '{}' has a zero cone angle", light.name);
                0.0
            };
            records.push(
                Record::new(light_mat.as_str(), "ring", name.as_str())
                    .reals([0.0, 0.0, -distance, 0.0, 0.0, -1.0, 0.0, lamp_radius])
                    .rows(3),
            );
        }
        LightShape::Area { size, size_y } => {
            let dx = size / 2.0;
            let dy = size_y.unwrap_or(size) / 2.0;
            records.push(
                Record::new(light_mat.as_str(), "polygon", name.as_str())
                    .reals([-dx, -dy, 0.0, -dx, dy, 0.0, dx, dy, 0.0, dx, -dy, 0.0])
                    .rows(3),
            );
        }
        LightShape::Hemi => {}
    }

    LightRecord {
        name,
        records,
        sun,
        wants_sky,
    }
}
