//! Text labels.
//!
//! Radiance draws text as a `mixtext` pattern on a surface rather than as
//! geometry, so a text block becomes a flat rectangle covering the paragraph
//! with the text body mixed over the material. The first row's baseline sits
//! on the local origin, as in the host; Radiance counts rows from the top, so
//! the pattern origin is shifted up one row.

use crate::record::Record;
use crate::scene::TextData;

/// Character cell width relative to the text size.
const CHAR_ASPECT: f64 = 0.5;

/// Directory (relative to the scene root) holding text bodies next to geometry files.
pub const TEXT_DIR: &str = "geom";

/// Records for a text label. The caller writes `text.body` to
/// `geom/<identifier>.txt`.
pub fn make_text(text: &TextData, identifier: &str, material: &str, font: &str) -> Vec<Record> {
    let ysize = text.size;
    let xsize = ysize * CHAR_ASPECT;
    let shear = text.shear * ysize;

    let lines: Vec<&str> = text.body.split('\n').collect();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = longest as f64 * xsize + shear;
    let height = lines.len() as f64 * ysize;

    let mix = format!("{}_mat", identifier);
    let body = format!("{}/{}.txt", TEXT_DIR, identifier);

    vec![
        Record::new("void", "mixtext", mix.as_str())
            .strings([material, "void", font, body.as_str()])
            .reals([shear, ysize, 0.0, xsize, 0.0, 0.0, -shear, -ysize, 0.0])
            .rows(3),
        Record::new(mix.as_str(), "polygon", identifier)
            .reals([
                0.0,
                ysize,
                0.0,
                0.0,
                ysize - height,
                0.0,
                width,
                ysize - height,
                0.0,
                width,
                ysize,
                0.0,
            ])
            .rows(3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_rectangle() {
        let text = TextData {
            name: "Label".into(),
            body: "Hello\nRadiance".into(),
            size: 2.0,
            shear: 0.0,
        };
        let records = make_text(&text, "Label", "Ink", "helvet.fnt");
        assert_eq!(records.len(), 2);

        let mix = &records[0];
        assert_eq!(mix.identifier, "Label_mat");
        assert_eq!(mix.strings, vec!["Ink", "void", "helvet.fnt", "geom/Label.txt"]);
        assert_eq!(mix.reals, vec![0.0, 2.0, 0.0, 1.0, 0.0, 0.0, -0.0, -2.0, 0.0]);

        // 8 characters wide at 1 unit each, 2 rows of 2 units.
        let polygon = &records[1];
        assert_eq!(polygon.modifier, "Label_mat");
        assert_eq!(
            polygon.reals,
            vec![0.0, 2.0, 0.0, 0.0, -2.0, 0.0, 8.0, -2.0, 0.0, 8.0, 2.0, 0.0]
        );
    }
}
