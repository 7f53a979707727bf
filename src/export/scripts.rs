//! Convenience scripts and support files for running the Radiance tools.

/// Calculation of 2D picture coordinates, shipped beside exported textures
/// because some Radiance installs cannot find their own copy.
pub const PICTURE_CAL_BODY: &str = "
{
\tCalculation of 2d picture coordinates.
\tPicture is projected onto xy plane with lower left corner at origin.

\tA1\t\t- Ratio of height to width for tiles.
\tA2\t\t- Average red value for fadered or grey for fadegrey
\tA3\t\t- Average green value for fadegreen
\tA4\t\t- Average blue value for fadeblue
}
\t\t\t\t\t{ straight coordinates }
pic_u = Px;
pic_v = Py;
\t\t\t\t\t{ compute borders for mixfunc }
inpic = if(and(pic_u, and(pic_v,
\t\tif(pic_aspect-1, and(1-pic_u,pic_aspect-pic_v),
\t\t\t\tand(1/pic_aspect-pic_u,1-pic_v) ) ) ), 1, 0);
\t\t\t\t\t{ standard tiling }
tile_u = mod(pic_u,max(1,1/pic_aspect));
tile_v = mod(pic_v,max(1,pic_aspect));
\t\t\t\t\t{ tiling with inversion matching }
match_u = tri(pic_u,max(1,1/pic_aspect));
match_v = tri(pic_v,max(1,pic_aspect));
\t\t\t\t\t{ brick-type staggering }
stag_u = if(pic_aspect-1,
\t\tfrac(if(frac(pic_v/pic_aspect/2)-.5,pic_u,pic_u+.5)),
\t\tmod(if(frac(pic_v/2)-.5,pic_u,pic_u+.5/pic_aspect),
\t\t\t1/pic_aspect));
stag_v = tile_v;

pic_aspect = if(arg(0)-.5, arg(1), 1);
\t\t\t\t\t{ fade colors for distant viewing }
fadered(r,g,b) = fade(r, A2, T*.1);
fadegreen(r,g,b) = fade(g, A3, T*.1);
fadeblue(r,g,b) = fade(b, A4, T*.1);
fadegrey(r,g,b) = fade(grey(r,g,b), A2, T*.1);
";

/// Camera used by the scripts when the scene has none.
pub const DEFAULT_CAMERA: &str = "Camera";

/// Script flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Posix,
    Batch,
}

impl Shell {
    pub const ALL: [Shell; 2] = [Shell::Posix, Shell::Batch];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Posix => "sh",
            Self::Batch => "bat",
        }
    }
}

/// `(file name, contents)` for the four pipeline steps in both shells:
/// build the octree, preview, render, convert to BMP.
pub fn run_scripts(scene_files: &[&str], camera: Option<&str>) -> Vec<(String, String)> {
    let camera = camera.unwrap_or(DEFAULT_CAMERA);
    let steps = [
        format!("oconv {} > scene.oct", scene_files.join(" ")),
        format!("rvu -vf {}.vf scene.oct", camera),
        format!("rpict -vf {}.vf scene.oct > scene.hdr", camera),
        "ra_bmp -e auto scene.hdr > scene.bmp".to_string(),
    ];

    let mut scripts = Vec::with_capacity(steps.len() * Shell::ALL.len());
    for shell in Shell::ALL {
        for (i, step) in steps.iter().enumerate() {
            let mut body = format!("{}\n", step);
            if shell == Shell::Batch {
                body.push_str("pause\n");
            }
            scripts.push((format!("run{}.{}", i + 1, shell.extension()), body));
        }
    }
    scripts
}
