/// Convert HSV to linear RGB channels in [0, 1].
///
/// `h` is in degrees and is expected in [0, 360). Sectors are half-open
/// 60° ranges; anything at or past 300 (including 360 itself) lands in the
/// magenta-to-red sector.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let [r, g, b] = if (0.0..60.0).contains(&h) {
        [c, x, 0.0]
    } else if (60.0..120.0).contains(&h) {
        [x, c, 0.0]
    } else if (120.0..180.0).contains(&h) {
        [0.0, c, x]
    } else if (180.0..240.0).contains(&h) {
        [0.0, x, c]
    } else if (240.0..300.0).contains(&h) {
        [x, 0.0, c]
    } else {
        [c, 0.0, x]
    };

    [r + m, g + m, b + m]
}
