use glam::Vec4;

use crate::reaction_diffusion::ReactionDiffusionField;
use crate::types::RenderingStyle;
use crate::uniforms::DisplayUniforms;

pub fn to_rgba8(field: &ReactionDiffusionField, uniforms: &DisplayUniforms) -> Vec<u8> {
    let style = uniforms.style();
    let stops = active_stops(&uniforms.color_stops);
    let mut rgba = Vec::with_capacity(field.a().len() * 4);

    for (&a, &b) in field.a().iter().zip(field.b()) {
        let [r, g, bl] = match style {
            Some(RenderingStyle::Gradient) => gradient_color(&stops, (a - b).clamp(0.0, 1.0)),
            Some(RenderingStyle::RedBlobOriginal) => red_blob(a, b, [1.0, 0.5, 0.25]),
            Some(RenderingStyle::RedBlobAlt1) => red_blob(a, b, [0.25, 0.6, 1.0]),
            Some(RenderingStyle::RedBlobAlt2) => red_blob(a, b, [0.9, 0.2, 0.8]),
            Some(RenderingStyle::Rainbow) => spectral_color((b * 3.0).clamp(0.0, 1.0)),
            Some(RenderingStyle::BlackAndWhite) => {
                let v = smoothstep(0.45, 0.55, a - b);
                [v, v, v]
            }
            Some(RenderingStyle::Raw) | None => [a, b, 0.0],
        };

        rgba.extend_from_slice(&[to_byte(r), to_byte(g), to_byte(bl), 255]);
    }

    rgba
}

/// Stops that carry a color, sorted by threshold. Inactive stops (and stops
/// whose color was wiped by the inactive marker) are skipped.
fn active_stops(stops: &[Vec4]) -> Vec<Vec4> {
    let mut active: Vec<Vec4> = stops
        .iter()
        .copied()
        .filter(|stop| stop.cmpge(Vec4::ZERO).all())
        .collect();
    active.sort_by(|l, r| l.w.total_cmp(&r.w));
    active
}

fn gradient_color(stops: &[Vec4], t: f32) -> [f32; 3] {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0.0, 0.0, 0.0];
    };
    if t <= first.w {
        return first.truncate().to_array();
    }

    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t >= lo.w && t <= hi.w {
            let span = hi.w - lo.w;
            let alpha = if span > 0.0 { (t - lo.w) / span } else { 1.0 };
            return lerp(lo.truncate().to_array(), hi.truncate().to_array(), alpha);
        }
    }

    last.truncate().to_array()
}

fn red_blob(a: f32, b: f32, tint: [f32; 3]) -> [f32; 3] {
    let v = (a - b).clamp(0.0, 1.0);
    let edge = (1.0 - (2.0 * v - 1.0).abs()).powf(2.0);
    [
        (v * tint[0] + edge * 0.3).clamp(0.0, 1.0),
        (v * tint[1] + edge * 0.3).clamp(0.0, 1.0),
        (v * tint[2] + edge * 0.3).clamp(0.0, 1.0),
    ]
}

fn spectral_color(t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    let anchors = [
        (0.00, [0.02, 0.03, 0.13]),
        (0.25, [0.00, 0.46, 0.95]),
        (0.50, [0.05, 0.92, 0.35]),
        (0.75, [0.98, 0.86, 0.10]),
        (1.00, [0.95, 0.12, 0.18]),
    ];

    for pair in anchors.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t >= t0 && t <= t1 {
            return lerp(c0, c1, (t - t0) / (t1 - t0));
        }
    }

    anchors[anchors.len() - 1].1
}

fn lerp(from: [f32; 3], to: [f32; 3], alpha: f32) -> [f32; 3] {
    [
        from[0] + (to[0] - from[0]) * alpha,
        from[1] + (to[1] - from[1]) * alpha,
        from[2] + (to[2] - from[2]) * alpha,
    ]
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0) as u8
}
