//! Phong terms of the shading engine.
//!
//! All colour arithmetic is per channel: `Vec3` products are component-wise,
//! so the three channels only share the geometric factors.

use whitted_core::{Color, GlobalData, Light, Material};
use whitted_math::Vec3;

/// Mirror `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// A light as seen from one surface point.
#[derive(Debug, Clone, Copy)]
pub struct LightSample {
    /// Unit vector from the point towards the light
    pub direction: Vec3,
    /// Distance to the light; infinite for directional lights
    pub distance: f32,
    /// Light colour after optional distance falloff
    pub color: Color,
}

impl LightSample {
    /// Sample `light` at `point`. `None` when no direction can be formed,
    /// e.g. a point light sitting exactly on the surface.
    pub fn new(light: &Light, point: Vec3, attenuate: bool) -> Option<Self> {
        match light {
            Light::Point { position, .. } => {
                let to_light = *position - point;
                let distance = to_light.length();
                let falloff = if attenuate {
                    light.attenuation_at(distance)
                } else {
                    1.0
                };
                Some(Self {
                    direction: to_light.try_normalize()?,
                    distance,
                    color: light.color() * falloff,
                })
            }
            Light::Directional { direction, color } => Some(Self {
                direction: (-*direction).try_normalize()?,
                distance: f32::INFINITY,
                color: *color,
            }),
        }
    }
}

/// Floor that remains even in full shadow.
pub fn ambient(material: &Material, globals: &GlobalData) -> Color {
    globals.ka * material.ambient
}

/// Ambient plus diffuse response, blended towards the texel by the
/// material's blend factor.
pub fn surface_response(material: &Material, globals: &GlobalData, texel: Option<Color>) -> Color {
    let base = globals.ka * material.ambient + globals.kd * material.diffuse;
    match texel {
        Some(texel) => base.lerp(texel, material.blend.clamp(0.0, 1.0)),
        None => base,
    }
}

/// Contribution of one unoccluded light.
///
/// `view` is the unit vector from the point back towards the ray origin.
pub fn direct_light(
    light: &LightSample,
    normal: Vec3,
    view: Vec3,
    material: &Material,
    globals: &GlobalData,
    response: Color,
) -> Color {
    let l = light.direction;

    let n_dot_l = normal.dot(l).max(0.0);
    let diffuse = light.color * response * n_dot_l;

    let r_dot_v = reflect(-l, normal).dot(view).max(0.0);
    let highlight = r_dot_v.powf(material.shininess.max(0.0));
    let specular = light.color * globals.ks * material.specular * highlight;

    diffuse + specular
}
