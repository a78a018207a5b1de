/// WGSL shader for walls, the room border and the light marker.
///
/// Walls blend a two-colour gradient along `color_start.w` radians, overlay a
/// tiled circle or diamond pattern whose size follows the gradient, and draw
/// a thin outline where a fragment is close to its face's min/max bounds.
/// Solid mode skips all of that and only applies lighting. Colours arrive in
/// linear light; `params.z` asks for sRGB encoding on non-sRGB targets.
pub const WALL_SHADER: &str = r#"
struct DrawUniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_position: vec4<f32>,
    color_start: vec4<f32>,
    color_end: vec4<f32>,
    pattern_color: vec4<f32>,
    pattern: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> u: DrawUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) face_size: vec2<f32>,
    @location(4) min_vertex: vec3<f32>,
    @location(5) max_vertex: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) face_size: vec2<f32>,
    @location(4) face_min: vec2<f32>,
    @location(5) face_max: vec2<f32>,
};

// The two coordinates spanning the face plane.
fn in_plane(a: vec3<f32>, normal: vec3<f32>) -> vec2<f32> {
    if (normal.x != 0.0) {
        return a.zy;
    }
    if (normal.y != 0.0) {
        return a.xz;
    }
    return a.xy;
}

@vertex
fn vs_main(v: VertexInput) -> VertexOutput {
    let world = u.model * vec4<f32>(v.position, 1.0);

    var out: VertexOutput;
    out.clip_position = u.projection * u.view * world;
    out.world_position = world.xyz;
    out.world_normal = normalize((u.model * vec4<f32>(v.normal, 0.0)).xyz);
    out.uv = v.uv;
    out.face_size = v.face_size;
    let p = in_plane(v.position, v.normal);
    out.face_min = p - in_plane(v.min_vertex, v.normal);
    out.face_max = in_plane(v.max_vertex, v.normal) - p;
    return out;
}

// Linear to sRGB transfer for targets without hardware encoding.
fn encode_srgb(c: vec3<f32>) -> vec3<f32> {
    let low = c * 12.92;
    let high = 1.055 * pow(max(c, vec3<f32>(0.0)), vec3<f32>(1.0 / 2.4)) - 0.055;
    return select(high, low, c <= vec3<f32>(0.0031308));
}

fn to_target(color: vec3<f32>) -> vec4<f32> {
    if (u.params.z > 0.5) {
        return vec4<f32>(encode_srgb(color), 1.0);
    }
    return vec4<f32>(color, 1.0);
}

fn lighting(in: VertexOutput) -> f32 {
    let to_light = normalize(u.light_position.xyz - in.world_position);
    let diffuse = max(dot(in.world_normal, to_light), 0.0);
    return 0.45 + 0.55 * diffuse;
}

fn gradient_t(uv: vec2<f32>, angle: f32) -> f32 {
    let dir = vec2<f32>(cos(angle), sin(angle));
    let reach = 0.5 * (abs(dir.x) + abs(dir.y));
    return clamp(dot(uv - vec2<f32>(0.5), dir) / max(reach, 1e-4) * 0.5 + 0.5, 0.0, 1.0);
}

fn pattern_coverage(uv: vec2<f32>, face_size: vec2<f32>, t: f32) -> f32 {
    let kind = u32(u.params.x + 0.5);
    if (kind == 0u || u.pattern.z <= 0.0) {
        return 0.0;
    }
    // Square tiles: `amount` across the longer side.
    let longest = max(max(face_size.x, face_size.y), 1e-4);
    let tiles = uv * face_size / longest * u.pattern.z;
    let cell = fract(tiles) - vec2<f32>(0.5);

    var dist: f32;
    if (kind == 1u) {
        dist = length(cell);
    } else {
        dist = abs(cell.x) + abs(cell.y);
    }
    let radius = 0.5 * mix(u.pattern.x, u.pattern.y, t);
    let soft = max(0.5 * u.pattern.w, 1e-3);
    return 1.0 - smoothstep(radius - soft, radius + soft, dist);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light = lighting(in);
    if (u.params.y > 0.5) {
        return to_target(u.color_start.rgb * light);
    }

    let t = gradient_t(in.uv, u.color_start.w);
    var color = mix(u.color_start.rgb, u.color_end.rgb, t);

    let coverage = pattern_coverage(in.uv, in.face_size, t) * u.pattern_color.a;
    color = mix(color, u.pattern_color.rgb, coverage);

    let edge = min(min(in.face_min.x, in.face_min.y), min(in.face_max.x, in.face_max.y));
    let outline = 1.0 - smoothstep(0.02, 0.05, edge);
    // sRGB (0.5, 0.6, 0.7) in linear light
    color = mix(color, vec3<f32>(0.214, 0.319, 0.448), outline);

    return to_target(color * light);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_declares_entry_points_and_uniforms() {
        assert!(WALL_SHADER.contains("fn vs_main"));
        assert!(WALL_SHADER.contains("fn fs_main"));
        for field in [
            "model",
            "view",
            "projection",
            "light_position",
            "pattern_color",
            "params",
        ] {
            assert!(WALL_SHADER.contains(&format!("{field}:")), "missing {field}");
        }
    }

    #[test]
    fn every_fragment_exit_goes_through_output_encoding() {
        assert_eq!(WALL_SHADER.matches("return to_target(").count(), 2);
        assert!(WALL_SHADER.contains("u.params.z > 0.5"));
    }

    #[test]
    fn vertex_locations_match_buffer_layout() {
        for location in 0..6 {
            assert!(WALL_SHADER.contains(&format!("@location({location})")));
        }
    }
}
