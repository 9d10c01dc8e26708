/// WGSL shader for the instanced scene cuboids.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    // Hemisphere ambient blended from a warm floor to a cool sky, plus a
    // single key light.
    let sky = vec3<f32>(0.45, 0.55, 0.60);
    let ground = vec3<f32>(0.12, 0.10, 0.08);
    let hemi = mix(ground, sky, n.y * 0.5 + 0.5);
    let key_dir = normalize(vec3<f32>(0.4, 0.8, 0.6));
    let key = max(dot(n, key_dir), 0.0) * 0.6;
    let lit = in.color.rgb * (hemi + vec3<f32>(key));
    return vec4<f32>(lit, in.color.a);
}
"#;

/// WGSL shader for the equirectangular environment backdrop.
///
/// A single fullscreen triangle at the far plane; the fragment stage
/// unprojects each pixel to a world-space view ray and samples the
/// equirectangular image by that direction.
pub const BACKDROP_SHADER: &str = r#"
struct BackdropUniforms {
    inv_view_proj: mat4x4<f32>,
    eye: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: BackdropUniforms;
@group(0) @binding(1)
var env_texture: texture_2d<f32>;
@group(0) @binding(2)
var env_sampler: sampler;

struct BackdropOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_backdrop(@builtin(vertex_index) index: u32) -> BackdropOutput {
    var corners = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var out: BackdropOutput;
    out.clip_position = vec4<f32>(corners[index], 1.0, 1.0);
    out.ndc = corners[index];
    return out;
}

@fragment
fn fs_backdrop(in: BackdropOutput) -> @location(0) vec4<f32> {
    let tau = 6.28318530718;
    let pi = 3.14159265359;
    let far_point = uniforms.inv_view_proj * vec4<f32>(in.ndc, 1.0, 1.0);
    let dir = normalize(far_point.xyz / far_point.w - uniforms.eye.xyz);
    let uv = vec2<f32>(
        atan2(dir.z, dir.x) / tau + 0.5,
        acos(clamp(dir.y, -1.0, 1.0)) / pi,
    );
    return textureSample(env_texture, env_sampler, uv);
}
"#;
