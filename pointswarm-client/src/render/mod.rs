//! Everything that draws: the animator with its demos and the axis gizmo.

pub mod animator;
pub mod axis;

/// Builds an inline [`ShaderSet`](pointswarm_core::shader::ShaderSet) from
/// `shaders/<name>/{vert,geom,frag}.glsl`, relative to `$path_prefix` from the
/// calling file.
#[macro_export]
macro_rules! shader_set {
    ($name:ident, $path_prefix:literal) => {
        pointswarm_core::shader::ShaderSet::inline(
            stringify!($name),
            include_str!(concat!($path_prefix, "/shaders/", stringify!($name), "/vert.glsl")),
            include_str!(concat!($path_prefix, "/shaders/", stringify!($name), "/geom.glsl")),
            include_str!(concat!($path_prefix, "/shaders/", stringify!($name), "/frag.glsl")),
        )
    };
}
