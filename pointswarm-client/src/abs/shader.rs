//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders,
//! and [`GlCompiler`], which plugs them into the compile/link/swap path of
//! [`pointswarm_core::shader`]. The [`Uniform`] trait sets uniform variables through the
//! locations a program caches when it is linked.

use std::sync::Arc;

use fxhash::FxHashMap;
use glam::{Mat4, Vec3};
use glow::HasContext;
use pointswarm_core::shader::{ShaderCompiler, ShaderError, ShaderStage};

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader for the given stage. `name` only labels diagnostics.
    pub fn new(
        gl: &Arc<glow::Context>,
        stage: ShaderStage,
        source: &str,
        name: &str,
    ) -> Result<Self, ShaderError> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };

        unsafe {
            let shader = gl.create_shader(shader_type).map_err(ShaderError::Create)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(ShaderError::Compile {
                    name: name.to_owned(),
                    stage,
                    log,
                });
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// A value that can be written to a uniform location of the bound program.
pub trait Uniform {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_f32(Some(location), *self);
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_3_f32(Some(location), self.x, self.y, self.z);
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref());
        }
    }
}

/// Represents a linked OpenGL shader program.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
    uniforms: FxHashMap<String, glow::UniformLocation>,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders and resolves the
    /// location of every active uniform.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[Shader], name: &str) -> Result<Self, ShaderError> {
        unsafe {
            let program = gl.create_program().map_err(ShaderError::Create)?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ShaderError::Link {
                    name: name.to_owned(),
                    log,
                });
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            let mut uniforms = FxHashMap::default();
            for index in 0..gl.get_active_uniforms(program) {
                let Some(active) = gl.get_active_uniform(program, index) else {
                    continue;
                };
                if let Some(location) = gl.get_uniform_location(program, &active.name) {
                    // Arrays report as `name[0]`.
                    let base = active.name.trim_end_matches("[0]").to_owned();
                    uniforms.insert(base, location);
                }
            }
            log::debug!("Program '{name}' exposes uniforms {:?}", uniforms.keys().collect::<Vec<_>>());

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
                uniforms,
            })
        }
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform on the bound program. Names the linker optimised away
    /// are ignored.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        if let Some(location) = self.uniforms.get(name) {
            value.set_uniform(&self.gl, location);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}

/// Compiles and links with the current OpenGL context.
pub struct GlCompiler {
    gl: Arc<glow::Context>,
}

impl GlCompiler {
    pub fn new(gl: &Arc<glow::Context>) -> Self {
        Self { gl: Arc::clone(gl) }
    }
}

impl ShaderCompiler for GlCompiler {
    type Stage = Shader;
    type Program = ShaderProgram;

    fn compile(&self, stage: ShaderStage, source: &str, name: &str) -> Result<Shader, ShaderError> {
        Shader::new(&self.gl, stage, source, name)
    }

    fn link(&self, stages: &[Shader], name: &str) -> Result<ShaderProgram, ShaderError> {
        ShaderProgram::new(&self.gl, stages, name)
    }
}
