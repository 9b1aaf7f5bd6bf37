//! RGB axis gizmo at the world origin.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use pointswarm_core::shader::{ShaderError, ShaderSet, ShaderSource, ShaderStage, build_program};

use crate::abs::{GlCompiler, Mesh, ShaderProgram, Vertex};

#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct AxisVertex {
    pub position: Vec3,
    pub color: Vec3,
}

impl Vertex for AxisVertex {
    fn vertex_attribs(gl: &glow::Context) {
        use glow::HasContext;

        unsafe {
            let stride = std::mem::size_of::<AxisVertex>() as i32;

            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);

            // Color attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, size_of::<Vec3>() as i32);
        }
    }
}

pub struct AxisGizmo {
    mesh: Mesh,
    program: ShaderProgram,
}

impl AxisGizmo {
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self, ShaderError> {
        let set = ShaderSet {
            name: "axis".to_owned(),
            stages: vec![
                (ShaderStage::Vertex, ShaderSource::Inline(include_str!("shaders/axis/vert.glsl"))),
                (ShaderStage::Fragment, ShaderSource::Inline(include_str!("shaders/axis/frag.glsl"))),
            ],
        };
        let program = build_program(&GlCompiler::new(gl), &set)?;

        let vertices: Vec<AxisVertex> = [Vec3::X, Vec3::Y, Vec3::Z]
            .into_iter()
            .flat_map(|axis| {
                [
                    AxisVertex {
                        position: Vec3::ZERO,
                        color: axis,
                    },
                    AxisVertex {
                        position: axis,
                        color: axis,
                    },
                ]
            })
            .collect();
        let indices: Vec<u32> = (0..vertices.len() as u32).collect();
        let mesh = Mesh::new(gl, &vertices, &indices, glow::LINES)?;

        Ok(Self { mesh, program })
    }

    pub fn draw(&self, view: Mat4, projection: Mat4) {
        self.program.use_program();
        self.program.set_uniform("u_mvp", projection * view);
        self.mesh.draw();
    }
}
