//! GPU geometry.
//!
//! [`Mesh`] holds indexed geometry whose vertices implement the [`Vertex`] trait.
//! [`PointBuffer`] holds the bare anchor positions that geometry shaders
//! expand, and is rewritten every frame.

use std::sync::Arc;

use glam::Vec3;
use glow::HasContext;
use pointswarm_core::shader::ShaderError;

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs(gl: &glow::Context);
}

/// Views a slice of plain vertex data as bytes for uploading.
fn as_bytes<T>(data: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, std::mem::size_of_val(data)) }
}

/// Represents a mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    draw_mode: u32,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    index_count: usize,
}

impl Mesh {
    /// Creates a new mesh from the given vertex and index data.
    pub fn new<V: Vertex>(
        gl: &Arc<glow::Context>,
        vertices: &[V],
        indices: &[u32],
        draw_mode: u32,
    ) -> Result<Self, ShaderError> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(ShaderError::Create)?;
            let vbo = gl.create_buffer().map_err(ShaderError::Create)?;
            let ebo = gl.create_buffer().map_err(ShaderError::Create)?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, as_bytes(vertices), glow::STATIC_DRAW);

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, as_bytes(indices), glow::STATIC_DRAW);

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                draw_mode,
                vao,
                vbo,
                ebo,
                index_count: indices.len(),
            })
        }
    }

    /// Draws the mesh.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_elements(self.draw_mode, self.index_count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}

/// Anchor positions drawn as `GL_POINTS`, attribute 0.
pub struct PointBuffer {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    /// Points the buffer was allocated for.
    capacity: usize,
    count: usize,
}

impl PointBuffer {
    pub fn new(gl: &Arc<glow::Context>, positions: &[Vec3]) -> Result<Self, ShaderError> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(ShaderError::Create)?;
            let vbo = gl.create_buffer().map_err(ShaderError::Create)?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, as_bytes(positions), glow::DYNAMIC_DRAW);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, std::mem::size_of::<Vec3>() as i32, 0);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                vao,
                vbo,
                capacity: positions.len(),
                count: positions.len(),
            })
        }
    }

    /// Overwrites the positions in place, reallocating only if the set grew.
    pub fn update(&mut self, positions: &[Vec3]) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            if positions.len() > self.capacity {
                self.gl
                    .buffer_data_u8_slice(glow::ARRAY_BUFFER, as_bytes(positions), glow::DYNAMIC_DRAW);
                self.capacity = positions.len();
            } else {
                self.gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, as_bytes(positions));
            }
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        self.count = positions.len();
    }

    /// Issues one point per position; the bound program's geometry stage
    /// does the rest.
    pub fn draw(&self) {
        if self.count == 0 {
            return;
        }
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_arrays(glow::POINTS, 0, self.count as i32);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for PointBuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
