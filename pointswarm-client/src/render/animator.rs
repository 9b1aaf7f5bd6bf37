//! The frame driven animator: one [`PointDemo`] per [`Variant`], the control
//! queue the input side writes into, and the per-frame update and draw.

use std::{path::Path, sync::Arc};

use glam::{Mat4, Vec3};
use glow::HasContext;
use pointswarm_core::{
    AnimatorState, ControlQueue, ControlRequest, DisplacementMode, SeedPolicy, Variant,
    anchor,
    config::Config,
    shader::{ProgramSlot, ShaderSet},
};

use crate::{
    abs::{GlCompiler, PointBuffer, ShaderProgram},
    camera::OrbitCamera,
    render::axis::AxisGizmo,
    shader_set,
};

/// One demo variant: its animation state, its program and its point buffer.
pub struct PointDemo {
    pub variant: Variant,
    pub state: AnimatorState,
    shaders: ShaderSet,
    program: ProgramSlot<ShaderProgram>,
    points: PointBuffer,
    scale: f32,
    /// Set once the missing program has been reported, cleared by a successful build.
    warned: bool,
}

impl PointDemo {
    fn new(
        gl: &Arc<glow::Context>,
        compiler: &GlCompiler,
        variant: Variant,
        config: &Config,
        shader_dir: &Path,
        seed: SeedPolicy,
    ) -> Result<Self, pointswarm_core::shader::ShaderError> {
        let (anchors, mode, scale, shaders) = match variant {
            Variant::Swarm => (
                anchor::generate(config.point_count, seed),
                DisplacementMode::PerPoint,
                config.shape_scale,
                shader_set!(swarm, "."),
            ),
            Variant::Honeycomb => (
                anchor::fixed_layout(config.honeycomb_scale),
                DisplacementMode::ScalarPhase,
                config.honeycomb_scale,
                ShaderSet::from_dir(variant.name(), &shader_dir.join(variant.name())),
            ),
            Variant::Cloud => (
                anchor::generate(config.point_count, seed),
                DisplacementMode::PerPoint,
                config.shape_scale,
                ShaderSet::from_dir(variant.name(), &shader_dir.join(variant.name())),
            ),
        };

        let mut state = AnimatorState::new(anchors, mode);
        state.set_intensity(config.intensity);
        let points = PointBuffer::new(gl, state.current_positions())?;

        let mut program = ProgramSlot::default();
        program.reload(compiler, &shaders).ok();

        log::info!(
            "Set up {variant} with {} points ({:?})",
            state.anchors().len(),
            mode
        );

        Ok(Self {
            variant,
            state,
            shaders,
            program,
            points,
            scale,
            warned: false,
        })
    }

    fn reload(&mut self, compiler: &GlCompiler) {
        if !self.shaders.is_reloadable() {
            log::info!("{} uses built-in shaders, rebuilding them", self.variant);
        }
        if self.program.reload(compiler, &self.shaders).is_ok() {
            self.warned = false;
        }
    }

    fn draw(&mut self, view: Mat4, projection: Mat4, base_color: Vec3, accent_color: Vec3) {
        let Some(program) = self.program.active() else {
            if !self.warned {
                log::warn!("No usable shader program for {}, skipping its draw", self.variant);
                self.warned = true;
            }
            return;
        };

        self.points.update(self.state.current_positions());

        program.use_program();
        program.set_uniform("u_view", view);
        program.set_uniform("u_projection", projection);
        program.set_uniform("u_scale", self.scale);
        program.set_uniform("u_color", base_color);
        if self.state.mode() == DisplacementMode::ScalarPhase {
            program.set_uniform("u_phase", self.state.phase());
            program.set_uniform("u_accent", accent_color);
        }
        self.points.draw();
    }
}

pub struct Animator {
    gl: Arc<glow::Context>,
    compiler: GlCompiler,
    demos: Vec<PointDemo>,
    active: Variant,
    axis: Option<AxisGizmo>,
    controls: ControlQueue,
    base_color: Vec3,
    accent_color: Vec3,
    width: u32,
    height: u32,
}

impl Animator {
    /// Creates every demo and its GPU resources.
    pub fn init(
        gl: &Arc<glow::Context>,
        config: &Config,
        shader_dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<Self, pointswarm_core::shader::ShaderError> {
        unsafe {
            gl.viewport(0, 0, width as i32, height as i32);
            gl.clear_color(0.2, 0.2, 0.2, 1.0);
            gl.clear_depth_f32(1.0);
            gl.depth_func(glow::LEQUAL);
            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::CULL_FACE);
            gl.cull_face(glow::BACK);
            gl.front_face(glow::CCW);
        }

        let compiler = GlCompiler::new(gl);
        let seed = SeedPolicy::from(config.seed);
        let demos = Variant::ALL
            .into_iter()
            .map(|variant| {
                let seed = seed.derive(variant.index() as u64);
                PointDemo::new(gl, &compiler, variant, config, shader_dir, seed)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let axis = AxisGizmo::new(gl)
            .inspect_err(|err| log::warn!("Axis gizmo unavailable: {err}"))
            .ok();

        Ok(Self {
            gl: Arc::clone(gl),
            compiler,
            demos,
            active: Variant::Swarm,
            axis,
            controls: ControlQueue::default(),
            base_color: config.base_color,
            accent_color: config.accent_color,
            width,
            height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    /// Queues a request to be applied at the start of the next frame.
    pub fn request(&mut self, request: ControlRequest) {
        self.controls.push(request);
    }

    fn apply_controls(&mut self) {
        let requests: Vec<ControlRequest> = self.controls.drain().collect();
        for request in requests {
            log::debug!("Applying {request:?}");
            match request {
                ControlRequest::SelectVariant(variant) => self.active = variant,
                ControlRequest::NextVariant => self.active = self.active.next(),
                ControlRequest::SetIntensity(intensity) => {
                    for demo in &mut self.demos {
                        demo.state.set_intensity(intensity);
                    }
                }
                ControlRequest::NudgeIntensity(step) => {
                    let intensity = self.intensity() + step;
                    for demo in &mut self.demos {
                        demo.state.set_intensity(intensity);
                    }
                }
                ControlRequest::TogglePlay => {
                    let playing = !self.playing();
                    for demo in &mut self.demos {
                        demo.state.playing = playing;
                    }
                }
                ControlRequest::Reload => {
                    let index = self.active.index();
                    self.demos[index].reload(&self.compiler);
                }
            }
        }
    }

    /// Applies pending controls, advances the active demo by `dt` seconds and draws it.
    pub fn update_and_draw(&mut self, dt: f32, camera: &OrbitCamera) {
        self.apply_controls();

        let view = camera.view();
        let projection = camera.projection(self.width, self.height);
        let (base_color, accent_color) = (self.base_color, self.accent_color);

        unsafe {
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        if let Some(axis) = &self.axis {
            axis.draw(view, projection);
        }

        let demo = self.active_demo_mut();
        demo.state.advance(dt);
        demo.draw(view, projection, base_color, accent_color);

        unsafe {
            self.gl.use_program(None);
        }
    }

    /// Releases every GPU resource.
    pub fn cleanup(self) {
        log::info!("Releasing {} demos", self.demos.len());
        drop(self);
    }

    pub fn active_variant(&self) -> Variant {
        self.active
    }

    fn active_demo_mut(&mut self) -> &mut PointDemo {
        &mut self.demos[self.active.index()]
    }

    pub fn intensity(&self) -> f32 {
        self.demos[self.active.index()].state.intensity()
    }

    pub fn playing(&self) -> bool {
        self.demos[self.active.index()].state.playing
    }
}
