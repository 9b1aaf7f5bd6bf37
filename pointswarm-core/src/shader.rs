//! Shader sources and the compile, link and swap path.
//!
//! Inline and file-backed sources go through the same [`build_program`]
//! function. The graphics API sits behind the [`ShaderCompiler`] trait, so the
//! swap rules of [`ProgramSlot`] hold no matter who compiles.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Fragment,
}

impl ShaderStage {
    /// File name used for the stage inside a shader directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert.glsl",
            ShaderStage::Geometry => "geom.glsl",
            ShaderStage::Fragment => "frag.glsl",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
        })
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{name}: {stage} shader failed to compile: {log}")]
    Compile {
        name: String,
        stage: ShaderStage,
        log: String,
    },

    #[error("{name}: program failed to link: {log}")]
    Link { name: String, log: String },

    #[error("unable to read {}: {source}", .path.display())]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create GL object: {0}")]
    Create(String),

    #[error("{} stage(s) failed: {}", .0.len(), join(.0))]
    Stages(Vec<ShaderError>),
}

fn join(errors: &[ShaderError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ShaderError {
    /// Every stage that failed to compile, looking inside [`ShaderError::Stages`].
    pub fn failed_stages(&self) -> Vec<ShaderStage> {
        match self {
            ShaderError::Compile { stage, .. } => vec![*stage],
            ShaderError::Stages(errors) => errors.iter().flat_map(|e| e.failed_stages()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Where the text of one stage comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    Inline(&'static str),
    File(PathBuf),
}

impl ShaderSource {
    pub fn load(&self) -> Result<String, ShaderError> {
        match self {
            ShaderSource::Inline(source) => Ok((*source).to_owned()),
            ShaderSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| ShaderError::AssetRead {
                    path: path.clone(),
                    source,
                })
            }
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ShaderSource::File(_))
    }
}

/// The stages making up one program.
#[derive(Debug, Clone)]
pub struct ShaderSet {
    pub name: String,
    pub stages: Vec<(ShaderStage, ShaderSource)>,
}

impl ShaderSet {
    pub fn inline(name: &str, vertex: &'static str, geometry: &'static str, fragment: &'static str) -> Self {
        Self {
            name: name.to_owned(),
            stages: vec![
                (ShaderStage::Vertex, ShaderSource::Inline(vertex)),
                (ShaderStage::Geometry, ShaderSource::Inline(geometry)),
                (ShaderStage::Fragment, ShaderSource::Inline(fragment)),
            ],
        }
    }

    /// `<dir>/vert.glsl`, `<dir>/geom.glsl` and `<dir>/frag.glsl`.
    pub fn from_dir(name: &str, dir: &Path) -> Self {
        Self {
            name: name.to_owned(),
            stages: [ShaderStage::Vertex, ShaderStage::Geometry, ShaderStage::Fragment]
                .into_iter()
                .map(|stage| (stage, ShaderSource::File(dir.join(stage.file_name()))))
                .collect(),
        }
    }

    pub fn is_reloadable(&self) -> bool {
        self.stages.iter().any(|(_, source)| source.is_file())
    }
}

/// A graphics API able to turn sources into a linked program.
pub trait ShaderCompiler {
    type Stage;
    type Program;

    fn compile(&self, stage: ShaderStage, source: &str, name: &str) -> Result<Self::Stage, ShaderError>;

    fn link(&self, stages: &[Self::Stage], name: &str) -> Result<Self::Program, ShaderError>;
}

/// Loads and compiles every stage, then links.
///
/// A failing stage does not stop the others from compiling, so one attempt
/// reports every broken stage. Linking only happens if all stages compiled.
pub fn build_program<C: ShaderCompiler>(compiler: &C, set: &ShaderSet) -> Result<C::Program, ShaderError> {
    let mut compiled = Vec::with_capacity(set.stages.len());
    let mut errors = Vec::new();

    for (stage, source) in &set.stages {
        match source.load().and_then(|text| compiler.compile(*stage, &text, &set.name)) {
            Ok(shader) => compiled.push(shader),
            Err(err) => errors.push(err),
        }
    }

    match errors.len() {
        0 => compiler.link(&compiled, &set.name),
        1 => Err(errors.remove(0)),
        _ => Err(ShaderError::Stages(errors)),
    }
}

/// The program currently in use. Replacements are only installed once they
/// are fully built.
pub struct ProgramSlot<P> {
    active: Option<P>,
    generation: u32,
}

impl<P> Default for ProgramSlot<P> {
    fn default() -> Self {
        Self {
            active: None,
            generation: 0,
        }
    }
}

impl<P> ProgramSlot<P> {
    pub fn active(&self) -> Option<&P> {
        self.active.as_ref()
    }

    /// Number of successful builds so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Builds a replacement and swaps it in on success. The previous program
    /// is dropped only after the swap; on failure it stays active.
    pub fn replace_with<F>(&mut self, build: F) -> Result<(), ShaderError>
    where
        F: FnOnce() -> Result<P, ShaderError>,
    {
        let program = build()?;
        let previous = self.active.replace(program);
        self.generation += 1;
        drop(previous);
        Ok(())
    }

    /// [`build_program`] followed by [`replace_with`](Self::replace_with),
    /// logging the outcome.
    pub fn reload<C>(&mut self, compiler: &C, set: &ShaderSet) -> Result<(), ShaderError>
    where
        C: ShaderCompiler<Program = P>,
    {
        match self.replace_with(|| build_program(compiler, set)) {
            Ok(()) => {
                log::info!("Built shader program '{}' (generation {})", set.name, self.generation);
                Ok(())
            }
            Err(err) => {
                if self.active.is_some() {
                    log::error!("Reload of '{}' failed, keeping previous program: {err}", set.name);
                } else {
                    log::error!("Shader program '{}' is unavailable: {err}", set.name);
                }
                Err(err)
            }
        }
    }
}
