//! Command-line interface
//!
//! - `globe [view]` - open the viewer (default)
//! - `globe mesh` - generate one sphere and print or export it

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glam::Vec3;
use globe_core::config::{self, Config};
use globe_core::procedural::{MeshDump, SphereSpec, generate, write_obj};

/// Globe - textured globe viewer and UV-sphere generator
#[derive(Parser, Debug)]
#[command(name = "globe")]
#[command(author, version, about = "Textured globe viewer and UV-sphere mesh generator")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub view: ViewArgs,
}

impl Cli {
    /// The command to run, `view` when none was given
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::View(self.view))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the globe viewer
    View(ViewArgs),

    /// Generate a sphere mesh without opening a window
    Mesh(MeshArgs),
}

#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct ViewArgs {
    /// Config file to use instead of the platform config directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start in fullscreen mode (borderless window)
    #[arg(long, short = 'f')]
    pub fullscreen: bool,

    /// Globe texture (equirectangular image)
    #[arg(long, value_name = "FILE")]
    pub earth_texture: Option<PathBuf>,

    /// Space backdrop texture (equirectangular image)
    #[arg(long, value_name = "FILE")]
    pub space_texture: Option<PathBuf>,

    /// Globe latitude bands
    #[arg(long)]
    pub stacks: Option<u32>,

    /// Globe longitude slices
    #[arg(long)]
    pub sectors: Option<u32>,

    /// Draw triangle edges only
    #[arg(long)]
    pub wireframe: bool,
}

impl ViewArgs {
    /// Load the config this invocation asks for and apply the overrides
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Apply command-line overrides on top of a loaded config
    pub fn apply(&self, config: &mut Config) {
        if self.fullscreen {
            config.window.fullscreen = true;
        }
        if self.wireframe {
            config.debug.wireframe = true;
        }
        if let Some(path) = &self.earth_texture {
            config.earth.texture = path.clone();
        }
        if let Some(path) = &self.space_texture {
            config.space.texture = path.clone();
        }
        if let Some(stacks) = self.stacks {
            config.earth.stacks = stacks;
        }
        if let Some(sectors) = self.sectors {
            config.earth.sectors = sectors;
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct MeshArgs {
    /// Latitude bands (at least 2)
    #[arg(long, default_value = "18")]
    pub stacks: u32,

    /// Longitude slices (at least 3)
    #[arg(long, default_value = "36")]
    pub sectors: u32,

    /// Sphere radius
    #[arg(long, default_value = "1.0")]
    pub radius: f32,

    /// Sphere center as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    pub center: Vec3,

    /// Write the mesh as Wavefront OBJ
    #[arg(long, value_name = "FILE")]
    pub obj: Option<PathBuf>,

    /// Print every vertex, index and texcoord
    #[arg(long)]
    pub dump: bool,
}

impl MeshArgs {
    pub fn spec(&self) -> SphereSpec {
        SphereSpec::new(self.center, self.radius, self.stacks, self.sectors)
    }
}

/// Parse `x,y,z` into a vector
pub fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got '{s}'"));
    };

    let parse = |part: &str| {
        part.parse::<f32>()
            .map_err(|e| format!("invalid coordinate '{part}': {e}"))
    };
    Ok(Vec3::new(parse(x)?, parse(y)?, parse(z)?))
}

/// Run `globe view`
pub fn execute_view(args: ViewArgs) -> Result<()> {
    let config = args.resolve_config()?;
    crate::app::run(config)
}

/// Run `globe mesh`, writing the report to `out`
pub fn execute_mesh(args: &MeshArgs, mut out: impl Write) -> Result<()> {
    let spec = args.spec();
    let mesh = generate(&spec).context("Failed to generate sphere")?;

    writeln!(
        out,
        "sphere: center {}, radius {}, {} stacks x {} sectors",
        spec.center, spec.radius, spec.stack_count, spec.sector_count
    )?;
    writeln!(
        out,
        "{} vertices, {} texcoords, {} indices ({} triangles)",
        mesh.vertex_count(),
        mesh.texcoords.len(),
        mesh.indices.len(),
        mesh.triangle_count()
    )?;

    if args.dump {
        write!(out, "{}", MeshDump(&mesh))?;
    }

    if let Some(path) = &args.obj {
        export_obj(&mesh, path)?;
        writeln!(out, "wrote {}", path.display())?;
    }

    Ok(())
}

fn export_obj(mesh: &globe_core::Mesh, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_obj(mesh, BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Exported OBJ to {}", path.display());
    Ok(())
}
