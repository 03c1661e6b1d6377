//! Headless driver for lamassu panels.
//!
//! Stands in for a VR host: creates a web panel and a recipe list, runs the
//! per-frame refresh, feeds a scripted controller sweep through the pointer
//! router and optionally dumps the final panel textures as PNG.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use lamassu_engine::content::ContentKind;
use lamassu_engine::device::{Gpu, GpuInit};
use lamassu_engine::input::{PointerSample, RoutingMode};
use lamassu_engine::logging::{init_logging, LoggingConfig};
use lamassu_engine::texture::{GpuTextures, HeadlessTextures, TextureBackend, TextureHandle};
use lamassu_engine::{Compositor, CompositorConfig};
use lamassu_ui::text::{FontId, FontSystem};
use lamassu_ui::{ListPanelConfig, PanelFactory, RecipeSource};

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Routing {
    Single,
    PerTarget,
}

impl From<Routing> for RoutingMode {
    fn from(r: Routing) -> Self {
        match r {
            Routing::Single => RoutingMode::SinglePointer,
            Routing::PerTarget => RoutingMode::PerTarget,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lamassu-studio", about = "Drive lamassu panels with a scripted controller")]
struct Args {
    /// Frames to run.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Simulated host refresh rate.
    #[arg(long, default_value_t = 72.0)]
    fps: f32,

    /// Allocate panel textures on the GPU instead of in memory.
    #[arg(long)]
    gpu: bool,

    /// Directory to write the final panel textures to (in-memory textures only).
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Recipe JSON for the list panel.
    #[arg(long, default_value = "crates/lamassu-studio/assets/recipes.json")]
    recipes: PathBuf,

    /// TrueType/OpenType font; a system font is searched for when omitted.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Texture pixels per logical pixel.
    #[arg(long, default_value_t = 1.0)]
    density: f32,

    #[arg(long, value_enum, default_value_t = Routing::Single)]
    routing: Routing,

    /// env_logger filter, e.g. "debug" or "lamassu_engine=trace".
    #[arg(long)]
    log: Option<String>,
}

enum Textures {
    Gpu(Arc<GpuTextures>),
    Memory(Arc<HeadlessTextures>),
}

impl Textures {
    fn backend(&self) -> Arc<dyn TextureBackend> {
        match self {
            Textures::Gpu(t) => t.clone(),
            Textures::Memory(t) => t.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let textures = select_textures(args.gpu);

    let mut fonts = FontSystem::new();
    let font = load_font(&mut fonts, args.font.as_deref());

    let factory = PanelFactory::new(Arc::new(fonts), font).with_list(ListPanelConfig {
        source: RecipeSource::File(args.recipes.clone()),
        ..ListPanelConfig::default()
    });

    let config = CompositorConfig {
        pixel_density: args.density,
        routing: args.routing.into(),
        ..CompositorConfig::default()
    };
    let compositor = Compositor::new(config, textures.backend(), Arc::new(factory))
        .context("failed to start compositor")?;

    let web = compositor
        .create_panel(1024, 768, ContentKind::from_tag(0))
        .context("failed to create web panel")?;
    let list = compositor
        .create_panel(512, 768, ContentKind::from_tag(1))
        .context("failed to create list panel")?;

    let frame_time = Duration::from_secs_f32(1.0 / args.fps.max(1.0));
    for frame in 0..args.frames {
        if let Some(sample) = controller(frame, web, list) {
            if let Some(action) = compositor.handle_pointer(sample) {
                log::debug!("frame {frame}: {action} on {}", sample.target);
            }
        }

        let stats = compositor.refresh_frame();
        if stats.frame_index % 30 == 0 {
            log::info!(
                "frame {}: {}/{} texture(s) latched, dt {:.1} ms",
                stats.frame_index,
                stats.textures_latched,
                stats.panels,
                stats.dt * 1000.0
            );
        }
        std::thread::sleep(frame_time);
    }

    // Settle: let the UI thread finish, then latch the last frames.
    compositor.flush_ui().context("UI thread stopped early")?;
    compositor.refresh_frame();

    if let Some(dir) = &args.dump {
        match &textures {
            Textures::Memory(t) => dump_panels(&compositor, t, dir)?,
            Textures::Gpu(_) => log::warn!("--dump needs in-memory textures; skipped"),
        }
    }

    for handle in [web, list] {
        compositor.destroy_panel(handle);
    }
    log::info!("{} texture(s) left after teardown", compositor.backend().live_textures());
    Ok(())
}

fn select_textures(gpu: bool) -> Textures {
    if !gpu {
        return Textures::Memory(Arc::new(HeadlessTextures::new()));
    }
    match Gpu::new_headless_blocking(GpuInit::default()) {
        Ok(g) => Textures::Gpu(Arc::new(GpuTextures::new(Arc::new(g)))),
        Err(e) => {
            log::warn!("GPU unavailable ({e:#}); using in-memory textures");
            Textures::Memory(Arc::new(HeadlessTextures::new()))
        }
    }
}

/// Scripted controller: scroll the list, open a post, then drag from the web
/// panel across the list (the touch stays on the web panel).
fn controller(frame: u64, web: TextureHandle, list: TextureHandle) -> Option<PointerSample> {
    let f = frame as f32;
    match frame {
        10..=39 => Some(PointerSample::new(list, 256.0, 600.0 - (f - 10.0) * 12.0, true)),
        40 => Some(PointerSample::new(list, 256.0, 240.0, false)),
        50 => Some(PointerSample::new(list, 200.0, 150.0, true)),
        51 => Some(PointerSample::new(list, 200.0, 150.0, false)),
        60 => Some(PointerSample::new(web, 400.0, 48.0 + 56.0 + 36.0, true)),
        61 => Some(PointerSample::new(web, 400.0, 48.0 + 56.0 + 36.0, false)),
        80..=89 => Some(PointerSample::new(web, 900.0, 400.0 - (f - 80.0) * 10.0, true)),
        90..=99 => Some(PointerSample::new(list, 20.0, 300.0, true)),
        100 => Some(PointerSample::new(list, 20.0, 300.0, false)),
        _ => None,
    }
}

fn load_font(fonts: &mut FontSystem, explicit: Option<&Path>) -> Option<FontId> {
    let bytes = match explicit {
        Some(path) => match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                log::warn!("cannot read font {}: {e}", path.display());
                return None;
            }
        },
        None => [
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/noto/NotoSans-Regular.ttf",
            "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        ]
        .iter()
        .find_map(|p| std::fs::read(p).ok())?,
    };

    match fonts.load_font(&bytes) {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("{e}; panels will render without text");
            None
        }
    }
}

fn dump_panels(compositor: &Compositor, textures: &HeadlessTextures, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    for panel in compositor.panels() {
        let Some(mut rgba) = textures.pixels(panel.handle) else {
            continue;
        };
        unpremultiply(&mut rgba);

        let image = image::RgbaImage::from_raw(panel.size.width, panel.size.height, rgba)
            .context("texture size does not match its pixels")?;
        let path = dir.join(format!("{}-{}.png", panel.kind, panel.handle.raw()));
        image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

/// Panel textures hold premultiplied alpha; PNG expects straight alpha.
fn unpremultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
