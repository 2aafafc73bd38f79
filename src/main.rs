use std::f32::consts::TAU;
use tracing_subscriber::EnvFilter;
use virus_field::config::{AppConfig, LoggingConfig, PreviewConfig};
use virus_field::core::{FieldResult, ManualScheduler};
use virus_field::render::surface::LogicalSize;
use virus_field::render::{FieldEngine, PointerSample, RasterSurface};

fn main() {
    if let Err(e) = run() {
        eprintln!("Preview failed: {}", e);
        std::process::exit(1);
    }
}

/// 在软件光栅上运行粒子场并导出最后一帧
fn run() -> FieldResult<()> {
    let mut config = AppConfig::load_or_default();
    config.apply_env_overrides();
    initialize_logging(&config.logging);
    config.validate()?;

    let preview = &config.preview;
    let mut engine: FieldEngine<RasterSurface, ManualScheduler> = FieldEngine::seeded(
        config.field.clone(),
        preview.pixel_ratio,
        ManualScheduler::new(),
        preview.seed,
    );
    engine.mount(RasterSurface::new(LogicalSize::new(
        preview.width,
        preview.height,
    )));

    if !engine.activate() {
        tracing::warn!(target: "preview", "Engine did not start");
        return Ok(());
    }
    tracing::info!(
        target: "preview",
        "Running {} frames on {}x{} device pixels with {} particles",
        preview.frames,
        engine.size().width,
        engine.size().height,
        engine.particles().len()
    );

    for frame in 0..preview.frames {
        let pointer = pointer_at(preview, frame);
        engine.step(pointer.as_ref());
    }

    let stats = engine.stats();
    tracing::info!(
        target: "preview",
        "Finished {} ticks, {} links in the last frame",
        stats.ticks,
        stats.last_link_count
    );

    if let Some(surface) = engine.surface() {
        surface.save_png(&preview.output)?;
        tracing::info!(target: "preview", "Wrote {}", preview.output);
    }
    engine.deactivate();
    Ok(())
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先，未设置时使用配置中的级别。
fn initialize_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_filter()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 指针沿容器中心的椭圆移动，前半段在区域内
fn pointer_at(preview: &PreviewConfig, frame: u32) -> Option<PointerSample> {
    if !preview.orbit_pointer {
        return None;
    }
    let t = frame as f32 / preview.frames as f32;
    let angle = t * TAU * 2.0;
    Some(PointerSample::new(
        preview.width * (0.5 + 0.3 * angle.cos()),
        preview.height * (0.5 + 0.3 * angle.sin()),
        t < 0.5,
    ))
}
