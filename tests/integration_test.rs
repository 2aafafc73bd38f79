use glam::Vec2;
use virus_field::config::{AppConfig, FieldConfig};
use virus_field::core::{FrameScheduler, ManualScheduler};
use virus_field::render::particles::{particle_count, FieldEngine, ParticleField, PointerSample};
use virus_field::render::surface::{DeviceSize, DrawCommand, LogicalSize, PixelRatio};
use virus_field::render::{RasterSurface, RecordingSurface};

type RecordingEngine = FieldEngine<RecordingSurface, ManualScheduler>;

fn recording_engine(width: f32, height: f32, ratio: f32) -> RecordingEngine {
    let mut engine = RecordingEngine::seeded(FieldConfig::default(), ratio, ManualScheduler::new(), 11);
    engine.mount(RecordingSurface::new(LogicalSize::new(width, height)));
    engine
}

#[test]
fn test_particle_count_policy() {
    let config = FieldConfig::default();

    assert_eq!(particle_count(DeviceSize::new(900, 900), &config), 60);
    assert_eq!(particle_count(DeviceSize::new(1, 1), &config), 36);
    assert_eq!(particle_count(DeviceSize::new(4000, 4000), &config), 84);
}

#[test]
fn test_device_pixel_conversion_on_activation() {
    let mut engine = recording_engine(450.0, 450.0, 2.0);
    engine.activate();

    // 450 CSS px × 2 → 900 device px
    assert_eq!(engine.size(), DeviceSize::new(900, 900));
    assert_eq!(engine.particles().len(), 60);
}

#[test]
fn test_zero_sized_container() {
    let mut engine = recording_engine(0.0, -5.0, 1.0);
    assert!(engine.activate());

    assert_eq!(engine.size(), DeviceSize::new(1, 1));
    assert_eq!(engine.particles().len(), 36);
    for _ in 0..10 {
        engine.step(Some(&PointerSample::new(0.5, 0.5, true)));
    }
    for p in engine.particles() {
        assert!((0.0..=1.0).contains(&p.position.x));
        assert!((0.0..=1.0).contains(&p.position.y));
    }
}

#[test]
fn test_containment_over_many_ticks() {
    let mut engine = recording_engine(320.0, 180.0, 1.5);
    engine.activate();
    let bounds = engine.size().as_vec2();

    for frame in 0..300 {
        let pointer = PointerSample::new((frame % 320) as f32, 90.0, frame % 3 != 0);
        assert!(engine.step(Some(&pointer)));
        for p in engine.particles() {
            assert!(p.position.x >= 0.0 && p.position.x <= bounds.x);
            assert!(p.position.y >= 0.0 && p.position.y <= bounds.y);
        }
        engine.surface_mut().unwrap().take_commands();
    }
}

#[test]
fn test_pointer_pulls_particles_closer() {
    let mut engine = recording_engine(900.0, 900.0, 1.0);
    engine.activate();
    let target = Vec2::new(450.0, 450.0);
    let mean_distance = |engine: &RecordingEngine| {
        let particles = engine.particles();
        particles.iter().map(|p| p.position.distance(target)).sum::<f32>() / particles.len() as f32
    };

    let before = mean_distance(&engine);
    let pointer = PointerSample::new(450.0, 450.0, true);
    for _ in 0..120 {
        engine.step(Some(&pointer));
    }
    assert!(mean_distance(&engine) < before);
}

#[test]
fn test_cancellation_before_first_tick() {
    let mut engine = recording_engine(600.0, 400.0, 1.0);
    engine.activate();
    engine.deactivate();
    engine.deactivate();

    assert!(!engine.step(None));
    assert_eq!(engine.stats().ticks, 0);
    assert_eq!(engine.scheduler().pending_count(), 0);

    let drawn = engine
        .surface()
        .unwrap()
        .commands()
        .iter()
        .filter(|c| !matches!(c, DrawCommand::Resize(_)))
        .count();
    assert_eq!(drawn, 0);
}

#[test]
fn test_resize_resets_state() {
    let mut engine = recording_engine(900.0, 900.0, 1.0);
    engine.activate();
    for _ in 0..10 {
        engine.step(None);
    }
    let before = engine.particles().to_vec();

    engine
        .surface_mut()
        .unwrap()
        .set_logical_size(LogicalSize::new(300.0, 200.0));
    engine.on_resize();

    assert_eq!(engine.size(), DeviceSize::new(300, 200));
    assert_eq!(engine.particles().len(), 36);
    assert!(engine
        .particles()
        .iter()
        .all(|p| !before.contains(p)));
    assert_eq!(engine.scheduler().pending_count(), 1);
}

#[test]
fn test_link_opacity_matches_distance() {
    let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(5);
    let mut field = ParticleField::new(FieldConfig::default(), PixelRatio::new(1.0, 2.0));
    field.reset(DeviceSize::new(500, 500), &mut rng);

    let max = field.link_distance();
    let mut count = 0;
    for link in field.links() {
        assert!(link.distance < max);
        assert_eq!(link.opacity, 0.15 * (1.0 - link.distance / max));
        count += 1;
    }

    let mut surface = RecordingSurface::default();
    assert_eq!(field.render(&mut surface), count);
    assert_eq!(surface.line_count(), count);
}

#[test]
fn test_manual_scheduler_through_trait_object() {
    let mut scheduler = ManualScheduler::new();
    let dyn_scheduler: &mut dyn FrameScheduler = &mut scheduler;
    let handle = dyn_scheduler
        .request_frame()
        .expect("manual scheduler always grants frames");
    dyn_scheduler.cancel_frame(handle);
    dyn_scheduler.cancel_frame(handle);

    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn test_raster_preview_writes_png() -> anyhow::Result<()> {
    let mut engine: FieldEngine<RasterSurface, ManualScheduler> =
        FieldEngine::seeded(FieldConfig::default(), 1.0, ManualScheduler::new(), 3);
    engine.mount(RasterSurface::new(LogicalSize::new(120.0, 80.0)));
    engine.activate();
    for _ in 0..20 {
        engine.step(Some(&PointerSample::new(60.0, 40.0, true)));
    }

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("preview.png");
    let surface = engine.surface().expect("surface mounted");
    surface.save_png(&path)?;

    let decoded = image::open(&path)?.to_rgba8();
    assert_eq!(decoded.dimensions(), (120, 80));
    assert!(decoded.pixels().any(|p| p.0[3] > 0));
    Ok(())
}

#[test]
fn test_config_file_roundtrip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("virus_field.toml");

    let mut config = AppConfig::default();
    config.field.base_count = 80;
    config.field.full_clear = true;
    config.save_toml(&path)?;

    let loaded = AppConfig::from_toml_file(&path)?;
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());

    let json_path = dir.path().join("virus_field.json");
    config.save_json(&json_path)?;
    assert_eq!(AppConfig::from_json_file(&json_path)?, config);
    Ok(())
}
