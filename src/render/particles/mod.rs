//! 粒子网络场
//!
//! 密度自适应的 2D 粒子集合：指针吸引、摩擦衰减、边界反射，
//! 近距离粒子之间绘制随距离线性淡出的连线。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    FieldEngine                           │
//! │  激活 / 停用 / 尺寸变化 / 帧调度                           │
//! ├─────────────────────────────────────────────────────────┤
//! │                    ParticleField                         │
//! │  1. Update  指针吸引 → 积分 → 摩擦 → 边界反射              │
//! │  2. Render  拖尾填充 → 连线 (O(n²)) → 径向光晕             │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Surface                               │
//! │  RecordingSurface / RasterSurface / CanvasSurface        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```rust
//! use virus_field::config::FieldConfig;
//! use virus_field::core::ManualScheduler;
//! use virus_field::render::particles::{FieldEngine, PointerSample};
//! use virus_field::render::surface::{LogicalSize, RecordingSurface};
//!
//! let mut engine: FieldEngine<RecordingSurface, ManualScheduler> =
//!     FieldEngine::seeded(FieldConfig::default(), 1.0, ManualScheduler::new(), 42);
//! engine.mount(RecordingSurface::new(LogicalSize::new(900.0, 900.0)));
//! engine.activate();
//!
//! let pointer = PointerSample::new(450.0, 450.0, true);
//! assert!(engine.step(Some(&pointer)));
//! assert_eq!(engine.particles().len(), 60);
//! ```

pub mod engine;
pub mod field;
pub mod particle;

pub use engine::{FieldEngine, FieldStats};
pub use field::{Link, Links, ParticleField, PointerSample};
pub use particle::{particle_count, Particle};
