//! 渲染模块
//!
//! - `color` - CSS 颜色类型
//! - `surface` - 绘制表面抽象与命令记录表面
//! - `raster` - 软件光栅表面
//! - `particles` - 粒子网络场

pub mod color;
pub mod particles;
pub mod raster;
pub mod surface;

// Re-export surface components
pub use color::{Hsla, Rgba};
pub use raster::RasterSurface;
pub use surface::{DeviceSize, DrawCommand, Glow, LogicalSize, PixelRatio, RecordingSurface, Surface};

// Re-export particle field components
pub use particles::{FieldEngine, FieldStats, Link, Particle, ParticleField, PointerSample};
