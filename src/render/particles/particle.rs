//! 粒子数据与随机采样

use crate::config::FieldConfig;
use crate::render::surface::{DeviceSize, PixelRatio};
use glam::Vec2;
use rand::Rng;

/// 单个模拟粒子
///
/// 位置和速度都以设备像素为单位，速度单位为像素/帧。
/// 半径、色相和透明度在创建后不再改变。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// 绘制半径（未乘像素比）
    pub radius: f32,
    /// 色相，`[200, 320)`
    pub hue: f32,
    /// 透明度，`[0.5, 1.0)`
    pub alpha: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            radius: 2.0,
            hue: 260.0,
            alpha: 1.0,
        }
    }

    /// 在 `[0, width) × [0, height)` 内随机生成粒子
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        size: DeviceSize,
        ratio: PixelRatio,
        config: &FieldConfig,
    ) -> Self {
        let position = Vec2::new(
            rng.gen::<f32>() * size.width as f32,
            rng.gen::<f32>() * size.height as f32,
        );
        let speed = config.initial_speed * ratio.get();
        let velocity = Vec2::new(
            (rng.gen::<f32>() - 0.5) * speed,
            (rng.gen::<f32>() - 0.5) * speed,
        );

        Self {
            position,
            velocity,
            radius: config.radius.sample(rng),
            hue: config.hue.sample(rng),
            alpha: config.alpha.sample(rng),
        }
    }

    pub fn with_hue(mut self, hue: f32) -> Self {
        self.hue = hue;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// 按面积计算粒子数
///
/// `floor(base × clamp(area / reference_side², density_min, density_max))`，
/// 以双精度计算，保证边界值（如 `60 × 1.4 = 84`）精确。
/// 区间颠倒或为 NaN 时不会 panic：先取下限再取上限。
pub fn particle_count(size: DeviceSize, config: &FieldConfig) -> usize {
    let reference_area = config.reference_side * config.reference_side;
    let density = (size.area() / reference_area)
        .max(config.density_min)
        .min(config.density_max);
    if density.is_finite() && density > 0.0 {
        (config.base_count as f64 * density).floor() as usize
    } else {
        0
    }
}
