use super::{ConfigError, ConfigResult};
use crate::impl_default;
use crate::render::color::Rgba;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 粒子场调参配置
///
/// 所有数值的默认值都经过视觉调校，像素级一致需要原样保留。
/// 带 `× 像素比` 说明的字段在使用时会乘以设备像素比。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// 基础粒子数
    pub base_count: u32,

    /// 参考边长（设备像素），参考面积为其平方
    pub reference_side: f64,

    /// 密度系数下限
    pub density_min: f64,

    /// 密度系数上限
    pub density_max: f64,

    /// 指针吸引力上限
    pub attraction_cap: f32,

    /// 指针吸引强度
    pub attraction_strength: f32,

    /// 吸引力软化项（防止零距离奇点）
    pub attraction_softening: f32,

    /// 每帧速度衰减系数
    pub friction: f32,

    /// 初始速度幅度（× 像素比），分量取 `(u - 0.5) × initial_speed`
    pub initial_speed: f32,

    /// 粒子半径范围（× 像素比）
    pub radius: ValueRange,

    /// 色相范围
    pub hue: ValueRange,

    /// 透明度范围
    pub alpha: ValueRange,

    /// 连线最大距离（× 像素比）
    pub link_distance: f32,

    /// 连线最大不透明度
    pub link_opacity: f32,

    /// 连线宽度（× 像素比）
    pub line_width: f32,

    /// 光晕衰减半径（× 像素比）
    pub glow_radius: f32,

    /// 光晕中心不透明度（再乘以粒子自身透明度）
    pub glow_alpha: f32,

    /// HSL 饱和度（百分比）
    pub saturation: f32,

    /// HSL 亮度（百分比）
    pub lightness: f32,

    /// 拖尾填充色
    pub trail: Rgba,

    /// 拖尾填充前是否整帧清空
    pub full_clear: bool,

    /// 设备像素比上限
    pub max_pixel_ratio: f32,
}

impl_default!(FieldConfig {
    base_count: 60,
    reference_side: 900.0,
    density_min: 0.6,
    density_max: 1.4,
    attraction_cap: 0.0025,
    attraction_strength: 45.0,
    attraction_softening: 2000.0,
    friction: 0.98,
    initial_speed: 0.4,
    radius: ValueRange::new(1.6, 2.8),
    hue: ValueRange::new(200.0, 320.0),
    alpha: ValueRange::new(0.5, 1.0),
    link_distance: 110.0,
    link_opacity: 0.15,
    line_width: 1.0,
    glow_radius: 8.0,
    glow_alpha: 0.9,
    saturation: 90.0,
    lightness: 65.0,
    trail: Rgba::new(10, 12, 24, 0.05),
    full_clear: false,
    max_pixel_ratio: 2.0,
});

impl FieldConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_count == 0 {
            return Err(ConfigError::ValidationError(
                "base_count must be positive".to_string(),
            ));
        }
        if !(self.reference_side > 0.0) {
            return Err(ConfigError::ValidationError(
                "reference_side must be positive".to_string(),
            ));
        }
        if !(self.density_min > 0.0 && self.density_min <= self.density_max) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid density clamp [{}, {}]",
                self.density_min, self.density_max
            )));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "friction must be in (0, 1], got {}",
                self.friction
            )));
        }
        if !(self.attraction_softening > 0.0) {
            return Err(ConfigError::ValidationError(
                "attraction_softening must be positive".to_string(),
            ));
        }
        if !(self.link_distance > 0.0 && self.glow_radius > 0.0) {
            return Err(ConfigError::ValidationError(
                "link_distance and glow_radius must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.link_opacity) || !(0.0..=1.0).contains(&self.glow_alpha) {
            return Err(ConfigError::ValidationError(
                "Opacities must be within [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.trail.a) {
            return Err(ConfigError::ValidationError(
                "Trail alpha must be within [0, 1]".to_string(),
            ));
        }
        if self.max_pixel_ratio < 1.0 {
            return Err(ConfigError::ValidationError(
                "max_pixel_ratio must be at least 1".to_string(),
            ));
        }
        for (name, range) in [("radius", &self.radius), ("hue", &self.hue), ("alpha", &self.alpha)] {
            range.validate(name)?;
        }
        Ok(())
    }
}

/// 半开区间 `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// 区间内均匀采样；退化或非有限区间直接返回 `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min.is_finite() && self.max.is_finite() && self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        if self.max > self.min {
            value >= self.min && value < self.max
        } else {
            value == self.min
        }
    }

    fn validate(&self, name: &str) -> ConfigResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::ValidationError(format!(
                "Invalid {} range [{}, {})",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_constants() {
        let config = FieldConfig::default();
        assert_eq!(config.base_count, 60);
        assert_eq!(config.attraction_cap, 0.0025);
        assert_eq!(config.friction, 0.98);
        assert_eq!(config.trail, Rgba::new(10, 12, 24, 0.05));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_friction_rejected() {
        let config = FieldConfig {
            friction: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = FieldConfig {
            hue: ValueRange::new(320.0, 200.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_override_keeps_defaults() {
        let config: FieldConfig = serde_json::from_str(r#"{"friction":0.95}"#).unwrap();
        assert_eq!(config.friction, 0.95);
        assert_eq!(config.base_count, 60);
        assert_eq!(config.hue, ValueRange::new(200.0, 320.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_density_rejected() {
        let config = FieldConfig {
            density_min: 1.4,
            density_max: 0.6,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_range_sampling() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = ValueRange::new(200.0, 320.0);
        for _ in 0..1000 {
            assert!(range.contains(range.sample(&mut rng)));
        }

        let point = ValueRange::new(3.0, 3.0);
        assert_eq!(point.sample(&mut rng), 3.0);

        let inverted = ValueRange::new(320.0, 200.0);
        assert_eq!(inverted.sample(&mut rng), 320.0);
        let unbounded = ValueRange::new(0.0, f32::INFINITY);
        assert_eq!(unbounded.sample(&mut rng), 0.0);
    }
}
