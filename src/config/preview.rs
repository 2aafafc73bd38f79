use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 无头预览配置
///
/// 预览程序在软件光栅上运行若干帧并导出最后一帧。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// 容器逻辑宽度（CSS 像素）
    pub width: f32,

    /// 容器逻辑高度（CSS 像素）
    pub height: f32,

    /// 设备像素比（会被钳制）
    pub pixel_ratio: f32,

    /// 运行帧数
    pub frames: u32,

    /// 随机种子
    pub seed: u64,

    /// 输出 PNG 路径
    pub output: String,

    /// 指针是否沿圆轨迹移动
    pub orbit_pointer: bool,
}

impl_default!(PreviewConfig {
    width: 640.0,
    height: 360.0,
    pixel_ratio: 1.0,
    frames: 240,
    seed: 42,
    output: "virus_field.png".to_string(),
    orbit_pointer: true,
});

impl PreviewConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::ValidationError(
                "Invalid preview size".to_string(),
            ));
        }
        if self.frames == 0 {
            return Err(ConfigError::ValidationError(
                "Preview needs at least one frame".to_string(),
            ));
        }
        if self.output.is_empty() {
            return Err(ConfigError::ValidationError(
                "Preview output path is empty".to_string(),
            ));
        }
        Ok(())
    }
}
