//! 绘制表面抽象
//!
//! 引擎只依赖一个矩形光栅表面：能测量所在容器的逻辑尺寸、能设置设备像素尺寸，
//! 并提供拖尾填充、直线和径向光晕三种绘制原语。

use crate::render::color::{Hsla, Rgba};
use glam::Vec2;

/// 容器的屏幕尺寸（CSS 像素）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LogicalSize {
    pub width: f32,
    pub height: f32,
}

impl LogicalSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 光栅尺寸（设备像素），每个轴至少为 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceSize {
    pub width: u32,
    pub height: u32,
}

impl DeviceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// 逻辑尺寸换算为设备像素：`max(1, floor(css × ratio))`
    ///
    /// 零、负数和非有限值都落到 1。
    pub fn from_logical(size: LogicalSize, ratio: PixelRatio) -> Self {
        Self::new(
            to_device_axis(size.width, ratio),
            to_device_axis(size.height, ratio),
        )
    }

    /// 面积（设备像素²）
    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

fn to_device_axis(css: f32, ratio: PixelRatio) -> u32 {
    let scaled = (css * ratio.get()).floor();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled as u32
    } else {
        1
    }
}

/// 设备像素比，构造时钳制到 `[1, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRatio(f32);

impl PixelRatio {
    /// 默认上限
    pub const DEFAULT_MAX: f32 = 2.0;

    /// 钳制到 `[1, max]`，非有限值视为 1
    pub fn new(raw: f32, max: f32) -> Self {
        let max = if max.is_finite() { max.max(1.0) } else { Self::DEFAULT_MAX };
        if raw.is_finite() {
            Self(raw.clamp(1.0, max))
        } else {
            Self(1.0)
        }
    }

    pub fn get(&self) -> f32 {
        self.0
    }
}

impl Default for PixelRatio {
    fn default() -> Self {
        Self(1.0)
    }
}

/// 径向光晕：中心颜色线性衰减到透明，填充在半径为 `radius` 的圆盘内
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub center: Vec2,
    /// 圆盘半径
    pub radius: f32,
    /// 渐变外半径，在此处完全透明
    pub falloff: f32,
    pub color: Hsla,
}

/// 绘制表面
pub trait Surface {
    /// 测量容器当前的逻辑尺寸
    fn measure(&self) -> LogicalSize;

    /// 设置光栅尺寸，内容随之清空
    fn resize(&mut self, size: DeviceSize);

    /// 清空为全透明
    fn clear(&mut self);

    /// 以源覆盖方式填充整个表面
    fn fill(&mut self, color: Rgba);

    /// 绘制直线
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Hsla, width: f32);

    /// 绘制径向光晕
    fn fill_glow(&mut self, glow: &Glow);
}

/// 绘制命令
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(DeviceSize),
    Clear,
    Fill(Rgba),
    Line {
        from: Vec2,
        to: Vec2,
        color: Hsla,
        width: f32,
    },
    Glow(Glow),
}

/// 记录所有绘制命令的表面
///
/// 容器尺寸由调用方设置，用于模拟布局变化。
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    logical: LogicalSize,
    size: Option<DeviceSize>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(logical: LogicalSize) -> Self {
        Self {
            logical,
            size: None,
            commands: Vec::new(),
        }
    }

    /// 模拟容器尺寸变化
    pub fn set_logical_size(&mut self, logical: LogicalSize) {
        self.logical = logical;
    }

    /// 最近一次设置的光栅尺寸
    pub fn size(&self) -> Option<DeviceSize> {
        self.size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// 取出并清空已记录的命令
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    pub fn glow_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Glow(_)))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn measure(&self) -> LogicalSize {
        self.logical
    }

    fn resize(&mut self, size: DeviceSize) {
        self.size = Some(size);
        self.commands.push(DrawCommand::Resize(size));
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Hsla, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_glow(&mut self, glow: &Glow) {
        self.commands.push(DrawCommand::Glow(*glow));
    }
}
