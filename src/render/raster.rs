//! 软件光栅表面
//!
//! 在 `image::RgbaImage` 上实现 [`Surface`]，采用与 2D 画布相同的源覆盖混合。
//! 用于无头预览和像素级测试。

use crate::core::error::{RenderError, RenderResult};
use crate::render::color::{Hsla, Rgba};
use crate::render::surface::{DeviceSize, Glow, LogicalSize, Surface};
use glam::Vec2;
use image::{ImageFormat, RgbaImage};
use std::path::Path;

/// 软件光栅表面
pub struct RasterSurface {
    logical: LogicalSize,
    image: RgbaImage,
}

impl RasterSurface {
    /// 创建表面，光栅在首次 `resize` 前为 1×1
    pub fn new(logical: LogicalSize) -> Self {
        Self {
            logical,
            image: RgbaImage::new(1, 1),
        }
    }

    /// 模拟容器尺寸变化
    pub fn set_logical_size(&mut self, logical: LogicalSize) {
        self.logical = logical;
    }

    pub fn size(&self) -> DeviceSize {
        DeviceSize::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// 读取像素 `[r, g, b, a]`，越界返回 `None`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// 导出为 PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| RenderError::Encode {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    fn blend_at(&mut self, x: i64, y: i64, rgb: [f32; 3], alpha: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        pixel.0 = source_over(pixel.0, rgb, alpha);
    }
}

/// 源覆盖混合（非预乘存储）
fn source_over(dst: [u8; 4], src: [f32; 3], src_alpha: f32) -> [u8; 4] {
    let sa = src_alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let d = dst[i] as f32 / 255.0;
        let c = (src[i] * sa + d * da * (1.0 - sa)) / out_a;
        out[i] = to_byte(c);
    }
    out[3] = to_byte(out_a);
    out
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Surface for RasterSurface {
    fn measure(&self) -> LogicalSize {
        self.logical
    }

    fn resize(&mut self, size: DeviceSize) {
        self.image = RgbaImage::new(size.width, size.height);
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            pixel.0 = [0, 0, 0, 0];
        }
    }

    fn fill(&mut self, color: Rgba) {
        let rgb = color.rgb_unit();
        for pixel in self.image.pixels_mut() {
            pixel.0 = source_over(pixel.0, rgb, color.a);
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Hsla, width: f32) {
        let rgb = color.to_rgb();
        let delta = to - from;
        let steps = delta.abs().max_element().ceil().max(1.0) as i64;
        let half = (width.round().max(1.0) as i64) / 2;
        let thickness = width.round().max(1.0) as i64;

        let mut last: Option<(i64, i64)> = None;
        for step in 0..=steps {
            let point = from + delta * (step as f32 / steps as f32);
            let cell = (point.x.floor() as i64, point.y.floor() as i64);
            if last == Some(cell) {
                continue;
            }
            last = Some(cell);
            for oy in 0..thickness {
                for ox in 0..thickness {
                    self.blend_at(cell.0 + ox - half, cell.1 + oy - half, rgb, color.a);
                }
            }
        }
    }

    fn fill_glow(&mut self, glow: &Glow) {
        if glow.radius <= 0.0 || glow.falloff <= 0.0 {
            return;
        }
        let rgb = glow.color.to_rgb();
        let min_x = (glow.center.x - glow.radius).floor() as i64;
        let max_x = (glow.center.x + glow.radius).ceil() as i64;
        let min_y = (glow.center.y - glow.radius).floor() as i64;
        let max_y = (glow.center.y + glow.radius).ceil() as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let distance = sample.distance(glow.center);
                if distance > glow.radius {
                    continue;
                }
                let t = (distance / glow.falloff).min(1.0);
                self.blend_at(x, y, rgb, glow.color.a * (1.0 - t));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(width: u32, height: u32) -> RasterSurface {
        let mut surface = RasterSurface::new(LogicalSize::new(width as f32, height as f32));
        surface.resize(DeviceSize::new(width, height));
        surface
    }

    #[test]
    fn test_trail_fill_accumulates() {
        let mut surface = surface(4, 4);
        let trail = Rgba::new(10, 12, 24, 0.05);

        surface.fill(trail);
        let first = surface.pixel(0, 0).unwrap()[3];
        surface.fill(trail);
        let second = surface.pixel(0, 0).unwrap()[3];

        assert_eq!(first, 13);
        assert!(second > first);
        assert_eq!(surface.pixel(3, 3).unwrap()[0], 10);
    }

    #[test]
    fn test_line_touches_endpoints() {
        let mut surface = surface(16, 16);
        let color = Hsla::new(0.0, 100.0, 50.0, 1.0);
        surface.stroke_line(Vec2::new(1.5, 1.5), Vec2::new(12.5, 8.5), color, 1.0);

        assert_eq!(surface.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(12, 8), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(15, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_glow_fades_outwards() {
        let mut surface = surface(32, 32);
        let glow = Glow {
            center: Vec2::new(16.0, 16.0),
            radius: 8.0,
            falloff: 8.0,
            color: Hsla::new(200.0, 90.0, 65.0, 1.0),
        };
        surface.fill_glow(&glow);

        let inner = surface.pixel(16, 16).unwrap()[3];
        let outer = surface.pixel(21, 16).unwrap()[3];
        assert!(inner > outer);
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clear_and_save() {
        let mut surface = surface(8, 8);
        surface.fill(Rgba::new(255, 255, 255, 1.0));
        surface.clear();
        assert_eq!(surface.pixel(4, 4), Some([0, 0, 0, 0]));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        surface.save_png(&path).unwrap();
        assert!(path.exists());
    }
}
