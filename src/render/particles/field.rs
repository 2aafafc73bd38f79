//! 粒子场状态与单帧步进
//!
//! 每一帧分两个完整的阶段：先更新全部粒子，再绘制。
//! 绘制阶段只读取更新后的状态，不会看到半更新的粒子。

use crate::config::FieldConfig;
use crate::render::color::Hsla;
use crate::render::particles::particle::{particle_count, Particle};
use crate::render::surface::{DeviceSize, Glow, PixelRatio, Surface};
use glam::Vec2;
use rand::Rng;

/// 指针采样（宿主坐标系，CSS 像素）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    /// 指针是否在区域内
    pub inside: bool,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, inside: bool) -> Self {
        Self { x, y, inside }
    }

    /// 设备像素坐标；指针不在区域内时为 `None`
    pub fn device_position(&self, ratio: PixelRatio) -> Option<Vec2> {
        if self.inside && self.x.is_finite() && self.y.is_finite() {
            Some(Vec2::new(self.x, self.y) * ratio.get())
        } else {
            None
        }
    }
}

/// 两个粒子之间的连线
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// 较小的粒子下标
    pub a: usize,
    /// 较大的粒子下标
    pub b: usize,
    pub distance: f32,
    /// `link_opacity × (1 - distance / max_distance)`
    pub opacity: f32,
    /// 两端色相的平均值
    pub hue: f32,
}

/// 粒子场
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    ratio: PixelRatio,
    size: DeviceSize,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// 创建空粒子场
    pub fn new(config: FieldConfig, ratio: PixelRatio) -> Self {
        Self {
            config,
            ratio,
            size: DeviceSize::new(1, 1),
            particles: Vec::new(),
        }
    }

    /// 用给定粒子创建粒子场
    pub fn with_particles(
        config: FieldConfig,
        ratio: PixelRatio,
        size: DeviceSize,
        particles: Vec<Particle>,
    ) -> Self {
        Self {
            config,
            ratio,
            size,
            particles,
        }
    }

    /// 按新尺寸重新生成全部粒子，旧粒子直接丢弃
    pub fn reset<R: Rng + ?Sized>(&mut self, size: DeviceSize, rng: &mut R) {
        let count = particle_count(size, &self.config);
        self.size = size;
        self.particles = (0..count)
            .map(|_| Particle::sample(rng, size, self.ratio, &self.config))
            .collect();
        tracing::debug!(
            target: "virus_field",
            "Spawned {} particles for {}x{}",
            count,
            size.width,
            size.height
        );
    }

    /// 丢弃全部粒子
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> DeviceSize {
        self.size
    }

    pub fn ratio(&self) -> PixelRatio {
        self.ratio
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// 连线最大距离（设备像素）
    pub fn link_distance(&self) -> f32 {
        self.config.link_distance * self.ratio.get()
    }

    /// 推进一帧：指针吸引、积分、摩擦、边界反射
    pub fn update(&mut self, pointer: Option<&PointerSample>) {
        let attractor = pointer.and_then(|p| p.device_position(self.ratio));
        let bounds = self.size.as_vec2();
        let cap = self.config.attraction_cap;
        let strength = self.config.attraction_strength;
        let softening = self.config.attraction_softening;
        let friction = self.config.friction;

        for particle in &mut self.particles {
            if let Some(target) = attractor {
                let delta = target - particle.position;
                let force = cap.min(strength / (delta.length_squared() + softening));
                particle.velocity += delta * force;
            }

            particle.position += particle.velocity;
            particle.velocity *= friction;

            if particle.position.x < 0.0 || particle.position.x > bounds.x {
                particle.velocity.x = -particle.velocity.x;
                particle.position.x = particle.position.x.clamp(0.0, bounds.x);
            }
            if particle.position.y < 0.0 || particle.position.y > bounds.y {
                particle.velocity.y = -particle.velocity.y;
                particle.position.y = particle.position.y.clamp(0.0, bounds.y);
            }
        }
    }

    /// 枚举所有距离小于最大距离的无序粒子对，每对恰好一次
    pub fn links(&self) -> Links<'_> {
        Links {
            particles: &self.particles,
            max_distance: self.link_distance(),
            max_opacity: self.config.link_opacity,
            i: 0,
            j: 1,
        }
    }

    /// 绘制当前状态，返回绘制的连线数
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        let config = &self.config;
        let ratio = self.ratio.get();

        if config.full_clear {
            surface.clear();
        }
        surface.fill(config.trail);

        let line_width = config.line_width * ratio;
        let mut drawn = 0;
        for link in self.links() {
            let color = Hsla::new(link.hue, config.saturation, config.lightness, link.opacity);
            surface.stroke_line(
                self.particles[link.a].position,
                self.particles[link.b].position,
                color,
                line_width,
            );
            drawn += 1;
        }

        let falloff = config.glow_radius * ratio;
        for particle in &self.particles {
            surface.fill_glow(&Glow {
                center: particle.position,
                radius: particle.radius * ratio,
                falloff,
                color: Hsla::new(
                    particle.hue,
                    config.saturation,
                    config.lightness,
                    config.glow_alpha * particle.alpha,
                ),
            });
        }

        drawn
    }
}

/// 连线迭代器，`O(n²)` 遍历所有 `i < j` 的粒子对
pub struct Links<'a> {
    particles: &'a [Particle],
    max_distance: f32,
    max_opacity: f32,
    i: usize,
    j: usize,
}

impl Iterator for Links<'_> {
    type Item = Link;

    fn next(&mut self) -> Option<Link> {
        let n = self.particles.len();
        while self.i < n {
            while self.j < n {
                let (i, j) = (self.i, self.j);
                self.j += 1;

                let a = &self.particles[i];
                let b = &self.particles[j];
                let distance = a.position.distance(b.position);
                if distance < self.max_distance {
                    return Some(Link {
                        a: i,
                        b: j,
                        distance,
                        opacity: self.max_opacity * (1.0 - distance / self.max_distance),
                        hue: (a.hue + b.hue) / 2.0,
                    });
                }
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        None
    }
}
