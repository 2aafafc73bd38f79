//! 粒子场引擎
//!
//! 管理激活、尺寸变化和逐帧循环的生命周期。表面、调度器和随机源都由外部注入，
//! 引擎本身与任何 UI 框架无关。
//!
//! ## 生命周期
//!
//! - **激活**：测量容器、换算设备像素、生成粒子、请求第一帧
//! - **逐帧**：更新全部粒子 → 绘制 → 请求下一帧
//! - **停用**：同步取消待处理的帧请求，丢弃粒子
//! - **尺寸变化**：先拆除再重建，保证同一表面上不会有两个循环

use crate::config::FieldConfig;
use crate::core::scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
use crate::render::particles::field::{ParticleField, PointerSample};
use crate::render::particles::particle::Particle;
use crate::render::surface::{DeviceSize, PixelRatio, Surface};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 引擎运行统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// 成功启动循环的次数（包括尺寸变化引起的重建）
    pub activations: u64,
    /// 已执行的帧数
    pub ticks: u64,
    /// 上一帧绘制的连线数
    pub last_link_count: usize,
}

/// 粒子场引擎
pub struct FieldEngine<S, F, R = StdRng> {
    field: ParticleField,
    surface: Option<S>,
    scheduler: F,
    rng: R,
    frame: Option<FrameHandle>,
    active: bool,
    stats: FieldStats,
}

impl<S, F> FieldEngine<S, F, StdRng>
where
    S: Surface,
    F: FrameScheduler,
{
    /// 使用固定种子的标准随机源创建引擎
    pub fn seeded(config: FieldConfig, pixel_ratio: f32, scheduler: F, seed: u64) -> Self {
        Self::new(config, pixel_ratio, scheduler, StdRng::seed_from_u64(seed))
    }
}

impl<S, F, R> FieldEngine<S, F, R>
where
    S: Surface,
    F: FrameScheduler,
    R: Rng,
{
    /// 创建引擎
    ///
    /// `pixel_ratio` 在这里被钳制到 `[1, max_pixel_ratio]`，之后不再改变。
    pub fn new(config: FieldConfig, pixel_ratio: f32, scheduler: F, rng: R) -> Self {
        let ratio = PixelRatio::new(pixel_ratio, config.max_pixel_ratio);
        Self {
            field: ParticleField::new(config, ratio),
            surface: None,
            scheduler,
            rng,
            frame: None,
            active: false,
            stats: FieldStats::default(),
        }
    }

    /// 挂载绘制表面
    ///
    /// 如果引擎此前在没有表面时被激活，挂载后立即启动。
    pub fn mount(&mut self, surface: S) {
        self.stop();
        self.surface = Some(surface);
        if self.active {
            self.start();
        }
    }

    /// 用可能失败的构造函数挂载表面
    ///
    /// 构造失败时保持原状态并返回错误，调用方可以稍后重试。
    /// 成功时返回循环是否已启动。
    pub fn try_mount<E>(&mut self, make: impl FnOnce() -> Result<S, E>) -> Result<bool, E> {
        let surface = make()?;
        self.mount(surface);
        Ok(self.is_running())
    }

    /// 卸载绘制表面，循环随之停止
    pub fn unmount(&mut self) -> Option<S> {
        self.stop();
        self.surface.take()
    }

    /// 按外部开关启动或停止
    pub fn set_active(&mut self, active: bool) -> bool {
        if active {
            self.activate()
        } else {
            self.deactivate();
            false
        }
    }

    /// 激活引擎，返回循环是否已启动
    ///
    /// 表面尚未挂载时静默返回 `false`，挂载后会自动重试。
    /// 已在运行时会先拆除旧循环再重建。
    pub fn activate(&mut self) -> bool {
        self.active = true;
        self.start()
    }

    /// 停用引擎
    ///
    /// 同步取消待处理的帧请求。重复调用或在任何帧之前调用都是无操作。
    pub fn deactivate(&mut self) {
        self.active = false;
        self.stop();
    }

    /// 容器尺寸变化通知
    ///
    /// 运行中时重新测量并按新密度重建粒子；旧粒子不做迁移。
    pub fn on_resize(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        tracing::debug!(target: "virus_field", "Container resized, rebuilding particles");
        self.start()
    }

    /// 执行一帧
    ///
    /// 只有与当前待处理请求匹配的句柄才会执行；过期或已取消的句柄返回 `false`。
    /// 下一帧请求被拒绝时循环停止，`is_running` 随之变为 `false`。
    pub fn tick(&mut self, handle: FrameHandle, pointer: Option<&PointerSample>) -> bool {
        if self.frame != Some(handle) {
            return false;
        }
        self.frame = None;

        let surface = match self.surface.as_mut() {
            Some(surface) => surface,
            None => return false,
        };

        self.field.update(pointer);
        let links = self.field.render(surface);

        self.stats.ticks += 1;
        self.stats.last_link_count = links;
        tracing::trace!(
            target: "virus_field",
            "Tick {}: {} particles, {} links",
            self.stats.ticks,
            self.field.particles().len(),
            links
        );

        self.frame = self.scheduler.request_frame();
        if self.frame.is_none() {
            tracing::warn!(target: "virus_field", "Frame request refused, loop stopped");
        }
        true
    }

    /// 拆除并重新建立循环
    fn start(&mut self) -> bool {
        self.stop();

        let ratio = self.field.ratio();
        let surface = match self.surface.as_mut() {
            Some(surface) => surface,
            None => {
                tracing::debug!(target: "virus_field", "No surface mounted, activation skipped");
                return false;
            }
        };

        let size = DeviceSize::from_logical(surface.measure(), ratio);
        surface.resize(size);
        self.field.reset(size, &mut self.rng);
        self.frame = self.scheduler.request_frame();
        if self.frame.is_none() {
            tracing::warn!(target: "virus_field", "Frame request refused, activation skipped");
            self.field.clear();
            return false;
        }
        self.stats.activations += 1;
        true
    }

    fn stop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.field.clear();
    }

    /// 外部开关状态
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// 是否有待处理的帧请求
    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn particles(&self) -> &[Particle] {
        self.field.particles()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn size(&self) -> DeviceSize {
        self.field.size()
    }

    pub fn pixel_ratio(&self) -> PixelRatio {
        self.field.ratio()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// 表面的可变引用，用于宿主调整容器尺寸
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn stats(&self) -> FieldStats {
        self.stats
    }
}

impl<S, R> FieldEngine<S, ManualScheduler, R>
where
    S: Surface,
    R: Rng,
{
    /// 触发调度器中的下一帧
    pub fn step(&mut self, pointer: Option<&PointerSample>) -> bool {
        match self.scheduler.fire() {
            Some(handle) => self.tick(handle, pointer),
            None => false,
        }
    }
}
