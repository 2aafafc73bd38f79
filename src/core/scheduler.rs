//! 帧调度系统
//!
//! 抽象"在下一次刷新前运行回调"这一宿主能力及其取消操作。
//!
//! ## 功能特性
//!
//! - 帧请求与句柄
//! - 同步、幂等的取消
//! - 手动步进调度器（测试和无头渲染使用）
//!
//! 浏览器中由 `requestAnimationFrame` 实现（见 `web` 模块），
//! 测试中由 [`ManualScheduler`] 逐帧驱动。

use std::collections::VecDeque;

/// 帧请求句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// 由宿主提供的请求 ID 创建句柄
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// 请求 ID
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// 帧调度器
///
/// 一次 `request_frame` 对应宿主的一次帧回调。
/// `cancel_frame` 对已触发、已取消或未知的句柄必须是无操作。
pub trait FrameScheduler {
    /// 请求下一帧回调；宿主拒绝请求时返回 `None`
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// 取消尚未触发的帧请求
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// 手动步进调度器
///
/// 帧请求进入队列，由调用方通过 [`ManualScheduler::fire`] 逐个触发。
///
/// # 示例
///
/// ```rust
/// use virus_field::core::scheduler::{FrameScheduler, ManualScheduler};
///
/// let mut scheduler = ManualScheduler::new();
/// let handle = scheduler.request_frame();
/// assert_eq!(scheduler.fire(), handle);
/// assert_eq!(scheduler.fire(), None);
/// ```
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 触发最早的待处理帧，返回其句柄
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.queue.pop_front()
    }

    /// 待处理的帧请求数
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// 最早的待处理帧
    pub fn pending(&self) -> Option<FrameHandle> {
        self.queue.front().copied()
    }

    /// 累计请求数
    pub fn requested_count(&self) -> u64 {
        self.requested
    }

    /// 实际生效的取消数（忽略无操作的取消）
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle::new(self.next_id);
        self.queue.push_back(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.queue.len();
        self.queue.retain(|pending| *pending != handle);
        if self.queue.len() != before {
            self.cancelled += 1;
        }
    }
}
