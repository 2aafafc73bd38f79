//! 核心模块
//!
//! 包含与具体宿主无关的基础设施：
//! - `error` - 错误类型定义
//! - `scheduler` - 帧调度抽象
//! - `macros` - 样板代码宏

pub mod error;
pub mod scheduler;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{FieldError, FieldResult, RenderError, RenderResult};

// 重新导出调度类型
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
