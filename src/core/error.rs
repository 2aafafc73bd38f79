//! 统一错误处理模块
//!
//! 粒子场引擎本身的运行路径是"尽力而为"的：表面缺失、尺寸退化、指针缺失
//! 都不是错误。这里的错误类型只覆盖配置加载和光栅导出这类真正可能失败的操作。

use crate::config::ConfigError;
use thiserror::Error;

/// 粒子场顶层错误类型
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// 渲染/导出错误
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to encode image {path}: {reason}")]
    Encode { path: String, reason: String },
}

/// 结果类型别名
pub type FieldResult<T> = Result<T, FieldError>;
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::ValidationError("friction".to_string());
        let field_err: FieldError = config_err.into();
        assert!(matches!(field_err, FieldError::Config(_)));

        let render_err = RenderError::Encode {
            path: "frame.png".to_string(),
            reason: "disk full".to_string(),
        };
        let field_err: FieldError = render_err.into();
        assert!(matches!(field_err, FieldError::Render(RenderError::Encode { .. })));
    }

    #[test]
    fn test_error_display() {
        let err = RenderError::Encode {
            path: "frame.png".to_string(),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to encode image frame.png: disk full");
    }
}
