//! 核心宏定义
//!
//! 提供统一的宏来减少配置结构体的样板代码

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use virus_field::impl_default;
///
/// struct Palette {
///     hue: f32,
///     name: String,
/// }
///
/// impl_default!(Palette {
///     hue: 200.0,
///     name: String::from("teal"),
/// });
///
/// assert_eq!(Palette::default().hue, 200.0);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {

    struct GlowSettings {
        radius: f32,
        label: String,
    }

    impl_default!(GlowSettings {
        radius: 8.0,
        label: String::new(),
    });

    #[test]
    fn test_impl_default() {
        let settings = GlowSettings::default();

        assert_eq!(settings.radius, 8.0);
        assert_eq!(settings.label, "");
    }
}
