//! 浏览器宿主绑定
//!
//! 把引擎接到 `<canvas>` 上：
//! - [`CanvasSurface`]：`CanvasRenderingContext2d` 实现的绘制表面，测量外层容器
//! - [`AnimationFrameScheduler`]：`requestAnimationFrame` / `cancelAnimationFrame`
//! - [`VirusField`]：导出给 JS 的句柄，负责窗口 `resize` 监听和指针输入
//!
//! 画布调用的失败只记录日志，不会中断页面。

use crate::config::FieldConfig;
use crate::core::scheduler::{FrameHandle, FrameScheduler};
use crate::render::color::{Hsla, Rgba};
use crate::render::particles::{FieldEngine, PointerSample};
use crate::render::surface::{DeviceSize, Glow, LogicalSize, Surface};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Window};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type WebEngine = FieldEngine<CanvasSurface, AnimationFrameScheduler, StdRng>;

/// 2D 画布表面
pub struct CanvasSurface {
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// 获取画布的 2D 上下文
    pub fn new(container: HtmlElement, canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            container,
            canvas,
            context,
        })
    }

    fn extent(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }
}

impl Surface for CanvasSurface {
    fn measure(&self) -> LogicalSize {
        let rect = self.container.get_bounding_client_rect();
        LogicalSize::new(rect.width() as f32, rect.height() as f32)
    }

    fn resize(&mut self, size: DeviceSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn clear(&mut self) {
        let (width, height) = self.extent();
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn fill(&mut self, color: Rgba) {
        let (width, height) = self.extent();
        self.context.set_fill_style_str(&color.to_string());
        self.context.fill_rect(0.0, 0.0, width, height);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Hsla, width: f32) {
        let context = &self.context;
        context.set_stroke_style_str(&color.to_string());
        context.set_line_width(width as f64);
        context.begin_path();
        context.move_to(from.x as f64, from.y as f64);
        context.line_to(to.x as f64, to.y as f64);
        context.stroke();
    }

    fn fill_glow(&mut self, glow: &Glow) {
        let (x, y) = (glow.center.x as f64, glow.center.y as f64);
        let context = &self.context;
        let result = context
            .create_radial_gradient(x, y, 0.0, x, y, glow.falloff as f64)
            .and_then(|gradient| {
                gradient.add_color_stop(0.0, &glow.color.to_string())?;
                gradient.add_color_stop(1.0, &Rgba::TRANSPARENT_WHITE.to_string())?;
                context.set_fill_style_canvas_gradient(&gradient);
                context.begin_path();
                context.arc(x, y, glow.radius as f64, 0.0, TAU)?;
                context.fill();
                Ok(())
            });
        if let Err(err) = result {
            tracing::debug!(target: "virus_field", "Glow draw failed: {:?}", err);
        }
    }
}

/// `requestAnimationFrame` 调度器
///
/// 回调闭包由 [`VirusField`] 在引擎创建之后装入。
pub struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref()?;
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle::new(id as u64)),
            Err(err) => {
                tracing::warn!(target: "virus_field", "requestAnimationFrame failed: {:?}", err);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.id() as i32);
    }
}

/// 尚未成功挂载的容器和画布
type PendingCanvas = RefCell<Option<(HtmlElement, HtmlCanvasElement)>>;

/// 导出给 JS 的粒子场句柄
#[wasm_bindgen]
pub struct VirusField {
    engine: Rc<RefCell<WebEngine>>,
    pending: PendingCanvas,
    pointer: Rc<Cell<Option<PointerSample>>>,
    window: Window,
    frame_callback: FrameCallback,
    resize_listener: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl VirusField {
    /// 创建粒子场；`config_json` 为 `FieldConfig` 的 JSON 覆盖，缺省使用默认值
    ///
    /// 覆盖后的配置未通过验证时返回错误。画布上下文暂不可用时不报错，
    /// 在 `setActive(true)` 或 `mount` 时重试。
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        config_json: Option<String>,
    ) -> Result<VirusField, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
        let config = match config_json {
            Some(json) => serde_json::from_str::<FieldConfig>(&json)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => FieldConfig::default(),
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = AnimationFrameScheduler {
            window: window.clone(),
            callback: frame_callback.clone(),
        };
        let mut engine = FieldEngine::new(
            config,
            window.device_pixel_ratio() as f32,
            scheduler,
            StdRng::from_entropy(),
        );
        let pending = RefCell::new(None);
        if let Err(err) =
            engine.try_mount(|| CanvasSurface::new(container.clone(), canvas.clone()))
        {
            tracing::debug!(target: "virus_field", "Canvas not ready: {:?}", err);
            *pending.borrow_mut() = Some((container, canvas));
        }

        let engine = Rc::new(RefCell::new(engine));
        let pointer = Rc::new(Cell::new(None));

        let weak_engine = Rc::downgrade(&engine);
        let frame_pointer = pointer.clone();
        *frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_timestamp: f64| {
            let Some(engine) = weak_engine.upgrade() else {
                return;
            };
            let Ok(mut engine) = engine.try_borrow_mut() else {
                return;
            };
            if let Some(handle) = engine.pending_frame() {
                let sample = frame_pointer.get();
                engine.tick(handle, sample.as_ref());
            }
        }) as Box<dyn FnMut(f64)>));

        let weak_engine = Rc::downgrade(&engine);
        let resize_listener = Closure::wrap(Box::new(move || {
            if let Some(engine) = weak_engine.upgrade() {
                if let Ok(mut engine) = engine.try_borrow_mut() {
                    engine.on_resize();
                }
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", resize_listener.as_ref().unchecked_ref())?;

        Ok(VirusField {
            engine,
            pending,
            pointer,
            window,
            frame_callback,
            resize_listener,
        })
    }

    /// 外部开关；激活时若画布此前未就绪会重新挂载
    #[wasm_bindgen(js_name = setActive)]
    pub fn set_active(&self, active: bool) -> bool {
        let Ok(mut engine) = self.engine.try_borrow_mut() else {
            return false;
        };
        let running = engine.set_active(active);
        if !active || engine.surface().is_some() {
            return running;
        }
        let Some((container, canvas)) = self.pending.borrow_mut().take() else {
            return running;
        };
        match engine.try_mount(|| CanvasSurface::new(container.clone(), canvas.clone())) {
            Ok(running) => running,
            Err(err) => {
                tracing::debug!(target: "virus_field", "Canvas still not ready: {:?}", err);
                *self.pending.borrow_mut() = Some((container, canvas));
                false
            }
        }
    }

    /// 挂载（或替换）容器和画布；已激活时立即启动循环
    pub fn mount(
        &self,
        container: HtmlElement,
        canvas: HtmlCanvasElement,
    ) -> Result<bool, JsValue> {
        let mut engine = self
            .engine
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("engine busy"))?;
        let running = engine.try_mount(|| CanvasSurface::new(container, canvas))?;
        self.pending.borrow_mut().take();
        Ok(running)
    }

    /// 更新指针采样（CSS 像素）
    #[wasm_bindgen(js_name = setPointer)]
    pub fn set_pointer(&self, x: f32, y: f32, inside: bool) {
        self.pointer.set(Some(PointerSample::new(x, y, inside)));
    }

    #[wasm_bindgen(js_name = clearPointer)]
    pub fn clear_pointer(&self) {
        self.pointer.set(None);
    }

    /// 容器尺寸变化（例如由 ResizeObserver 触发）
    pub fn resize(&self) -> bool {
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => engine.on_resize(),
            Err(_) => false,
        }
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.engine
            .try_borrow()
            .map(|engine| engine.particles().len())
            .unwrap_or(0)
    }
}

impl Drop for VirusField {
    fn drop(&mut self) {
        if let Ok(mut engine) = self.engine.try_borrow_mut() {
            engine.deactivate();
        }
        let _ = self.window.remove_event_listener_with_callback(
            "resize",
            self.resize_listener.as_ref().unchecked_ref(),
        );
        self.frame_callback.borrow_mut().take();
    }
}
