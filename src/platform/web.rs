//! Browser platform: canvas 2D surface, DOM HUD/overlay, keyboard and touch
//! input, and `requestAnimationFrame` scheduling.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlElement};

use super::{FrameHandle, FrameScheduler, HealthDisplay, InputState, Overlay};
use crate::error::{GameError, Result};
use crate::game::Game;
use crate::renderer::{Color, RenderSurface};
use crate::settings::Settings;

type WebGame = Game<CanvasSurface, RafScheduler>;

fn platform_err(what: &str) -> GameError {
    GameError::Platform(what.to_string())
}

/// Canvas-backed drawing surface
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    fn circle(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
    }
}

impl RenderSurface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.clear_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.circle(center, radius);
        self.ctx.fill();
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
        self.circle(center, radius);
        self.ctx.stroke();
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_vertical_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: Color,
        bottom: Color,
    ) {
        let gradient = self
            .ctx
            .create_linear_gradient(0.0, y as f64, 0.0, (y + h) as f64);
        let _ = gradient.add_color_stop(0.0, &top.css());
        let _ = gradient.add_color_stop(1.0, &bottom.css());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        let _ = self.ctx.translate(dx as f64, dy as f64);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        let _ = self.ctx.scale(sx as f64, sy as f64);
    }
}

/// Health bar as the CSS width of a DOM element
pub struct DomHealthBar(HtmlElement);

impl HealthDisplay for DomHealthBar {
    fn set_fill_ratio(&mut self, ratio: f32) {
        let pct = (ratio.clamp(0.0, 1.0) * 100.0).round();
        let _ = self.0.style().set_property("width", &format!("{}%", pct));
    }
}

/// Overlay built from `#overlay` and its title/message/button children
pub struct DomOverlay {
    root: Element,
    title: Element,
    message: Element,
    button: Element,
}

impl Overlay for DomOverlay {
    fn show(&mut self, title: &str, message: &str, action_label: &str) {
        self.title.set_text_content(Some(title));
        self.message.set_text_content(Some(message));
        self.button.set_text_content(Some(action_label));
        let _ = self.root.class_list().remove_1("hidden");
    }

    fn hide(&mut self) {
        let _ = self.root.class_list().add_1("hidden");
    }
}

type FrameSink = Rc<RefCell<Option<Box<dyn FnMut(FrameHandle)>>>>;

/// `requestAnimationFrame` scheduler. Fired handles are delivered to the
/// sink installed after the game is built.
pub struct RafScheduler {
    next_id: u64,
    last: Option<(FrameHandle, i32)>,
    sink: FrameSink,
}

impl RafScheduler {
    pub fn new() -> (Self, FrameSink) {
        let sink: FrameSink = Rc::new(RefCell::new(None));
        let scheduler = Self {
            next_id: 0,
            last: None,
            sink: Rc::clone(&sink),
        };
        (scheduler, sink)
    }
}

impl FrameScheduler for RafScheduler {
    fn schedule_next(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        let sink = Rc::clone(&self.sink);
        let closure = Closure::once(move |_time: f64| {
            if let Some(deliver) = sink.borrow_mut().as_mut() {
                deliver(handle);
            }
        });
        if let Some(window) = web_sys::window() {
            match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                Ok(id) => self.last = Some((handle, id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
        }
        closure.forget();
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if let Some((last, id)) = self.last {
            if last == handle {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
                self.last = None;
            }
        }
    }
}

fn fit_canvas(canvas: &HtmlCanvasElement) {
    canvas.set_width(canvas.offset_width().max(0) as u32);
    canvas.set_height(canvas.offset_height().max(0) as u32);
}

fn health_bar(document: &web_sys::Document, id: &str) -> Option<Box<dyn HealthDisplay>> {
    let el = document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()?;
    Some(Box::new(DomHealthBar(el)))
}

fn overlay(document: &web_sys::Document) -> Option<Box<dyn Overlay>> {
    Some(Box::new(DomOverlay {
        root: document.get_element_by_id("overlay")?,
        title: document.get_element_by_id("overlay-title")?,
        message: document.get_element_by_id("overlay-msg")?,
        button: document.get_element_by_id("overlay-btn")?,
    }))
}

/// Boot the game on the page's `#gameCanvas`
pub fn start() -> Result<()> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Shinobi Fighter starting...");

    let window = web_sys::window().ok_or_else(|| platform_err("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| platform_err("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id("gameCanvas")
        .ok_or_else(|| platform_err("no #gameCanvas"))?
        .dyn_into()
        .map_err(|_| platform_err("#gameCanvas is not a canvas"))?;
    fit_canvas(&canvas);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|_| platform_err("2d context unavailable"))?
        .ok_or_else(|| platform_err("2d context unavailable"))?
        .dyn_into()
        .map_err(|_| platform_err("2d context has the wrong type"))?;

    let input = Rc::new(RefCell::new(InputState::new()));
    let (scheduler, sink) = RafScheduler::new();
    let game: WebGame = Game::seeded(
        Settings::load(),
        CanvasSurface::new(canvas.clone(), ctx),
        Rc::clone(&input),
        scheduler,
        js_sys::Date::now() as u64,
    )?
    .with_health_displays(
        health_bar(&document, "player-hp"),
        health_bar(&document, "enemy-hp"),
    )
    .with_overlay(overlay(&document));
    let game = Rc::new(RefCell::new(game));

    {
        let weak = Rc::downgrade(&game);
        *sink.borrow_mut() = Some(Box::new(move |handle| {
            if let Some(game) = weak.upgrade() {
                if let Err(e) = game.borrow_mut().on_frame(handle) {
                    log::error!("Frame failed: {}", e);
                }
            }
        }));
    }

    setup_keyboard(&window, &input);
    setup_touch_buttons(&document, &input);
    setup_resize(&window, &canvas);
    setup_action_button(&document, &game);

    game.borrow_mut().boot();
    log::info!("Shinobi Fighter running!");
    Ok(())
}

fn setup_keyboard(window: &web_sys::Window, input: &Rc<RefCell<InputState>>) {
    {
        let input = Rc::clone(input);
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            input.borrow_mut().press(event.key());
        });
        let _ = window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    {
        let input = Rc::clone(input);
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            input.borrow_mut().release(&event.key());
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    // Keys released while unfocused never send keyup
    {
        let input = Rc::clone(input);
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            input.borrow_mut().clear();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// On-screen buttons standing in for keys on touch devices
fn setup_touch_buttons(document: &web_sys::Document, input: &Rc<RefCell<InputState>>) {
    const BUTTONS: [(&str, &str); 5] = [
        ("btn-left", "ArrowLeft"),
        ("btn-right", "ArrowRight"),
        ("btn-jump", "ArrowUp"),
        ("btn-attack", "z"),
        ("btn-special", "x"),
    ];

    for (id, key) in BUTTONS {
        let Some(el) = document.get_element_by_id(id) else {
            continue;
        };
        for event in ["touchstart", "mousedown"] {
            let input = Rc::clone(input);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                input.borrow_mut().press(key);
            });
            let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for event in ["touchend", "touchcancel", "mouseup", "mouseleave"] {
            let input = Rc::clone(input);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                input.borrow_mut().release(key);
            });
            let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

fn setup_resize(window: &web_sys::Window, canvas: &HtmlCanvasElement) {
    let canvas = canvas.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        fit_canvas(&canvas);
    });
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn setup_action_button(document: &web_sys::Document, game: &Rc<RefCell<WebGame>>) {
    let Some(btn) = document.get_element_by_id("overlay-btn") else {
        log::warn!("No #overlay-btn; the match can't be started");
        return;
    };
    let game = Rc::clone(game);
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
        if let Err(e) = game.borrow_mut().on_action_pressed() {
            log::error!("Start failed: {}", e);
        }
    });
    let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
