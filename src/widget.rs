use crate::graphics::PixelCanvas;
use crate::math::Rgb;
use crate::pointer::{DragState, PointerButton, PointerEvent};
use crate::simulation::Simulation;
use crate::state::AppState;
use druid::kurbo::Point;
use druid::text::FontFamily;
use druid::widget::prelude::*;
use druid::{
    commands,
    piet::{InterpolationMode, Text, TextLayout, TextLayoutBuilder},
    Color, MouseButton, MouseEvent, RenderContext, Widget,
};
use std::time::{Duration, Instant};

const BACKGROUND: Rgb = Rgb::WHITE;

/// Hosts a [`Simulation`]: feeds it pointer input, ticks it on a timer, paints it
pub struct SimulationWidget {
    simulation: Simulation,
    canvas: PixelCanvas,
    frame_interval: Duration,
    last_tick: Instant,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl SimulationWidget {
    /// `fps` is the target tick rate; it must be non-zero
    pub fn new(simulation: Simulation, fps: u64) -> Self {
        let now = Instant::now();
        SimulationWidget {
            simulation,
            canvas: PixelCanvas::new(0, 0),
            frame_interval: Duration::from_millis(1000 / fps.max(1)),
            last_tick: now,
            frames_since_last_update: 0,
            last_fps_calculation: now,
            fps: 0.0,
        }
    }

    /// Queues a pointer event in viewport coordinates
    fn queue(
        &mut self,
        event: fn(PointerButton, Point) -> PointerEvent,
        button: PointerButton,
        pos: Point,
    ) {
        self.simulation.push_event(event(button, pos));
    }

    fn pointer_button(mouse_event: &MouseEvent) -> Option<PointerButton> {
        match mouse_event.button {
            MouseButton::Left => Some(PointerButton::Primary),
            MouseButton::Right => Some(PointerButton::Secondary),
            _ => None,
        }
    }

    fn drag_label(&self) -> String {
        match self.simulation.drag_state() {
            DragState::Idle => "Drag: idle".to_string(),
            DragState::Dragging { index, .. } => format!("Drag: body {}", index),
        }
    }
}

impl Widget<AppState> for SimulationWidget {
    /// Handle events for the simulation widget
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut AppState, _env: &Env) {
        match event {
            Event::WindowConnected => {
                self.last_tick = Instant::now();
                ctx.request_timer(self.frame_interval);
                // Request focus to receive keyboard events
                ctx.request_focus();
            }
            Event::Timer(_) => {
                let now = Instant::now();
                let delta_time = now.duration_since(self.last_tick).as_secs_f64();
                self.last_tick = now;

                if data.paused {
                    self.simulation.discard_events();
                } else {
                    self.simulation.advance(delta_time);
                    data.body_count = self.simulation.bodies().len();
                    ctx.request_paint();
                }
                ctx.request_timer(self.frame_interval);
            }
            Event::KeyDown(key_event) => {
                if let druid::keyboard_types::Key::Character(s) = &key_event.key {
                    match s.as_str() {
                        "d" | "D" => {
                            data.debug = !data.debug;
                            ctx.request_paint();
                        }
                        "p" | "P" => {
                            data.paused = !data.paused;
                            // Let go of anything held so it does not stay frozen
                            self.simulation.discard_events();
                            self.simulation.handle_event(
                                PointerEvent::released(PointerButton::Primary, Point::ZERO),
                                0.0,
                            );
                            ctx.set_active(false);
                            ctx.request_paint();
                        }
                        "q" | "Q" => {
                            // Submit the QUIT_APP command to exit the application
                            ctx.submit_command(commands::QUIT_APP);
                        }
                        "r" | "R" => {
                            if !data.paused {
                                self.simulation.recenter();
                                data.body_count = self.simulation.bodies().len();
                                ctx.set_active(false);
                                ctx.request_paint();
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::MouseDown(mouse_event) => {
                if !data.paused {
                    if let Some(button) = Self::pointer_button(mouse_event) {
                        self.queue(PointerEvent::pressed, button, mouse_event.pos);
                        ctx.set_active(true); // Capture mouse events
                    }
                }
            }
            Event::MouseMove(mouse_event) => {
                if !data.paused && !mouse_event.buttons.is_empty() {
                    let button = if mouse_event.buttons.has_left() {
                        PointerButton::Primary
                    } else {
                        PointerButton::Secondary
                    };
                    self.queue(PointerEvent::dragged, button, mouse_event.pos);
                }
            }
            Event::MouseUp(mouse_event) => {
                if !data.paused {
                    if let Some(button) = Self::pointer_button(mouse_event) {
                        self.queue(PointerEvent::released, button, mouse_event.pos);
                    }
                    ctx.set_active(false);
                }
            }
            _ => {}
        }
    }

    fn lifecycle(
        &mut self,
        _ctx: &mut LifeCycleCtx,
        _event: &LifeCycle,
        _data: &AppState,
        _env: &Env,
    ) {
    }

    fn update(&mut self, _ctx: &mut UpdateCtx, _old_data: &AppState, _data: &AppState, _env: &Env) {}

    /// Fills the window; the simulation viewport is fixed by its config
    fn layout(
        &mut self,
        _layout_ctx: &mut LayoutCtx,
        bc: &BoxConstraints,
        _data: &AppState,
        _env: &Env,
    ) -> Size {
        bc.max()
    }

    /// Paint the simulation
    fn paint(&mut self, ctx: &mut PaintCtx, data: &AppState, _env: &Env) {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let size = ctx.size();
        let width = size.width as usize;
        let height = size.height as usize;
        if width == 0 || height == 0 {
            return;
        }
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas = PixelCanvas::new(width, height);
        }

        self.canvas.clear(BACKGROUND);
        self.simulation.render(&mut self.canvas);

        match ctx.make_image(
            width,
            height,
            self.canvas.pixels(),
            druid::piet::ImageFormat::RgbaSeparate,
        ) {
            Ok(image) => {
                ctx.draw_image(&image, size.to_rect(), InterpolationMode::NearestNeighbor)
            }
            Err(e) => log::error!("failed to build frame image: {e:?}"),
        }

        // Add debug info if debug mode is enabled
        if data.debug {
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("Bodies: {}", data.body_count),
                format!("FPS: {:.2}", self.fps),
                format!("Gravity: {:.2}", self.simulation.config().gravity),
                self.drag_label(),
            ];
            for (i, text) in lines.into_iter().enumerate() {
                let layout = ctx
                    .text()
                    .new_text_layout(text)
                    .font(FontFamily::SYSTEM_UI, 12.0)
                    .text_color(Color::BLACK)
                    .build();
                match layout {
                    Ok(layout) => ctx.draw_text(&layout, (10.0, 10.0 + 20.0 * i as f64)),
                    Err(e) => log::error!("failed to lay out debug text: {e:?}"),
                }
            }
        }

        // Display 'Paused' if the simulation is paused
        if data.paused {
            // Draw a semi-transparent overlay
            let overlay_color = Color::rgba8(0, 0, 0, 150);
            ctx.fill(size.to_rect(), &overlay_color);

            let layout = ctx
                .text()
                .new_text_layout("Paused")
                .font(FontFamily::SYSTEM_UI, 36.0)
                .default_attribute(druid::piet::FontWeight::BOLD)
                .text_color(Color::WHITE)
                .build();
            match layout {
                Ok(layout) => {
                    let text_size = layout.size();
                    let pos = (
                        (size.width - text_size.width) / 2.0,
                        (size.height - text_size.height) / 2.0,
                    );
                    ctx.draw_text(&layout, pos);
                }
                Err(e) => log::error!("failed to lay out pause banner: {e:?}"),
            }
        }
    }
}
