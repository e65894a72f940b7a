use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use egui::{
    Color32, CornerRadius, CursorIcon, Key, Pos2, Rect, Sense, Stroke, StrokeKind,
    ViewportCommand,
};
use snaptext_ocr::{PointerEvent, RegionSelector, SelectionOverlay, SelectionPhase};
use snaptext_types::CaptureRect;
use tracing::debug;
use winit::platform::x11::EventLoopBuilderExtX11;

/// Fullscreen transparent selection window.
///
/// Blocks the calling thread for the lifetime of the window, which is the
/// contract of [`RegionSelector`]; the worker invokes it from a blocking
/// context. Escape dismisses without a selection.
pub struct EframeSelector;

impl RegionSelector for EframeSelector {
    fn select_region(&self) -> Result<Option<CaptureRect>> {
        let result: Arc<Mutex<Option<CaptureRect>>> = Arc::new(Mutex::new(None));
        let app_result = Arc::clone(&result);

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_fullscreen(true)
                .with_transparent(true)
                .with_always_on_top()
                .with_decorations(false),
            // The selector runs from a worker thread, not the process main
            // thread; only X11 permits that.
            event_loop_builder: Some(Box::new(|builder| {
                builder.with_any_thread(true);
            })),
            ..Default::default()
        };

        eframe::run_native(
            "snaptext-selection",
            options,
            Box::new(move |_cc| {
                Ok(Box::new(OverlayApp {
                    overlay: SelectionOverlay::new(),
                    result: app_result,
                }))
            }),
        )
        .map_err(|err| anyhow!("selection overlay failed: {err}"))?;

        let selection = result.lock().map_err(|_| anyhow!("selection lock poisoned"))?;
        debug!(?selection, "selection window closed");
        Ok(*selection)
    }
}

struct OverlayApp {
    overlay: SelectionOverlay,
    result: Arc<Mutex<Option<CaptureRect>>>,
}

impl OverlayApp {
    fn to_screen_px(pos: Pos2, ppp: f32) -> (i32, i32) {
        ((pos.x * ppp).round() as i32, (pos.y * ppp).round() as i32)
    }
}

impl eframe::App for OverlayApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.output_mut(|o| o.cursor_icon = CursorIcon::Crosshair);

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            ctx.send_viewport_cmd(ViewportCommand::Close);
            return;
        }

        let ppp = ctx.pixels_per_point();
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), Sense::click_and_drag());

                if let Some(pos) = response.interact_pointer_pos() {
                    let (x, y) = Self::to_screen_px(pos, ppp);
                    if response.drag_started() {
                        self.overlay.handle(PointerEvent::Pressed { x, y });
                    } else if response.drag_stopped() {
                        self.overlay.handle(PointerEvent::Released { x, y });
                    } else if response.dragged() {
                        self.overlay.handle(PointerEvent::Moved { x, y });
                    }
                }

                painter.rect_filled(
                    response.rect,
                    CornerRadius::ZERO,
                    Color32::from_black_alpha(80),
                );
                if let Some(rect) = self.overlay.live_rect() {
                    let feedback = Rect::from_min_max(
                        Pos2::new(rect.x as f32 / ppp, rect.y as f32 / ppp),
                        Pos2::new(
                            (rect.x + rect.width as i32) as f32 / ppp,
                            (rect.y + rect.height as i32) as f32 / ppp,
                        ),
                    );
                    painter.rect_stroke(
                        feedback,
                        CornerRadius::ZERO,
                        Stroke::new(2.0, Color32::RED),
                        StrokeKind::Outside,
                    );
                }
            });

        if self.overlay.phase() == SelectionPhase::Captured {
            if let Ok(mut slot) = self.result.lock() {
                *slot = self.overlay.result();
            }
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }
    }
}
