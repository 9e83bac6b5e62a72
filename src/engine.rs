use crate::{
    color::Rgba,
    strerr::Strerr,
    surface::{Paint, Rect, Shape, Style, Surface},
};
use sdl2::{
    EventPump, Sdl,
    pixels::Color,
    rect::Rect as SdlRect,
    render::{BlendMode, Canvas, TextureCreator},
    ttf::Font,
    video::{Window, WindowContext},
};

pub struct Engine {
    pub sdl_context: Sdl,
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    queue: Vec<(Shape, Style)>,
    title: String,
}

impl Engine {
    pub fn new(title: &str, (width, height): (u32, u32)) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .strerr()?;

        let mut canvas = window
            .into_canvas()
            .present_vsync()
            .accelerated()
            .build()
            .strerr()?;
        canvas.set_blend_mode(BlendMode::Blend);
        let texture_creator = canvas.texture_creator();

        Ok(Self {
            sdl_context,
            canvas,
            texture_creator,
            queue: Vec::new(),
            title: title.to_string(),
        })
    }

    pub fn event_pump(&self) -> Result<EventPump, String> {
        self.sdl_context.event_pump()
    }

    pub fn size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }

    pub fn set_status(&mut self, status: impl AsRef<str>) -> Result<(), String> {
        let title = format!("{} | {}", self.title, status.as_ref());
        self.canvas.window_mut().set_title(&title).strerr()
    }

    pub fn frame<'a, 'f>(&'a mut self, font: &'a Font<'f, 'static>) -> Frame<'a, 'f> {
        self.queue.clear();
        Frame { engine: self, font }
    }

    fn flush(&mut self, font: &Font) -> Result<(), String> {
        let mut queue = std::mem::take(&mut self.queue);
        queue.sort_by_key(|(_, style)| style.layer);

        self.canvas.set_clip_rect(None);
        self.canvas.set_draw_color(Color::RGB(0x10, 0x11, 0x16));
        self.canvas.clear();

        for (shape, style) in &queue {
            self.canvas.set_clip_rect(style.clip.map(to_sdl));
            self.execute(shape, style, font)?;
        }

        self.canvas.set_clip_rect(None);
        self.canvas.present();
        self.queue = queue;
        Ok(())
    }

    fn execute(&mut self, shape: &Shape, style: &Style, font: &Font) -> Result<(), String> {
        match shape {
            Shape::Rect(rect) => {
                if let Some(paint) = style.fill {
                    self.fill_rows(*rect, 0.0, paint, style.alpha)?;
                }
                if let Some(stroke) = style.stroke {
                    self.outline(*rect, sdl_color(stroke.color, style.alpha), stroke.width)?;
                }
            }
            Shape::RoundRect { rect, radius } => {
                if let Some(paint) = style.fill {
                    self.fill_rows(*rect, *radius, paint, style.alpha)?;
                }
                if let Some(stroke) = style.stroke {
                    self.outline(*rect, sdl_color(stroke.color, style.alpha), stroke.width)?;
                }
            }
            Shape::Circle { x, y, r } => {
                let color = style.fill.map_or(Rgba::WHITE, |p| p.at(0.5));
                self.canvas.set_draw_color(sdl_color(color, style.alpha));

                let r = r.max(0.5);
                let mut dy = -r;
                while dy <= r {
                    let half = (r * r - dy * dy).max(0.0).sqrt();
                    self.canvas.fill_rect(SdlRect::new(
                        (x - half).round() as i32,
                        (y + dy).round() as i32,
                        (half * 2.0).round().max(1.0) as u32,
                        1,
                    ))?;
                    dy += 1.0;
                }
            }
            Shape::Line { x1, y1, x2, y2 } => {
                let stroke = style.stroke.map_or((Rgba::WHITE, 1.0), |s| (s.color, s.width));
                self.canvas.set_draw_color(sdl_color(stroke.0, style.alpha));
                let width = stroke.1.max(1.0).round() as u32;

                if y1 == y2 {
                    self.canvas.fill_rect(SdlRect::new(
                        x1.min(*x2).round() as i32,
                        y1.round() as i32,
                        (x2 - x1).abs().round().max(1.0) as u32,
                        width,
                    ))?;
                } else if x1 == x2 {
                    self.canvas.fill_rect(SdlRect::new(
                        x1.round() as i32,
                        y1.min(*y2).round() as i32,
                        width,
                        (y2 - y1).abs().round().max(1.0) as u32,
                    ))?;
                } else {
                    self.canvas.draw_line(
                        (x1.round() as i32, y1.round() as i32),
                        (x2.round() as i32, y2.round() as i32),
                    )?;
                }
            }
            Shape::Text { text, x, y } => {
                if text.is_empty() {
                    return Ok(());
                }
                let color = style.fill.map_or(Rgba::WHITE, |p| p.at(0.0));
                let surface = font
                    .render(text)
                    .blended(sdl_color(color, style.alpha))
                    .strerr()?;
                let texture = surface.as_texture(&self.texture_creator).strerr()?;
                self.canvas.copy(
                    &texture,
                    None,
                    SdlRect::new(
                        x.round() as i32,
                        y.round() as i32,
                        surface.width(),
                        surface.height(),
                    ),
                )?;
            }
        }

        Ok(())
    }

    fn fill_rows(
        &mut self,
        rect: Rect,
        radius: f32,
        paint: Paint,
        alpha: f32,
    ) -> Result<(), String> {
        if rect.is_empty() || !(rect.x.is_finite() && rect.y.is_finite()) {
            return Ok(());
        }

        let radius = radius.clamp(0.0, rect.w.min(rect.h) / 2.0);
        let rows = rect.h.ceil() as i32;

        if let (Paint::Solid(color), true) = (paint, radius < 1.0) {
            self.canvas.set_draw_color(sdl_color(color, alpha));
            return self.canvas.fill_rect(to_sdl(rect));
        }

        for row in 0..rows {
            let mid = row as f32 + 0.5;
            let into_corner = if mid < radius {
                radius - mid
            } else if mid > rect.h - radius {
                mid - (rect.h - radius)
            } else {
                0.0
            };
            let inset = radius - (radius * radius - into_corner * into_corner).max(0.0).sqrt();
            let width = rect.w - inset * 2.0;
            if width <= 0.0 {
                continue;
            }

            let y = rect.y + row as f32;
            match paint {
                Paint::HorizontalGradient(..) => {
                    let cols = width.ceil() as i32;
                    for col in 0..cols {
                        let t = (inset + col as f32) / rect.w;
                        self.canvas.set_draw_color(sdl_color(paint.at(t), alpha));
                        self.canvas.draw_point((
                            (rect.x + inset).round() as i32 + col,
                            y.round() as i32,
                        ))?;
                    }
                }
                _ => {
                    self.canvas.set_draw_color(sdl_color(paint.at(mid / rect.h), alpha));
                    self.canvas.fill_rect(SdlRect::new(
                        (rect.x + inset).round() as i32,
                        y.round() as i32,
                        width.round().max(1.0) as u32,
                        1,
                    ))?;
                }
            }
        }

        Ok(())
    }

    fn outline(&mut self, rect: Rect, color: Color, width: f32) -> Result<(), String> {
        if rect.is_empty() || width <= 0.0 {
            return Ok(());
        }

        self.canvas.set_draw_color(color);
        for i in 0..width.round().max(1.0) as i32 {
            let r = to_sdl(rect);
            let w = r.width().saturating_sub(2 * i as u32);
            let h = r.height().saturating_sub(2 * i as u32);
            if w == 0 || h == 0 {
                break;
            }
            self.canvas.draw_rect(SdlRect::new(r.x() + i, r.y() + i, w, h))?;
        }

        Ok(())
    }
}

fn to_sdl(rect: Rect) -> SdlRect {
    SdlRect::new(
        rect.x.round() as i32,
        rect.y.round() as i32,
        rect.w.round().max(1.0) as u32,
        rect.h.round().max(1.0) as u32,
    )
}

fn sdl_color(color: Rgba, alpha: f32) -> Color {
    let a = (color.a * alpha).clamp(0.0, 1.0);
    Color::RGBA(color.r, color.g, color.b, (a * 255.0).round() as u8)
}

pub struct Frame<'a, 'f> {
    engine: &'a mut Engine,
    font: &'a Font<'f, 'static>,
}

impl Frame<'_, '_> {
    pub fn present(self) -> Result<(), String> {
        self.engine.flush(self.font)
    }
}

impl Surface for Frame<'_, '_> {
    fn size(&self) -> (f32, f32) {
        let (w, h) = self.engine.size();
        (w as f32, h as f32)
    }

    fn draw(&mut self, shape: &Shape, style: &Style) -> Result<(), String> {
        self.engine.queue.push((shape.clone(), style.clone()));
        Ok(())
    }

    fn text_width(&self, text: &str) -> f32 {
        self.font.size_of(text).map_or(0.0, |(w, _)| w as f32)
    }
}
