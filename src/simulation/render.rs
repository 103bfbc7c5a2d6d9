use super::*;

mod defaults {
    pub const CRATER_OFFSET: f64 = 60.;
    pub const CRATER_RADIUS: f64 = 100.;
    pub const WRECKAGE_DROP: f64 = 50.;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const SKY: Color = Color::rgb(0, 0, 0);
    pub const GROUND: Color = Color::rgb(178, 84, 44);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Craft,
    LeftThruster,
    RightThruster,
    MainEngine,
    Explosion,
    Wreckage,
}

/// Drawing target of one frame. Sprites are positioned by their top-left
/// corner.
pub trait Surface {
    /// Acquires the target for drawing. Returning `false` skips the frame.
    fn begin_frame(&mut self) -> bool {
        true
    }

    /// Releases the target and presents whatever was drawn.
    fn end_frame(&mut self) {}

    fn clear(&mut self, color: Color);

    fn draw_sprite(&mut self, sprite: SpriteId, x: f64, y: f64);

    fn draw_filled_circle(&mut self, x: f64, y: f64, radius: f64, color: Color);

    fn fill_polygon(&mut self, vertices: &[Vec2], color: Color);
}

impl CraftState {
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(Color::GROUND);
        surface.fill_polygon(self.terrain().vertices(), Color::SKY);

        let Vec2 { x, y } = self.position();
        match self.flight_state() {
            FlightState::Flying => {
                self.draw_craft(surface, x);
                self.draw_wrap_around(surface, x);
            }
            FlightState::Landed => surface.draw_sprite(SpriteId::Craft, x, y),
            FlightState::Crashed => match self.crash_phase() {
                Some(CrashPhase::Exploding) | None => {
                    surface.draw_sprite(SpriteId::Explosion, x, y)
                }
                Some(CrashPhase::Wreckage) => {
                    surface.draw_filled_circle(
                        x + defaults::CRATER_OFFSET,
                        y + defaults::CRATER_OFFSET,
                        defaults::CRATER_RADIUS,
                        Color::SKY,
                    );
                    surface.draw_sprite(SpriteId::Wreckage, x, y + defaults::WRECKAGE_DROP);
                }
            },
        }
    }

    fn draw_craft<S: Surface + ?Sized>(&self, surface: &mut S, x: f64) {
        let y = self.position().y;
        surface.draw_sprite(SpriteId::Craft, x, y);

        let flames = self.flames();
        if flames.main {
            surface.draw_sprite(SpriteId::MainEngine, x, y);
        }
        if flames.left {
            surface.draw_sprite(SpriteId::LeftThruster, x, y);
        }
        if flames.right {
            surface.draw_sprite(SpriteId::RightThruster, x, y);
        }
    }

    // a craft straddling a seam shows up on both sides
    fn draw_wrap_around<S: Surface + ?Sized>(&self, surface: &mut S, x: f64) {
        let field_width = self.field_width();
        if x < 0. {
            self.draw_craft(surface, x + field_width);
        }
        if x + self.footprint().width > field_width {
            self.draw_craft(surface, x - field_width);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Sprite {
        sprite: SpriteId,
        x: f64,
        y: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
    },
    Polygon {
        vertices: usize,
        color: Color,
    },
}

/// Headless surface keeping the draw calls of the last presented frame.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pending: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
    frames: usize,
    in_frame: bool,
    available: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            last_frame: Vec::new(),
            frames: 0,
            in_frame: false,
            available: true,
        }
    }
}

impl RecordingSurface {
    pub fn with_available(self, available: bool) -> Self {
        Self { available, ..self }
    }

    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn is_in_frame(&self) -> bool {
        self.in_frame
    }

    pub fn sprites(&self) -> impl Iterator<Item = (SpriteId, f64, f64)> + '_ {
        self.last_frame.iter().filter_map(|call| match *call {
            DrawCall::Sprite { sprite, x, y } => Some((sprite, x, y)),
            _ => None,
        })
    }

    fn record(&mut self, call: DrawCall) {
        debug_assert!(self.in_frame, "drawing outside of a frame");
        self.pending.push(call);
    }
}

impl Surface for RecordingSurface {
    fn begin_frame(&mut self) -> bool {
        if !self.available {
            return false;
        }
        self.pending.clear();
        self.in_frame = true;
        true
    }

    fn end_frame(&mut self) {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames += 1;
        self.in_frame = false;
    }

    fn clear(&mut self, color: Color) {
        self.record(DrawCall::Clear(color));
    }

    fn draw_sprite(&mut self, sprite: SpriteId, x: f64, y: f64) {
        self.record(DrawCall::Sprite { sprite, x, y });
    }

    fn draw_filled_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
        self.record(DrawCall::Circle {
            x,
            y,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, vertices: &[Vec2], color: Color) {
        self.record(DrawCall::Polygon {
            vertices: vertices.len(),
            color,
        });
    }
}
