use std::time::Duration;

use super::*;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    Flying,
    Landed,
    Crashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashPhase {
    Exploding,
    Wreckage,
}

/// Flames currently shown. A side thruster flame appears on the side
/// opposite to the push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThrusterFlags {
    pub left: bool,
    pub right: bool,
    pub main: bool,
}

impl ThrusterFlags {
    pub fn any(&self) -> bool {
        self.left || self.right || self.main
    }

    fn flag_mut(&mut self, cmd: ThrustCommand) -> &mut bool {
        match cmd {
            ThrustCommand::Left => &mut self.right,
            ThrustCommand::Right => &mut self.left,
            ThrustCommand::Up => &mut self.main,
        }
    }
}

#[derive(Debug)]
pub struct CraftState {
    lander: LanderState,
    initial_fuel: i32,
    physics: Physics,
    terrain: Terrain,
    footprint: Footprint,
    field_width: f64,
    contact: Contact,
    flight_state: FlightState,
    flames: ThrusterFlags,
    flame_timer: Duration,
    crash_timer: Duration,
}

impl CraftState {
    pub fn new(terrain: Terrain, field_width: f64, x: f64) -> Result<Self, Error> {
        Self::with_lander(
            terrain,
            field_width,
            LanderState::default()
                .with_x(x)
                .with_fuel(LanderState::STARTING_FUEL),
        )
    }

    pub fn with_lander(
        terrain: Terrain,
        field_width: f64,
        lander: LanderState,
    ) -> Result<Self, Error> {
        if field_width.is_nan() || field_width <= 0. {
            return Err(Error::InvalidFieldWidth(field_width));
        }
        Ok(Self::assemble(terrain, field_width, lander))
    }

    /// The Martian field with the craft centred above it.
    pub fn martian() -> Self {
        let field_width = Terrain::MARTIAN_FIELD_WIDTH;
        Self::assemble(
            Terrain::martian(),
            field_width,
            LanderState::default()
                .with_x(field_width / 2. - 24.)
                .with_fuel(LanderState::STARTING_FUEL),
        )
    }

    fn assemble(terrain: Terrain, field_width: f64, lander: LanderState) -> Self {
        let mut craft = Self {
            initial_fuel: lander.fuel,
            lander,
            physics: Physics::default(),
            terrain,
            footprint: Footprint::default(),
            field_width,
            contact: Contact::default(),
            flight_state: FlightState::Flying,
            flames: ThrusterFlags::default(),
            flame_timer: Duration::ZERO,
            crash_timer: Duration::ZERO,
        };
        craft.resolve_contact();
        craft
    }

    pub fn with_physics(self, physics: Physics) -> Self {
        Self { physics, ..self }
    }

    pub fn with_footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = footprint;
        self.resolve_contact();
        self
    }

    /// Advances the simulation by one tick. `elapsed` is the wall-clock time
    /// since the previous tick and only drives the visual timers.
    pub fn step(&mut self, elapsed: Duration) {
        match self.flight_state {
            FlightState::Flying => {}
            FlightState::Crashed => {
                self.crash_timer += elapsed;
                return;
            }
            FlightState::Landed => return,
        }

        self.resolve_contact();

        let above_field = self.bottom() <= 0.;
        if self.contact.is_clear() || above_field {
            self.lander = self.physics.fall(self.lander.clone());
            self.wrap_position();
            self.decay_flames(elapsed);
        } else {
            self.touch_down();
        }
    }

    fn resolve_contact(&mut self) {
        let probe = self.footprint.probe(self.position(), self.field_width);
        self.contact = self.terrain.resolve_contact(&probe);
    }

    fn bottom(&self) -> f64 {
        self.lander.y + self.footprint.bottom_offset
    }

    fn wrap_position(&mut self) {
        let x = &mut self.lander.x;
        if *x + self.footprint.width < 0. {
            *x += self.field_width;
        } else if *x > self.field_width {
            *x -= self.field_width;
        }
    }

    fn decay_flames(&mut self, elapsed: Duration) {
        if !self.flames.any() {
            return;
        }
        self.flame_timer += elapsed;
        if self.flame_timer >= self.physics.flame_duration() {
            self.flames = ThrusterFlags::default();
        }
    }

    fn touch_down(&mut self) {
        self.lander = self.physics.settle(self.lander.clone());
        self.flight_state = if self.physics.is_crash(self.contact, self.lander.vy) {
            FlightState::Crashed
        } else {
            FlightState::Landed
        };
        log::info!(
            "Touchdown {:?} at ({:.1}, {:.1}) vy {:.2} contact {:?}",
            self.flight_state,
            self.lander.x,
            self.lander.y,
            self.lander.vy,
            self.contact
        );
    }

    pub fn thrust_left(&mut self) {
        self.command(ThrustCommand::Left)
    }

    pub fn thrust_right(&mut self) {
        self.command(ThrustCommand::Right)
    }

    pub fn thrust_up(&mut self) {
        self.command(ThrustCommand::Up)
    }

    pub fn command(&mut self, cmd: ThrustCommand) {
        if self.flight_state != FlightState::Flying {
            log::debug!("Ignoring {cmd:?}, craft is {:?}", self.flight_state);
            return;
        }
        match self.physics.apply(self.lander.clone(), cmd) {
            Ok(lander) => {
                self.lander = lander;
                *self.flames.flag_mut(cmd) = true;
                self.flame_timer = Duration::ZERO;
                log::debug!("{cmd:?} fired, fuel left {}", self.lander.fuel);
            }
            Err(SimulationError::OutOfFuel(cmd)) => {
                *self.flames.flag_mut(cmd) = false;
                log::warn!("{cmd:?} refused, tank is empty");
            }
        }
    }

    pub fn lander(&self) -> &LanderState {
        &self.lander
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.lander.x, self.lander.y)
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.lander.vx, self.lander.vy)
    }

    pub fn fuel(&self) -> i32 {
        self.lander.fuel
    }

    /// Remaining fuel as a fraction of the starting amount.
    pub fn fuel_gauge(&self) -> f64 {
        if self.initial_fuel <= 0 {
            return 0.;
        }
        (self.lander.fuel as f64 / self.initial_fuel as f64).clamp(0., 1.)
    }

    pub fn flight_time(&self) -> f64 {
        self.lander.flight_time
    }

    pub fn flight_state(&self) -> FlightState {
        self.flight_state
    }

    pub fn contact(&self) -> Contact {
        self.contact
    }

    pub fn flames(&self) -> ThrusterFlags {
        self.flames
    }

    pub fn flame_timer(&self) -> Duration {
        self.flame_timer
    }

    pub fn crash_phase(&self) -> Option<CrashPhase> {
        match self.flight_state {
            FlightState::Crashed if self.crash_timer < self.physics.explosion_duration() => {
                Some(CrashPhase::Exploding)
            }
            FlightState::Crashed => Some(CrashPhase::Wreckage),
            _ => None,
        }
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    pub fn field_width(&self) -> f64 {
        self.field_width
    }
}
