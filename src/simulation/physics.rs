use std::time::Duration;

use super::Contact;

mod defaults {
    use std::time::Duration;

    pub const G: f64 = 1.;
    pub const DT: f64 = 0.02;
    pub const CRASH_SPEED: f64 = 3.;
    pub const FUEL: i32 = 10;
    pub const SIDE_THRUST: f64 = 1.;
    pub const MAIN_THRUST: f64 = 3.;
    pub const SIDE_FUEL_COST: i32 = 1;
    pub const MAIN_FUEL_COST: i32 = 2;
    // 20 frames at 60 Hz
    pub const FLAME_DURATION: Duration = Duration::from_millis(333);
    pub const EXPLOSION_DURATION: Duration = Duration::from_millis(333);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrustCommand {
    Left,
    Right,
    Up,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LanderState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fuel: i32,
    pub flight_time: f64,
}

impl LanderState {
    pub const STARTING_FUEL: i32 = defaults::FUEL;

    pub fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    pub fn with_vx(self, vx: f64) -> Self {
        Self { vx, ..self }
    }

    pub fn with_vy(self, vy: f64) -> Self {
        Self { vy, ..self }
    }

    pub fn with_fuel(self, fuel: i32) -> Self {
        Self { fuel, ..self }
    }

    pub fn with_flight_time(self, flight_time: f64) -> Self {
        Self {
            flight_time,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    OutOfFuel(ThrustCommand),
}

#[derive(Debug, Clone)]
pub struct Physics {
    g: f64,
    dt: f64,
    crash_speed: f64,
    side_thrust: f64,
    main_thrust: f64,
    side_fuel_cost: i32,
    main_fuel_cost: i32,
    flame_duration: Duration,
    explosion_duration: Duration,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            g: defaults::G,
            dt: defaults::DT,
            crash_speed: defaults::CRASH_SPEED,
            side_thrust: defaults::SIDE_THRUST,
            main_thrust: defaults::MAIN_THRUST,
            side_fuel_cost: defaults::SIDE_FUEL_COST,
            main_fuel_cost: defaults::MAIN_FUEL_COST,
            flame_duration: defaults::FLAME_DURATION,
            explosion_duration: defaults::EXPLOSION_DURATION,
        }
    }
}

impl Physics {
    pub fn with_g(self, g: f64) -> Self {
        Self { g, ..self }
    }

    pub fn with_dt(self, dt: f64) -> Self {
        assert!(dt > 0.);
        Self { dt, ..self }
    }

    pub fn with_crash_speed(self, crash_speed: f64) -> Self {
        Self {
            crash_speed,
            ..self
        }
    }

    pub fn with_side_thrust(self, side_thrust: f64) -> Self {
        Self {
            side_thrust,
            ..self
        }
    }

    pub fn with_main_thrust(self, main_thrust: f64) -> Self {
        Self {
            main_thrust,
            ..self
        }
    }

    pub fn with_fuel_costs(self, side_fuel_cost: i32, main_fuel_cost: i32) -> Self {
        Self {
            side_fuel_cost,
            main_fuel_cost,
            ..self
        }
    }

    pub fn with_flame_duration(self, flame_duration: Duration) -> Self {
        Self {
            flame_duration,
            ..self
        }
    }

    pub fn with_explosion_duration(self, explosion_duration: Duration) -> Self {
        Self {
            explosion_duration,
            ..self
        }
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn crash_speed(&self) -> f64 {
        self.crash_speed
    }

    pub fn flame_duration(&self) -> Duration {
        self.flame_duration
    }

    pub fn explosion_duration(&self) -> Duration {
        self.explosion_duration
    }

    pub fn fuel_cost(&self, cmd: ThrustCommand) -> i32 {
        match cmd {
            ThrustCommand::Left | ThrustCommand::Right => self.side_fuel_cost,
            ThrustCommand::Up => self.main_fuel_cost,
        }
    }

    /// One free-fall tick. Horizontal speed is a per-tick displacement,
    /// vertical displacement restarts from `vy` whenever `flight_time` is reset.
    pub fn fall(&self, mut lander: LanderState) -> LanderState {
        lander.flight_time += self.dt;
        let t = lander.flight_time;

        lander.x += lander.vx;
        lander.y += lander.vy * t + 0.5 * self.g * t.powf(2.);
        lander
    }

    /// Folds the fall accumulated since the last baseline into `vy`.
    pub fn settle(&self, mut lander: LanderState) -> LanderState {
        lander.vy += self.g * lander.flight_time;
        lander.flight_time = 0.;
        lander
    }

    /// Fires a thruster. The guard only checks for a non-empty tank, so the
    /// main engine may leave the fuel one unit below zero.
    pub fn apply(
        &self,
        lander: LanderState,
        cmd: ThrustCommand,
    ) -> Result<LanderState, SimulationError> {
        if lander.fuel <= 0 {
            return Err(SimulationError::OutOfFuel(cmd));
        }

        let mut lander = self.settle(lander);
        match cmd {
            ThrustCommand::Left => lander.vx -= self.side_thrust,
            ThrustCommand::Right => lander.vx += self.side_thrust,
            ThrustCommand::Up => lander.vy -= self.main_thrust,
        }
        lander.fuel -= self.fuel_cost(cmd);
        Ok(lander)
    }

    pub fn is_crash(&self, contact: Contact, vy: f64) -> bool {
        !contact.is_level() || vy > self.crash_speed
    }
}
