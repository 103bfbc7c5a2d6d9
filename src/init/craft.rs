use std::path::Path;

use super::json::{self, Scenario};
use crate::error::Error;
use crate::simulation::CraftState;

impl CraftState {
    pub fn try_from_file<P: AsRef<Path>>(scenario_file_path: P) -> Result<Self, Error> {
        Self::from_scenario(json::parse_scenario(scenario_file_path)?)
    }

    pub fn from_scenario(scenario: Scenario) -> Result<Self, Error> {
        let Scenario {
            terrain,
            field_width,
            lander,
            physics,
        } = scenario;
        Ok(Self::with_lander(terrain, field_width, lander)?.with_physics(physics))
    }
}

#[cfg(test)]
mod craft_init_tests {
    use super::*;
    use crate::simulation::FlightState;

    #[test]
    fn from_scenario_string() {
        let scenario = json::parse_from_string(
            r#"{
                "Field": { "Width": 200 },
                "Lander": { "X": 50, "VSpeed": 1, "Fuel": 4 },
                "Terrain": [[0, 0], [200, 0], [200, 100], [0, 100]],
                "Physics": { "CrashSpeed": 0.5 }
            }"#,
        )
        .unwrap();
        let mut craft = CraftState::from_scenario(scenario).unwrap();
        assert_eq!(craft.fuel(), 4);
        assert_eq!(craft.fuel_gauge(), 1.);

        while craft.flight_state() == FlightState::Flying {
            craft.step(std::time::Duration::from_millis(16));
        }
        assert_eq!(craft.flight_state(), FlightState::Crashed);
    }

    #[test]
    fn zero_field_width() {
        let scenario = json::parse_from_string(
            r#"{
                "Field": { "Width": 0 },
                "Lander": { "X": 50 },
                "Terrain": [[0, 0], [200, 0], [200, 100]]
            }"#,
        )
        .unwrap();
        assert!(matches!(
            CraftState::from_scenario(scenario),
            Err(Error::InvalidFieldWidth(_))
        ));
    }
}
