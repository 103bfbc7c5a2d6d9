use crate::error::Error;
use crate::simulation::*;
use json::{self, JsonValue};
use std::{fs::File, io::Read, path::Path};

macro_rules! get_json {
    ($json:ident,$($key:literal),+, $func:ident) => {
            get_json!($json$([$key])+, concat!($("/",$key),+), $func)
    };

    ($value:expr, $key:expr, $func:ident) => {
        $value
            .$func()
            .ok_or(Error::MissingKey($key))?
    };
}

macro_rules! get_json_or {
    ($json:ident,$($key:literal),+, $func:ident, $default:expr) => {
        {
            let value = &$json$([$key])+;
            if value.is_null() {
                $default
            } else {
                value
                    .$func()
                    .ok_or(Error::MissingKey(concat!($("/",$key),+)))?
            }
        }
    };
}

macro_rules! json_value_or_err {
    ($json:ident,$($key:literal),+) => {
            {
                let value = &$json$([$key])+;
                if value.is_null() {
                    Err(Error::MissingKey(concat!($("/",$key),+)))
                }else{
                    Ok(value)
                }
            }
    };
}

/// Everything needed to start a run, as read from a scenario file.
pub struct Scenario {
    pub terrain: Terrain,
    pub field_width: f64,
    pub lander: LanderState,
    pub physics: Physics,
}

pub fn parse_scenario<P: AsRef<Path>>(scenario_file_path: P) -> Result<Scenario, Error> {
    parse_from_json(&read_json(scenario_file_path.as_ref())?)
}

pub fn parse_from_string(scenario: &str) -> Result<Scenario, Error> {
    parse_from_json(&json::parse(scenario)?)
}

fn parse_from_json(json: &JsonValue) -> Result<Scenario, Error> {
    Ok(Scenario {
        terrain: parse_terrain(json_value_or_err!(json, "Terrain")?)?,
        field_width: get_json!(json, "Field", "Width", as_f64),
        lander: parse_lander(json)?,
        physics: parse_physics(json)?,
    })
}

fn read_json(file_path: &Path) -> Result<JsonValue, Error> {
    let mut file_content = String::new();
    let io_error = |source| Error::Io {
        path: file_path.to_owned(),
        source,
    };
    File::open(file_path)
        .map_err(io_error)?
        .read_to_string(&mut file_content)
        .map_err(io_error)?;
    Ok(json::parse(&file_content)?)
}

fn parse_terrain(terrain_array: &JsonValue) -> Result<Terrain, Error> {
    if !terrain_array.is_array() {
        return Err(Error::InvalidScenario("Terrain has to be an array".to_owned()));
    }
    let vertices = terrain_array
        .members()
        .map(|point_json| {
            let err = || {
                Error::InvalidScenario("Terrain has to contain numeric points".to_owned())
            };
            let x = point_json[0].as_f64().ok_or_else(err)?;
            let y = point_json[1].as_f64().ok_or_else(err)?;
            Ok((x, y))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Terrain::try_new(vertices)
}

fn parse_lander(json: &JsonValue) -> Result<LanderState, Error> {
    Ok(LanderState {
        x: get_json!(json, "Lander", "X", as_f64),
        y: get_json_or!(json, "Lander", "Y", as_f64, 0.),
        vx: get_json_or!(json, "Lander", "HSpeed", as_f64, 0.),
        vy: get_json_or!(json, "Lander", "VSpeed", as_f64, 0.),
        fuel: get_json_or!(json, "Lander", "Fuel", as_i32, LanderState::STARTING_FUEL),
        flight_time: 0.,
    })
}

fn parse_physics(json: &JsonValue) -> Result<Physics, Error> {
    let defaults = Physics::default();
    let dt = get_json_or!(json, "Physics", "TimeStep", as_f64, defaults.dt());
    if dt.is_nan() || dt <= 0. {
        return Err(Error::InvalidScenario(format!(
            "Physics/TimeStep has to be positive, got {dt}"
        )));
    }
    Ok(Physics::default()
        .with_g(get_json_or!(json, "Physics", "Gravity", as_f64, defaults.g()))
        .with_dt(dt)
        .with_crash_speed(get_json_or!(
            json,
            "Physics",
            "CrashSpeed",
            as_f64,
            defaults.crash_speed()
        )))
}

#[cfg(test)]
mod json_tests {
    use super::*;

    const FLAT_FIELD: &str = r#"{
        "Field": { "Width": 200 },
        "Lander": { "X": 50, "Y": 0, "HSpeed": 0, "VSpeed": 0, "Fuel": 6 },
        "Terrain": [[0, 0], [200, 0], [200, 100], [0, 100]],
        "Physics": { "Gravity": 2, "TimeStep": 0.01, "CrashSpeed": 4 }
    }"#;

    #[test]
    fn full_scenario() {
        let scenario = parse_from_string(FLAT_FIELD).unwrap();
        assert_eq!(scenario.field_width, 200.);
        assert_eq!(scenario.terrain.vertices().len(), 4);
        assert_eq!(
            scenario.lander,
            LanderState::default().with_x(50.).with_fuel(6)
        );
        assert_eq!(scenario.physics.g(), 2.);
        assert!((scenario.physics.dt() - 0.01).abs() < 1e-12);
        assert_eq!(scenario.physics.crash_speed(), 4.);
    }

    #[test]
    fn optional_keys_fall_back_to_defaults() {
        let scenario = parse_from_string(
            r#"{
                "Field": { "Width": 686 },
                "Lander": { "X": 319 },
                "Terrain": [[0, 0], [686, 0], [686, 650], [0, 650]]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.lander.fuel, 10);
        assert_eq!(scenario.lander.y, 0.);
        assert_eq!(scenario.physics.g(), 1.);
        assert_eq!(scenario.physics.dt(), 0.02);
        assert_eq!(scenario.physics.crash_speed(), 3.);
    }

    #[test]
    fn missing_terrain() {
        let result = parse_from_string(r#"{ "Field": { "Width": 200 }, "Lander": { "X": 5 } }"#);
        assert!(matches!(result, Err(Error::MissingKey("/Terrain"))));
    }

    #[test]
    fn missing_lander_x() {
        let result = parse_from_string(
            r#"{ "Field": { "Width": 200 }, "Lander": {}, "Terrain": [[0, 0], [1, 0], [1, 1]] }"#,
        );
        assert!(matches!(result, Err(Error::MissingKey("/Lander/X"))));
    }

    #[test]
    fn non_numeric_terrain() {
        let result = parse_from_string(
            r#"{ "Field": { "Width": 200 }, "Lander": { "X": 5 }, "Terrain": [[0, 0], ["a", 0], [1, 1]] }"#,
        );
        assert!(matches!(result, Err(Error::InvalidScenario(_))));
    }

    #[test]
    fn degenerate_terrain() {
        let result = parse_from_string(
            r#"{ "Field": { "Width": 200 }, "Lander": { "X": 5 }, "Terrain": [[0, 0], [1, 1]] }"#,
        );
        assert!(matches!(result, Err(Error::DegenerateTerrain(2))));
    }

    #[test]
    fn broken_json() {
        assert!(matches!(parse_from_string("{ \"Field\": "), Err(Error::Json(_))));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            parse_scenario("does/not/exist.json"),
            Err(Error::Io { .. })
        ));
    }
}
