use std::thread;
use std::time::Duration;

use lander::{
    init, CraftState, FlightState, LanderState, RecordingSurface, RenderLoopDriver, SpriteId,
    Terrain,
};

const SCENARIO: &str = r#"{
    "Field": { "Width": 200 },
    "Lander": { "X": 50, "Y": 0, "Fuel": 10 },
    "Terrain": [[0, 0], [200, 0], [200, 100], [0, 100]]
}"#;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn flat_craft() -> CraftState {
    CraftState::from_scenario(init::json::parse_from_string(SCENARIO).unwrap()).unwrap()
}

fn wait_for(driver: &RenderLoopDriver<RecordingSurface>, done: impl Fn(&CraftState) -> bool) {
    for _ in 0..2_000 {
        if driver.inspect(|scene| done(&scene.craft)) {
            return;
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!("Render loop didn't reach the expected state");
}

#[test]
fn driver_lands_the_craft() {
    init_logger();
    let mut driver = RenderLoopDriver::spawn_with_cadence(
        flat_craft(),
        RecordingSurface::default(),
        Duration::from_millis(1),
    )
    .unwrap();

    wait_for(&driver, |craft| craft.flight_state() != FlightState::Flying);
    driver.stop().unwrap();

    driver.inspect(|scene| {
        assert_eq!(scene.craft.flight_state(), FlightState::Landed);
        assert!(scene.surface.frames() > 0);
        assert!(!scene.surface.is_in_frame());
        let Some((sprite, x, _)) = scene.surface.sprites().next() else {
            panic!("Nothing drawn");
        };
        assert_eq!(sprite, SpriteId::Craft);
        assert_eq!(x, 50.);
    });
}

#[test]
fn commands_from_another_thread() {
    init_logger();
    let craft = CraftState::with_lander(
        Terrain::try_new([(0., 0.), (200., 0.), (200., 100.), (0., 100.)]).unwrap(),
        200.,
        LanderState::default().with_x(50.).with_y(-10_000.).with_fuel(10),
    )
    .unwrap();
    let mut driver = RenderLoopDriver::spawn_with_cadence(
        craft,
        RecordingSurface::default(),
        Duration::from_millis(1),
    )
    .unwrap();

    let controls = driver.controls();
    let worker = {
        let controls = controls.clone();
        thread::spawn(move || {
            for _ in 0..3 {
                controls.thrust_left();
                controls.thrust_right();
            }
        })
    };
    controls.thrust_up();
    worker.join().unwrap();
    driver.stop().unwrap();

    driver.inspect(|scene| {
        assert_eq!(scene.craft.fuel(), 2);
        assert_eq!(scene.craft.velocity().x, 0.);
    });
}

#[test]
fn pause_freezes_the_simulation() {
    init_logger();
    let mut driver = RenderLoopDriver::spawn_with_cadence(
        CraftState::martian(),
        RecordingSurface::default(),
        Duration::from_millis(1),
    )
    .unwrap();
    wait_for(&driver, |craft| craft.flight_time() > 0.);

    driver.pause();
    // let an in-flight tick finish
    thread::sleep(Duration::from_millis(20));
    let frozen = driver.inspect(|scene| scene.surface.frames());
    thread::sleep(Duration::from_millis(20));
    assert_eq!(driver.inspect(|scene| scene.surface.frames()), frozen);

    driver.resume();
    for _ in 0..2_000 {
        if driver.inspect(|scene| scene.surface.frames()) > frozen {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }
    assert!(driver.inspect(|scene| scene.surface.frames()) > frozen);
    driver.stop().unwrap();
    assert!(!driver.is_running());
}

#[test]
fn martian_scenario_file() {
    init_logger();
    let path = std::env::temp_dir().join(format!("martian-lander-{}.json", std::process::id()));
    std::fs::write(&path, SCENARIO).unwrap();

    let craft = CraftState::try_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(craft.field_width(), 200.);
    assert_eq!(craft.fuel(), 10);
    assert!(craft.contact().is_clear());
}
