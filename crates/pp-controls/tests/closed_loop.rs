//! End-to-end controller behaviour against a simulated plant.

use std::sync::Arc;

use pp_controls::{Controller, PidConfig};
use pp_core::{ManualClock, Tolerances, nearly_equal};

/// First-order lag: `dx/dt = (u - x) / tau`.
struct FirstOrderPlant {
    x: f64,
    tau: f64,
}

impl FirstOrderPlant {
    fn step(&mut self, u: f64, dt: f64) -> f64 {
        self.x += (u - self.x) * dt / self.tau;
        self.x
    }
}

#[test]
fn pi_loop_settles_on_set_point() {
    let pid = Controller::new(2.0, 1.0, 0.0, 0.0);
    pid.set_output_limits(-10.0, 10.0).unwrap();
    pid.set_set_point(5.0);

    let mut plant = FirstOrderPlant { x: 0.0, tau: 0.5 };
    let dt = 0.01;
    let mut x = plant.x;
    for _ in 0..3_000 {
        let u = pid.update_with_duration(x, dt);
        assert!((-10.0..=10.0).contains(&u));
        x = plant.step(u, dt);
    }

    assert!((x - 5.0).abs() < 0.05, "plant settled at {x}");
    // At rest the integral alone holds the output at the set point.
    assert!((pid.state().integral - 5.0).abs() < 0.1);
}

#[test]
fn wall_clock_loop_matches_fixed_tick_loop() {
    let clock = Arc::new(ManualClock::new(0.0));
    let timed = Controller::with_clock(1.5, 0.8, 0.05, 0.0, Arc::clone(&clock));
    let ticked = Controller::new(1.5, 0.8, 0.05, 0.0);
    timed.set_set_point(3.0);
    ticked.set_set_point(3.0);

    let dt = 0.25;
    let mut plant_a = FirstOrderPlant { x: 0.0, tau: 1.0 };
    let mut plant_b = FirstOrderPlant { x: 0.0, tau: 1.0 };
    let (mut xa, mut xb) = (0.0, 0.0);
    for _ in 0..40 {
        clock.advance(dt);
        let ua = timed.update(xa);
        let ub = ticked.update_with_duration(xb, dt);
        assert!(nearly_equal(ua, ub, Tolerances::default()), "{ua} != {ub}");
        xa = plant_a.step(ua, dt);
        xb = plant_b.step(ub, dt);
    }
}

#[test]
fn set_point_step_does_not_kick_derivative() {
    let pid = Controller::new(0.0, 0.0, 10.0, 0.0);
    pid.update_with_duration(2.0, 0.1);
    let before = pid.update_with_duration(2.0, 0.1);

    pid.set_set_point(500.0);
    let after = pid.update_with_duration(2.0, 0.1);
    assert_eq!(before, after);
}

#[test]
fn dead_band_holds_output_near_set_point() {
    let pid = Controller::new(4.0, 1.0, 0.0, 0.5);
    pid.set_set_point(20.0);

    for measured in [19.9, 20.2, 19.7, 20.4] {
        assert_eq!(pid.update_with_duration(measured, 0.1), 0.0);
    }
    assert_eq!(pid.state().integral, 0.0);
    assert_eq!(pid.state().prev_error, 0.0);

    // Outside the band the controller reacts again.
    assert!(pid.update_with_duration(18.0, 0.1) > 0.0);
}

#[test]
fn controller_from_yaml_config() {
    let yaml = r#"
gains: { kp: 1.0, ki: 0.0, kd: 0.0 }
set_point: 100.0
output_limits: { min: 2.0, max: 10.0 }
integral_limits: { min: -1.0, max: 1.0 }
"#;
    let cfg = PidConfig::from_yaml_str(yaml).unwrap();
    let pid = Controller::from_config(&cfg).unwrap();

    assert_eq!(pid.update_with_duration(0.0, 0.1), 10.0);
    assert_eq!(pid.state().integral, 1.0);
    assert_eq!(pid.config(), cfg);
}
