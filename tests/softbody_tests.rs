use softbody2d::{
    BoundsConstraint, DebugColor, JointGroup, NoOpStepObserver, ParticleRole, Softbody2D,
    SoftbodySettings, SolverConfig, StepObserver, Vec2,
};
use softbody2d::Vec as _;

fn created(settings: SoftbodySettings<f32>) -> Softbody2D<f32> {
    let mut body = Softbody2D::new(Vec2::new(0.0, 0.0), settings);
    body.create().unwrap();
    body
}

#[derive(Default)]
struct Counter {
    integrations: usize,
    iterations: usize,
    broken: Vec<usize>,
    steps: usize,
}

impl StepObserver for Counter {
    fn on_integrate(&mut self) { self.integrations += 1; }
    fn on_constraint_iteration(&mut self, _iteration: usize) { self.iterations += 1; }
    fn on_joint_broken(&mut self, joint: usize) { self.broken.push(joint); }
    fn on_step_complete(&mut self) { self.steps += 1; }
}

#[test]
fn create_builds_ring_center_and_joints() {
    let body = created(SoftbodySettings::default());

    assert!(body.is_created());
    assert_eq!(body.particle_count(), 33);
    assert_eq!(body.around_particles().len(), 32);
    assert_eq!(body.around_joints().len(), 32);
    assert_eq!(body.center_joints().len(), 32);

    let center = body.center_particle().unwrap();
    assert_eq!(body.particle(center).role, ParticleRole::Center);
    for (i, &idx) in body.around_particles().iter().enumerate() {
        assert_eq!(body.particle(idx).role, ParticleRole::Ring(i));
    }
    for &j in body.center_joints() {
        let joint = body.joint(j);
        assert!(joint.a == center || joint.b == center);
        assert!(!joint.enable_collision);
    }
}

#[test]
fn create_twice_replaces_previous_body() {
    let mut body = created(SoftbodySettings::default().with_particle_count(8));
    body.set_settings(SoftbodySettings::default().with_particle_count(12));
    body.create().unwrap();

    assert_eq!(body.particle_count(), 13);
    assert_eq!(body.around_joints().len(), 12);
    assert_eq!(body.center_joints().len(), 12);
    assert_eq!(body.solver().joint_count(), 24);
}

#[test]
fn particles_are_placed_around_origin() {
    let settings = SoftbodySettings::default().with_particle_count(16).with_radius(2.0);
    let mut body = Softbody2D::new(Vec2::new(10.0f32, -5.0), settings);
    body.create().unwrap();

    let origin = Vec2::new(10.0, -5.0);
    let center = body.center_particle().unwrap();
    assert_eq!(body.particle(center).pos, origin);
    for &idx in body.around_particles() {
        assert!((body.particle(idx).pos.distance(origin) - 2.0).abs() < 1e-5);
    }
}

#[test]
fn auto_configured_distances_match_layout() {
    let body = created(SoftbodySettings::default().with_particle_count(16).with_radius(3.0));
    for &j in body.center_joints() {
        assert!((body.joint(j).distance - 3.0).abs() < 1e-5);
    }
    let expected = 2.0 * 3.0 * (core::f32::consts::PI / 16.0).sin();
    for &j in body.around_joints() {
        assert!((body.joint(j).distance - expected).abs() < 1e-4);
    }
}

#[test]
fn fixed_distances_used_when_not_auto_configured() {
    let body = created(SoftbodySettings::default().with_fixed_distances(0.5, 3.0));
    for &j in body.around_joints() {
        assert_eq!(body.joint(j).distance, 0.5);
        assert!(!body.joint(j).auto_configure_distance);
    }
    for &j in body.center_joints() {
        assert_eq!(body.joint(j).distance, 3.0);
    }
}

#[test]
fn update_propagates_frequencies() {
    let mut body = created(SoftbodySettings::default().with_frequencies(2.0, 2.0));
    body.set_around_frequency(5.0).unwrap();
    body.set_center_frequency(0.5).unwrap();

    // Not applied until the next update.
    assert!(body.around_joints().iter().all(|&j| body.joint(j).frequency == 2.0));

    body.update();
    assert!(body.around_joints().iter().all(|&j| body.joint(j).frequency == 5.0));
    assert!(body.center_joints().iter().all(|&j| body.joint(j).frequency == 0.5));
}

#[test]
fn step_applies_pending_frequencies() {
    let mut body = created(SoftbodySettings::default());
    body.set_center_frequency(7.0).unwrap();
    body.step(1.0 / 60.0, &SolverConfig::new(), &mut NoOpStepObserver);
    assert!(body.center_joints().iter().all(|&j| body.joint(j).frequency == 7.0));
}

#[test]
fn body_at_rest_stays_at_rest() {
    let mut body = created(SoftbodySettings::default());
    let before = body.positions();
    let config = SolverConfig::new().with_sub_steps(2);
    for _ in 0..120 {
        body.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
    }
    for (a, b) in before.iter().zip(body.positions().iter()) {
        assert!(a.distance(*b) < 1e-3, "moved from {:?} to {:?}", a, b);
    }
}

#[test]
fn stiff_bodies_stay_finite_and_round() {
    for frequency in [10.0f32, 30.0] {
        let mut body = created(SoftbodySettings::default().with_frequencies(frequency, frequency));
        let ring0 = body.around_particles()[0];
        let start = body.particle(ring0).pos;
        body.poke(start, Vec2::new(0.2, 0.0));

        let config = SolverConfig::new();
        for _ in 0..120 {
            body.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
        }

        let centroid = body.centroid();
        for p in body.positions() {
            assert!(p.x.is_finite() && p.y.is_finite(), "{} Hz: {:?}", frequency, p);
        }
        for &idx in body.around_particles() {
            let r = body.particle(idx).pos.distance(centroid);
            assert!((r - 4.0).abs() < 0.5, "{} Hz: ring particle at radius {}", frequency, r);
        }
    }
}

#[test]
fn lands_on_floor_and_keeps_its_shape() {
    let settings = SoftbodySettings::default().with_damping_ratio(0.2);
    let mut body = Softbody2D::new(Vec2::new(0.0f32, 10.0), settings);
    body.create().unwrap();
    body.set_bounds(Some(BoundsConstraint::new(
        Vec2::new(-50.0, 0.0),
        Vec2::new(50.0, 100.0),
        0.0,
    )));

    let initial_area = body.area();
    let config = SolverConfig::new()
        .with_gravity(Vec2::new(0.0, -9.81))
        .with_iterations(8)
        .with_sub_steps(2);
    for _ in 0..300 {
        body.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
    }

    let radius = body.settings().particle_radius;
    for p in body.positions() {
        assert!(p.y >= radius - 1e-4, "particle below floor: {:?}", p);
    }
    assert!(body.centroid().y < 10.0, "body should have fallen");
    let final_area = body.area();
    assert!(
        final_area > initial_area * 0.5,
        "springs should keep the body from collapsing: {} vs {}",
        final_area,
        initial_area,
    );
}

#[test]
fn rigid_joints_keep_lengths() {
    let settings = SoftbodySettings::default().with_particle_count(12).with_frequencies(0.0, 0.0);
    let mut body = created(settings);
    let ring0 = body.around_particles()[0];
    let start = body.particle(ring0).pos;
    body.poke(start, Vec2::new(0.3, 0.1));

    let config = SolverConfig::new().with_iterations(16).with_sub_steps(2);
    for _ in 0..60 {
        body.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
    }

    let solver = body.solver();
    for joint in solver.live_joints() {
        let stretch = joint.stretch(&solver.particles).abs();
        assert!(stretch < 0.05, "joint {}-{} stretched by {}", joint.a, joint.b, stretch);
    }
}

#[test]
fn debug_lines_cover_every_joint() {
    let body = created(SoftbodySettings::default().with_particle_count(10));
    let lines = body.debug_lines();
    assert_eq!(lines.len(), 20);

    for line in &lines[..10] {
        assert_eq!(line.group, JointGroup::Around);
        assert_eq!(line.color, DebugColor::Red);
    }
    for line in &lines[10..] {
        assert_eq!(line.group, JointGroup::Center);
        assert_eq!(line.color, DebugColor::Yellow);
    }

    let first = body.joint(body.around_joints()[0]);
    assert_eq!(lines[0].from, body.particle(first.a).pos);
    assert_eq!(lines[0].to, body.particle(first.b).pos);
}

#[test]
fn overloaded_joints_break_and_disappear() {
    let settings = SoftbodySettings::default().with_break_force(50.0);
    let mut body = created(settings);
    let ring0 = body.around_particles()[0];
    {
        let p = body.solver_mut().particle_mut(ring0);
        p.pos = Vec2::new(6.0, 0.0);
        p.prev_pos = p.pos;
    }

    let mut counter = Counter::default();
    body.step(1.0 / 60.0, &SolverConfig::new(), &mut counter);

    // The displaced particle's two ring joints and its spoke.
    assert_eq!(counter.broken.len(), 3);
    for &j in &counter.broken {
        let joint = body.joint(j);
        assert!(joint.is_broken());
        assert!(joint.a == ring0 || joint.b == ring0);
    }
    assert_eq!(body.debug_lines().len(), 64 - 3);

    body.set_around_frequency(9.0).unwrap();
    body.update();
    for &j in body.around_joints() {
        let joint = body.joint(j);
        let expected = if joint.is_broken() { 2.0 } else { 9.0 };
        assert_eq!(joint.frequency, expected);
    }
}

#[test]
fn observer_sees_every_phase() {
    let mut body = created(SoftbodySettings::default().with_particle_count(6));
    let config = SolverConfig::new().with_iterations(3).with_sub_steps(2);
    let mut counter = Counter::default();
    body.step(1.0 / 60.0, &config, &mut counter);

    assert_eq!(counter.integrations, 2);
    assert_eq!(counter.iterations, 6);
    assert_eq!(counter.steps, 1);
    assert!(counter.broken.is_empty());
}

#[test]
fn poke_moves_nearest_particle() {
    let mut body = created(SoftbodySettings::default());
    let ring0 = body.around_particles()[0];
    let before = body.particle(ring0).pos;
    body.poke(Vec2::new(4.2, 0.0), Vec2::new(0.2, 0.0));
    body.step(1.0 / 60.0, &SolverConfig::new(), &mut NoOpStepObserver);
    assert!(body.particle(ring0).pos.x > before.x);
}
