use lumis_radiosity::{
    CpuReducer, EngineState, RadiosityConfig, RadiosityEngine, SoftwareRasterizer, StepOutcome,
};
use lumis_scene::{Facing, Model, SceneContainer, Vec3};

fn cube_room(albedo: f32) -> SceneContainer {
    let mut room = Model::cuboid(
        "room",
        Vec3::ZERO,
        Vec3::ONE,
        Vec3::splat(albedo),
        0.8,
        Facing::Inward,
    );
    room.subdivide(0.0625);
    let mut scene = SceneContainer::new();
    scene.add_model(room);
    scene
}

// A ceiling patch away from the edges.
fn ceiling_emitter(scene: &SceneContainer) -> usize {
    scene
        .patches()
        .position(|p| {
            let c = p.centroid();
            (c.y - 1.0).abs() < 1e-6 && (0.3..0.7).contains(&c.x) && (0.3..0.7).contains(&c.z)
        })
        .expect("ceiling patch")
}

fn engine(hemicubes: u32) -> RadiosityEngine<SoftwareRasterizer, CpuReducer> {
    let config = RadiosityConfig {
        hemicube_resolution: 64,
        hemicubes,
        ..RadiosityConfig::default()
    };
    RadiosityEngine::new(config, SoftwareRasterizer::default(), CpuReducer).expect("engine")
}

#[test]
fn single_emitter_shoots_into_the_room() {
    let mut scene = cube_room(1.0);
    assert_eq!(scene.patch_count(), 96);
    let e = ceiling_emitter(&scene);
    scene.patch_mut(e).expect("patch").radiosity = Vec3::ONE;

    let mut engine = engine(1);
    let StepOutcome::Shot(report) = engine.step(&mut scene).expect("step") else {
        panic!("expected a shot");
    };
    assert_eq!(report.emitters, vec![e]);
    assert_eq!(report.mismatches, 0);
    assert_eq!(report.batches, 1);

    let emitter = scene.patch(e).expect("patch");
    assert_eq!(emitter.radiosity, Vec3::ZERO);
    assert_eq!(emitter.illumination, Vec3::ONE);

    // Closed room: the emitter's hemicube sees surfaces everywhere.
    let total = report.form_factor_totals[0];
    assert!((total - 1.0).abs() < 0.03, "form factor total {total}");

    let received = scene.patches().filter(|p| p.radiosity.x > 0.0).count();
    assert!(received > 40, "only {received} patches received energy");
    // Coplanar ceiling patches cannot see the emitter.
    for (i, p) in scene.patches().enumerate() {
        if i != e && (p.centroid().y - 1.0).abs() < 1e-6 {
            assert_eq!(p.radiosity, Vec3::ZERO);
        }
    }
    let shot_into_scene = scene.total_unshot() / 3.0;
    assert!((shot_into_scene - 0.8 * total as f32).abs() < 1e-3);
    assert_eq!(engine.state(), EngineState::Idle);
}

#[test]
fn total_unshot_energy_never_grows() {
    let mut scene = cube_room(0.9);
    let e = ceiling_emitter(&scene);
    scene.patch_mut(e).expect("patch").radiosity = Vec3::new(1.0, 0.8, 0.6);

    let mut engine = engine(2);
    let mut previous = scene.total_unshot();
    for _ in 0..12 {
        match engine.step(&mut scene).expect("step") {
            StepOutcome::Shot(_) => {}
            other => panic!("unexpected {other:?}"),
        }
        let now = scene.total_unshot();
        assert!(now <= previous + 1e-5, "{now} > {previous}");
        previous = now;
    }
}

#[test]
fn runs_to_convergence_and_rearms() {
    let mut scene = cube_room(0.6);
    let e = ceiling_emitter(&scene);
    scene.patch_mut(e).expect("patch").radiosity = Vec3::ONE;

    let mut engine = engine(4);
    engine.set_epsilon(0.05);
    let summary = engine.run(&mut scene, 5_000).expect("run");
    assert!(summary.converged);
    assert_eq!(engine.state(), EngineState::Converged);
    assert!(engine.last_shot() < 0.05);
    assert!(matches!(engine.step(&mut scene).expect("step"), StepOutcome::Converged));

    scene.patch_mut(e).expect("patch").radiosity = Vec3::ONE;
    engine.rearm();
    assert!(matches!(engine.step(&mut scene).expect("step"), StepOutcome::Shot(_)));
}

#[test]
fn dark_scene_converges_immediately() {
    let mut scene = cube_room(1.0);
    let mut engine = engine(1);
    assert!(matches!(engine.step(&mut scene).expect("step"), StepOutcome::Converged));
    assert_eq!(engine.steps(), 0);
}

#[test]
fn unsubdivided_cube_lights_every_other_face() {
    // Faces in order -X, +X, -Y, +Y, -Z, +Z; the ceiling (+Y) emits.
    let mut scene = SceneContainer::new();
    scene.add_model(Model::cuboid("cube", Vec3::ZERO, Vec3::ONE, Vec3::ONE, 0.8, Facing::Inward));
    assert_eq!(scene.patch_count(), 6);
    scene.patch_mut(3).expect("ceiling").radiosity = Vec3::ONE;

    let mut engine = engine(1);
    let StepOutcome::Shot(report) = engine.step(&mut scene).expect("step") else {
        panic!("expected a shot");
    };
    assert_eq!(report.emitters, vec![3]);
    assert_eq!(report.mismatches, 0);

    let ceiling = scene.patch(3).expect("ceiling");
    assert_eq!(ceiling.radiosity, Vec3::ZERO);
    assert_eq!(ceiling.illumination, Vec3::ONE);

    let walls: Vec<f32> = [0, 1, 4, 5]
        .iter()
        .map(|&i| scene.patch(i).expect("wall").radiosity.x)
        .collect();
    let floor = scene.patch(2).expect("floor").radiosity.x;
    for &w in &walls {
        assert!(w > 0.0);
        assert!((w - walls[0]).abs() < 5e-3, "walls differ: {walls:?}");
    }
    assert!(floor > walls[0], "floor {floor} vs wall {}", walls[0]);
    let received: f32 = walls.iter().sum::<f32>() + floor;
    assert!((received - 0.8).abs() < 0.02, "received {received}");
}
