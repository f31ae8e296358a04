use lumis_scene::{Compass, Facing, Model, SceneContainer, Vec3};

fn lit_square(x0: f32, energy: f32) -> Model {
    let mut m = Model::quad(
        format!("sq{x0}"),
        [
            Vec3::new(x0, 0.0, 0.0),
            Vec3::new(x0 + 1.0, 0.0, 0.0),
            Vec3::new(x0 + 1.0, 1.0, 0.0),
            Vec3::new(x0, 1.0, 0.0),
        ],
        Vec3::ONE,
        0.5,
    );
    m.set_emission(Vec3::splat(energy));
    m
}

#[test]
fn flat_arrays_follow_patch_order() {
    let mut scene = SceneContainer::new();
    scene.add_model(Model::cuboid("box", Vec3::ZERO, Vec3::ONE, Vec3::ONE, 0.5, Facing::Inward));
    scene.add_model(lit_square(3.0, 1.0));
    assert!(scene.is_dirty());
    let g = scene.geometry();
    assert_eq!(g.vertices.len(), 4 * 7);
    assert_eq!(g.indices.len(), 6 * 7);
    assert_eq!(&g.indices[6..12], &[4, 5, 6, 4, 6, 7]);
    assert_eq!(g.quad(6)[0], Vec3::new(3.0, 0.0, 0.0));
    assert!(!scene.is_dirty());
}

#[test]
fn edits_mark_dirty_and_relayout() {
    let mut scene = SceneContainer::new();
    let id = scene.add_model(lit_square(0.0, 1.0));
    scene.refresh();
    scene.edit_model(id, |m| m.subdivide(0.25)).expect("model exists");
    assert!(scene.is_dirty());
    assert_eq!(scene.patch_count(), 4);
    assert_eq!(scene.geometry().vertices.len(), 16);
}

#[test]
fn remove_model_shifts_global_indices() {
    let mut scene = SceneContainer::new();
    let a = scene.add_model(lit_square(0.0, 1.0));
    let b = scene.add_model(lit_square(2.0, 2.0));
    assert_eq!(scene.patch(1).map(|p| p.radiosity), Some(Vec3::splat(2.0)));
    let removed = scene.remove_model(a).expect("removed");
    assert_eq!(removed.len(), 1);
    assert_eq!(scene.patch_count(), 1);
    assert_eq!(scene.patch(0).map(|p| p.radiosity), Some(Vec3::splat(2.0)));
    assert!(scene.model(b).is_some());
    assert!(scene.remove_model(a).is_none());
}

#[test]
fn top_emitters_orders_and_pads() {
    let mut scene = SceneContainer::new();
    scene.add_model(lit_square(0.0, 0.5));
    scene.add_model(lit_square(1.0, 2.0));
    scene.add_model(lit_square(2.0, 0.0));
    scene.add_model(lit_square(3.0, 2.0));
    assert_eq!(scene.top_emitters(4), vec![Some(1), Some(3), Some(0), None]);
    assert_eq!(scene.top_emitters(1), vec![Some(1)]);
    assert!(scene.top_emitters(0).is_empty());
}

#[test]
fn global_neighbors_include_model_offset() {
    let mut scene = SceneContainer::new();
    scene.add_model(lit_square(-2.0, 0.0));
    let corners = [
        Vec3::ZERO,
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(2.0, 2.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
    ];
    scene.add_model(Model::grid_plane("g", corners, 2, 2, Vec3::ONE, 0.5));
    assert_eq!(scene.neighbor(1, Compass::E), Some(2));
    assert_eq!(scene.neighbor(1, Compass::W), Some(1));
    assert_eq!(scene.neighbor(0, Compass::N), Some(0));
    assert_eq!(scene.neighbor(9, Compass::N), None);
}

#[test]
fn smooth_shade_averages_corner_neighbors() {
    let corners = [
        Vec3::ZERO,
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(2.0, 2.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
    ];
    let mut scene = SceneContainer::new();
    scene.add_model(Model::grid_plane("g", corners, 2, 2, Vec3::ONE, 0.5));
    scene.patch_mut(3).expect("patch").illumination = Vec3::splat(4.0);
    let shade = scene.smooth_shade(0).expect("shade");
    // A: self, W, SW, S all self-links.
    assert_eq!(shade[0], Vec3::ZERO);
    // C: E(1), NE(3), N(2).
    assert_eq!(shade[2], Vec3::splat(1.0));
    assert!(scene.smooth_shade(4).is_none());
}

#[test]
fn energy_totals_and_bounds() {
    let mut scene = SceneContainer::new();
    assert!(scene.bounds().is_empty());
    scene.add_model(lit_square(0.0, 1.0));
    scene.add_model(lit_square(4.0, 0.5));
    assert!((scene.total_unshot() - 4.5).abs() < 1e-6);
    let b = scene.bounds();
    assert_eq!(b.min, Vec3::ZERO);
    assert_eq!(b.max, Vec3::new(5.0, 1.0, 0.0));
    for p in scene.patches_mut() {
        p.illumination = p.radiosity;
        p.radiosity = Vec3::ZERO;
    }
    assert_eq!(scene.total_unshot(), 0.0);
    assert_eq!(scene.total_illumination(), Vec3::splat(1.5));
}

#[test]
fn cached_geometry_matches_patch_corners_through_every_edit() {
    let mut scene = SceneContainer::new();
    let id = scene.add_model(lit_square(0.0, 1.0));
    scene.refresh();

    // Radiometric edits keep the cache; corners cannot change through patch_mut.
    scene.patch_mut(0).expect("patch").radiosity = Vec3::splat(2.0);
    assert!(!scene.is_dirty());

    scene.edit_model(id, |m| m.subdivide(0.25)).expect("model exists");
    let corners: Vec<[Vec3; 4]> = scene.patches().map(|p| p.corners()).collect();
    let g = scene.geometry();
    assert_eq!(g.patch_count(), corners.len());
    for (i, c) in corners.iter().enumerate() {
        assert_eq!(&g.quad(i), c);
    }
}
