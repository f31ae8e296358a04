use lumis_hemicube::{FormFactorTable, HemicubeLayout};

#[test]
fn hemicube_weights_sum_to_one() {
    for s in [64u32, 128, 256] {
        let table = FormFactorTable::new(HemicubeLayout::new(s, 1).expect("layout"));
        let total = table.hemicube_total(0);
        assert!((total - 1.0).abs() < 0.01, "S={s}: {total}");
    }
}

#[test]
fn every_instance_carries_the_same_weights() {
    let layout = HemicubeLayout::new(32, 4).expect("layout");
    let table = FormFactorTable::new(layout);
    let first = table.hemicube_total(0);
    for h in 1..4 {
        assert!((table.hemicube_total(h) - first).abs() < 1e-9);
    }
    let tile = 64usize;
    for y in 0..layout.height() {
        let row = table.row(y);
        assert_eq!(&row[..tile], &row[3 * tile..]);
    }
}

#[test]
fn opposite_side_faces_mirror_each_other() {
    let s = 16u32;
    let table = FormFactorTable::new(HemicubeLayout::new(s, 1).expect("layout"));
    // Up row r and down row 2S-1-r share a height above the horizon.
    for r in 0..s / 2 {
        for c in s / 2..3 * s / 2 {
            assert_eq!(table.weight(c, r), table.weight(c, 2 * s - 1 - r));
            assert_eq!(table.weight(r, c), table.weight(2 * s - 1 - r, c));
        }
    }
}
