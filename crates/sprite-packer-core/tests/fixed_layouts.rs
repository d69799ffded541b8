use sprite_packer_core::config::{MapperConfig, MapperKind};
use sprite_packer_core::map_items;
use sprite_packer_core::model::Item;

fn two_squares() -> Vec<Item<String>> {
    vec![Item::new(10, 10, "a".into()), Item::new(10, 10, "b".into())]
}

fn positions<P>(out: &sprite_packer_core::PackingResult<P>) -> Vec<(u32, u32)> {
    out.placements.iter().map(|p| (p.x, p.y)).collect()
}

#[test]
fn horizontal_places_side_by_side() {
    let cfg = MapperConfig::builder().kind(MapperKind::HorizontalOnly).build();
    let out = map_items(&two_squares(), &cfg).unwrap();
    assert_eq!(positions(&out), vec![(0, 0), (10, 0)]);
    assert_eq!((out.width, out.height), (20, 10));
}

#[test]
fn vertical_stacks() {
    let cfg = MapperConfig::builder().kind(MapperKind::VerticalOnly).build();
    let out = map_items(&two_squares(), &cfg).unwrap();
    assert_eq!(positions(&out), vec![(0, 0), (0, 10)]);
    assert_eq!((out.width, out.height), (10, 20));
}

#[test]
fn optimal_two_squares_is_a_single_row() {
    let out = map_items(&two_squares(), &MapperConfig::default()).unwrap();
    assert_eq!((out.width, out.height), (20, 10));
    assert_eq!(out.efficiency(), 1.0);
    let stats = out.stats.unwrap();
    assert_eq!(stats.candidates_generated, 1);
    assert_eq!(stats.candidate_fails, 0);
}

#[test]
fn horizontal_keeps_input_order_and_tallest_height() {
    let items = vec![
        Item::new(3, 8, "tall".to_string()),
        Item::new(7, 2, "flat".to_string()),
        Item::new(1, 1, "dot".to_string()),
    ];
    let cfg = MapperConfig::builder().kind(MapperKind::HorizontalOnly).build();
    let out = map_items(&items, &cfg).unwrap();
    let keys: Vec<&str> = out.placements.iter().map(|p| p.item.payload.as_str()).collect();
    assert_eq!(keys, vec!["tall", "flat", "dot"]);
    assert_eq!(positions(&out), vec![(0, 0), (3, 0), (10, 0)]);
    assert_eq!((out.width, out.height), (11, 8));
}

#[test]
fn optimal_orders_by_height_and_keeps_ties_stable() {
    let items = vec![
        Item::new(4, 5, "first".to_string()),
        Item::new(6, 9, "tallest".to_string()),
        Item::new(2, 5, "second".to_string()),
    ];
    let out = map_items(&items, &MapperConfig::default()).unwrap();
    let keys: Vec<&str> = out.placements.iter().map(|p| p.item.payload.as_str()).collect();
    assert_eq!(keys, vec!["tallest", "first", "second"]);
}

#[test]
fn optimal_packs_equal_squares_into_a_perfect_block() {
    // Eight 10x10 items: the single 80x10 row already reaches 100% efficiency.
    let items: Vec<Item<usize>> = (0..8).map(|i| Item::new(10, 10, i)).collect();
    let out = map_items(&items, &MapperConfig::default()).unwrap();
    assert_eq!(out.area(), 800);
    assert_eq!(out.efficiency(), 1.0);
}

#[test]
fn single_item_is_its_own_bounding_box() {
    for kind in [
        MapperKind::HorizontalOnly,
        MapperKind::VerticalOnly,
        MapperKind::Optimal,
    ] {
        let cfg = MapperConfig::builder().kind(kind).build();
        let out = map_items(&[Item::new(13, 7, ())], &cfg).unwrap();
        assert_eq!(positions(&out), vec![(0, 0)]);
        assert_eq!((out.width, out.height), (13, 7), "{kind:?}");
    }
}
