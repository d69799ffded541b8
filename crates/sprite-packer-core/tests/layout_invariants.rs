use std::ops::ControlFlow;

use rand::{Rng, SeedableRng};
use sprite_packer_core::config::{MapperConfig, MapperKind};
use sprite_packer_core::mapper::{Mapper, OptimalMapper};
use sprite_packer_core::model::{Item, PackingResult, Rect};
use sprite_packer_core::map_items;

fn random_items(seed: u64, count: usize, min: u32, max: u32) -> Vec<Item<usize>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| Item::new(rng.gen_range(min..=max), rng.gen_range(min..=max), i))
        .collect()
}

fn disjoint<P>(out: &PackingResult<P>) -> bool {
    let rects: Vec<Rect> = out.placements.iter().map(|p| p.rect()).collect();
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects[i].overlaps(&rects[j]) {
                return false;
            }
        }
    }
    true
}

fn assert_valid_layout<P>(out: &PackingResult<P>, n: usize) {
    assert_eq!(out.placements.len(), n);
    assert!(disjoint(out), "placements overlap");
    let bounds = Rect::new(0, 0, out.width, out.height);
    for p in &out.placements {
        assert!(bounds.contains(&p.rect()), "placement outside bounds");
    }
    let max_r = out.placements.iter().map(|p| p.right()).max().unwrap();
    let max_b = out.placements.iter().map(|p| p.bottom()).max().unwrap();
    assert_eq!((out.width, out.height), (max_r, max_b), "bounding box not tight");
}

#[test]
fn every_mapper_produces_valid_layouts() {
    for seed in 0..6 {
        let items = random_items(seed, 40, 1, 48);
        for kind in [
            MapperKind::HorizontalOnly,
            MapperKind::VerticalOnly,
            MapperKind::Optimal,
        ] {
            let cfg = MapperConfig::builder().kind(kind).build();
            let out = map_items(&items, &cfg).unwrap();
            assert_valid_layout(&out, items.len());
        }
    }
}

#[test]
fn optimal_handles_mixed_extremes() {
    let mut items = random_items(7, 30, 2, 20);
    items.push(Item::new(300, 3, 100));
    items.push(Item::new(3, 250, 101));
    let out = map_items(&items, &MapperConfig::default()).unwrap();
    assert_valid_layout(&out, items.len());
    assert!(out.width >= 300 && out.height >= 250);
}

#[test]
fn optimal_is_deterministic() {
    let items = random_items(42, 60, 4, 64);
    let cfg = MapperConfig::default();
    let a = map_items(&items, &cfg).unwrap();
    let b = map_items(&items, &cfg).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_vec(&a).unwrap(),
        serde_json::to_vec(&b).unwrap()
    );
}

#[test]
fn reused_mapper_does_not_leak_state_between_runs() {
    let small = random_items(3, 10, 4, 16);
    let large = random_items(4, 50, 4, 64);
    let mut fresh = OptimalMapper::default();
    let expected = fresh.map(&small).unwrap();

    let mut reused = OptimalMapper::default();
    reused.map(&large).unwrap();
    let got = reused.map(&small).unwrap();
    assert_eq!(expected, got);
}

#[test]
fn trial_width_never_increases() {
    let items = random_items(11, 45, 3, 40);
    let mut m = OptimalMapper::new(1.0, 25);
    let mut trials = Vec::new();
    let out = m
        .map_with_observer(&items, |t| {
            trials.push(*t);
            ControlFlow::Continue(())
        })
        .unwrap();
    assert!(!trials.is_empty());
    for w in trials.windows(2) {
        assert!(w[1].canvas_width <= w[0].canvas_width, "{:?}", w);
    }
    let stats = out.stats.unwrap();
    let succeeded = trials.iter().filter(|t| t.candidate.is_some()).count() as u32;
    assert_eq!(succeeded, stats.candidates_generated);
    assert_eq!(trials.len() as u32, succeeded + stats.candidate_fails);
    assert!(stats.candidates_generated <= 25);
    for t in &trials {
        if let Some((w, h)) = t.candidate {
            assert!(w <= t.canvas_width && h <= t.canvas_height);
        }
    }
}

#[test]
fn search_never_worse_than_first_candidate() {
    for seed in 20..26 {
        let items = random_items(seed, 35, 2, 50);
        let first = OptimalMapper::new(1.0, 1).map(&items).unwrap();
        let searched = OptimalMapper::new(1.0, 70).map(&items).unwrap();
        assert!(searched.area() <= first.area());
        let total: u64 = items.iter().map(|it| it.area()).sum();
        assert!(searched.area() >= total);
    }
}

#[test]
fn lower_cutoff_stops_earlier() {
    let items = random_items(5, 40, 2, 40);
    let strict = OptimalMapper::new(1.0, 70).map(&items).unwrap();
    let loose = OptimalMapper::new(0.01, 70).map(&items).unwrap();
    assert_eq!(loose.stats.unwrap().candidates_generated, 1);
    assert!(strict.stats.unwrap().candidates_generated >= 1);
    assert!(strict.area() <= loose.area());
}
