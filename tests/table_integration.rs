//! End-to-end tests for lookup tables.
//!
//! Compares classic and covering tables against exhaustive scans on seeded
//! random data.

use std::sync::RwLock;

use hemingway::{BitVector, BruteParams, ClassicParams, CoveringParams, Table, TableParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn bits(pattern: &[u8]) -> BitVector {
    pattern.iter().map(|&b| b == 1).collect()
}

/// Flip `flips` distinct random positions of `v`.
fn perturb(v: &BitVector, flips: usize, rng: &mut StdRng) -> BitVector {
    let mut positions: Vec<usize> = Vec::with_capacity(flips);
    while positions.len() < flips {
        let p = rng.random_range(0..v.len());
        if !positions.contains(&p) {
            positions.push(p);
        }
    }
    v.iter()
        .enumerate()
        .map(|(i, b)| b ^ positions.contains(&i))
        .collect()
}

/// Exact nearest distance by linear scan.
fn scan_nearest(query: &BitVector, data: &[BitVector]) -> Option<u32> {
    data.iter().map(|v| query.distance(v).unwrap()).min()
}

#[test]
fn classic_matches_brute_force_oracle() {
    let v1 = bits(&[1, 0, 0, 1]);
    let v2 = bits(&[1, 1, 0, 0]);

    let mut classic = Table::with_seed(
        ClassicParams {
            dimensions: 4,
            samples: 2,
            partitions: 2,
        },
        17,
    )
    .unwrap();
    let mut oracle = Table::with_seed(BruteParams { dimensions: 4 }, 17).unwrap();

    for v in [&v1, &v2] {
        classic.insert(v.clone()).unwrap();
        oracle.insert(v.clone()).unwrap();
    }

    assert_eq!(classic.len(), 2);
    assert_eq!(oracle.query(&v1).unwrap(), v1);
    assert_eq!(oracle.query(&v2).unwrap(), v2);
    assert_eq!(classic.query(&v1).unwrap(), oracle.query(&v1).unwrap());
    assert_eq!(classic.query(&v2).unwrap(), oracle.query(&v2).unwrap());
}

#[test]
fn covering_always_collides_within_radius() {
    let radius = 4;
    let mut rng = StdRng::seed_from_u64(2016);
    let mut table = Table::new(
        CoveringParams {
            dimensions: 64,
            radius,
        },
        &mut rng,
    )
    .unwrap();
    assert_eq!(table.num_partitions(), 31);

    let mut hits = 0;
    let trials = 200;
    for _ in 0..trials {
        let v = BitVector::random(64, &mut rng);
        let flips = rng.random_range(0..=radius as usize);
        let u = perturb(&v, flips, &mut rng);

        let collides = table
            .masks()
            .any(|mask| mask.project(&u).unwrap() == mask.project(&v).unwrap());
        if collides {
            hits += 1;
        }

        table.insert(v).unwrap();
        let (_, distance) = table.query_with_distance(&u).unwrap().unwrap();
        assert!(distance as usize <= flips);
    }

    // The covering construction has no false negatives within its radius.
    assert_eq!(hits, trials);
}

#[test]
fn classic_tuned_for_radius_has_high_recall() {
    let radius = 4;
    let params = ClassicParams::for_radius(64, radius, 0.01).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let table = Table::new(params, &mut rng).unwrap();

    let trials = 300;
    let mut hits = 0;
    for _ in 0..trials {
        let v = BitVector::random(64, &mut rng);
        let u = perturb(&v, radius as usize, &mut rng);
        if table
            .masks()
            .any(|mask| mask.project(&u).unwrap() == mask.project(&v).unwrap())
        {
            hits += 1;
        }
    }

    let recall = hits as f64 / trials as f64;
    assert!(recall >= 0.9, "recall {recall:.3} below 0.9");
}

#[test]
fn covering_finds_exact_nearest_within_radius() {
    let radius = 3;
    let mut rng = StdRng::seed_from_u64(7);
    let mut table = Table::new(
        CoveringParams {
            dimensions: 128,
            radius,
        },
        &mut rng,
    )
    .unwrap();

    let data: Vec<BitVector> = (0..300).map(|_| BitVector::random(128, &mut rng)).collect();
    for v in &data {
        table.insert(v.clone()).unwrap();
    }

    for i in 0..100 {
        let query = perturb(&data[i * 3], i % (radius as usize + 1), &mut rng);
        let exact = scan_nearest(&query, &data).unwrap();
        assert!(exact <= radius);

        let (found, distance) = table.query_with_distance(&query).unwrap().unwrap();
        assert_eq!(distance, exact);
        assert_eq!(query.distance(&found).unwrap(), exact);
    }
}

#[test]
fn erase_then_query_misses() {
    let mut rng = StdRng::seed_from_u64(3);
    let params = TableParams::Classic(ClassicParams {
        dimensions: 64,
        samples: 12,
        partitions: 10,
    });
    let mut table = Table::new(params, &mut rng).unwrap();

    let data: Vec<BitVector> = (0..100).map(|_| BitVector::random(64, &mut rng)).collect();
    for v in &data {
        table.insert(v.clone()).unwrap();
    }
    for v in data.iter().step_by(2) {
        assert!(table.erase(v).unwrap());
    }

    assert_eq!(table.len(), 50);
    assert_eq!(table.stats().vectors, 50 * 10);
    for (i, v) in data.iter().enumerate() {
        let present = i % 2 == 1;
        assert_eq!(table.contains(v).unwrap(), present);
        if present {
            assert_eq!(&table.query(v).unwrap(), v);
        } else {
            assert_ne!(&table.query(v).unwrap(), v);
        }
    }
}

#[test]
fn same_seed_same_answers() {
    let params = ClassicParams {
        dimensions: 64,
        samples: 8,
        partitions: 4,
    };
    let mut a = Table::with_seed(params, 1234).unwrap();
    let mut b = Table::with_seed(params, 1234).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..200 {
        let v = BitVector::random(64, &mut rng);
        a.insert(v.clone()).unwrap();
        b.insert(v).unwrap();
    }
    assert_eq!(a.stats(), b.stats());

    for _ in 0..50 {
        let q = BitVector::random(64, &mut rng);
        assert_eq!(a.query(&q).unwrap(), b.query(&q).unwrap());
    }
}

#[test]
fn shared_behind_rwlock() {
    let table = RwLock::new(Table::with_seed(BruteParams { dimensions: 32 }, 0).unwrap());
    let v = BitVector::from_bits((0..32).map(|i| i % 5 == 0));

    table.write().unwrap().insert(v.clone()).unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let guard = table.read().unwrap();
                assert_eq!(guard.query(&v).unwrap(), v);
            });
        }
    });
}
