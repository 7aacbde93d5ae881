//! Example classifying points drawn around a few cluster centers.
//!
//! Run with `RUST_LOG=debug` to see the tree construction logs.

use kd_knn::kdtree::{KDTree, KDTreeIndex};
use kd_knn::KnnClassifier;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CENTERS: [[f64; 2]; 3] = [[-5., -5.], [5., -5.], [0., 5.]];

fn sample(rng: &mut StdRng, n: usize, spread: f64) -> (Vec<[f64; 2]>, Vec<usize>) {
    let mut points = Vec::with_capacity(n * CENTERS.len());
    let mut labels = Vec::with_capacity(n * CENTERS.len());
    for _ in 0..n {
        for (label, center) in CENTERS.iter().enumerate() {
            points.push([
                center[0] + rng.gen_range(-spread..spread),
                center[1] + rng.gen_range(-spread..spread),
            ]);
            labels.push(label);
        }
    }
    (points, labels)
}

fn main() {
    pretty_env_logger::init();

    let mut rng = StdRng::seed_from_u64(0);
    let (train, train_labels) = sample(&mut rng, 200, 4.);
    let (test, test_labels) = sample(&mut rng, 50, 4.);

    println!("=== Nearest neighbours ===\n");
    let tree = KDTree::<f64>::new(train.iter().copied(), 16).unwrap();
    println!("tree: {} points, height {}", tree.len(), tree.height());
    for neighbor in tree.neighbors(&[0., 0.], 5).unwrap() {
        println!(
            "  #{:<4} {:?} at {:.3} (class {})",
            neighbor.index,
            neighbor.point.coords(),
            neighbor.distance,
            train_labels[neighbor.index]
        );
    }

    println!("\n=== Classification ===\n");
    for k in [1, 5, 15] {
        let mut classifier = KnnClassifier::<f64>::new(k, 16);
        classifier.fit(train.iter().copied(), &train_labels).unwrap();
        let predictions = classifier.predict(&test).unwrap();
        let correct = predictions
            .iter()
            .zip(&test_labels)
            .filter(|(p, t)| p == t)
            .count();
        println!(
            "k = {:>2}: accuracy {:.1}%",
            k,
            100. * correct as f64 / test.len() as f64
        );
    }
}
