//! Split a tone's DFT over a few workers and print the dominant bins.
use partdft::partition::partitions;
use partdft::LocalCluster;

fn main() {
    let n = 32;
    let signal: Vec<f64> = (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * 5.0 * i as f64 / n as f64).cos())
        .collect();
    let workers = 4;

    for (rank, p) in partitions(n, workers).unwrap().enumerate() {
        println!("rank {} owns bins {}..{}", rank, p.start, p.end);
    }

    let spectrum = LocalCluster::new(workers).unwrap().transform(&signal).unwrap();
    for (k, mag) in spectrum.magnitudes().iter().enumerate() {
        if *mag > 1e-6 {
            println!("bin {:2}: |X| = {:.3}", k, mag);
        }
    }
}
