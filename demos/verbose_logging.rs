//! Demonstrates enabling verbose logging for partdft.
use partdft::LocalCluster;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let signal = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let cluster = LocalCluster::new(3).unwrap();

    let spectrum = cluster.transform(&signal).unwrap();
    println!("{:?}", spectrum.bins());
}
