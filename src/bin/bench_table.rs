use std::env;

use mapbench::{
    run_case, CaseInputs, KeyShape, MapKind, Operation, TestCase, UnionStrategy, Workload,
};

fn parse_arg<T: std::str::FromStr>(i: usize, default: T) -> T {
    env::args()
        .nth(i)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Usage: bench_table [n=100000] [trials=7] [fragmentation=64]
    let n: usize = parse_arg(1, 100_000);
    let trials: usize = parse_arg(2, 7);
    let fragmentation: usize = parse_arg(3, 64);

    let mut workload = Workload::from_entropy();
    let keys = workload.keys(n);
    let operands = workload.merge_operands(n);
    let inputs = CaseInputs {
        keys: Some(&keys),
        operands: Some(&operands),
        fragmentation,
        union: UnionStrategy::Merge,
    };

    println!("\n=== Ordered map comparison (u64 -> u64) ===");
    println!(
        "items: {}  |  trials: {}  |  fragmentation: {}",
        n, trials, fragmentation
    );
    println!(
        "{:<14} {:>12} {:>10} {:>12} {:>10} {:>12} {:>10} {:>12}",
        "target", "ins(ms)", "ins Mops", "iter(ms)", "iter Mops", "find(ms)", "find Mops", "merge(ms)"
    );
    for kind in MapKind::ALL {
        let case = TestCase::new(KeyShape::Int, kind, n, trials)?;
        let result = run_case::<u64, u64>(&case, &inputs)?;
        let ms = |op| result.get(op).unwrap_or(f64::NAN);
        println!(
            "{:<14} {:>12.3} {:>10.2} {:>12.3} {:>10.2} {:>12.3} {:>10.2} {:>12.3}",
            kind.name(),
            ms(Operation::Insert),
            throughput(n, ms(Operation::Insert)),
            ms(Operation::Iterate),
            throughput(n, ms(Operation::Iterate)),
            ms(Operation::Find),
            throughput(n, ms(Operation::Find)),
            ms(Operation::Merge),
        );
    }
    Ok(())
}

fn throughput(count: usize, ms: f64) -> f64 {
    let secs = (ms / 1000.0).max(1e-9);
    (count as f64 / 1_000_000.0) / secs
}
