use std::hint::black_box;
use std::time::Instant;

use clap::Parser;

use mapbench::{insert_phase, millis, MapKind, MapVisitor, OrderedMap, Workload};

/// Run one long fragmented insert phase, for use under a profiler.
#[derive(Parser, Debug)]
#[command(name = "profile_insert")]
struct Args {
    /// Container kind to profile.
    #[arg(long, default_value = "flat_map")]
    kind: MapKind,

    /// Keys inserted per trial.
    #[arg(long, default_value_t = 1_000_000)]
    n: usize,

    /// Scratch inserts before every timed insert.
    #[arg(long, default_value_t = 64)]
    fragmentation: usize,
}

struct Profile<'a> {
    keys: &'a [u64],
    fragmentation: usize,
}

impl MapVisitor<u64, u64> for Profile<'_> {
    type Output = ();

    fn visit<M: OrderedMap<u64, u64>>(self, kind: MapKind) {
        let start = Instant::now();
        let (maps, timings) = insert_phase::<u64, u64, M>(self.keys, 1, self.fragmentation);
        println!(
            "{}: {} keys, {:.3} ms timed insert, {:.3} ms wall",
            kind.label(),
            maps[0].len(),
            millis(timings.samples[0]),
            millis(start.elapsed())
        );
        // Keep the map alive so it doesn't get optimized away
        black_box(maps);
    }
}

fn main() {
    let args = Args::parse();
    println!(
        "Profiling {} inserts into {} with fragmentation {}",
        args.n, args.kind, args.fragmentation
    );
    let keys = Workload::from_entropy().keys(args.n);
    args.kind.dispatch::<u64, u64, _>(Profile {
        keys: &keys,
        fragmentation: args.fragmentation,
    });
}
