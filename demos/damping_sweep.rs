//! # Damping sweep
//!
//! Two teams that only ever vote for each other: {Ann, Ben, Cat} and
//! {Dan, Eve}. With α = 1 each team keeps the weight of its head count, and
//! the sweep walks down to 0, where everyone receives the same share.
//!
//! Run with: `cargo run --example damping_sweep`

use eigen_equity::report::percent;
use eigen_equity::{compute_equity, Damping, EquityConfig, VoteTable};

const VOTES: &str = "\
Ann\tBen\tCat\tDan\tEve
0.2\t0.8\t0\t0\t0
0\t0.1\t0.9\t0\t0
0.5\t0.5\t0\t0\t0
0\t0\t0\t0.5\t0.5
0\t0\t0\t1\t0
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let table = VoteTable::parse(VOTES, '\t')?;

    print!("{:>6}", "alpha");
    for name in table.participants() {
        print!("{name:>9}");
    }
    println!();

    for step in (0..=20).rev() {
        let alpha = f64::from(step) * 0.05;
        let config = EquityConfig::with_damping(Damping::new(alpha)?);
        let report = compute_equity(&table, &config)?;
        print!("{alpha:>6.2}");
        for share in report.shares() {
            print!("{:>8.2}%", percent(share));
        }
        println!();
    }
    Ok(())
}
