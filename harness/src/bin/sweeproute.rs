//! `sweeproute`: plan a route over a target table and write the motion script.

fn main() -> anyhow::Result<()> {
    sweeproute_harness::cli::main()
}
