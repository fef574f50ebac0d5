use callprice_lib::{
    black_scholes_price, calibrate_monte_carlo, monte_carlo_price, OptionContract, PricingResult,
};
use tracing_subscriber::EnvFilter;

fn main() -> PricingResult<()> {
    // RUST_LOG=callprice_lib=debug shows every calibration evaluation
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Callprice-lib Pricing Demo\n");

    // 1. Contract: S=100, K=105, r=5%, T=1y, σ=20%
    let contract = OptionContract::new(100.0, 105.0, 0.05, 1.0, 0.20)?;
    println!("1. Contract: {:?}\n", contract);

    // 2. Closed form
    let bs = black_scholes_price(&contract);
    println!("2. Black-Scholes price: {}\n", bs);

    // 3. Monte-Carlo with 1,000 paths of 500 steps (nested loops: large sizes take a while)
    let mc = monte_carlo_price(&contract, 1000, 500)?;
    println!("3. Monte-Carlo price (m=1000, n=500): {}", mc);
    println!("   Difference to Black-Scholes: {:.4}\n", (mc - bs).abs());

    // 4. Smallest simulation matching the closed form within 0.15
    println!("4. Calibrating Monte-Carlo size (threshold 0.15)...");
    let result = calibrate_monte_carlo(&contract, 0.15)?;
    println!("{}", result);
    println!("   Stop reason: {:?}", result.stop_reason);
    println!("   Evaluations: {}", result.history.len());

    Ok(())
}
