use cupweather::{
    correlation_matrix, enriched_frame, load_matches, overview, weather_by_outcome,
    ClientConfig, CupWeatherError, MatchEnricher,
};
use std::env;

/// Usage: `cargo run --example enrich_year -- data/WorldCupMatches.csv 1990`
#[tokio::main]
async fn main() -> Result<(), CupWeatherError> {
    // RUST_LOG=warn shows cities and weather windows that could not be resolved.
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| "data/WorldCupMatches.csv".to_string());
    let year = args.next().and_then(|y| y.parse::<i32>().ok());

    let matches = load_matches(&path)?;
    let enricher = MatchEnricher::from_config(ClientConfig::builder().concurrency(4).build()?)?;
    let enriched = enricher
        .enrich_selection()
        .records(matches)
        .maybe_year(year)
        .call()
        .await;

    println!("{:?}", overview(&enriched));
    println!("{}", enriched_frame(&enriched)?);

    for (outcome, stats) in weather_by_outcome(&enriched) {
        println!("{outcome}: {stats:?}");
    }

    let matrix = correlation_matrix(&enriched);
    println!(
        "temperature vs total goals: {:?}",
        matrix.get("temp_mean_c", "Total Goals")
    );
    Ok(())
}
