/// quick start - a one month prepay contract with flat prices
use energy_cashflow::{compute_cash_flow, ContractConfig, Discount, Entry, HourlyTables};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // october 2025 at 4800 per MWh, 100 MW bought and sold around the clock
    let mut config = ContractConfig::default();
    config.buy.volume = Entry::from(100);
    config.sell.volume = Entry::from(100);
    config.sell.discount = Discount::percent(dec!(2.5));
    config.validate()?;

    let results = compute_cash_flow(&config, &HourlyTables::new());

    println!("volume:    {} MWh", results.total_volume);
    println!("expenses:  {}", results.total_expenses);
    println!("income:    {}", results.total_income);
    println!("interest:  {}", results.total_interest);
    println!("net:       {}", results.net_income);
    println!("margin:    {}%", results.margin.round_dp(2));

    for row in &results.rows {
        println!(
            "{} {:?} out {:>14} in {:>14} balance {:>16}",
            row.date, row.weekday, row.outgoing, row.incoming, row.cumulative_delta
        );
    }

    Ok(())
}
