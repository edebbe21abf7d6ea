/// hourly pricing - fill tables from a spreadsheet paste
use energy_cashflow::chrono::NaiveDate;
use energy_cashflow::{
    apply_paste, compute_cash_flow, ContractConfig, Direction, Entry, HourlyTables, PriceMode,
    VolumeMode,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = ContractConfig::default();
    config.pricing.price_mode = PriceMode::Hourly;
    config.buy.volume_mode = VolumeMode::Hourly;
    config.sell.volume_mode = VolumeMode::Hourly;
    config.buy.volume = Entry::from(10);
    config.sell.volume = Entry::from(10);

    // every day starts from the flat price and volumes
    let mut tables = HourlyTables::for_config(&config);
    let dates: Vec<NaiveDate> = tables.prices.dates().collect();

    // evening peak prices for the first two days, copied from a sheet
    let peak = "6100,5\t6400\t6950\t7200\n6050\t6300,25\t-\t7100\n";
    let start = NaiveDate::from_ymd_opt(2025, 10, 1).ok_or("bad date")?;
    let written = apply_paste(&mut tables.prices, &dates, start, 17, peak);
    println!("pasted {} price cells", written);

    // nothing sold overnight on the first day
    let sold = tables.volumes_mut(Direction::Sell);
    for hour in 0..6 {
        sold.set_cell(start, hour, Entry::from(0));
    }

    // stretch the contract by a week; pasted cells survive the resize
    config.supply.end = NaiveDate::from_ymd_opt(2025, 11, 7).ok_or("bad date")?;
    let tables = tables.sync_to_config(&config);
    println!("tables cover {} days", tables.prices.len());

    let results = compute_cash_flow(&config, &tables);
    println!("bought {} MWh, sold {} MWh", results.total_buy_volume, results.total_sell_volume);
    println!("expenses {}, income {}", results.total_expenses, results.total_income);
    println!("net income {}", results.net_income);

    Ok(())
}
