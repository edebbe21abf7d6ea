/// postpay settlements - buying on decade terms, selling on D+2
use energy_cashflow::{
    compute_cash_flow, ContractConfig, Direction, Discount, Entry, HourlyTables, PaymentMode,
    PostpayType,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = ContractConfig::default();
    for direction in [Direction::Buy, Direction::Sell] {
        let side = config.side_mut(direction);
        side.volume = Entry::from(50);
        side.payment_mode = PaymentMode::Postpay;
    }
    config.sell.discount = Discount::percent(dec!(3));

    // buyer settles each decade at its own discount
    config.buy.postpay.postpay_type = PostpayType::Decade;
    config.buy.postpay.decade_discounts = [
        Discount::percent(dec!(-2)),
        Discount::percent(dec!(-1)),
        Discount::additive(dec!(-25)),
    ];

    // buyers pay us two days after delivery, moved off weekends
    config.sell.postpay.postpay_type = PostpayType::Days;
    config.sell.postpay.days = Entry::from(2);
    config.validate()?;

    let results = compute_cash_flow(&config, &HourlyTables::new());

    for row in results.rows.iter().filter(|r| !r.delta.is_zero()) {
        println!("{} {:>14} | {} | {}", row.date, row.delta, row.buy_coverage, row.sell_coverage);
    }

    println!();
    println!("overdraft interest: {}", results.total_overdraft_interest);
    println!("overnight interest: {}", results.total_overnight_interest);
    println!("deepest overdraft:  {}", results.summary.max_overdraft);
    println!("net income:         {}", results.net_income);

    Ok(())
}
