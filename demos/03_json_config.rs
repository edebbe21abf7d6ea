/// json round trip - load a contract and its tables, print the results as json
use energy_cashflow::{compute_cash_flow, ContractConfig, HourlyTables};

const CONTRACT: &str = r#"{
  "supply": { "start": "2025-06-01", "end": "2025-06-30" },
  "pricing": { "price_mode": "Single", "plan_price": "5200", "load_type": "block 8 - 20" },
  "buy": {
    "volume_mode": "Single",
    "volume": "25",
    "discount": { "unit": "Percent", "magnitude": null },
    "payment_mode": "Prepay",
    "first_payment": "2025-05-27",
    "payment_terms": "10",
    "weekend_payments": false,
    "postpay": {
      "postpay_type": "Days",
      "days": "1",
      "offset_days": "0",
      "weekend_payments": false,
      "decade_discounts": [
        { "unit": "Percent", "magnitude": null },
        { "unit": "Percent", "magnitude": null },
        { "unit": "Percent", "magnitude": null }
      ]
    }
  },
  "sell": {
    "volume_mode": "Single",
    "volume": "25",
    "discount": { "unit": "Additive", "magnitude": "150" },
    "payment_mode": "Prepay",
    "first_payment": "2025-05-30",
    "payment_terms": "3",
    "weekend_payments": false,
    "postpay": {
      "postpay_type": "Days",
      "days": "2",
      "offset_days": "0",
      "weekend_payments": false,
      "decade_discounts": [
        { "unit": "Percent", "magnitude": null },
        { "unit": "Percent", "magnitude": null },
        { "unit": "Percent", "magnitude": null }
      ]
    }
  },
  "interest": { "overdraft_annual_rate": "19", "overnight_annual_rate": "10" }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ContractConfig::from_json(CONTRACT)?;
    config.validate()?;

    let tables = HourlyTables::for_config(&config);
    let tables_json = tables.to_json()?;
    println!("hourly tables: {} days, {} bytes of json", tables.prices.len(), tables_json.len());

    let results = compute_cash_flow(&config, &tables);
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
