//! Demo: a gold supply-chain audit trail.
//!
//! Builds a small provenance ledger, prints it, then tampers with deep
//! copies to show how verification pinpoints the altered block. The
//! original ledger stays valid throughout.

use provchain::ledger::payload_from_value;
use provchain::{Chain, Result};
use serde_json::json;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut supply_chain = Chain::new();

    supply_chain.append(payload_from_value(json!({
        "action": "extract",
        "asset_id": "1000",
        "amount": "100kg",
        "metal": "Gold",
        "location": "Mine #45",
    }))?);

    supply_chain.append(payload_from_value(json!({
        "action": "extract",
        "asset_id": "1001",
        "amount": "150kg",
        "metal": "Gold",
        "location": "Mine #70",
    }))?);

    supply_chain.append(payload_from_value(json!({
        "action": "transfer",
        "asset_id": "1000",
        "amount": "100kg",
        "metal": "Gold",
        "location": "Mine A",
        "destination": "Storage Facility #11",
    }))?);

    supply_chain.append(payload_from_value(json!({
        "action": "sell",
        "asset_id": "1000",
        "amount": "100kg",
        "metal": "Gold",
        "location": "Storage Facility #11",
        "buyer": "91278",
    }))?);

    // Valid at this point
    supply_chain.print_all();

    println!("Unmodified ledger");
    println!("Verify: {:?}", supply_chain.verify());

    // Take a copy to tamper with, altering a transaction amount
    println!("Tampered, altering a transaction amount");
    let mut tampered_chain = supply_chain.clone();
    if let Some(payload) = tampered_chain.blocks_mut()[1].payload.as_mut() {
        payload.insert("amount".to_string(), json!("1000kg"));
    }
    println!("Verify: {:?}", tampered_chain.verify());

    // Take another copy, altering a recorded predecessor hash
    println!("Tampered, altering a previous hash on a record");
    let mut tampered_chain = supply_chain.clone();
    tampered_chain.blocks_mut()[2].previous_hash = "abc123".to_string();
    println!("Verify: {:?}", tampered_chain.verify());

    // The original is unaffected by either experiment
    println!("Original ledger still intact");
    println!("Verify: {:?}", supply_chain.verify());

    Ok(())
}
