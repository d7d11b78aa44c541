//! Example: Fetch and display the Amp free-tier balance.
//!
//! # Running
//!
//! ```bash
//! AMP_SESSION_TOKEN=... cargo run -p amp-usage --example check_balance
//! ```
//!
//! # Prerequisites
//!
//! A session token copied from the browser (see `amp-balance setup`).

use amp_usage::{format_cents, get_usage, ApiError, Error, Tier, DEFAULT_API_URL};

fn main() {
    println!("Amp Free Balance Checker");
    println!("========================\n");

    let token = std::env::var("AMP_SESSION_TOKEN").ok();

    match get_usage(DEFAULT_API_URL, token.as_deref(), 100) {
        Ok((usage, tier)) => {
            println!("  Remaining: {}", format_cents(usage.remaining));
            println!(
                "  Used:      {} of {} ({:.1}%)",
                format_cents(usage.used),
                format_cents(usage.quota),
                usage.percent_used
            );
            println!(
                "  Replenish: +{}/hour",
                format_cents(usage.replenishment_rate)
            );
            match tier {
                Tier::Low => println!("  Status:    ⚠️  Low balance"),
                Tier::Critical => println!("  Status:    🔴 Critical"),
                Tier::Warning => println!("  Status:    🟡 Warning"),
                Tier::Normal => println!("  Status:    🟢 Normal"),
            }
        }
        Err(Error::Api(ApiError::NotConfigured)) => {
            eprintln!("❌ AMP_SESSION_TOKEN is not set.");
            eprintln!();
            eprintln!("To fix this:");
            eprintln!("  1. Open ampcode.com/settings and the browser's network tab");
            eprintln!("  2. Copy the getFreeTierUsage request as cURL");
            eprintln!("  3. Run `amp-balance setup` and paste it, or export the session cookie");
            std::process::exit(1);
        }
        Err(Error::Api(ApiError::Unauthorized(status))) => {
            eprintln!("❌ Token rejected by the server ({status}).");
            eprintln!("   Session tokens expire periodically; copy a fresh one.");
            std::process::exit(1);
        }
        Err(Error::Api(ApiError::RateLimited { retry_after })) => {
            eprintln!("❌ Rate limited by the API.");
            if let Some(retry) = retry_after {
                eprintln!("   Retry after: {}", retry);
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}
