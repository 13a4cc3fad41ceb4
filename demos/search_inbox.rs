//! Search a namespace inbox.
//!
//! Waits for the first email addressed to the given prefix, then prints
//! everything received in the last hour without waiting.
//!
//! # Running
//!
//! ```bash
//! MAILISK_API_KEY=your_api_key MAILISK_NAMESPACE=mynamespace \
//!     cargo run --example search_inbox -- john
//! ```

use chrono::Utc;
use mailisk::{MailiskClient, RequestOptions, SearchInboxParams};
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key =
        env::var("MAILISK_API_KEY").expect("MAILISK_API_KEY environment variable must be set");
    let namespace =
        env::var("MAILISK_NAMESPACE").expect("MAILISK_NAMESPACE environment variable must be set");
    let prefix = env::args().nth(1).unwrap_or_else(|| "john".to_string());

    let client = MailiskClient::with_api_key(api_key)?;

    // Defaults: last 15 minutes, wait for a match, five minute timeout
    println!("Waiting for mail to {}@{}.mailisk.net...", prefix, namespace);
    let inbox = client
        .search_inbox(
            &namespace,
            Some(SearchInboxParams::new().with_to_addr_prefix(prefix.as_str())),
            Some(RequestOptions::new().with_timeout(Duration::from_secs(120))),
        )
        .await?;

    if let Some(email) = inbox.data.first() {
        println!("Got email:");
        println!("  From: {}", email.from.address);
        println!("  Subject: {}", email.subject.as_deref().unwrap_or("(none)"));
        println!("  Received: {}", email.received_date);
        if let Some(text) = &email.text {
            println!("  Text: {}", text.trim());
        }
        for attachment in &email.attachments {
            println!("  Attachment: {} ({} bytes)", attachment.filename, attachment.size);
        }
    }

    // Immediate search over a wider window
    let hour_ago = Utc::now().timestamp() - 3600;
    let recent = client
        .search_inbox(
            &namespace,
            Some(
                SearchInboxParams::new()
                    .with_from_timestamp(hour_ago)
                    .with_limit(20)
                    .with_wait(false),
            ),
            None,
        )
        .await?;

    println!("\n{} emails in the last hour:", recent.total_count);
    for email in &recent.data {
        println!(
            "  [{}] {} -> {}",
            email.received_date,
            email.from.address,
            email.subject.as_deref().unwrap_or("(none)")
        );
    }

    Ok(())
}
