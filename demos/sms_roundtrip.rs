//! Send a virtual SMS to one of the account's numbers and wait for it.
//!
//! # Running
//!
//! ```bash
//! MAILISK_API_KEY=your_api_key cargo run --example sms_roundtrip
//! ```

use mailisk::{MailiskClient, SearchSmsMessagesParams, SendVirtualSmsParams};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key =
        env::var("MAILISK_API_KEY").expect("MAILISK_API_KEY environment variable must be set");

    let client = MailiskClient::with_api_key(api_key)?;

    let numbers = client.list_sms_numbers().await?;
    let Some(number) = numbers.data.first() else {
        println!("No SMS numbers on this account");
        return Ok(());
    };
    println!("Using {} ({:?})", number.phone_number, number.country);

    client
        .send_virtual_sms(&SendVirtualSmsParams::new(
            "+15550001111",
            number.phone_number.as_str(),
            "Your verification code is 424242",
        ))
        .await?;

    // Waits until a matching message arrives
    let messages = client
        .search_sms_messages(
            &number.phone_number,
            Some(
                SearchSmsMessagesParams::new()
                    .with_from_number("+15550001111")
                    .with_body("verification"),
            ),
            None,
        )
        .await?;

    for message in &messages.data {
        println!("{} -> {}: {}", message.from_number, message.to_number, message.body);
    }

    Ok(())
}
