//! Send an email through a namespace's virtual SMTP relay and read it back.
//!
//! # Running
//!
//! ```bash
//! MAILISK_API_KEY=your_api_key MAILISK_NAMESPACE=mynamespace \
//!     cargo run --example send_virtual_email
//! ```

use chrono::Utc;
use mailisk::{
    AttachmentId, MailiskClient, OutgoingAttachment, SearchInboxParams, SendVirtualEmailParams,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key =
        env::var("MAILISK_API_KEY").expect("MAILISK_API_KEY environment variable must be set");
    let namespace =
        env::var("MAILISK_NAMESPACE").expect("MAILISK_NAMESPACE environment variable must be set");

    let client = MailiskClient::with_api_key(api_key)?;

    let settings = client.get_smtp_settings(&namespace).await?;
    println!(
        "Relay: {}:{} as {}",
        settings.data.host, settings.data.port, settings.data.username
    );

    let prefix = format!("demo-{}", Utc::now().timestamp());
    let to = format!("{}@{}.mailisk.net", prefix, namespace);

    let params = SendVirtualEmailParams::new("demo@example.com", to.as_str(), "Password reset")
        .with_text("Your code is 123456")
        .with_html("<p>Your code is <b>123456</b></p>")
        .with_header("X-Demo", "send_virtual_email")
        .with_attachment(
            OutgoingAttachment::new("notes.txt", b"hello from the demo".to_vec())
                .with_content_type("text/plain"),
        );

    println!("Sending to {}...", to);
    client.send_virtual_email(&namespace, &params).await?;

    let inbox = client
        .search_inbox(
            &namespace,
            Some(SearchInboxParams::new().with_to_addr_prefix(prefix.as_str())),
            None,
        )
        .await?;

    let Some(email) = inbox.data.first() else {
        println!("No email found");
        return Ok(());
    };
    println!("Received {} ({:?})", email.id, email.subject);

    for attachment in &email.attachments {
        let id: &AttachmentId = &attachment.id;
        let bytes = client.download_attachment(id).await?;
        println!(
            "  {} -> {:?}",
            attachment.filename,
            String::from_utf8_lossy(&bytes)
        );
    }

    Ok(())
}
