use anyhow::Context;
use clap::Parser;

use headsup_api::config::Config;
use headsup_api::gateway::{SmsGateway, SmsMessage, TwilioGateway};

/// Send one test SMS through the configured gateway.
#[derive(Parser)]
#[command(name = "headsup-test-sms")]
struct Args {
    /// Destination phone number, e.g. +15550100
    to: String,

    /// Message text
    #[arg(long, default_value = "Hello from HeadsUp test!")]
    body: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init_timed();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let gateway = TwilioGateway::new(config.twilio)?;

    let sent = gateway
        .send(&SmsMessage {
            from: config.sender,
            to: args.to,
            body: args.body,
        })
        .await?;

    println!("Message sent! SID: {}", sent.sid);
    Ok(())
}
