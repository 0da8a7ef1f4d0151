//! Terminal chat client for the helper relay
//!
//! Plain lines are sent as user messages. Commands:
//! `/decide` starts a decision, `/history` prints the transcript, `/quit` exits.

use helper_chat::config::ClientConfig;
use helper_chat::conversation::{
    ConversationController, HttpRelayClient, Message, RelayClient, Role,
};
use helper_chat::decision::{DecisionSpec, MAX_OPTIONS, MIN_OPTIONS};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::task::JoinSet;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    let client = HttpRelayClient::new(&config.relay_url)?;
    let endpoint = client.endpoint().to_string();
    let controller = Arc::new(ConversationController::new(client, config.policy));
    println!("Connected to {endpoint} ({:?} submissions)", controller.policy());
    println!("Type a message, /decide, /history or /quit.");

    run(BufReader::new(tokio::io::stdin()).lines(), controller).await?;
    Ok(())
}

/// Read commands until `/quit` or end of input, then wait for every
/// submission still in flight
async fn run<I, C>(
    mut lines: Lines<I>,
    controller: Arc<ConversationController<C>>,
) -> std::io::Result<()>
where
    I: AsyncBufRead + Unpin,
    C: RelayClient + 'static,
{
    let mut submissions = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/history" => {
                for message in controller.snapshot() {
                    print_message(&message);
                }
            }
            "/decide" => {
                let Some(mut spec) = read_decision(&mut lines).await? else {
                    break;
                };
                let controller = controller.clone();
                submissions.spawn(async move {
                    match controller.submit_decision(&mut spec).await {
                        Ok(message) => print_message(&message),
                        Err(e) => println!("! {e}"),
                    }
                });
            }
            // Blank input is ignored before it reaches the controller
            "" => {}
            _ => {
                let controller = controller.clone();
                submissions.spawn(async move {
                    match controller.submit(line, Role::User).await {
                        Ok(message) => print_message(&message),
                        Err(e) => println!("! {e}"),
                    }
                });
            }
        }
        while submissions.try_join_next().is_some() {}
    }

    // Requests are never cancelled
    while let Some(joined) = submissions.join_next().await {
        if let Err(e) = joined {
            tracing::warn!(error = %e, "Submission task failed");
        }
    }

    Ok(())
}

fn print_message(message: &Message) {
    println!("[{}] {}", message.role.as_str(), message.content);
}

async fn ask<I: AsyncBufRead + Unpin>(
    lines: &mut Lines<I>,
    question: &str,
) -> std::io::Result<Option<String>> {
    print!("{question}");
    std::io::stdout().flush()?;
    lines.next_line().await
}

/// Walks the user through the decision form; `None` means input closed
async fn read_decision<I: AsyncBufRead + Unpin>(
    lines: &mut Lines<I>,
) -> std::io::Result<Option<DecisionSpec>> {
    let mut spec = DecisionSpec::new();

    loop {
        let question = format!("How many options ({MIN_OPTIONS}-{MAX_OPTIONS})? ");
        let Some(answer) = ask(lines, &question).await? else {
            return Ok(None);
        };
        match answer.trim().parse::<usize>() {
            Ok(count) => match spec.set_option_count(count) {
                Ok(()) => break,
                Err(e) => println!("! {e}"),
            },
            Err(_) => println!("! Please enter a number"),
        }
    }

    for index in 0..spec.option_count() {
        let Some(option) = ask(lines, &format!("Option {}: ", index + 1)).await? else {
            return Ok(None);
        };
        if let Err(e) = spec.set_option(index, option) {
            println!("! {e}");
        }
    }

    let Some(context) = ask(lines, "Context (optional): ").await? else {
        return Ok(None);
    };
    spec.set_context(context);

    Ok(Some(spec))
}
