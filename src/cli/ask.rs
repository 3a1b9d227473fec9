//! `ask` command: fan a question out to the panel, optionally run
//! reflection rounds, and synthesize a final answer.

use anyhow::{bail, Context};
use colored::Colorize;

use crate::cli::AskArgs;
use crate::config::Config;
use crate::display::render_responses;
use crate::provider::{ChatMessage, CompletionRequest, ModelResponse};
use crate::routing::ProviderRouter;

/// Round tag for the synthesis request.
const SYNTHESIS_ROUND: i32 = -1;

pub async fn handle_ask(config: Config, args: &AskArgs) -> anyhow::Result<()> {
    let panel = args
        .panel
        .clone()
        .unwrap_or_else(|| config.panel.models.clone());
    if panel.is_empty() {
        bail!("panel is empty; configure [panel] models or pass --panel");
    }
    let synthesizer = args
        .synthesizer
        .clone()
        .unwrap_or_else(|| config.panel.synthesizer.clone());
    let rounds = args.rounds.unwrap_or(config.panel.rounds);
    if !(1..=3).contains(&rounds) {
        bail!("rounds must be between 1 and 3, got {}", rounds);
    }

    let mut router = ProviderRouter::new(config);
    router.open().await.context("failed to open providers")?;

    let result = run_debate(&router, args, &panel, &synthesizer, rounds).await;
    router.close().await;
    result
}

async fn run_debate(
    router: &ProviderRouter,
    args: &AskArgs,
    panel: &[String],
    synthesizer: &str,
    rounds: u32,
) -> anyhow::Result<()> {
    let requests = panel
        .iter()
        .map(|alias| {
            CompletionRequest::from_prompt(alias.clone(), args.query.clone())
                .with_alias(alias.clone())
                .with_round(0)
        })
        .collect();
    let mut responses = router.complete_parallel(requests).await?;

    println!("{}", "── Round 0: initial answers".bold());
    println!("{}", render_responses(&responses));

    for round in 1..rounds as i32 {
        let requests: Vec<CompletionRequest> = panel
            .iter()
            .map(|alias| {
                CompletionRequest::from_messages(
                    alias.clone(),
                    reflection_messages(&args.query, alias, &responses),
                )
                .with_alias(alias.clone())
                .with_round(round)
            })
            .collect();
        responses = router.complete_parallel(requests).await?;

        println!("{}", format!("── Round {}: reflections", round).bold());
        println!("{}", render_responses(&responses));
    }

    if !args.no_synthesis {
        let request = CompletionRequest::from_messages(
            synthesizer.to_string(),
            synthesis_messages(&args.query, &responses),
        )
        .with_alias(synthesizer.to_string())
        .with_round(SYNTHESIS_ROUND);
        let synthesis = router.complete(request).await?;

        println!("{}", "── Synthesis".bold());
        println!("{}", render_responses(std::slice::from_ref(&synthesis)));
    }

    Ok(())
}

/// Format successful panel answers as a quoted transcript.
fn transcript(responses: &[ModelResponse], exclude_alias: Option<&str>) -> String {
    responses
        .iter()
        .filter(|r| !r.is_error())
        .filter(|r| exclude_alias != Some(r.model_alias.as_str()))
        .map(|r| format!("### {}\n{}", r.model_alias, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn reflection_messages(
    query: &str,
    alias: &str,
    previous: &[ModelResponse],
) -> Vec<ChatMessage> {
    let own = previous
        .iter()
        .find(|r| r.model_alias == alias && !r.is_error())
        .map(|r| r.content.as_str())
        .unwrap_or("(your previous answer failed)");
    vec![
        ChatMessage::system(
            "You are one voice in a panel of AI models debating a question. \
             Review the other panelists' answers, then revise your own. \
             Keep what holds up, correct what does not, and say where you \
             still disagree.",
        ),
        ChatMessage::user(format!(
            "Question: {}\n\nYour previous answer:\n{}\n\nOther panelists:\n\n{}",
            query,
            own,
            transcript(previous, Some(alias))
        )),
    ]
}

fn synthesis_messages(query: &str, responses: &[ModelResponse]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(
            "You are the synthesizer for a panel of AI models. Combine the \
             panel's answers into one final response. Note real disagreements \
             instead of papering over them.",
        ),
        ChatMessage::user(format!(
            "Question: {}\n\nPanel answers:\n\n{}",
            query,
            transcript(responses, None)
        )),
    ]
}
