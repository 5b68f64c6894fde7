//! Browse command handler.
//!
//! Drives a [`ListSyncController`] over an in-memory history. The
//! interactive mode maps short commands onto the controller transitions
//! and redraws after every settled round of fetches.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use modelhub_core::ports::{MemoryNavigator, TracingTelemetry};
use modelhub_core::{ListEvent, ListSyncConfig, ListSyncController, QueryState, SortKey};
use tracing::debug;

use super::Prompt;
use crate::bootstrap::CliContext;
use crate::commands::BrowseArgs;
use crate::error::CliError;
use crate::presentation::render_list;

const HELP: &str = "\
Commands:
  n, next            next page
  p, prev            previous page
  page <N>           jump to page N
  sort <key>         trending | likes | downloads | created | updated
  filter <id|all>    select a pipeline tab
  search [text]      search (empty clears)
  back               previous location
  refresh            re-fetch the current page
  q, quit            leave";

/// One interactive browse command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Next,
    Prev,
    Page(u32),
    Sort(SortKey),
    Filter(Option<String>),
    Search(String),
    Back,
    Refresh,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    match word {
        "n" | "next" => Ok(BrowseCommand::Next),
        "p" | "prev" => Ok(BrowseCommand::Prev),
        "page" => rest
            .parse::<u32>()
            .ok()
            .filter(|page| *page >= 1)
            .map(BrowseCommand::Page)
            .ok_or_else(|| format!("'{rest}' is not a page number")),
        "sort" => rest.parse::<SortKey>().map(BrowseCommand::Sort),
        "filter" => match rest {
            "" | "all" => Ok(BrowseCommand::Filter(None)),
            id => Ok(BrowseCommand::Filter(Some(id.to_string()))),
        },
        "search" => Ok(BrowseCommand::Search(rest.to_string())),
        "back" => Ok(BrowseCommand::Back),
        "refresh" | "r" => Ok(BrowseCommand::Refresh),
        "help" | "?" => Ok(BrowseCommand::Help),
        "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command '{other}' (type 'help')")),
    }
}

/// Initial query string: `--query` with the individual flags applied on top.
fn initial_query(args: &BrowseArgs) -> String {
    let mut state = QueryState::parse(args.query.as_deref().unwrap_or_default());
    if let Some(pipeline) = &args.pipeline {
        state = state.with_filter(Some(pipeline.clone()));
    }
    if let Some(sort) = args.sort {
        state = state.with_sort(sort);
    }
    if let Some(search) = &args.search {
        state = state.with_search(search.clone());
    }
    if let Some(page) = args.page {
        state = state.with_page(page);
    }
    state.to_query_string()
}

/// Execute the browse command.
pub async fn execute(ctx: &CliContext, args: BrowseArgs) -> Result<()> {
    let query = initial_query(&args);
    let navigator = Arc::new(MemoryNavigator::new(query.clone()));
    let mut controller = ListSyncController::new(
        ctx.catalog(),
        navigator.clone(),
        Arc::new(TracingTelemetry),
        ListSyncConfig::default(),
    );

    controller.initialize(&query);
    settle_and_render(&mut controller).await;

    if args.interactive {
        return run_interactive(&mut controller, &navigator).await;
    }

    let view = controller.view();
    match view.last_error.as_ref().or(view.pipelines_error.as_ref()) {
        Some(err) => Err(CliError::from(err.source_error().clone()).into()),
        None => Ok(()),
    }
}

async fn run_interactive(
    controller: &mut ListSyncController,
    navigator: &MemoryNavigator,
) -> Result<()> {
    let mut prompt = Prompt::new()?;
    println!("Type 'help' for commands.");

    while let Some(line) = prompt.read("browse> ")? {
        if line.is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        let page = controller.state().page;
        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                println!("{HELP}");
                continue;
            }
            BrowseCommand::Next => {
                let total_pages = controller.view().total_pages;
                if u64::from(page) >= total_pages {
                    println!("Already on the last page.");
                    continue;
                }
                controller.set_page(page + 1);
            }
            BrowseCommand::Prev => {
                if page <= 1 {
                    println!("Already on the first page.");
                    continue;
                }
                controller.set_page(page - 1);
            }
            BrowseCommand::Page(n) => controller.set_page(n),
            BrowseCommand::Sort(sort) => controller.set_sort(sort),
            BrowseCommand::Filter(pipeline) => controller.set_filter(pipeline),
            // Typed searches go through the quiet period like keystrokes do.
            BrowseCommand::Search(text) => controller.type_search(text),
            BrowseCommand::Back => {
                let Some(previous) = navigator.back() else {
                    println!("No earlier location.");
                    continue;
                };
                controller.location_changed(&previous);
            }
            BrowseCommand::Refresh => controller.refresh(),
        }

        settle_and_render(controller).await;
    }
    Ok(())
}

async fn settle_and_render(controller: &mut ListSyncController) {
    for event in controller.settle().await {
        match event {
            ListEvent::StaleDiscarded { seq } => debug!(seq, "Dropped superseded page"),
            ListEvent::SearchCommitted { search_query } => {
                debug!(%search_query, "Search committed");
            }
            _ => {}
        }
    }
    println!(
        "{}",
        render_list(controller.view(), controller.state(), Utc::now())
    );
}
