//! Catalog list rendering.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use modelhub_core::utils::{format_number, time_ago};
use modelhub_core::{ListView, ModelSummary, Pipeline, QueryState};

use super::{separator, truncate_string};

const LIST_WIDTH: usize = 80;
const MAX_ID_LEN: usize = 48;

/// One model as a two-line entry.
pub fn format_model_row(model: &ModelSummary, now: DateTime<Utc>) -> String {
    let mut title = truncate_string(&model.id, MAX_ID_LEN);
    if !model.available {
        title.push_str(" (unavailable)");
    }

    let mut details = vec![
        model.author.fullname.as_deref().map_or_else(
            || format!("{} · {}", model.author.name, model.author.kind.display_name()),
            |fullname| format!("{fullname} · {}", model.author.kind.display_name()),
        ),
    ];
    if !model.pipeline_tag.is_empty() {
        details.push(model.pipeline_tag.clone());
    }
    if let Some(modified) = model.last_modified {
        details.push(format!("Updated {}", time_ago(modified, now)));
    }
    details.push(format!("↓ {}", format_number(model.downloads)));
    details.push(format!("♥ {}", format_number(model.likes)));

    format!("{title}\n    {}", details.join(" · "))
}

/// The pipeline tabs, with the selected one in brackets.
pub fn render_pipelines(pipelines: &[Pipeline], selected: Option<&str>) -> String {
    let all = if selected.is_none() { "[All]" } else { "All" };
    let mut tabs = vec![all.to_string()];
    tabs.extend(pipelines.iter().map(|p| {
        if selected == Some(p.id.as_str()) {
            format!("[{}]", p.label)
        } else {
            p.label.clone()
        }
    }));
    tabs.join("  ")
}

/// The whole list view: tabs, query, models, pagination and any error.
pub fn render_list(view: &ListView, state: &QueryState, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    if !view.pipelines.is_empty() {
        let _ = writeln!(out, "{}", render_pipelines(&view.pipelines, state.pipeline_id.as_deref()));
    }

    let query = state.to_query_string();
    let _ = writeln!(
        out,
        "Sort: {}{}   URL: ?{query}",
        state.sort.label(),
        if state.search_query.is_empty() {
            String::new()
        } else {
            format!("   Search: \"{}\"", state.search_query)
        },
    );
    let _ = writeln!(out, "{}", separator(LIST_WIDTH));

    if view.models.is_empty() && !view.loading {
        let _ = writeln!(out, "No models found.");
    }
    for model in &view.models {
        let _ = writeln!(out, "{}", format_model_row(model, now));
    }

    let _ = writeln!(out, "{}", separator(LIST_WIDTH));
    let _ = write!(
        out,
        "Page {} of {} ({} models)",
        state.page,
        view.total_pages.max(1),
        format_number(view.num_total_items)
    );
    if view.loading {
        out.push_str("   loading...");
    }
    for err in [&view.pipelines_error, &view.last_error].into_iter().flatten() {
        let _ = write!(out, "\n⚠ {err}");
    }
    out
}
