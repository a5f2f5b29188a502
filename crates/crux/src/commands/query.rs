//! `crux query`: fetch, filter, sort, page, and render CrUX results.

use std::fmt::Write as _;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::builder::Builder;
use tracing::{debug, warn};

use crux_core::pipeline::{PAGE_SIZE_OPTIONS, filter_options};
use crux_core::{
    Comparison, CoreError, DerivedView, FilterSpec, MetricFilter, MetricSource, SortDirection,
    SortKey, SortSpec, UrlList, ViewState, classify, derive,
};

use crate::cli::{GlobalOpts, OperatorArg, QueryArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

impl From<OperatorArg> for Comparison {
    fn from(op: OperatorArg) -> Self {
        match op {
            OperatorArg::Gt => Self::Gt,
            OperatorArg::Lt => Self::Lt,
            OperatorArg::Eq => Self::Eq,
            OperatorArg::Gte => Self::Gte,
            OperatorArg::Lte => Self::Lte,
        }
    }
}

// ── Input ───────────────────────────────────────────────────────────

/// Attach the offending input to a URL rejection.
fn reject(err: CoreError, input: &str) -> CliError {
    match err {
        CoreError::InvalidInput { message } => CliError::invalid_input(message, input),
        other => other.into(),
    }
}

/// Positional URLs first, then `--from-file` lines, in order.
fn collect_urls(args: &QueryArgs) -> Result<Vec<String>, CliError> {
    let mut list = UrlList::new();
    for raw in &args.urls {
        list.add(raw).map_err(|e| reject(e, raw))?;
    }

    if let Some(ref path) = args.from_file {
        let text = std::fs::read_to_string(path)?;
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));
        for line in lines {
            list.add(line).map_err(|e| reject(e, line))?;
        }
    }

    Ok(list.take_for_search(None)?)
}

fn view_state(args: &QueryArgs, cfg: &Config) -> Result<ViewState, CliError> {
    let metric: MetricFilter = args.metric.parse().map_err(|_| CliError::Validation {
        field: "metric".into(),
        reason: format!("unknown metric '{}'", args.metric),
    })?;

    let value = args.value.as_deref().and_then(FilterSpec::parse_value);
    if let (Some(raw), None) = (&args.value, value) {
        debug!(value = %raw, "non-numeric filter value, filter disabled");
    }

    let mut view = ViewState::default();
    view.set_filter(FilterSpec::new(metric, args.op.into(), value));

    if let Some(ref raw) = args.sort {
        let key: SortKey = raw.parse().map_err(|_| CliError::Validation {
            field: "sort".into(),
            reason: format!("unknown sort key '{raw}'"),
        })?;
        let direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        view.sort = SortSpec::by(key, direction);
    }

    let page_size = args.page_size.map_or(cfg.defaults.page_size, usize::from);
    if !PAGE_SIZE_OPTIONS.contains(&page_size) {
        debug!(page_size, options = ?PAGE_SIZE_OPTIONS, "uncommon page size");
    }
    view.set_page_size(page_size);
    view.set_page(args.page);
    Ok(view)
}

// ── Rendering ───────────────────────────────────────────────────────

fn results_table(derived: &DerivedView<'_>, state: &ViewState, color: bool) -> String {
    let mut out = String::new();

    if derived.visible_rows.is_empty() {
        let _ = writeln!(out, "No results match the current filter.");
    } else {
        let mut builder = Builder::default();
        let mut header = vec!["URL".to_owned()];
        header.extend(derived.columns.iter().map(|m| m.as_str().to_uppercase()));
        builder.push_record(header);

        for row in &derived.visible_rows {
            let mut record = vec![row.url.clone()];
            for &metric in &derived.columns {
                let value = row.metric(metric);
                let cell = classify::format(metric, value);
                record.push(output::paint(&cell, classify::rate(metric, value), color));
            }
            builder.push_record(record);
        }
        let _ = writeln!(out, "{}", output::render_table(builder));
    }

    let total = derived.total_filtered_count;
    let range = state.page.range(total);
    let first = if range.is_empty() { 0 } else { range.start + 1 };
    let _ = write!(
        out,
        "Rows {first}-{} of {total} · page {}/{}",
        range.end,
        state.page.page_index + 1,
        state.page.page_count(total)
    );

    if derived.show_aggregate() {
        let _ = write!(out, "\n\n{}", aggregate_table(derived));
    }

    out
}

fn aggregate_table(derived: &DerivedView<'_>) -> String {
    let mut builder = Builder::default();
    let mut header = vec![format!("Aggregate ({} results)", derived.result_count)];
    header.extend(derived.columns.iter().map(|m| m.as_str().to_uppercase()));
    builder.push_record(header);

    let two_places = |v: Option<f64>| v.map_or_else(|| "-".to_owned(), |v| format!("{v:.2}"));
    let rows: [(&str, fn(&crux_core::MetricStats) -> Option<f64>); 4] = [
        ("Average", |s| Some(s.avg)),
        ("Sum", |s| Some(s.sum)),
        ("Min", |s| s.min),
        ("Max", |s| s.max),
    ];
    for (label, pick) in rows {
        let mut record = vec![label.to_owned()];
        for &metric in &derived.columns {
            record.push(two_places(derived.aggregate.get(metric).and_then(pick)));
        }
        builder.push_record(record);
    }
    output::render_table(builder)
}

fn spinner(count: usize, quiet: bool) -> Option<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching CrUX data for {count} URL(s)..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &QueryArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let urls = collect_urls(args)?;
    let state = view_state(args, cfg)?;

    let source = MetricSource::new(&config::build_source_config(global, cfg)?)?;
    if !source.is_live() && !global.quiet {
        eprintln!("No API key configured; showing randomly generated sample data.");
    }

    let progress = spinner(urls.len(), global.quiet);
    let fetched = source.fetch_batch(&urls).await;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let results = fetched?;

    if !filter_options(&results).contains(&state.filter.metric) {
        warn!(
            metric = %state.filter.metric,
            "no result reports this metric, the filter matches nothing"
        );
    }

    let derived = derive(&results, &state);
    debug!(
        shown = derived.visible_rows.len(),
        filtered = derived.total_filtered_count,
        total = derived.result_count,
        "derived view"
    );

    let color = output::should_color(config::color_mode(global, cfg));
    let out = output::render_single(
        config::output_format(global, cfg),
        &derived,
        |d| results_table(d, &state, color),
        |d| {
            d.visible_rows
                .iter()
                .map(|r| r.url.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
