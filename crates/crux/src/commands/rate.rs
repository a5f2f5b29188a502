//! `crux rate`: classify one value against Core Web Vitals thresholds.

use serde::Serialize;

use crux_core::{Rating, classify};

use crate::cli::{GlobalOpts, RateArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Verdict {
    metric: String,
    value: f64,
    formatted: String,
    rating: Rating,
    description: String,
}

impl Verdict {
    fn new(metric: &str, value: f64) -> Self {
        let metric = metric.trim().to_lowercase();
        Self {
            formatted: classify::format_named(&metric, Some(value)),
            rating: classify::rate_named(&metric, Some(value)),
            description: classify::describe_named(&metric).into_owned(),
            metric,
            value,
        }
    }
}

pub fn handle(args: &RateArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    if !args.value.is_finite() {
        return Err(CliError::Validation {
            field: "value".into(),
            reason: "must be a finite number".into(),
        });
    }

    let verdict = Verdict::new(&args.metric, args.value);
    if verdict.rating == Rating::Unknown {
        tracing::warn!(metric = %verdict.metric, "unrecognized metric name");
    }

    let color = output::should_color(config::color_mode(global, cfg));
    let out = output::render_single(
        config::output_format(global, cfg),
        &verdict,
        |v| {
            format!(
                "{}: {} ({})\n{}",
                v.metric.to_uppercase(),
                v.formatted,
                output::paint(&v.rating.to_string(), v.rating, color),
                v.description
            )
        },
        |v| v.rating.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
