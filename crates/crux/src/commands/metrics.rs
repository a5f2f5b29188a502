//! `crux metrics`: the metric reference card.

use serde::Serialize;
use tabled::builder::Builder;

use crux_core::{MetricName, MetricUnit};

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct MetricInfo {
    name: MetricName,
    unit: MetricUnit,
    good: f64,
    needs_improvement: f64,
    description: &'static str,
}

impl From<MetricName> for MetricInfo {
    fn from(name: MetricName) -> Self {
        let t = name.thresholds();
        Self {
            name,
            unit: name.unit(),
            good: t.good,
            needs_improvement: t.needs_improvement,
            description: name.description(),
        }
    }
}

fn reference_table(infos: &[MetricInfo]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Unit", "Good ≤", "Needs improvement ≤", "Description"]);
    for info in infos {
        builder.push_record([
            info.name.as_str().to_uppercase(),
            info.unit.to_string(),
            info.good.to_string(),
            info.needs_improvement.to_string(),
            info.description.to_owned(),
        ]);
    }
    output::render_table(builder)
}

pub fn handle(global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let infos: Vec<MetricInfo> = MetricName::ALL.into_iter().map(MetricInfo::from).collect();
    let out = output::render_single(
        config::output_format(global, cfg),
        infos.as_slice(),
        reference_table,
        |infos| {
            infos
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
