// src/app.rs
use shopstats_infra::FileSource;
use shopstats_shared_kernel::Result;
use shopstats_usecase::{ReportOptions, RunQuery, ShoppingReport};

use crate::config::{RunConfig, Task};
use crate::presentation;

/// Runs the configured task and writes its rendering.
pub fn run(config: &RunConfig) -> Result<()> {
    let source = FileSource::new(&config.input);

    let rendered = match &config.task {
        Task::Report { top_locations } => {
            let options = ReportOptions {
                load: config.load,
                numeric_policy: config.numeric_policy,
                top_locations: *top_locations,
            };
            let report = ShoppingReport::new(&source).run(&options)?;
            presentation::render_report(&report, config.format)?
        }
        Task::Query(spec) => {
            let output = RunQuery::new(&source).run(spec, &config.load, config.numeric_policy)?;
            presentation::render_query(&output, config.format)?
        }
    };

    presentation::emit(&rendered, config.output_path.as_deref())
}
