// src/config.rs
use std::path::PathBuf;

use derive_builder::Builder;
use shopstats_domain::{AggregateOp, LoadOptions, NumericPolicy, SortOrder};
use shopstats_shared_kernel::{PresentationError, PresentationResult};
use shopstats_usecase::QuerySpec;

use crate::cli::{Aggregate, Args, Command, Direction, OutputFormat};
use crate::parsers;

/// What a run computes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Report { top_locations: Option<usize> },
    Query(QuerySpec),
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct RunConfig {
    pub input: PathBuf,
    pub task: Task,
    #[builder(default)]
    pub load: LoadOptions,
    #[builder(default)]
    pub numeric_policy: NumericPolicy,
    #[builder(default)]
    pub format: OutputFormat,
    #[builder(default)]
    pub output_path: Option<PathBuf>,
    #[builder(default = "1")]
    pub jobs: usize,
    #[builder(default)]
    pub verbose: bool,
}

impl TryFrom<Args> for RunConfig {
    type Error = PresentationError;

    fn try_from(args: Args) -> PresentationResult<Self> {
        let delimiter =
            parsers::parse_delimiter(&args.input.delimiter).map_err(|reason| PresentationError::InvalidValue {
                flag: "--delimiter".to_string(),
                value: args.input.delimiter.clone(),
                reason,
            })?;
        let load = LoadOptions::new(delimiter, !args.input.no_header);

        let skip_invalid = matches!(
            args.command,
            Command::Report { skip_invalid: true, .. } | Command::Group { skip_invalid: true, .. }
        );
        let numeric_policy = if skip_invalid { NumericPolicy::SkipInvalid } else { NumericPolicy::Strict };

        let input = args.command.csv().to_path_buf();
        let task = task_from_command(args.command);

        RunConfigBuilder::default()
            .input(input)
            .task(task)
            .load(load)
            .numeric_policy(numeric_policy)
            .format(args.output.format)
            .output_path(args.output.output)
            .jobs(args.behavior.jobs.unwrap_or_else(num_cpus::get))
            .verbose(args.behavior.verbose)
            .build()
            .map_err(|e| PresentationError::ConfigBuildFailed(e.to_string()))
    }
}

fn task_from_command(command: Command) -> Task {
    match command {
        Command::Report { top_locations, .. } => Task::Report { top_locations },
        Command::Distinct { column, .. } => Task::Query(QuerySpec::Distinct { column }),
        Command::Group { by, metric, op, sort, limit, .. } => Task::Query(QuerySpec::GroupBy {
            group: by,
            metric,
            op: op.into(),
            sort: sort.map(SortOrder::from),
            limit,
        }),
        Command::Top { column, direction, n, .. } => {
            Task::Query(QuerySpec::Top { column, order: direction.into(), n })
        }
    }
}

macro_rules! map_enum {
    ($from:ty, $to:ty, $($a:ident => $b:ident),+ $(,)?) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self {
                match f {
                    $( <$from>::$a => <$to>::$b, )+
                }
            }
        }
    };
}

map_enum!(Aggregate, AggregateOp, Sum => Sum, Avg => Avg, Count => Count);
map_enum!(Direction, SortOrder, Asc => Ascending, Desc => Descending);
