use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::{info, warn};
use std::{str::FromStr, time::Duration};
use wabasolver::{
    algebra::{BudgetDirection, MonoidKind, SemiringKind, Weight},
    io::{ExtensionWriter, TextExtensionWriter},
    solvers::{CancellationToken, Optimization, Semantics, SolveError, WabaSolver},
};

const CMD_NAME: &str = "solve";

const ARG_SEMANTICS: &str = "SEMANTICS";
const ARG_SEMIRING: &str = "SEMIRING";
const ARG_MONOID: &str = "MONOID";
const ARG_BUDGET: &str = "BUDGET";
const ARG_BUDGET_DIRECTION: &str = "BUDGET_DIRECTION";
const ARG_OPTIMIZE: &str = "OPTIMIZE";
const ARG_MAX_RESULTS: &str = "MAX_RESULTS";
const ARG_THREADS: &str = "THREADS";
const ARG_TIMEOUT: &str = "TIMEOUT";
const ARG_NODE_LIMIT: &str = "NODE_LIMIT";

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Computes the extensions of a weighted ABA framework")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .args(&algebra_args())
            .args(&search_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches
            .value_of(common::ARG_INPUT)
            .ok_or_else(|| anyhow!("missing input file"))?;
        let framework = common::read_file_path(file)?;
        let value_of = |arg: &str| {
            arg_matches
                .value_of(arg)
                .ok_or_else(|| anyhow!("missing value for {}", arg))
        };
        let semantics = Semantics::from_name(value_of(ARG_SEMANTICS)?)?;
        let semiring = SemiringKind::from_name(value_of(ARG_SEMIRING)?)?;
        let monoid = MonoidKind::from_name(value_of(ARG_MONOID)?)?;
        let optimization = Optimization::from_name(value_of(ARG_OPTIMIZE)?)?;
        let n_threads = parse_value::<usize>(value_of(ARG_THREADS)?, "number of threads")?;
        let mut solver = WabaSolver::new(&framework, semiring, monoid, semantics)
            .with_optimization(optimization)
            .with_n_threads(n_threads)
            .with_cancellation_token(create_cancellation_token(arg_matches)?);
        if let Some(b) = arg_matches.value_of(ARG_BUDGET) {
            solver = solver.with_budget(parse_value::<Weight>(b, "budget")?);
        }
        if let Some(d) = arg_matches.value_of(ARG_BUDGET_DIRECTION) {
            solver = solver.with_budget_direction(BudgetDirection::from_name(d)?);
        }
        if let Some(n) = arg_matches.value_of(ARG_MAX_RESULTS) {
            solver = solver.with_max_results(parse_value::<usize>(n, "maximal number of results")?);
        }
        let writer = TextExtensionWriter::default();
        let mut out = std::io::stdout();
        match solver.solve() {
            Ok(outcome) => {
                info!("found {} extension(s)", outcome.extensions().len());
                writer.write_outcome(&mut out, &outcome)
            }
            Err(SolveError::Cancelled { partial }) => {
                warn!("the search was cancelled; the extensions below may not be all the extensions");
                writer.write_extensions(&mut out, &partial)
            }
            Err(e) => Err(e).context("while computing the extensions"),
        }
    }
}

fn algebra_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_SEMANTICS)
            .short("s")
            .long("semantics")
            .empty_values(false)
            .multiple(false)
            .default_value("st")
            .help("the semantics (cf, adm, co, gr, pr, sst, id, stg or st)"),
        Arg::with_name(ARG_SEMIRING)
            .long("semiring")
            .empty_values(false)
            .multiple(false)
            .default_value("godel")
            .help("the semiring used to weight the supported atoms (see the algebras command)"),
        Arg::with_name(ARG_MONOID)
            .long("monoid")
            .empty_values(false)
            .multiple(false)
            .default_value("max")
            .help("the monoid used to aggregate the weights of the discarded attacks (see the algebras command)"),
        Arg::with_name(ARG_BUDGET)
            .short("b")
            .long("budget")
            .empty_values(false)
            .multiple(false)
            .allow_hyphen_values(true)
            .help("the budget, as a number, #sup or #inf (defaults to the identity of the monoid)"),
        Arg::with_name(ARG_BUDGET_DIRECTION)
            .long("budget-direction")
            .empty_values(false)
            .multiple(false)
            .possible_values(&["upper", "lower"])
            .help("whether the budget is an upper or a lower bound (defaults to the one of the monoid)"),
    ]
}

fn search_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_OPTIMIZE)
            .long("optimize")
            .empty_values(false)
            .multiple(false)
            .possible_values(&["none", "min", "max"])
            .default_value("none")
            .help("keep only the extensions with minimal or maximal cost"),
        Arg::with_name(ARG_MAX_RESULTS)
            .short("n")
            .long("max-results")
            .empty_values(false)
            .multiple(false)
            .help("the maximal number of extensions to compute"),
        Arg::with_name(ARG_THREADS)
            .long("threads")
            .empty_values(false)
            .multiple(false)
            .default_value("1")
            .help("the number of threads used by the search"),
        Arg::with_name(ARG_TIMEOUT)
            .long("timeout")
            .empty_values(false)
            .multiple(false)
            .help("a timeout for the search, in seconds"),
        Arg::with_name(ARG_NODE_LIMIT)
            .long("node-limit")
            .empty_values(false)
            .multiple(false)
            .help("the maximal number of nodes explored by the search"),
    ]
}

fn parse_value<T>(value: &str, what: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Into<anyhow::Error>,
{
    value.parse::<T>().map_err(|e| {
        let error: anyhow::Error = e.into();
        error.context(format!(r#"invalid {} "{}""#, what, value))
    })
}

fn create_cancellation_token(arg_matches: &ArgMatches<'_>) -> Result<CancellationToken> {
    let mut token = CancellationToken::default();
    if let Some(t) = arg_matches.value_of(ARG_TIMEOUT) {
        let seconds = parse_value::<f64>(t, "timeout")?;
        let timeout = Duration::try_from_secs_f64(seconds)
            .with_context(|| format!(r#"invalid timeout "{}""#, t))?;
        info!("the search is limited to {:?}", timeout);
        token = token.with_timeout(timeout);
    }
    if let Some(n) = arg_matches.value_of(ARG_NODE_LIMIT) {
        let node_limit = parse_value::<usize>(n, "node limit")?;
        info!("the search is limited to {} nodes", node_limit);
        token = token.with_node_limit(node_limit);
    }
    Ok(token)
}
