use std::{
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
    str::FromStr,
    time::Duration,
};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::Level;

use crate::{
    bootstrap::Dispatch,
    client::{default_timeout, HttpClient},
    config::{CliConfig, Color},
    document::{DocumentId, DocumentOperation, OperationKind},
    error::{VespaError, VespaResult},
    invocation::Invocation,
    outcome::Outcome,
    query::Query,
    report, status,
    target::{ServiceKind, Target},
};

impl<O: Write, E: Write> Dispatch for Invocation<O, E> {
    async fn dispatch(mut self) -> ExitCode {
        execute_with(&mut self).await.exit_code()
    }
}

/// Parses the arguments of `invocation`, runs the command and decides the exit status.
///
/// Command output and errors go to the streams of `invocation`. Logs enabled by `-v` go to the process stderr,
/// since the subscriber is installed once per process.
pub async fn execute_with<O: Write, E: Write>(invocation: &mut Invocation<O, E>) -> Outcome {
    let cmd = match Cmd::try_parse_from(&invocation.args) {
        Ok(cmd) => cmd,
        Err(err) => return usage(invocation, err),
    };
    init_tracing(cmd.verbose);
    if let Some(color) = cmd.color {
        report::apply_color(color);
    }

    match cmd.run(invocation).await {
        Ok(()) => Outcome::Success,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            let _ = report::error(&mut invocation.stderr, &err);
            Outcome::Failure
        }
    }
}

fn usage<O: Write, E: Write>(invocation: &mut Invocation<O, E>, err: clap::Error) -> Outcome {
    let rendered = err.render();
    let _ = if err.use_stderr() {
        write!(invocation.stderr, "{}", rendered)
    } else {
        write!(invocation.stdout, "{}", rendered)
    };
    match err.exit_code() {
        0 => Outcome::Success,
        _ => Outcome::Usage,
    }
}

pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // a subscriber installed by an earlier dispatch in the same process stays in place
    let _ = tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).with_target(false).try_init();
}

#[derive(Parser, Debug, PartialEq, Eq)]
#[clap(name = "vespa", version, about, arg_required_else_help = true)]
pub struct Cmd {
    #[clap(subcommand)]
    pub subcommand: SubCommands,

    /// target to run against, `local` or an http(s) url of the container
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// whether to colorize output
    #[arg(long, global = true, value_enum)]
    pub color: Option<Color>,

    /// print only the essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// log more, repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum SubCommands {
    /// show the version of this client
    Version,

    /// manage persistent values of global flags
    #[clap(subcommand)]
    Config(ConfigCommand),

    /// verify that a service is ready to use
    Status(Status),

    /// issue a query to the container
    Query(QueryArgs),

    /// issue a single document operation to the container
    #[clap(subcommand)]
    Document(DocumentCommand),
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ConfigCommand {
    /// show one or all options
    Get { option: Option<String> },
    /// persist an option
    Set { option: String, value: String },
    /// remove a persisted option
    Unset { option: String },
}

#[derive(Debug, Parser, PartialEq, Eq, Default)]
pub struct Status {
    /// service to check
    #[arg(value_enum, default_value_t)]
    pub service: StatusService,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusService {
    /// query and document API
    #[default]
    Container,
    /// deploy API
    Deploy,
}
impl From<StatusService> for ServiceKind {
    fn from(service: StatusService) -> Self {
        match service {
            StatusService::Container => ServiceKind::Container,
            StatusService::Deploy => ServiceKind::Deploy,
        }
    }
}

pub const MAX_QUERY_TIMEOUT: u64 = 24 * 60 * 60;

#[derive(Debug, Parser, PartialEq, Eq)]
pub struct QueryArgs {
    /// yql, and `key=value` request parameters
    #[arg(required = true, num_args = 1..)]
    pub args: Vec<String>,

    /// query timeout in seconds, unless a `timeout` parameter is given
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(..=MAX_QUERY_TIMEOUT))]
    pub timeout: u64,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum DocumentCommand {
    /// write a document, `vespa document put [id] <file>`
    Put {
        #[arg(value_name = "ID_OR_FILE")]
        first: String,
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// update a document, `vespa document update [id] <file>`
    Update {
        #[arg(value_name = "ID_OR_FILE")]
        first: String,
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// remove a document given by id or by a file containing a remove operation
    Remove {
        #[arg(value_name = "ID_OR_FILE")]
        id_or_file: String,
    },
    /// print a document
    Get { id: String },
}

/// Flags layered over the persisted config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub home: Option<PathBuf>,
    pub config: CliConfig,
    pub target: Option<String>,
    pub quiet: bool,
}
impl Settings {
    pub fn target(&self) -> VespaResult<Target> {
        match &self.target {
            Some(target) => Target::from_str(target),
            None => self.config.target(),
        }
    }

    pub fn home(&self) -> VespaResult<&Path> {
        self.home.as_deref().ok_or(VespaError::NoHomeDirectory)
    }
}

impl Cmd {
    pub fn settings<O, E>(&self, invocation: &Invocation<O, E>) -> VespaResult<Settings> {
        let home = CliConfig::home(&invocation.env).ok();
        let config = match &home {
            Some(home) => CliConfig::read(home)?,
            None => CliConfig::default(),
        };
        if self.color.is_none() {
            report::apply_color(config.color.unwrap_or_default());
        }
        let quiet = self.quiet || config.quiet.unwrap_or_default();
        Ok(Settings { home, config, target: self.target.clone(), quiet })
    }

    pub async fn run<O: Write, E: Write>(&self, invocation: &mut Invocation<O, E>) -> VespaResult<()> {
        match &self.subcommand {
            SubCommands::Version => {
                writeln!(invocation.stdout, "vespa version {}", env!("CARGO_PKG_VERSION"))?;
                Ok(())
            }
            SubCommands::Config(config) => {
                let settings = self.settings(invocation)?;
                config.run(&settings, &mut invocation.stdout)
            }
            SubCommands::Status(Status { service }) => {
                let settings = self.settings(invocation)?;
                let kind = ServiceKind::from(*service);
                let mut client = HttpClient::new(default_timeout())?;
                let url = status::check(&mut client, &settings.target()?, kind).await?;
                let message = format!("{} at {} is ready", kind, url.as_str().trim_end_matches('/'));
                Ok(report::success(&mut invocation.stdout, settings.quiet, message)?)
            }
            SubCommands::Query(QueryArgs { args, timeout }) => {
                let settings = self.settings(invocation)?;
                let query = Query::from_args(args, Some(Duration::from_secs(*timeout)))?;
                let client_timeout = Duration::from_secs(timeout.saturating_add(5));
                let mut client = HttpClient::new(default_timeout().max(client_timeout))?;
                let body = query.run(&mut client, &settings.target()?).await?;
                Ok(report::data(&mut invocation.stdout, &body)?)
            }
            SubCommands::Document(document) => {
                let settings = self.settings(invocation)?;
                let operation = document.operation()?;
                let mut client = HttpClient::new(default_timeout())?;
                let body = operation.send(&mut client, &settings.target()?).await?;
                match operation.kind {
                    OperationKind::Get => report::data(&mut invocation.stdout, &body)?,
                    kind => {
                        let message = format!("{} {}", kind, operation.id);
                        report::success(&mut invocation.stdout, settings.quiet, message)?
                    }
                }
                Ok(())
            }
        }
    }
}

impl ConfigCommand {
    pub fn run<W: Write>(&self, settings: &Settings, w: &mut W) -> VespaResult<()> {
        let mut config = settings.config.clone();
        match self {
            Self::Get { option: Some(option) } => print_option(w, option, config.get(option)?)?,
            Self::Get { option: None } => {
                for option in CliConfig::OPTIONS {
                    print_option(w, option, config.get(option)?)?;
                }
            }
            Self::Set { option, value } => {
                config.set(option, value)?;
                config.write(settings.home()?)?;
                report::success(w, settings.quiet, format!("set {} to {}", option, value))?;
            }
            Self::Unset { option } => {
                config.unset(option)?;
                config.write(settings.home()?)?;
                report::success(w, settings.quiet, format!("unset {}", option))?;
            }
        }
        Ok(())
    }
}

fn print_option<W: Write>(w: &mut W, option: &str, value: Option<String>) -> std::io::Result<()> {
    writeln!(w, "{} = {}", option, value.as_deref().unwrap_or("<unset>"))
}

impl DocumentCommand {
    pub fn operation(&self) -> VespaResult<DocumentOperation> {
        match self {
            Self::Put { first, file } => Self::read(OperationKind::Put, first, file.as_deref()),
            Self::Update { first, file } => Self::read(OperationKind::Update, first, file.as_deref()),
            Self::Remove { id_or_file } if id_or_file.starts_with("id:") => {
                Ok(DocumentOperation::new(OperationKind::Remove, id_or_file.parse()?))
            }
            Self::Remove { id_or_file } => DocumentOperation::read(OperationKind::Remove, None, id_or_file),
            Self::Get { id } => Ok(DocumentOperation::new(OperationKind::Get, id.parse()?)),
        }
    }

    fn read(kind: OperationKind, first: &str, file: Option<&Path>) -> VespaResult<DocumentOperation> {
        match file {
            Some(file) => DocumentOperation::read(kind, Some(DocumentId::from_str(first)?), file),
            None => DocumentOperation::read(kind, None, first),
        }
    }
}
