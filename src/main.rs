use clap::Parser;
use sledge::repl::Repl;
use sledge::{Config, Error, OptLevel, Session};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sledge")]
#[command(about = "A Lisp that compiles every expression to native code")]
#[command(version)]
struct Cli {
    /// Program to run; starts the REPL when neither this nor -e is given
    file: Option<PathBuf>,

    /// Evaluate an expression and print its value
    #[arg(short = 'e', long = "eval", value_name = "EXPR")]
    expr: Option<String>,

    /// Cranelift optimization level: none, speed or speed_and_size
    #[arg(long, value_name = "LEVEL", default_value_t = OptLevel::Speed)]
    opt_level: OptLevel,

    /// Directory that load, save and ls work in
    #[arg(long, value_name = "DIR", default_value = ".")]
    storage: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SLEDGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(err: &Error) {
    match err {
        Error::Read(err) => eprintln!("read error: {}", err),
        Error::Compile(err) => eprintln!("compile error: {}", err),
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let config = Config::default()
        .with_opt_level(cli.opt_level)
        .with_storage_root(cli.storage);
    let session = match Session::with_config(config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("could not start the compiler: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Some(file) = &cli.file {
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("{}: {}", file.display(), err);
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = session.eval_str(&source) {
            report(&err);
            return ExitCode::FAILURE;
        }
    }

    if let Some(expr) = &cli.expr {
        match session.eval_str(expr) {
            Ok(Some(value)) => println!("{}", value),
            Ok(None) => {}
            Err(err) => {
                report(&err);
                return ExitCode::FAILURE;
            }
        }
    }

    if cli.file.is_none() && cli.expr.is_none() {
        let result = Repl::new().and_then(|mut repl| repl.run(&session));
        if let Err(err) = result {
            eprintln!("repl: {}", err);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
