//! ceno-errpage - inspect CENO error codes from the command line.
//!
//! Classifies codes, dumps the catalog, renders the error page a code would
//! produce, and sends decode-error reports to a bridge endpoint.

use anyhow::{Context, Result, bail};
use ceno_errors::dispatch::{Handler, lookup_cc, lookup_lcs};
use ceno_errors::errors::ErrorEntry;
use ceno_errors::logging::{LogFormat, init_logging};
use ceno_errors::{
    ErrorCode, ErrorDispatcher, ErrorKind, ErrorOrigin, ErrorPageConfig, ErrorState,
    RequestContext, Reporter,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "ceno-errpage")]
#[command(author, version, about = "CENO error page and failure report tool")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe what an error code means and how it is handled
    Classify {
        code: u32,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// List every known error code as JSON
    Catalog,

    /// Render the page a failing request would get and print it
    Render {
        #[arg(short, long)]
        code: u32,

        #[arg(short, long, default_value = "")]
        message: String,

        /// URL the browser asked for
        #[arg(short, long, default_value = "http://localhost/")]
        url: String,

        /// Registry the error is dispatched through
        #[arg(long, value_enum)]
        origin: Option<RegistryArg>,

        /// Override CENO_VIEWS_DIR
        #[arg(long)]
        views_dir: Option<PathBuf>,

        /// Override CENOLANG
        #[arg(long)]
        lang: Option<String>,
    },

    /// Send a decode-error report
    Report {
        #[arg(short, long)]
        url: String,

        #[arg(short, long)]
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RegistryArg {
    Cc,
    Lcs,
}

impl RegistryArg {
    /// Registry matching the code's range; CC for unclassified codes.
    fn for_code(code: ErrorCode) -> Self {
        if code.is_cache_server_error() {
            Self::Lcs
        } else {
            Self::Cc
        }
    }
}

#[derive(Debug, Serialize)]
struct Classification {
    code: ErrorCode,
    origin: ErrorOrigin,
    symbol: Option<&'static str>,
    description: Option<&'static str>,
    advice_key: Option<&'static str>,
    auto_refresh: bool,
    cc_handler: Option<Handler>,
    lcs_handler: Option<Handler>,
}

impl Classification {
    fn of(code: ErrorCode) -> Self {
        let kind = code.kind();
        Self {
            code,
            origin: code.origin(),
            symbol: kind.map(|k| k.symbol()),
            description: kind.map(|k| k.description()),
            advice_key: code.advice_key(),
            auto_refresh: code.should_refresh(),
            cc_handler: lookup_cc(code),
            lcs_handler: lookup_lcs(code),
        }
    }

    fn print_text(&self) {
        println!("code:         {}", self.code);
        println!("origin:       {}", self.origin.name());
        match (self.symbol, self.description) {
            (Some(symbol), Some(description)) => {
                println!("kind:         {symbol}");
                println!("description:  {description}");
            }
            _ => println!("kind:         (unrecognized)"),
        }
        println!("advice:       {}", self.advice_key.unwrap_or("(none)"));
        println!("auto-refresh: {}", self.auto_refresh);
        let handler = |h: Option<Handler>| h.map_or_else(|| "(none)".to_string(), |h| h.to_string());
        println!("cc handler:   {}", handler(self.cc_handler));
        println!("lcs handler:  {}", handler(self.lcs_handler));
    }
}

fn load_config() -> ErrorPageConfig {
    let (config, errors) = ErrorPageConfig::from_env();
    for err in errors {
        warn!("{err}");
    }
    config
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_logging(cli.verbose, format);

    match cli.command {
        Commands::Classify { code, json } => {
            let classification = Classification::of(ErrorCode::new(code));
            if json {
                println!("{}", serde_json::to_string_pretty(&classification)?);
            } else {
                classification.print_text();
            }
        }
        Commands::Catalog => {
            let entries: Vec<ErrorEntry> = ErrorKind::all().iter().map(ErrorKind::entry).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Commands::Render {
            code,
            message,
            url,
            origin,
            views_dir,
            lang,
        } => {
            let mut config = load_config();
            if let Some(dir) = views_dir {
                config = config.with_views_dir(dir);
            }
            if let Some(lang) = lang {
                config = config.with_lang(&lang);
            }

            let code = ErrorCode::new(code);
            let registry = origin.unwrap_or_else(|| RegistryArg::for_code(code));
            let request = RequestContext::new(
                url.parse()
                    .with_context(|| format!("invalid request URL: {url}"))?,
            );
            debug!(code = %code, registry = ?registry, "Rendering error page");

            let dispatcher = ErrorDispatcher::from_config(&config);
            let mut state = ErrorState::new(request);
            let handled = match registry {
                RegistryArg::Cc => dispatcher.handle_cc_error(code, &message, &mut state),
                RegistryArg::Lcs => dispatcher.handle_lcs_error(code, &message, &mut state),
            };
            if !handled {
                warn!(code = %code, "Handler reported failure");
            }
            print!("{}", state.into_page().body());
        }
        Commands::Report { url, message } => {
            let config = load_config();
            let reporter = Reporter::new(config.report_timeout);
            if !reporter.report_decode_error(Some(&url), &message) {
                bail!("report to {url} was not accepted");
            }
            println!("report accepted by {url}");
        }
    }

    Ok(())
}
