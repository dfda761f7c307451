use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payment_form::application::controller::FormEvent;
use payment_form::application::session::FormSession;
use payment_form::config::{DEFAULT_IBAN_ENDPOINT, FormConfig};
use payment_form::domain::ports::AccountLookupRef;
use payment_form::infrastructure::http::HttpIbanService;
use payment_form::infrastructure::in_memory::{InMemoryAccountLookup, InMemoryPaymentSink};
use payment_form::interfaces::csv::account_reader::AccountReader;
use payment_form::interfaces::csv::payment_writer::PaymentWriter;
use payment_form::interfaces::script::{ScriptReader, ScriptStep};
use payment_form::interfaces::view::FormView;
use payment_form::logging::init_tracing;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Form script: one `<field> <value>`, `submit` or `wait` per line
    input: PathBuf,

    /// Payer account table as CSV (`id,iban,balance`). Defaults to the demo accounts.
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Remote IBAN validation endpoint
    #[arg(long, default_value = DEFAULT_IBAN_ENDPOINT)]
    iban_endpoint: String,

    /// Timeout of a single IBAN check, in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Currency label shown next to balances
    #[arg(long, default_value = "EUR")]
    currency: String,

    /// Block submission unless the payee IBAN was confirmed valid
    #[arg(long)]
    require_valid_iban: bool,

    /// Print the final form view as JSON after the accepted payments
    #[arg(long)]
    view: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = FormConfig {
        iban_endpoint: cli.iban_endpoint,
        validation_timeout: Duration::from_millis(cli.timeout_ms),
        currency: cli.currency,
        require_valid_iban: cli.require_valid_iban,
        ..FormConfig::default()
    };

    let accounts: AccountLookupRef = match cli.accounts {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            Arc::new(AccountReader::new(file).into_lookup().into_diagnostic()?)
        }
        None => Arc::new(InMemoryAccountLookup::with_defaults()),
    };

    let sink = InMemoryPaymentSink::new();
    let mut session = FormSession::open(
        accounts,
        Arc::new(HttpIbanService::new(config.iban_endpoint.clone())),
        Arc::new(sink.clone()),
        &config,
    );

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = ScriptReader::new(BufReader::new(file));
    for step in reader.steps() {
        match step {
            Ok(ScriptStep::Wait) => session.settle().await,
            Ok(ScriptStep::Event(FormEvent::SubmitRequested)) => {
                // let the payee check land so strict mode sees its verdict
                session.settle().await;
                session.dispatch(FormEvent::SubmitRequested);
                for error in session.state().errors.iter() {
                    eprintln!("Submission blocked: {}", error);
                }
                session.settle().await;
            }
            Ok(ScriptStep::Event(event)) => session.dispatch(event),
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }
    session.settle().await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    PaymentWriter::new(&mut out)
        .write_payments(&sink.payments().await)
        .into_diagnostic()?;

    if cli.view {
        let view = FormView::render(
            session.state(),
            session.controller().accounts(),
            &config.currency,
        );
        let json = serde_json::to_string_pretty(&view).into_diagnostic()?;
        writeln!(out, "{json}").into_diagnostic()?;
    }

    Ok(())
}
