//! Interactive comparison session on stdin.

use std::io::Write;
use std::str::FromStr;

use anyhow::Context;
use clap::Args;
use pricematch_compare::{ControllerState, Event, FormAction, Runtime};
use pricematch_core::pricing::{format_rand, parse_price};
use pricematch_core::{AppConfig, MainField, MainRecord, SourcesFile};
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::TerminalRenderer;

const HELP: &str = "\
commands:
  search <term>              search every source
  select <source> <id>       select a candidate
  clear <source>             clear a source's selection
  price <value>              set the main price
  set <field> <value>        set a main field (name, description, brand, category, price, barcode)
  copy <source> <field>      copy a field from a selected product
  copy-price [percent]       copy the average or selected price, adjusted by percent
  adjust <base> <percent>    set the main price to base adjusted by percent
  save | no | skip           submit the record
  revert                     restore the loaded values
  status                     show the current comparison
  quit";

/// The record to curate, given on the command line.
#[derive(Debug, Args)]
pub(crate) struct SessionArgs {
    #[arg(long)]
    pub(crate) sku: String,
    #[arg(long, default_value = "")]
    pub(crate) name: String,
    #[arg(long, default_value = "")]
    pub(crate) description: String,
    #[arg(long, default_value = "")]
    pub(crate) brand: String,
    #[arg(long, default_value = "")]
    pub(crate) category: String,
    #[arg(long)]
    pub(crate) price: Option<String>,
    #[arg(long, default_value = "")]
    pub(crate) barcode: String,
}

impl SessionArgs {
    pub(crate) fn into_record(self) -> anyhow::Result<MainRecord> {
        let price = match self.price.as_deref() {
            Some(raw) => parse_price(raw).with_context(|| format!("invalid --price '{raw}'"))?,
            None => Decimal::ZERO,
        };
        Ok(MainRecord {
            sku: self.sku,
            product_name: self.name,
            description: self.description,
            brand: self.brand,
            category: self.category,
            price,
            barcode: self.barcode.trim().to_string(),
        })
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SessionCommand {
    Search(String),
    Select { source: String, identifier: String },
    Clear(String),
    Set { field: MainField, value: String },
    Copy { source: String, field: MainField },
    CopyPrice(Option<Decimal>),
    Adjust { base: Decimal, percentage: Decimal },
    Submit(FormAction),
    Revert,
    Status,
    Help,
    Quit,
}

impl SessionCommand {
    /// The controller event for this command; `None` for session-local ones.
    pub(crate) fn into_event(self) -> Option<Event> {
        match self {
            SessionCommand::Search(term) => Some(Event::Search(term)),
            SessionCommand::Select { source, identifier } => {
                Some(Event::Select { source, identifier })
            }
            SessionCommand::Clear(source) => Some(Event::Select {
                source,
                identifier: String::new(),
            }),
            SessionCommand::Set { field, value } => Some(Event::EditField { field, value }),
            SessionCommand::Copy { source, field } => Some(Event::CopyField { source, field }),
            SessionCommand::CopyPrice(percentage) => Some(Event::CopyPrice { percentage }),
            SessionCommand::Adjust { base, percentage } => {
                Some(Event::AdjustPrice { base, percentage })
            }
            SessionCommand::Submit(action) => Some(Event::Submit(action)),
            SessionCommand::Revert => Some(Event::Revert),
            SessionCommand::Status | SessionCommand::Help | SessionCommand::Quit => None,
        }
    }
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub(crate) fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" => SessionCommand::Search(rest.to_string()),
        "select" => {
            let (source, identifier) = two_args(rest, "select <source> <id>")?;
            SessionCommand::Select { source, identifier }
        }
        "clear" => SessionCommand::Clear(one_arg(rest, "clear <source>")?),
        "price" => SessionCommand::Set {
            field: MainField::Price,
            value: one_arg(rest, "price <value>")?,
        },
        "set" => {
            let (field, value) = two_args(rest, "set <field> <value>")?;
            SessionCommand::Set {
                field: MainField::from_str(&field)?,
                value,
            }
        }
        "copy" => {
            let (source, field) = two_args(rest, "copy <source> <field>")?;
            SessionCommand::Copy {
                source,
                field: MainField::from_str(&field)?,
            }
        }
        "copy-price" => SessionCommand::CopyPrice(if rest.is_empty() {
            None
        } else {
            Some(percentage(rest)?)
        }),
        "adjust" => {
            let (base, pct) = two_args(rest, "adjust <base> <percent>")?;
            SessionCommand::Adjust {
                base: parse_price(&base).ok_or_else(|| format!("invalid price '{base}'"))?,
                percentage: percentage(&pct)?,
            }
        }
        "save" => SessionCommand::Submit(FormAction::Yes),
        "no" => SessionCommand::Submit(FormAction::No),
        "skip" => SessionCommand::Submit(FormAction::Skip),
        "revert" => SessionCommand::Revert,
        "status" => SessionCommand::Status,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn one_arg(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        return Err(format!("usage: {usage}"));
    }
    Ok(rest.to_string())
}

/// Splits off the first word; the remainder is the second argument verbatim.
fn two_args(rest: &str, usage: &str) -> Result<(String, String), String> {
    match rest.split_once(char::is_whitespace) {
        Some((a, b)) if !b.trim().is_empty() => Ok((a.to_string(), b.trim().to_string())),
        _ => Err(format!("usage: {usage}")),
    }
}

fn percentage(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim().trim_end_matches('%'))
        .map_err(|_| format!("invalid percentage '{raw}'"))
}

/// Runs the session until `quit` or end of input. Each command's requests are
/// settled before the next prompt.
pub(crate) async fn run(
    config: &AppConfig,
    sources: &SourcesFile,
    args: SessionArgs,
) -> anyhow::Result<()> {
    let record = args.into_record()?;
    let renderer = TerminalRenderer::new(std::io::stdout(), sources);
    let mut runtime = Runtime::from_config(config, sources, renderer)?;
    tracing::info!(sku = %record.sku, "starting comparison session");

    runtime.dispatch(Event::Load(record));
    runtime.settle().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("! {message}");
                continue;
            }
        };
        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Status => print!("{}", format_status(runtime.state())),
            other => {
                if let Some(event) = other.into_event() {
                    runtime.dispatch(event);
                    runtime.settle().await;
                }
            }
        }
    }

    if runtime.state().is_dirty() {
        println!("Unsaved changes discarded.");
    }
    Ok(())
}

/// A summary of the main record and every source's selection.
pub(crate) fn format_status(state: &ControllerState) -> String {
    let main = state.main();
    let mut out = format!("record {}\n", main.sku);
    for field in MainField::ALL {
        out.push_str(&format!("  {field:<12} {}\n", main.get(field)));
    }

    let differences = state.differences();
    for source in state.sources() {
        let selected = state.selected(&source.name).map_or_else(
            || "-".to_string(),
            |p| {
                format!(
                    "{} {}",
                    p.name.as_deref().unwrap_or(&p.identifier),
                    format_rand(p.price)
                )
            },
        );
        let diff = differences
            .iter()
            .find(|(name, _)| *name == source.name)
            .and_then(|(_, d)| d.as_ref())
            .map(|d| format!(" [{}]", d.display()))
            .unwrap_or_default();
        out.push_str(&format!("{:<12} {selected}{diff}\n", source.label));
    }

    if let Some(average) = state.average() {
        out.push_str(&format!("average      {}\n", format_rand(average)));
    }
    if state.is_dirty() {
        out.push_str("unsaved changes\n");
    }
    out
}
