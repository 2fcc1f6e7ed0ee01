//! CLI entrypoint.

use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use metadoc::{Entity, ImportOptions, ImportedModule, import_module};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "METADOC_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// Output formats accepted by `--format`.
enum OutputFormat {
	/// One line per entity and member.
	Summary,
	/// The full import result as pretty-printed JSON.
	Json,
}

#[derive(Parser)]
#[command(name = "metadoc", version, about = "Extract documented types from a compiled module")]
struct Cli {
	/// Module metadata to import
	module: PathBuf,

	/// Comma-separated list of type names to import
	#[arg(short = 't', long)]
	types: Option<String>,

	/// Report inherited members as well as declared ones
	#[arg(short = 'i', long, default_value_t = false)]
	inherited: bool,

	/// Include private members
	#[arg(short = 'p', long, default_value_t = false)]
	private: bool,

	/// Do not merge the documentation sidecar
	#[arg(long, default_value_t = false, conflicts_with = "sidecar")]
	no_docs: bool,

	/// Documentation sidecar to read instead of the one next to the module
	#[arg(long)]
	sidecar: Option<PathBuf>,

	/// Copy description and category attributes
	#[arg(long, default_value_t = false)]
	description_attributes: bool,

	/// Keep documentation line breaks as written
	#[arg(long, default_value_t = false)]
	no_wrap: bool,

	/// Only report types, without their members
	#[arg(long, default_value_t = false)]
	skip_members: bool,

	/// Select the output format (`summary` or `json`)
	#[arg(short = 'f', long, value_enum, default_value = "summary")]
	format: OutputFormat,

	/// Disable ANSI colors in CLI output
	#[arg(long, default_value_t = false)]
	no_color: bool,
}

impl Cli {
	fn options(&self) -> ImportOptions {
		let mut options = ImportOptions::new()
			.with_inherited_members(self.inherited)
			.with_private_members(self.private)
			.with_documentation(!self.no_docs)
			.with_description_attributes(self.description_attributes)
			.with_word_wrap(!self.no_wrap)
			.with_skip_members(self.skip_members);
		if let Some(types) = self.types.as_deref() {
			options = options.with_type_filter(types);
		}
		if let Some(sidecar) = &self.sidecar {
			options = options.with_sidecar(sidecar);
		}
		options
	}
}

fn main() {
	init_logging();
	let cli = Cli::parse();

	if let Err(e) = run(cli) {
		eprintln!("{e}");
		process::exit(1);
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
	let imported = import_module(&cli.module, cli.options())?;

	if cli.format == OutputFormat::Json {
		println!("{}", imported.to_json()?);
		return Ok(());
	}

	if imported.entities.is_empty() {
		println!("No types found.");
	} else {
		print!("{}", render_summary(&imported, should_color_output(&cli)));
	}
	for warning in &imported.warnings {
		eprintln!("warning: {warning}");
	}
	Ok(())
}

/// Plain listing of entities and their members.
fn render_summary(imported: &ImportedModule, color: bool) -> String {
	let mut buffer = String::new();
	for entity in &imported.entities {
		let header = entity.syntax.clone();
		if color {
			buffer.push_str(&header.bold().to_string());
		} else {
			buffer.push_str(&header);
		}
		buffer.push('\n');
		push_summary_line(&mut buffer, &entity.docs.summary, color);
		render_members(&mut buffer, entity, color);
		buffer.push('\n');
	}
	buffer
}

fn render_members(buffer: &mut String, entity: &Entity, color: bool) {
	let members = entity
		.methods
		.iter()
		.map(|method| (method.syntax.as_str(), method.docs.docs.summary.as_str()))
		.chain(
			entity
				.properties
				.iter()
				.chain(&entity.fields)
				.map(|property| (property.syntax.as_str(), property.docs.docs.summary.as_str())),
		)
		.chain(
			entity
				.events
				.iter()
				.map(|event| (event.syntax.as_str(), event.docs.summary.as_str())),
		);

	for (syntax, summary) in members {
		buffer.push_str("    ");
		buffer.push_str(syntax);
		buffer.push('\n');
		if !summary.is_empty() {
			buffer.push_str("    ");
			push_summary_line(buffer, summary, color);
		}
	}
}

fn push_summary_line(buffer: &mut String, summary: &str, color: bool) {
	let Some(first) = summary.lines().next().filter(|line| !line.is_empty()) else {
		return;
	};
	let line = format!("    {first}");
	if color {
		buffer.push_str(&line.dimmed().to_string());
	} else {
		buffer.push_str(&line);
	}
	buffer.push('\n');
}

fn should_color_output(cli: &Cli) -> bool {
	if cli.no_color {
		return false;
	}
	if std::env::var_os("NO_COLOR").is_some() {
		return false;
	}
	if std::env::var("TERM").ok().as_deref() == Some("dumb") {
		return false;
	}
	std::io::stdout().is_terminal()
}
