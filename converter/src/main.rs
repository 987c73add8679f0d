//! products-import CLI - bulk-edit sheet to products table CSV
//!
//! ```bash
//! products-import                          # Convert with the default file names
//! products-import convert --schema catalog # Write name,category,unit_price,description
//! products-import parse -o records.json    # Dump accepted records as JSON
//! ```

use clap::{Args, Parser, Subcommand};
use products_import::logs::{log_error, LOGGER};
use products_import::{
    convert_file, run, ConvertOptions, OutputSchema, DEFAULT_INPUT, DEFAULT_OUTPUT,
    DEFAULT_PREVIEW, PREAMBLE_LINES,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "products-import")]
#[command(about = "Convert the product bulk-edit sheet into a products import CSV", long_about = None)]
struct Cli {
    /// Hide progress logs
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the sheet and write the import CSV (default)
    Convert(ConvertArgs),

    /// Read and filter the sheet, output accepted records as JSON
    Parse {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// Spreadsheet export to read
    #[arg(short, long, env = "PRODUCTS_IMPORT_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output layout: products-table or catalog
    #[arg(short, long, env = "PRODUCTS_IMPORT_SCHEMA", default_value = "products-table")]
    schema: OutputSchema,

    /// Preamble records above the data rows
    #[arg(long, default_value_t = PREAMBLE_LINES)]
    skip_lines: usize,
}

#[derive(Parser, Clone)]
struct ConvertArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Import CSV to create or overwrite
    #[arg(short, long, env = "PRODUCTS_IMPORT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Number of records to list after converting
    #[arg(long, default_value_t = DEFAULT_PREVIEW)]
    preview: usize,
}

impl From<ConvertArgs> for ConvertOptions {
    fn from(args: ConvertArgs) -> Self {
        Self {
            input: args.source.input,
            output: args.output,
            schema: args.source.schema,
            skip_lines: args.source.skip_lines,
            preview: args.preview,
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);

    let command = cli.into_command().unwrap_or_else(|e| e.exit());

    let result = match command {
        Commands::Convert(args) => cmd_convert(args.into()),

        Commands::Parse { source, output } => cmd_parse(&source, output.as_deref()),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

impl Cli {
    /// The chosen subcommand; none means `convert` with defaults and env overrides.
    fn into_command(self) -> Result<Commands, clap::Error> {
        match self.command {
            Some(command) => Ok(command),
            None => ConvertArgs::try_parse_from(["products-import"]).map(Commands::Convert),
        }
    }
}

fn cmd_convert(options: ConvertOptions) -> Result<(), Box<dyn std::error::Error>> {
    let result = run(&options)?;

    println!("{}", result.summary_line());
    println!();
    for line in result.preview_lines(options.preview) {
        println!("{}", line);
    }

    Ok(())
}

fn cmd_parse(source: &SourceArgs, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let result = convert_file(&source.input, source.schema, source.skip_lines)?;

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
