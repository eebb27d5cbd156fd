//! # Datalens command line
//!
//! ```text
//! main()
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Initialize logging (console, optionally rotating files)
//!   └─> Run the command on a Tokio runtime
//! ```
//!
//! ```bash
//! datalens profile --file rows.json
//! datalens validate --file rows.json --semantic
//! datalens ask --file rows.json --question "Which region sells most?"
//! datalens config --model gpt-4o-mini --timeout-secs 20
//! ```

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;
use datalens::logging;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if cli.log_to_file {
        logging::init()?;
    } else {
        logging::init_console()?;
    }

    // Network calls (semantic validation, questions) are async.
    tokio::runtime::Runtime::new()?.block_on(cli::run_command(cli.command))
}
