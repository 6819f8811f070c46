use clap::Parser;
use miette::Result;
use scriptmap::cli::{Cli, Commands};
use scriptmap::logging::init_logging;
use scriptmap::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let printer = Printer::new();

    match cli.command {
        Commands::List(args) => scriptmap::cli::list::run(args, &printer)?,
        Commands::Show(args) => scriptmap::cli::show::run(args, &printer)?,
        Commands::Check(args) => scriptmap::cli::check::run(args, &printer)?,
        Commands::Init(args) => scriptmap::cli::init::run(args, &printer)?,
        Commands::Completions(args) => scriptmap::cli::completions::run(args)?,
    }

    Ok(())
}
