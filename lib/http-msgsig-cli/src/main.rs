use self::args::{ToolArgs, ToolSubcommand};
use clap::Parser;

mod args;
mod digest;
mod parse_input;
mod util;

fn main() -> miette::Result<()> {
    let args = ToolArgs::parse();
    match args.subcommand {
        ToolSubcommand::ParseInput(args) => parse_input::do_it(args.header.leak()),
        ToolSubcommand::Digest(args) => digest::do_it(&args.file),
    }
}
