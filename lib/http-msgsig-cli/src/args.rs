use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ParseInputArgs {
    /// `Signature-Input` header value, either the complete header or a single unlabeled member
    pub header: String,
}

#[derive(Args)]
pub struct DigestArgs {
    /// File to calculate the digest of
    pub file: PathBuf,
}

#[derive(Subcommand)]
pub enum ToolSubcommand {
    /// Parse the `Signature-Input` header and report any format errors
    ParseInput(ParseInputArgs),

    /// Print the `Digest` header value for the contents of a file
    Digest(DigestArgs),
}

#[derive(Parser)]
#[command(about, version)]
pub struct ToolArgs {
    #[clap(subcommand)]
    pub subcommand: ToolSubcommand,
}
