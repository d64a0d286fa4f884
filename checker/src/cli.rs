use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContentModel {
    /// Print nothing
    None,
    /// Print properties rendered as an element choice
    Choices,
    /// Print the content model of every bean type
    All,
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[arg(help = "The binding document")]
    pub input: String,

    #[arg(long, help = "Allow a XML Document Type Definition (DTD) to occur")]
    pub allow_dtd: bool,

    #[arg(
        long,
        value_enum,
        default_value = "none",
        help = "Print content models of valid properties or bean types"
    )]
    pub content_model: ContentModel,
}
