use clap::ValueEnum;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Readable text
    #[default]
    Human,
    /// Pretty-printed JSON on stdout; errors as a JSON envelope on stderr
    Json,
}
