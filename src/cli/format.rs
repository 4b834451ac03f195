//! Output format dispatch

/// Run the JSON expression or the human block depending on `--format`.
///
/// The JSON arm must evaluate to `Result<()>`; the human arm is a block
/// whose value is discarded.
macro_rules! output_by_format {
    ($format:expr, json => $json:expr, human => $human:block) => {
        match $format {
            $crate::cli::OutputFormat::Json => $json,
            $crate::cli::OutputFormat::Human => {
                $human;
                Ok(())
            }
        }
    };
}

pub(crate) use output_by_format;
