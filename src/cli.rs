use clap::error::ErrorKind;
use clap::{ArgGroup, Parser};
use huf_compress::error::HufError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "huf", about = "Huffman file compressor", version)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["compress", "decompress", "inspect"])
))]
pub struct Cli {
    /// Compress INPUT into OUTPUT
    #[arg(short = 'c', long)]
    pub compress: bool,

    /// Decompress INPUT into OUTPUT
    #[arg(short = 'd', long)]
    pub decompress: bool,

    /// Describe the header and tree of a compressed INPUT as JSON
    /// (written to OUTPUT when given, otherwise stdout)
    #[arg(short = 'i', long)]
    pub inspect: bool,

    /// File to read
    pub input: PathBuf,

    /// File to write
    #[arg(required_unless_present = "inspect")]
    pub output: Option<PathBuf>,

    /// Path to a JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the operation report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
    Inspect,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.compress {
            Mode::Compress
        } else if self.decompress {
            Mode::Decompress
        } else {
            Mode::Inspect
        }
    }
}

/// Classify a failed parse: absent arguments are a bad call, anything else
/// is an option the program does not understand.
pub fn parse_error(e: &clap::Error) -> HufError {
    match e.kind() {
        ErrorKind::MissingRequiredArgument
        | ErrorKind::TooFewValues
        | ErrorKind::WrongNumberOfValues => HufError::InvalidArguments(e.kind().to_string()),
        kind => HufError::UnknownOption(kind.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_args() {
        let cli = Cli::try_parse_from(["huf", "-c", "in.txt", "out.huf"]).unwrap();
        assert_eq!(cli.mode(), Mode::Compress);
        assert_eq!(cli.input, PathBuf::from("in.txt"));
        assert_eq!(cli.output, Some(PathBuf::from("out.huf")));
    }

    #[test]
    fn test_inspect_without_output() {
        let cli = Cli::try_parse_from(["huf", "-i", "out.huf"]).unwrap();
        assert_eq!(cli.mode(), Mode::Inspect);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_mode_required_and_exclusive() {
        let missing = Cli::try_parse_from(["huf", "a", "b"]).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingRequiredArgument);

        let both = Cli::try_parse_from(["huf", "-c", "-d", "a", "b"]).unwrap_err();
        assert_eq!(both.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_decompress_needs_output() {
        assert!(Cli::try_parse_from(["huf", "-d", "a"]).is_err());
    }

    #[test]
    fn test_unknown_flag() {
        let err = Cli::try_parse_from(["huf", "-x", "a", "b"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_missing_arguments_are_invalid_arguments() {
        for args in [&["huf", "in.txt"][..], &["huf", "-c", "in.txt"][..], &["huf", "a", "b"][..]] {
            let err = Cli::try_parse_from(args).unwrap_err();
            let kind = parse_error(&err);
            assert!(matches!(kind, HufError::InvalidArguments(_)), "{args:?}");
            assert_eq!(kind.exit_code(), 5);
        }
    }

    #[test]
    fn test_unknown_and_conflicting_flags_are_unknown_option() {
        for args in [&["huf", "-x", "a", "b"][..], &["huf", "-c", "-d", "a", "b"][..]] {
            let err = Cli::try_parse_from(args).unwrap_err();
            let kind = parse_error(&err);
            assert!(matches!(kind, HufError::UnknownOption(_)), "{args:?}");
            assert_eq!(kind.exit_code(), 8);
        }
    }
}
