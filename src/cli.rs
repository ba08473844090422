use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "zipspy")]
#[command(version)]
#[command(about = "Find a ZIP archive embedded anywhere in a file and list its entries", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipspy photo.jpg                 list the archive appended to photo.jpg\n  \
  zipspy --all-copies bundle.bin   list every archive found in bundle.bin\n  \
  zipspy --json https://example.com/setup.exe   describe a remote file as JSON")]
pub struct Cli {
    /// File path or HTTP URL to inspect
    #[arg(value_name = "PATH")]
    pub file: String,

    /// Print a JSON description instead of plain names
    #[arg(long)]
    pub json: bool,

    /// Report every embedded archive, not only the last one
    #[arg(long)]
    pub all_copies: bool,

    /// More log output on stderr (-vv => trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Do not print the "no zip archive found" message
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter for the chosen verbosity, used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "zipspy=warn",
            1 => "zipspy=debug",
            _ => "zipspy=trace",
        }
    }
}
