use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pokegrid",
    version,
    about = "terminal catalog browser for the PokeAPI",
    long_about = "pokegrid browses the PokeAPI catalog as a grid of cards: it loads records in batches as you scroll, filters by type, searches the loaded cards and opens a detail view.\n\nExamples:\n  pokegrid\n  pokegrid --category Fire --once -o fire.html\n  pokegrid --config ~/.pokegrid/config.yml -v\n\nTip: Use --init-config to write a commented config file with the defaults."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered grid to a file on exit (or with `export`)."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json or html (inferred from the file extension by default)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.pokegrid/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write the default config file if it does not exist, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'a',
        long = "api",
        visible_alias = "api-url",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Base URL of the API (default https://pokeapi.co/api/v2)."
    )]
    pub api_url: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Route requests through a proxy."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'r',
        long = "rt",
        visible_alias = "rate",
        value_name = "RPS",
        help_heading = "HTTP",
        help = "Request rate limit (requests per second, 0 = unlimited)."
    )]
    pub rate: Option<u32>,

    #[arg(
        short = 'l',
        long = "lang",
        visible_alias = "language",
        value_name = "TAG",
        help_heading = "HTTP",
        help = "Language tag for species text (default en)."
    )]
    pub language: Option<String>,

    #[arg(
        short = 'b',
        long = "bs",
        visible_alias = "batch-size",
        value_name = "N",
        help_heading = "Catalog",
        help = "Records fetched per batch."
    )]
    pub batch_size: Option<u32>,

    #[arg(
        long = "mi",
        visible_alias = "max-id",
        value_name = "ID",
        help_heading = "Catalog",
        help = "Highest record ID to load."
    )]
    pub max_id: Option<u32>,

    #[arg(
        long = "st",
        visible_alias = "scroll-threshold",
        value_name = "PX",
        help_heading = "Catalog",
        help = "Distance from the bottom that triggers loading."
    )]
    pub scroll_threshold: Option<f64>,

    #[arg(
        long = "sd",
        visible_alias = "scroll-debounce",
        value_name = "MS",
        help_heading = "Catalog",
        help = "Scroll throttle window in milliseconds."
    )]
    pub scroll_debounce_ms: Option<u64>,

    #[arg(
        short = 't',
        long = "cat",
        visible_alias = "category",
        value_name = "LABEL",
        help_heading = "Session",
        help = "Start filtered by a category (e.g. Fire)."
    )]
    pub category: Option<String>,

    #[arg(
        short = 's',
        long = "q",
        visible_alias = "search",
        value_name = "TERM",
        help_heading = "Session",
        help = "Apply a search term after loading."
    )]
    pub search: Option<String>,

    #[arg(
        long = "once",
        help_heading = "Session",
        help = "Load, print the grid and exit instead of starting the interactive session."
    )]
    pub once: bool,
}
