use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::{debug, info, warn};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::Instant;

use crate::api::{ClientOptions, PokeApiClient, DEFAULT_API_URL, DEFAULT_LANGUAGE};
use crate::catalog::{
    Catalog, CatalogOptions, FilterOutcome, LoadOutcome, Selection, DEFAULT_BATCH_SIZE,
    MAX_RECORD_ID,
};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::detail::OverlayClick;
use crate::output;
use crate::scroll::{ScrollThrottle, Viewport, DEFAULT_SCROLL_DEBOUNCE, DEFAULT_SCROLL_THRESHOLD};
use crate::utils;

const COMMANDS_HELP: &str = "\
:: Commands
  <enter>, scroll, more   scroll down one screen (loads more near the bottom)
  filter <Label>          filter by category; the active one again clears it
  search [term]           show cards whose name or number matches (empty shows all)
  open <number>           open the detail view of a rendered card
  close                   close the detail view
  backdrop                click outside the detail view
  sidebar                 toggle the category sidebar
  list                    print the grid
  export <path>           write the grid (text, json or html by extension)
  help                    show this help
  quit                    wait for in-flight work and exit
";

fn print_banner() {
    const BANNER: &str = r#"
                    __                   _     __
    ____  ____  / /_____  ____ ______(_)___/ /
   / __ \/ __ \/ //_/ _ \/ __ `/ ___/ / __  /
  / /_/ / /_/ / ,< /  __/ /_/ / /  / / /_/ /
 / .___/\____/_/|_|\___/\__, /_/  /_/\__,_/
/_/                    /____/
       catalog browser for the PokeAPI
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn flag_line(arg: &clap::Arg) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(short) = arg.get_short() {
        parts.push(format!("-{short}"));
    }
    if let Some(long) = arg.get_long() {
        parts.push(format!("--{long}"));
    }
    for alias in arg.get_visible_aliases().unwrap_or_default() {
        let rendered = format!("--{alias}");
        if !parts.contains(&rendered) {
            parts.push(rendered);
        }
    }

    let mut flags = parts.join(", ");
    if arg.get_action().takes_values() {
        let value_name = arg
            .get_value_names()
            .and_then(|names| names.first())
            .map(|name| name.as_str())
            .unwrap_or("VALUE");
        flags.push_str(&format!(" <{value_name}>"));
    }
    flags
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    out.push_str(cmd.get_name());
    if let Some(version) = cmd.get_version() {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');
    if let Some(about) = cmd.get_about() {
        out.push_str(&format!("{about}\n"));
    }
    if let Some(long_about) = cmd.get_long_about() {
        out.push_str(&format!("\n{long_about}\n"));
    }
    out.push_str(&format!("\nUsage: {} [OPTIONS]\n\n", cmd.get_name()));

    let sections = cmd
        .get_arguments()
        .filter(|arg| !arg.is_hide_set())
        .into_group_map_by(|arg| arg.get_help_heading().unwrap_or("Options").to_string());
    let headings = cmd
        .get_arguments()
        .filter(|arg| !arg.is_hide_set())
        .map(|arg| arg.get_help_heading().unwrap_or("Options").to_string())
        .unique();

    for heading in headings {
        out.push_str(&format!("{heading}:\n"));
        for arg in sections.get(&heading).into_iter().flatten() {
            out.push_str(&format!("  {}\n", flag_line(arg)));
            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str(&format!("          {}\n", help.trim()));
                }
            }
            out.push('\n');
        }
    }

    out.push_str(COMMANDS_HELP);
    out
}

#[derive(Clone, Debug)]
struct RunConfig {
    client: ClientOptions,
    catalog: CatalogOptions,
    scroll_debounce: Duration,
    category: Option<String>,
    search: Option<String>,
    output: Option<String>,
    output_format: Option<String>,
    no_color: bool,
    once: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let base_url = args
        .api_url
        .or(cfg.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    reqwest::Url::parse(&base_url).map_err(|e| format!("invalid api_url '{base_url}': {e}"))?;

    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout_seconds == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let language = args
        .language
        .or(cfg.language)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    if language.trim().is_empty() {
        return Err("invalid language, expected a language tag".to_string());
    }

    let client = ClientOptions {
        base_url,
        timeout_seconds,
        proxy: args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty()),
        rate: args.rate.or(cfg.rate).unwrap_or(20),
        language: language.trim().to_string(),
    };

    let batch_size = args
        .batch_size
        .or(cfg.batch_size)
        .unwrap_or(DEFAULT_BATCH_SIZE);
    if batch_size == 0 {
        return Err("invalid batch_size, expected positive integer".to_string());
    }
    let max_id = args.max_id.or(cfg.max_id).unwrap_or(MAX_RECORD_ID);
    if max_id == 0 {
        return Err("invalid max_id, expected positive integer".to_string());
    }
    let scroll_threshold = args
        .scroll_threshold
        .or(cfg.scroll_threshold)
        .unwrap_or(DEFAULT_SCROLL_THRESHOLD);
    if !scroll_threshold.is_finite() || scroll_threshold < 0.0 {
        return Err("invalid scroll_threshold, expected non-negative number".to_string());
    }
    let scroll_debounce = args
        .scroll_debounce_ms
        .or(cfg.scroll_debounce_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_SCROLL_DEBOUNCE);

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = args.output_format.or(cfg.output_format);
    if let Some(raw) = output_format.as_deref() {
        if output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid output_format '{raw}', expected text, json or html"
            ));
        }
    }

    Ok(RunConfig {
        client,
        catalog: CatalogOptions {
            batch_size,
            max_id,
            scroll_threshold,
        },
        scroll_debounce,
        category: args
            .category
            .or(cfg.category)
            .map(|c| normalize_label(&c))
            .filter(|c| !c.is_empty()),
        search: args.search.or(cfg.search),
        output,
        output_format,
        no_color,
        once: args.once,
    })
}

/// Sidebar labels are capitalized; accept any casing on input.
fn normalize_label(raw: &str) -> String {
    utils::capitalize_first(&raw.trim().to_lowercase())
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Scroll,
    Filter(String),
    Search(String),
    Open(u32),
    Close,
    Backdrop,
    Sidebar,
    List,
    Export(String),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name.to_lowercase().as_str() {
        "" | "scroll" | "more" => Ok(Command::Scroll),
        "filter" | "category" => {
            if rest.is_empty() {
                return Err("usage: filter <Label>".to_string());
            }
            Ok(Command::Filter(normalize_label(rest)))
        }
        "search" => Ok(Command::Search(rest.to_string())),
        "open" => {
            let number = rest.trim_start_matches('#');
            number
                .parse::<u32>()
                .map(Command::Open)
                .map_err(|_| format!("usage: open <number> (got '{rest}')"))
        }
        "close" => Ok(Command::Close),
        "backdrop" => Ok(Command::Backdrop),
        "sidebar" => Ok(Command::Sidebar),
        "list" | "ls" => Ok(Command::List),
        "export" => {
            if rest.is_empty() {
                return Err("usage: export <path>".to_string());
            }
            Ok(Command::Export(config::expand_tilde_string(rest)))
        }
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command '{other}', try help")),
    }
}

enum Work {
    Load(LoadOutcome),
    Select(Selection),
    Scroll(Option<LoadOutcome>),
}

fn describe_load(outcome: &LoadOutcome) -> Option<String> {
    match outcome {
        LoadOutcome::Loaded {
            first,
            last,
            appended,
            skipped,
        } => {
            let mut line = format!("loaded #{first}-#{last}: {appended} cards");
            if !skipped.is_empty() {
                line.push_str(&format!(
                    " ({} skipped: {})",
                    skipped.len(),
                    skipped.iter().join(", ")
                ));
            }
            Some(line)
        }
        LoadOutcome::Exhausted => Some("end of catalog".to_string()),
        LoadOutcome::Busy => {
            debug!("load already in flight");
            None
        }
        LoadOutcome::Cancelled => {
            debug!("batch superseded by a filter change");
            None
        }
    }
}

fn describe_work(work: &Work) -> Option<String> {
    match work {
        Work::Load(outcome) | Work::Scroll(Some(outcome)) => describe_load(outcome),
        Work::Scroll(None) => None,
        Work::Select(Selection::Cleared(outcome)) => {
            let loaded = describe_load(outcome);
            Some(match loaded {
                Some(line) => format!("filter cleared, {line}"),
                None => "filter cleared".to_string(),
            })
        }
        Work::Select(Selection::Filtered(FilterOutcome::Applied {
            slug,
            appended,
            skipped,
        })) => {
            let mut line = format!("category {slug}: {appended} cards");
            if !skipped.is_empty() {
                line.push_str(&format!(" ({} skipped)", skipped.len()));
            }
            Some(line)
        }
        Work::Select(Selection::Filtered(FilterOutcome::IndexFailed { slug })) => {
            Some(format!("category {slug} could not be loaded"))
        }
        Work::Select(Selection::Filtered(FilterOutcome::Cancelled)) => None,
    }
}

fn build_spinner() -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} :: [{elapsed_precise}]")
            .map_err(|e| format!("failed to build spinner style: {e}"))?,
    );
    Ok(pb)
}

/// Prints above the spinner when one is running.
fn emit(spinner: Option<&ProgressBar>, text: &str) {
    match spinner {
        Some(pb) => pb.suspend(|| println!("{text}")),
        None => println!("{text}"),
    }
}

async fn write_output(path: &str, rendered: &[u8]) -> Result<(), String> {
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file '{path}': {e}"))?;
    outfile
        .write_all(rendered)
        .await
        .map_err(|e| format!("failed to write output file '{path}': {e}"))?;
    Ok(())
}

async fn export(
    catalog: &Catalog<PokeApiClient>,
    path: &str,
    explicit_format: Option<&str>,
) -> Result<(), String> {
    let format = output::resolve_format(explicit_format, path);
    let rendered = output::render(&catalog.page(), format);
    write_output(path, &rendered).await?;
    info!("wrote {} bytes to {path}", rendered.len());
    Ok(())
}

fn print_grid(catalog: &Catalog<PokeApiClient>, spinner: Option<&ProgressBar>) {
    let text = output::render_text(&catalog.page());
    emit(spinner, text.trim_end());
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let api = PokeApiClient::new(&run.client).map_err(|e| e.to_string())?;
    let catalog = Catalog::new(api, run.catalog.clone());

    if !run.once {
        print_banner();
        format_kv_line("API", catalog.api().base_url());
        format_kv_line("Language", &run.client.language);
        format_kv_line("Batch", &run.catalog.batch_size.to_string());
        format_kv_line("Max ID", &run.catalog.max_id.to_string());
        if let Some(category) = run.category.as_deref() {
            format_kv_line("Category", category);
        }
        if let Some(path) = run.output.as_deref() {
            format_kv_line("Output", path);
        }
        println!();
    }

    let spinner = build_spinner()?;
    let initial = match run.category.as_deref() {
        Some(label) => {
            spinner.set_message(format!("loading category {label}"));
            Work::Select(Selection::Filtered(catalog.filter_by_category(label).await))
        }
        None => {
            spinner.set_message("loading first batch");
            Work::Load(catalog.load_more().await)
        }
    };
    spinner.finish_and_clear();
    if let Some(line) = describe_work(&initial) {
        info!("{line}");
    }
    if let Some(term) = run.search.as_deref() {
        let shown = catalog.apply_search(term);
        info!("search '{term}' matched {shown} cards");
    }

    if run.once {
        print_grid(&catalog, None);
        if let Some(path) = run.output.as_deref() {
            export(&catalog, path, run.output_format.as_deref()).await?;
        }
        return Ok(());
    }

    print_grid(&catalog, None);
    println!("{COMMANDS_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut work: FuturesUnordered<LocalBoxFuture<'_, Work>> = FuturesUnordered::new();
    let mut spinner: Option<ProgressBar> = None;
    let mut throttle = ScrollThrottle::new(run.scroll_debounce);
    let mut scroll_deadline: Option<Instant> = None;
    let mut viewport = Viewport::default();
    let mut stdin_open = true;

    loop {
        if !stdin_open && work.is_empty() && scroll_deadline.is_none() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        stdin_open = false;
                        continue;
                    }
                    Err(e) => {
                        warn!("failed to read command: {e}");
                        stdin_open = false;
                        continue;
                    }
                };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        emit(spinner.as_ref(), &format!(":: {e}"));
                        continue;
                    }
                };
                match command {
                    Command::Scroll => {
                        viewport.page_down(catalog.page().container.len());
                        if let Some(deadline) = throttle.on_event(Instant::now()) {
                            scroll_deadline = Some(deadline);
                        }
                    }
                    Command::Filter(label) => {
                        viewport.reset();
                        let catalog = &catalog;
                        work.push(
                            async move { Work::Select(catalog.select_category(&label).await) }
                                .boxed_local(),
                        );
                    }
                    Command::Search(term) => {
                        let shown = catalog.apply_search(&term);
                        emit(spinner.as_ref(), &format!(":: search '{term}': {shown} cards shown"));
                    }
                    Command::Open(number) => {
                        if catalog.open_card(number) {
                            let page = catalog.page();
                            if let Some(view) = page.overlay.content() {
                                emit(spinner.as_ref(), output::render_detail_text(view).trim_end());
                            }
                        } else {
                            emit(spinner.as_ref(), &format!(":: no rendered card #{number}"));
                        }
                    }
                    Command::Close => {
                        if catalog.overlay_click(OverlayClick::CloseControl) {
                            emit(spinner.as_ref(), ":: detail view closed");
                        }
                    }
                    Command::Backdrop => {
                        if catalog.overlay_click(OverlayClick::Backdrop) {
                            emit(spinner.as_ref(), ":: detail view closed");
                        }
                    }
                    Command::Sidebar => {
                        catalog.toggle_sidebar();
                        let hidden = catalog.page().sidebar.hidden;
                        emit(
                            spinner.as_ref(),
                            if hidden { ":: sidebar hidden" } else { ":: sidebar shown" },
                        );
                    }
                    Command::List => print_grid(&catalog, spinner.as_ref()),
                    Command::Export(path) => {
                        match export(&catalog, &path, run.output_format.as_deref()).await {
                            Ok(()) => emit(spinner.as_ref(), &format!(":: wrote {path}")),
                            Err(e) => warn!("{e}"),
                        }
                    }
                    Command::Help => emit(spinner.as_ref(), COMMANDS_HELP.trim_end()),
                    Command::Quit => stdin_open = false,
                }
            }
            Some(done) = work.next(), if !work.is_empty() => {
                if let Some(line) = describe_work(&done) {
                    emit(spinner.as_ref(), &format!(":: {line}"));
                }
            }
            _ = tokio::time::sleep_until(scroll_deadline.unwrap_or_else(Instant::now)), if scroll_deadline.is_some() => {
                throttle.fire();
                scroll_deadline = None;
                let metrics = viewport.metrics(catalog.page().container.len());
                let catalog = &catalog;
                work.push(async move { Work::Scroll(catalog.on_scroll(metrics).await) }.boxed_local());
            }
        }

        if work.is_empty() {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        } else {
            if spinner.is_none() {
                spinner = Some(build_spinner()?);
            }
            if let Some(pb) = spinner.as_ref() {
                pb.set_message(format!(
                    "{} in flight, {} cards",
                    work.len(),
                    catalog.page().container.len()
                ));
            }
        }
    }
    drop(work);

    if let Some(path) = run.output.as_deref() {
        export(&catalog, path, run.output_format.as_deref()).await?;
        format_kv_line("Output", path);
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));

    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine a config path, pass --config".to_string())?;
        config::ensure_default_config_file(&path)?;
        format_kv_line("Config", &path.display().to_string());
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    crate::logging::init(args.verbose)?;

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
