use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use familiar_core::config_file::{self, ConfigFile, DisplayConfig};
use familiar_core::criteria::ColorLogic;
use familiar_core::{
    EntryOutcome, MemoryCardStore, Navigation, Notification, PreferenceStore, ResultListScreen,
    ResultQuery, ScreenContext, ScreenEvent, SearchCriteria, SetLogic,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Card search results from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Path to the JSON card file
    #[arg(long)]
    cards: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Open the card at this (1-based) list position
    #[arg(long, conflicts_with = "random")]
    select: Option<usize>,

    /// Open a random card and page through the results in shuffled order
    #[arg(long)]
    random: bool,

    /// Start the listing at the first card for this letter
    #[arg(long)]
    from: Option<char>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the card file
    Search {
        #[command(flatten)]
        list: ListArgs,

        /// Name contains
        #[arg(long)]
        name: Option<String>,

        /// Rules text contains (all words)
        #[arg(long)]
        text: Option<String>,

        /// Type line contains (all words)
        #[arg(long = "type")]
        type_line: Option<String>,

        /// Color letters, e.g. WU
        #[arg(long)]
        color: Option<String>,

        /// Require exactly the given colors
        #[arg(long, requires = "color")]
        exact_color: bool,

        /// Set codes to search
        #[arg(long, value_delimiter = ',')]
        set: Vec<String>,

        /// Rarity codes, e.g. R,M
        #[arg(long, value_delimiter = ',')]
        rarity: Vec<char>,

        /// Show only one printing per card
        #[arg(long, value_enum)]
        printing: Option<Printing>,

        /// Full criteria as a TOML file (flags override its fields)
        #[arg(long)]
        criteria: Option<PathBuf>,
    },

    /// Show exactly three printings, in the given order
    Merge {
        #[command(flatten)]
        list: ListArgs,

        #[arg(num_args = 3, required = true)]
        ids: Vec<i64>,
    },

    /// Show or change display preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Show or hide an optional row field
    Field {
        field: Field,
        #[arg(action = clap::ArgAction::Set)]
        shown: bool,
    },
    /// Set the default card file
    Cards { path: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Printing {
    First,
    MostRecent,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Field {
    Set,
    ManaCost,
    Type,
    Ability,
    PowerToughness,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config_file::load_config();

    match cli.command {
        Command::Search {
            list,
            name,
            text,
            type_line,
            color,
            exact_color,
            set,
            rarity,
            printing,
            criteria,
        } => {
            let mut c = match criteria {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)?;
                    toml::from_str::<SearchCriteria>(&content)
                        .map_err(|e| anyhow::anyhow!("invalid criteria file {}: {e}", path.display()))?
                }
                None => SearchCriteria::default(),
            };
            if let Some(v) = name {
                c.name = v;
            }
            if let Some(v) = text {
                c.text = v;
            }
            if let Some(v) = type_line {
                c.type_line = v;
            }
            if let Some(v) = color {
                c.color = v;
            }
            if exact_color {
                c.color_logic = ColorLogic::Exact;
            }
            if !set.is_empty() {
                c.sets = set;
            }
            if !rarity.is_empty() {
                c.rarity = rarity;
            }
            match printing {
                Some(Printing::First) => c.set_logic = SetLogic::FirstPrinting,
                Some(Printing::MostRecent) => c.set_logic = SetLogic::MostRecentPrinting,
                None => {}
            }
            show_results(&config, list, ResultQuery::Search(c)).await
        }
        Command::Merge { list, ids } => {
            let ids: [i64; 3] = ids
                .try_into()
                .map_err(|_| anyhow::anyhow!("merge takes exactly three ids"))?;
            show_results(&config, list, ResultQuery::Merge(ids)).await
        }
        Command::Config { action } => configure(config, action),
    }
}

fn resolve_cards_path(flag: Option<PathBuf>, config: &ConfigFile) -> anyhow::Result<PathBuf> {
    // CLI flag > env var > config file
    flag.or_else(|| std::env::var("FAMILIAR_CARDS").ok().map(PathBuf::from))
        .or_else(|| config.cards_path())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No card file given. Pass --cards, set FAMILIAR_CARDS, or run: familiar config cards <path>"
            )
        })
}

async fn show_results(config: &ConfigFile, list: ListArgs, query: ResultQuery) -> anyhow::Result<()> {
    let color = ColorMode(!list.no_color && config.color().unwrap_or(true));
    let mut out = std::io::stdout();

    let cards_path = resolve_cards_path(list.cards, config)?;
    let store = match MemoryCardStore::open(&cards_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(path = %cards_path.display(), error = %e, "failed to open card file");
            output::print_notification(&mut out, &Notification::StoreFailure, color)?;
            anyhow::bail!("could not open {}: {e}", cards_path.display());
        }
    };

    let ctx = ScreenContext::new(config.display_fields()).with_stack_root(true);
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Ctrl+C tears the screen down mid-query
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let outcome = enter_screen(store, query, ctx, &cancel, tx).await;
    drain_events(&mut out, &mut rx, outcome.as_ref(), color)?;

    let Some(screen) = outcome else {
        return Ok(());
    };

    if screen.len() > 1 {
        print_list(&mut out, &screen, list.from, color)?;
        if let Some(pos) = list.select {
            let opened = list_position(pos).and_then(|p| screen.select_position(p));
            if opened.is_none() {
                anyhow::bail!("no card at position {} (list has {})", pos, screen.len());
            }
        } else if list.random {
            screen.select_random();
        }
        drain_events(&mut out, &mut rx, Some(&screen), color)?;
    } else if screen.on_return_from_detail() {
        drain_events(&mut out, &mut rx, Some(&screen), color)?;
    }

    out.flush()?;
    Ok(())
}

/// Zero-based list position for a 1-based `--select` value.
fn list_position(one_based: usize) -> Option<usize> {
    one_based.checked_sub(1)
}

async fn enter_screen(
    store: MemoryCardStore,
    query: ResultQuery,
    ctx: ScreenContext,
    cancel: &CancellationToken,
    tx: mpsc::UnboundedSender<ScreenEvent>,
) -> Option<ResultListScreen> {
    match familiar_core::enter(store, query, ctx, cancel, tx).await {
        EntryOutcome::Single(screen) | EntryOutcome::List(screen) => Some(screen),
        EntryOutcome::Cancelled | EntryOutcome::Aborted | EntryOutcome::Empty => None,
    }
}

fn drain_events(
    w: &mut dyn Write,
    rx: &mut mpsc::UnboundedReceiver<ScreenEvent>,
    screen: Option<&ResultListScreen>,
    color: ColorMode,
) -> std::io::Result<()> {
    while let Ok(event) = rx.try_recv() {
        match event {
            ScreenEvent::Notify(note) => output::print_notification(w, &note, color)?,
            ScreenEvent::Navigate(nav) => {
                output::print_navigation(w, &nav, color)?;
                if let (Navigation::ShowDetail(req), Some(screen)) = (&nav, screen)
                    && let Some(id) = req.current()
                    && let Some(pos) = screen.results().position_of(id)
                    && let Some(card) = screen.results().get(pos)
                {
                    let rows = screen.rows();
                    output::print_detail(w, card, &rows[pos], color)?;
                }
            }
        }
    }
    Ok(())
}

fn print_list(
    w: &mut dyn Write,
    screen: &ResultListScreen,
    from: Option<char>,
    color: ColorMode,
) -> std::io::Result<()> {
    let index = screen.section_index();
    let start = from
        .and_then(|letter| {
            let letter = letter.to_ascii_uppercase();
            index.sections().iter().position(|&s| s == letter)
        })
        .map(|section| index.position_for_section(section))
        .unwrap_or(0);

    let mut last_section = None;
    for (pos, row) in screen.rows().iter().enumerate().skip(start) {
        let section = index.section_for_position(pos);
        let marker = (last_section != Some(section)).then(|| index.sections()[section]);
        last_section = Some(section);
        output::print_row(w, pos, marker, row, color)?;
    }
    writeln!(w)?;
    Ok(())
}

fn configure(config: ConfigFile, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            if let Some(path) = config_file::config_path() {
                println!("# {}", path.display());
            }
            let fields = config.display_fields();
            let effective = ConfigFile {
                display: Some(DisplayConfig {
                    set: Some(fields.set),
                    mana_cost: Some(fields.mana_cost),
                    type_line: Some(fields.type_line),
                    ability: Some(fields.ability),
                    power_toughness: Some(fields.power_toughness),
                    color: Some(config.color().unwrap_or(true)),
                }),
                store: config.store.clone(),
            };
            print!("{}", toml::to_string_pretty(&effective)?);
            Ok(())
        }
        ConfigAction::Field { field, shown } => {
            // Only the platform file is written; CWD overrides stay untouched.
            let mut saved = config_file::config_path()
                .and_then(|p| config_file::load_from_path(&p))
                .unwrap_or_default();
            let display = saved.display.get_or_insert_with(DisplayConfig::default);
            let slot = match field {
                Field::Set => &mut display.set,
                Field::ManaCost => &mut display.mana_cost,
                Field::Type => &mut display.type_line,
                Field::Ability => &mut display.ability,
                Field::PowerToughness => &mut display.power_toughness,
            };
            *slot = Some(shown);
            let path = config_file::save_config(&saved)?;
            println!("Saved {}", path.display());
            Ok(())
        }
        ConfigAction::Cards { path } => {
            let mut saved = config_file::config_path()
                .and_then(|p| config_file::load_from_path(&p))
                .unwrap_or_default();
            let path = std::fs::canonicalize(&path).unwrap_or(path);
            saved.store.get_or_insert_with(Default::default).cards_path =
                Some(path.display().to_string());
            let written = config_file::save_config(&saved)?;
            println!("Saved {}", written.display());
            Ok(())
        }
    }
}
