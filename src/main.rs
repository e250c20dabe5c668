//! Command-line runtime and entry point.
//!
//! Thin integration layer between the library and a terminal. It parses
//! arguments, owns the worker thread and the session, translates commands
//! and key lines into library events, and executes the resulting actions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │       Main Thread        │
//! │  ┌────────────────────┐  │
//! │  │  State (runtime)   │  │  ← UI state, event handling
//! │  └────────────────────┘  │
//! │        │        ▲        │
//! │  WorkerMessage  WorkerResponse (crossbeam channels)
//! │        ▼        │        │
//! │  ┌────────────────────┐  │
//! │  │    MarketWorker    │  │  ← Owns the store
//! │  │  (worker thread)   │  │
//! │  └────────────────────┘  │
//! └──────────────────────────┘
//! ```
//!
//! # Event Mapping
//!
//! One-shot commands become a short script of events: `browse --search lamp
//! --page 2` is `Start`, `SetSearch`, `GoToPage(2)`, with the worker drained
//! between steps. Intermediate fetches superseded by a later filter change
//! are dropped by sequence number, exactly as in the interactive loop.
//!
//! # Keybindings (interactive)
//!
//! Each input line is one key. `enter` or an empty line is Enter, `esc` is
//! Escape, `bs` is Backspace.
//!
//! In normal mode:
//! - `j`/`k`: Move down/up
//! - `enter`: Open selected product
//! - `/`: Search
//! - `h`/`l`: Previous/next page
//! - `s`: Cycle sort, `r`: Reset filters
//! - `b`/`f`/`w`/`i`/`p`: Browse, featured, requests, my listings, profile
//! - `c`: Contact seller, `m`: Mark sold, `d`: Remove listing
//! - `R`: Retry, `x`: Dismiss banner, `o`: Sign out
//! - `esc`: Back, `q`: Quit
//!
//! In search mode any other line is typed into the query.

#![allow(clippy::multiple_crate_versions)]

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use uuid::Uuid;

use listagain::app::{ConditionFilter, SortKey, ViewMode};
use listagain::domain::{Condition, NewListing, ProfileUpdate};
use listagain::infrastructure::paths::default_config_file;
use listagain::query::postgrest;
use listagain::session::{FileSessionSource, Session, SessionContext, SessionUser};
use listagain::storage::JsonStore;
use listagain::worker::WorkerHandle;
use listagain::{handle_event, Action, Config, Event, InputMode, MarketError, Result, SearchFocus};

/// Longest wait for a single worker response before giving up on a step.
const WORKER_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifetime of a session created by `login`.
const SESSION_DAYS: i64 = 7;

#[derive(Debug, Parser)]
#[command(name = "listagain", version, about = "Browse and manage a college marketplace from the terminal")]
struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog file; overrides the configured one.
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<String>,

    /// Data directory; overrides the configured one.
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<String>,

    /// Built-in theme name.
    #[arg(long, global = true)]
    theme: Option<String>,

    /// Trace level: trace, debug, info, warn or error.
    #[arg(long, global = true)]
    trace_level: Option<String>,

    /// Render width in columns.
    #[arg(long, global = true, default_value_t = 100)]
    width: usize,

    /// Render height in rows.
    #[arg(long, global = true, default_value_t = 30)]
    height: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search and filter available products.
    Browse(BrowseArgs),
    /// Show one product with its seller.
    Show { id: Uuid },
    /// Print the WhatsApp link for a product's seller.
    Contact { id: Uuid },
    /// Newest available products.
    Featured,
    /// The request board.
    Requests {
        #[arg(long)]
        search: Option<String>,
    },
    /// Your listings (requires sign-in).
    Listings,
    /// Mark one of your listings as sold.
    MarkSold { id: Uuid },
    /// Remove one of your listings.
    Remove { id: Uuid },
    /// Publish a new listing.
    Sell(SellArgs),
    /// Show or edit your profile.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        student_id: Option<String>,
    },
    /// Sign in as a catalog user by email.
    Login { email: String },
    /// Forget the stored session.
    Logout,
    /// Line-driven interactive session.
    Interactive,
}

#[derive(Debug, Args)]
struct BrowseArgs {
    #[arg(long)]
    search: Option<String>,
    /// Category slug, or `all`.
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    min_price: Option<Decimal>,
    #[arg(long)]
    max_price: Option<Decimal>,
    /// `any`, `new`, `like-new`, `good` or `fair`.
    #[arg(long, value_parser = parse_condition)]
    condition: Option<ConditionFilter>,
    /// `newest`, `price-asc` or `price-desc`.
    #[arg(long)]
    sort: Option<SortKey>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Also print the count and page requests as PostgREST URLs.
    #[arg(long)]
    print_query: bool,
}

#[derive(Debug, Args)]
struct SellArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    price: Decimal,
    #[arg(long)]
    condition: Condition,
    /// Category slug.
    #[arg(long)]
    category: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long)]
    negotiable: bool,
    /// Image URL; repeat for more. The first is the cover.
    #[arg(long = "image")]
    images: Vec<String>,
}

fn parse_condition(s: &str) -> Result<ConditionFilter> {
    if s.trim().eq_ignore_ascii_case("any") {
        return Ok(ConditionFilter::Any);
    }
    Condition::from_str(s).map(ConditionFilter::Only)
}

/// Runtime state wrapper.
///
/// Wraps the library's `AppState` with the worker thread and the session
/// source.
struct State {
    app: listagain::AppState,
    worker: WorkerHandle,
    session: SessionContext,
    rows: usize,
    cols: usize,
    quit: bool,
}

impl State {
    fn new(config: &Config, rows: usize, cols: usize) -> Result<Self> {
        let store = JsonStore::open(config.catalog_path())?;
        let worker = WorkerHandle::spawn(Box::new(store))?;
        let session = SessionContext::init(Box::new(FileSessionSource::new(config.session_path())));

        let mut state = Self {
            app: listagain::initialize(config),
            worker,
            session,
            rows,
            cols,
            quit: false,
        };
        let signed_in = state.session.current().cloned();
        state.update(&Event::SessionChanged(signed_in))?;
        Ok(state)
    }

    /// Handles one event and runs its actions. Returns whether to re-render.
    fn update(&mut self, event: &Event) -> Result<bool> {
        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in actions {
                    self.execute_action(action)?;
                }
                Ok(should_render)
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                Ok(false)
            }
        }
    }

    /// Feeds worker responses back in until nothing is outstanding.
    fn settle(&mut self) -> Result<()> {
        while self.worker.in_flight() > 0 {
            let Some(response) = self.worker.recv_timeout(WORKER_TIMEOUT)? else {
                tracing::warn!(in_flight = self.worker.in_flight(), "worker did not answer in time");
                break;
            };
            self.update(&Event::WorkerResponse(response))?;
        }
        Ok(())
    }

    /// Runs events in order, draining the worker after each.
    fn run(&mut self, events: &[Event]) -> Result<()> {
        for event in events {
            self.update(event)?;
            self.settle()?;
        }
        Ok(())
    }

    fn render(&self) -> Result<()> {
        listagain::ui::render(&self.app, self.rows, self.cols)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::CloseFocus => {
                tracing::debug!("quitting");
                self.quit = true;
            }
            Action::PostToWorker(message) => self.worker.post(message)?,
            Action::OpenUrl(url) => {
                tracing::debug!(url = %url, "opening link");
                println!("{url}");
            }
            Action::ClearSession => {
                if let Err(e) = self.session.sign_out() {
                    tracing::warn!(error = %e, "failed to clear stored session");
                }
            }
        }
        Ok(())
    }

    /// Maps one input line to an event.
    fn map_key_line(&self, line: &str) -> Option<Event> {
        let key = line.trim_end_matches(['\r', '\n']);
        tracing::debug!(key = %key, "key line");

        match self.app.input_mode {
            InputMode::Search(SearchFocus::Typing) => Some(match key {
                "esc" => Event::ExitSearch,
                "" | "enter" => Event::FocusResults,
                "bs" => Event::Backspace,
                _ => return None,
            }),
            InputMode::Search(SearchFocus::Navigating) => Some(match key {
                "esc" => Event::ExitSearch,
                "/" => Event::FocusSearchBar,
                "j" => Event::KeyDown,
                "k" => Event::KeyUp,
                "" | "enter" => Event::OpenSelected,
                _ => return None,
            }),
            InputMode::Normal => Some(match key {
                "j" => Event::KeyDown,
                "k" => Event::KeyUp,
                "" | "enter" => Event::OpenSelected,
                "/" => Event::SearchMode,
                "h" => Event::PrevPage,
                "l" => Event::NextPage,
                "s" => Event::CycleSort,
                "r" => Event::ResetFilters,
                "b" => Event::ShowBrowse,
                "f" => Event::ShowFeatured,
                "w" => Event::ShowRequests,
                "i" => Event::ShowMyListings,
                "p" => Event::ShowProfile,
                "c" => Event::ContactSeller,
                "m" => Event::MarkSold(self.selected_id()?),
                "d" => Event::RemoveListing(self.selected_id()?),
                "R" => Event::Retry,
                "x" => Event::DismissError,
                "o" => Event::SignOut,
                "esc" => Event::Back,
                "q" => Event::CloseFocus,
                _ => return None,
            }),
        }
    }

    fn selected_id(&self) -> Option<Uuid> {
        if self.app.view_mode != ViewMode::MyListings {
            return None;
        }
        self.app.selected_product().map(|p| p.id)
    }

    fn interactive(&mut self) -> Result<()> {
        self.run(&[Event::Start])?;
        self.render()?;

        for line in std::io::stdin().lock().lines() {
            let line = line?;
            let events: Vec<Event> = match self.map_key_line(&line) {
                Some(event) => vec![event],
                None if self.app.input_mode == InputMode::Search(SearchFocus::Typing) => {
                    line.chars().map(Event::Char).collect()
                }
                None => continue,
            };
            self.run(&events)?;
            if self.quit {
                break;
            }
            self.render()?;
        }
        Ok(())
    }

    fn shutdown(self) -> Result<()> {
        self.session.teardown();
        self.worker.shutdown()
    }
}

fn browse_events(args: BrowseArgs, max_price: Decimal) -> Vec<Event> {
    let mut events = Vec::new();
    if let Some(search) = args.search {
        events.push(Event::SetSearch(search));
    }
    if let Some(slug) = args.category {
        events.push(Event::SetCategorySlug(slug));
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        events.push(Event::SetPriceRange {
            min: args.min_price.unwrap_or(Decimal::ZERO),
            max: args.max_price.unwrap_or(max_price),
        });
    }
    if let Some(condition) = args.condition {
        events.push(Event::SetCondition(condition));
    }
    if let Some(sort) = args.sort {
        events.push(Event::SetSort(sort));
    }
    events
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => match default_config_file().filter(|p| p.exists()) {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        },
    };

    if let Some(catalog) = &cli.catalog {
        config.catalog_path = Some(catalog.clone());
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(theme) = &cli.theme {
        config.theme_name = Some(theme.clone());
    }
    if let Some(level) = &cli.trace_level {
        config.trace_level = Some(level.clone());
    }
    Ok(config)
}

/// Creates a session for the catalog user with `email`.
fn login(config: &Config, email: &str) -> Result<()> {
    let store = JsonStore::open(config.catalog_path())?;
    let user = store
        .catalog()
        .users
        .iter()
        .find(|u| u.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email.trim())))
        .ok_or_else(|| MarketError::NotFound(format!("no user with email {email}")))?;

    let session = Session {
        access_token: Uuid::new_v4().simple().to_string(),
        expires_at: Utc::now() + chrono::Duration::days(SESSION_DAYS),
        user: SessionUser {
            id: user.id,
            email: user.email.clone(),
            full_name: Some(user.full_name.clone()),
        },
    };
    FileSessionSource::new(config.session_path()).store(&session)?;
    tracing::info!(user_id = %user.id, "signed in");
    println!("Signed in as {}", user.full_name);
    Ok(())
}

fn execute(cli: Cli, config: &Config) -> Result<()> {
    let _span = tracing::debug_span!("execute", command = ?cli.command).entered();

    if let Command::Login { email } = &cli.command {
        return login(config, email);
    }

    let mut state = State::new(config, cli.height, cli.width)?;

    match cli.command {
        Command::Browse(args) => {
            let (page, print_query) = (args.page, args.print_query);
            state.run(&[Event::Start])?;
            state.run(&browse_events(args, config.max_price))?;
            if page > 1 {
                state.run(&[Event::GoToPage(page)])?;
            }
            state.render()?;
            if let Some(queries) = state.app.last_query.as_ref().filter(|_| print_query) {
                println!("{}", postgrest::count_request(&queries.count).url());
                println!("{}", postgrest::page_request(&queries.page).url());
            }
        }
        Command::Show { id } => {
            state.run(&[Event::OpenProduct(id)])?;
            state.render()?;
        }
        Command::Contact { id } => {
            state.run(&[Event::OpenProduct(id), Event::ContactSeller])?;
            if state.app.notice.is_some() || state.app.detail.loaded().is_none() {
                state.render()?;
            }
        }
        Command::Featured => {
            state.run(&[Event::ShowFeatured])?;
            state.render()?;
        }
        Command::Requests { search } => {
            state.run(&[Event::ShowRequests])?;
            if let Some(search) = search {
                state.run(&[Event::SetRequestSearch(search)])?;
            }
            state.render()?;
        }
        Command::Listings => {
            state.run(&[Event::ShowMyListings])?;
            state.render()?;
        }
        Command::MarkSold { id } => {
            state.run(&[Event::ShowMyListings, Event::MarkSold(id)])?;
            state.render()?;
        }
        Command::Remove { id } => {
            state.run(&[Event::ShowMyListings, Event::RemoveListing(id)])?;
            state.render()?;
        }
        Command::Sell(args) => {
            let listing = NewListing {
                title: args.title,
                description: args.description,
                price: args.price,
                condition: args.condition,
                category_slug: args.category,
                location: args.location,
                is_negotiable: args.negotiable,
                images: args.images,
            };
            state.run(&[Event::ShowMyListings, Event::CreateListing(listing)])?;
            state.render()?;
        }
        Command::Profile {
            name,
            phone,
            student_id,
        } => {
            let update = ProfileUpdate {
                full_name: name,
                student_id,
                phone,
            };
            state.run(&[Event::ShowProfile])?;
            if !update.is_empty() {
                state.run(&[Event::UpdateProfile(update)])?;
            }
            state.render()?;
        }
        Command::Logout => {
            let was_signed_in = state.app.session.is_some();
            state.run(&[Event::SignOut])?;
            println!("{}", if was_signed_in { "Signed out" } else { "Not signed in" });
        }
        Command::Interactive => state.interactive()?,
        Command::Login { .. } => {}
    }

    state.shutdown()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("listagain: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = listagain::observability::init_tracing(&config) {
        eprintln!("listagain: tracing disabled: {e}");
    }

    match execute(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("listagain: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browse_parses_filters_and_print_query() {
        let cli = Cli::try_parse_from([
            "listagain",
            "browse",
            "--search",
            "lamp",
            "--condition",
            "like-new",
            "--page",
            "2",
            "--print-query",
        ])
        .unwrap();
        let Command::Browse(args) = cli.command else {
            panic!("expected browse");
        };
        assert!(args.print_query);
        assert_eq!(args.page, 2);

        let events = browse_events(args, Decimal::from(1000));
        assert_eq!(
            events,
            vec![
                Event::SetSearch("lamp".to_string()),
                Event::SetCondition(ConditionFilter::Only(Condition::LikeNew)),
            ]
        );
    }
}
