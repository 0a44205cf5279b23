// src/main.rs
use std::env;
use std::process::ExitCode;

use casthour::app::ui::{details_lines, explore_lines, favourites_lines};
use casthour::app::{CastHourApp, DetailsState, GenreFilter, SortKey};
use casthour::config::load_config;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage:
  casthour explore [--search Q] [--genre G] [--sort K]
  casthour show <id> [--season N] [--all] [--play TITLE] [--favourite TITLE]
  casthour favourites [--sort K] [--delete INDEX]

Sort keys: A-Z, Z-A, Newest, Oldest, All";

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// `Ok(None)` means "All" (no sort).
fn parse_sort(args: &[String]) -> Result<Option<SortKey>, String> {
    match flag_value(args, "--sort") {
        None => Ok(None),
        Some(raw) if raw.eq_ignore_ascii_case("all") => Ok(None),
        Some(raw) => SortKey::from_str(raw)
            .map(Some)
            .ok_or_else(|| format!("unknown sort key '{raw}'")),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn run_explore(app: &mut CastHourApp, args: &[String]) -> Result<(), String> {
    let sort = parse_sort(args)?;
    let genre = match flag_value(args, "--genre") {
        None => GenreFilter::All,
        Some(raw) => GenreFilter::from_str(raw).ok_or_else(|| format!("unknown genre '{raw}'"))?,
    };

    let state = app.load_explore().map_err(|e| {
        error!("catalogue fetch failed: {e}");
        e.user_message().to_string()
    })?;
    if let Some(query) = flag_value(args, "--search") {
        state.set_query(query);
    }
    state.set_genre(genre);
    state.set_sort(sort);
    print_lines(explore_lines(state));
    Ok(())
}

fn run_show(app: &mut CastHourApp, args: &[String]) -> Result<(), String> {
    let show_id = args
        .first()
        .filter(|a| !a.starts_with("--"))
        .ok_or_else(|| "show needs an id".to_string())?;

    if let DetailsState::Failed { message, .. } = app.open_show(show_id) {
        return Err(message.clone());
    }

    let favourite = flag_value(args, "--favourite").map(str::to_string);
    let Some(nav) = app.navigator_mut() else {
        return Err("Data Fetching Failed".into());
    };
    nav.expand_season_list(has_flag(args, "--all"));
    if let Some(raw) = flag_value(args, "--season") {
        let number: u32 = raw.parse().map_err(|_| format!("bad season number '{raw}'"))?;
        if nav.selected_season().map(|s| s.season_number) != Some(number) {
            nav.select_season(number);
            if nav.selected_season().map(|s| s.season_number) != Some(number) {
                return Err(format!("season {number} is not listed; pass --all to see every season"));
            }
        }
    }
    if let Some(title) = flag_value(args, "--play") {
        if !nav.select_episode(title) {
            warn!("'{title}' is not in the selected season");
        }
    }

    if let Some(title) = favourite {
        match app.favourite_episode(&title) {
            Ok(Some(true)) => info!("favourited '{title}'"),
            Ok(Some(false)) => info!("'{title}' was already a favourite"),
            Ok(None) => warn!("'{title}' is not in the selected season"),
            Err(e) => error!("could not save favourite: {e}"),
        }
    }

    match app.details() {
        DetailsState::Ready(nav) => {
            print_lines(details_lines(nav, |entry| app.is_favourite(entry)));
            Ok(())
        }
        _ => Err("Data Fetching Failed".into()),
    }
}

fn run_favourites(app: &mut CastHourApp, args: &[String]) -> Result<(), String> {
    let sort = parse_sort(args)?;
    if let Some(raw) = flag_value(args, "--delete") {
        let index: usize = raw.parse().map_err(|_| format!("bad index '{raw}'"))?;
        match app.delete_favourite(index) {
            Ok(Some(removed)) => info!("removed '{}'", removed.episode_title),
            Ok(None) => {}
            Err(e) => error!("could not delete favourite: {e}"),
        }
    }
    let groups = app.favourite_groups(sort).map_err(|e| {
        error!("could not read favourites: {e}");
        e.to_string()
    })?;
    print_lines(favourites_lines(&groups));
    Ok(())
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    let rest = &args[1..];

    let cfg = load_config();
    let mut app = match CastHourApp::new(&cfg) {
        Ok(app) => app,
        Err(e) => {
            error!("could not build http client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match command.as_str() {
        "explore" => run_explore(&mut app, rest),
        "show" => run_show(&mut app, rest),
        "favourites" | "favorites" => run_favourites(&mut app, rest),
        other => Err(format!("unknown command '{other}'\n\n{USAGE}")),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
