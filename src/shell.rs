//! Line-oriented front end: parses commands and renders session state.

use crate::core::distance::distance_km;
use crate::core::locations::LocationCriteria;
use crate::core::search::SearchStatus;
use crate::core::SearchSession;
use crate::models::{is_us_state, SortSpec};
use std::fmt::Write;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid {name}: '{value}'")]
    InvalidArgument { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { name: String, email: String },
    Logout,
    Breeds,
    /// `None` clears the filter
    FilterBreeds(Option<Vec<String>>),
    AgeMin(Option<u32>),
    AgeMax(Option<u32>),
    Zips(Option<Vec<String>>),
    Sort(SortSpec),
    Apply,
    Clear,
    List,
    Page(u32),
    Next,
    Prev,
    Fav(String),
    Unfav(String),
    Favs,
    ClearFavs,
    Match,
    Locations(LocationCriteria),
    Near { zip_code: String, radius_km: f64 },
    LocPage(u32),
    Pick(String),
    Unpick(String),
    UseLocations,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
login <name> <email>      start a session
logout                    end the session
breeds                    list breed filter options
filter-breeds <a,b|->     set (or clear) the breed filter
age-min <n|->             set (or clear) the minimum age
age-max <n|->             set (or clear) the maximum age
zips <a,b|->              set (or clear) the ZIP code filter
sort <field:dir>          sort by breed|name|age, asc|desc (applies now)
apply                     search with the pending filters
clear                     drop all filters and search
list                      show the current page
page <n> | next | prev    move to an adjacent page
fav <id> | unfav <id>     add/remove a favorite
favs | clear-favs         show/clear favorites
match                     pick a match from the favorites
locations [city=..] [states=NY,NJ] [box=top,bottom,left,right]
near <zip> <km>           locations around a ZIP code
loc-page <n>              move to an adjacent location page
pick <zip> | unpick <zip> select/deselect a location
use-locations             filter dogs by the selected locations
status                    session summary
quit";

fn parse_list(value: &str) -> Option<Vec<String>> {
    if value == "-" {
        return None;
    }
    Some(
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ShellError> {
    value.parse().map_err(|_| ShellError::InvalidArgument {
        name,
        value: value.to_string(),
    })
}

/// Pages are 1-based
fn parse_page(value: &str) -> Result<u32, ShellError> {
    match parse_number("page", value)? {
        0 => Err(ShellError::InvalidArgument {
            name: "page",
            value: value.to_string(),
        }),
        page => Ok(page),
    }
}

fn parse_radius(value: &str) -> Result<f64, ShellError> {
    let radius: f64 = parse_number("radius", value)?;
    if !radius.is_finite() || radius <= 0.0 {
        return Err(ShellError::InvalidArgument {
            name: "radius",
            value: value.to_string(),
        });
    }
    Ok(radius)
}

fn parse_optional_age(name: &'static str, value: &str) -> Result<Option<u32>, ShellError> {
    if value == "-" {
        Ok(None)
    } else {
        parse_number(name, value).map(Some)
    }
}

fn parse_locations(args: &[&str]) -> Result<LocationCriteria, ShellError> {
    let mut city: Vec<&str> = Vec::new();
    let mut criteria = LocationCriteria::default();

    for arg in args {
        if let Some(states) = arg.strip_prefix("states=") {
            let states: Vec<String> = states
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_uppercase)
                .collect();
            if let Some(bad) = states.iter().find(|s| !is_us_state(s)) {
                return Err(ShellError::InvalidArgument {
                    name: "state",
                    value: bad.clone(),
                });
            }
            criteria = criteria.with_states(states);
        } else if let Some(edges) = arg.strip_prefix("box=") {
            let edges = edges
                .split(',')
                .map(|e| parse_number::<f64>("box", e))
                .collect::<Result<Vec<_>, _>>()?;
            if edges.len() != 4 {
                return Err(ShellError::InvalidArgument {
                    name: "box",
                    value: arg.to_string(),
                });
            }
            criteria = criteria.with_edges(Some(edges[0]), Some(edges[1]), Some(edges[2]), Some(edges[3]));
        } else if let Some(first) = arg.strip_prefix("city=") {
            city.push(first);
        } else if !city.is_empty() {
            city.push(arg);
        } else {
            return Err(ShellError::InvalidArgument {
                name: "location filter",
                value: arg.to_string(),
            });
        }
    }

    Ok(criteria.with_city(&city.join(" ")))
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<Command, ShellError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&name, args) = tokens
        .split_first()
        .ok_or(ShellError::MissingArgument("command"))?;
    let first = || args.first().copied().ok_or(ShellError::MissingArgument("value"));

    let command = match name {
        "login" => {
            let (email, name) = args
                .split_last()
                .ok_or(ShellError::MissingArgument("email"))?;
            Command::Login {
                name: name.join(" "),
                email: email.to_string(),
            }
        }
        "logout" => Command::Logout,
        "breeds" => Command::Breeds,
        "filter-breeds" => Command::FilterBreeds(parse_list(&args.join(" "))),
        "age-min" => Command::AgeMin(parse_optional_age("age", first()?)?),
        "age-max" => Command::AgeMax(parse_optional_age("age", first()?)?),
        "zips" => Command::Zips(parse_list(first()?)),
        "sort" => {
            let value = first()?;
            Command::Sort(value.parse().map_err(|_| ShellError::InvalidArgument {
                name: "sort",
                value: value.to_string(),
            })?)
        }
        "apply" => Command::Apply,
        "clear" => Command::Clear,
        "list" => Command::List,
        "page" => Command::Page(parse_page(first()?)?),
        "next" => Command::Next,
        "prev" => Command::Prev,
        "fav" => Command::Fav(first()?.to_string()),
        "unfav" => Command::Unfav(first()?.to_string()),
        "favs" => Command::Favs,
        "clear-favs" => Command::ClearFavs,
        "match" => Command::Match,
        "locations" => Command::Locations(parse_locations(args)?),
        "near" => {
            let zip_code = first()?.to_string();
            let radius = args.get(1).ok_or(ShellError::MissingArgument("radius"))?;
            Command::Near {
                zip_code,
                radius_km: parse_radius(radius)?,
            }
        }
        "loc-page" => Command::LocPage(parse_page(first()?)?),
        "pick" => Command::Pick(first()?.to_string()),
        "unpick" => Command::Unpick(first()?.to_string()),
        "use-locations" => Command::UseLocations,
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ShellError::UnknownCommand(other.to_string())),
    };

    Ok(command)
}

fn render_results(session: &SearchSession) -> String {
    let search = session.search();
    let mut out = String::new();

    match search.status() {
        SearchStatus::Loading => out.push_str("Loading..."),
        SearchStatus::Failed => out.push_str(search.error().unwrap_or_default()),
        SearchStatus::Empty => out.push_str("No dogs match these filters."),
        SearchStatus::Results => {
            for dog in search.dogs() {
                let star = if session.favorites().is_favorite(&dog.id) { "*" } else { " " };
                let _ = writeln!(
                    out,
                    "{} {:<24} {:<20} {:>3}y  {:<24} {}",
                    star, dog.id, dog.name, dog.age, dog.breed, dog.zip_code
                );
            }
            let _ = write!(out, "page {} of {}", search.current_page(), search.total_pages());
        }
    }

    if session.filters().is_modified() {
        out.push_str("\nYou have modified filters. Run 'apply' to see results.");
    }
    out
}

fn render_locations(session: &SearchSession, center: Option<&crate::models::Location>) -> String {
    let search = session.locations();
    if let Some(error) = search.error() {
        return error.to_string();
    }

    let mut out = String::new();
    for location in search.locations() {
        let picked = if search.selection().contains(&location.zip_code) { "+" } else { " " };
        let _ = write!(out, "{} {}", picked, location.label());
        if let Some(center) = center {
            let km = distance_km(center.coordinates(), location.coordinates());
            let _ = write!(out, "  {:.1} km", km);
        }
        out.push('\n');
    }
    let _ = write!(
        out,
        "{} locations, page {} of {}",
        search.total(),
        search.pages().current_page,
        search.pages().total_pages
    );
    out
}

fn render_favorites(session: &SearchSession) -> String {
    let favorites = session.favorites();
    if favorites.is_empty() {
        return "No favorites yet.".to_string();
    }

    let mut out = String::new();
    for dog in favorites.dogs() {
        let _ = writeln!(out, "  {} {} ({}, {}y)", dog.id, dog.name, dog.breed, dog.age);
    }
    let _ = write!(out, "{} favorites", favorites.len());
    out
}

fn render_status(session: &SearchSession) -> String {
    let criteria = session.filters().criteria();
    let mut out = String::new();

    let _ = writeln!(out, "session:   {:?}", session.api().status());
    if let Some(at) = session.logged_in_at() {
        let _ = writeln!(out, "since:     {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    let _ = writeln!(
        out,
        "breeds:    {}",
        criteria.breeds.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    let age = |age: Option<u32>| age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "age:       {} .. {}", age(criteria.age_min), age(criteria.age_max));
    let _ = writeln!(
        out,
        "zip codes: {}",
        criteria.zip_codes.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    let _ = writeln!(out, "sort:      {}", criteria.sort);
    let _ = write!(out, "favorites: {}", session.favorites().len());
    if session.filters().is_modified() {
        out.push_str("\n(filters modified, not applied)");
    }
    out
}

/// Run a command against the session and describe the result
pub async fn dispatch(session: &mut SearchSession, command: Command) -> String {
    let needs_login = !matches!(
        command,
        Command::Login { .. } | Command::Help | Command::Quit | Command::Status
    );
    if needs_login && !session.is_authenticated() {
        return "Not logged in. Use 'login <name> <email>'.".to_string();
    }

    let output = match command {
        Command::Login { name, email } => match session.login(&name, &email).await {
            Ok(()) => format!("Welcome, {}!\n{}", name, render_results(session)),
            Err(_) => session.login_error().unwrap_or_default().to_string(),
        },
        Command::Logout => {
            session.logout().await;
            "Logged out.".to_string()
        }
        Command::Breeds => match session.search().breeds_error() {
            Some(error) => error.to_string(),
            None => session.search().available_breeds().join("\n"),
        },
        Command::FilterBreeds(breeds) => {
            session.filters_mut().set_breeds(breeds.unwrap_or_default());
            render_status(session)
        }
        Command::AgeMin(age) => {
            session.filters_mut().set_age_min(age);
            render_status(session)
        }
        Command::AgeMax(age) => {
            session.filters_mut().set_age_max(age);
            render_status(session)
        }
        Command::Zips(zips) => {
            match zips {
                Some(zips) => session.filters_mut().set_zip_codes(zips),
                None => session.filters_mut().clear_zip_codes(),
            }
            render_status(session)
        }
        Command::Sort(sort) => {
            session.change_sort(sort).await;
            render_results(session)
        }
        Command::Apply => {
            session.apply_filters().await;
            render_results(session)
        }
        Command::Clear => {
            session.clear_filters().await;
            render_results(session)
        }
        Command::List => render_results(session),
        Command::Page(page) => {
            session.change_page(page).await;
            render_results(session)
        }
        Command::Next => {
            session.next_page().await;
            render_results(session)
        }
        Command::Prev => {
            session.prev_page().await;
            render_results(session)
        }
        Command::Fav(id) => match session.favorite(&id) {
            Some(dog) => format!("Added {} to favorites.", dog.name),
            None => format!("No dog '{}' on this page.", id),
        },
        Command::Unfav(id) => {
            if session.favorites_mut().remove(&id) {
                format!("Removed {} from favorites.", id)
            } else {
                format!("'{}' is not a favorite.", id)
            }
        }
        Command::Favs => render_favorites(session),
        Command::ClearFavs => {
            session.favorites_mut().clear();
            "Favorites cleared.".to_string()
        }
        Command::Match => {
            if session.favorites().is_empty() {
                "Add some favorites first.".to_string()
            } else {
                let matched = session.request_match().await.cloned();
                match matched {
                    Some(dog) => format!(
                        "It's a match! {} ({}, {}y, ZIP {})",
                        dog.name, dog.breed, dog.age, dog.zip_code
                    ),
                    None => session
                        .favorites()
                        .match_error()
                        .unwrap_or("No match this time.")
                        .to_string(),
                }
            }
        }
        Command::Locations(criteria) => {
            session.open_locations().await;
            let api = session.api().clone();
            session.locations_mut().search(&api, criteria).await;
            render_locations(session, None)
        }
        Command::Near { zip_code, radius_km } => {
            let api = session.api().clone();
            match api.fetch_locations(&[zip_code.clone()]).await {
                Ok(found) => match found.into_iter().next() {
                    Some(center) => {
                        session.locations_mut().nearby(&api, &center, radius_km).await;
                        render_locations(session, Some(&center))
                    }
                    None => format!("Unknown ZIP code '{}'.", zip_code),
                },
                Err(e) => {
                    tracing::error!("Error resolving ZIP code {}: {}", zip_code, e);
                    crate::core::locations::LOCATION_ERROR.to_string()
                }
            }
        }
        Command::LocPage(page) => {
            let api = session.api().clone();
            session.locations_mut().change_page(&api, page).await;
            render_locations(session, None)
        }
        Command::Pick(zip_code) => {
            let found = session.locations().find(&zip_code).cloned();
            match found {
                Some(location) => {
                    let label = location.label();
                    session.locations_mut().selection_mut().add(location);
                    format!("Selected {}.", label)
                }
                None => format!("No location '{}' in the results.", zip_code),
            }
        }
        Command::Unpick(zip_code) => {
            session.locations_mut().selection_mut().remove(&zip_code);
            format!("Deselected {}.", zip_code)
        }
        Command::UseLocations => {
            session.apply_locations();
            render_status(session)
        }
        Command::Status => render_status(session),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };

    if session.check_expired() {
        return "Your session has expired. Please log in again.".to_string();
    }
    output
}
