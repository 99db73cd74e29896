//! View state for the interactive browser.
//!
//! The state is a plain value. Every user command becomes an [`Action`],
//! and [`ViewState::apply`] returns the next state. [`screen`] then turns
//! the state plus the current archive into what should be drawn.

use archive_core::criteria::{choice, FilterCriteria};
use archive_core::dates::DateIndex;
use archive_core::engine::{MemberCount, MemberGroup};
use archive_core::{Archive, ArchiveEngine, Encounter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// One day grouped by member
    #[default]
    Day,
    /// Flat list, newest first
    List,
    Dates,
    Members,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Show(View),
    /// Pick a day for the day view and narrow the list view
    SelectDate(String),
    ClearDate,
    SetMember(Option<String>),
    SetSeason(Option<String>),
    SetPlatform(Option<String>),
    SetResidentQuery(String),
    SetAttributeQuery(String),
    SetKeyword(String),
    /// Expand a member group, or collapse it if already expanded
    Toggle(String),
    Reset,
}

/// Everything the browser remembers between commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub view: View,
    pub selected_date: Option<String>,
    pub criteria: FilterCriteria,
    pub expanded: Option<String>,
}

impl ViewState {
    pub fn apply(&self, action: Action) -> ViewState {
        let mut next = self.clone();
        match action {
            Action::Show(view) => next.view = view,
            Action::SelectDate(date) => {
                next.selected_date = Some(date);
                next.expanded = None;
                if next.view == View::Dates {
                    next.view = View::Day;
                }
            }
            Action::ClearDate => {
                next.selected_date = None;
                next.expanded = None;
            }
            Action::SetMember(member) => next.criteria.member = member,
            Action::SetSeason(season) => next.criteria.season = season,
            Action::SetPlatform(platform) => next.criteria.platform = platform,
            Action::SetResidentQuery(query) => next.criteria.resident_query = query,
            Action::SetAttributeQuery(query) => next.criteria.attribute_query = query,
            Action::SetKeyword(keyword) => next.criteria.keyword = keyword,
            Action::Toggle(member) => {
                next.expanded = if next.expanded.as_deref() == Some(member.as_str()) {
                    None
                } else {
                    Some(member)
                };
            }
            Action::Reset => next = ViewState::default(),
        }
        next
    }
}

/// A browser input line, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Apply(Action),
    Reload,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  latest | list | dates | members   switch view
  date <YYYY/MM/DD>                  pick a day (no argument clears it)
  member <name>                      filter by member (wildcard clears)
  season <label> | platform <name>   exact filters (wildcard clears)
  resident <text> | attribute <text> | keyword <text>
                                     substring filters (no argument clears)
  open <member>                      expand/collapse a member group
  reset                              clear every filter
  reload                             fetch the feed again
  help | quit";

/// Parse one input line. `wildcard` is the "match all" picker label.
pub fn parse_command(line: &str, wildcard: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "latest" | "day" => Command::Apply(Action::Show(View::Day)),
        "list" => Command::Apply(Action::Show(View::List)),
        "dates" => Command::Apply(Action::Show(View::Dates)),
        "members" => Command::Apply(Action::Show(View::Members)),
        "date" if rest.is_empty() => Command::Apply(Action::ClearDate),
        "date" => Command::Apply(Action::SelectDate(rest.to_string())),
        "member" => Command::Apply(Action::SetMember(choice(rest, wildcard))),
        "season" => Command::Apply(Action::SetSeason(choice(rest, wildcard))),
        "platform" => Command::Apply(Action::SetPlatform(choice(rest, wildcard))),
        "resident" => Command::Apply(Action::SetResidentQuery(rest.to_string())),
        "attribute" => Command::Apply(Action::SetAttributeQuery(rest.to_string())),
        "keyword" | "search" => Command::Apply(Action::SetKeyword(rest.to_string())),
        "open" if !rest.is_empty() => Command::Apply(Action::Toggle(rest.to_string())),
        "open" => return Err("open needs a member name".to_string()),
        "reset" => Command::Apply(Action::Reset),
        "reload" => Command::Reload,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "" => return Err(String::new()),
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(command)
}

/// What to draw for a given state.
#[derive(Debug)]
pub enum Screen<'a> {
    Day {
        /// `None` only when the archive is empty
        date: Option<String>,
        groups: Vec<MemberGroup<'a>>,
        expanded: Option<String>,
    },
    List(Vec<&'a Encounter>),
    Dates(DateIndex),
    Members(Vec<MemberCount<'a>>),
}

pub fn screen<'a>(engine: &'a ArchiveEngine, archive: &'a Archive, state: &ViewState) -> Screen<'a> {
    match state.view {
        View::Day => {
            let date = state
                .selected_date
                .clone()
                .or_else(|| archive.latest_date().map(str::to_string));
            let groups = match &date {
                Some(d) => {
                    let filtered = engine.filter(archive.records(), &state.criteria);
                    engine.group_by_member(filtered, d)
                }
                None => Vec::new(),
            };
            Screen::Day {
                date,
                groups,
                expanded: state.expanded.clone(),
            }
        }
        View::List => {
            let rows = engine.visible(archive.records(), &state.criteria);
            let rows = match &state.selected_date {
                Some(d) => rows.into_iter().filter(|e| &e.date == d).collect(),
                None => rows,
            };
            Screen::List(rows)
        }
        View::Dates => Screen::Dates(archive.date_index()),
        View::Members => Screen::Members(engine.member_counts(archive.records())),
    }
}
