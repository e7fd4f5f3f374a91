//! Worktree selection engine
//!
//! Three ways of picking one worktree out of a listing:
//!
//! - **Filter**: case-insensitive substring match on the branch name,
//!   prompting only when several records match.
//! - **Numbered**: the whole listing, numbered from 1.
//! - **Fuzzy**: an incremental search loop driven by [`FuzzyFinder::run`].
//!
//! A listing with exactly one record is returned immediately in every mode.
//! Backing out (empty answer, `q`, `quit`) is reported as
//! [`Selection::Cancelled`], never as an error.

use colored::*;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::constants::{
    FUZZY_MAX_SHOW, FUZZY_OVERFLOW_FACTOR, ICON_LINKED, ICON_PRIMARY, ICON_SEARCH,
    MSG_AVAILABLE_WORKTREES, MSG_FUZZY_HEADER, MSG_FUZZY_HELP, PROMPT_PICKER, QUIT_SIGNALS,
};
use crate::error::{GiwoError, Result};
use crate::ui::UserInterface;
use crate::worktree::WorktreeRecord;

/// Outcome of an interactive pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Chosen(&'a WorktreeRecord),
    Cancelled,
}

impl<'a> Selection<'a> {
    pub fn chosen(self) -> Option<&'a WorktreeRecord> {
        match self {
            Selection::Chosen(record) => Some(record),
            Selection::Cancelled => None,
        }
    }
}

/// Whether `input` asks to leave the prompt
pub fn is_quit_signal(input: &str) -> bool {
    let input = input.trim();
    QUIT_SIGNALS.iter().any(|q| input.eq_ignore_ascii_case(q))
}

/// Records whose branch contains `filter`, ignoring case
pub fn filter_records<'a>(records: &'a [WorktreeRecord], filter: &str) -> Vec<&'a WorktreeRecord> {
    let filter = filter.to_lowercase();
    records
        .iter()
        .filter(|r| r.branch.to_lowercase().contains(&filter))
        .collect()
}

/// Subsequence match: every char of `query` appears in `target` in order
///
/// ```rust
/// use giwo::core::selection::fuzzy_match;
///
/// assert!(fuzzy_match("feature-auth", "feath"));
/// assert!(!fuzzy_match("feature-ui", "feath"));
/// assert!(fuzzy_match("anything", ""));
/// ```
pub fn fuzzy_match(target: &str, query: &str) -> bool {
    let target = target.to_lowercase();
    let mut remaining = target.chars();
    query
        .to_lowercase()
        .chars()
        .all(|q| remaining.by_ref().any(|t| t == q))
}

/// One-line description of a record: icon, branch, pending changes, divergence
pub fn describe_record(record: &WorktreeRecord) -> String {
    describe_with_branch(record, &record.branch)
}

fn describe_with_branch(record: &WorktreeRecord, branch: &str) -> String {
    let icon = if record.is_primary {
        ICON_PRIMARY
    } else {
        ICON_LINKED
    };
    let mut line = format!("{icon} {branch}");

    if !record.is_clean {
        let changes = format!("({} changes)", record.change_count()).yellow();
        line.push_str(&format!(" {changes}"));
    }
    if !record.is_up_to_date() {
        let divergence = format!("↑{} ↓{}", record.ahead, record.behind).cyan();
        line.push_str(&format!(" {divergence}"));
    }

    line
}

/// Numbered and filter-driven selection
pub struct Selector<'a> {
    records: &'a [WorktreeRecord],
}

impl<'a> Selector<'a> {
    pub fn new(records: &'a [WorktreeRecord]) -> Self {
        Self { records }
    }

    /// Numbered pick over the whole listing
    pub fn select(&self, ui: &dyn UserInterface) -> Result<Selection<'a>> {
        let candidates: Vec<&'a WorktreeRecord> = self.records.iter().collect();
        match candidates.as_slice() {
            [] => Err(GiwoError::NoWorktrees),
            [only] => Ok(Selection::Chosen(*only)),
            _ => pick_numbered(ui, &candidates),
        }
    }

    /// Filter first, then a numbered pick over the matches if still ambiguous
    pub fn select_with_filter(&self, ui: &dyn UserInterface, filter: &str) -> Result<Selection<'a>> {
        if self.records.is_empty() {
            return Err(GiwoError::NoWorktrees);
        }
        if let [only] = self.records {
            return Ok(Selection::Chosen(only));
        }

        let matches = filter_records(self.records, filter);
        match matches.as_slice() {
            [] => Err(GiwoError::NoMatches {
                filter: filter.to_string(),
            }),
            [only] => Ok(Selection::Chosen(*only)),
            _ => pick_numbered(ui, &matches),
        }
    }

    /// Hands the listing to the terminal's fuzzy-select widget
    pub fn select_with_picker(&self, ui: &dyn UserInterface) -> Result<Selection<'a>> {
        match self.records {
            [] => return Err(GiwoError::NoWorktrees),
            [only] => return Ok(Selection::Chosen(only)),
            _ => {}
        }

        let items: Vec<String> = self.records.iter().map(describe_record).collect();
        match ui.fuzzy_select(PROMPT_PICKER, &items)? {
            Some(index) if index < self.records.len() => Ok(Selection::Chosen(&self.records[index])),
            Some(index) => Err(GiwoError::SelectionOutOfRange {
                index: index + 1,
                max: self.records.len(),
            }),
            None => Ok(Selection::Cancelled),
        }
    }
}

fn pick_numbered<'a>(
    ui: &dyn UserInterface,
    candidates: &[&'a WorktreeRecord],
) -> Result<Selection<'a>> {
    ui.show(&MSG_AVAILABLE_WORKTREES.bright_cyan().to_string());
    for (i, record) in candidates.iter().enumerate() {
        ui.show(&format!("  {:>2}. {}", i + 1, describe_record(record)));
    }
    ui.show("");

    let prompt = format!("Select worktree (1-{}, q to quit): ", candidates.len());
    let input = ui.read_line(&prompt)?;
    let input = input.trim();

    if input.is_empty() || is_quit_signal(input) {
        return Ok(Selection::Cancelled);
    }

    let index: usize = input.parse().map_err(|_| GiwoError::InvalidSelection {
        input: input.to_string(),
    })?;
    if index == 0 || index > candidates.len() {
        return Err(GiwoError::SelectionOutOfRange {
            index,
            max: candidates.len(),
        });
    }

    Ok(Selection::Chosen(candidates[index - 1]))
}

/// States of the incremental search loop
#[derive(Debug, Clone, PartialEq, Eq)]
enum FuzzyState {
    AwaitingQuery,
    ShowingResults(String),
    Accepted(usize),
    Cancelled,
}

/// Incremental fuzzy search over a listing
pub struct FuzzyFinder<'a> {
    records: &'a [WorktreeRecord],
    matcher: SkimMatcherV2,
}

impl<'a> FuzzyFinder<'a> {
    pub fn new(records: &'a [WorktreeRecord]) -> Self {
        Self {
            records,
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Ranked matches for `query`
    ///
    /// Substring matches come first in listing order. Only when there are
    /// fewer of them than fit on screen are subsequence matches appended,
    /// up to twice the screen size.
    pub fn search(&self, query: &str) -> Vec<&'a WorktreeRecord> {
        self.search_indices(query)
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }

    fn search_indices(&self, query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        let lowered: Vec<String> = self.records.iter().map(|r| r.branch.to_lowercase()).collect();

        let mut matches: Vec<usize> = lowered
            .iter()
            .enumerate()
            .filter(|(_, branch)| branch.contains(&query))
            .map(|(i, _)| i)
            .collect();

        if matches.len() < FUZZY_MAX_SHOW {
            let overflow = FUZZY_MAX_SHOW * FUZZY_OVERFLOW_FACTOR;
            for (i, branch) in lowered.iter().enumerate() {
                if matches.len() >= overflow {
                    break;
                }
                if !matches.contains(&i) && fuzzy_match(branch, &query) {
                    matches.push(i);
                }
            }
        }

        matches
    }

    /// Char positions of `branch` to highlight for `query`
    ///
    /// A substring hit highlights the contiguous run; otherwise the skim
    /// matcher's positions are used.
    pub fn highlight_positions(&self, branch: &str, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return Vec::new();
        }

        let haystack: Vec<char> = branch.chars().map(lower_char).collect();
        let needle: Vec<char> = query.chars().map(lower_char).collect();
        if needle.len() <= haystack.len() {
            if let Some(start) = haystack
                .windows(needle.len())
                .position(|window| window == needle.as_slice())
            {
                return (start..start + needle.len()).collect();
            }
        }

        self.matcher
            .fuzzy_indices(branch, query)
            .map(|(_, indices)| indices)
            .unwrap_or_default()
    }

    fn render_match(&self, record: &WorktreeRecord, query: &str) -> String {
        let positions = self.highlight_positions(&record.branch, query);
        let branch: String = record
            .branch
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if positions.contains(&i) {
                    c.to_string().bright_yellow().bold().to_string()
                } else {
                    c.to_string()
                }
            })
            .collect();
        describe_with_branch(record, &branch)
    }

    /// Drives the interactive search until a record is accepted or the user quits
    pub fn run(&self, ui: &dyn UserInterface) -> Result<Selection<'a>> {
        match self.records {
            [] => return Err(GiwoError::NoWorktrees),
            [only] => return Ok(Selection::Chosen(only)),
            _ => {}
        }

        self.show_header(ui);
        let mut state = FuzzyState::AwaitingQuery;

        loop {
            state = match state {
                FuzzyState::AwaitingQuery => {
                    let prompt = format!("{ICON_SEARCH} Search: ");
                    FuzzyState::ShowingResults(ui.read_line(&prompt)?)
                }
                FuzzyState::ShowingResults(input) => self.step(ui, input.trim())?,
                FuzzyState::Accepted(index) => return Ok(Selection::Chosen(&self.records[index])),
                FuzzyState::Cancelled => return Ok(Selection::Cancelled),
            };
        }
    }

    fn step(&self, ui: &dyn UserInterface, query: &str) -> Result<FuzzyState> {
        if is_quit_signal(query) {
            return Ok(FuzzyState::Cancelled);
        }

        // Numbers index the unfiltered listing
        if let Ok(number) = query.parse::<usize>() {
            if (1..=self.records.len()).contains(&number) {
                return Ok(FuzzyState::Accepted(number - 1));
            }
            let notice = format!(
                "Invalid number: {number} (range: 1-{})",
                self.records.len()
            );
            ui.show(&notice.red().to_string());
            return Ok(FuzzyState::AwaitingQuery);
        }

        let matches = self.search_indices(query);
        ui.clear();
        self.show_header(ui);

        if matches.is_empty() {
            ui.show(&format!("No worktrees match '{query}'").yellow().to_string());
            return Ok(FuzzyState::AwaitingQuery);
        }

        ui.show(&format!("Matches for '{query}':"));
        for index in matches.iter().take(FUZZY_MAX_SHOW) {
            let record = &self.records[*index];
            ui.show(&format!(
                "  {:>2}. {}",
                index + 1,
                self.render_match(record, query)
            ));
        }
        if matches.len() > FUZZY_MAX_SHOW {
            ui.show(&format!("  ... and {} more", matches.len() - FUZZY_MAX_SHOW));
        }

        if let [only] = matches.as_slice() {
            let prompt = format!(
                "Press Enter to select '{}' or continue typing: ",
                self.records[*only].branch
            );
            let answer = ui.read_line(&prompt)?;
            if answer.trim().is_empty() {
                return Ok(FuzzyState::Accepted(*only));
            }
            return Ok(FuzzyState::ShowingResults(answer));
        }

        Ok(FuzzyState::AwaitingQuery)
    }

    fn show_header(&self, ui: &dyn UserInterface) {
        ui.show(&format!("{ICON_SEARCH} {}", MSG_FUZZY_HEADER.bright_cyan().bold()));
        ui.show(MSG_FUZZY_HELP);
        ui.show("");
        for (i, record) in self.records.iter().enumerate().take(FUZZY_MAX_SHOW) {
            ui.show(&format!("  {:>2}. {}", i + 1, describe_record(record)));
        }
        if self.records.len() > FUZZY_MAX_SHOW {
            ui.show(&format!("  ... and {} more", self.records.len() - FUZZY_MAX_SHOW));
        }
        ui.show("");
    }
}

fn lower_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
