//! Command handling.
//!
//! Every invocation of the binary maps to exactly one [`Command`]. The handler
//! runs it against an [`App`] and returns an [`Outcome`] describing what to
//! print. At most one read-modify-write cycle touches the history per command.
//!
//! Soft failures never surface as errors here: a cancelled selection, a label
//! that cannot be mapped back to a path, or a query with no match all become
//! [`Outcome::Stay`].
//!
//! # Example
//!
//! ```no_run
//! use pd::app::{handle_command, App, Command, Outcome};
//! use pd::Config;
//!
//! let mut app = App::from_config(Config::load(None)?);
//! if let Outcome::Jump(path) = handle_command(&mut app, &Command::Query("dotfiles".into()))? {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), pd::PdError>(())
//! ```

use super::{App, Outcome};
use crate::domain::error::{PdError, Result};
use crate::infrastructure::{containing_directory, expand, paths, preview, resolve_symlinks};
use crate::storage::LogRecord;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Directory stack references understood by `cd`/`pushd`: `-`, `-2`, `+1`.
const DIR_STACK_PATTERN: &str = r"\A[-+][0-9]*\z";

fn dir_stack_regex() -> &'static Regex {
    static DIR_STACK: OnceLock<Regex> = OnceLock::new();
    DIR_STACK.get_or_init(|| Regex::new(DIR_STACK_PATTERN).expect("directory stack pattern is a valid regex"))
}

/// One unit of work requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pick from the ranked history with the interactive selector.
    Select,

    /// Jump to a path typed by the user.
    Jump(String),

    /// Jump to the best fuzzy match for a pattern, without a selector.
    Query(String),

    /// Walk home for projects and fold them into the history.
    Refresh,

    /// Re-rank the history and drop vanished paths, without walking.
    Sync,

    /// Render the preview pane for a label printed by the selector.
    Preview(String),

    /// Print the ranked history.
    List {
        /// Serialize records as JSON instead of printing labels.
        json: bool,
    },
}

/// Runs `command` and reports what the binary should print.
///
/// # Errors
///
/// Returns resolution, history, and selector failures. Decode failures and
/// cancellations are converted into [`Outcome::Stay`] instead.
pub fn handle_command(app: &mut App, command: &Command) -> Result<Outcome> {
    let _span = tracing::debug_span!("handle_command", command = ?command).entered();

    match command {
        Command::Select => select(app),
        Command::Jump(target) => jump(app, target),
        Command::Query(pattern) => query(app, pattern),
        Command::Refresh => refresh(app),
        Command::Sync => {
            let written = app.storage.rerank(&app.codec)?;
            tracing::info!(written, "history re-ranked");
            Ok(Outcome::Synced { written })
        }
        Command::Preview(label) => Ok(Outcome::Preview(preview_label(app, label))),
        Command::List { json } => list(app, *json),
    }
}

fn refresh(app: &mut App) -> Result<Outcome> {
    let discovered = app.discover();
    let written = app.storage.refresh(&app.codec, &discovered)?;
    tracing::info!(discovered = discovered.len(), written, "history refreshed");
    Ok(Outcome::Refreshed {
        discovered: discovered.len(),
        written,
    })
}

fn select(app: &mut App) -> Result<Outcome> {
    if !app.storage.is_initialized() {
        tracing::info!("no history yet, discovering projects first");
        refresh(app)?;
    }

    let ranked = app.ranked()?;
    let menu = app.menu(&ranked);

    let Some(selection) = app.selector.select(&menu.labels)? else {
        return stay(app);
    };

    let path = match menu.index.resolve(&selection) {
        Some(path) => path.to_path_buf(),
        None => match app.codec.decode(&selection) {
            Ok(path) => path,
            Err(e) if e.is_soft() => {
                tracing::warn!(selection = %selection, error = %e, "selection does not map to a directory");
                return stay(app);
            }
            Err(e) => return Err(e),
        },
    };

    visit(app, path)
}

fn jump(app: &mut App, target: &str) -> Result<Outcome> {
    let target = target.trim();

    if target == "~" {
        return Ok(Outcome::Jump(app.config.home.clone()));
    }
    if is_dir_stack_reference(target) {
        tracing::debug!(target, "passing directory stack reference through");
        return Ok(Outcome::Echo(target.to_string()));
    }

    let mut path = expand(target, &app.config.home)?;
    if paths::exists(&path) {
        path = resolve_symlinks(&path)?;
    }
    visit(app, containing_directory(&path))
}

fn query(app: &mut App, pattern: &str) -> Result<Outcome> {
    let ranked = app.ranked()?;
    match best_match(app, &ranked, pattern) {
        Some(record) => {
            let path = PathBuf::from(&record.absolute_path);
            visit(app, path)
        }
        None => {
            tracing::debug!(pattern, "no history entry matches");
            stay(app)
        }
    }
}

/// Highest scoring record for `pattern`; on equal scores the higher ranked
/// record wins.
fn best_match<'a>(app: &App, ranked: &'a [LogRecord], pattern: &str) -> Option<&'a LogRecord> {
    let matcher = SkimMatcherV2::default();
    let mut best: Option<(i64, &LogRecord)> = None;

    for record in ranked {
        let label = app.codec.to_label(record);
        let Some(score) = matcher.fuzzy_match(&label, pattern) else {
            continue;
        };
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, record));
        }
    }

    best.map(|(_, record)| record)
}

fn visit(app: &mut App, path: PathBuf) -> Result<Outcome> {
    let key = path.to_string_lossy();
    if app.storage.record_visit(&app.codec, &key)? {
        tracing::debug!(path = %key, "visit recorded");
    }
    Ok(Outcome::Jump(path))
}

fn stay(app: &App) -> Result<Outcome> {
    app.current_dir().map(Outcome::Stay)
}

fn preview_label(app: &App, label: &str) -> String {
    match app.codec.decode(label) {
        Ok(path) => preview(&path, &app.listing),
        Err(e) => {
            tracing::debug!(label, error = %e, "cannot preview label");
            e.to_string()
        }
    }
}

fn list(app: &App, json: bool) -> Result<Outcome> {
    let ranked = app.ranked()?;

    if json {
        let persisted: Vec<&LogRecord> = ranked.iter().filter(|r| !r.is_home_sentinel()).collect();
        let text = serde_json::to_string_pretty(&persisted).map_err(|e| PdError::Io(e.into()))?;
        return Ok(Outcome::Listing(vec![text]));
    }

    Ok(Outcome::Listing(
        ranked.iter().map(|record| app.codec.to_label(record)).collect(),
    ))
}

/// Returns `true` for directory stack references such as `-`, `-2`, or `+1`.
#[must_use]
pub fn is_dir_stack_reference(target: &str) -> bool {
    dir_stack_regex().is_match(target.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LabelCodec;
    use crate::infrastructure::{ListingTool, Selector};
    use crate::storage::{HistoryFile, Storage};
    use crate::Config;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Returns a fixed answer and remembers what it was shown.
    #[derive(Clone, Default)]
    struct Scripted {
        answer: Option<String>,
        shown: Rc<RefCell<Vec<String>>>,
    }

    impl Scripted {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Some(answer.to_string()),
                ..Self::default()
            }
        }
    }

    impl Selector for Scripted {
        fn select(&self, labels: &[String]) -> Result<Option<String>> {
            self.shown.borrow_mut().extend(labels.iter().cloned());
            Ok(self.answer.clone())
        }
    }

    struct Fixture {
        tmp: TempDir,
        home: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let home = fs::canonicalize(tmp.path()).unwrap().join("home");
            fs::create_dir(&home).unwrap();
            Self { tmp, home }
        }

        /// `home` is a symlink to `real_home`; configuration names the link.
        #[cfg(unix)]
        fn with_linked_home() -> (Self, PathBuf) {
            let tmp = TempDir::new().unwrap();
            let real = fs::canonicalize(tmp.path()).unwrap().join("real_home");
            fs::create_dir(&real).unwrap();
            let home = tmp.path().join("home");
            std::os::unix::fs::symlink(&real, &home).unwrap();
            (Self { tmp, home }, real)
        }

        fn history_path(&self) -> PathBuf {
            self.tmp.path().join("state/history")
        }

        fn project(&self, rel: &str) -> PathBuf {
            let dir = self.home.join(rel);
            fs::create_dir_all(dir.join(".git")).unwrap();
            dir
        }

        fn config(&self) -> Config {
            Config::from_toml_str(&format!(
                "home = {:?}\nhistory_file = {:?}\nskip_dirs = [\"~/skipped\"]",
                self.home.display().to_string(),
                self.history_path().display().to_string(),
            ))
            .unwrap()
        }

        fn app(&self, selector: Scripted) -> App {
            App::new(
                self.config(),
                Box::new(HistoryFile::new(self.history_path())),
                Box::new(selector),
            )
            .with_listing(vec![ListingTool::new("pd-test-no-such-lister", &[])])
        }

        fn seed(&self, lines: &[String]) {
            fs::create_dir_all(self.history_path().parent().unwrap()).unwrap();
            let text: String = lines.iter().map(|line| format!("{line}\n")).collect();
            fs::write(self.history_path(), text).unwrap();
        }

        fn history(&self) -> Vec<String> {
            fs::read_to_string(self.history_path())
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }

        fn counts(&self) -> Vec<(String, u64)> {
            HistoryFile::new(self.history_path())
                .read_all()
                .unwrap()
                .into_values()
                .map(|r| (r.name, r.count))
                .collect()
        }
    }

    #[test]
    fn select_discovers_projects_on_first_run() {
        let fx = Fixture::new();
        fx.project("alpha");
        fx.project("skipped/beta");
        let selector = Scripted::default();
        let mut app = fx.app(selector.clone());

        let outcome = handle_command(&mut app, &Command::Select).unwrap();

        assert!(matches!(outcome, Outcome::Stay(_)));
        let shown: Vec<String> = selector.shown.borrow().iter().map(|l| crate::ui::strip_ansi(l)).collect();
        assert_eq!(shown, vec!["~", "alpha ~"]);
        assert_eq!(fx.history().len(), 1);
    }

    #[test]
    fn select_records_a_visit_for_the_chosen_label() {
        let fx = Fixture::new();
        let pd = fx.project("src/pd");
        let other = fx.project("other");
        fx.seed(&[
            format!("4,{},other,", other.display()),
            format!("1,{},pd,src", pd.display()),
        ]);
        let mut app = fx.app(Scripted::answering("pd ~/src"));

        let outcome = handle_command(&mut app, &Command::Select).unwrap();

        assert_eq!(outcome, Outcome::Jump(pd));
        let mut counts = fx.counts();
        counts.sort();
        assert_eq!(counts, vec![("other".to_string(), 4), ("pd".to_string(), 2)]);
    }

    #[test]
    fn select_resolves_ambiguous_labels_through_the_index() {
        let fx = Fixture::new();
        let odd = fx.project("a ~b");
        fx.seed(&[format!("1,{},a ~b,", odd.display())]);
        let mut app = fx.app(Scripted::answering("a ~b ~"));

        let outcome = handle_command(&mut app, &Command::Select).unwrap();

        assert_eq!(outcome, Outcome::Jump(odd));
    }

    #[test]
    fn select_falls_back_to_decoding_unknown_labels() {
        let fx = Fixture::new();
        fx.seed(&[]);
        let target = fx.project("src/late");
        let mut app = fx.app(Scripted::answering("late ~/src"));

        let outcome = handle_command(&mut app, &Command::Select).unwrap();

        assert_eq!(outcome, Outcome::Jump(target));
    }

    #[test]
    fn cancelled_or_undecodable_selection_stays_put() {
        let fx = Fixture::new();
        fx.seed(&[]);
        let cwd = std::env::current_dir().unwrap();

        let mut cancelled = fx.app(Scripted::default());
        assert_eq!(handle_command(&mut cancelled, &Command::Select).unwrap(), Outcome::Stay(cwd.clone()));

        let mut garbled = fx.app(Scripted::answering("no separator here"));
        assert_eq!(handle_command(&mut garbled, &Command::Select).unwrap(), Outcome::Stay(cwd));
        assert!(fx.history().is_empty());
    }

    #[test]
    fn choosing_home_is_never_recorded() {
        let fx = Fixture::new();
        fx.seed(&[]);
        let mut app = fx.app(Scripted::answering("~"));

        let outcome = handle_command(&mut app, &Command::Select).unwrap();

        assert_eq!(outcome, Outcome::Jump(fx.home.clone()));
        assert!(fx.history().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_home_keeps_one_record_per_directory() {
        let (fx, real) = Fixture::with_linked_home();
        fx.project("alpha");
        let mut app = fx.app(Scripted::default());

        handle_command(&mut app, &Command::Refresh).unwrap();
        let home = handle_command(&mut app, &Command::Jump("~/".into())).unwrap();
        let alpha = handle_command(&mut app, &Command::Jump("~/alpha".into())).unwrap();

        assert_eq!(home, Outcome::Jump(real.clone()));
        assert_eq!(alpha, Outcome::Jump(real.join("alpha")));
        assert_eq!(
            fx.history(),
            vec![format!("2,{},alpha,", real.join("alpha").display())]
        );
    }

    #[test]
    fn jump_records_the_containing_directory_of_files() {
        let fx = Fixture::new();
        let dir = fx.project("notes");
        fs::write(dir.join("todo.md"), "").unwrap();
        let mut app = fx.app(Scripted::default());

        let target = dir.join("todo.md").display().to_string();
        let outcome = handle_command(&mut app, &Command::Jump(target)).unwrap();

        let resolved = fs::canonicalize(&dir).unwrap();
        assert_eq!(outcome, Outcome::Jump(resolved.clone()));
        assert_eq!(fx.counts(), vec![("notes".to_string(), 1)]);
    }

    #[test]
    fn jump_accepts_directories_that_do_not_exist_yet() {
        let fx = Fixture::new();
        let mut app = fx.app(Scripted::default());

        let outcome = handle_command(&mut app, &Command::Jump("~/later/../soon".into())).unwrap();

        assert_eq!(outcome, Outcome::Jump(fx.home.join("soon")));
        assert!(fx.history().is_empty());
    }

    #[test]
    fn jump_passes_home_and_dir_stack_references_through() {
        let fx = Fixture::new();
        let mut app = fx.app(Scripted::default());

        assert_eq!(
            handle_command(&mut app, &Command::Jump("~".into())).unwrap(),
            Outcome::Jump(fx.home.clone())
        );
        for reference in ["-", "-2", "+1"] {
            assert_eq!(
                handle_command(&mut app, &Command::Jump(reference.into())).unwrap(),
                Outcome::Echo(reference.to_string())
            );
        }
        assert!(fx.history().is_empty());
    }

    #[test]
    fn query_picks_the_best_match_and_prefers_higher_rank_on_ties() {
        let fx = Fixture::new();
        let busy = fx.project("work/pd");
        let idle = fx.project("play/pd");
        fx.seed(&[
            format!("1,{},pd,play", idle.display()),
            format!("9,{},pd,work", busy.display()),
        ]);
        let mut app = fx.app(Scripted::default());

        let outcome = handle_command(&mut app, &Command::Query("pd".into())).unwrap();

        assert_eq!(outcome, Outcome::Jump(busy));
    }

    #[test]
    fn query_without_match_stays_put() {
        let fx = Fixture::new();
        fx.seed(&[]);
        let mut app = fx.app(Scripted::default());

        let outcome = handle_command(&mut app, &Command::Query("zzzzqqq".into())).unwrap();

        assert_eq!(outcome, Outcome::Stay(std::env::current_dir().unwrap()));
    }

    #[test]
    fn refresh_reports_counts_and_sync_reranks() {
        let fx = Fixture::new();
        let alpha = fx.project("alpha");
        fx.project("beta");
        let mut app = fx.app(Scripted::default());

        assert_eq!(
            handle_command(&mut app, &Command::Refresh).unwrap(),
            Outcome::Refreshed { discovered: 2, written: 2 }
        );

        let mut lines = fx.history();
        lines.push(format!("3,{},alpha,", alpha.display()));
        fx.seed(&lines);
        assert_eq!(
            handle_command(&mut app, &Command::Sync).unwrap(),
            Outcome::Synced { written: 2 }
        );
        assert_eq!(fx.history()[0], format!("4,{},alpha,", alpha.display()));
    }

    #[test]
    fn list_prints_plain_labels_with_home_first() {
        let fx = Fixture::new();
        let pd = fx.project("src/pd");
        fx.seed(&[format!("2,{},pd,src", pd.display())]);
        let mut app = fx.app(Scripted::default());

        assert_eq!(
            handle_command(&mut app, &Command::List { json: false }).unwrap(),
            Outcome::Listing(vec!["~".into(), "pd ~/src".into()])
        );
    }

    #[test]
    fn list_json_serializes_persisted_records() {
        let fx = Fixture::new();
        let pd = fx.project("src/pd");
        fx.seed(&[format!("2,{},pd,src", pd.display())]);
        let mut app = fx.app(Scripted::default());

        let Outcome::Listing(lines) = handle_command(&mut app, &Command::List { json: true }).unwrap() else {
            panic!("expected a listing");
        };
        let records: Vec<LogRecord> = serde_json::from_str(&lines[0]).unwrap();
        let mut expected = LabelCodec::new(&fx.home).build_record(&pd.display().to_string());
        expected.count = 2;
        assert_eq!(records, vec![expected]);
    }

    #[test]
    fn preview_decodes_labels_from_the_selector() {
        let fx = Fixture::new();
        fx.project("src/pd");
        let mut app = fx.app(Scripted::default());

        let Outcome::Preview(text) = handle_command(&mut app, &Command::Preview("pd ~/src".into())).unwrap() else {
            panic!("expected a preview");
        };
        assert_eq!(text, crate::infrastructure::listing::UNLISTABLE_MESSAGE);

        let Outcome::Preview(missing) = handle_command(&mut app, &Command::Preview("gone ~".into())).unwrap() else {
            panic!("expected a preview");
        };
        assert_eq!(missing, crate::infrastructure::listing::MISSING_MESSAGE);
    }

    #[test]
    fn recognizes_dir_stack_references() {
        assert!(is_dir_stack_reference("-"));
        assert!(is_dir_stack_reference(" +12 "));
        assert!(!is_dir_stack_reference("-x"));
        assert!(!is_dir_stack_reference("--2"));
    }
}
