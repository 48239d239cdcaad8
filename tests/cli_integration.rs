//! End-to-end tests driving the built `pd` binary.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn pd_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pd"))
}

/// An isolated home directory with its own config, history, and log file.
struct Sandbox {
    _tmp: TempDir,
    root: PathBuf,
    home: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        Self::with_config("")
    }

    fn with_config(extra: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap();
        let home = root.join("home");
        fs::create_dir_all(&home).unwrap();

        let config = format!(
            "home = {:?}\nhistory_file = {:?}\nlog_file = {:?}\n{extra}",
            home.display().to_string(),
            root.join("state/history").display().to_string(),
            root.join("state/pd.log").display().to_string(),
        );
        fs::write(root.join("config.toml"), config).unwrap();

        Self { _tmp: tmp, root, home }
    }

    fn project(&self, rel: &str) -> PathBuf {
        let dir = self.home.join(rel);
        fs::create_dir_all(dir.join(".git")).unwrap();
        dir
    }

    fn history_path(&self) -> PathBuf {
        self.root.join("state/history")
    }

    fn history(&self) -> Vec<String> {
        fs::read_to_string(self.history_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn run(&self, args: &[&str]) -> Output {
        self.run_in(&self.root, args)
    }

    fn run_in(&self, cwd: &Path, args: &[&str]) -> Output {
        Command::new(pd_bin())
            .args(args)
            .current_dir(cwd)
            .env("PD_CONFIG", self.root.join("config.toml"))
            .env_remove("PD_LOG")
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "pd failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn refresh_records_discovered_projects() {
    let sb = Sandbox::new();
    let alpha = sb.project("alpha");
    let beta = sb.project("src/beta");
    sb.project("Library/ignored");
    sb.project(".hidden/ignored");
    sb.project("alpha/nested");

    let output = sb.run(&["--refresh"]);

    assert_eq!(stdout(&output), "");
    assert!(String::from_utf8_lossy(&output.stderr).contains("found 2 projects"));
    assert_eq!(
        sb.history(),
        vec![
            format!("1,{},alpha,", alpha.display()),
            format!("1,{},beta,src", beta.display()),
        ]
    );
}

#[test]
fn list_shows_home_first_then_ranked_labels() {
    let sb = Sandbox::new();
    let alpha = sb.project("alpha");
    let beta = sb.project("src/beta");
    fs::create_dir_all(sb.history_path().parent().unwrap()).unwrap();
    fs::write(
        sb.history_path(),
        format!("1,{},alpha,\n5,{},beta,src\n", alpha.display(), beta.display()),
    )
    .unwrap();

    assert_eq!(stdout(&sb.run(&["--list"])), "~\nbeta ~/src\nalpha ~\n");

    let json: serde_json::Value = serde_json::from_str(&stdout(&sb.run(&["--list", "--json"]))).unwrap();
    assert_eq!(json[0]["name"], "beta");
    assert_eq!(json[0]["count"], 5);
    assert_eq!(json.as_array().map(Vec::len), Some(2));
}

#[test]
fn jumping_to_a_path_prints_it_and_records_a_visit() {
    let sb = Sandbox::new();
    let alpha = sb.project("alpha");
    sb.run(&["--refresh"]);

    let out = stdout(&sb.run(&[alpha.to_str().unwrap()]));
    assert_eq!(out.trim_end(), alpha.display().to_string());

    let out = stdout(&sb.run_in(&sb.home, &["alpha"]));
    assert_eq!(out.trim_end(), alpha.display().to_string());

    assert_eq!(sb.history(), vec![format!("3,{},alpha,", alpha.display())]);
}

#[test]
fn jumping_to_a_file_uses_its_directory() {
    let sb = Sandbox::new();
    let notes = sb.project("notes");
    fs::write(notes.join("todo.md"), "- [ ] ship").unwrap();

    let out = stdout(&sb.run(&[notes.join("todo.md").to_str().unwrap()]));

    assert_eq!(out.trim_end(), notes.display().to_string());
    assert_eq!(sb.history(), vec![format!("1,{},notes,", notes.display())]);
}

#[test]
fn home_and_dir_stack_references_pass_through_unrecorded() {
    let sb = Sandbox::new();

    assert_eq!(stdout(&sb.run(&["~"])).trim_end(), sb.home.display().to_string());
    assert_eq!(stdout(&sb.run(&["-2"])), "-2\n");
    assert_eq!(stdout(&sb.run(&["-"])), "-\n");
    assert_eq!(stdout(&sb.run(&["+1"])), "+1\n");
    assert!(!sb.history_path().exists());
}

#[test]
fn sync_aggregates_duplicates_and_drops_vanished_directories() {
    let sb = Sandbox::new();
    let alpha = sb.project("alpha");
    let gone = sb.home.join("gone");
    fs::create_dir_all(sb.history_path().parent().unwrap()).unwrap();
    fs::write(
        sb.history_path(),
        format!(
            "2,{a},alpha,\n1,{g},gone,\nnot a record\n3,{a},alpha,\n",
            a = alpha.display(),
            g = gone.display()
        ),
    )
    .unwrap();

    let output = sb.run(&["--sync"]);

    assert_eq!(stdout(&output), "");
    assert_eq!(sb.history(), vec![format!("5,{},alpha,", alpha.display())]);
}

#[test]
fn query_jumps_to_the_best_match() {
    let sb = Sandbox::new();
    let dotfiles = sb.project("src/dotfiles");
    sb.project("src/website");
    sb.run(&["--refresh"]);

    let out = stdout(&sb.run(&["-q", "dotf"]));

    assert_eq!(out.trim_end(), dotfiles.display().to_string());
}

#[test]
fn preview_reports_missing_directories() {
    let sb = Sandbox::new();
    let out = stdout(&sb.run(&["--fzf-preview", "nowhere ~/src"]));
    assert_eq!(out, "Directory does not exist.\n");
}

#[cfg(unix)]
#[test]
fn cancelled_selection_prints_the_current_directory() {
    let sb = Sandbox::with_config("finder = \"false\"\n");
    sb.project("alpha");
    let cwd = sb.project("elsewhere");

    let out = stdout(&sb.run_in(&cwd, &[]));

    assert_eq!(out.trim_end(), cwd.display().to_string());
    // The first interactive run discovers projects before selecting.
    assert_eq!(sb.history().len(), 2);
}

#[test]
fn missing_finder_is_reported_as_an_error() {
    let sb = Sandbox::with_config("finder = \"pd-test-no-such-finder\"\n");
    fs::create_dir_all(sb.history_path().parent().unwrap()).unwrap();
    fs::write(sb.history_path(), "").unwrap();

    let output = sb.run(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("pd: "));
}

#[test]
fn invalid_config_fails_with_a_message() {
    let sb = Sandbox::with_config("unknown_key = 1\n");

    let output = sb.run(&["--list"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("config.toml"));
}

#[test]
fn history_flag_overrides_the_configured_file() {
    let sb = Sandbox::new();
    let alpha = sb.project("alpha");
    let custom = sb.root.join("custom-history");

    sb.run(&["--history", custom.to_str().unwrap(), alpha.to_str().unwrap()]);

    assert!(!sb.history_path().exists());
    assert_eq!(
        fs::read_to_string(custom).unwrap(),
        format!("1,{},alpha,\n", alpha.display())
    );
}

#[test]
fn diagnostics_go_to_the_log_file_not_stdout() {
    let sb = Sandbox::new();
    sb.project("alpha");

    let output = Command::new(pd_bin())
        .arg("--refresh")
        .current_dir(&sb.root)
        .env("PD_CONFIG", sb.root.join("config.toml"))
        .env("PD_LOG", "debug")
        .output()
        .unwrap();

    assert_eq!(stdout(&output), "");
    let log = fs::read_to_string(sb.root.join("state/pd.log")).unwrap();
    assert!(log.contains("history refreshed"));
}
