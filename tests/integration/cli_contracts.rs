use clap::Parser;
use fsindex::tooling::{Cli, CliContext, Commands};
use fsindex::ApiError;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("fsindex.toml"),
        "[storage]\nroot_dir = \"files\"\nstore_path = \"meta/store\"\n",
    )
    .unwrap();
    temp
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("fsindex").chain(args.iter().copied())).unwrap()
}

fn run(context: &CliContext, args: &[&str]) -> Result<String, ApiError> {
    context.execute(&parse(args).command)
}

fn initialized(workspace: &Path) -> CliContext {
    let context = CliContext::new(workspace.to_path_buf(), None).unwrap();
    run(&context, &["init"]).unwrap();
    context
}

#[test]
fn parses_defaults() {
    let cli = parse(&["ls"]);
    match cli.command {
        Commands::Ls {
            path,
            no_parent,
            format,
        } => {
            assert_eq!(path, "/");
            assert!(!no_parent);
            assert_eq!(format, "text");
        }
        _ => panic!("expected ls"),
    }
    assert!(!cli.verbose);
    assert_eq!(cli.workspace, Path::new("."));
}

#[test]
fn rejects_missing_arguments() {
    assert!(Cli::try_parse_from(["fsindex", "mkdir", "/"]).is_err());
    assert!(Cli::try_parse_from(["fsindex", "put", "/"]).is_err());
    assert!(Cli::try_parse_from(["fsindex", "frobnicate"]).is_err());
}

#[test]
fn logging_flags_override_config() {
    let cli = parse(&["--verbose", "--log-format", "json", "check"]);
    let config = cli.logging_config(Default::default());
    assert_eq!(config.level, "debug");
    assert_eq!(config.output, "stderr");
    assert_eq!(config.format, "json");
}

#[test]
fn config_paths_stay_in_workspace() {
    let ws = workspace();
    let context = initialized(ws.path());
    assert!(ws.path().join("files").is_dir());
    assert!(ws.path().join("meta").join("store").exists());

    let rendered = run(&context, &["config"]).unwrap();
    assert!(rendered.contains("root_dir = \"files\""));
}

#[test]
fn mkdir_put_ls_cat_round() {
    let ws = workspace();
    let context = initialized(ws.path());

    let created: Value =
        serde_json::from_str(&run(&context, &["mkdir", "/", "docs", "--format", "json"]).unwrap())
            .unwrap();
    assert_eq!(created["name"], "docs");
    assert_eq!(created["path"], "/docs");
    assert_eq!(created["type"], "dir");

    let source = ws.path().join("notes.txt");
    std::fs::write(&source, "hello index").unwrap();
    let source_arg = source.to_str().unwrap();
    for expected in ["notes.txt", "notes (1).txt"] {
        let uploaded: Value = serde_json::from_str(
            &run(&context, &["put", "/docs", source_arg, "--format", "json"]).unwrap(),
        )
        .unwrap();
        assert_eq!(uploaded["name"], expected);
        assert_eq!(uploaded["type"], "file");
    }

    let listed: Value =
        serde_json::from_str(&run(&context, &["ls", "/docs", "--format", "json"]).unwrap())
            .unwrap();
    let entries = listed.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries
        .iter()
        .any(|e| e["name"] == ".." && e["path"] == "/" && e["type"] == "dir"));

    let listed: Value = serde_json::from_str(
        &run(&context, &["ls", "/docs", "--no-parent", "--format", "json"]).unwrap(),
    )
    .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 2);

    assert_eq!(
        run(&context, &["cat", "/docs/notes (1).txt"]).unwrap(),
        "hello index"
    );
    assert!(run(&context, &["check"]).is_ok());
}

#[test]
fn errors_carry_their_class() {
    let ws = workspace();
    let context = initialized(ws.path());
    run(&context, &["mkdir", "/", "a"]).unwrap();

    assert!(matches!(
        run(&context, &["mkdir", "/", "a"]),
        Err(ApiError::PathAlreadyExists(_))
    ));
    assert!(matches!(
        run(&context, &["ls", "/missing"]),
        Err(ApiError::PathNotFound(_))
    ));
    assert!(matches!(
        run(&context, &["cat", "/a"]),
        Err(ApiError::NotAFile(_))
    ));
}

#[test]
fn check_fails_after_out_of_band_delete() {
    let ws = workspace();
    let context = initialized(ws.path());
    run(&context, &["mkdir", "/", "victim"]).unwrap();
    std::fs::remove_dir(ws.path().join("files").join("victim")).unwrap();

    match run(&context, &["check", "--format", "json"]) {
        Err(ApiError::IntegrityFault(rendered)) => {
            let report: Value = serde_json::from_str(&rendered).unwrap();
            assert_eq!(report["issues"][0]["path"], "/victim");
            assert_eq!(report["issues"][0]["problem"], "missing_on_disk");
        }
        other => panic!("expected integrity fault, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn init_is_idempotent_across_contexts() {
    let ws = workspace();
    {
        let context = initialized(ws.path());
        run(&context, &["mkdir", "/", "kept"]).unwrap();
    }
    let context = initialized(ws.path());
    let stat: Value =
        serde_json::from_str(&run(&context, &["stat", "/kept", "--format", "json"]).unwrap())
            .unwrap();
    assert_eq!(stat["full_path"], "/kept");
    assert_eq!(stat["kind"], "dir");
}

#[test]
fn config_loads_before_storage_is_touched() {
    let ws = workspace();
    let config = CliContext::load_config(ws.path(), None).unwrap();
    assert_eq!(config.storage.root_dir, Path::new("files"));
    assert!(!ws.path().join("files").exists());
    assert!(!ws.path().join("meta").exists());

    let context = CliContext::with_config(ws.path().to_path_buf(), config).unwrap();
    assert!(ws.path().join("files").is_dir());
    run(&context, &["init"]).unwrap();
    assert!(run(&context, &["ls", "/"]).is_ok());
}

#[test]
fn explicit_config_file_is_used() {
    let ws = TempDir::new().unwrap();
    let config_path = ws.path().join("custom.toml");
    std::fs::write(
        &config_path,
        "[storage]\nroot_dir = \"elsewhere\"\nstore_path = \"db\"\n",
    )
    .unwrap();

    let config = CliContext::load_config(ws.path(), Some(&config_path)).unwrap();
    assert_eq!(config.storage.root_dir, Path::new("elsewhere"));
}
