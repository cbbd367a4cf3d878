// tests/config_loading.rs

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use tempfile::{NamedTempFile, TempDir};

use styledag::cli::CliArgs;
use styledag::config::{load_and_validate, load_or_default, ConfigFile};
use styledag::errors::StyledagError;
use styledag::types::{OutputStyle, TriggerWhileRunningBehaviour};
use styledag_test_utils::builders::ConfigFileBuilder;
use styledag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn defaults_reproduce_the_original_build_file() {
    let cfg = ConfigFile::default();

    assert_eq!(cfg.styles().sources, vec!["*.scss", "badexample/*.scss"]);
    assert_eq!(cfg.styles().output_style, OutputStyle::Expanded);
    assert_eq!(cfg.styles().indent_width, 4);
    assert_eq!(cfg.styles().browsers, vec!["last 2 versions"]);
    assert!(cfg.styles().source_maps);
    assert_eq!(cfg.clean().patterns, vec!["**/*.map"]);
    assert!(cfg.clean().force);
    assert_eq!(cfg.watch().patterns, vec!["**/*.scss"]);
    assert_eq!(
        cfg.watch().triggered_while_running_behaviour,
        TriggerWhileRunningBehaviour::Queue
    );
    assert_eq!(cfg.watch().queue_length, 1);
    assert_eq!(cfg.notify().success_message, "Styles compiled");
    assert_eq!(cfg.notify().error_subtitle, "Error in CSS File");
}

#[test]
fn demo_config_loads() -> TestResult {
    init_tracing();

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/Styledag.toml"))?;

    assert_eq!(cfg.watch().exclude, vec!["node_modules/**"]);
    assert!(cfg.notify().on_last);
    Ok(())
}

#[test]
fn empty_file_means_defaults() -> TestResult {
    let file = write_config("");
    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.styles().indent_width, 4);
    assert_eq!(cfg.clean().patterns, vec!["**/*.map"]);
    Ok(())
}

#[test]
fn partial_sections_keep_other_defaults() -> TestResult {
    let file = write_config(
        r#"
[styles]
output_style = "compressed"

[watch]
triggered_while_running_behaviour = "overlap"
"#,
    );
    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.styles().output_style, OutputStyle::Compressed);
    assert_eq!(cfg.styles().sources, vec!["*.scss", "badexample/*.scss"]);
    assert_eq!(
        cfg.watch().triggered_while_running_behaviour,
        TriggerWhileRunningBehaviour::Overlap
    );
    Ok(())
}

#[test]
fn indent_width_out_of_range_is_a_config_error() {
    for width in [0, 11] {
        let raw = ConfigFileBuilder::new().indent_width(width).raw();
        match ConfigFile::try_from(raw) {
            Err(StyledagError::ConfigError(msg)) => assert!(msg.contains("indent_width")),
            other => panic!("expected ConfigError for width {width}, got {other:?}"),
        }
    }
}

#[test]
fn zero_queue_length_is_a_config_error() {
    let raw = ConfigFileBuilder::new().queue_length(0).raw();
    match ConfigFile::try_from(raw) {
        Err(StyledagError::ConfigError(msg)) => assert!(msg.contains("queue_length")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn invalid_glob_is_a_config_error() {
    let raw = ConfigFileBuilder::new().sources(&["src/[.scss"]).raw();
    match ConfigFile::try_from(raw) {
        Err(StyledagError::ConfigError(msg)) => assert!(msg.contains("[styles].sources")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn unknown_behaviour_fails_to_parse() {
    let file = write_config(
        r#"
[watch]
triggered_while_running_behaviour = "sometimes"
"#,
    );
    match load_and_validate(file.path()) {
        Err(StyledagError::TomlError(_)) => {}
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn missing_default_config_falls_back_to_defaults() -> TestResult {
    let dir = TempDir::new()?;
    let cfg = load_or_default(None, dir.path())?;
    assert_eq!(cfg.styles().indent_width, 4);
    Ok(())
}

#[test]
fn config_in_root_is_picked_up() -> TestResult {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("Styledag.toml"), "[styles]\nindent_width = 2\n")?;

    let cfg = load_or_default(None, dir.path())?;
    assert_eq!(cfg.styles().indent_width, 2);
    Ok(())
}

#[test]
fn missing_explicit_config_is_an_error() -> TestResult {
    let dir = TempDir::new()?;
    let missing = dir.path().join("nope.toml");

    let err = load_or_default(Some(&missing), dir.path()).unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("nope.toml"));
    Ok(())
}

#[tokio::test]
async fn unknown_task_is_reported_before_the_config_is_read() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("Styledag.toml"), "[styles\nbroken = ")?;

    let args = CliArgs {
        task: Some("nope".to_string()),
        config: None,
        root: Some(dir.path().to_path_buf()),
        log_level: None,
        no_notify: true,
        dry_run: false,
    };
    let err = styledag::run(args).await.unwrap_err();

    assert!(matches!(err, StyledagError::UnknownTask(ref name) if name == "nope"), "{err}");
    Ok(())
}
