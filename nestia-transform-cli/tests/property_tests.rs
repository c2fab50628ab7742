//! Property-based tests for nestia-transform-cli.
//!
//! Properties tested:
//! - Property 1: Snapshot Discovery Completeness
//! - Property 2: Filter Pattern Correctness
//! - Property 3: Config Override Precedence
//! - Property 4: Dry Run Safety
//! - Property 5: Output Paths Mirror Input Layout

use proptest::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use nestia_transform::StringifyMode;
use nestia_transform_cli::{
    config::{CliArgs, ConfigManager, OutputFormat},
    loader::SnapshotLoader,
    runner::TransformRunner,
    scanner::SnapshotScanner,
    writer::FileWriter,
};

// =============================================================================
// Generators for property tests
// =============================================================================

/// Generate a controller-like file stem.
fn arb_stem() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,10}Controller"
}

fn arb_mode() -> impl Strategy<Value = StringifyMode> {
    prop::sample::select(StringifyMode::ALL.to_vec())
}

fn arb_format() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![Just(OutputFormat::Json), Just(OutputFormat::Typescript)]
}

/// A snapshot with no classes, named after its stem.
fn empty_snapshot(stem: &str) -> String {
    format!(
        r#"{{ "source": {{ "file_name": "/app/src/controllers/{}.ts", "classes": [] }} }}"#,
        stem
    )
}

fn create_test_directory(files: &[(String, String)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
    dir
}

// =============================================================================
// Property 1: Snapshot Discovery Completeness
//
// Every *.nestia.json file below the root is discovered, at any depth, and
// nothing else is.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// **Property 1: Snapshot Discovery Completeness**
    #[test]
    fn prop_snapshot_discovery_completeness(
        stems in prop::collection::hash_set(arb_stem(), 1..8),
        depth in 1usize..4,
    ) {
        let mut expected = HashSet::new();
        let mut files = Vec::new();

        for (i, stem) in stems.iter().enumerate() {
            let subdir = (0..(i % depth))
                .map(|j| format!("dir{}", j))
                .collect::<Vec<_>>()
                .join("/");
            let path = if subdir.is_empty() {
                format!("{}.nestia.json", stem)
            } else {
                format!("{}/{}.nestia.json", subdir, stem)
            };
            expected.insert(path.clone());
            files.push((path, empty_snapshot(stem)));
        }

        // Not snapshots
        files.push(("package.json".to_string(), "{}".to_string()));
        files.push(("src/main.ts".to_string(), "export {}".to_string()));

        let dir = create_test_directory(&files);
        let found: HashSet<_> = SnapshotScanner::new(dir.path())
            .scan()
            .unwrap()
            .into_iter()
            .map(|f| f.relative_path.to_string_lossy().replace('\\', "/"))
            .collect();

        prop_assert_eq!(found, expected);
    }
}

// =============================================================================
// Property 2: Filter Pattern Correctness
//
// With a filter, exactly the snapshots whose relative path matches it are
// returned.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// **Property 2: Filter Pattern Correctness**
    #[test]
    fn prop_filter_pattern_correctness(
        matching_count in 1usize..5,
        non_matching_count in 1usize..5,
    ) {
        let mut files = Vec::new();
        for i in 0..matching_count {
            files.push((format!("admin/Admin{}Controller.nestia.json", i), empty_snapshot("A")));
        }
        for i in 0..non_matching_count {
            files.push((format!("public/Public{}Controller.nestia.json", i), empty_snapshot("P")));
        }
        let dir = create_test_directory(&files);

        let found = SnapshotScanner::new(dir.path())
            .with_filter("admin/*")
            .unwrap()
            .scan()
            .unwrap();

        prop_assert_eq!(found.len(), matching_count);
        for file in &found {
            prop_assert!(file.relative_path.starts_with("admin"));
        }
    }
}

// =============================================================================
// Property 3: Config Override Precedence
//
// A flag given on the command line always wins over the config file; an
// absent flag leaves the file's value in place.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 3: Config Override Precedence**
    #[test]
    fn prop_config_override_precedence(
        file_mode in arb_mode(),
        file_format in arb_format(),
        flag_mode in prop::option::of(arb_mode()),
        flag_format in prop::option::of(arb_format()),
        flag_input in prop::option::of("[a-z]{1,8}"),
    ) {
        let toml = format!(
            "[input]\ndir = \"snapshots\"\n\n[output]\nformat = \"{}\"\n\n[transform]\nstringify = \"{}\"\n",
            file_format, file_mode
        );
        let config = ConfigManager::parse(&toml, &PathBuf::from("nestia-transform.toml")).unwrap();

        let args = CliArgs {
            input: flag_input.clone().map(PathBuf::from),
            format: flag_format,
            stringify: flag_mode,
            ..Default::default()
        };
        let merged = ConfigManager::merge_cli_args(config, &args);

        prop_assert_eq!(merged.transform.stringify, flag_mode.unwrap_or(file_mode));
        prop_assert_eq!(merged.output.format, flag_format.unwrap_or(file_format));
        prop_assert_eq!(
            merged.input.dir,
            PathBuf::from(flag_input.unwrap_or_else(|| "snapshots".to_string()))
        );
    }
}

// =============================================================================
// Property 4: Dry Run Safety
//
// A dry run never creates files or directories.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// **Property 4: Dry Run Safety**
    #[test]
    fn prop_dry_run_safety(
        segments in prop::collection::vec("[a-z]{1,6}", 1..4),
        content in "[ -~]{0,64}",
    ) {
        let dir = TempDir::new().unwrap();
        let path = segments
            .iter()
            .fold(dir.path().to_path_buf(), |path, segment| path.join(segment))
            .join("Out.decorators.ts");

        let result = FileWriter::new(true).write(&path, &content).unwrap();

        prop_assert!(!result.was_written());
        prop_assert!(!dir.path().join(&segments[0]).exists());
    }
}

// =============================================================================
// Property 5: Output Paths Mirror Input Layout
//
// JSON output keeps the snapshot's relative path; TypeScript output keeps
// its directory and swaps the suffix for `.decorators.ts`.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// **Property 5: Output Paths Mirror Input Layout**
    #[test]
    fn prop_output_paths_mirror_input(
        stem in arb_stem(),
        subdir in prop::option::of("[a-z]{1,6}"),
    ) {
        let relative = match &subdir {
            Some(sub) => format!("{}/{}.nestia.json", sub, stem),
            None => format!("{}.nestia.json", stem),
        };
        let dir = create_test_directory(&[(relative.clone(), empty_snapshot(&stem))]);

        let files = SnapshotScanner::new(dir.path()).scan().unwrap();
        let (loaded, errors) = SnapshotLoader::new().load_files(&files);
        prop_assert!(errors.is_empty());

        let config = ConfigManager::merge_cli_args(Default::default(), &CliArgs::default());
        let output = TransformRunner::new(&config).run(&loaded);
        let snapshot = &output.snapshots[0];
        let out = PathBuf::from("/out");

        prop_assert_eq!(
            snapshot.output_path(&out, OutputFormat::Json),
            out.join(&relative)
        );

        let expected_ts = match &subdir {
            Some(sub) => out.join(sub).join(format!("{}.decorators.ts", stem)),
            None => out.join(format!("{}.decorators.ts", stem)),
        };
        prop_assert_eq!(snapshot.output_path(&out, OutputFormat::Typescript), expected_ts);
    }
}
