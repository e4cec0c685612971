use std::{fs, path::PathBuf};

use clap::Parser;
use tempfile::tempdir;

use tickmark_cli::{Args, run};

/// Collects all .t files from a directory
fn collect_t_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("t")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Samples live at the workspace root, not in the crate.
fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("samples")
}

fn args(input: &[&str], extra: &[&str]) -> Args {
    let mut argv = vec!["tickmark", "--log-level", "off"];
    argv.extend_from_slice(input);
    argv.extend_from_slice(extra);
    Args::parse_from(argv)
}

#[test]
fn e2e_smoke_test_valid_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_samples = collect_t_files(samples_dir());

    assert!(
        !valid_samples.is_empty(),
        "No valid samples found in samples/"
    );

    let mut failed_samples = Vec::new();

    for sample_path in &valid_samples {
        for extension in ["svg", "png", "ps", "eps"] {
            let output_path = temp_dir.path().join(format!(
                "{}.{extension}",
                sample_path.file_stem().unwrap().to_string_lossy()
            ));
            let input = sample_path.to_str().unwrap();
            let output = output_path.to_str().unwrap();

            if let Err(e) = run(&args(&[input], &["-o", output])) {
                failed_samples.push((sample_path.clone(), extension, e));
            } else if !output_path.exists() {
                panic!("{} was not written", output_path.display());
            }
        }
    }

    if !failed_samples.is_empty() {
        eprintln!("\nValid samples that failed:");
        for (path, extension, err) in &failed_samples {
            eprintln!("  - {} ({extension}): {}", path.display(), err);
        }
        panic!("{} valid sample(s) failed unexpectedly", failed_samples.len());
    }
}

#[test]
fn e2e_smoke_test_error_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_samples = collect_t_files(samples_dir().join("errors"));

    assert!(
        !error_samples.is_empty(),
        "No error samples found in samples/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for sample_path in &error_samples {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            sample_path.file_stem().unwrap().to_string_lossy()
        ));
        let input = sample_path.to_str().unwrap();
        let output = output_path.to_str().unwrap();

        if run(&args(&[input], &["-o", output])).is_ok() {
            unexpectedly_succeeded.push(sample_path.clone());
        }
        assert!(!output_path.exists());
    }

    assert!(
        unexpectedly_succeeded.is_empty(),
        "Error samples parsed without error: {unexpectedly_succeeded:?}"
    );
}

#[test]
fn e2e_multiple_inputs_and_page_size() {
    let temp_dir = tempdir().unwrap();
    let first = temp_dir.path().join("first.t");
    let second = temp_dir.path().join("second.t");
    fs::write(&first, "clk=0, en=0.\nclk=1.").unwrap();
    fs::write(&second, "clk=0, en=1.").unwrap();

    let output = temp_dir.path().join("page.svg");
    run(&args(
        &[first.to_str().unwrap(), second.to_str().unwrap()],
        &["-o", output.to_str().unwrap(), "-p", "640x200", "-a", "-g"],
    ))
    .expect("Failed to render");

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains(r#"width="640""#));
    assert!(svg.contains(r#"height="200""#));
}

#[test]
fn e2e_without_output_renders_nothing() {
    let input = samples_dir().join("handshake.t");
    run(&args(&[input.to_str().unwrap()], &["-v"])).expect("Failed to parse");
}

#[test]
fn e2e_bad_scale_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let input = samples_dir().join("handshake.t");
    let output = temp_dir.path().join("scaled.svg");

    let result = run(&args(
        &[input.to_str().unwrap()],
        &["-o", output.to_str().unwrap(), "-x", "0"],
    ));
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn e2e_missing_input_file() {
    let result = run(&args(&["/no/such/input.t"], &[]));
    assert!(matches!(result, Err(tickmark::TickmarkError::Io(_))));
}

#[test]
fn e2e_empty_inputs_render_every_format() {
    let temp_dir = tempdir().unwrap();
    let empty = temp_dir.path().join("empty.t");
    let comments = temp_dir.path().join("comments.t");
    fs::write(&empty, "").unwrap();
    fs::write(&comments, "// no signals yet\n\n// still none\n").unwrap();

    for input in [&empty, &comments] {
        for extension in ["svg", "png", "ps", "eps"] {
            let output = temp_dir.path().join(format!(
                "{}.{extension}",
                input.file_stem().unwrap().to_string_lossy()
            ));
            run(&args(
                &[input.to_str().unwrap()],
                &["-o", output.to_str().unwrap()],
            ))
            .unwrap_or_else(|e| panic!("{} failed: {e}", output.display()));
            assert!(fs::metadata(&output).unwrap().len() > 0);
        }
    }
}

#[test]
fn e2e_grid_renders_every_format() {
    let temp_dir = tempdir().unwrap();
    let input = samples_dir().join("clock_and_data.t");

    for extension in ["svg", "png", "ps", "eps"] {
        let output = temp_dir.path().join(format!("grid.{extension}"));
        run(&args(
            &[input.to_str().unwrap()],
            &["-o", output.to_str().unwrap(), "-g"],
        ))
        .unwrap_or_else(|e| panic!("{extension} with grid failed: {e}"));
        assert!(output.exists());
    }
}
