//! Scheduler tests: bounded concurrency, isolation between files, and
//! first-error cancellation.

mod common;

use common::{read_names, write_zip};

use ziped::filter::{FilterSpec, PathFilter};
use ziped::progress::NoProgress;
use ziped::scheduler::{BatchOptions, JobState, run_batch};
use ziped::transaction::OutputTarget;
use ziped::transform::Remove;

fn remove_txt() -> Remove {
    Remove::new(PathFilter::compile(&FilterSpec::wildcard("*.txt")).unwrap())
}

#[test]
fn concurrent_removal_does_not_cross_contaminate() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_zip(
        dir.path(),
        "first.zip",
        &[("dir/", b""), ("one.txt", b"1"), ("two.txt", b"2")],
    );
    let second = write_zip(
        dir.path(),
        "second.zip",
        &[("dir/", b""), ("other.txt", b"o")],
    );

    let options = BatchOptions {
        jobs: 2,
        ..BatchOptions::default()
    };
    let batch = run_batch(
        &[first.clone(), second.clone()],
        &OutputTarget::Overwrite,
        &options,
        &remove_txt(),
        &NoProgress,
    );

    assert!(!batch.cancelled);
    assert!(!batch.has_errors());
    assert!(batch.results.iter().all(|r| r.state == JobState::Updated));

    // Each archive independently keeps only its non-.txt entries.
    assert_eq!(read_names(&first), ["dir/"]);
    assert_eq!(read_names(&second), ["dir/"]);
}

#[test]
fn all_errors_are_collected_not_just_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let broken_a = dir.path().join("a.zip");
    let broken_b = dir.path().join("b.zip");
    std::fs::write(&broken_a, b"garbage").unwrap();
    std::fs::write(&broken_b, b"more garbage").unwrap();

    let options = BatchOptions {
        jobs: 2,
        ..BatchOptions::default()
    };
    let batch = run_batch(
        &[broken_a, broken_b],
        &OutputTarget::Overwrite,
        &options,
        &remove_txt(),
        &NoProgress,
    );

    assert!(batch.cancelled);
    // Both jobs were already in flight when the first error landed; both
    // failures must be reported.
    assert_eq!(batch.errors().count(), batch.results.len());
    assert!(batch.results.iter().all(|r| r.state == JobState::Failed));
}

#[test]
fn sequential_cancellation_skips_later_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_zip(dir.path(), "good.zip", &[("x.txt", b"x"), ("k.png", b"k")]);
    let broken = dir.path().join("broken.zip");
    std::fs::write(&broken, b"not a zip").unwrap();
    let skipped = write_zip(dir.path(), "skipped.zip", &[("y.txt", b"y")]);
    let skipped_before = std::fs::read(&skipped).unwrap();

    let batch = run_batch(
        &[good.clone(), broken, skipped.clone()],
        &OutputTarget::Overwrite,
        &BatchOptions::default(),
        &remove_txt(),
        &NoProgress,
    );

    assert!(batch.cancelled);
    assert_eq!(batch.results.len(), 2);

    // The committed file stays committed; the skipped file was never opened.
    assert_eq!(read_names(&good), ["k.png"]);
    assert_eq!(std::fs::read(&skipped).unwrap(), skipped_before);
}

#[test]
fn not_updated_files_keep_their_mtime() {
    let dir = tempfile::tempdir().unwrap();
    let touched = write_zip(dir.path(), "a.zip", &[("x.txt", b"x")]);
    let untouched = write_zip(dir.path(), "b.zip", &[("k.png", b"k")]);
    let mtime = std::fs::metadata(&untouched).unwrap().modified().unwrap();

    let options = BatchOptions {
        jobs: 2,
        ..BatchOptions::default()
    };
    let batch = run_batch(
        &[touched, untouched.clone()],
        &OutputTarget::Overwrite,
        &options,
        &remove_txt(),
        &NoProgress,
    );

    assert_eq!(batch.results[0].state, JobState::Updated);
    assert_eq!(batch.results[1].state, JobState::NotUpdated);
    assert_eq!(
        std::fs::metadata(&untouched).unwrap().modified().unwrap(),
        mtime
    );
}

#[test]
fn many_files_with_a_small_pool() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = (0..16)
        .map(|i| {
            write_zip(
                dir.path(),
                &format!("archive-{i:02}.zip"),
                &[("x.txt", b"x" as &[u8]), ("k.png", b"k")],
            )
        })
        .collect();

    let options = BatchOptions {
        jobs: 3,
        ..BatchOptions::default()
    };
    let batch = run_batch(
        &paths,
        &OutputTarget::Overwrite,
        &options,
        &remove_txt(),
        &NoProgress,
    );

    assert_eq!(batch.results.len(), 16);
    assert!(batch.results.iter().all(|r| r.state == JobState::Updated));
    // Results come back in input order regardless of completion order.
    let order: Vec<_> = batch.results.iter().map(|r| r.path.clone()).collect();
    assert_eq!(order, paths);
    for path in &paths {
        assert_eq!(read_names(path), ["k.png"]);
    }
}
