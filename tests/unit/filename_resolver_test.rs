//! Unit tests for destination filename collision avoidance.

#[path = "../support/fake_backend.rs"]
mod fake_backend;

use fake_backend::FakeBackend;
use fetchdock::managers::filename_resolver::{
    find_available_filename, generate_candidate, join_destination, resolve_filename,
    MAX_COLLISION_SUFFIX,
};
use rstest::rstest;

#[rstest]
#[case("report.pdf", 1, "report-1.pdf")]
#[case("report.pdf", 2, "report-2.pdf")]
#[case("archive", 1, "archive(1)")]
#[case("archive", 7, "archive(7)")]
#[case("photo.final.jpeg", 3, "photo.final-3.jpeg")]
#[case(".env", 1, ".env(1)")]
#[case("trailing.", 1, "trailing-1.")]
fn test_generate_candidate(#[case] filename: &str, #[case] suffix: u32, #[case] expected: &str) {
    assert_eq!(generate_candidate(filename, suffix), expected);
}

#[tokio::test]
async fn test_first_free_candidate_is_returned() {
    let backend = FakeBackend::new();
    backend.add_file(join_destination("/d", "report.pdf"));

    let name = find_available_filename(&backend, "/d", "report.pdf").await.unwrap();
    assert_eq!(name, "report-1.pdf");

    backend.add_file(join_destination("/d", "report-1.pdf"));
    let name = find_available_filename(&backend, "/d", "report.pdf").await.unwrap();
    assert_eq!(name, "report-2.pdf");
}

#[tokio::test]
async fn test_extensionless_name_uses_parentheses() {
    let backend = FakeBackend::new();
    backend.add_file(join_destination("/d", "archive"));

    let name = find_available_filename(&backend, "/d", "archive").await.unwrap();
    assert_eq!(name, "archive(1)");
}

#[tokio::test]
async fn test_other_folders_do_not_collide() {
    let backend = FakeBackend::new();
    backend.add_file(join_destination("/other", "report-1.pdf"));

    let name = find_available_filename(&backend, "/d", "report.pdf").await.unwrap();
    assert_eq!(name, "report-1.pdf");
}

#[tokio::test]
async fn test_cutoff_returns_last_candidate() {
    let backend = FakeBackend::new();
    for suffix in 1..=MAX_COLLISION_SUFFIX {
        backend.add_file(join_destination("/d", &generate_candidate("data.csv", suffix)));
    }

    let name = find_available_filename(&backend, "/d", "data.csv").await.unwrap();
    assert_eq!(name, "data-100.csv");
}

#[tokio::test]
async fn test_resolve_keeps_free_name() {
    let backend = FakeBackend::new();
    let name = resolve_filename(&backend, "/d", "notes.txt").await.unwrap();
    assert_eq!(name, "notes.txt");

    backend.add_file(join_destination("/d", "notes.txt"));
    let name = resolve_filename(&backend, "/d", "notes.txt").await.unwrap();
    assert_eq!(name, "notes-1.txt");
}
