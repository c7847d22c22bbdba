//! End-to-end runs: CSV of raw posts in, CSV of author documents out.

use std::path::Path;
use std::sync::Arc;

use postprep_clean::{LanguageError, LanguageIdentifier, NoRepair, TextNormalizer};
use postprep_core::{AuthorOrder, PipelineConfig, RejectReason};

/// Treats anything containing "bonjour" as French, everything else as English.
struct KeywordLanguage;

impl LanguageIdentifier for KeywordLanguage {
    fn identify(&self, text: &str) -> Result<String, LanguageError> {
        if text.to_lowercase().contains("bonjour") {
            Ok("fra".into())
        } else {
            Ok("eng".into())
        }
    }
}

fn normalizer(config: &PipelineConfig) -> TextNormalizer {
    TextNormalizer::new(config, Arc::new(NoRepair), Arc::new(KeywordLanguage)).unwrap()
}

const POSTS: &str = "\
auhtor_ID,post,extrovert
alice,\"I love meeting new people!!!! See https://example.com\",1
bob,\"Hello\n> quoted junk\nWorld peace for everyone\",
carol,\"Your submission has been removed. Contact the moderators.\",0
alice,\"Ask u/dave over in r/introvert &amp; friends\",
bob,ok,0
dave,\"Bonjour tout le monde, comment allez-vous\",1
";

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_full_run_with_labels() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("posts.csv");
    let output = dir.path().join("authors.csv");
    std::fs::write(&input, POSTS).unwrap();

    let config = PipelineConfig::default();
    let report =
        postprep_cli::run_with(&config, &normalizer(&config), &input, &output).unwrap();

    let rows = read_rows(&output);
    assert_eq!(rows[0], vec!["auhtor_ID", "final_text", "extrovert"]);
    assert_eq!(
        rows[1],
        vec![
            "alice",
            "I love meeting new people! See [URL] Ask [USER] over in [SUB] & friends",
            "1",
        ]
    );
    assert_eq!(rows[2], vec!["bob", "Hello World peace for everyone ok", "0"]);
    assert_eq!(rows.len(), 3, "carol (bot) and dave (French) are dropped");

    assert_eq!(report.clean.total, 6);
    assert_eq!(report.clean.kept, 4);
    assert_eq!(report.clean.rejected_for(RejectReason::BotContent), 1);
    assert_eq!(report.clean.rejected_for(RejectReason::NonEnglish), 1);
    assert_eq!(report.aggregate.authors, 2);
}

#[test]
fn test_bounded_sorted_run_without_labels() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("posts.csv");
    let output = dir.path().join("authors.csv");
    std::fs::write(
        &input,
        "post,auhtor_ID\n\
         one two three four five,zed\n\
         alpha beta,amy\n",
    )
    .unwrap();

    let config = PipelineConfig {
        max_words: Some(3),
        author_order: AuthorOrder::Sorted,
        parallel: false,
        ..Default::default()
    };
    let report =
        postprep_cli::run_with(&config, &normalizer(&config), &input, &output).unwrap();

    let rows = read_rows(&output);
    assert_eq!(
        rows,
        vec![
            vec!["auhtor_ID", "final_text"],
            vec!["amy", "alpha beta"],
            vec!["zed", "three four five"],
        ]
    );
    assert_eq!(report.aggregate.truncated, 1);
}

#[test]
fn test_latin1_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("posts.csv");
    let output = dir.path().join("authors.csv");
    std::fs::write(&input, b"auhtor_ID,post\nx,caf\xe9 talk is the best\n").unwrap();

    let config = PipelineConfig::default();
    postprep_cli::run_with(&config, &normalizer(&config), &input, &output).unwrap();

    let rows = read_rows(&output);
    assert_eq!(rows[1], vec!["x", "café talk is the best"]);
}

#[test]
fn test_missing_author_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("posts.csv");
    std::fs::write(&input, "user,post\nx,hello there\n").unwrap();

    let config = PipelineConfig::default();
    let err = postprep_cli::run_with(
        &config,
        &normalizer(&config),
        &input,
        &dir.path().join("out.csv"),
    )
    .unwrap_err();
    assert!(matches!(err, postprep_core::Error::Schema(_)));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_default_run_uses_builtin_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("posts.csv");
    let output = dir.path().join("authors.csv");
    std::fs::write(
        &input,
        "auhtor_ID,post\n\
         a,I really enjoyed the concert last night and the crowd was amazing\n",
    )
    .unwrap();

    let report = postprep_cli::run(&PipelineConfig::default(), &input, &output).unwrap();
    assert_eq!(report.clean.kept, 1);
    assert_eq!(report.aggregate.authors, 1);
}
