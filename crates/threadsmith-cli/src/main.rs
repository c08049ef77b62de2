//! Command-line front end.
//!
//! Reads a thread draft (file or stdin), splits it into segments on blank
//! lines, runs every segment through the checker gateway via the engine's
//! effect loop, and prints the suggestions — or, with `--apply`, the
//! corrected text.
//!
//! The effect loop here is the synchronous degenerate case: effects are
//! executed inline as soon as they come due, with the clock advanced past
//! both debounce windows in one step.

use std::io::Read as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use web_time::Instant;

use threadsmith_check::{
    CheckerGateway, DictionaryStore, GatewayConfig, HttpChecker, MemoryDictionary,
};
use threadsmith_core::{Segment, SegmentId, SpanKind};
use threadsmith_engine::{
    CHECK_DEBOUNCE, Effect, Persistence, PersistenceError, SAVE_DEBOUNCE, ThreadEditor,
    execute_save,
};

mod report;

use report::{SegmentReport, ThreadReport};

#[derive(Debug, Parser)]
#[command(name = "threadsmith", version, about = "Check and fix thread drafts")]
struct Cli {
    /// Draft to check; reads stdin when omitted.
    file: Option<PathBuf>,

    /// LanguageTool-compatible endpoint.
    #[arg(long, default_value = "http://localhost:8010/v2/check")]
    endpoint: String,

    /// Language submitted with every request.
    #[arg(long, default_value = "en-US")]
    language: String,

    /// Custom dictionary: one word per line, never flagged as misspelled.
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Apply the best candidate of every suggestion and print the result.
    #[arg(long)]
    apply: bool,

    /// Emit the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("threadsmith: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let input = read_input(cli.file.as_deref())?;
    let dictionary = load_dictionary(cli.dictionary.as_deref())?;

    let mut editor = ThreadEditor::from_segments(split_segments(&input));
    tracing::info!(segments = editor.segments().len(), "thread loaded");
    let mut gateway = CheckerGateway::with_config(
        HttpChecker::new(&cli.endpoint),
        GatewayConfig {
            language: cli.language.clone(),
        },
    );
    let mut store = DiscardStore::default();

    // Re-enter content through the editor so checks get scheduled, then
    // jump the clock past both debounce windows.
    let start = Instant::now();
    let ids: Vec<SegmentId> = editor.segments().iter().map(|s| s.id.clone()).collect();
    for id in &ids {
        let content = editor.segment(id).map(|s| s.content.clone()).unwrap_or_default();
        editor.edit_segment(id, content, start);
    }
    let due = start + CHECK_DEBOUNCE.max(SAVE_DEBOUNCE);
    let effects = editor.tick(due);
    run_effects(&mut editor, effects, &mut gateway, &mut store, &dictionary);

    if cli.apply {
        let effects = editor.fix_all();
        run_effects(&mut editor, effects, &mut gateway, &mut store, &dictionary);
        for segment in editor.segments() {
            println!("{}", segment.content);
            println!();
        }
        editor.teardown();
        return Ok(());
    }

    let report = build_report(&editor);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    editor.teardown();
    Ok(())
}

fn read_input(path: Option<&std::path::Path>) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(input)
        }
    }
}

fn load_dictionary(path: Option<&std::path::Path>) -> Result<MemoryDictionary, CliError> {
    let mut dictionary = MemoryDictionary::default();
    if let Some(path) = path {
        let body = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })?;
        for word in body.lines() {
            dictionary.add(word);
        }
    }
    Ok(dictionary)
}

/// Blank-line-separated paragraphs become segments.
fn split_segments(input: &str) -> Vec<Segment> {
    input
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(index, paragraph)| {
            Segment::from_content(SegmentId::draft(index as u64 + 1), paragraph, index)
        })
        .collect()
}

/// The CLI has nowhere to persist to; saves succeed into the void, with
/// stable ids handed out so the engine's draft bookkeeping still runs.
#[derive(Default)]
struct DiscardStore {
    next_id: u64,
}

impl Persistence for DiscardStore {
    fn create_segment(&mut self, _content: &str, _index: usize) -> Result<SegmentId, PersistenceError> {
        self.next_id += 1;
        Ok(SegmentId::new(format!("local-{}", self.next_id)))
    }

    fn update_segment(&mut self, _id: &SegmentId, _content: &str) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn delete_segment(&mut self, _id: &SegmentId) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn update_thread(&mut self, _title: &str) -> Result<(), PersistenceError> {
        Ok(())
    }
}

fn run_effects(
    editor: &mut ThreadEditor,
    effects: Vec<Effect>,
    gateway: &mut CheckerGateway<HttpChecker>,
    store: &mut DiscardStore,
    dictionary: &MemoryDictionary,
) {
    let words = dictionary.words();
    for effect in effects {
        match effect {
            Effect::Check {
                segment_id,
                content,
                generation,
            } => {
                let outcome = gateway.check(&content, &segment_id, &words);
                editor.complete_check(&segment_id, generation, outcome);
            }
            Effect::Save { plan } => {
                let report = execute_save(&plan, store);
                editor.complete_save(&report);
            }
        }
    }
}

fn build_report(editor: &ThreadEditor) -> ThreadReport {
    let counts = editor.suggestion_counts();
    let segments = editor
        .segments()
        .iter()
        .map(|segment| {
            SegmentReport::new(
                segment,
                editor.grouped_spelling(&segment.id),
                editor
                    .suggestions_for(&segment.id, Some(SpanKind::Grammar))
                    .into_iter()
                    .cloned()
                    .collect(),
            )
        })
        .collect();
    ThreadReport {
        spelling: counts.spelling,
        grammar: counts.grammar,
        checker_available: editor.status().checker
            == threadsmith_engine::CheckerHealth::Available,
        segments,
    }
}
