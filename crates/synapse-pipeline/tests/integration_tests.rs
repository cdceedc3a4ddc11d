//! Integration tests for synapse-pipeline
//!
//! These tests drive the full map → reduce cycle on a temp directory with
//! scripted extraction and synthesis functions.

use async_trait::async_trait;
use proptest::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use synapse_domain::{
    BoxError, DocumentExtractor, EntityProfile, ProfileMetadata, SourceDocument, SourceKind,
    SynthesisError, SynthesisOutput, Synthesizer,
};
use synapse_extractor::{ExtractorRegistry, TimeoutExtractor};
use synapse_pipeline::{
    naming, ArtifactStore, FailureStage, LoadedSources, MapScheduler, OutputTarget, Phase, Pipeline,
    PipelineConfig, PipelineError, PipelineState, ReduceAggregator, SourceDir,
};
use tempfile::TempDir;

/// Echoes the document back, failing on any content containing "FAIL"
struct EchoExtractor;

#[async_trait]
impl DocumentExtractor for EchoExtractor {
    async fn extract(&self, document: &SourceDocument) -> Result<String, BoxError> {
        if document.content().contains("FAIL") {
            return Err("scripted failure".into());
        }
        Ok(format!("extracted: {}", document.content()))
    }
}

/// Tracks how many calls are in flight at once
#[derive(Default)]
struct GaugedExtractor {
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

#[async_trait]
impl DocumentExtractor for GaugedExtractor {
    async fn extract(&self, document: &SourceDocument) -> Result<String, BoxError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(document.content().to_string())
    }
}

struct SlowExtractor;

#[async_trait]
impl DocumentExtractor for SlowExtractor {
    async fn extract(&self, document: &SourceDocument) -> Result<String, BoxError> {
        if document.content().contains("slow") {
            tokio::time::sleep(Duration::from_secs(600)).await;
        }
        Ok(document.content().to_string())
    }
}

/// Records every input and returns a scripted output
struct RecordingSynthesizer {
    output: Result<SynthesisOutput, SynthesisError>,
    inputs: Mutex<Vec<String>>,
}

impl RecordingSynthesizer {
    fn new(output: Result<SynthesisOutput, SynthesisError>) -> Arc<Self> {
        Arc::new(Self {
            output,
            inputs: Mutex::new(Vec::new()),
        })
    }

    fn document(text: &str) -> Arc<Self> {
        Self::new(Ok(SynthesisOutput::Document(text.to_string())))
    }

    fn calls(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }

    fn last_input(&self) -> String {
        self.inputs.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Synthesizer for RecordingSynthesizer {
    async fn synthesize(&self, input: &str) -> Result<SynthesisOutput, SynthesisError> {
        self.inputs.lock().unwrap().push(input.to_string());
        self.output.clone()
    }
}

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("meetings")).unwrap();
        fs::create_dir_all(temp.path().join("chats")).unwrap();
        Self { temp }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn add(&self, kind: &str, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(kind).join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn map_dir(&self) -> PathBuf {
        self.root().join("out/map")
    }

    fn config(&self, concurrency: usize) -> PipelineConfig {
        PipelineConfig {
            sources: vec![
                SourceDir::new(SourceKind::Meeting, self.root().join("meetings")),
                SourceDir::new(SourceKind::Chat, self.root().join("chats")),
            ],
            map_dir: self.map_dir(),
            output: OutputTarget {
                document: self.root().join("out/newsletter.md"),
                profiles_dir: self.root().join("out/profiles"),
            },
            concurrency,
        }
    }

    fn artifacts(&self) -> Vec<(String, String)> {
        let mut artifacts: Vec<(String, String)> = fs::read_dir(self.map_dir())
            .map(|entries| {
                entries
                    .map(|e| e.unwrap().path())
                    .filter(|p| p.to_string_lossy().ends_with(".map.md"))
                    .map(|p| {
                        let name = p.file_name().unwrap().to_string_lossy().into_owned();
                        (name, fs::read_to_string(&p).unwrap())
                    })
                    .collect()
            })
            .unwrap_or_default();
        artifacts.sort();
        artifacts
    }
}

fn echo_registry() -> ExtractorRegistry {
    ExtractorRegistry::new()
        .with(SourceKind::Meeting, EchoExtractor)
        .with(SourceKind::Chat, EchoExtractor)
}

fn profile(name: &str, body: &str) -> EntityProfile {
    EntityProfile {
        metadata: ProfileMetadata {
            name: name.to_string(),
            ..ProfileMetadata::default()
        },
        content: body.to_string(),
    }
}

#[tokio::test]
async fn test_three_documents_one_failure() {
    let ws = Workspace::new();
    let standup = ws.add("meetings", "standup.txt", "standup notes");
    let general = ws.add("chats", "general.txt", "general chatter");
    let random = ws.add("chats", "random.txt", "FAIL please");

    let synthesizer = RecordingSynthesizer::document("# Weekly Team Newsletter");
    let pipeline = Pipeline::new(&ws.config(2), echo_registry(), synthesizer.clone()).unwrap();
    let outcome = pipeline.run(Phase::Both).await;

    assert!(outcome.is_success(), "error: {:?}", outcome.error);
    assert_eq!(
        outcome.transitions,
        vec![
            PipelineState::NotStarted,
            PipelineState::MapRunning,
            PipelineState::MapDone,
            PipelineState::ReduceRunning,
            PipelineState::Done,
        ]
    );
    assert_eq!(outcome.artifacts_written(), 2);
    assert_eq!(outcome.items_failed(), 1);
    assert_eq!(ws.artifacts().len(), 2);

    let map = outcome.map.as_ref().unwrap();
    assert_eq!(map.failures[0].stage, FailureStage::Extract);
    assert_eq!(map.failures[0].source, random);

    assert_eq!(synthesizer.calls(), 1);
    let input = synthesizer.last_input();
    let standup_label = naming::artifact_stem(&standup);
    let general_label = naming::artifact_stem(&general);
    assert!(input.contains(&format!("## Source: {}\n\nextracted: standup notes", standup_label)));
    assert!(input.contains(&format!("## Source: {}\n\nextracted: general chatter", general_label)));
    assert!(!input.contains(&naming::artifact_stem(&random)));

    let newsletter = fs::read_to_string(ws.root().join("out/newsletter.md")).unwrap();
    assert_eq!(newsletter, "# Weekly Team Newsletter");
}

#[tokio::test]
async fn test_new_same_stem_source_leaves_existing_artifact_alone() {
    let ws = Workspace::new();
    ws.add("meetings", "notes.txt", "meeting notes");

    let synthesizer = RecordingSynthesizer::document("newsletter");
    let pipeline = Pipeline::new(&ws.config(2), echo_registry(), synthesizer.clone()).unwrap();
    assert!(pipeline.run(Phase::Map).await.is_success());
    let first_names: Vec<String> = ws.artifacts().into_iter().map(|(name, _)| name).collect();

    ws.add("chats", "notes.txt", "chat notes");
    let outcome = pipeline.run(Phase::Both).await;
    assert!(outcome.is_success(), "error: {:?}", outcome.error);

    let artifacts = ws.artifacts();
    assert_eq!(artifacts.len(), 2);
    assert!(artifacts.iter().any(|(name, _)| *name == first_names[0]));

    let input = synthesizer.last_input();
    assert_eq!(input.matches("extracted: meeting notes").count(), 1);
    assert_eq!(input.matches("extracted: chat notes").count(), 1);
}

#[tokio::test]
async fn test_every_artifact_attributed_in_full() {
    let ws = Workspace::new();
    ws.add("meetings", "2024-01-15 10_00 Standup.txt", "standup notes\nline two");
    ws.add("meetings", "2024-01-08 10_00 Standup.txt", "older standup");
    ws.add("chats", "general.txt", "chat log");

    let synthesizer = RecordingSynthesizer::document("newsletter");
    let pipeline = Pipeline::new(&ws.config(3), echo_registry(), synthesizer.clone()).unwrap();
    assert!(pipeline.run(Phase::Both).await.is_success());

    let input = synthesizer.last_input();
    for (name, content) in ws.artifacts() {
        let label = name.trim_end_matches(".map.md");
        assert!(input.contains(&format!("## Source: {}", label)), "missing {}", label);
        assert!(input.contains(&content), "content of {} truncated", label);
    }

    // Timestamped sources come first, oldest first
    let older = input.find("2024-01-08").unwrap();
    let newer = input.find("2024-01-15").unwrap();
    let chat = input.find("## Source: general").unwrap();
    assert!(older < newer && newer < chat);
}

#[tokio::test]
async fn test_map_is_idempotent() {
    let ws = Workspace::new();
    ws.add("meetings", "a.txt", "alpha");
    ws.add("chats", "b.txt", "beta");

    let pipeline = Pipeline::new(
        &ws.config(2),
        echo_registry(),
        RecordingSynthesizer::document("unused"),
    )
    .unwrap();

    let first = pipeline.run(Phase::Map).await;
    let after_first = ws.artifacts();
    let second = pipeline.run(Phase::Map).await;
    let after_second = ws.artifacts();

    assert!(first.is_success() && second.is_success());
    assert_eq!(after_first.len(), 2);
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_map_only_stops_after_map() {
    let ws = Workspace::new();
    ws.add("meetings", "a.txt", "alpha");

    let synthesizer = RecordingSynthesizer::document("unused");
    let pipeline = Pipeline::new(&ws.config(1), echo_registry(), synthesizer.clone()).unwrap();
    let outcome = pipeline.run(Phase::Map).await;

    assert_eq!(outcome.state, PipelineState::Done);
    assert!(outcome.reduce.is_none());
    assert_eq!(synthesizer.calls(), 0);
}

#[tokio::test]
async fn test_empty_map_output_never_calls_synthesizer() {
    let ws = Workspace::new();
    ws.add("meetings", "a.txt", "FAIL");

    let synthesizer = RecordingSynthesizer::document("unused");
    let pipeline = Pipeline::new(&ws.config(1), echo_registry(), synthesizer.clone()).unwrap();
    let outcome = pipeline.run(Phase::Both).await;

    assert_eq!(outcome.state, PipelineState::Failed);
    assert!(matches!(
        outcome.error,
        Some(PipelineError::EmptyMapOutput { .. })
    ));
    assert_eq!(
        outcome.transitions.last().copied(),
        Some(PipelineState::Failed)
    );
    assert!(!outcome.transitions.contains(&PipelineState::ReduceRunning));
    assert_eq!(synthesizer.calls(), 0);
}

#[tokio::test]
async fn test_reduce_only_over_stale_artifacts() {
    let ws = Workspace::new();
    let map_dir = ws.map_dir();
    fs::create_dir_all(&map_dir).unwrap();
    for i in 1..=5 {
        fs::write(map_dir.join(format!("old-{}.map.md", i)), format!("stale {}", i)).unwrap();
    }
    fs::write(map_dir.join("blank.map.md"), "\n  \n").unwrap();
    fs::write(map_dir.join("README.md"), "not an artifact").unwrap();

    let synthesizer = RecordingSynthesizer::document("newsletter");
    let pipeline = Pipeline::new(&ws.config(4), echo_registry(), synthesizer.clone()).unwrap();
    let outcome = pipeline.run(Phase::Reduce).await;

    assert!(outcome.is_success());
    assert!(outcome.map.is_none());
    assert_eq!(
        outcome.transitions,
        vec![
            PipelineState::NotStarted,
            PipelineState::ReduceRunning,
            PipelineState::Done,
        ]
    );
    assert_eq!(outcome.reduce.as_ref().unwrap().inputs.len(), 5);

    let input = synthesizer.last_input();
    for i in 1..=5 {
        assert!(input.contains(&format!("## Source: old-{}\n\nstale {}", i, i)));
    }
    assert!(!input.contains("not an artifact"));
}

#[tokio::test]
async fn test_missing_input_dir_fails_before_map() {
    let ws = Workspace::new();
    let mut config = ws.config(1);
    config.sources.push(SourceDir::new(SourceKind::Chat, ws.root().join("nope")));
    config.sources.remove(1);

    let pipeline = Pipeline::new(&config, echo_registry(), RecordingSynthesizer::document("x")).unwrap();
    let outcome = pipeline.run(Phase::Both).await;

    assert_eq!(
        outcome.transitions,
        vec![PipelineState::NotStarted, PipelineState::Failed]
    );
    assert!(matches!(
        outcome.error,
        Some(PipelineError::MissingInput { kind: SourceKind::Chat, .. })
    ));
    assert!(!ws.map_dir().exists());
}

#[tokio::test]
async fn test_concurrency_bound_respected() {
    let ws = Workspace::new();
    for i in 0..12 {
        ws.add("meetings", &format!("m{:02}.txt", i), &format!("meeting {}", i));
    }

    let gauge = Arc::new(GaugedExtractor::default());
    let registry = ExtractorRegistry::new()
        .with(SourceKind::Meeting, Arc::clone(&gauge))
        .with(SourceKind::Chat, Arc::clone(&gauge));
    let pipeline = Pipeline::new(&ws.config(3), registry, RecordingSynthesizer::document("x")).unwrap();

    let outcome = pipeline.run(Phase::Map).await;
    assert_eq!(outcome.artifacts_written(), 12);

    let high_water = gauge.high_water.load(Ordering::SeqCst);
    assert!(high_water <= 3, "high water mark was {}", high_water);
    assert!(high_water >= 2, "calls never overlapped");
}

#[tokio::test]
async fn test_colliding_names_get_distinct_artifacts() {
    let ws = Workspace::new();
    let a = ws.add("meetings", "notes.txt", "meeting notes");
    let b = ws.add("chats", "notes.txt", "chat notes");

    let pipeline = Pipeline::new(&ws.config(2), echo_registry(), RecordingSynthesizer::document("x")).unwrap();
    let outcome = pipeline.run(Phase::Map).await;
    assert_eq!(outcome.artifacts_written(), 2);

    let artifacts = ws.artifacts();
    assert_eq!(artifacts.len(), 2);
    let contents: HashSet<&str> = artifacts.iter().map(|(_, c)| c.as_str()).collect();
    assert!(contents.contains("extracted: meeting notes"));
    assert!(contents.contains("extracted: chat notes"));

    let map = outcome.map.unwrap();
    let for_a = map.succeeded.iter().find(|s| s.source == a).unwrap();
    let for_b = map.succeeded.iter().find(|s| s.source == b).unwrap();
    assert_ne!(for_a.artifact, for_b.artifact);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_item_is_recorded() {
    let ws = Workspace::new();
    ws.add("meetings", "fast.txt", "fast");
    ws.add("meetings", "slow.txt", "slow");

    let extractor = Arc::new(TimeoutExtractor::new(SlowExtractor, Duration::from_secs(30)));
    let registry = ExtractorRegistry::new()
        .with(SourceKind::Meeting, Arc::clone(&extractor))
        .with(SourceKind::Chat, extractor);
    let pipeline = Pipeline::new(&ws.config(2), registry, RecordingSynthesizer::document("x")).unwrap();

    let outcome = pipeline.run(Phase::Map).await;
    let map = outcome.map.unwrap();
    assert_eq!(map.succeeded_count(), 1);
    assert_eq!(map.failed_count(), 1);
    assert!(map.failures[0].source.ends_with("slow.txt"));
    assert!(map.failures[0].reason.contains("timed out"));
}

#[tokio::test]
async fn test_structured_duplicate_keys_kept_separate() {
    let ws = Workspace::new();
    ws.add("meetings", "a.txt", "alpha");

    let synthesizer = RecordingSynthesizer::new(Ok(SynthesisOutput::Entities(vec![
        profile("Alice Smith", "## Alice from engineering"),
        profile("alice smith", "## Alice from sales"),
        profile("Bob", "## Bob"),
    ])));
    let pipeline = Pipeline::new(&ws.config(1), echo_registry(), synthesizer).unwrap();
    let outcome = pipeline.run(Phase::Both).await;
    assert!(outcome.is_success(), "error: {:?}", outcome.error);

    let profiles_dir = ws.root().join("out/profiles");
    let first = fs::read_to_string(profiles_dir.join("alice_smith.md")).unwrap();
    let second = fs::read_to_string(profiles_dir.join("alice_smith-2.md")).unwrap();
    let bob = fs::read_to_string(profiles_dir.join("bob.md")).unwrap();

    assert!(first.starts_with("---\nname: Alice Smith\n"));
    assert!(first.contains("## Alice from engineering"));
    assert!(second.contains("## Alice from sales"));
    assert!(bob.contains("## Bob"));
    assert_eq!(outcome.reduce.unwrap().written.len(), 3);
}

#[tokio::test]
async fn test_malformed_synthesis_fails_without_writing() {
    let ws = Workspace::new();
    ws.add("meetings", "a.txt", "alpha");

    let synthesizer = RecordingSynthesizer::new(Err(SynthesisError::Malformed(
        "not a JSON array".to_string(),
    )));
    let pipeline = Pipeline::new(&ws.config(1), echo_registry(), synthesizer).unwrap();
    let outcome = pipeline.run(Phase::Both).await;

    assert_eq!(outcome.state, PipelineState::Failed);
    assert!(matches!(
        outcome.error,
        Some(PipelineError::Synthesis(SynthesisError::Malformed(_)))
    ));
    // Map results survive a failed reduce
    assert_eq!(ws.artifacts().len(), 1);
    assert!(!ws.root().join("out/profiles").exists());
    assert!(!ws.root().join("out/newsletter.md").exists());
}

#[tokio::test]
async fn test_call_failure_surfaces_as_call() {
    let ws = Workspace::new();
    ws.add("meetings", "a.txt", "alpha");

    let synthesizer = RecordingSynthesizer::new(Err(SynthesisError::Call("connection refused".to_string())));
    let aggregator = ReduceAggregator::new(
        ArtifactStore::new(ws.map_dir()),
        ws.config(1).output,
    );
    let scheduler = MapScheduler::new(ArtifactStore::new(ws.map_dir()), 1).unwrap();
    let loaded = synapse_pipeline::load_sources(&ws.config(1).sources).await.unwrap();
    scheduler.run(loaded, &echo_registry()).await.unwrap();

    let result = aggregator.run(synthesizer.as_ref()).await;
    assert!(matches!(
        result,
        Err(PipelineError::Synthesis(SynthesisError::Call(_)))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_every_document_succeeds_or_fails(
        outcomes in proptest::collection::vec(any::<bool>(), 0..20),
        concurrency in 1usize..6,
    ) {
        let temp = TempDir::new().unwrap();
        let documents: Vec<SourceDocument> = outcomes
            .iter()
            .enumerate()
            .map(|(i, ok)| {
                let content = if *ok { format!("doc {}", i) } else { "FAIL".to_string() };
                SourceDocument::new(format!("/in/doc{}.txt", i), SourceKind::Chat, content)
            })
            .collect();
        let expected_ok = outcomes.iter().filter(|ok| **ok).count();
        let inputs: HashSet<PathBuf> = documents.iter().map(|d| d.source().to_path_buf()).collect();

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let report = runtime.block_on(async {
            let scheduler = MapScheduler::new(ArtifactStore::new(temp.path()), concurrency).unwrap();
            let batch = LoadedSources { documents, ..LoadedSources::default() };
            scheduler.run(batch, &echo_registry()).await.unwrap()
        });

        prop_assert_eq!(report.total(), outcomes.len());
        prop_assert_eq!(report.succeeded_count(), expected_ok);

        let written: HashSet<PathBuf> = report.succeeded.iter().map(|s| s.source.clone()).collect();
        let failed: HashSet<PathBuf> = report.failures.iter().map(|f| f.source.clone()).collect();
        prop_assert!(written.is_disjoint(&failed));
        let covered: HashSet<PathBuf> = written.union(&failed).cloned().collect();
        prop_assert_eq!(covered, inputs);

        let on_disk = fs::read_dir(temp.path()).unwrap().count();
        prop_assert_eq!(on_disk, expected_ok);
    }
}
