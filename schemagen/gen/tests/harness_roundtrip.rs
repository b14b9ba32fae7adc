//! Drives `schemagen-gen` through the harness as both reference and
//! candidate generator.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use schemagen_harness::config::{GeneratorCommand, HarnessConfig, Role};
use schemagen_harness::orchestrator::TestOrchestrator;

const BILLING: &str = r#"{
  "name": "acme.billing",
  "messages": [
    { "name": "Invoice", "fields": [{ "name": "id", "type_name": "u64" }] }
  ]
}"#;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[tokio::test]
async fn every_role_generates_every_case() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let inputs = temp_dir.path().join("inputs");
    let outputs = temp_dir.path().join("outputs");
    write(&inputs.join("billing/model.json"), BILLING);
    write(&inputs.join("split/a.json"), r#"{ "name": "split.a" }"#);
    write(&inputs.join("split/b.yaml"), "name: split.b\n");

    let generator = GeneratorCommand::new(env!("CARGO_BIN_EXE_schemagen-gen"));
    let config = HarnessConfig::new(&inputs, &outputs, generator.clone(), generator)
        .with_special_case("split");

    let report = TestOrchestrator::new(config)
        .run_all(&[])
        .await
        .expect("Failed to run harness");

    for outcome in &report.outcomes {
        let result = outcome.result.as_ref().expect("case failed to run");
        for role in Role::ALL {
            let run = result.get(role);
            assert!(
                run.succeeded(),
                "{} failed for {role}:\n{}",
                outcome.name,
                String::from_utf8_lossy(&run.stderr)
            );
        }
    }
    assert_eq!(report.exit_code(), 0);

    let source = |role: Role| {
        fs::read_to_string(outputs.join(role.dir_name()).join("billing/acme/billing/mod.rs"))
            .unwrap()
    };
    assert_eq!(source(Role::Reference), source(Role::CandidateDefault));
    assert!(source(Role::CandidateVariant).contains("#[non_exhaustive]"));

    let split = outputs.join("candidate-default/split/split");
    assert!(split.join("split/a/mod.rs").is_file());
    assert!(split.join("split/b/mod.rs").is_file());
}

#[tokio::test]
async fn invalid_model_fails_the_case() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let inputs = temp_dir.path().join("inputs");
    let outputs = temp_dir.path().join("outputs");
    write(&inputs.join("empty_enum/model.yaml"), "name: acme\nenums:\n  - name: Color\n");

    let generator = GeneratorCommand::new(env!("CARGO_BIN_EXE_schemagen-gen"));
    let config = HarnessConfig::new(&inputs, &outputs, generator.clone(), generator);

    let report = TestOrchestrator::new(config)
        .run_all(&[])
        .await
        .expect("Failed to run harness");

    assert_eq!(report.failed_cases(), vec!["empty_enum"]);
    let result = report.outcomes[0].result.as_ref().unwrap();
    assert!(String::from_utf8_lossy(&result.reference.stderr).contains("has no variants"));
}
