// Federated expansion: one class set per federate over a shared instance tree.
//
// Covers ownership filtering of instances, reaction filtering on the
// federated main reactor (excluded and network reactions), per-federate
// de-duplication, and fingerprint stability across runs.

use rcg::emit::CodegenOptions;
use rcg::federate::{Federate, FederateInstance};
use rcg::id::ReactionKey;
use rcg::instance::InstanceTree;
use rcg::model::Program;
use rcg::pipeline::{generate, GenerationResult};
use rcg::python::PythonEmitter;

// ── Test helpers ────────────────────────────────────────────────────────────

fn load_federated() -> Program {
    let path = format!(
        "{}/tests/fixtures/federated.json",
        env!("CARGO_MANIFEST_DIR")
    );
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path, e));
    Program::from_json(&text).unwrap_or_else(|e| panic!("bad fixture {}: {}", path, e))
}

/// Main reaction 0 observes the sender and runs there; reaction 1 is the
/// sender's outgoing network reaction, reaction 2 the receivers' incoming one.
fn federates(program: &Program) -> Vec<FederateInstance> {
    let main = program.main_reactor().expect("main reactor");
    let keys: Vec<ReactionKey> = program.reaction_keys(main).collect();
    let [observe, send, receive] = keys[..] else {
        panic!("expected three main reactions, found {}", keys.len());
    };
    let mut feds = vec![FederateInstance::for_instantiation("sender", "sender")
        .exclude_reaction(receive)
        .with_network_reaction(send)];
    for bank in 0..2 {
        feds.push(
            FederateInstance::for_instantiation(format!("receivers_{}", bank), "receivers")
                .with_bank_index(bank)
                .exclude_reaction(observe)
                .exclude_reaction(send)
                .with_network_reaction(receive),
        );
    }
    feds
}

fn run(program: &Program) -> GenerationResult {
    let tree = InstanceTree::elaborate(program).expect("elaboration failed");
    let result = generate(
        program,
        &tree,
        &federates(program),
        &PythonEmitter::new(),
        &CodegenOptions::default(),
    );
    assert!(!result.has_error, "generation errors: {:?}", result.diagnostics);
    result
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn bank_width_comes_from_parameter_default() {
    let program = load_federated();
    let tree = InstanceTree::elaborate(&program).unwrap();
    // main, sender, sender.helper, receivers[0], its helper, receivers[1], its helper
    assert_eq!(tree.len(), 7);
    let names: Vec<String> = tree.iter().map(|i| tree.full_name(i.id)).collect();
    assert!(names.contains(&"main.receivers[1].helper".to_string()));
}

#[test]
fn each_federate_gets_its_own_class_set() {
    let result = run(&load_federated());
    assert_eq!(result.federates.len(), 3);
    assert_eq!(
        result.federate("sender").unwrap().class_names,
        vec!["Main", "Sender", "Helper"]
    );
    for name in ["receivers_0", "receivers_1"] {
        assert_eq!(
            result.federate(name).unwrap().class_names,
            vec!["Main", "Receiver", "Helper"]
        );
    }
}

#[test]
fn helper_is_emitted_once_per_federate() {
    let result = run(&load_federated());
    for fed in &result.federates {
        assert_eq!(fed.source.matches("class _Helper:").count(), 1, "{}", fed.federate);
    }
}

#[test]
fn network_and_foreign_reactions_are_filtered() {
    let result = run(&load_federated());
    let sender = &result.federate("sender").unwrap().source;
    assert!(sender.contains("print(sender.out.value)"));
    assert!(!sender.contains("send()"));
    assert!(!sender.contains("receive()"));

    let receiver = &result.federate("receivers_0").unwrap().source;
    assert!(!receiver.contains("sender.out"));
    assert!(!receiver.contains("send()"));
    assert!(!receiver.contains("receive()"));
    // Non-federated classes keep every reaction.
    assert!(receiver.contains("print(inp.value)"));
}

#[test]
fn bank_members_generate_identical_sources() {
    let result = run(&load_federated());
    let first = result.federate("receivers_0").unwrap();
    let second = result.federate("receivers_1").unwrap();
    assert_eq!(first.source, second.source);
    assert_eq!(first.fingerprint, second.fingerprint);
    assert_ne!(first.fingerprint, result.federate("sender").unwrap().fingerprint);
}

#[test]
fn fingerprints_are_stable_across_runs() {
    let program = load_federated();
    let a = run(&program);
    let b = run(&program);
    let fa: Vec<&str> = a.federates.iter().map(|f| f.fingerprint.as_str()).collect();
    let fb: Vec<&str> = b.federates.iter().map(|f| f.fingerprint.as_str()).collect();
    assert_eq!(fa, fb);
    assert!(fa.iter().all(|f| f.len() == 64));
}

#[test]
fn ownership_follows_top_level_ancestor() {
    let program = load_federated();
    let tree = InstanceTree::elaborate(&program).unwrap();
    let feds = federates(&program);
    for inst in tree.iter().filter(|i| i.id != tree.root()) {
        let owners: Vec<&str> = feds
            .iter()
            .filter(|f| f.contains_instance(&tree, inst.id))
            .map(|f| f.name())
            .collect();
        assert_eq!(owners.len(), 1, "{}", tree.full_name(inst.id));
    }
}

#[test]
fn options_load_from_json() {
    let options: CodegenOptions =
        serde_json::from_str(r#"{ "indent_width": 2, "class_comments": false }"#).unwrap();
    assert_eq!(options.indent_width, 2);
    assert!(!options.class_comments);
    assert!(options.is_delay_class("_lf_GenDelay_3"));
}
