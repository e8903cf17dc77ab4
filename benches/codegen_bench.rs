use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rcg::emit::CodegenOptions;
use rcg::federate::FederateInstance;
use rcg::instance::InstanceTree;
use rcg::model::{
    Instantiation, Parameter, Port, PortDirection, Program, Reaction, Reactor, StateVar, Value,
    VarRef, WidthSpec,
};
use rcg::pipeline::{generate, generate_unfederated};
use rcg::python::PythonEmitter;
use rcg::time::{TimeUnit, TimeValue};

// Scaling scenarios: a federated main reactor with `n` top-level banks, each
// bank member nesting a shared worker class two levels deep.

fn worker(name: &str) -> Reactor {
    let mut r = Reactor::new(name);
    r.parameters.push(Parameter {
        name: "period".to_string(),
        ty: None,
        init: vec![Value::Time(TimeValue::new(10, TimeUnit::Msec))],
    });
    r.state_vars.push(StateVar {
        name: "count".to_string(),
        ty: None,
        init: vec![Value::literal("0")],
    });
    r.ports.push(Port {
        name: "out".to_string(),
        direction: PortDirection::Output,
        ty: None,
        width: None,
    });
    r.reactions.push(Reaction {
        triggers: Vec::new(),
        sources: Vec::new(),
        effects: vec![VarRef::local("out")],
        code: "self.count += 1\nout.set(self.count)".to_string(),
        label: None,
    });
    r
}

fn scaling_program(n_banks: usize) -> Program {
    let leaf = worker("Leaf");
    let mut node = worker("Node");
    for i in 0..3 {
        node.instantiations.push(Instantiation {
            name: format!("leaf{}", i),
            reactor_class: "Leaf".to_string(),
            width: None,
            parameters: Vec::new(),
        });
    }
    let mut main = Reactor::new("Main");
    main.is_main = true;
    main.is_federated = true;
    for i in 0..n_banks {
        main.instantiations.push(Instantiation {
            name: format!("bank{}", i),
            reactor_class: "Node".to_string(),
            width: Some(WidthSpec::literal(4)),
            parameters: Vec::new(),
        });
    }
    Program::new(vec![main, node, leaf])
}

fn bench_elaborate(c: &mut Criterion) {
    let mut group = c.benchmark_group("elaborate");
    for n in [1usize, 8, 64] {
        let program = scaling_program(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &program, |b, program| {
            b.iter(|| InstanceTree::elaborate(black_box(program)).unwrap());
        });
    }
    group.finish();
}

fn bench_expand_unfederated(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand/unfederated");
    let options = CodegenOptions::default();
    for n in [1usize, 8, 64] {
        let program = scaling_program(n);
        let tree = InstanceTree::elaborate(&program).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                generate_unfederated(
                    black_box(&program),
                    black_box(&tree),
                    &PythonEmitter::new(),
                    &options,
                )
            });
        });
    }
    group.finish();
}

fn bench_expand_per_federate(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand/per_federate");
    let options = CodegenOptions::default();
    for n in [1usize, 8, 64] {
        let program = scaling_program(n);
        let tree = InstanceTree::elaborate(&program).unwrap();
        let federates: Vec<FederateInstance> = (0..n)
            .flat_map(|i| {
                (0..4u32).map(move |bank| {
                    FederateInstance::for_instantiation(
                        format!("bank{}_{}", i, bank),
                        format!("bank{}", i),
                    )
                    .with_bank_index(bank)
                })
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                generate(
                    black_box(&program),
                    black_box(&tree),
                    &federates,
                    &PythonEmitter::new(),
                    &options,
                )
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_elaborate,
    bench_expand_unfederated,
    bench_expand_per_federate
);
criterion_main!(benches);
