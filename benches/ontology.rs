use std::fmt::Write;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use goenrich::Ontology;

/// Builds a vocabulary of `size` terms where every term has one or two parents
fn synthetic_obo(size: usize) -> String {
    let mut obo = String::from("format-version: 1.2\nsubsetdef: goslim_bench \"Bench slim\"\n\n");
    obo.push_str("[Term]\nid: GO:0000000\nname: root\nnamespace: biological_process\n\n");
    for idx in 1..size {
        let _ = write!(
            obo,
            "[Term]\nid: GO:{idx:07}\nname: term {idx}\nnamespace: biological_process\nis_a: GO:{:07} ! parent\n",
            (idx - 1) / 4
        );
        if idx > 8 {
            let _ = writeln!(obo, "relationship: part_of GO:{:07}", idx / 8);
        }
        if idx % 50 == 0 {
            obo.push_str("subset: goslim_bench\n");
        }
        obo.push('\n');
    }
    obo.push_str("[Typedef]\nid: part_of\nname: part of\n");
    obo
}

fn load_ontology_benchmark(c: &mut Criterion) {
    let obo = synthetic_obo(20_000);
    c.bench_function("load ontology", |b| {
        b.iter(|| {
            Ontology::from_text(black_box(&obo))
                .expect("synthetic ontology is valid")
                .len()
        })
    });
}

fn traversal_benchmark(c: &mut Criterion) {
    let ontology = Ontology::from_text(&synthetic_obo(20_000)).expect("synthetic ontology is valid");
    let leaves: Vec<String> = (19_000..19_100).map(|idx| format!("GO:{idx:07}")).collect();

    c.bench_function("super graph", |b| {
        b.iter(|| {
            ontology
                .extract_super_graph(black_box(&leaves))
                .expect("all terms exist")
                .len()
        })
    });

    c.bench_function("sub graph", |b| {
        b.iter(|| {
            ontology
                .extract_sub_graph(black_box(["GO:0000001"]))
                .expect("term exists")
                .len()
        })
    });

    c.bench_function("term depth", |b| {
        b.iter(|| {
            let ontology = Ontology::from_text(&synthetic_obo(2_000)).expect("synthetic ontology is valid");
            ontology
                .terms()
                .map(|term| term.depth().expect("synthetic ontology is acyclic"))
                .max()
        })
    });
}

criterion_group! {
    name = ontology;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = load_ontology_benchmark, traversal_benchmark
}
criterion_main!(ontology);
