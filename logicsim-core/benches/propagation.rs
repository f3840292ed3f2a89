//! Criterion benchmarks for value propagation
//!
//! Run with: cargo bench -p logicsim-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logicsim_core::{Circuit, ComponentId, ComponentSpec, Edge, FlipFlopKind, GateType, TriState};

/// A logic input followed by `length` inverters.
fn inverter_chain(length: usize) -> (Circuit, ComponentId) {
    let mut circuit = Circuit::new();
    let source = circuit
        .create_component(ComponentSpec::logic_input(TriState::False))
        .unwrap();
    let mut previous = source;
    for _ in 0..length {
        let not = circuit.create_component(ComponentSpec::gate(GateType::Not)).unwrap();
        circuit.connect_pins(previous, 0, not, 0).unwrap();
        previous = not;
    }
    circuit.tick().unwrap();
    (circuit, source)
}

/// A clock driving `bits` T flip-flops, each clocked by the previous Q̄.
fn ripple_counter(bits: usize) -> Circuit {
    let mut circuit = Circuit::new();
    let clock = circuit.create_component(ComponentSpec::clock(2, 50)).unwrap();
    let high = circuit
        .create_component(ComponentSpec::logic_input(TriState::True))
        .unwrap();
    let mut previous = (clock, 0);
    for _ in 0..bits {
        let ff = circuit
            .create_component(ComponentSpec::flip_flop(FlipFlopKind::T, Edge::Rising))
            .unwrap();
        circuit.connect_pins(high, 0, ff, 0).unwrap();
        circuit.connect_pins(previous.0, previous.1, ff, 1).unwrap();
        previous = (ff, 1);
    }
    circuit
}

fn bench_toggle_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("Propagation/InverterChain");

    for length in [16, 256, 4096] {
        let (mut circuit, source) = inverter_chain(length);
        group.throughput(Throughput::Elements(length as u64));
        group.bench_function(BenchmarkId::new("toggle_tick", length), |b| {
            b.iter(|| {
                circuit.toggle_input(source).unwrap();
                black_box(circuit.tick().unwrap())
            })
        });
    }
    group.finish();
}

fn bench_ripple_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("Propagation/RippleCounter");

    for bits in [4, 16, 64] {
        let mut circuit = ripple_counter(bits);
        group.bench_function(BenchmarkId::new("tick", bits), |b| {
            b.iter(|| black_box(circuit.tick().unwrap()))
        });
    }
    group.finish();
}

fn bench_stable_tick(c: &mut Criterion) {
    let (mut circuit, _) = inverter_chain(4096);
    c.bench_function("Propagation/StableTick", |b| {
        b.iter(|| black_box(circuit.tick().unwrap()))
    });
}

criterion_group!(benches, bench_toggle_chain, bench_ripple_counter, bench_stable_tick);
criterion_main!(benches);
