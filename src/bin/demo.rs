// SWIM Membership Engine — demo driver
//
// A minimal stand-in for the outer application loop described as external
// to the engine in the spec: it owns process startup/teardown logging and
// drives a handful of engines over a shared in-memory transport. Not part
// of the library's public contract.

use swim_membership::{Address, ChannelTransport, Engine, Params, TracingLog};

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!(version = swim_membership::VERSION, "starting membership demo");

    let transport = ChannelTransport::new();
    let params = Params::default();

    let introducer_addr = Address::INTRODUCER;
    let n2_addr = Address::new(2, 5);
    let n3_addr = Address::new(3, 5);

    let mut introducer = Engine::new(introducer_addr, params, transport.clone(), TracingLog);
    let mut n2 = Engine::new(n2_addr, params, transport.clone(), TracingLog);
    let mut n3 = Engine::new(n3_addr, params, transport, TracingLog);

    if let Err(e) = introducer.start(introducer_addr) {
        tracing::error!(error = %e, "introducer failed to bootstrap");
        std::process::exit(1);
    }
    if let Err(e) = n2.start(introducer_addr) {
        tracing::error!(error = %e, "n2 failed to bootstrap");
        std::process::exit(1);
    }

    // a handful of ticks is enough for the join handshake to stabilize
    for _ in 0..3 {
        step(&mut introducer);
        step(&mut n2);
    }

    if let Err(e) = n3.start(introducer_addr) {
        tracing::error!(error = %e, "n3 failed to bootstrap");
        std::process::exit(1);
    }

    for _ in 0..(2 * swim_membership::T_REMOVE) {
        step(&mut introducer);
        step(&mut n2);
        step(&mut n3);
    }

    tracing::info!(
        introducer_members = introducer.members().len(),
        n2_members = n2.members().len(),
        n3_members = n3.members().len(),
        "stabilized"
    );
}

fn step<T: swim_membership::Transport, L: swim_membership::Log>(engine: &mut Engine<T, L>) {
    if let Err(e) = engine.recv() {
        tracing::error!(error = %e, "recv failed");
        std::process::exit(1);
    }
    if let Err(e) = engine.tick() {
        tracing::error!(node_id = %engine.self_addr(), error = %e, "scheduler invariant violated");
        std::process::exit(1);
    }
}
