//! End-to-end tests for circuit execution and the result contract.

use std::f64::consts::PI;
use std::time::Duration;

use num_complex::Complex64;
use proptest::prelude::*;
use qsphere_sim::{
    CancelToken, Circuit, InitialState, SimulationRequest, Simulator, SimulatorConfig, spawn,
    spawn_with_token,
};

fn simulator() -> Simulator {
    Simulator::new(SimulatorConfig::default())
}

fn assert_bloch(result: &qsphere_sim::SimulationResult, qubit: usize, expected: (f64, f64, f64)) {
    let b = result.qubit(qubit).unwrap().bloch_vector;
    assert!(
        (b.x - expected.0).abs() < 1e-6
            && (b.y - expected.1).abs() < 1e-6
            && (b.z - expected.2).abs() < 1e-6,
        "qubit {qubit}: got ({}, {}, {}), expected {expected:?}",
        b.x,
        b.y,
        b.z
    );
}

// ---------------------------------------------------------------------------
// Basis scenarios
// ---------------------------------------------------------------------------

#[test]
fn single_qubit_scenarios() {
    let sim = simulator();

    let result = sim.run(&Circuit::new(1), &InitialState::Zero);
    assert_bloch(&result, 0, (0.0, 0.0, 1.0));
    assert!((result.qubit(0).unwrap().purity - 1.0).abs() < 1e-12);

    let mut x = Circuit::new(1);
    x.x(0);
    assert_bloch(&sim.run(&x, &InitialState::Zero), 0, (0.0, 0.0, -1.0));

    let mut h = Circuit::new(1);
    h.h(0);
    assert_bloch(&sim.run(&h, &InitialState::Zero), 0, (1.0, 0.0, 0.0));

    let mut rx = Circuit::new(1);
    rx.rx(PI / 2.0, 0);
    assert_bloch(&sim.run(&rx, &InitialState::Zero), 0, (0.0, -1.0, 0.0));
}

#[test]
fn omitted_rotation_angle_defaults_to_quarter_turn() {
    let mut implicit = Circuit::new(1);
    implicit.gate("RY", &[0], &[]);
    let mut explicit = Circuit::new(1);
    explicit.ry(PI / 2.0, 0);

    let a = simulator().run(&implicit, &InitialState::Zero);
    let b = simulator().run(&explicit, &InitialState::Zero);
    assert_eq!(a.statevector(), b.statevector());
    assert_bloch(&a, 0, (1.0, 0.0, 0.0));
}

#[test]
fn custom_initial_amplitudes() {
    let initial = InitialState::custom(Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0));
    let result = simulator().run(&Circuit::new(2), &initial);
    assert_bloch(&result, 0, (1.0, 0.0, 0.0));
    assert_bloch(&result, 1, (0.0, 0.0, 1.0));

    let zero = InitialState::custom(Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0));
    let result = simulator().run(&Circuit::new(1), &zero);
    assert!(!result.success);
    assert!(result.error.is_some());
}

#[test]
fn bell_state_from_json() {
    let json = r#"{
        "numQubits": 2,
        "gates": [
            { "name": "H", "qubits": [0] },
            { "name": "CNOT", "qubits": [0, 1] }
        ]
    }"#;
    let circuit = Circuit::from_json(json).unwrap();
    let result = simulator().run(&circuit, &InitialState::Zero);

    assert!(result.success);
    for q in 0..2 {
        let report = result.qubit(q).unwrap();
        assert_bloch(&result, q, (0.0, 0.0, 0.0));
        assert!((report.purity - 0.5).abs() < 1e-6);
        assert!(report.concurrence > 0.0);
        assert!(report.von_neumann_entropy.abs() < 1e-9);
        assert!((report.reduced_entropy - 1.0).abs() < 1e-9);
        assert_eq!(report.reduced_radius, report.bloch_vector.radius());
    }

    let amps = result.statevector().unwrap();
    let h = std::f64::consts::FRAC_1_SQRT_2;
    assert!((amps[0].re - h).abs() < 1e-12);
    assert!((amps[3].re - h).abs() < 1e-12);
    assert!(amps[1].norm() < 1e-12 && amps[2].norm() < 1e-12);
}

#[test]
fn pair_concurrence_is_reported_only_for_two_qubits() {
    let result = simulator().run(&Circuit::ghz(3), &InitialState::Zero);
    assert!(result.success);
    for report in &result.qubit_results {
        assert_eq!(report.concurrence, 0.0);
        assert!(!report.is_entangled);
        assert!(report.von_neumann_entropy.abs() < 1e-9);
        assert!((report.rest_concurrence - 1.0).abs() < 1e-9);
    }

    let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    let q0 = &value["qubitResults"][0];
    assert!(q0["restConcurrence"].as_f64().is_some());
    assert!(q0["reducedEntropy"].as_f64().is_some());
}

#[test]
fn cnot_operand_order_matters() {
    // Control on qubit 1, which is |0⟩: nothing happens to qubit 0.
    let mut circuit = Circuit::new(2);
    circuit.h(0).cx(1, 0);
    let result = simulator().run(&circuit, &InitialState::Zero);
    assert_bloch(&result, 0, (1.0, 0.0, 0.0));
    assert_bloch(&result, 1, (0.0, 0.0, 1.0));
    assert!(!result.qubit(0).unwrap().is_entangled);
}

// ---------------------------------------------------------------------------
// Failure containment
// ---------------------------------------------------------------------------

#[test]
fn failures_produce_structured_results() {
    let sim = simulator();
    let cases: Vec<(Circuit, &str)> = vec![
        {
            let mut c = Circuit::new(1);
            c.gate("teleport", &[0], &[]);
            (c, "teleport")
        },
        {
            let mut c = Circuit::new(2);
            c.gate("h", &[0, 1], &[]);
            (c, "h")
        },
        {
            let mut c = Circuit::new(1);
            c.gate("rx", &[0], &[1.0, 2.0]);
            (c, "rx")
        },
        {
            let mut c = Circuit::new(2);
            c.x(7);
            (c, "qubit 7")
        },
        (Circuit::new(0), "at least one qubit"),
    ];

    for (circuit, needle) in cases {
        let result = sim.run(&circuit, &InitialState::Zero);
        assert!(!result.success);
        assert!(result.qubit_results.is_empty());
        let error = result.error.unwrap();
        assert!(error.contains(needle), "'{error}' should mention '{needle}'");
        assert!(result.execution_time >= 0.0);
    }
}

#[test]
fn failed_result_serializes_without_qubits() {
    let mut circuit = Circuit::new(1);
    circuit.gate("warp", &[0], &[]);
    let result = simulator().run(&circuit, &InitialState::Zero);
    let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(value["success"], false);
    assert!(value["qubitResults"].as_array().unwrap().is_empty());
    assert!(value["error"].as_str().unwrap().contains("warp"));
    assert!(value["executionTime"].as_f64().is_some());
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

#[tokio::test]
async fn worker_matches_direct_run() {
    let request = SimulationRequest::new(Circuit::ghz(5), InitialState::Zero);
    let direct = simulator().run(&request.circuit, &request.initial_state);
    let offloaded = spawn(simulator(), request).join().await;

    assert!(offloaded.success);
    assert_eq!(offloaded.qubit_results, direct.qubit_results);
}

#[tokio::test]
async fn worker_cancellation_is_reported() {
    let token = CancelToken::new();
    let handle = spawn_with_token(
        simulator(),
        SimulationRequest::new(Circuit::bell(), InitialState::Zero),
        token.clone(),
    );
    handle.cancel();
    assert!(token.is_cancelled());
    let result = handle.join().await;
    // The run may finish its two gates before noticing; either way it is
    // a complete result or a clean cancellation.
    if !result.success {
        assert_eq!(result.error.as_deref(), Some("simulation cancelled"));
        assert!(result.qubit_results.is_empty());
    }
}

#[tokio::test]
async fn worker_timeout_cancels_long_runs() {
    let mut circuit = Circuit::new(18);
    for _ in 0..2000 {
        for q in 0..18 {
            circuit.h(q);
        }
    }
    let handle = spawn(simulator(), SimulationRequest::new(circuit, InitialState::Zero));
    let token = handle.token().clone();
    let result = handle.join_timeout(Duration::from_millis(1)).await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("timed out"));
    assert!(token.is_cancelled());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn arb_two_qubit_circuit() -> impl Strategy<Value = Circuit> {
    let op = prop_oneof![
        (prop::sample::select(vec!["x", "y", "z", "h", "s", "t"]), 0_usize..2)
            .prop_map(|(name, q)| (name, vec![q], Vec::<f64>::new())),
        (prop::sample::select(vec!["rx", "ry", "rz"]), -PI..PI, 0_usize..2)
            .prop_map(|(name, theta, q)| (name, vec![q], vec![theta])),
        (prop::sample::select(vec!["cx", "cz", "swap"]), prop::bool::ANY)
            .prop_map(|(name, flip)| {
                let qubits = if flip { vec![1, 0] } else { vec![0, 1] };
                (name, qubits, Vec::<f64>::new())
            }),
    ];
    prop::collection::vec(op, 0..=16).prop_map(|ops| {
        let mut circuit = Circuit::new(2);
        for (name, qubits, params) in ops {
            circuit.gate(name, &qubits, &params);
        }
        circuit
    })
}

proptest! {
    #[test]
    fn two_qubit_reports_stay_physical(circuit in arb_two_qubit_circuit(), preset in 0_usize..6) {
        let initial = InitialState::PRESETS[preset];
        let result = simulator().run(&circuit, &initial);
        prop_assert!(result.success);

        let norm: f64 = result.statevector().unwrap().iter().map(Complex64::norm_sqr).sum();
        prop_assert!((norm - 1.0).abs() < 1e-6);

        for q in &result.qubit_results {
            prop_assert!(q.purity >= 0.5 - 1e-6 && q.purity <= 1.0 + 1e-6);
            prop_assert!((0.0..=1.0).contains(&q.concurrence));
            prop_assert!(q.reduced_radius <= 1.0);
            prop_assert_eq!(q.is_entangled, q.witness_value < 0.0);
        }
    }
}
