//! End-to-end execution display scenario
//!
//! Drives the session through the same sequence the run command takes:
//! parse a backend run response, apply it, and check the displayed list is
//! a full replacement keyed by step order.

use agentflow_client::types::RunResponse;
use agentflow_client::ExecutionSession;

#[test]
fn run_response_becomes_the_displayed_list() {
    let mut session = ExecutionSession::new(7, 3);

    // Pretend history was on display before the run.
    let token = session.begin_run("warmup").unwrap();
    let history: RunResponse = serde_json::from_str(
        r#"{"resultados": [
            {"position": 1, "agent_name": "Old", "response": "previous run"},
            {"position": 2, "agent_name": "Older", "response": "previous run too"}
        ]}"#,
    )
    .unwrap();
    assert!(session.apply_response(token, history));

    let token = session.begin_run("x").unwrap();
    let response: RunResponse = serde_json::from_str(
        r#"{"resultados": [{"position": 1, "agent_name": "Alpha", "response": "hi"}]}"#,
    )
    .unwrap();
    assert!(session.apply_response(token, response));

    let shown = session.results();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].order, 1);
    assert_eq!(shown[0].agent_name, "Alpha");
    assert_eq!(shown[0].response_text, "hi");

    assert_eq!(session.copy_result(1).unwrap(), "hi");
}
