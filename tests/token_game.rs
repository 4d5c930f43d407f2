//! 令牌游戏端到端测试：守恒、网关语义、复位与快照隔离。
use std::path::PathBuf;

use pn_token_game::net::io::read_graph;
use pn_token_game::{
    FireError, FireOutcome, GameConfig, GatewayError, GatewayKind, Graph, Marking,
    NotFiredReason, Session, SessionEvent, SessionState, TokenGame,
};

fn fired(outcome: FireOutcome) -> Marking {
    match outcome {
        FireOutcome::Fired(marking) => marking,
        FireOutcome::NotFired(reason) => panic!("expected a firing, got {reason:?}"),
    }
}

#[test]
fn plain_transition_conserves_weighted_tokens() {
    let graph = Graph::builder()
        .place("in1", 5)
        .place("in2", 3)
        .place("out1", 0)
        .place("out2", 1)
        .transition("t")
        .weighted_arc("in1", "t", 2)
        .weighted_arc("in2", "t", 3)
        .weighted_arc("t", "out1", 4)
        .arc("t", "out2")
        .build();
    let mut game = TokenGame::new(graph);
    let before = game.current_marking();

    let after = fired(game.fire_transition("t", None).unwrap());

    assert_eq!(after.tokens("in1"), 3);
    assert_eq!(after.tokens("in2"), 0);
    assert_eq!(after.tokens("out1"), 4);
    assert_eq!(after.tokens("out2"), 2);
    let produced = 4 + 1;
    let consumed = 2 + 3;
    assert_eq!(
        after.total() as i64 - before.total() as i64,
        produced - consumed
    );
}

#[test]
fn and_join_rejects_when_any_input_is_short() {
    let graph = Graph::builder()
        .place("a", 1)
        .place("b", 0)
        .place("c", 0)
        .gateway("j", GatewayKind::AndJoin)
        .arc("a", "j")
        .arc("b", "j")
        .arc("j", "c")
        .build();
    let mut game = TokenGame::new(graph);
    let before = game.current_marking();

    assert!(!game.is_enabled("j"));
    assert_eq!(
        game.fire_transition("j", None).unwrap(),
        FireOutcome::NotFired(NotFiredReason::Disabled)
    );
    assert_eq!(game.current_marking(), before);
}

#[test]
fn xor_join_consumes_only_first_satisfied_input() {
    let graph = Graph::builder()
        .place("a", 0)
        .place("b", 2)
        .place("c", 1)
        .place("out", 0)
        .gateway("x", GatewayKind::XorJoin)
        .arc("a", "x")
        .arc("b", "x")
        .arc("c", "x")
        .arc("x", "out")
        .build();
    let mut game = TokenGame::new(graph);

    let after = fired(game.fire_transition("x", None).unwrap());
    assert_eq!(after.tokens("a"), 0);
    assert_eq!(after.tokens("b"), 1);
    assert_eq!(after.tokens("c"), 1);
    assert_eq!(after.tokens("out"), 1);
}

#[test]
fn xor_split_produces_on_selected_target_only() {
    let graph = Graph::builder()
        .place("p", 1)
        .place("l", 0)
        .place("r", 0)
        .gateway("s", GatewayKind::XorSplit)
        .arc("p", "s")
        .weighted_arc("s", "l", 2)
        .arc("s", "r")
        .build();
    let mut game = TokenGame::new(graph);

    let err = game.fire_transition("s", Some("p")).unwrap_err();
    assert!(matches!(
        err,
        FireError::Precondition {
            source: GatewayError::SelectionNotAnOutput(_),
            ..
        }
    ));
    assert_eq!(
        game.fire_transition("s", None).unwrap(),
        FireOutcome::NotFired(NotFiredReason::SelectionRequired)
    );
    assert_eq!(game.current_marking().tokens("p"), 1);

    let after = fired(game.fire_transition("s", Some("l")).unwrap());
    assert_eq!(after.tokens("l"), 2);
    assert_eq!(after.tokens("r"), 0);
}

#[test]
fn unknown_gateway_behaves_as_and_split() {
    let graph = Graph::builder()
        .place("p", 1)
        .place("q", 0)
        .place("r", 0)
        .gateway("u", GatewayKind::Unknown)
        .arc("p", "u")
        .arc("u", "q")
        .arc("u", "r")
        .build();
    let mut game = TokenGame::new(graph);
    assert!(!game.transition_options("u").requires_selection);
    let after = fired(game.fire_transition("u", None).unwrap());
    assert_eq!((after.tokens("q"), after.tokens("r")), (1, 1));
}

#[test]
fn and_split_concrete_scenario() {
    let graph = Graph::builder()
        .place("P1", 2)
        .place("P2", 0)
        .place("P3", 0)
        .gateway("T1", GatewayKind::AndSplit)
        .weighted_arc("P1", "T1", 2)
        .arc("T1", "P2")
        .arc("T1", "P3")
        .build();
    let mut game = TokenGame::new(graph);

    assert!(game.is_enabled("T1"));
    let after = fired(game.fire_transition("T1", None).unwrap());
    assert_eq!(after.to_string(), "P1=0, P2=1, P3=1");
    assert_eq!(
        game.fire_transition("T1", None).unwrap(),
        FireOutcome::NotFired(NotFiredReason::Disabled)
    );
}

#[test]
fn reset_is_idempotent_and_snapshots_are_isolated() {
    let graph = Graph::builder()
        .place("p", 1)
        .place("q", 0)
        .transition("t")
        .arc("p", "t")
        .arc("t", "q")
        .build();
    let mut game = TokenGame::new(graph);
    let initial = game.current_marking();

    game.fire_transition("t", None).unwrap();
    for _ in 0..3 {
        game.reset();
        assert_eq!(game.current_marking(), initial);
    }

    let mut snapshot = game.current_marking();
    snapshot.set("p", 0);
    snapshot.set("ghost", 4);
    assert!(game.is_enabled("t"));
    assert_eq!(game.current_marking(), initial);
}

fn order_net() -> Graph {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("nets")
        .join("order_review.json");
    read_graph(path).unwrap()
}

#[test]
fn order_review_net_plays_through_a_session() {
    let mut session = Session::new(GameConfig::default());
    session.handle(SessionEvent::LoadGraph(order_net())).unwrap();
    let update = session.handle(SessionEvent::StartGame).unwrap();
    assert_eq!(update.enabled, vec!["split".to_owned()]);

    for transition in ["split", "join"] {
        let update = session
            .handle(SessionEvent::SelectTransition(transition.into()))
            .unwrap();
        assert!(update.fired.unwrap().is_fired());
    }

    session
        .handle(SessionEvent::SelectTransition("review".into()))
        .unwrap();
    let options = match session.state() {
        SessionState::TransitionSelected { options, .. } => options.clone(),
        other => panic!("unexpected state {other}"),
    };
    let labels = options
        .available_outputs
        .unwrap()
        .into_iter()
        .map(|output| output.label)
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Approved", "Rejected"]);

    session
        .handle(SessionEvent::FireTransition {
            output: Some("rejected".into()),
        })
        .unwrap();
    let update = session
        .handle(SessionEvent::SelectTransition("archive".into()))
        .unwrap();
    let marking = update.marking().unwrap();
    assert_eq!(marking.tokens("closed"), 1);
    assert_eq!(marking.tokens("approved"), 0);
    assert_eq!(marking.total(), 1);
    assert!(update.enabled.is_empty());
}
