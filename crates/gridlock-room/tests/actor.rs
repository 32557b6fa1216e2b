//! Integration tests for the registry actor.
//!
//! Each test spawns a real actor and drives it through a
//! [`RegistryHandle`]. Commands are processed in order, so a query that
//! returns proves every earlier command has already delivered its events.

use std::time::Duration;

use gridlock_protocol::{ClientEvent, MoveRequest, RoomId, ServerEvent, Symbol};
use gridlock_room::{RegistryConfig, RegistryHandle, RoomError, RoomPhase};
use gridlock_transport::ConnectionId;
use tokio::sync::mpsc;

type Inbox = mpsc::UnboundedReceiver<ServerEvent>;

fn conn(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn r1() -> RoomId {
    RoomId::from("R1")
}

async fn connect(registry: &RegistryHandle, id: u64) -> Inbox {
    let (tx, rx) = mpsc::unbounded_channel();
    registry.register(conn(id), tx).await.unwrap();
    rx
}

/// Waits until the actor has drained everything sent before this call.
async fn settle(registry: &RegistryHandle) {
    registry.room_count().await.unwrap();
}

fn drain(inbox: &mut Inbox) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = inbox.try_recv() {
        events.push(event);
    }
    events
}

fn names(events: &[ServerEvent]) -> Vec<&'static str> {
    events.iter().map(ServerEvent::name).collect()
}

// =========================================================================
// Routing
// =========================================================================

#[tokio::test]
async fn test_create_and_join_route_init_events() {
    let registry = RegistryHandle::spawn(RegistryConfig::default());
    let mut x = connect(&registry, 1).await;
    let mut o = connect(&registry, 2).await;

    registry.dispatch(conn(1), ClientEvent::CreateRoom(r1())).await.unwrap();
    registry.dispatch(conn(2), ClientEvent::JoinRoom(r1())).await.unwrap();
    settle(&registry).await;

    assert_eq!(names(&drain(&mut x)), vec!["init", "init"]);
    match drain(&mut o).as_slice() {
        [ServerEvent::Init(seat)] => assert_eq!(seat.symbol, Symbol::O),
        other => panic!("expected one init, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejections_go_only_to_the_requester() {
    let registry = RegistryHandle::spawn(RegistryConfig::default());
    let mut a = connect(&registry, 1).await;
    let mut b = connect(&registry, 2).await;
    let mut c = connect(&registry, 3).await;

    registry.dispatch(conn(2), ClientEvent::JoinRoom(r1())).await.unwrap();
    settle(&registry).await;
    assert_eq!(drain(&mut b), vec![ServerEvent::NoRoom]);

    registry.dispatch(conn(1), ClientEvent::CreateRoom(r1())).await.unwrap();
    registry.dispatch(conn(3), ClientEvent::CreateRoom(r1())).await.unwrap();
    settle(&registry).await;
    assert_eq!(drain(&mut c), vec![ServerEvent::RoomExists]);

    registry.dispatch(conn(2), ClientEvent::JoinRoom(r1())).await.unwrap();
    registry.dispatch(conn(3), ClientEvent::JoinRoom(r1())).await.unwrap();
    settle(&registry).await;
    assert_eq!(drain(&mut c), vec![ServerEvent::Full]);

    registry.dispatch(conn(1), ClientEvent::JoinRoom(r1())).await.unwrap();
    settle(&registry).await;
    assert_eq!(names(&drain(&mut a)), vec!["init", "init", "alreadySeated"]);
}

#[tokio::test]
async fn test_illegal_move_produces_no_events() {
    let registry = RegistryHandle::spawn(RegistryConfig::default());
    let mut x = connect(&registry, 1).await;
    let mut o = connect(&registry, 2).await;
    registry.dispatch(conn(1), ClientEvent::CreateRoom(r1())).await.unwrap();
    registry.dispatch(conn(2), ClientEvent::JoinRoom(r1())).await.unwrap();
    settle(&registry).await;
    drain(&mut x);
    drain(&mut o);

    let out_of_turn = MoveRequest {
        index: 0,
        symbol: None,
    };
    registry.dispatch(conn(2), ClientEvent::MakeMove(out_of_turn)).await.unwrap();
    settle(&registry).await;

    assert!(drain(&mut x).is_empty());
    assert!(drain(&mut o).is_empty());
    let info = registry.room_info(r1()).await.unwrap();
    assert!(info.board.is_empty());
}

#[tokio::test]
async fn test_move_and_restart_reach_both_seats() {
    let registry = RegistryHandle::spawn(RegistryConfig::default());
    let mut x = connect(&registry, 1).await;
    let mut o = connect(&registry, 2).await;
    registry.dispatch(conn(1), ClientEvent::CreateRoom(r1())).await.unwrap();
    registry.dispatch(conn(2), ClientEvent::JoinRoom(r1())).await.unwrap();

    let request = MoveRequest {
        index: 4,
        symbol: Some(Symbol::X),
    };
    registry.dispatch(conn(1), ClientEvent::MakeMove(request)).await.unwrap();
    registry.dispatch(conn(2), ClientEvent::Restart).await.unwrap();
    settle(&registry).await;

    assert_eq!(
        names(&drain(&mut x)),
        vec!["init", "init", "updateBoard", "restartGame"]
    );
    let o_events = drain(&mut o);
    match o_events.last() {
        Some(ServerEvent::RestartGame(seat)) => {
            assert_eq!(seat.symbol, Symbol::O);
            assert_eq!(seat.current_player, Symbol::O);
            assert!(seat.board.is_empty());
        }
        other => panic!("expected restartGame, got {other:?}"),
    }
}

// =========================================================================
// Disconnect
// =========================================================================

#[tokio::test]
async fn test_disconnect_notifies_opponent_and_resets() {
    let registry = RegistryHandle::spawn(RegistryConfig::default());
    let mut x = connect(&registry, 1).await;
    let _o = connect(&registry, 2).await;
    registry.dispatch(conn(1), ClientEvent::CreateRoom(r1())).await.unwrap();
    registry.dispatch(conn(2), ClientEvent::JoinRoom(r1())).await.unwrap();
    let request = MoveRequest {
        index: 0,
        symbol: None,
    };
    registry.dispatch(conn(1), ClientEvent::MakeMove(request)).await.unwrap();
    settle(&registry).await;
    drain(&mut x);

    registry.disconnect(conn(2)).await.unwrap();
    settle(&registry).await;

    assert_eq!(drain(&mut x), vec![ServerEvent::PlayerLeft]);
    let info = registry.room_info(r1()).await.unwrap();
    assert_eq!(info.phase, RoomPhase::WaitingForOpponent);
    assert_eq!(info.current_player, Symbol::X);
    assert!(info.board.is_empty());
}

#[tokio::test]
async fn test_dropped_receiver_does_not_stall_actor() {
    let registry = RegistryHandle::spawn(RegistryConfig::default());
    let x = connect(&registry, 1).await;
    registry.dispatch(conn(1), ClientEvent::CreateRoom(r1())).await.unwrap();
    drop(x);

    let mut o = connect(&registry, 2).await;
    registry.dispatch(conn(2), ClientEvent::JoinRoom(r1())).await.unwrap();
    settle(&registry).await;

    assert_eq!(names(&drain(&mut o)), vec!["init"]);
}

// =========================================================================
// Queries and lifecycle
// =========================================================================

#[tokio::test]
async fn test_room_info_for_missing_room_is_not_found() {
    let registry = RegistryHandle::spawn(RegistryConfig::default());
    let err = registry.room_info(RoomId::from("nope")).await.unwrap_err();
    assert!(matches!(err, RoomError::NotFound(id) if id.as_str() == "nope"));
}

#[tokio::test]
async fn test_handle_after_shutdown_is_unavailable() {
    let registry = RegistryHandle::spawn(RegistryConfig::default());
    registry.shutdown().await.unwrap();

    // Queued behind the shutdown, so it is dropped with the queue.
    let result = registry.room_count().await;
    assert!(matches!(result, Err(RoomError::Unavailable)));
}

#[tokio::test(start_paused = true)]
async fn test_reaper_removes_empty_room_after_grace() {
    let config = RegistryConfig {
        empty_room_grace: Some(Duration::from_secs(60)),
        reap_interval: Duration::from_secs(10),
        ..RegistryConfig::default()
    };
    let registry = RegistryHandle::spawn(config);
    let _x = connect(&registry, 1).await;
    registry.dispatch(conn(1), ClientEvent::CreateRoom(r1())).await.unwrap();
    registry.disconnect(conn(1)).await.unwrap();
    assert_eq!(registry.room_count().await.unwrap(), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(registry.room_count().await.unwrap(), 1, "still within grace");

    tokio::time::sleep(Duration::from_secs(45)).await;
    assert_eq!(registry.room_count().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_default_config_keeps_empty_rooms() {
    let registry = RegistryHandle::spawn(RegistryConfig::default());
    let _x = connect(&registry, 1).await;
    registry.dispatch(conn(1), ClientEvent::CreateRoom(r1())).await.unwrap();
    registry.disconnect(conn(1)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(400)).await;
    assert_eq!(registry.room_count().await.unwrap(), 1);
    let info = registry.room_info(r1()).await.unwrap();
    assert_eq!(info.phase, RoomPhase::Empty);
}

#[tokio::test(start_paused = true)]
async fn test_reaper_disabled_keeps_rooms() {
    let config = RegistryConfig {
        empty_room_grace: None,
        ..RegistryConfig::default()
    };
    let registry = RegistryHandle::spawn(config);
    let _x = connect(&registry, 1).await;
    registry.dispatch(conn(1), ClientEvent::CreateRoom(r1())).await.unwrap();
    registry.disconnect(conn(1)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert_eq!(registry.room_count().await.unwrap(), 1);
}
