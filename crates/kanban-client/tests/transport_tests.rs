use kanban_client::{DragSession, DropTarget, HttpTransport, LocalTransport, MoveTransport, Resolution};
use kanban_core::KanbanError;
use kanban_domain::{Actor, BoardId, CardId, ColumnId, MoveRequest, NewCard};
use kanban_persistence::MemoryStore;
use kanban_service::{KanbanOperations, KanbanService, ServiceConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use uuid::Uuid;

struct Seeded {
    ops: Arc<dyn KanbanOperations>,
    owner: Actor,
    board_id: BoardId,
    todo: ColumnId,
    done: ColumnId,
    cards: Vec<CardId>,
}

async fn seed() -> Seeded {
    let service = KanbanService::open(MemoryStore::new(), ServiceConfig::default())
        .await
        .unwrap();
    let ops: Arc<dyn KanbanOperations> = Arc::new(service);
    let owner = Actor::new(Uuid::new_v4());

    let board = ops
        .create_board(&owner, "Sprint".to_string(), None, None)
        .await
        .unwrap();
    let todo = ops.create_list(&owner, board.id, "Todo".to_string()).await.unwrap();
    let done = ops.create_list(&owner, board.id, "Done".to_string()).await.unwrap();
    let mut cards = Vec::new();
    for title in ["a", "b", "c"] {
        let card = ops
            .create_card(&owner, board.id, todo.id, NewCard::titled(title))
            .await
            .unwrap();
        cards.push(card.id);
    }

    Seeded {
        ops,
        owner,
        board_id: board.id,
        todo: todo.id,
        done: done.id,
        cards,
    }
}

async fn spawn_server(ops: Arc<dyn KanbanOperations>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(kanban_server::serve(listener, ops));
    format!("http://{}", addr)
}

fn titles(lists: &[kanban_domain::ListView], column: usize) -> Vec<String> {
    lists[column].cards.iter().map(|c| c.title.clone()).collect()
}

#[tokio::test]
async fn test_local_transport_drag_round_trip() {
    let seeded = seed().await;
    let transport = LocalTransport::new(seeded.ops.clone(), seeded.owner);

    let lists = transport.fetch_lists(seeded.board_id).await.unwrap();
    let mut session = DragSession::new(seeded.board_id, lists);
    session.start(seeded.cards[2]).unwrap();
    session.hover(DropTarget::Card(seeded.cards[0])).unwrap();

    let resolution = session
        .commit(&transport, Some(DropTarget::Card(seeded.cards[0])))
        .await
        .unwrap();

    assert!(matches!(resolution, Resolution::Confirmed(_)));
    assert_eq!(titles(&session.lists(), 0), vec!["c", "a", "b"]);

    let server_lists = seeded.ops.board_lists(&seeded.owner, seeded.board_id).await.unwrap();
    assert_eq!(session.lists(), server_lists);
}

#[tokio::test]
async fn test_http_transport_moves_card() {
    let seeded = seed().await;
    let base_url = spawn_server(seeded.ops.clone()).await;
    let transport = HttpTransport::new(base_url, seeded.owner.user_id).unwrap();

    let lists = transport.fetch_lists(seeded.board_id).await.unwrap();
    assert_eq!(titles(&lists, 0), vec!["a", "b", "c"]);

    let mut session = DragSession::new(seeded.board_id, lists);
    session.start(seeded.cards[1]).unwrap();
    let resolution = session
        .commit(&transport, Some(DropTarget::Column(seeded.done)))
        .await
        .unwrap();

    match resolution {
        Resolution::Confirmed(card) => assert_eq!(card.column_id, seeded.done),
        other => panic!("unexpected resolution: {:?}", other),
    }
    assert_eq!(titles(&session.lists(), 0), vec!["a", "c"]);
    assert_eq!(titles(&session.lists(), 1), vec!["b"]);
}

#[tokio::test]
async fn test_http_transport_maps_error_kinds() {
    let seeded = seed().await;
    let base_url = spawn_server(seeded.ops.clone()).await;

    let transport = HttpTransport::new(base_url.clone(), seeded.owner.user_id).unwrap();
    let err = transport
        .move_card(
            seeded.board_id,
            MoveRequest::to_index(seeded.cards[0], seeded.todo, Uuid::new_v4(), 0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, KanbanError::InvalidContainer(_)));

    let stranger = HttpTransport::new(base_url, Uuid::new_v4()).unwrap();
    let err = stranger.fetch_lists(seeded.board_id).await.unwrap_err();
    assert!(matches!(err, KanbanError::Forbidden(_)));
}

#[tokio::test]
async fn test_http_transport_unreachable_server() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::with_timeout(
        format!("http://{}", addr),
        Uuid::new_v4(),
        Duration::from_secs(2),
    )
    .unwrap();
    let err = transport.fetch_lists(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, KanbanError::Transport { .. }));
    assert!(err.is_retryable());
}
