use tokio::net::TcpListener;

use mock_api::{router, service::NoteService};
use notes_client::{CreateNoteRequest, NoteClient, NoteClientError, UpdateNoteRequest};

async fn spawn_mock_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router(NoteService::default())).await;
    });
    format!("http://{addr}/notes/")
}

#[tokio::test]
async fn full_note_lifecycle() {
    let client = NoteClient::new(spawn_mock_api().await);

    assert!(client.list().await.unwrap().is_empty());

    let created = client
        .create(&CreateNoteRequest::new("Groceries", "milk"))
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert!(created.created_at_timestamp().is_some());

    let updated = client
        .update(created.id, &UpdateNoteRequest::default().content("milk, eggs"))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Groceries");
    assert_eq!(updated.content, "milk, eggs");
    assert_eq!(updated.created_at, created.created_at);

    let fetched = client.get(created.id).await.unwrap();
    assert_eq!(fetched, updated);

    let listed = client.list().await.unwrap();
    assert_eq!(listed, vec![updated]);

    client.delete(created.id).await.unwrap();
    assert!(client.list().await.unwrap().is_empty());

    let err = client.delete(created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(matches!(err, NoteClientError::RequestFailed { .. }));
}
