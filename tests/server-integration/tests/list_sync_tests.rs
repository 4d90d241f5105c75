use grocery_common::item::{GroceryItem, NewItem};
use grocery_common::list::{sort_for_display, ListError, ListSync, SyncMode};
use grocery_common::store::ItemStore;
use grocery_server_integration::TestServer;

async fn scripted_session(mode: SyncMode) -> Vec<GroceryItem> {
    let server = TestServer::start().await;
    let sync = ListSync::new(server.item_store(), mode);
    let mut items = sync.load().await.unwrap();

    let milk = sync.add_typed(&mut items, "Milk").await.unwrap();
    sync.add_suggested(&mut items, NewItem::named("Butter"))
        .await
        .unwrap();
    sync.add_many(&mut items, vec!["flour".into(), "sugar".into()])
        .await
        .unwrap();
    sync.toggle(&mut items, &milk.id).await.unwrap();
    let butter = items[1].id.clone();
    sync.remove(&mut items, &butter).await.unwrap();

    assert_eq!(items, sync.store().list().await.unwrap());
    items
}

fn names(items: &[GroceryItem]) -> Vec<(String, bool)> {
    items.iter().map(|i| (i.name.clone(), i.completed)).collect()
}

/// Against a single writer, patching locally and re-reading agree.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn optimistic_and_refetch_agree_over_http() {
    let optimistic = scripted_session(SyncMode::Optimistic).await;
    let refetched = scripted_session(SyncMode::Refetch).await;
    assert_eq!(names(&optimistic), names(&refetched));
    assert_eq!(
        names(&optimistic),
        vec![
            ("Milk".to_string(), true),
            ("flour".to_string(), false),
            ("sugar".to_string(), false)
        ]
    );

    let display: Vec<_> = sort_for_display(&optimistic)
        .into_iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(display, vec!["flour", "sugar", "Milk"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn short_input_never_reaches_server() {
    let server = TestServer::start().await;
    let sync = ListSync::new(server.item_store(), SyncMode::Refetch);
    let mut items = Vec::new();

    assert!(matches!(
        sync.add_typed(&mut items, " ok ").await,
        Err(ListError::Input(_))
    ));
    assert!(server.item_store().list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn removing_unknown_id_is_not_found() {
    let server = TestServer::start().await;
    let sync = ListSync::new(server.item_store(), SyncMode::Optimistic);
    let mut items = Vec::new();
    sync.add_typed(&mut items, "Apples").await.unwrap();

    let stale = grocery_common::item::ItemId::from("0");
    let err = sync.remove(&mut items, &stale).await.unwrap_err();
    assert_eq!(err, ListError::NotFound(stale));
    assert_eq!(items.len(), 1);
    assert_eq!(server.item_store().list().await.unwrap(), items);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn toggling_twice_restores_item() {
    let server = TestServer::start().await;
    let store = server.item_store();
    let tea = store.add(NewItem::named("Tea")).await.unwrap();

    store.toggle(&tea.id).await.unwrap();
    let back = store.toggle(&tea.id).await.unwrap().unwrap();
    assert_eq!(back, tea);
}

/// Suggestions and ingredients skip the name check, so the server must accept them as-is.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn short_suggestions_and_ingredients_are_stored() {
    let server = TestServer::start().await;
    let sync = ListSync::new(server.item_store(), SyncMode::Refetch);
    let mut items = Vec::new();

    let ox = sync
        .add_suggested(&mut items, NewItem::named("Ox"))
        .await
        .unwrap();
    assert_eq!(ox.name, "Ox");

    sync.add_many(&mut items, vec!["egg".into(), "ox".into(), "rice".into()])
        .await
        .unwrap();
    assert_eq!(
        names(&items)
            .into_iter()
            .map(|(name, _)| name)
            .collect::<Vec<_>>(),
        vec!["Ox", "egg", "ox", "rice"]
    );
    assert_eq!(server.item_store().list().await.unwrap(), items);
}
