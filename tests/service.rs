use rtodo::{Database, Error, TodoService};

fn service() -> TodoService {
    TodoService::new(Database::open_in_memory().unwrap())
}

#[tokio::test]
async fn blank_section_titles_are_rejected() {
    let service = service();

    for title in ["", "   ", "\t\n"] {
        let err = service.add_section(title).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "title {:?}", title);
    }

    let sections = service.watch_sections().await.unwrap();
    assert!(sections.borrow().is_empty());
}

#[tokio::test]
async fn add_task_requires_a_valid_due_date() {
    let service = service();
    let section = service.add_section("Groceries").await.unwrap();

    let err = service
        .add_task(section.id, "buy milk", "31042024")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let tasks = service.watch_tasks(section.id).await.unwrap();
    assert!(tasks.borrow().is_empty());

    let task = service
        .add_task(section.id, "buy milk", "29/02/2024")
        .await
        .unwrap();
    assert_eq!(task.section_id, section.id);
    assert!(!task.done);
    assert_eq!(task.created_at, task.edited_at);
}

#[tokio::test]
async fn edit_task_requires_a_valid_due_date() {
    let service = service();
    let section = service.add_section("Work").await.unwrap();
    let task = service
        .add_task(section.id, "draft report", "01012030")
        .await
        .unwrap();

    let err = service
        .edit_task(task.id, "draft report", "1/1/2030")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let changed = service
        .edit_task(task.id, "send report", "02012030")
        .await
        .unwrap();
    assert_eq!(changed, 1);

    let tasks = service.watch_tasks(section.id).await.unwrap();
    let snapshot = tasks.borrow().to_vec();
    assert_eq!(snapshot[0].description, "send report");
    assert_eq!(snapshot[0].due_date, "02012030");
    assert!(snapshot[0].edited_at >= task.edited_at);
}

#[tokio::test]
async fn toggling_done_twice_is_idempotent_and_restamps_edited_at() {
    let service = service();
    let section = service.add_section("Work").await.unwrap();
    let task = service
        .add_task(section.id, "draft report", "01/01/2030")
        .await
        .unwrap();

    let once = service.toggle_task_done(&task, true).await.unwrap().unwrap();
    assert!(once.done);
    assert!(once.edited_at >= task.edited_at);

    let twice = service.toggle_task_done(&once, true).await.unwrap().unwrap();
    assert!(twice.done);
    assert!(twice.edited_at >= once.edited_at);

    let tasks = service.watch_tasks(section.id).await.unwrap();
    assert!(tasks.borrow()[0].done);

    let back = service.toggle_task_done(&twice, false).await.unwrap().unwrap();
    assert!(!back.done);
}

#[tokio::test]
async fn toggling_a_deleted_task_persists_nothing() {
    let service = service();
    let section = service.add_section("Work").await.unwrap();
    let task = service
        .add_task(section.id, "fleeting", "01/01/2030")
        .await
        .unwrap();

    assert_eq!(service.delete_task(task.id).await.unwrap(), 1);
    assert!(service
        .toggle_task_done(&task, true)
        .await
        .unwrap()
        .is_none());

    let tasks = service.watch_tasks(section.id).await.unwrap();
    assert!(tasks.borrow().is_empty());
}

#[tokio::test]
async fn editing_a_deleted_task_is_a_no_op() {
    let service = service();
    let section = service.add_section("Work").await.unwrap();
    let task = service
        .add_task(section.id, "fleeting", "01/01/2030")
        .await
        .unwrap();

    assert_eq!(service.delete_task(task.id).await.unwrap(), 1);
    assert_eq!(
        service
            .edit_task(task.id, "too late", "01/01/2030")
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn section_passthroughs_reach_the_store() {
    let service = service();
    let section = service.add_section("Old name").await.unwrap();

    assert_eq!(
        service.rename_section(section.id, "New name").await.unwrap(),
        1
    );
    assert_eq!(
        service
            .section_by_id(section.id)
            .await
            .unwrap()
            .unwrap()
            .title,
        "New name"
    );

    assert_eq!(service.delete_section(section.id).await.unwrap(), 1);
    assert!(service.section_by_id(section.id).await.unwrap().is_none());
}
