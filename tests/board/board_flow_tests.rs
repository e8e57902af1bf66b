//! End-to-end board flows through the public service API.

use std::collections::HashMap;

use super::helpers::{Board, board, ensure_contiguous, layout};
use taskboard::task::{
    domain::{ChecklistItemDraft, TaskFilter, TaskId, TaskScope, TaskStatus, UserId},
    services::{ReorderTaskRequest, TaskServiceError, UpdateTaskRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn card_travels_across_the_board(board: Board) -> Result<(), eyre::Report> {
    let owner = UserId::new();
    let seeded = board
        .seed(owner, TaskStatus::Backlog, &["Draft outline", "Collect data"])
        .await?;
    let card = seeded
        .first()
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("seeded card missing"))?;

    let started = board
        .service
        .update(
            card,
            owner,
            UpdateTaskRequest::new()
                .with_status(TaskStatus::InProgress)
                .with_items([
                    ChecklistItemDraft::new("Intro").checked(true),
                    ChecklistItemDraft::new("Body"),
                    ChecklistItemDraft::new("Conclusion"),
                    ChecklistItemDraft::new("References"),
                ]),
        )
        .await?;
    eyre::ensure!(started.percent().value() == 25, "unexpected percent");
    eyre::ensure!(started.order().value() == 0, "card should head empty column");

    let ticked: Vec<ChecklistItemDraft> = started
        .items()
        .iter()
        .map(|item| {
            ChecklistItemDraft::new(item.label())
                .with_id(item.id())
                .checked(true)
        })
        .collect();
    let finished = board
        .service
        .update(card, owner, UpdateTaskRequest::new().with_items(ticked))
        .await?;
    eyre::ensure!(finished.percent().value() == 100, "checklist should be complete");
    eyre::ensure!(
        finished.items().iter().map(|item| item.id()).eq(started.items().iter().map(|item| item.id())),
        "checklist ids should be preserved"
    );

    board
        .service
        .reorder(
            owner,
            ReorderTaskRequest::new(card, TaskStatus::InProgress, TaskStatus::Done, 0),
        )
        .await?;

    assert_eq!(
        board.column(owner, TaskStatus::Backlog).await?,
        layout(&[("Collect data", 0)])
    );
    assert!(board.column(owner, TaskStatus::InProgress).await?.is_empty());
    assert_eq!(
        board.column(owner, TaskStatus::Done).await?,
        layout(&[("Draft outline", 0)])
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_have_independent_columns(board: Board) -> Result<(), eyre::Report> {
    let alice = UserId::new();
    let bob = UserId::new();
    board
        .seed(alice, TaskStatus::Backlog, &["Alice one", "Alice two"])
        .await?;
    let bobs = board.seed(bob, TaskStatus::Backlog, &["Bob one"]).await?;
    let bob_card = bobs
        .first()
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("seeded card missing"))?;

    board.service.delete(bob_card, bob).await?;

    assert_eq!(
        board.column(alice, TaskStatus::Backlog).await?,
        layout(&[("Alice one", 0), ("Alice two", 1)])
    );
    assert!(board.column(bob, TaskStatus::Backlog).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn readers_see_other_boards_but_cannot_change_them(
    board: Board,
) -> Result<(), eyre::Report> {
    let owner = UserId::new();
    let reader = UserId::new();
    let seeded = board
        .seed(owner, TaskStatus::Backlog, &["Shared task"])
        .await?;
    let card = seeded
        .first()
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("seeded card missing"))?;

    let visible = board
        .service
        .list(
            reader,
            TaskFilter {
                scope: TaskScope::Global,
                ..TaskFilter::default()
            },
        )
        .await?;
    let own = board
        .service
        .list(
            reader,
            TaskFilter {
                scope: TaskScope::Mine,
                ..TaskFilter::default()
            },
        )
        .await?;
    let fetched = board.service.get(card).await?;
    let denied = board.service.delete(card, reader).await;

    eyre::ensure!(visible.len() == 1, "reader should see the shared task");
    eyre::ensure!(own.is_empty(), "reader owns nothing");
    eyre::ensure!(fetched.id() == card, "get should return the card");
    eyre::ensure!(
        matches!(denied, Err(TaskServiceError::NotOwner { .. })),
        "non-owner delete should be rejected, got {denied:?}"
    );
    ensure_contiguous(&board.column(owner, TaskStatus::Backlog).await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn long_random_walk_keeps_columns_contiguous(board: Board) -> Result<(), eyre::Report> {
    let owner = UserId::new();
    let names: Vec<String> = (0..9).map(|index| format!("Card {index}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let cards = board.seed(owner, TaskStatus::Backlog, &refs).await?;

    let mut current: HashMap<TaskId, TaskStatus> = cards
        .iter()
        .map(|task| (task.id(), TaskStatus::Backlog))
        .collect();
    let steps = cards
        .iter()
        .rev()
        .cycle()
        .zip(TaskStatus::ALL.into_iter().cycle())
        .zip([0_i64, 3, 1, 2].into_iter().cycle())
        .take(40);
    for ((card, to), to_index) in steps {
        let from = current
            .insert(card.id(), to)
            .ok_or_else(|| eyre::eyre!("card {} not tracked", card.id()))?;
        board
            .service
            .reorder(owner, ReorderTaskRequest::new(card.id(), from, to, to_index))
            .await?;
    }

    let mut total = 0;
    for status in TaskStatus::ALL {
        let column = board.column(owner, status).await?;
        ensure_contiguous(&column)?;
        total += column.len();
    }
    eyre::ensure!(total == cards.len(), "cards lost or duplicated");
    Ok(())
}
