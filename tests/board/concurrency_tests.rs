//! Concurrent board operations against shared columns.

use super::helpers::{Board, board, ensure_contiguous};
use taskboard::task::{
    domain::{TaskStatus, UserId},
    services::{CreateTaskRequest, ReorderTaskRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_creates_fill_a_column_without_gaps(board: Board) -> Result<(), eyre::Report> {
    let owner = UserId::new();
    let handles: Vec<_> = (0..16)
        .map(|index| {
            let service = board.service.clone();
            tokio::spawn(async move {
                service
                    .create(
                        owner,
                        CreateTaskRequest::new(format!("Card {index}"), TaskStatus::Backlog),
                    )
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    let column = board.column(owner, TaskStatus::Backlog).await?;
    eyre::ensure!(column.len() == 16, "expected 16 cards, found {}", column.len());
    ensure_contiguous(&column)
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_cross_column_moves_keep_both_columns_contiguous(
    board: Board,
) -> Result<(), eyre::Report> {
    let owner = UserId::new();
    let backlog = board
        .seed(owner, TaskStatus::Backlog, &["B0", "B1", "B2", "B3", "B4", "B5"])
        .await?;
    let in_progress = board
        .seed(owner, TaskStatus::InProgress, &["P0", "P1", "P2", "P3", "P4", "P5"])
        .await?;

    let forward = backlog
        .iter()
        .map(|task| (task.id(), TaskStatus::Backlog, TaskStatus::InProgress));
    let backward = in_progress
        .iter()
        .map(|task| (task.id(), TaskStatus::InProgress, TaskStatus::Backlog));
    let handles: Vec<_> = forward
        .chain(backward)
        .zip([0_i64, 1, 2].into_iter().cycle())
        .map(|((task_id, from, to), to_index)| {
            let service = board.service.clone();
            tokio::spawn(async move {
                service
                    .reorder(owner, ReorderTaskRequest::new(task_id, from, to, to_index))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    let left = board.column(owner, TaskStatus::Backlog).await?;
    let right = board.column(owner, TaskStatus::InProgress).await?;
    ensure_contiguous(&left)?;
    ensure_contiguous(&right)?;
    eyre::ensure!(left.len() + right.len() == 12, "cards lost or duplicated");
    Ok(())
}
