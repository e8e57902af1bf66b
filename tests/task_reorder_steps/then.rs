//! Then steps for task reordering BDD scenarios.

use super::world::{BoardWorld, parse_status, parse_titles, run_async};
use rstest_bdd_macros::then;
use taskboard::task::{
    domain::{BucketKey, TaskDomainError},
    ports::TaskRepository,
    services::TaskServiceError,
};

fn column_titles(
    world: &BoardWorld,
    user: &str,
    status: &str,
) -> Result<Vec<String>, eyre::Report> {
    let owner = world.known_user(user)?;
    let bucket = BucketKey::new(owner, parse_status(status)?);
    let tasks = run_async(world.repository.find_bucket(bucket))?;

    for (expected, task) in (0_u32..).zip(&tasks) {
        if task.order().value() != expected {
            return Err(eyre::eyre!(
                "column {status} has a gap: {} sits at {}, expected {expected}",
                task.title().as_str(),
                task.order().value()
            ));
        }
    }
    Ok(tasks
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect())
}

#[then(r#"the "{status}" column of "{user}" reads "{titles}""#)]
fn column_reads(
    world: &BoardWorld,
    status: String,
    user: String,
    titles: String,
) -> Result<(), eyre::Report> {
    let actual = column_titles(world, &user, &status)?;
    let expected = parse_titles(&titles);

    if actual != expected {
        return Err(eyre::eyre!(
            "expected {status} column {expected:?}, found {actual:?}"
        ));
    }
    Ok(())
}

#[then(r#"the "{status}" column of "{user}" is empty"#)]
fn column_is_empty(
    world: &BoardWorld,
    status: String,
    user: String,
) -> Result<(), eyre::Report> {
    let actual = column_titles(world, &user, &status)?;

    if !actual.is_empty() {
        return Err(eyre::eyre!("expected empty {status} column, found {actual:?}"));
    }
    Ok(())
}

#[then("the operation succeeds")]
fn operation_succeeds(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_outcome.as_ref() {
        Some(Ok(())) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected success, got {err}")),
        None => Err(eyre::eyre!("no operation was attempted")),
    }
}

#[then("the operation is rejected because the caller is not the owner")]
fn rejected_not_owner(world: &BoardWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation outcome"))?;

    if !matches!(outcome, Err(TaskServiceError::NotOwner { .. })) {
        return Err(eyre::eyre!("expected NotOwner error, got {outcome:?}"));
    }
    Ok(())
}

#[then("the operation is rejected because the source column is stale")]
fn rejected_stale_column(world: &BoardWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation outcome"))?;

    if !matches!(
        outcome,
        Err(TaskServiceError::Domain(TaskDomainError::StatusMismatch { .. }))
    ) {
        return Err(eyre::eyre!("expected StatusMismatch error, got {outcome:?}"));
    }
    Ok(())
}
