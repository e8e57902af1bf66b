//! When steps for task reordering BDD scenarios.

use super::world::{BoardWorld, parse_status, run_async};
use rstest_bdd_macros::when;
use taskboard::task::services::ReorderTaskRequest;

#[when(r#""{user}" moves "{title}" from "{from}" to "{to}" at position {index:i64}"#)]
fn move_task(
    world: &mut BoardWorld,
    user: String,
    title: String,
    from: String,
    to: String,
    index: i64,
) -> Result<(), eyre::Report> {
    let caller = world.user(&user);
    let task_id = world.task(&title)?;
    let request =
        ReorderTaskRequest::new(task_id, parse_status(&from)?, parse_status(&to)?, index);

    let result = run_async(world.service.reorder(caller, request));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#""{user}" deletes "{title}""#)]
fn delete_task(world: &mut BoardWorld, user: String, title: String) -> Result<(), eyre::Report> {
    let caller = world.user(&user);
    let task_id = world.task(&title)?;

    let result = run_async(world.service.delete(task_id, caller));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}
