//! Given steps for task reordering BDD scenarios.

use super::world::{BoardWorld, parse_status, parse_titles, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::task::services::CreateTaskRequest;

#[given(r#""{user}" has tasks "{titles}" in "{status}""#)]
fn user_has_tasks(
    world: &mut BoardWorld,
    user: String,
    titles: String,
    status: String,
) -> Result<(), eyre::Report> {
    let owner = world.user(&user);
    let column = parse_status(&status)?;
    for title in parse_titles(&titles) {
        let created = run_async(
            world
                .service
                .create(owner, CreateTaskRequest::new(title.clone(), column)),
        )
        .wrap_err("create task for reordering scenario")?;
        world.tasks.insert(title, created.id());
    }
    Ok(())
}
