//! Build planner reducers: create, edit, delete builds and keep their
//! projected stats in sync.

use crate::reducers::{require_user, site_config};
use crate::tables::*;
use crate::voting::delete_votes_for;
use lootwiki_logic::classes::CharacterClass;
use lootwiki_logic::content::{validate_description, validate_title};
use lootwiki_logic::stats::{project, StatAllocation};
use lootwiki_logic::votes::VoteTargetKind;
use lootwiki_logic::LogicError;
use spacetimedb::{reducer, ReducerContext, SpacetimeType, Table};

/// Build fields as submitted by a client. Numbers are signed so that
/// negative input is rejected with a message instead of failing to decode.
#[derive(SpacetimeType, Debug, Clone, PartialEq)]
pub struct BuildDraft {
    pub title: String,
    pub description: String,
    /// Class name, e.g. `"WARRIOR"`.
    pub class: String,
    pub level: i64,
    pub vig: i64,
    pub int: i64,
    pub str: i64,
    pub dex: i64,
}

/// Validated draft, ready to store.
struct CheckedBuild {
    title: String,
    description: String,
    class: CharacterClass,
    level: u32,
    allocation: StatAllocation,
}

fn check_draft(ctx: &ReducerContext, draft: BuildDraft) -> Result<CheckedBuild, LogicError> {
    let config = site_config(ctx);

    let title = validate_title(&draft.title, config.max_title_len as usize)?;
    let description = validate_description(&draft.description)?;
    let class: CharacterClass = draft.class.parse()?;
    let level = u32::try_from(draft.level)
        .map_err(|_| LogicError::invalid(format!("level out of range: {}", draft.level)))?;
    let allocation = StatAllocation::from_signed(draft.vig, draft.int, draft.str, draft.dex)?;
    config.planner_limits().validate(level, &allocation)?;

    Ok(CheckedBuild {
        title,
        description,
        class,
        level,
        allocation,
    })
}

/// Recompute and store the derived stats for a build.
fn refresh_stats(
    ctx: &ReducerContext,
    build_id: u64,
    checked: &CheckedBuild,
) -> Result<(), LogicError> {
    let derived = project(checked.class, checked.level, &checked.allocation)?;
    let row = BuildStats::from_derived(build_id, &derived);
    if ctx.db.build_stats().build_id().find(build_id).is_some() {
        ctx.db.build_stats().build_id().update(row);
    } else {
        ctx.db.build_stats().insert(row);
    }
    Ok(())
}

/// Find a build the caller owns.
fn owned_build(ctx: &ReducerContext, build_id: u64) -> Result<Build, LogicError> {
    let user = require_user(ctx)?;
    let build = ctx
        .db
        .build()
        .id()
        .find(build_id)
        .ok_or_else(|| LogicError::not_found(format!("build {build_id}")))?;
    if build.owner != user.identity {
        log::warn!("{:?} tried to modify build {} they do not own", user.identity, build_id);
        return Err(LogicError::AuthenticationRequired);
    }
    Ok(build)
}

#[reducer]
pub fn create_build(ctx: &ReducerContext, draft: BuildDraft) -> Result<(), String> {
    let user = require_user(ctx)?;
    let checked = check_draft(ctx, draft)?;

    let a = checked.allocation;
    let build_id = ctx
        .db
        .build()
        .insert(Build {
            id: 0,
            owner: user.identity,
            title: checked.title.clone(),
            description: checked.description.clone(),
            class_id: checked.class.id(),
            level: checked.level,
            vig: a.vig,
            int: a.int,
            str: a.str,
            dex: a.dex,
            upvotes: 0,
            downvotes: 0,
            created_at: ctx.timestamp,
            updated_at: ctx.timestamp,
        })
        .id;
    refresh_stats(ctx, build_id, &checked)?;

    log::info!(
        "Build {} created by {}: {} L{}",
        build_id,
        user.display_name,
        checked.class,
        checked.level
    );
    Ok(())
}

#[reducer]
pub fn update_build(ctx: &ReducerContext, build_id: u64, draft: BuildDraft) -> Result<(), String> {
    let mut build = owned_build(ctx, build_id)?;
    let checked = check_draft(ctx, draft)?;

    let a = checked.allocation;
    build.title = checked.title.clone();
    build.description = checked.description.clone();
    build.class_id = checked.class.id();
    build.level = checked.level;
    build.vig = a.vig;
    build.int = a.int;
    build.str = a.str;
    build.dex = a.dex;
    build.updated_at = ctx.timestamp;
    ctx.db.build().id().update(build);
    refresh_stats(ctx, build_id, &checked)?;

    log::info!("Build {} updated", build_id);
    Ok(())
}

/// Delete a build with its stats and votes. Guides that referenced it
/// keep their text but lose the link.
#[reducer]
pub fn delete_build(ctx: &ReducerContext, build_id: u64) -> Result<(), String> {
    let build = owned_build(ctx, build_id)?;

    ctx.db.build_stats().build_id().delete(build.id);
    let removed = delete_votes_for(ctx, VoteTargetKind::Build, build.id);

    let linked: Vec<Guide> = ctx.db.guide().build_id().filter(build.id).collect();
    for mut guide in linked {
        guide.build_id = NO_BUILD;
        ctx.db.guide().id().update(guide);
    }

    ctx.db.build().id().delete(build.id);
    log::info!("Build {} deleted ({} votes removed)", build_id, removed);
    Ok(())
}
