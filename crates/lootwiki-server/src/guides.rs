//! Guide authoring reducers.

use crate::reducers::{require_user, site_config};
use crate::tables::*;
use crate::voting::delete_votes_for;
use lootwiki_logic::content::{validate_guide_body, validate_title};
use lootwiki_logic::votes::VoteTargetKind;
use lootwiki_logic::LogicError;
use spacetimedb::{reducer, ReducerContext, SpacetimeType, Table};

#[derive(SpacetimeType, Debug, Clone, PartialEq)]
pub struct GuideDraft {
    pub title: String,
    /// Markdown source.
    pub body: String,
    pub build_id: Option<u64>,
}

fn check_draft(ctx: &ReducerContext, draft: &GuideDraft) -> Result<(String, String), LogicError> {
    let config = site_config(ctx);
    let title = validate_title(&draft.title, config.max_title_len as usize)?;
    let body = validate_guide_body(&draft.body)?;
    if let Some(build_id) = draft.build_id {
        if ctx.db.build().id().find(build_id).is_none() {
            return Err(LogicError::not_found(format!("build {build_id}")));
        }
    }
    Ok((title, body))
}

fn authored_guide(ctx: &ReducerContext, guide_id: u64) -> Result<Guide, LogicError> {
    let user = require_user(ctx)?;
    let guide = ctx
        .db
        .guide()
        .id()
        .find(guide_id)
        .ok_or_else(|| LogicError::not_found(format!("guide {guide_id}")))?;
    if guide.author != user.identity {
        log::warn!("{:?} tried to modify guide {} they did not write", user.identity, guide_id);
        return Err(LogicError::AuthenticationRequired);
    }
    Ok(guide)
}

#[reducer]
pub fn create_guide(ctx: &ReducerContext, draft: GuideDraft) -> Result<(), String> {
    let user = require_user(ctx)?;
    let (title, body) = check_draft(ctx, &draft)?;

    let guide_id = ctx
        .db
        .guide()
        .insert(Guide {
            id: 0,
            author: user.identity,
            title,
            body,
            build_id: build_link(draft.build_id),
            upvotes: 0,
            downvotes: 0,
            created_at: ctx.timestamp,
            updated_at: ctx.timestamp,
        })
        .id;

    log::info!("Guide {} created by {}", guide_id, user.display_name);
    Ok(())
}

#[reducer]
pub fn update_guide(ctx: &ReducerContext, guide_id: u64, draft: GuideDraft) -> Result<(), String> {
    let mut guide = authored_guide(ctx, guide_id)?;
    let (title, body) = check_draft(ctx, &draft)?;

    guide.title = title;
    guide.body = body;
    guide.build_id = build_link(draft.build_id);
    guide.updated_at = ctx.timestamp;
    ctx.db.guide().id().update(guide);
    Ok(())
}

#[reducer]
pub fn delete_guide(ctx: &ReducerContext, guide_id: u64) -> Result<(), String> {
    let guide = authored_guide(ctx, guide_id)?;
    let removed = delete_votes_for(ctx, VoteTargetKind::Guide, guide.id);
    ctx.db.guide().id().delete(guide.id);
    log::info!("Guide {} deleted ({} votes removed)", guide_id, removed);
    Ok(())
}
