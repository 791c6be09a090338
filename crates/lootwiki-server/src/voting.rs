//! Vote reducers for builds and guides.
//!
//! A vote request is checked in this order: caller has an account,
//! direction parses, target exists, self-vote rule. The vote row and the
//! target's counters are then written inside the same reducer.

use crate::reducers::{require_user, site_config};
use crate::tables::*;
use lootwiki_logic::votes::{
    apply_vote, tally_votes, vote_key, VoteCounters, VoteDirection, VoteOutcome, VoteTargetKind,
};
use lootwiki_logic::LogicError;
use spacetimedb::{reducer, Identity, ReducerContext, Table};

fn voter_key(voter: Identity, kind: VoteTargetKind, target_id: u64) -> String {
    vote_key(&voter.to_hex().to_string(), kind, target_id)
}

/// Write a transition makes to the voter's vote row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowWrite {
    Insert(VoteDirection),
    Update(VoteDirection),
    Delete,
    Keep,
}

fn row_write(has_row: bool, new_state: Option<VoteDirection>) -> RowWrite {
    match (has_row, new_state) {
        (true, None) => RowWrite::Delete,
        (true, Some(dir)) => RowWrite::Update(dir),
        (false, Some(dir)) => RowWrite::Insert(dir),
        (false, None) => RowWrite::Keep,
    }
}

/// Apply a vote request to the voter's vote row and return the transition.
fn cast_vote(
    ctx: &ReducerContext,
    voter: Identity,
    kind: VoteTargetKind,
    target_id: u64,
    requested: VoteDirection,
) -> VoteOutcome {
    let key = voter_key(voter, kind, target_id);
    let row = ctx.db.vote().key().find(&key);
    let existing = row.as_ref().and_then(|v| VoteDirection::from_value(v.value));
    let outcome = apply_vote(existing, requested);

    match (row, row_write(existing.is_some(), outcome.new_state)) {
        (Some(row), RowWrite::Delete) => {
            ctx.db.vote().id().delete(row.id);
        }
        (Some(mut row), RowWrite::Update(dir) | RowWrite::Insert(dir)) => {
            // Insert over an existing row only happens when its value was unreadable.
            row.value = dir.value();
            row.cast_at = ctx.timestamp;
            ctx.db.vote().id().update(row);
        }
        (None, RowWrite::Insert(dir)) => {
            ctx.db.vote().insert(Vote {
                id: 0,
                key,
                voter,
                target_kind: kind.id(),
                target_id,
                value: dir.value(),
                cast_at: ctx.timestamp,
            });
        }
        _ => {}
    }

    outcome
}

/// Rows that belong to one identity: an account to its holder, a build to
/// its owner, a guide to its author.
trait Owned {
    fn owned_by(&self) -> Identity;
}

impl Owned for UserAccount {
    fn owned_by(&self) -> Identity {
        self.identity
    }
}

impl Owned for Build {
    fn owned_by(&self) -> Identity {
        self.owner
    }
}

impl Owned for Guide {
    fn owned_by(&self) -> Identity {
        self.author
    }
}

/// Check a vote request in order: account, direction, target, self-vote.
fn check_vote_request<U: Owned, T: Owned>(
    account: Option<U>,
    direction: &str,
    kind: VoteTargetKind,
    target_id: u64,
    target: Option<T>,
    allow_self_vote: bool,
) -> Result<(U, T, VoteDirection), LogicError> {
    let account = account.ok_or(LogicError::AuthenticationRequired)?;
    let requested: VoteDirection = direction.parse()?;
    let target =
        target.ok_or_else(|| LogicError::not_found(format!("{} {target_id}", kind.label())))?;
    if account.owned_by() == target.owned_by() && !allow_self_vote {
        return Err(LogicError::invalid("cannot vote on your own content"));
    }
    Ok((account, target, requested))
}

/// Owner or site admin.
fn may_recount(caller: Identity, owner: Identity, admin: Identity) -> bool {
    caller == owner || caller == admin
}

/// Stored votes on one target.
fn votes_on(ctx: &ReducerContext, kind: VoteTargetKind, target_id: u64) -> Vec<Vote> {
    ctx.db
        .vote()
        .target_id()
        .filter(target_id)
        .filter(|v| v.target_kind == kind.id())
        .collect()
}

/// Remove every vote on a target. Returns how many were removed.
pub(crate) fn delete_votes_for(
    ctx: &ReducerContext,
    kind: VoteTargetKind,
    target_id: u64,
) -> usize {
    let rows = votes_on(ctx, kind, target_id);
    for row in &rows {
        ctx.db.vote().id().delete(row.id);
    }
    rows.len()
}

/// Up- or down-vote a build; repeating a vote withdraws it
#[reducer]
pub fn vote_build(ctx: &ReducerContext, build_id: u64, direction: String) -> Result<(), String> {
    let (user, mut build, requested) = check_vote_request(
        ctx.db.user_account().identity().find(ctx.sender),
        &direction,
        VoteTargetKind::Build,
        build_id,
        ctx.db.build().id().find(build_id),
        site_config(ctx).allow_self_vote,
    )?;

    let outcome = cast_vote(ctx, user.identity, VoteTargetKind::Build, build_id, requested);
    let mut counters = build.counters();
    counters.apply(&outcome);
    build.set_counters(counters);
    ctx.db.build().id().update(build);

    log::info!(
        "{} voted {} on build {}: now {:?} (+{}/-{})",
        user.display_name,
        requested,
        build_id,
        outcome.new_state,
        counters.upvotes,
        counters.downvotes
    );
    Ok(())
}

/// Up- or down-vote a guide; repeating a vote withdraws it
#[reducer]
pub fn vote_guide(ctx: &ReducerContext, guide_id: u64, direction: String) -> Result<(), String> {
    let (user, mut guide, requested) = check_vote_request(
        ctx.db.user_account().identity().find(ctx.sender),
        &direction,
        VoteTargetKind::Guide,
        guide_id,
        ctx.db.guide().id().find(guide_id),
        site_config(ctx).allow_self_vote,
    )?;

    let outcome = cast_vote(ctx, user.identity, VoteTargetKind::Guide, guide_id, requested);
    let mut counters = guide.counters();
    counters.apply(&outcome);
    guide.set_counters(counters);
    ctx.db.guide().id().update(guide);

    log::info!(
        "{} voted {} on guide {}: now {:?} (+{}/-{})",
        user.display_name,
        requested,
        guide_id,
        outcome.new_state,
        counters.upvotes,
        counters.downvotes
    );
    Ok(())
}

/// Recompute a target's counters from its vote rows. Owner or site admin only.
#[reducer]
pub fn recount_votes(ctx: &ReducerContext, target_kind: u8, target_id: u64) -> Result<(), String> {
    let user = require_user(ctx)?;
    let kind = VoteTargetKind::from_id(target_kind)
        .ok_or_else(|| LogicError::invalid(format!("unknown vote target kind {target_kind}")))?;
    let admin = site_config(ctx).admin;

    let exact = tally_votes(
        votes_on(ctx, kind, target_id)
            .iter()
            .filter_map(|v| VoteDirection::from_value(v.value)),
    );

    let stored = match kind {
        VoteTargetKind::Build => {
            let mut build = ctx
                .db
                .build()
                .id()
                .find(target_id)
                .ok_or_else(|| LogicError::not_found(format!("build {target_id}")))?;
            if !may_recount(user.identity, build.owner, admin) {
                return Err(LogicError::AuthenticationRequired.into());
            }
            let stored = build.counters();
            build.set_counters(exact);
            ctx.db.build().id().update(build);
            stored
        }
        VoteTargetKind::Guide => {
            let mut guide = ctx
                .db
                .guide()
                .id()
                .find(target_id)
                .ok_or_else(|| LogicError::not_found(format!("guide {target_id}")))?;
            if !may_recount(user.identity, guide.author, admin) {
                return Err(LogicError::AuthenticationRequired.into());
            }
            let stored = guide.counters();
            guide.set_counters(exact);
            ctx.db.guide().id().update(guide);
            stored
        }
    };

    report_drift(kind, target_id, stored, exact);
    Ok(())
}

fn report_drift(kind: VoteTargetKind, target_id: u64, stored: VoteCounters, exact: VoteCounters) {
    if stored != exact {
        log::warn!(
            "Vote drift on {} {}: stored +{}/-{}, actual +{}/-{}",
            kind.label(),
            target_id,
            stored.upvotes,
            stored.downvotes,
            exact.upvotes,
            exact.downvotes
        );
    } else {
        log::info!("Votes on {} {} already consistent", kind.label(), target_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Owner(Identity);

    impl Owned for Owner {
        fn owned_by(&self) -> Identity {
            self.0
        }
    }

    fn alice() -> Identity {
        Identity::from_byte_array([1; 32])
    }

    fn bob() -> Identity {
        Identity::from_byte_array([2; 32])
    }

    fn check(
        account: Option<Identity>,
        direction: &str,
        target: Option<Identity>,
        allow_self_vote: bool,
    ) -> Result<VoteDirection, LogicError> {
        check_vote_request(
            account.map(Owner),
            direction,
            VoteTargetKind::Build,
            5,
            target.map(Owner),
            allow_self_vote,
        )
        .map(|(_, _, dir)| dir)
    }

    // ============================================================================
    // VOTE ROW WRITES
    // ============================================================================

    fn write_for(existing: Option<VoteDirection>, requested: VoteDirection) -> RowWrite {
        row_write(existing.is_some(), apply_vote(existing, requested).new_state)
    }

    #[test]
    fn test_new_vote_inserts_row() {
        use VoteDirection::*;
        assert_eq!(write_for(None, Up), RowWrite::Insert(Up));
        assert_eq!(write_for(None, Down), RowWrite::Insert(Down));
    }

    #[test]
    fn test_repeat_vote_deletes_row() {
        use VoteDirection::*;
        assert_eq!(write_for(Some(Up), Up), RowWrite::Delete);
        assert_eq!(write_for(Some(Down), Down), RowWrite::Delete);
    }

    #[test]
    fn test_flip_updates_row() {
        use VoteDirection::*;
        assert_eq!(write_for(Some(Up), Down), RowWrite::Update(Down));
        assert_eq!(write_for(Some(Down), Up), RowWrite::Update(Up));
    }

    #[test]
    fn test_no_row_and_no_vote_writes_nothing() {
        assert_eq!(row_write(false, None), RowWrite::Keep);
    }

    // ============================================================================
    // REQUEST CHECKS
    // ============================================================================

    #[test]
    fn test_valid_request_passes() {
        assert_eq!(check(Some(alice()), "up", Some(bob()), false), Ok(VoteDirection::Up));
        assert_eq!(check(Some(alice()), "down", Some(bob()), false), Ok(VoteDirection::Down));
    }

    #[test]
    fn test_missing_account_requires_authentication() {
        assert_eq!(
            check(None, "up", Some(bob()), false),
            Err(LogicError::AuthenticationRequired)
        );
    }

    #[test]
    fn test_bad_direction_is_invalid() {
        for bad in ["", "UP", "sideways", " up"] {
            assert!(matches!(
                check(Some(alice()), bad, Some(bob()), false),
                Err(LogicError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_unknown_target_not_found() {
        let err = check(Some(alice()), "up", None, false).unwrap_err();
        assert_eq!(err, LogicError::not_found("build 5"));
    }

    #[test]
    fn test_self_vote_rule() {
        assert!(matches!(
            check(Some(alice()), "up", Some(alice()), false),
            Err(LogicError::InvalidArgument(_))
        ));
        assert_eq!(check(Some(alice()), "up", Some(alice()), true), Ok(VoteDirection::Up));
    }

    #[test]
    fn test_checks_run_in_order() {
        // No account wins over every later failure.
        assert_eq!(check(None, "nope", None, false), Err(LogicError::AuthenticationRequired));
        // Bad direction wins over a missing target.
        assert!(matches!(
            check(Some(alice()), "nope", None, false),
            Err(LogicError::InvalidArgument(_))
        ));
        // Missing target wins over the self-vote rule.
        assert!(matches!(
            check(Some(alice()), "up", None, false),
            Err(LogicError::NotFound(_))
        ));
    }

    #[test]
    fn test_guide_target_named_in_not_found() {
        let err = check_vote_request(
            Some(Owner(alice())),
            "down",
            VoteTargetKind::Guide,
            12,
            None::<Owner>,
            false,
        )
        .unwrap_err();
        assert_eq!(err, LogicError::not_found("guide 12"));
    }

    // ============================================================================
    // RECOUNT
    // ============================================================================

    #[test]
    fn test_recount_owner_or_admin() {
        let admin = Identity::from_byte_array([9; 32]);
        assert!(may_recount(alice(), alice(), admin));
        assert!(may_recount(admin, alice(), admin));
        assert!(!may_recount(bob(), alice(), admin));
    }

    #[test]
    fn test_voter_key_distinguishes_kind() {
        assert_ne!(
            voter_key(alice(), VoteTargetKind::Build, 3),
            voter_key(alice(), VoteTargetKind::Guide, 3)
        );
        assert_ne!(
            voter_key(alice(), VoteTargetKind::Build, 3),
            voter_key(bob(), VoteTargetKind::Build, 3)
        );
    }
}
