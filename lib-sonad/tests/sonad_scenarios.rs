//! End-to-end ledger scenarios
//!
//! Each test deploys a fresh ledger with a scripted drop source, a faucet
//! holdings token and an in-memory native bank.

use lib_sonad::{
    CallContext, ErrorKind, PayoutMode, ScriptedEntropy, Sonad, SonadConfig, SonadEvent, SonadState,
};
use lib_tokens::{FaucetToken, NativeBank, ValueBank};
use lib_types::{tokens, Address, ONE_TOKEN};

const OWNER: u8 = 1;
const CREATOR: u8 = 2;
const VOTER: u8 = 3;
const TIPPER: u8 = 4;
const CONTRACT: u8 = 0xC0;
const TOKEN: u8 = 0x70;

fn addr(id: u8) -> Address {
    Address::new([id; 32])
}

fn ctx(id: u8) -> CallContext {
    CallContext::new(addr(id), 1, 1_700_000_000, [id; 32])
}

struct World {
    sonad: Sonad,
    token: FaucetToken,
    bank: NativeBank,
}

fn world(config: SonadConfig, entropy: ScriptedEntropy) -> World {
    let sonad = Sonad::deploy(&ctx(OWNER), addr(CONTRACT), addr(TOKEN), config, Box::new(entropy)).unwrap();
    let mut token = FaucetToken::new(addr(TOKEN), addr(OWNER));
    token.faucet(&addr(VOTER)).unwrap();
    let mut bank = NativeBank::new();
    bank.deposit(addr(TIPPER), tokens(10)).unwrap();
    World { sonad, token, bank }
}

#[test]
fn test_register_vote_tip_withdraw() {
    let mut w = world(SonadConfig::default(), ScriptedEntropy::always(false));

    let post_id = w
        .sonad
        .verify_and_register_post(&ctx(OWNER), "t1", addr(CREATOR), "This is a test tweet about #Monad")
        .unwrap();
    assert_eq!(post_id, 1);

    w.sonad.vote(&ctx(VOTER), 1, true, &w.token).unwrap();
    let post = w.sonad.get_post(1).unwrap();
    assert_eq!((post.lit_count, post.shit_count), (1, 0));
    assert_eq!(w.sonad.get_voter_rewards(&addr(VOTER)).0, 10);

    let err = w.sonad.vote(&ctx(VOTER), 1, false, &w.token).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyVoted);
    let post = w.sonad.get_post(1).unwrap();
    assert_eq!((post.lit_count, post.shit_count), (1, 0));

    w.sonad.tip_creator(&ctx(TIPPER), 1, 100, &mut w.bank).unwrap();
    assert_eq!(w.bank.balance(&addr(CREATOR)), 90);
    assert_eq!(w.sonad.protocol_fees(), 10);
    assert_eq!(w.sonad.get_post(1).unwrap().total_tips, 100);

    assert_eq!(w.sonad.withdraw_protocol_fees(&ctx(OWNER), &mut w.bank).unwrap(), 10);
    assert_eq!(w.bank.balance(&addr(OWNER)), 10);
    assert_eq!(w.sonad.protocol_fees(), 0);
    assert_eq!(w.bank.balance(&addr(CONTRACT)), 0);

    let names: Vec<_> = w.sonad.events().all().iter().map(|r| r.event.event_type()).collect();
    assert_eq!(
        names,
        vec!["OwnershipTransferred", "PostVerified", "VoteCast", "TipSent", "ProtocolFeesWithdrawn"]
    );
}

#[test]
fn test_deactivated_post_is_frozen() {
    let mut w = world(SonadConfig::default(), ScriptedEntropy::always(false));
    w.sonad.verify_and_register_post(&ctx(OWNER), "t1", addr(CREATOR), "gm").unwrap();
    w.sonad.tip_creator(&ctx(TIPPER), 1, 1_000, &mut w.bank).unwrap();

    assert_eq!(w.sonad.deactivate_post(&ctx(VOTER), 1).unwrap_err().kind(), ErrorKind::Unauthorized);
    w.sonad.deactivate_post(&ctx(OWNER), 1).unwrap();
    w.sonad.deactivate_post(&ctx(OWNER), 1).unwrap();

    let err = w.sonad.vote(&ctx(VOTER), 1, true, &w.token).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InactivePost);
    let err = w.sonad.tip_creator(&ctx(TIPPER), 1, 100, &mut w.bank).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InactivePost);

    let post = w.sonad.get_post(1).unwrap();
    assert!(!post.active);
    assert!(post.verified);
    assert_eq!(post.total_tips, 1_000);
    assert_eq!(post.content.as_str(), "gm");

    assert_eq!(w.sonad.deactivate_post(&ctx(OWNER), 9).unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_rejected_creator_payment_rolls_back() {
    let mut w = world(SonadConfig::default(), ScriptedEntropy::always(false));
    w.sonad.verify_and_register_post(&ctx(OWNER), "t1", addr(CREATOR), "").unwrap();
    w.bank.set_rejecting(addr(CREATOR), true);
    let events = w.sonad.events().len();

    let err = w.sonad.tip_creator(&ctx(TIPPER), 1, 100, &mut w.bank).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransferFailed);

    assert_eq!(w.bank.balance(&addr(TIPPER)), tokens(10));
    assert_eq!(w.bank.balance(&addr(CONTRACT)), 0);
    assert_eq!(w.sonad.protocol_fees(), 0);
    assert_eq!(w.sonad.get_post(1).unwrap().total_tips, 0);
    assert_eq!(w.sonad.events().len(), events);
}

#[test]
fn test_pull_payouts_decouple_creator() {
    let mut w = world(SonadConfig::with_pull_payouts(), ScriptedEntropy::always(false));
    assert_eq!(w.sonad.config().payout_mode, PayoutMode::Pull);
    w.sonad.verify_and_register_post(&ctx(OWNER), "t1", addr(CREATOR), "").unwrap();

    // A creator that refuses value cannot block tips in pull mode
    w.bank.set_rejecting(addr(CREATOR), true);
    w.sonad.tip_creator(&ctx(TIPPER), 1, 100, &mut w.bank).unwrap();
    w.sonad.tip_creator(&ctx(TIPPER), 1, 50, &mut w.bank).unwrap();

    assert_eq!(w.sonad.pending_payout(&addr(CREATOR)), 90 + 45);
    assert_eq!(w.sonad.protocol_fees(), 15);
    assert_eq!(w.bank.balance(&addr(CONTRACT)), 150);
    assert_eq!(w.sonad.custody_owed(), 150);
    assert_eq!(w.sonad.get_post(1).unwrap().total_tips, 150);

    let err = w.sonad.withdraw_payout(&ctx(CREATOR), &mut w.bank).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransferFailed);
    assert_eq!(w.sonad.pending_payout(&addr(CREATOR)), 135);

    w.bank.set_rejecting(addr(CREATOR), false);
    assert_eq!(w.sonad.withdraw_payout(&ctx(CREATOR), &mut w.bank).unwrap(), 135);
    assert_eq!(w.bank.balance(&addr(CREATOR)), 135);
    assert_eq!(w.sonad.pending_payout(&addr(CREATOR)), 0);

    let err = w.sonad.withdraw_payout(&ctx(CREATOR), &mut w.bank).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    assert!(w.sonad.events().all().iter().any(|r| matches!(
        r.event,
        SonadEvent::PayoutWithdrawn { amount: 135, .. }
    )));
}

#[test]
fn test_forced_drops() {
    let mut w = world(SonadConfig::for_testing(), ScriptedEntropy::sequence([true, false, true]));
    for r in ["a", "b", "c", "d"] {
        w.sonad.verify_and_register_post(&ctx(OWNER), r, addr(CREATOR), "").unwrap();
    }

    let nfts: Vec<_> = (1..=4)
        .map(|post_id| w.sonad.vote(&ctx(VOTER), post_id, true, &w.token).unwrap().nft)
        .collect();
    assert_eq!(nfts, vec![Some(1), None, Some(2), None]);

    let record = w.sonad.voter_record(&addr(VOTER));
    assert_eq!((record.points, record.nft_count), (40, 2));
    assert!(record.has_voted);
    assert_eq!(w.sonad.rewards().next_token_id(), 3);
    assert_eq!(w.sonad.rewards().balance_of(&addr(VOTER)), 2);

    let awarded: Vec<_> = w
        .sonad
        .events()
        .all()
        .iter()
        .filter_map(|r| match r.event {
            SonadEvent::VoteCast { nft_awarded, .. } => Some(nft_awarded),
            _ => None,
        })
        .collect();
    assert_eq!(awarded, vec![true, false, true, false]);
}

#[test]
fn test_voting_threshold_follows_updates() {
    let mut w = world(SonadConfig::default(), ScriptedEntropy::always(false));
    w.sonad.verify_and_register_post(&ctx(OWNER), "t1", addr(CREATOR), "").unwrap();
    w.sonad.verify_and_register_post(&ctx(OWNER), "t2", addr(CREATOR), "").unwrap();

    w.sonad.update_minimum_holding(&ctx(OWNER), tokens(500)).unwrap();
    let err = w.sonad.vote(&ctx(VOTER), 1, true, &w.token).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    assert!(!w.sonad.has_user_voted(&addr(VOTER), 1));

    w.sonad.update_minimum_holding(&ctx(OWNER), ONE_TOKEN).unwrap();
    w.sonad.vote(&ctx(VOTER), 1, true, &w.token).unwrap();
    w.sonad.vote(&ctx(VOTER), 2, false, &w.token).unwrap();
    assert!(w.sonad.vote_direction(&addr(VOTER), 2).is_some_and(|d| !d.is_lit()));
    assert_eq!(w.sonad.get_voter_rewards(&addr(VOTER)), (20, 0));
}

#[test]
fn test_state_survives_bincode_round_trip() {
    let mut w = world(SonadConfig::for_testing(), ScriptedEntropy::always(true));
    w.sonad.verify_and_register_post(&ctx(OWNER), "t1", addr(CREATOR), "gm").unwrap();
    w.sonad.vote(&ctx(VOTER), 1, true, &w.token).unwrap();
    w.sonad.tip_creator(&ctx(TIPPER), 1, 100, &mut w.bank).unwrap();

    let bytes = bincode::serialize(&w.sonad.snapshot()).unwrap();
    let state: SonadState = bincode::deserialize(&bytes).unwrap();
    let mut restored = Sonad::restore(state, Box::new(ScriptedEntropy::always(false))).unwrap();

    assert_eq!(restored.owner(), addr(OWNER));
    assert_eq!(restored.get_post(1).unwrap(), w.sonad.get_post(1).unwrap());
    assert_eq!(restored.protocol_fees(), 10);
    assert_eq!(restored.owner_of(1).unwrap(), addr(VOTER));
    assert_eq!(restored.events().len(), w.sonad.events().len());

    // The vote record survives, so the restored ledger still refuses a repeat
    let err = restored.vote(&ctx(VOTER), 1, false, &w.token).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyVoted);
    assert_eq!(restored.post_by_external_ref("t1").unwrap(), 1);
}

#[test]
fn test_events_since_for_indexers() {
    let mut w = world(SonadConfig::default(), ScriptedEntropy::always(false));
    let cursor = w.sonad.events().len() as u64;

    w.sonad.verify_and_register_post(&ctx(OWNER), "t1", addr(CREATOR), "").unwrap();
    let _ = w.sonad.verify_and_register_post(&ctx(OWNER), "t1", addr(CREATOR), "");
    w.sonad.vote(&ctx(VOTER), 1, true, &w.token).unwrap();

    let fresh = w.sonad.events_since(cursor);
    assert_eq!(fresh.len(), 2);
    assert_eq!(fresh[0].seq, cursor);
    assert!(matches!(
        &fresh[0].event,
        SonadEvent::PostVerified { post_id: 1, creator, .. } if *creator == addr(CREATOR)
    ));
    assert!(matches!(
        fresh[1].event,
        SonadEvent::VoteCast { post_id: 1, is_lit: true, points: 10, nft_awarded: false, .. }
    ));
}
