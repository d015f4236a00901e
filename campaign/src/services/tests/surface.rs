//! Scripted surface tests

use std::time::Duration;

use crate::error::CampaignError;
use crate::services::surface::ScriptedSurface;
use crate::traits::ActionSurface;
use shared::{CandidateItem, Source};

fn source() -> Source {
    Source::new("list_1", "https://example.com/list/1")
}

#[tokio::test]
async fn test_scripted_passes_are_consumed_in_order() {
    let surface = ScriptedSurface::new();
    surface.push_pass("list_1", vec![CandidateItem::new("a", "x", "text", "list_1")]);
    surface.push_pass("list_1", vec![CandidateItem::new("b", "y", "text", "list_1")]);

    let first = surface.find_candidates(&source()).await.unwrap();
    assert_eq!(first[0].id, "a");
    let second = surface.find_candidates(&source()).await.unwrap();
    assert_eq!(second[0].id, "b");

    // Feed exhausted, no synthetic supply configured
    let third = surface.find_candidates(&source()).await.unwrap();
    assert!(third.is_empty());
}

#[tokio::test]
async fn test_synthetic_supply_never_dries_up() {
    let surface = ScriptedSurface::synthetic(4);
    let mut seen = std::collections::HashSet::new();

    for _ in 0..10 {
        let pass = surface.find_candidates(&source()).await.unwrap();
        assert_eq!(pass.len(), 4);
        for item in pass {
            assert!(seen.insert(item.id.clone()), "duplicate synthetic id");
            assert!(item.signals.is_some());
            assert_eq!(item.source_tag, "list_1");
        }
    }
}

#[tokio::test]
async fn test_submissions_and_follows_are_recorded() {
    let surface = ScriptedSurface::new();
    surface.submit_reply("t1", "the reply").await.unwrap();
    surface.follow_author("alice").await.unwrap();
    surface.navigate_to("https://example.com").await.unwrap();

    assert_eq!(surface.submissions(), vec![("t1".to_string(), "the reply".to_string())]);
    assert_eq!(surface.follows(), vec!["alice".to_string()]);
    assert_eq!(surface.visited_urls(), vec!["https://example.com".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_unauthenticated_surface_times_out() {
    let surface = ScriptedSurface::new().with_authenticated(false);
    assert!(!surface.is_authenticated().await);

    let result = surface.await_authentication(Duration::from_secs(120)).await;
    assert!(matches!(
        result,
        Err(CampaignError::AuthenticationTimeout { seconds: 120 })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_humanized_pacing_still_completes() {
    let surface = ScriptedSurface::synthetic(2).with_humanized_pacing(true);
    let pass = surface.find_candidates(&source()).await.unwrap();
    assert_eq!(pass.len(), 2);
    surface.submit_reply("t1", "short reply").await.unwrap();
    assert_eq!(surface.submissions().len(), 1);
}
