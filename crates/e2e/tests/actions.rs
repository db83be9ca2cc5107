//! Action executor behaviour: waiting, typing, two-tier clicks, optional controls

mod support;

use onboard_common::{Candidates, Locator};
use onboard_e2e::{Actions, ClickTier, E2eError, FrameSearch, Presence};
use std::path::Path;
use std::time::{Duration, Instant};
use support::{fast_timeouts, FakeDriver, Node, TOP};

fn actions(fake: &FakeDriver) -> Actions<'_> {
    Actions::new(fake, fast_timeouts(), FrameSearch::Nested)
}

fn field() -> Candidates {
    Candidates::new("workspace name input").css("input[name='workspaceName']")
}

fn button() -> Candidates {
    Candidates::new("next button").css("button[type='submit']")
}

#[tokio::test]
async fn test_type_with_clear_is_idempotent() {
    let fake = FakeDriver::new();
    let input = fake.add(TOP, Node::new("input").css("input[name='workspaceName']"));
    let actions = actions(&fake);

    actions.type_text(&field(), "qa-lenzaos-ws", true).await.unwrap();
    actions.type_text(&field(), "qa-lenzaos-ws", true).await.unwrap();

    assert_eq!(fake.value(input), "qa-lenzaos-ws");
}

#[tokio::test]
async fn test_type_without_clear_appends() {
    let fake = FakeDriver::new();
    let input = fake.add(TOP, Node::new("input").css("input[name='workspaceName']"));
    let actions = actions(&fake);

    actions.type_text(&field(), "qa", false).await.unwrap();
    actions.type_text(&field(), "-ws", false).await.unwrap();

    assert_eq!(fake.value(input), "qa-ws");
    assert!(fake.calls_to("clear").is_empty());
}

#[tokio::test]
async fn test_native_click_is_tried_once_before_scripted_click() {
    let fake = FakeDriver::new();
    let submit = fake.add(
        TOP,
        Node::new("button").css("button[type='submit']").native_click_fails(),
    );
    let clicked = fake.add(TOP, Node::new("div").css("div.done").hidden());
    fake.on_click(submit, move |dom| dom.show(clicked, true));
    let actions = actions(&fake);

    let tier = actions.click(&button()).await.unwrap();

    assert_eq!(tier, ClickTier::Programmatic);
    let target = FakeDriver::handle(submit).to_string();
    let clicks: Vec<String> = fake
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("click ") || c.starts_with("execute click "))
        .collect();
    assert_eq!(
        clicks,
        vec![format!("click {}", target), format!("execute click {}", target)]
    );
    assert!(fake.with(|dom| dom.nodes[clicked].displayed));
}

#[tokio::test]
async fn test_successful_native_click_never_falls_back() {
    let fake = FakeDriver::new();
    fake.add(TOP, Node::new("button").css("button[type='submit']"));
    let actions = actions(&fake);

    assert_eq!(actions.click(&button()).await.unwrap(), ClickTier::Native);
    assert_eq!(fake.calls_to("click").len(), 1);
    assert!(fake.calls_to("execute").is_empty());
}

#[tokio::test]
async fn test_click_waits_until_control_becomes_enabled() {
    let fake = FakeDriver::new();
    let submit = fake.add(TOP, Node::new("button").css("button[type='submit']").disabled());
    let actions = actions(&fake);

    let later = fake.clone();
    let enabler = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        later.with(|dom| dom.enable(submit, true));
    });

    assert_eq!(actions.click(&button()).await.unwrap(), ClickTier::Native);
    enabler.await.unwrap();
    assert_eq!(fake.calls_to("click").len(), 1);
}

#[tokio::test]
async fn test_click_on_missing_control_times_out() {
    let fake = FakeDriver::new();
    let actions = actions(&fake);

    let start = Instant::now();
    let err = actions.click(&button()).await.unwrap_err();

    assert!(err.is_timeout());
    assert!(err.to_string().contains("clickable next button"));
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_read_text_trims() {
    let fake = FakeDriver::new();
    fake.add(
        TOP,
        Node::new("span").css("[data-testid='profile-name']").text("  Ivan Petrov \n"),
    );
    let actions = actions(&fake);

    let text = actions
        .read_text(&Candidates::new("profile name").css("[data-testid='profile-name']"))
        .await
        .unwrap();
    assert_eq!(text, "Ivan Petrov");
}

#[tokio::test]
async fn test_exists_uses_short_probe() {
    let fake = FakeDriver::new();
    fake.add(TOP, Node::new("p").css("p.hdi_description").hidden());
    let actions = actions(&fake);

    let error_text = Candidates::new("email error").css("p.hdi_description");
    assert!(actions.exists(&error_text, None).await.unwrap());

    let start = Instant::now();
    assert!(!actions.exists(&button(), None).await.unwrap());
    assert!(start.elapsed() < Duration::from_millis(400));
}

#[tokio::test]
async fn test_is_enabled_honours_class_and_aria() {
    let fake = FakeDriver::new();
    let submit = fake.add(TOP, Node::new("button").css("button[type='submit']"));
    let actions = actions(&fake);

    assert!(actions.is_enabled(&button()).await.unwrap());

    fake.with(|dom| {
        dom.node(submit)
            .attrs
            .insert("class".into(), "btn btn--disabled".into());
    });
    assert!(!actions.is_enabled(&button()).await.unwrap());

    fake.with(|dom| {
        let node = dom.node(submit);
        node.attrs.remove("class");
        node.attrs.insert("aria-disabled".into(), "true".into());
    });
    assert!(!actions.is_enabled(&button()).await.unwrap());
    assert!(!actions.enabled_now(&button()).await.unwrap());
}

#[tokio::test]
async fn test_is_enabled_false_when_control_never_shows() {
    let fake = FakeDriver::new();
    fake.add(TOP, Node::new("button").css("button[type='submit']").hidden());
    let actions = actions(&fake);

    assert!(!actions.is_enabled(&button()).await.unwrap());
    assert!(!actions.visible_now(&button()).await.unwrap());
}

#[tokio::test]
async fn test_is_enabled_waits_past_probe_budget() {
    let fake = FakeDriver::new();
    let submit = fake.add(
        TOP,
        Node::new("button").css("button[type='submit']").hidden().disabled(),
    );
    let actions = actions(&fake);

    let later = fake.clone();
    let reveal = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        later.with(|dom| {
            dom.show(submit, true);
            dom.enable(submit, true);
        });
    });

    assert!(actions.is_enabled(&button()).await.unwrap());
    reveal.await.unwrap();
}

#[tokio::test]
async fn test_dead_session_is_not_reported_as_missing_control() {
    let fake = FakeDriver::new();
    fake.add(TOP, Node::new("button").css("[data-testid='back-button']"));
    fake.with(|dom| dom.broken = true);
    let actions = actions(&fake);
    let back = Candidates::new("back button").css("[data-testid='back-button']");

    let err = actions.exists(&back, None).await.unwrap_err();
    assert!(matches!(err, E2eError::Driver(_)));

    let err = actions
        .click_if_present(&back, Duration::from_millis(30))
        .await
        .unwrap_err();
    assert!(!err.is_timeout());
    assert!(err.to_string().contains("invalid session id"));

    assert!(actions.is_enabled(&back).await.is_err());
}

#[tokio::test]
async fn test_click_if_present_reports_absence() {
    let fake = FakeDriver::new();
    let actions = actions(&fake);
    let back = Candidates::new("back button").css("[data-testid='back-button']");

    let presence = actions
        .click_if_present(&back, Duration::from_millis(30))
        .await
        .unwrap();
    assert_eq!(presence, Presence::Absent);

    fake.add(TOP, Node::new("button").css("[data-testid='back-button']"));
    let presence = actions
        .click_if_present(&back, Duration::from_millis(30))
        .await
        .unwrap();
    assert_eq!(presence, Presence::Found);
}

#[tokio::test]
async fn test_click_inside_iframe_restores_top_document() {
    let fake = FakeDriver::new();
    let frame = fake.add_frame(TOP);
    let submit = fake.add(frame, Node::new("button").css("button[type='submit']"));
    let done = fake.add(frame, Node::new("p").css("p.done").hidden());
    fake.on_click(submit, move |dom| dom.show(done, true));
    let actions = actions(&fake);

    actions.click(&button()).await.unwrap();

    assert!(fake.with(|dom| dom.nodes[done].displayed));
    assert_eq!(fake.current_doc(), TOP);
}

#[tokio::test]
async fn test_failed_action_inside_iframe_still_restores_top_document() {
    let fake = FakeDriver::new();
    let frame = fake.add_frame(TOP);
    let input = fake.add(frame, Node::new("input").css("input[name='workspaceName']"));
    let actions = actions(&fake);

    // The field disappears while typing
    fake.on_input(input, |dom, id| dom.node(id).removed = true);
    let err = actions.type_text(&field(), "abc", true).await.unwrap_err();

    assert!(matches!(err, E2eError::Driver(_)));
    assert_eq!(fake.current_doc(), TOP);
}

#[tokio::test]
async fn test_select_option_by_visible_text() {
    let fake = FakeDriver::new();
    let select = fake.add(TOP, Node::new("select").css("select[name='month']"));
    let options: Vec<usize> = ["January", "February", " March "]
        .iter()
        .map(|label| fake.add_child(select, Node::new("option").xpath(".//option").text(label)))
        .collect();
    let march = options[2];
    fake.on_click(march, move |dom| dom.node(select).value = "3".into());
    let actions = actions(&fake);
    let month = Candidates::new("birth month").css("select[name='month']");

    actions.select_option(&month, "March").await.unwrap();
    assert_eq!(fake.value(select), "3");

    let err = actions.select_option(&month, "Smarch").await.unwrap_err();
    assert!(matches!(err, E2eError::OptionNotFound { ref label } if label == "Smarch"));
}

#[tokio::test]
async fn test_upload_sends_path_to_hidden_file_input() {
    let fake = FakeDriver::new();
    let input = fake.add(TOP, Node::new("input").css("input[type='file']").hidden());
    let actions = actions(&fake);

    actions
        .upload_file(
            &Candidates::single("avatar input", Locator::css("input[type='file']")),
            Path::new("/tmp/avatar.png"),
        )
        .await
        .unwrap();
    assert_eq!(fake.value(input), "/tmp/avatar.png");
}

#[tokio::test]
async fn test_press_key_does_not_change_value() {
    let fake = FakeDriver::new();
    let input = fake.add(TOP, Node::new("input").css("input[name='workspaceName']"));
    let actions = actions(&fake);

    actions.type_text(&field(), "ws", true).await.unwrap();
    actions
        .press_key(&field(), onboard_e2e::driver::KEY_TAB)
        .await
        .unwrap();
    assert_eq!(fake.value(input), "ws");
}
