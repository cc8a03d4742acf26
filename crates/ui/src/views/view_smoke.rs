use study_core::model::{MaterialId, QuizResult};

use super::test_harness::{ViewKind, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn signed_out_app_prompts_for_sign_in() {
    let mut harness = setup_view_harness(ViewKind::App, false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Sign in"), "missing sign-in prompt in {html}");
    assert!(!html.contains("Cell biology"), "leaked library in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn signed_in_app_shows_sidebar_and_library() {
    let mut harness = setup_view_harness(ViewKind::App, true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Sign out"), "missing sidebar in {html}");
    assert!(html.contains("Cell biology"), "missing material in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn library_view_lists_materials_with_actions() {
    let mut harness = setup_view_harness(ViewKind::Library, true).await;
    harness.settle().await;
    let html = harness.render();
    for title in ["Cell biology", "Planets", "Photosynthesis notes"] {
        assert!(html.contains(title), "missing {title} in {html}");
    }
    assert!(html.contains("Take quiz"), "missing quiz action in {html}");
    assert!(html.contains("Biology"), "missing folder in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn flashcards_view_starts_on_first_question() {
    let mut harness = setup_view_harness(ViewKind::Flashcards("deck".into()), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Card 1 of 2"), "missing position in {html}");
    assert!(
        html.contains("What is the powerhouse of the cell?"),
        "missing question face in {html}"
    );
    assert!(!html.contains("Mitochondria"), "answer shown before flip in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn flashcards_view_rejects_a_quiz() {
    let mut harness = setup_view_harness(ViewKind::Flashcards("quiz".into()), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("cannot be opened here"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_deck_shows_message_without_card_controls() {
    let mut harness = setup_view_harness(ViewKind::Flashcards("empty".into()), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("nothing to study"), "missing empty message in {html}");
    assert!(!html.contains("Flip card"), "card shown for empty deck in {html}");
    assert!(!html.contains(">Next<"), "navigation shown for empty deck in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn content_detail_lists_generated_materials() {
    let mut harness = setup_view_harness(ViewKind::ContentDetail("c1".into()), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Lecture notes"), "missing content title in {html}");
    assert!(html.contains("Generate study materials"), "missing generate links in {html}");
    for title in ["Cell biology", "Planets", "Photosynthesis notes"] {
        assert!(html.contains(title), "missing {title} in {html}");
    }
    assert!(html.contains("Move"), "missing folder action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_shows_question_and_countdown() {
    let mut harness = setup_view_harness(ViewKind::Quiz("quiz".into()), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 2"), "missing position in {html}");
    assert!(html.contains("Largest planet?"), "missing question in {html}");
    assert!(html.contains("Jupiter"), "missing option in {html}");
    assert!(html.contains("30:00"), "missing timer in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn missing_quiz_reports_not_found() {
    let mut harness = setup_view_harness(ViewKind::Quiz("gone".into()), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("no longer exists"), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn summary_view_renders_markdown_and_concepts() {
    let mut harness = setup_view_harness(ViewKind::Summary("notes".into()), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("<strong>light</strong>"), "missing markdown in {html}");
    assert!(html.contains("Chlorophyll"), "missing key concept in {html}");
    assert!(html.contains("1 min read"), "missing reading time in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_lists_recorded_attempts() {
    let mut harness = setup_view_harness(ViewKind::History, true).await;
    let result = QuizResult::from_persisted(1, 2, vec![Some(1), None]).unwrap();
    harness
        .study
        .record_result(&MaterialId::new("quiz").unwrap(), &result)
        .await
        .expect("record");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Planets"), "missing quiz title in {html}");
    assert!(html.contains("1 / 2"), "missing score in {html}");
    assert!(html.contains("Retake"), "missing retake link in {html}");
}
