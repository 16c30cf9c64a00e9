use super::*;
use crate::foundation::core::Size;
use crate::render::surface::Surface;

fn image() -> EncodedImage {
    let mut s = Surface::new(Size::new(4, 2)).unwrap();
    s.fill([255, 0, 0, 255]);
    EncodedImage::png(&s).unwrap()
}

#[tokio::test]
async fn first_supporting_target_wins() {
    let share = InMemoryTarget::declining(DeliveryKind::Share);
    let clipboard = InMemoryTarget::accepting(DeliveryKind::Clipboard);
    let download = InMemoryTarget::accepting(DeliveryKind::Download);
    let (got_clip, got_dl) = (clipboard.received(), download.received());

    let chain = DeliveryChain::new()
        .with_target(share)
        .with_target(clipboard)
        .with_target(download);
    let report = chain.deliver(&image()).await;

    assert_eq!(report.outcome, DeliveryOutcome::Delivered(DeliveryKind::Clipboard));
    assert_eq!(report.attempts.len(), 2);
    assert_eq!(report.attempts[0].result, AttemptResult::Unsupported);
    assert!(report.notices.is_empty());
    assert_eq!(got_clip.lock().unwrap().len(), 1);
    assert!(got_dl.lock().unwrap().is_empty());
}

#[tokio::test]
async fn clipboard_failure_adds_notice_and_falls_back() {
    let download = InMemoryTarget::accepting(DeliveryKind::Download);
    let got = download.received();
    let chain = DeliveryChain::new()
        .with_target(InMemoryTarget::declining(DeliveryKind::Share))
        .with_target(InMemoryTarget::failing(DeliveryKind::Clipboard, "denied"))
        .with_target(download);

    let report = chain.deliver(&image()).await;
    assert!(report.is_delivered());
    assert_eq!(report.outcome, DeliveryOutcome::Delivered(DeliveryKind::Download));
    assert_eq!(report.notices.len(), 1);
    assert!(report.notices[0].contains("clipboard"));
    assert!(matches!(&report.attempts[1].result, AttemptResult::Failed(r) if r.contains("denied")));
    assert_eq!(got.lock().unwrap()[0].file_name(), "packshot-4x2.png");
}

#[tokio::test]
async fn all_failures_are_reported_as_undelivered() {
    let chain = DeliveryChain::new()
        .with_target(InMemoryTarget::failing(DeliveryKind::Share, "cancelled"))
        .with_target(InMemoryTarget::declining(DeliveryKind::Clipboard))
        .with_target(InMemoryTarget::failing(DeliveryKind::Download, "disk full"));

    let report = chain.deliver(&image()).await;
    assert_eq!(report.outcome, DeliveryOutcome::Undelivered);
    assert_eq!(report.attempts.len(), 3);
    assert!(report.notices.is_empty());

    let empty = DeliveryChain::new().deliver(&image()).await;
    assert_eq!(empty.outcome, DeliveryOutcome::Undelivered);
    assert!(empty.attempts.is_empty());
}

#[test]
fn from_config_orders_and_filters_targets() {
    let cfg = DeliveryConfig {
        clipboard: false,
        ..DeliveryConfig::default()
    };
    assert_eq!(
        DeliveryChain::from_config(&cfg).kinds(),
        vec![DeliveryKind::Share, DeliveryKind::Download]
    );
    assert_eq!(
        DeliveryChain::from_config(&DeliveryConfig::default()).kinds(),
        vec![
            DeliveryKind::Share,
            DeliveryKind::Clipboard,
            DeliveryKind::Download
        ]
    );
}

#[tokio::test]
async fn missing_clipboard_is_skipped_without_notice() {
    if arboard::Clipboard::new().is_ok() {
        return;
    }
    let chain = DeliveryChain::new()
        .with_target(crate::export::targets::SystemClipboard)
        .with_target(InMemoryTarget::accepting(DeliveryKind::Download));

    let report = chain.deliver(&image()).await;
    assert_eq!(report.outcome, DeliveryOutcome::Delivered(DeliveryKind::Download));
    assert_eq!(report.attempts[0].kind, DeliveryKind::Clipboard);
    assert_eq!(report.attempts[0].result, AttemptResult::Unsupported);
    assert!(report.notices.is_empty());
}
