mod common;

use common::{create_test_signature, page_content, write_test_pdf};
use pdf_sign::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    pdf: PathBuf,
    signature: PathBuf,
}

fn fixture(pages: usize) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("contract.pdf");
    write_test_pdf(pages, &pdf);
    let signature = dir.path().join("signature.png");
    create_test_signature().save(&signature).unwrap();
    Fixture {
        dir,
        pdf,
        signature,
    }
}

fn yes() -> impl FnMut(&str) -> bool {
    |_: &str| true
}

fn no() -> impl FnMut(&str) -> bool {
    |_: &str| false
}

fn open_session(fx: &Fixture) -> SigningSession {
    let mut session = SigningSession::default();
    assert!(
        session
            .open_document(&fx.pdf, &BlankPageRenderer, &mut yes())
            .unwrap()
    );
    session
}

fn signed_session(fx: &Fixture) -> SigningSession {
    let mut session = open_session(fx);
    session.load_signature(&fx.signature).unwrap();
    session
}

#[test]
fn test_open_document() {
    let fx = fixture(3);
    let session = open_session(&fx);

    let status = session.status();
    assert_eq!(status.file_name.as_deref(), Some("contract.pdf"));
    assert_eq!(status.page_count, 3);
    assert_eq!(status.current_page, 0);
    assert_eq!(status.total_placements, 0);
    assert!(!status.has_active);

    // 612pt at 150 DPI
    let raster = session.current_raster().unwrap();
    assert_eq!((raster.width(), raster.height()), (1275, 1650));
}

#[test]
fn test_loading_signature_centres_active_placement() {
    let fx = fixture(1);
    let session = signed_session(&fx);

    let active = session.active().unwrap();
    assert_eq!(active.page, 0);
    let centre_x = active.rect.x + active.rect.width / 2.0;
    let centre_y = active.rect.y + active.rect.height / 2.0;
    assert!((centre_x - 0.5).abs() < 1e-9);
    assert!((centre_y - 0.5).abs() < 1e-9);

    // Default on-screen width on the default canvas
    let rect = session.active_rect().unwrap();
    assert!((rect.width - 150.0).abs() < 1e-6);
    assert!((rect.height - 37.5).abs() < 1e-6);
}

#[test]
fn test_commit_requires_document_and_active() {
    let mut session = SigningSession::default();
    assert!(matches!(session.commit(), Err(SignError::NoDocument)));

    let fx = fixture(1);
    let mut session = open_session(&fx);
    assert!(matches!(session.commit(), Err(SignError::NoActivePlacement)));
    assert_eq!(session.ledger().total_count(), 0);
}

#[test]
fn test_commit_moves_active_into_ledger() {
    let fx = fixture(2);
    let mut session = signed_session(&fx);
    let rect = session.active().unwrap().rect;

    assert_eq!(session.commit().unwrap(), 1);
    assert!(session.active().is_none());
    assert_eq!(session.ledger().iter().next().unwrap().rect, rect);
    assert_eq!(session.committed_rects().len(), 1);

    // The same signature can be placed again
    session.new_placement().unwrap();
    session.next_page();
    assert_eq!(session.commit().unwrap(), 2);
    assert_eq!(session.status().placements_on_page, 1);
    assert_eq!(session.ledger().count_on_page(0), 1);
}

#[test]
fn test_active_placement_follows_page_changes() {
    let fx = fixture(3);
    let mut session = signed_session(&fx);
    let rect = session.active().unwrap().rect;

    assert!(session.next_page());
    assert!(session.next_page());
    assert!(!session.next_page());
    assert_eq!(session.current_page(), 2);
    assert_eq!(session.active().unwrap().page, 2);
    assert_eq!(session.active().unwrap().rect, rect);

    assert!(matches!(
        session.go_to_page(3),
        Err(SignError::PageOutOfRange { page: 3, count: 3 })
    ));
    assert_eq!(session.current_page(), 2);

    session.go_to_page(0).unwrap();
    assert!(!session.previous_page());
}

#[test]
fn test_scrolling_past_page_edge_changes_page() {
    let fx = fixture(3);
    let mut session = open_session(&fx);

    let bottom = ScrollPosition::from_offsets(1050.0, 600.0, 1650.0);
    assert!(!session.scroll_notch(ScrollDirection::Down, bottom));
    assert!(!session.scroll_notch(ScrollDirection::Down, bottom));
    assert!(session.scroll_notch(ScrollDirection::Down, bottom));
    assert_eq!(session.current_page(), 1);

    // A page that fits the canvas flips on every notch
    let fits = ScrollPosition::from_offsets(0.0, 900.0, 850.0);
    assert!(session.scroll_notch(ScrollDirection::Up, fits));
    assert_eq!(session.current_page(), 0);
    assert!(!session.scroll_notch(ScrollDirection::Up, fits));
    assert_eq!(session.current_page(), 0);
}

#[test]
fn test_scrolling_inside_page_keeps_page() {
    let fx = fixture(2);
    let mut session = open_session(&fx);

    let top = ScrollPosition::from_offsets(0.0, 600.0, 1650.0);
    for _ in 0..5 {
        assert!(!session.scroll_notch(ScrollDirection::Down, top));
    }
    assert_eq!(session.current_page(), 0);
}

#[test]
fn test_drag_moves_active_placement() {
    let fx = fixture(1);
    let mut session = signed_session(&fx);
    let before = session.active_rect().unwrap();

    // Missing the placement does nothing
    assert!(!session.begin_drag(before.x - 20.0, before.y - 20.0));

    let (grab_x, grab_y) = (before.x + 10.0, before.y + 10.0);
    assert!(session.begin_drag(grab_x, grab_y));
    session.drag_to(grab_x + 50.0, grab_y - 30.0);
    session.end_drag();
    assert!(!session.is_dragging());

    let after = session.active_rect().unwrap();
    assert!((after.x - (before.x + 50.0)).abs() < 1e-6);
    assert!((after.y - (before.y - 30.0)).abs() < 1e-6);
}

#[test]
fn test_drag_is_clamped_to_page() {
    let fx = fixture(1);
    let mut session = signed_session(&fx);
    let rect = session.active_rect().unwrap();

    assert!(session.begin_drag(rect.x + 1.0, rect.y + 1.0));
    session.drag_to(-5000.0, -5000.0);
    let active = session.active().unwrap();
    assert_eq!((active.rect.x, active.rect.y), (0.0, 0.0));
}

#[test]
fn test_placement_survives_zoom() {
    let fx = fixture(1);
    let mut session = signed_session(&fx);
    let relative = session.active().unwrap().rect;
    let before = session.active_rect().unwrap();

    session.set_zoom(150);
    let after = session.active_rect().unwrap();
    assert_eq!(session.active().unwrap().rect, relative);
    assert!(after.width > before.width);
}

#[test]
fn test_zoom_is_clamped() {
    let mut session = SigningSession::default();
    session.set_zoom(500);
    assert_eq!(session.zoom_percent(), 200);
    session.zoom_by_step(1);
    assert_eq!(session.zoom_percent(), 200);

    session.set_zoom(10);
    assert_eq!(session.zoom_percent(), 50);
    session.zoom_by_step(1);
    assert_eq!(session.zoom_percent(), 60);
}

#[test]
fn test_resize_keeps_aspect() {
    let fx = fixture(1);
    let mut session = signed_session(&fx);

    session.resize_signature(300);
    let rect = session.active_rect().unwrap();
    assert!((rect.width - 300.0).abs() < 1.0);
    // 200×50 signature
    assert!((rect.width / rect.height - 4.0).abs() < 0.05);

    session.resize_signature(5000);
    assert_eq!(session.signature_width_px(), 500);
}

#[test]
fn test_declined_close_keeps_everything() {
    let fx = fixture(2);
    let mut session = signed_session(&fx);
    session.commit().unwrap();

    assert!(!session.close_document(&mut no()).unwrap());
    assert!(session.has_document());
    assert_eq!(session.ledger().total_count(), 1);
    assert!(session.signature().is_some());
}

#[test]
fn test_accepted_close_clears_session() {
    let fx = fixture(2);
    let mut session = signed_session(&fx);
    session.commit().unwrap();

    assert!(session.close_document(&mut yes()).unwrap());
    assert!(!session.has_document());
    assert_eq!(session.ledger().total_count(), 0);
    assert!(session.signature().is_none());
    assert_eq!(session.status().page_count, 0);
}

#[test]
fn test_close_without_work_does_not_ask() {
    let fx = fixture(1);
    let mut session = open_session(&fx);
    let mut asked = false;
    let mut confirm = |_: &str| {
        asked = true;
        false
    };
    assert!(session.close_document(&mut confirm).unwrap());
    assert!(!asked);
}

#[test]
fn test_replacing_document_asks_first() {
    let fx = fixture(2);
    let other = fx.dir.path().join("other.pdf");
    write_test_pdf(5, &other);

    let mut session = open_session(&fx);
    let mut prompts = Vec::new();
    let mut confirm = |prompt: &str| {
        prompts.push(prompt.to_string());
        false
    };
    assert!(
        !session
            .open_document(&other, &BlankPageRenderer, &mut confirm)
            .unwrap()
    );
    assert_eq!(prompts, vec!["Close the current PDF and open a new one?"]);
    assert_eq!(session.document_path(), Some(fx.pdf.as_path()));

    assert!(
        session
            .open_document(&other, &BlankPageRenderer, &mut yes())
            .unwrap()
    );
    assert_eq!(session.page_count(), 5);
}

#[test]
fn test_failed_open_keeps_current_document() {
    let fx = fixture(2);
    let mut session = signed_session(&fx);
    session.commit().unwrap();

    let broken = fx.dir.path().join("broken.pdf");
    std::fs::write(&broken, b"%PDF-1.7 nonsense").unwrap();

    let result = session.open_document(&broken, &BlankPageRenderer, &mut yes());
    assert!(matches!(result, Err(SignError::DocumentLoad(_))));
    assert_eq!(session.document_path(), Some(fx.pdf.as_path()));
    assert_eq!(session.ledger().total_count(), 1);
}

#[test]
fn test_bad_signature_file_keeps_state() {
    let fx = fixture(1);
    let mut session = signed_session(&fx);
    let rect = session.active().unwrap().rect;

    let bogus = fx.dir.path().join("bogus.png");
    std::fs::write(&bogus, b"definitely not a png").unwrap();
    assert!(matches!(
        session.load_signature(&bogus),
        Err(SignError::SignatureLoad(_))
    ));
    assert_eq!(session.active().unwrap().rect, rect);
}

#[test]
fn test_export_writes_signed_copy() {
    let fx = fixture(3);
    let mut session = signed_session(&fx);
    session.commit().unwrap();
    session.new_placement().unwrap();
    session.go_to_page(2).unwrap();
    session.commit().unwrap();

    let output = fx.dir.path().join("contract_signed.pdf");
    let summary = session.export(&output).unwrap();
    assert_eq!(summary.placements, 2);
    assert_eq!(summary.pages_touched, vec![0, 2]);
    assert_eq!(summary.path, output);

    let signed = read_pdf(&output).unwrap();
    assert!(page_content(&signed, 0).contains("/Sig0 Do"));
    assert!(!page_content(&signed, 1).contains(" Do "));
    assert!(page_content(&signed, 2).contains("/Sig0 Do"));

    // Source file untouched
    let original = read_pdf(&fx.pdf).unwrap();
    assert!(!page_content(&original, 0).contains(" Do "));
}

#[test]
fn test_export_without_placements_writes_nothing() {
    let fx = fixture(1);
    let session = signed_session(&fx);
    let output = fx.dir.path().join("out.pdf");

    assert!(matches!(
        session.export(&output),
        Err(SignError::EmptyLedger)
    ));
    assert!(!Path::new(&output).exists());
}
